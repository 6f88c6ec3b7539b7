//! Built-in minification for bundles.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::TransformCause;

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Result<String, TransformCause> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if !ret.errors.is_empty() {
        return Err(super::diagnostics(&ret.errors));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, TransformCause> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| TransformCause::Diagnostics(e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| TransformCause::Diagnostics(e.to_string()))?;
    Ok(result.code)
}

/// Minify a file's content based on its extension.
pub fn minify_by_ext(path: &Path, content: &str) -> Result<String, TransformCause> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("js" | "mjs") => minify_js(content),
        Some("css") => minify_css(content),
        _ => Err(TransformCause::Unsupported(format!(
            "no built-in minifier for `{}`",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_js() {
        let code = minify_js("function add(first, second) {\n  return first + second;\n}\nexport { add };").unwrap();
        assert!(code.len() < 60);
        assert!(code.contains("export"));
    }

    #[test]
    fn test_minify_js_syntax_error() {
        assert!(matches!(
            minify_js("function ( {"),
            Err(TransformCause::Diagnostics(_))
        ));
    }

    #[test]
    fn test_minify_css() {
        let code = minify_css("body {\n  color: #ff0000;\n}\n").unwrap();
        assert_eq!(code, "body{color:red}");
    }

    #[test]
    fn test_minify_by_ext_unsupported() {
        assert!(matches!(
            minify_by_ext(Path::new("a.wasm"), ""),
            Err(TransformCause::Unsupported(_))
        ));
    }
}
