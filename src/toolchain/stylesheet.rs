//! Built-in stylesheet compiler (lightningcss, plain CSS only).

use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use super::TransformCause;

/// Parse and re-print a `.css` file. Other syntaxes need a configured command.
pub fn compile(path: &Path, source: &str) -> Result<String, TransformCause> {
    let is_css = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("css"));
    if !is_css {
        return Err(TransformCause::Unsupported(format!(
            "no built-in compiler for `{}`; set [stylesheet] command",
            path.display()
        )));
    }

    let options = ParserOptions {
        filename: path.display().to_string(),
        ..ParserOptions::default()
    };
    let stylesheet = StyleSheet::parse(source, options)
        .map_err(|e| TransformCause::Diagnostics(e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions::default())
        .map_err(|e| TransformCause::Diagnostics(e.to_string()))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_css() {
        let code = compile(Path::new("main.css"), ".a { color: red }").unwrap();
        assert!(code.contains(".a"));
        assert!(code.contains("color: red"));
    }

    #[test]
    fn test_scss_needs_command() {
        let err = compile(Path::new("main.scss"), "$x: 1;").unwrap_err();
        assert!(matches!(err, TransformCause::Unsupported(_)));
    }
}
