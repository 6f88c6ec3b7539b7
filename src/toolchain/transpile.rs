//! Built-in script transpiler (oxc).
//!
//! parse → semantic → transform (TypeScript, JSX) → codegen

use std::path::Path;

use oxc::allocator::Allocator;
use oxc::codegen::Codegen;
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use oxc::span::SourceType;
use oxc::transformer::{TransformOptions, Transformer};

use super::TransformCause;

/// Transpile one script. The source type comes from `path`'s extension.
pub fn transpile(path: &Path, source: &str) -> Result<String, TransformCause> {
    let source_type = SourceType::from_path(path).map_err(|_| {
        TransformCause::Unsupported(format!("not a script: `{}`", path.display()))
    })?;

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return Err(super::diagnostics(&ret.errors));
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();
    let ret = Transformer::new(&allocator, path, &TransformOptions::default())
        .build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        return Err(super::diagnostics(&ret.errors));
    }

    Ok(Codegen::new().build(&program).code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_type_annotations() {
        let code = transpile(
            Path::new("src/lib/format.ts"),
            "interface Item { id: number }\nexport const label = (item: Item): string => `#${item.id}`;\n",
        )
        .unwrap();
        assert!(!code.contains("interface"));
        assert!(!code.contains(": Item"));
        assert!(code.contains("export const label"));
    }

    #[test]
    fn test_plain_js_passes_through() {
        let code = transpile(Path::new("a.js"), "export const answer = 42;\n").unwrap();
        assert!(code.contains("export const answer = 42"));
    }

    #[test]
    fn test_syntax_error_reports_diagnostics() {
        let err = transpile(Path::new("a.ts"), "const = ;").unwrap_err();
        assert!(matches!(err, TransformCause::Diagnostics(_)));
    }

    #[test]
    fn test_unknown_extension() {
        let err = transpile(Path::new("a.json"), "{}").unwrap_err();
        assert!(matches!(err, TransformCause::Unsupported(_)));
    }
}
