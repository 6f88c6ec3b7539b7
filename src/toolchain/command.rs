//! Configured tool commands.
//!
//! `$KILN_INPUT`, `$KILN_OUTPUT` and `$KILN_ROOT` are substituted in every
//! argument and exported to the process environment.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::Result;
use rustc_hash::FxHashMap;

use crate::utils::exec::{Cmd, EMPTY_FILTER};

/// Build `$KILN_*` variables for one tool invocation.
pub fn kiln_vars(input: &Path, output: &Path, root: &Path) -> FxHashMap<String, String> {
    let mut vars = FxHashMap::default();
    vars.insert("KILN_INPUT".into(), input.display().to_string());
    vars.insert("KILN_OUTPUT".into(), output.display().to_string());
    vars.insert("KILN_ROOT".into(), root.display().to_string());
    vars
}

/// Replace occurrences of `$KILN_XXX` with values from `vars`.
pub fn resolve_args(args: &[String], vars: &FxHashMap<String, String>) -> Vec<String> {
    args.iter()
        .map(|arg| {
            let mut result = arg.clone();
            for (key, value) in vars {
                result = result.replace(&format!("${key}"), value);
            }
            result
        })
        .collect()
}

/// Run a configured command from the project root.
pub fn run_tool(command: &[String], input: &Path, output: &Path, root: &Path) -> Result<()> {
    let vars = kiln_vars(input, output, root);
    let resolved = resolve_args(command, &vars);
    crate::debug!("exec"; "{}", resolved.join(" "));

    Cmd::from_slice(&resolved)
        .cwd(root)
        .envs(&vars)
        .pty(std::io::stdout().is_terminal())
        .filter(&EMPTY_FILTER)
        .run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_args() {
        let vars = kiln_vars(
            Path::new("/p/build/client/alpha/index.js"),
            Path::new("/p/public/js/alpha.js"),
            Path::new("/p"),
        );
        let args: Vec<String> = ["esbuild", "$KILN_INPUT", "--bundle", "--outfile=$KILN_OUTPUT"]
            .map(String::from)
            .to_vec();

        let resolved = resolve_args(&args, &vars);
        assert_eq!(
            resolved,
            [
                "esbuild",
                "/p/build/client/alpha/index.js",
                "--bundle",
                "--outfile=/p/public/js/alpha.js"
            ]
        );
    }

    #[test]
    fn test_resolve_args_no_vars() {
        let args = vec!["echo".to_string(), "hello".to_string()];
        assert_eq!(resolve_args(&args, &FxHashMap::default()), args);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_tool_writes_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(&input, "payload").unwrap();

        let command: Vec<String> = ["sh", "-c", "cp \"$KILN_INPUT\" \"$KILN_OUTPUT\""]
            .map(String::from)
            .to_vec();
        run_tool(&command, &input, &output, dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "payload");
    }
}
