use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use crate::shell::ast::{CommandNode, Operator, SimpleCommand};

/// A command script: an ordered list of trees.
///
/// ```toml
/// [[command]]
/// argv = ["make", "all"]
/// stdout = "build.log"
/// stderr = "build.log"
///
/// [[command]]
/// op = "pipe"
/// left = { argv = ["printf", "hello"] }
/// right = { argv = ["cat"], stdout = "out.txt" }
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScript {
    #[serde(default)]
    command: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNode {
    argv: Option<Vec<String>>,
    stdin: Option<PathBuf>,
    stdout: Option<PathBuf>,
    stderr: Option<PathBuf>,
    #[serde(default)]
    append: bool,
    op: Option<Operator>,
    left: Option<Box<RawNode>>,
    right: Option<Box<RawNode>>,
}

impl RawNode {
    fn into_node(self, at: &str) -> Result<CommandNode> {
        match (self.argv, self.op) {
            (Some(_), Some(_)) => bail!("{}: a node has either 'argv' or 'op', not both", at),
            (None, None) => bail!("{}: a node needs 'argv' or 'op'", at),
            (Some(argv), None) => {
                if self.left.is_some() || self.right.is_some() {
                    bail!("{}: a simple command cannot have 'left'/'right'", at);
                }
                match argv.first() {
                    None => bail!("{}: 'argv' is empty", at),
                    Some(verb) if verb.is_empty() => bail!("{}: the verb (argv[0]) is empty", at),
                    Some(_) => {}
                }
                let mut cmd = SimpleCommand::new(argv);
                if let Some(path) = redirect_target(self.stdin, "stdin", at)? {
                    cmd = cmd.stdin(path);
                }
                if let Some(path) = redirect_target(self.stdout, "stdout", at)? {
                    cmd = cmd.stdout(path);
                }
                if let Some(path) = redirect_target(self.stderr, "stderr", at)? {
                    cmd = cmd.stderr(path);
                }
                if self.append {
                    cmd = cmd.append();
                }
                Ok(CommandNode::Simple(cmd))
            }
            (None, Some(op)) => {
                if self.stdin.is_some() || self.stdout.is_some() || self.stderr.is_some() || self.append {
                    bail!("{}: redirections belong on simple commands, not on '{}'", at, op);
                }
                let left = self.left.with_context(|| format!("{}: '{}' needs 'left'", at, op))?;
                let right = self.right.with_context(|| format!("{}: '{}' needs 'right'", at, op))?;
                Ok(CommandNode::compound(
                    op,
                    left.into_node(&format!("{}.left", at))?,
                    right.into_node(&format!("{}.right", at))?,
                ))
            }
        }
    }
}

fn redirect_target(target: Option<PathBuf>, name: &str, at: &str) -> Result<Option<PathBuf>> {
    match target {
        Some(path) if path.as_os_str().is_empty() => bail!("{}: '{}' target is empty", at, name),
        other => Ok(other),
    }
}

pub fn parse_script(content: &str) -> Result<Vec<CommandNode>> {
    let raw: RawScript = toml::from_str(content).context("Failed to parse command script")?;
    raw.command
        .into_iter()
        .enumerate()
        .map(|(i, node)| node.into_node(&format!("command[{}]", i)))
        .collect()
}

pub fn load_script(path: &Path) -> Result<Vec<CommandNode>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    parse_script(&content).with_context(|| format!("Invalid script: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_and_compound() {
        let trees = parse_script(
            r#"
            [[command]]
            argv = ["make", "all"]
            stdout = "build.log"
            stderr = "build.log"
            append = true

            [[command]]
            op = "on-success"
            left = { argv = ["true"] }

            [command.right]
            op = "pipe"
            left = { argv = ["printf", "hi"] }
            right = { argv = ["cat"], stdout = "out.txt" }
            "#,
        )
        .unwrap();

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].to_string(), "make all >> build.log 2>&1");
        assert_eq!(trees[1].to_string(), "true && printf hi | cat > out.txt");
        assert_eq!(trees[1].operator(), Some(Operator::OnSuccess));
    }

    #[test]
    fn test_empty_script() {
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_malformed_nodes() {
        let cases = [
            ("[[command]]\nargv = []", "'argv' is empty"),
            ("[[command]]\nargv = [\"\"]", "verb"),
            ("[[command]]\nargv = [\"cat\"]\nstdin = \"\"", "'stdin' target is empty"),
            ("[[command]]\nop = \"pipe\"\nleft = { argv = [\"a\"] }", "needs 'right'"),
            ("[[command]]\nappend = true", "needs 'argv' or 'op'"),
            ("[[command]]\nop = \"parallel\"\nargv = [\"a\"]", "not both"),
        ];
        for (input, expected) in cases {
            let err = format!("{:#}", parse_script(input).unwrap_err());
            assert!(err.contains(expected), "{:?} -> {}", input, err);
        }
    }

    #[test]
    fn test_rejects_unknown_operator() {
        let err = parse_script("[[command]]\nop = \"xor\"\nleft = { argv = [\"a\"] }\nright = { argv = [\"b\"] }");
        assert!(err.is_err());
    }

    #[test]
    fn test_error_names_nested_position() {
        let err = parse_script(
            "[[command]]\nop = \"sequential\"\nleft = { argv = [\"a\"] }\nright = { op = \"pipe\", left = { argv = [] }, right = { argv = [\"b\"] } }",
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("command[0].right.left"));
    }
}
