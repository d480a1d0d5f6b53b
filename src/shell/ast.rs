use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// A parsed command line: simple commands joined by binary operators.
///
/// Trees are built by the caller (a parser, a script loader, a test) and only
/// read during execution.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandNode {
    // Leaf: "echo hello > out.txt"
    Simple(SimpleCommand),
    // Operator node: "left <op> right"
    Compound {
        op: Operator,
        left: Box<CommandNode>,
        right: Box<CommandNode>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
    Sequential, // ;
    OnFailure,  // || (right runs only if left is nonzero)
    OnSuccess,  // && (right runs only if left is zero)
    Pipe,       // |
    Parallel,   // &
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Sequential => ";",
            Operator::OnFailure => "||",
            Operator::OnSuccess => "&&",
            Operator::Pipe => "|",
            Operator::Parallel => "&",
        }
    }

    // Binding strength, used only when rendering.
    fn precedence(self) -> u8 {
        match self {
            Operator::Sequential | Operator::Parallel => 0,
            Operator::OnFailure | Operator::OnSuccess => 1,
            Operator::Pipe => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single command with its redirections.
///
/// `argv[0]` is the verb. `append` applies to both output and error targets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleCommand {
    pub verb: String,
    pub argv: Vec<String>,
    pub stdin: Option<PathBuf>,
    pub stdout: Option<PathBuf>,
    pub stderr: Option<PathBuf>,
    pub append: bool,
}

impl SimpleCommand {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let verb = argv.first().cloned().unwrap_or_default();
        Self {
            verb,
            argv,
            ..Self::default()
        }
    }

    pub fn stdin(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    pub fn stdout(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Some(path.into());
        self
    }

    pub fn stderr(mut self, path: impl Into<PathBuf>) -> Self {
        self.stderr = Some(path.into());
        self
    }

    pub fn append(mut self) -> Self {
        self.append = true;
        self
    }

    /// Arguments after the verb.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    /// True when output and error are textually the same target, so they share
    /// one descriptor. `log` and `log/` are different targets here.
    pub fn shares_output(&self) -> bool {
        matches!((&self.stdout, &self.stderr), (Some(out), Some(err)) if out.as_os_str() == err.as_os_str())
    }
}

impl CommandNode {
    pub fn compound(op: Operator, left: CommandNode, right: CommandNode) -> Self {
        CommandNode::Compound {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn sequential(left: CommandNode, right: CommandNode) -> Self {
        Self::compound(Operator::Sequential, left, right)
    }

    pub fn on_failure(left: CommandNode, right: CommandNode) -> Self {
        Self::compound(Operator::OnFailure, left, right)
    }

    pub fn on_success(left: CommandNode, right: CommandNode) -> Self {
        Self::compound(Operator::OnSuccess, left, right)
    }

    pub fn pipe(left: CommandNode, right: CommandNode) -> Self {
        Self::compound(Operator::Pipe, left, right)
    }

    pub fn parallel(left: CommandNode, right: CommandNode) -> Self {
        Self::compound(Operator::Parallel, left, right)
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            CommandNode::Simple(_) => None,
            CommandNode::Compound { op, .. } => Some(*op),
        }
    }

    /// Number of simple commands in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            CommandNode::Simple(_) => 1,
            CommandNode::Compound { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

impl From<SimpleCommand> for CommandNode {
    fn from(cmd: SimpleCommand) -> Self {
        CommandNode::Simple(cmd)
    }
}

impl fmt::Display for SimpleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_words::join(&self.argv))?;
        let arrow = if self.append { ">>" } else { ">" };
        if let Some(input) = &self.stdin {
            write!(f, " < {}", quote_path(input))?;
        }
        if let Some(output) = &self.stdout {
            write!(f, " {} {}", arrow, quote_path(output))?;
        }
        if self.shares_output() {
            f.write_str(" 2>&1")?;
        } else if let Some(error) = &self.stderr {
            write!(f, " 2{} {}", arrow, quote_path(error))?;
        }
        Ok(())
    }
}

impl fmt::Display for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandNode::Simple(cmd) => write!(f, "{}", cmd),
            CommandNode::Compound { op, left, right } => {
                // Left-associative: equal precedence on the right needs parentheses.
                let wrap_left = left.operator().is_some_and(|l| l.precedence() < op.precedence());
                let wrap_right = right.operator().is_some_and(|r| r.precedence() <= op.precedence());
                write_operand(f, left, wrap_left)?;
                if *op == Operator::Sequential {
                    f.write_str("; ")?;
                } else {
                    write!(f, " {} ", op)?;
                }
                write_operand(f, right, wrap_right)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &CommandNode, wrap: bool) -> fmt::Result {
    if wrap {
        write!(f, "({})", node)
    } else {
        write!(f, "{}", node)
    }
}

fn quote_path(path: &std::path::Path) -> String {
    shell_words::quote(&path.to_string_lossy()).into_owned()
}
