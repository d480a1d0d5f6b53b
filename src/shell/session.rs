use crate::shell::ast::CommandNode;
use crate::shell::context::ShellContext;
use crate::shell::outcome::Outcome;
use crate::shell::run_tree;
use log::info;

/// Runs trees one after another against a single context.
///
/// Working directory and environment changes persist from one tree to the
/// next. The session ends at the first `Terminate`.
pub struct Session {
    ctx: ShellContext,
    last_status: i32,
    terminated: bool,
}

impl Session {
    pub fn new(ctx: ShellContext) -> Self {
        Self {
            ctx,
            last_status: 0,
            terminated: false,
        }
    }

    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }

    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Executes one tree. Does nothing once the session has terminated.
    pub fn execute(&mut self, tree: &CommandNode) -> Outcome {
        if self.terminated {
            return Outcome::Terminate;
        }
        let outcome = run_tree(tree, &mut self.ctx);
        match outcome {
            Outcome::Status(code) => self.last_status = code,
            Outcome::Terminate => {
                info!("session terminated by exit");
                self.terminated = true;
            }
        }
        outcome
    }

    /// Executes trees in order, stopping at the first `Terminate`.
    /// Returns `Terminate` if the session ended, else the last status.
    pub fn run_all<'a, I>(&mut self, trees: I) -> Outcome
    where
        I: IntoIterator<Item = &'a CommandNode>,
    {
        for tree in trees {
            if self.execute(tree).is_terminate() {
                return Outcome::Terminate;
            }
        }
        Outcome::Status(self.last_status)
    }
}
