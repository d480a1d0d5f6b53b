/// Status reported by a parallel or pipe branch that invoked `exit`.
/// Same byte an `exit(-100)` leaves in the wait status.
pub const TERMINATED_BRANCH_STATUS: i32 = 156;

/// Status of an external command whose program could not be launched.
pub const EXEC_FAILURE_STATUS: i32 = 255;

/// Result of executing a node.
///
/// `Terminate` is not an exit status: it asks the session to stop issuing
/// further trees and never compares equal to any `Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Status(i32),
    Terminate,
}

impl Outcome {
    pub const SUCCESS: Outcome = Outcome::Status(0);
    pub const FAILURE: Outcome = Outcome::Status(1);

    pub fn from_success(ok: bool) -> Self {
        if ok { Self::SUCCESS } else { Self::FAILURE }
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn is_terminate(self) -> bool {
        self == Outcome::Terminate
    }

    pub fn code(self) -> Option<i32> {
        match self {
            Outcome::Status(code) => Some(code),
            Outcome::Terminate => None,
        }
    }

    /// Exit status of an isolated branch that finished with this outcome.
    pub fn branch_status(self) -> i32 {
        self.code().unwrap_or(TERMINATED_BRANCH_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminate_is_not_a_status() {
        for code in 0..=255 {
            assert_ne!(Outcome::Terminate, Outcome::Status(code));
        }
        assert!(!Outcome::Terminate.is_success());
        assert_eq!(Outcome::Terminate.code(), None);
    }

    #[test]
    fn test_branch_status() {
        assert_eq!(Outcome::Status(3).branch_status(), 3);
        assert_eq!(Outcome::Terminate.branch_status(), TERMINATED_BRANCH_STATUS);
        assert_eq!(Outcome::from_success(false), Outcome::FAILURE);
    }
}
