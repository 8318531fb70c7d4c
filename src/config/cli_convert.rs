//! CLI to Config conversion utilities

use crate::config::cli;
use crate::config::FailurePolicy;

/// Convert CLI FailurePolicy to config FailurePolicy
pub fn convert_failure_policy(cli_policy: cli::FailurePolicy) -> FailurePolicy {
    match cli_policy {
        cli::FailurePolicy::Abort => FailurePolicy::Abort,
        cli::FailurePolicy::Degrade => FailurePolicy::Degrade,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_failure_policy() {
        assert_eq!(convert_failure_policy(cli::FailurePolicy::Abort), FailurePolicy::Abort);
        assert_eq!(convert_failure_policy(cli::FailurePolicy::Degrade), FailurePolicy::Degrade);
    }
}
