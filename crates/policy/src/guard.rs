//! Guard configuration and enforcement.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the guard treats a final answer that was not preceded by a
/// fresh validation step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardMode {
    /// Accept the final answer unconditionally.
    Off,
    /// Run the validator as a side step, record its result, then accept.
    #[default]
    Soft,
    /// Reject the final answer and make the model retry after validating.
    Strict,
}

/// Guard rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardRules {
    /// Enforcement mode for the validation-before-final-answer rule.
    #[serde(default)]
    pub mode: GuardMode,
}

/// Policy configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Policy {
    /// Final-answer guard rules.
    #[serde(default)]
    pub guard: GuardRules,
}

/// Result of reviewing a final-answer dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Dispatch the final-answer tool and terminate.
    Accept,
    /// Run the validator first as a side step, then dispatch and terminate.
    ValidateThenAccept,
    /// Refuse the dispatch; the reason is reported back to the model.
    Reject { reason: String },
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

impl Policy {
    /// Load policy from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse policy from TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Create a policy with the given guard mode.
    pub fn with_mode(mode: GuardMode) -> Self {
        Self {
            guard: GuardRules { mode },
        }
    }

    /// Review a final-answer dispatch against the last successfully
    /// dispatched tool.
    ///
    /// `validator` is the designated validation tool; when the loop has
    /// none configured, the final answer is always accepted.
    pub fn review_final_answer(&self, last_tool: Option<&str>, validator: Option<&str>) -> Verdict {
        let Some(validator) = validator else {
            return Verdict::Accept;
        };
        if last_tool == Some(validator) {
            return Verdict::Accept;
        }
        match self.guard.mode {
            GuardMode::Off => Verdict::Accept,
            GuardMode::Soft => Verdict::ValidateThenAccept,
            GuardMode::Strict => Verdict::Reject {
                reason: format!("run {validator} immediately before calling the final-answer tool"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_soft() {
        let policy = Policy::default();
        assert_eq!(policy.guard.mode, GuardMode::Soft);
    }

    #[test]
    fn parse_toml_mode() {
        let policy = Policy::parse("[guard]\nmode = \"strict\"\n").unwrap();
        assert_eq!(policy.guard.mode, GuardMode::Strict);

        let policy = Policy::parse("").unwrap();
        assert_eq!(policy.guard.mode, GuardMode::Soft);
    }

    #[test]
    fn accepts_when_validation_is_fresh() {
        for mode in [GuardMode::Off, GuardMode::Soft, GuardMode::Strict] {
            let verdict =
                Policy::with_mode(mode).review_final_answer(Some("run_evals_tool"), Some("run_evals_tool"));
            assert!(verdict.is_accept());
        }
    }

    #[test]
    fn soft_mode_requests_side_validation() {
        let verdict = Policy::with_mode(GuardMode::Soft)
            .review_final_answer(Some("calculator_tool"), Some("run_evals_tool"));
        assert_eq!(verdict, Verdict::ValidateThenAccept);

        let verdict =
            Policy::with_mode(GuardMode::Soft).review_final_answer(None, Some("run_evals_tool"));
        assert_eq!(verdict, Verdict::ValidateThenAccept);
    }

    #[test]
    fn strict_mode_rejects_stale_validation() {
        let verdict = Policy::with_mode(GuardMode::Strict)
            .review_final_answer(Some("calculator_tool"), Some("run_evals_tool"));
        match verdict {
            Verdict::Reject { reason } => assert!(reason.contains("run_evals_tool")),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn no_validator_always_accepts() {
        let verdict = Policy::with_mode(GuardMode::Strict).review_final_answer(None, None);
        assert!(verdict.is_accept());
    }
}
