//! Core error types.

use thiserror::Error;

/// Errors produced while parsing a rule set.
///
/// `rule` carries the trimmed rule text that failed, so authoring tools can
/// point at the offending fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("input is invalid: '{rule}'")]
    WrongInput { rule: String },

    #[error("target value is empty: '{rule}'")]
    TargetEmpty { rule: String },

    #[error("input is empty")]
    EmptyInput,
}

/// Fieldless classification of a [`RuleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleErrorKind {
    WrongInput,
    TargetEmpty,
    EmptyInput,
}

impl RuleError {
    pub(crate) fn wrong_input(rule: &str) -> Self {
        RuleError::WrongInput {
            rule: rule.to_string(),
        }
    }

    pub(crate) fn target_empty(rule: &str) -> Self {
        RuleError::TargetEmpty {
            rule: rule.to_string(),
        }
    }

    /// Returns the kind of this error, dropping diagnostic context.
    pub fn kind(&self) -> RuleErrorKind {
        match self {
            RuleError::WrongInput { .. } => RuleErrorKind::WrongInput,
            RuleError::TargetEmpty { .. } => RuleErrorKind::TargetEmpty,
            RuleError::EmptyInput => RuleErrorKind::EmptyInput,
        }
    }

    /// Returns a stable error code suitable for tooling output.
    pub fn error_code(&self) -> &'static str {
        match self {
            RuleError::WrongInput { .. } => "WRONG_INPUT",
            RuleError::TargetEmpty { .. } => "TARGET_EMPTY",
            RuleError::EmptyInput => "EMPTY_INPUT",
        }
    }

    /// Returns the rule fragment that caused the error, if any.
    pub fn rule(&self) -> Option<&str> {
        match self {
            RuleError::WrongInput { rule } | RuleError::TargetEmpty { rule } => Some(rule),
            RuleError::EmptyInput => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RuleError::wrong_input("a=>b").error_code(), "WRONG_INPUT");
        assert_eq!(RuleError::target_empty("1=>").error_code(), "TARGET_EMPTY");
        assert_eq!(RuleError::EmptyInput.error_code(), "EMPTY_INPUT");
    }

    #[test]
    fn test_display_includes_rule() {
        let err = RuleError::wrong_input("1=>2=>3");
        assert_eq!(err.to_string(), "input is invalid: '1=>2=>3'");
        assert_eq!(err.rule(), Some("1=>2=>3"));
        assert_eq!(RuleError::EmptyInput.rule(), None);
    }
}
