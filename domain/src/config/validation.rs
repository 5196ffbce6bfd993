//! Structured configuration issues.
//!
//! Loaders collect every problem they find instead of stopping at the first,
//! then decide what to do by [`Severity`].

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the deliberation cannot start.
    Error,
    /// Non-fatal: the run works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A participant weight is zero, negative or not finite.
    NonPositiveWeight,
    /// An expert weighs as much as the coordinator or more.
    CoordinatorNotDominant,
    /// Two participants share a name.
    DuplicateName,
    /// A name contains the transcript delimiter, a line break, or is reserved.
    InvalidName,
    /// A stance vocabulary list is empty.
    EmptyVocabulary,
    /// An expert has no domain keywords and can never pass relevance.
    NoKeywords,
    /// A threshold or probability lies outside its range.
    OutOfRange,
    /// The round ceiling is below the minimum consensus round.
    UnreachableMinRounds,
    /// The roster has no experts.
    NoExperts,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let e = ConfigIssue::error(ConfigIssueCode::DuplicateName, "dup");
        assert!(e.is_error());
        assert_eq!(e.to_string(), "error: dup");

        let w = ConfigIssue::warning(ConfigIssueCode::NoKeywords, "none");
        assert!(!w.is_error());
        assert_eq!(w.code, ConfigIssueCode::NoKeywords);
    }
}
