//! Proposal value object and revision text format

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Free-text proposal put before the council (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    content: String,
}

impl Proposal {
    /// Create a proposal, rejecting empty or whitespace-only text
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyProposal);
        }
        Ok(Self { content })
    }

    /// Get the proposal content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Proposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// Markers that delimit a coordinator revision.
///
/// A revision looks like:
///
/// ```text
/// REVISED PROPOSAL:
/// <proposal text>
///
/// CHANGES MADE:
/// 1. ...
/// ```
///
/// Any coordinator message containing `revision_marker` is a proposal version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalFormat {
    pub revision_marker: String,
    pub changes_marker: String,
}

impl Default for ProposalFormat {
    fn default() -> Self {
        Self {
            revision_marker: "REVISED PROPOSAL:".to_string(),
            changes_marker: "CHANGES MADE:".to_string(),
        }
    }
}

impl ProposalFormat {
    /// Whether `content` carries the revision marker
    pub fn is_version(&self, content: &str) -> bool {
        !self.revision_marker.is_empty() && content.contains(&self.revision_marker)
    }

    /// Extract the proposal body of a revision.
    ///
    /// Keeps the text after the last revision marker and before the first
    /// change-list marker that follows it. Content without the revision
    /// marker is returned trimmed but otherwise whole.
    pub fn extract_text<'a>(&self, content: &'a str) -> &'a str {
        if !self.is_version(content) {
            return content.trim();
        }
        let body = content
            .rsplit(self.revision_marker.as_str())
            .next()
            .unwrap_or(content);
        let body = if self.changes_marker.is_empty() {
            body
        } else {
            body.split(self.changes_marker.as_str())
                .next()
                .unwrap_or(body)
        };
        body.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proposal_creation() {
        let p = Proposal::try_new("Levy a 40% tariff on imported drone parts").unwrap();
        assert_eq!(p.content(), "Levy a 40% tariff on imported drone parts");
    }

    #[test]
    fn test_empty_proposal_rejected() {
        assert_eq!(Proposal::try_new(""), Err(DomainError::EmptyProposal));
        assert_eq!(Proposal::try_new("  \n"), Err(DomainError::EmptyProposal));
    }

    #[test]
    fn test_is_version() {
        let format = ProposalFormat::default();
        assert!(format.is_version("REVISED PROPOSAL:\nfoo\nCHANGES MADE:\n1. bar"));
        assert!(!format.is_version("I agree with the proposal"));
    }

    #[test]
    fn test_extract_text_strips_preamble_and_changes() {
        let format = ProposalFormat::default();
        let content = "Thanks all.\nREVISED PROPOSAL:\n  Cap the tariff at 20%.  \n\nCHANGES MADE:\n1. Lowered rate";
        assert_eq!(format.extract_text(content), "Cap the tariff at 20%.");
    }

    #[test]
    fn test_extract_text_without_changes_marker() {
        let format = ProposalFormat::default();
        assert_eq!(
            format.extract_text("REVISED PROPOSAL: keep it simple"),
            "keep it simple"
        );
    }

    #[test]
    fn test_extract_text_without_revision_marker_returns_whole() {
        let format = ProposalFormat::default();
        assert_eq!(format.extract_text("  plain text  "), "plain text");
    }

    #[test]
    fn test_extract_text_uses_last_revision_marker() {
        let format = ProposalFormat::default();
        let content = "REVISED PROPOSAL: old\nREVISED PROPOSAL: new\nCHANGES MADE: x";
        assert_eq!(format.extract_text(content), "new");
    }

    #[test]
    fn test_custom_markers() {
        let format = ProposalFormat {
            revision_marker: "修订后的政策:".to_string(),
            changes_marker: "所做修改:".to_string(),
        };
        let content = "修订后的政策:\n对进口零部件征收20%的关税\n\n所做修改:\n1. 降低税率";
        assert!(format.is_version(content));
        assert_eq!(format.extract_text(content), "对进口零部件征收20%的关税");
    }
}
