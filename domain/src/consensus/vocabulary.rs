//! Stance vocabularies used by the consensus scorer

use serde::{Deserialize, Serialize};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Fixed phrase sets the scorer matches against lowercased message content.
///
/// All lists are plain substrings. Phrases are lowercased before matching,
/// so configured entries may use any case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StanceVocabulary {
    /// Phrases signalling agreement
    pub positive: Vec<String>,
    /// Phrases signalling disagreement; these win over positive phrases
    pub negative: Vec<String>,
    /// Words that cancel a directly following positive phrase
    pub negation: Vec<String>,
    /// Qualifiers that double the strength of a stance
    pub intensifiers: Vec<String>,
    /// Explicit consensus statements, scored as a strong positive
    pub consensus_markers: Vec<String>,
    /// Markers introducing the reason behind an objection
    pub issue_markers: Vec<String>,
    /// Minimum whitespace-separated words for an extracted issue
    pub min_issue_words: usize,
}

impl Default for StanceVocabulary {
    fn default() -> Self {
        Self {
            positive: strings(&[
                "强烈同意",
                "同意",
                "支持",
                "认可",
                "批准",
                "接受",
                "肯定",
                "strongly agree",
                "agree",
                "support",
                "approve",
                "accept",
                "endorse",
            ]),
            negative: strings(&[
                "强烈反对",
                "反对",
                "拒绝",
                "否决",
                "不同意",
                "否认",
                "不批准",
                "strongly oppose",
                "oppose",
                "reject",
                "disagree",
                "veto",
            ]),
            negation: strings(&[
                "不", "没有", "从未", "无", "缺少", "反对", "拒绝", "not", "no", "never",
                "without", "cannot",
            ]),
            intensifiers: strings(&["强烈", "strongly"]),
            consensus_markers: strings(&["共识说明:", "consensus statement:"]),
            issue_markers: strings(&[
                "因为", "由于", "鉴于", "原因:", "问题:", "because", "since", "given", "reason:",
                "issue:",
            ]),
            min_issue_words: 3,
        }
    }
}

impl StanceVocabulary {
    /// Copy with every phrase lowercased, ready for matching
    pub fn normalized(&self) -> Self {
        let lower = |v: &[String]| v.iter().map(|s| s.to_lowercase()).collect::<Vec<_>>();
        Self {
            positive: lower(&self.positive),
            negative: lower(&self.negative),
            negation: lower(&self.negation),
            intensifiers: lower(&self.intensifiers),
            consensus_markers: lower(&self.consensus_markers),
            issue_markers: lower(&self.issue_markers),
            min_issue_words: self.min_issue_words,
        }
    }

    /// Names of the lists that are empty
    pub fn empty_lists(&self) -> Vec<&'static str> {
        let mut empty = Vec::new();
        if self.positive.is_empty() {
            empty.push("positive");
        }
        if self.negative.is_empty() {
            empty.push("negative");
        }
        if self.negation.is_empty() {
            empty.push("negation");
        }
        if self.intensifiers.is_empty() {
            empty.push("intensifiers");
        }
        if self.issue_markers.is_empty() {
            empty.push("issue_markers");
        }
        empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_bilingual() {
        let vocab = StanceVocabulary::default();
        assert!(vocab.positive.iter().any(|p| p == "强烈同意"));
        assert!(vocab.positive.iter().any(|p| p == "agree"));
        assert!(vocab.negative.iter().any(|p| p == "不批准"));
        assert_eq!(vocab.min_issue_words, 3);
        assert!(vocab.empty_lists().is_empty());
    }

    #[test]
    fn test_normalized_lowercases() {
        let vocab = StanceVocabulary {
            positive: vec!["Strongly Agree".into()],
            ..Default::default()
        };
        assert_eq!(vocab.normalized().positive, vec!["strongly agree"]);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let vocab: StanceVocabulary =
            serde_json::from_str(r#"{"negation": ["hardly"]}"#).unwrap();
        assert_eq!(vocab.negation, vec!["hardly"]);
        assert!(!vocab.positive.is_empty());
        assert_eq!(vocab.empty_lists(), Vec::<&str>::new());
    }
}
