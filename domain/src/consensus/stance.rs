//! Stance classification of a single message

use super::vocabulary::StanceVocabulary;
use serde::{Deserialize, Serialize};

/// How strongly a stance is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Plain,
    Strong,
}

impl Intensity {
    pub fn points(&self) -> u8 {
        match self {
            Intensity::Plain => 1,
            Intensity::Strong => 2,
        }
    }
}

/// Classified sentiment of a message toward the proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Positive(Intensity),
    Negative(Intensity),
    Neutral,
}

impl Stance {
    /// Points counted toward the stance's own category (0 for neutral)
    pub fn points(&self) -> u8 {
        match self {
            Stance::Positive(i) | Stance::Negative(i) => i.points(),
            Stance::Neutral => 0,
        }
    }
}

/// Classifies message content against a normalized [`StanceVocabulary`].
pub struct StanceClassifier<'a> {
    vocab: &'a StanceVocabulary,
}

impl<'a> StanceClassifier<'a> {
    /// `vocab` must already be lowercased (see [`StanceVocabulary::normalized`])
    pub fn new(vocab: &'a StanceVocabulary) -> Self {
        Self { vocab }
    }

    /// Classify content, which is lowercased here.
    ///
    /// A consensus statement is a strong positive regardless of anything
    /// else. Otherwise any negative phrase wins; failing that, any positive
    /// phrase not cancelled by a preceding negation word.
    pub fn classify(&self, content: &str) -> Stance {
        let content = content.to_lowercase();
        self.classify_lowered(&content)
    }

    pub(crate) fn classify_lowered(&self, content: &str) -> Stance {
        if self
            .vocab
            .consensus_markers
            .iter()
            .any(|m| !m.is_empty() && content.contains(m.as_str()))
        {
            return Stance::Positive(Intensity::Strong);
        }

        let negatives: Vec<&str> = matched(&self.vocab.negative, content).collect();
        if !negatives.is_empty() {
            return Stance::Negative(self.intensity(&negatives, content));
        }

        let positives: Vec<&str> = matched(&self.vocab.positive, content)
            .filter(|p| !self.is_negated(p, content))
            .collect();
        if !positives.is_empty() {
            return Stance::Positive(self.intensity(&positives, content));
        }

        Stance::Neutral
    }

    /// Whether the word right before the first occurrence of `phrase` is a
    /// negation word.
    ///
    /// Words are whitespace-delimited. Unspaced scripts attach the negation
    /// to the phrase's neighbour ("我不支持"), so a non-ASCII negation word
    /// also counts when it ends the preceding token.
    pub fn is_negated(&self, phrase: &str, content: &str) -> bool {
        preceding_word(phrase, content).is_some_and(|word| {
            self.vocab
                .negation
                .iter()
                .any(|n| !n.is_empty() && (word == n || (!n.is_ascii() && word.ends_with(n.as_str()))))
        })
    }

    fn intensity(&self, phrases: &[&str], content: &str) -> Intensity {
        let qualified = phrases.iter().any(|phrase| {
            self.vocab.intensifiers.iter().any(|i| {
                !i.is_empty()
                    && (phrase.contains(i.as_str())
                        || preceding_word(phrase, content).is_some_and(|w| w.ends_with(i.as_str())))
            })
        });
        if qualified {
            Intensity::Strong
        } else {
            Intensity::Plain
        }
    }
}

fn matched<'v>(phrases: &'v [String], content: &'v str) -> impl Iterator<Item = &'v str> {
    phrases
        .iter()
        .map(String::as_str)
        .filter(move |p| !p.is_empty() && content.contains(p))
}

fn preceding_word<'c>(phrase: &str, content: &'c str) -> Option<&'c str> {
    let idx = content.find(phrase)?;
    content[..idx].split_whitespace().next_back()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(content: &str) -> Stance {
        let vocab = StanceVocabulary::default().normalized();
        StanceClassifier::new(&vocab).classify(content)
    }

    #[test]
    fn test_plain_and_strong_positive() {
        assert_eq!(classify("我们同意该方案"), Stance::Positive(Intensity::Plain));
        assert_eq!(classify("强烈同意"), Stance::Positive(Intensity::Strong));
        assert_eq!(classify("We strongly support it"), Stance::Positive(Intensity::Strong));
        assert_eq!(classify("I Agree."), Stance::Positive(Intensity::Plain));
    }

    #[test]
    fn test_negative_wins_over_positive() {
        assert_eq!(
            classify("部分支持，但反对第三条"),
            Stance::Negative(Intensity::Plain)
        );
        assert_eq!(classify("强烈反对"), Stance::Negative(Intensity::Strong));
    }

    #[test]
    fn test_negated_positive_is_neutral() {
        assert_eq!(classify("we do not support this"), Stance::Neutral);
        assert_eq!(classify("我们 不 支持"), Stance::Neutral);
        assert_eq!(classify("我们不支持"), Stance::Neutral);
    }

    #[test]
    fn test_negation_checks_first_occurrence_only() {
        // First "support" is negated; a later plain one does not rescue it
        assert_eq!(classify("not support now, support later"), Stance::Neutral);
        // "agree" elsewhere still counts
        assert_eq!(classify("not support, but agree"), Stance::Positive(Intensity::Plain));
    }

    #[test]
    fn test_consensus_statement_is_strong_positive() {
        assert_eq!(
            classify("共识说明: 各方反对意见已解决"),
            Stance::Positive(Intensity::Strong)
        );
        assert_eq!(
            classify("Consensus statement: all resolved"),
            Stance::Positive(Intensity::Strong)
        );
    }

    #[test]
    fn test_neutral_without_vocabulary() {
        let stance = classify("the tariff schedule needs detail");
        assert_eq!(stance, Stance::Neutral);
        assert_eq!(stance.points(), 0);
    }

    #[test]
    fn test_points() {
        assert_eq!(Stance::Positive(Intensity::Strong).points(), 2);
        assert_eq!(Stance::Negative(Intensity::Plain).points(), 1);
    }
}
