//! Roster configuration from TOML (`[coordinator]` and `[[experts]]`)

use council_domain::{
    ConfigIssue, ConfigIssueCode, ExpertKind, MODERATOR, Participant, Roster,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw coordinator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCoordinatorConfig {
    pub name: String,
    pub title: String,
    pub weight: f64,
    /// Appended to the title in prompts ("senior policy maker at ...")
    pub organisation: Option<String>,
}

impl Default for FileCoordinatorConfig {
    fn default() -> Self {
        let council = Roster::default_council();
        let coordinator = council.coordinator();
        Self {
            name: coordinator.name().to_string(),
            title: coordinator.title().to_string(),
            weight: coordinator.weight(),
            organisation: None,
        }
    }
}

impl FileCoordinatorConfig {
    pub fn to_participant(&self) -> Participant {
        let title = match &self.organisation {
            Some(org) if !org.trim().is_empty() => format!("{} at {}", self.title, org.trim()),
            _ => self.title.clone(),
        };
        Participant::coordinator(&self.name, title, self.weight)
    }
}

/// Raw expert configuration
///
/// Only `name` and `kind` are required; weight and keywords fall back to
/// the kind's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileExpertConfig {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

impl FileExpertConfig {
    pub fn to_participant(&self) -> Participant {
        let kind = ExpertKind::from(self.kind.as_str());
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!("{} expert", kind.as_str()));
        let mut expert = Participant::expert(&self.name, title, kind);
        if let Some(weight) = self.weight {
            expert = expert.with_weight(weight);
        }
        if let Some(keywords) = &self.keywords {
            expert = expert.with_keywords(keywords.clone());
        }
        expert
    }

    /// The built-in council as file entries
    pub fn default_council() -> Vec<Self> {
        Roster::default_council()
            .experts()
            .iter()
            .map(|p| Self {
                name: p.name().to_string(),
                title: Some(p.title().to_string()),
                kind: p
                    .role()
                    .expert_kind()
                    .map(|k| k.as_str().to_string())
                    .unwrap_or_default(),
                weight: None,
                keywords: None,
            })
            .collect()
    }
}

/// Structured issues for a coordinator plus experts.
///
/// Mirrors the checks [`Roster::new`] enforces so that every problem is
/// reported at once instead of only the first.
pub(super) fn roster_issues(
    coordinator: &FileCoordinatorConfig,
    experts: &[FileExpertConfig],
) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if experts.is_empty() {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::NoExperts,
            "[[experts]] is empty; at least one expert is required",
        ));
    }

    let participants: Vec<Participant> = std::iter::once(coordinator.to_participant())
        .chain(experts.iter().map(FileExpertConfig::to_participant))
        .collect();

    let mut seen = HashSet::new();
    for p in &participants {
        let name = p.name();
        if name.trim().is_empty() || name.contains(['|', '\n', '\r']) || name == MODERATOR {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidName,
                format!(
                    "participant name '{}' must be non-empty, free of '|' and line breaks, and not '{}'",
                    name.escape_debug(),
                    MODERATOR
                ),
            ));
        }
        if !seen.insert(name) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateName,
                format!("participant name '{}' is used more than once", name),
            ));
        }

        let weight = p.weight();
        if !weight.is_finite() || weight < 0.0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NonPositiveWeight,
                format!("{}: weight {} must be a finite non-negative number", name, weight),
            ));
        } else if weight == 0.0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NonPositiveWeight,
                format!("{}: weight is 0, its stance will not affect the score", name),
            ));
        }

        if p.is_expert() && weight >= coordinator.weight {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::CoordinatorNotDominant,
                format!(
                    "{}: weight {} must be below the coordinator weight {}",
                    name, weight, coordinator.weight
                ),
            ));
        }

        if p.is_expert() && p.keywords().iter().all(|k| k.trim().is_empty()) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoKeywords,
                format!(
                    "{}: no keywords, the expert will stay silent after the first round",
                    name
                ),
            ));
        }
    }

    issues
}
