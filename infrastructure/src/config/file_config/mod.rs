//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate:
//! the `[consensus]`, `[vocabulary]`, `[proposal]` and `[gate]` sections
//! map straight onto their domain counterparts.

mod council;
mod output;
mod provider;
mod run;

pub use council::{FileCoordinatorConfig, FileExpertConfig};
pub use output::{FileLoggingConfig, FileOutputConfig, FileOutputFormat, FileTranscriptConfig};
pub use provider::FileProviderConfig;
pub use run::FileRunConfig;

use council_application::DeliberationParams;
use council_domain::{
    ConfigIssue, ConfigIssueCode, ConsensusCriteria, DeliberationPolicy, DomainError, GatePolicy,
    ProposalFormat, Roster, StanceVocabulary,
};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Consensus gates
    pub consensus: ConsensusCriteria,
    /// Stance phrase lists
    pub vocabulary: StanceVocabulary,
    /// Revision markers
    pub proposal: ProposalFormat,
    /// Speaker gate tunables
    pub gate: GatePolicy,
    pub coordinator: FileCoordinatorConfig,
    pub experts: Vec<FileExpertConfig>,
    pub run: FileRunConfig,
    pub provider: FileProviderConfig,
    pub output: FileOutputConfig,
    pub transcript: FileTranscriptConfig,
    pub logging: FileLoggingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            consensus: ConsensusCriteria::default(),
            vocabulary: StanceVocabulary::default(),
            proposal: ProposalFormat::default(),
            gate: GatePolicy::default(),
            coordinator: FileCoordinatorConfig::default(),
            experts: FileExpertConfig::default_council(),
            run: FileRunConfig::default(),
            provider: FileProviderConfig::default(),
            output: FileOutputConfig::default(),
            transcript: FileTranscriptConfig::default(),
            logging: FileLoggingConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors mean the deliberation cannot start; warnings describe
    /// settings that work but probably do not do what was intended.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = council::roster_issues(&self.coordinator, &self.experts);

        for list in self.vocabulary.empty_lists() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyVocabulary,
                format!("vocabulary.{} is empty", list),
            ));
        }

        for problem in self
            .consensus
            .problems()
            .into_iter()
            .chain(self.gate.problems())
        {
            issues.push(ConfigIssue::error(ConfigIssueCode::OutOfRange, problem));
        }

        if self.proposal.revision_marker.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange,
                "proposal.revision_marker must not be empty",
            ));
        }

        if !self.run.budget.is_finite() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange,
                format!("run.budget must be finite, got {}", self.run.budget),
            ));
        }

        let max_rounds = self.run.to_params().max_rounds();
        if max_rounds < self.consensus.min_rounds {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnreachableMinRounds,
                format!(
                    "consensus.min_rounds ({}) exceeds run.max_rounds ({}); consensus can never be reached",
                    self.consensus.min_rounds, max_rounds
                ),
            ));
        }

        issues
    }

    /// Build the validated roster
    pub fn roster(&self) -> Result<Roster, DomainError> {
        Roster::new(
            self.coordinator.to_participant(),
            self.experts
                .iter()
                .map(FileExpertConfig::to_participant)
                .collect(),
        )
    }

    pub fn policy(&self) -> DeliberationPolicy {
        DeliberationPolicy {
            format: self.proposal.clone(),
            vocabulary: self.vocabulary.clone(),
            criteria: self.consensus.clone(),
            gate: self.gate.clone(),
        }
    }

    pub fn params(&self) -> DeliberationParams {
        self.run.to_params()
    }
}
