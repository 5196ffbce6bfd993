//! Infrastructure layer for policy-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoadError, ConfigLoader, FileConfig, FileCoordinatorConfig, FileExpertConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat, FileProviderConfig, FileRunConfig,
    FileTranscriptConfig,
};
pub use logging::{JsonlRoundLogger, TranscriptFileWriter};
pub use providers::OpenAiCompletionService;
