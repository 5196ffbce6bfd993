//! Configuration file loading for policy-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./council.toml` or `./.council.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/policy-council/config.toml`
//! 4. `COUNCIL_` environment variables (nested keys split on `__`)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileCoordinatorConfig, FileExpertConfig, FileLoggingConfig, FileOutputConfig,
    FileOutputFormat, FileProviderConfig, FileRunConfig, FileTranscriptConfig,
};
pub use loader::{ConfigLoadError, ConfigLoader};
