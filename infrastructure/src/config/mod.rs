//! Configuration file loading for moa
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MOA_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./moa.toml` or `./.moa.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/moa/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileLoggingConfig, FileOutputConfig, FileProviderConfig, FileProvidersConfig,
    FileScenariosConfig,
};
pub use loader::ConfigLoader;
