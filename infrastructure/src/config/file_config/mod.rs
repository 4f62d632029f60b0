//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod output;
mod providers;
mod scenarios;

pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use providers::{FileProviderConfig, FileProvidersConfig};
pub use scenarios::FileScenariosConfig;

use moa_domain::Provider;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider settings keyed by provider id
    pub providers: FileProvidersConfig,
    /// Scenario storage settings
    pub scenarios: FileScenariosConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log and transcript destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning every warning found.
    ///
    /// None of these stop the binary; they are printed so the user can fix
    /// a config that would otherwise fail at invocation time.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (id, provider) in &self.providers {
            if provider.command.as_deref().is_none_or(|c| c.trim().is_empty()) {
                warnings.push(format!(
                    "providers.{id}: no command configured, models using this provider cannot be invoked"
                ));
            }
            if provider.api_key.is_some() {
                warnings.push(format!(
                    "providers.{id}: api_key is stored in plain text, prefer api_key_env"
                ));
            }
            if Provider::from(id.as_str()).is_blank() {
                warnings.push("providers: blank provider id".to_string());
            }
        }

        if let Some(format) = &self.output.format
            && self.output.format().is_none()
        {
            warnings.push(format!(
                "output.format: unknown value '{format}', falling back to 'full'"
            ));
        }

        warnings
    }

    /// Provider settings for a provider, if configured
    pub fn provider(&self, provider: &Provider) -> Option<&FileProviderConfig> {
        self.providers.get(provider.as_str())
    }
}
