//! Infrastructure layer for moa
//!
//! This crate contains adapters that implement the ports defined
//! in the application and domain layers, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileLoggingConfig, FileOutputConfig, FileProviderConfig,
    FileProvidersConfig, FileScenariosConfig,
};
pub use logging::JsonlRunLogger;
pub use providers::{CommandInvoker, EnvCredentialResolver, InvokerRegistry};
pub use storage::{FileScenarioRepository, InMemoryScenarioRepository};
