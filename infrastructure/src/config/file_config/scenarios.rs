//! Scenario storage configuration from TOML (`[scenarios]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScenariosConfig {
    /// Directory holding one JSON document per scenario
    pub directory: Option<PathBuf>,
}

impl FileScenariosConfig {
    /// The configured directory, else `<data_dir>/moa/scenarios`,
    /// else `./.moa/scenarios`
    pub fn resolved_directory(&self) -> PathBuf {
        if let Some(dir) = &self.directory {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("moa").join("scenarios"))
            .unwrap_or_else(|| PathBuf::from(".moa").join("scenarios"))
    }
}
