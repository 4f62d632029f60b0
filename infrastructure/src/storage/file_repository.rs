//! Directory-backed scenario storage.
//!
//! One pretty-printed JSON document per scenario. The file name is derived
//! from the scenario name: spaces and path separators become `_`, the rest
//! is lowercased, plus `.json`.

use async_trait::async_trait;
use moa_domain::{RepositoryError, Scenario, ScenarioRepository};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct FileScenarioRepository {
    directory: PathBuf,
}

impl FileScenarioRepository {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the document that stores `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(file_name(name))
    }
}

fn file_name(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("{}.json", stem.to_lowercase())
}

fn storage_error(path: &Path, e: std::io::Error) -> RepositoryError {
    RepositoryError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl ScenarioRepository for FileScenarioRepository {
    async fn get(&self, name: &str) -> Result<Option<Scenario>, RepositoryError> {
        if name.trim().is_empty() {
            return Err(RepositoryError::MissingName);
        }

        let path = self.path_for(name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&path, e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| RepositoryError::Serialization(format!("{}: {}", path.display(), e)))
    }

    async fn put(&self, scenario: &Scenario) -> Result<(), RepositoryError> {
        if scenario.name.trim().is_empty() {
            return Err(RepositoryError::MissingName);
        }

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| storage_error(&self.directory, e))?;

        let json = serde_json::to_string_pretty(scenario)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let path = self.path_for(&scenario.name);
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| storage_error(&path, e))?;

        debug!(scenario = %scenario.name, path = %path.display(), "Saved scenario");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), RepositoryError> {
        let path = self.path_for(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(scenario = %name, "Deleted scenario");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&path, e)),
        }
    }

    async fn list(&self) -> Result<Vec<Scenario>, RepositoryError> {
        let mut entries = match tokio::fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(&self.directory, e)),
        };

        let mut scenarios = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| storage_error(&self.directory, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable scenario file {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<Scenario>(&content) {
                Ok(scenario) => scenarios.push(scenario),
                Err(e) => warn!("Skipping invalid scenario file {}: {}", path.display(), e),
            }
        }

        scenarios.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(scenarios)
    }
}
