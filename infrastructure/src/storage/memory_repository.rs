use async_trait::async_trait;
use moa_domain::{RepositoryError, Scenario, ScenarioRepository};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local scenario store for tests and embedding
#[derive(Default)]
pub struct InMemoryScenarioRepository {
    scenarios: RwLock<BTreeMap<String, Scenario>>,
}

impl InMemoryScenarioRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with scenarios, keyed by name
    pub fn with_scenarios(scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        let map = scenarios
            .into_iter()
            .map(|s| (s.name.clone(), s.without_credentials()))
            .collect();
        Self {
            scenarios: RwLock::new(map),
        }
    }
}

#[async_trait]
impl ScenarioRepository for InMemoryScenarioRepository {
    async fn get(&self, name: &str) -> Result<Option<Scenario>, RepositoryError> {
        Ok(self.scenarios.read().await.get(name).cloned())
    }

    async fn put(&self, scenario: &Scenario) -> Result<(), RepositoryError> {
        if scenario.name.trim().is_empty() {
            return Err(RepositoryError::MissingName);
        }
        self.scenarios
            .write()
            .await
            .insert(scenario.name.clone(), scenario.without_credentials());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), RepositoryError> {
        self.scenarios.write().await.remove(name);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Scenario>, RepositoryError> {
        Ok(self.scenarios.read().await.values().cloned().collect())
    }
}
