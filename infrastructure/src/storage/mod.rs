//! Scenario repositories

mod file_repository;
mod memory_repository;

pub use file_repository::FileScenarioRepository;
pub use memory_repository::InMemoryScenarioRepository;
