//! Subcommand handlers
//!
//! [`App`] owns the wired adapters (registry, repository, credentials,
//! transcript) and runs one subcommand against them.

use anyhow::{Context, Result, bail};
use moa_application::{
    NoRunLogger, ProgressSender, RunLogger, RunMoaError, RunMoaUseCase, RunScenarioError,
    RunScenarioUseCase, ScenarioCatalog, ScenarioRunOutput, progress_channel,
};
use moa_domain::{
    AdHocMoaConfig, CredentialMap, OutputFormat, Scenario, calculate_consensus,
    compare_responses, find_best_response,
};
use moa_infrastructure::{
    EnvCredentialResolver, FileConfig, FileScenarioRepository, InvokerRegistry, JsonlRunLogger,
};
use moa_presentation::{
    Command, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
    spawn_progress,
};
use serde_json::json;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct App {
    invoker: Arc<InvokerRegistry>,
    catalog: ScenarioCatalog,
    scenarios_dir: PathBuf,
    credentials: CredentialMap,
    logger: Arc<dyn RunLogger>,
    format: OutputFormat,
    quiet: bool,
}

impl App {
    pub fn new(config: &FileConfig, format: OutputFormat, quiet: bool) -> Self {
        let scenarios_dir = config.scenarios.resolved_directory();
        let repository = Arc::new(FileScenarioRepository::new(&scenarios_dir));

        let invoker = Arc::new(InvokerRegistry::from_config(&config.providers));
        debug!("Registered providers: {:?}", invoker.providers());

        let credentials = EnvCredentialResolver::new(config.providers.clone()).resolve();
        debug!("Resolved credentials for {} providers", credentials.len());

        let logger: Arc<dyn RunLogger> = match config
            .logging
            .transcript
            .as_ref()
            .and_then(|path| JsonlRunLogger::new(path))
        {
            Some(logger) => {
                info!("Writing run transcript to {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoRunLogger),
        };

        Self {
            invoker,
            catalog: ScenarioCatalog::new(repository),
            scenarios_dir,
            credentials,
            logger,
            format,
            quiet,
        }
    }

    pub async fn dispatch(&self, command: Command) -> Result<()> {
        match command {
            Command::Run { scenario, prompt } => self.run(&scenario, &prompt).await,
            Command::RunFile { path, prompt } => self.run_file(&path, &prompt).await,
            Command::RunMany { prompt, scenarios } => self.run_many(&scenarios, &prompt).await,
            Command::List => {
                let scenarios = self.catalog.list().await?;
                print!("{}", ConsoleFormatter::format_scenario_list(&scenarios));
                Ok(())
            }
            Command::Show { name } => {
                let scenario = self.catalog.load(&name).await?;
                match self.format {
                    OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&scenario)),
                    _ => print!("{}", ConsoleFormatter::format_scenario(&scenario)),
                }
                Ok(())
            }
            Command::New { name } => {
                let scenario = self.catalog.create(&name).await?;
                println!(
                    "Created scenario '{}' in {}",
                    scenario.name,
                    self.scenarios_dir.display()
                );
                Ok(())
            }
            Command::Validate { path } => {
                let json = read_file(&path)?;
                let report = self.catalog.check(&json)?;
                match self.format {
                    OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&report)),
                    _ => print!("{}", ConsoleFormatter::format_validation(&report)),
                }
                if !report.is_valid() {
                    bail!("{} validation error(s)", report.errors.len());
                }
                Ok(())
            }
            Command::Import { path } => {
                let json = read_file(&path)?;
                let scenario = self.catalog.import(&json).await?;
                println!("Imported scenario '{}'", scenario.name);
                Ok(())
            }
            Command::Export { name, out } => self.export(&name, out).await,
            Command::Delete { name } => {
                self.catalog.delete(&name).await?;
                println!("Deleted scenario '{}'", name);
                Ok(())
            }
            Command::Compare { scenario, prompt } => self.compare(&scenario, &prompt).await,
            Command::Config => Ok(()),
        }
    }

    async fn run(&self, name: &str, prompt: &str) -> Result<()> {
        let scenario = self.catalog.load(name).await?;
        let output = self.execute_scenario(&scenario, prompt).await?;
        println!("{}", ConsoleFormatter.render(&output, self.format));
        Ok(())
    }

    async fn run_file(&self, path: &Path, prompt: &str) -> Result<()> {
        let json = read_file(path)?;
        let config: AdHocMoaConfig = serde_json::from_str(&json)
            .with_context(|| format!("Invalid MOA config: {}", path.display()))?;

        let (progress, reporter) = self.progress();
        let result = {
            let use_case = RunMoaUseCase::new(Arc::clone(&self.invoker))
                .with_progress(progress)
                .with_logger(Arc::clone(&self.logger));
            use_case.execute(&config, prompt, &self.credentials).await
        };
        finish_progress(reporter).await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(RunMoaError::Execution(e)) => {
                print_partial_results(e.partial_results());
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        let rendered = match self.format {
            OutputFormat::Full => ConsoleFormatter::format_outcome(&outcome),
            OutputFormat::Aggregated => ConsoleFormatter::format_moa_response(&outcome),
            OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
        };
        println!("{}", rendered);
        Ok(())
    }

    async fn run_many(&self, names: &[String], prompt: &str) -> Result<()> {
        let mut scenarios = Vec::with_capacity(names.len());
        for name in names {
            scenarios.push(self.catalog.load(name).await?);
        }

        let (progress, reporter) = self.progress();
        let outputs = {
            let use_case = RunScenarioUseCase::new(Arc::clone(&self.invoker))
                .with_progress(progress)
                .with_logger(Arc::clone(&self.logger));
            use_case
                .execute_many(&scenarios, prompt, &self.credentials)
                .await
        };
        finish_progress(reporter).await;

        match self.format {
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&outputs)),
            format => {
                for output in &outputs {
                    println!("{}", ConsoleFormatter.render(output, format));
                }
            }
        }

        if outputs.is_empty() {
            bail!("All {} scenarios failed", scenarios.len());
        }
        if outputs.len() < scenarios.len() {
            eprintln!(
                "{} of {} scenarios failed",
                scenarios.len() - outputs.len(),
                scenarios.len()
            );
        }
        Ok(())
    }

    async fn export(&self, name: &str, out: Option<PathBuf>) -> Result<()> {
        let exported = self.catalog.export(name).await?;

        match out {
            Some(path) if path.as_os_str() == "-" => println!("{}", exported.json),
            out => {
                let path = out.unwrap_or_else(|| PathBuf::from(&exported.file_name));
                std::fs::write(&path, &exported.json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Exported scenario '{}' to {}", name, path.display());
            }
        }
        Ok(())
    }

    async fn compare(&self, name: &str, prompt: &str) -> Result<()> {
        let scenario = self.catalog.load(name).await?;
        let output = self.execute_scenario(&scenario, prompt).await?;
        let results = &output.individual_results;

        match self.format {
            OutputFormat::Json => {
                let report = json!({
                    "run": &output,
                    "comparison": compare_responses(results),
                    "consensus": calculate_consensus(results),
                    "bestResponse": find_best_response(results),
                });
                println!("{}", ConsoleFormatter::format_json(&report));
            }
            format => {
                println!("{}", ConsoleFormatter.render(&output, format));
                println!("{}", ConsoleFormatter::format_comparison(results));
            }
        }
        Ok(())
    }

    async fn execute_scenario(&self, scenario: &Scenario, prompt: &str) -> Result<ScenarioRunOutput> {
        let (progress, reporter) = self.progress();
        let result = {
            let use_case = RunScenarioUseCase::new(Arc::clone(&self.invoker))
                .with_progress(progress)
                .with_logger(Arc::clone(&self.logger));
            use_case.execute(scenario, prompt, &self.credentials).await
        };
        finish_progress(reporter).await;

        match result {
            Ok(output) => Ok(output),
            Err(RunScenarioError::Execution(e)) => {
                print_partial_results(e.partial_results());
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Progress sender plus the task rendering it; disabled when quiet
    fn progress(&self) -> (ProgressSender, Option<JoinHandle<()>>) {
        if self.quiet {
            return (ProgressSender::disabled(), None);
        }

        let (sender, receiver) = progress_channel();
        let handle = if std::io::stderr().is_terminal() {
            spawn_progress(receiver, ProgressReporter::new())
        } else {
            spawn_progress(receiver, SimpleProgress)
        };
        (sender, Some(handle))
    }
}

/// Wait for the progress task; every sender must already be dropped
async fn finish_progress(reporter: Option<JoinHandle<()>>) {
    if let Some(handle) = reporter {
        let _ = handle.await;
    }
}

fn print_partial_results(results: &[moa_domain::InvocationResult]) {
    if !results.is_empty() {
        println!("{}", ConsoleFormatter::format_results(results));
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
