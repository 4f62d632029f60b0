//! Progress reporting for MOA runs
//!
//! Use cases publish [`ProgressEvent`]s into a channel; [`spawn_progress`]
//! drains it on a background task and hands each event to a
//! [`ProgressSink`]. The task ends once every sender is dropped.

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use moa_application::{ProgressEvent, ProgressReceiver, ProgressStatus, Stage};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Renders progress events
pub trait ProgressSink: Send {
    fn on_event(&mut self, event: &ProgressEvent);

    /// Called once the channel is closed
    fn finish(&mut self) {}
}

/// Drain `receiver` into `sink` until all senders are gone
pub fn spawn_progress<S>(mut receiver: ProgressReceiver, mut sink: S) -> JoinHandle<()>
where
    S: ProgressSink + 'static,
{
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            sink.on_event(&event);
        }
        sink.finish();
    })
}

/// Reports progress with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    model_bar: Option<ProgressBar>,
    stage_spinner: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            model_bar: None,
            stage_spinner: None,
        }
    }

    fn model_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn model_bar(&mut self, total: usize) -> &ProgressBar {
        let multi = &self.multi;
        self.model_bar.get_or_insert_with(|| {
            let pb = multi.add(ProgressBar::new(total as u64));
            pb.set_style(Self::model_style());
            pb.set_prefix("Models");
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        })
    }

    fn finish_spinner(&mut self, message: String) {
        if let Some(spinner) = self.stage_spinner.take() {
            spinner.finish_with_message(message);
        }
    }

    fn finish_model_bar(&mut self) {
        if let Some(pb) = self.model_bar.take() {
            pb.finish_with_message(format!("{}", "done".green()));
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressReporter {
    fn on_event(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Model {
                total,
                role,
                status,
                error,
                ..
            } => {
                let pb = self.model_bar(*total);
                match status {
                    ProgressStatus::Running => pb.set_message(format!("{} {}", "->".cyan(), role)),
                    ProgressStatus::Completed => {
                        pb.set_message(format!("{} {}", "v".green(), role));
                        pb.inc(1);
                    }
                    ProgressStatus::Failed => {
                        pb.set_message(format!(
                            "{} {} ({})",
                            "x".red(),
                            role,
                            error.as_deref().unwrap_or("failed")
                        ));
                        pb.inc(1);
                    }
                }
            }
            ProgressEvent::Stage {
                stage,
                status,
                message,
            } => match (stage, status) {
                (Stage::Execution, ProgressStatus::Running) => {
                    self.finish_model_bar();
                    self.finish_spinner(format!("{}", "done".green()));
                }
                (Stage::Execution, _) => self.finish_model_bar(),
                (Stage::Aggregation, ProgressStatus::Running) => {
                    self.finish_model_bar();
                    let spinner = self.multi.add(ProgressBar::new_spinner());
                    spinner.set_style(Self::spinner_style());
                    spinner.set_prefix("Aggregation");
                    spinner.set_message(message.clone());
                    spinner.enable_steady_tick(Duration::from_millis(120));
                    self.stage_spinner = Some(spinner);
                }
                (Stage::Aggregation, ProgressStatus::Completed) => {
                    self.finish_spinner(format!("{}", "done".green()));
                }
                (Stage::Aggregation, ProgressStatus::Failed) => {
                    self.finish_spinner(format!("{} {}", "x".red(), message));
                }
                (Stage::Error, _) => {
                    if let Some(pb) = self.model_bar.take() {
                        pb.abandon_with_message(format!("{} {}", "x".red(), message));
                    }
                    self.finish_spinner(format!("{} {}", "x".red(), message));
                }
            },
            ProgressEvent::Scenario { .. } => {
                if let Some(line) = describe(event) {
                    let _ = self.multi.println(line);
                }
            }
        }
    }

    fn finish(&mut self) {
        self.finish_model_bar();
        self.finish_spinner(format!("{}", "done".green()));
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressSink for SimpleProgress {
    fn on_event(&mut self, event: &ProgressEvent) {
        if let Some(line) = describe(event) {
            eprintln!("{}", line);
        }
    }
}

/// One-line description of an event; `None` for events not worth a line
pub fn describe(event: &ProgressEvent) -> Option<String> {
    match event {
        ProgressEvent::Model {
            step,
            total,
            role,
            status,
            error,
        } => match status {
            ProgressStatus::Running => None,
            ProgressStatus::Completed => {
                Some(format!("  {} [{}/{}] {}", "v".green(), step, total, role))
            }
            ProgressStatus::Failed => Some(format!(
                "  {} [{}/{}] {} ({})",
                "x".red(),
                step,
                total,
                role,
                error.as_deref().unwrap_or("failed")
            )),
        },
        ProgressEvent::Stage {
            stage,
            status,
            message,
        } => Some(match (stage, status) {
            (Stage::Error, _) | (_, ProgressStatus::Failed) => {
                format!("{} {}", "!!".red(), message)
            }
            (_, ProgressStatus::Running) => format!("{} {}", "->".cyan(), message.bold()),
            (_, ProgressStatus::Completed) => format!("  {} {}", "v".green(), message),
        }),
        ProgressEvent::Scenario {
            index,
            total,
            name,
            status,
            error,
        } => Some(match status {
            ProgressStatus::Running => format!(
                "{} Scenario {}/{}: {}",
                "=>".cyan(),
                index,
                total,
                name.bold()
            ),
            ProgressStatus::Completed => format!("{} Scenario {} complete", "v".green(), name),
            ProgressStatus::Failed => format!(
                "{} Scenario {} failed: {}",
                "x".red(),
                name,
                error.as_deref().unwrap_or("unknown error")
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moa_application::progress_channel;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<ProgressEvent>>>, Arc<Mutex<bool>>);

    impl ProgressSink for Recorder {
        fn on_event(&mut self, event: &ProgressEvent) {
            self.0.lock().unwrap().push(event.clone());
        }

        fn finish(&mut self) {
            *self.1.lock().unwrap() = true;
        }
    }

    #[tokio::test]
    async fn test_spawn_progress_drains_until_senders_drop() {
        let (sender, receiver) = progress_channel();
        let events = Arc::new(Mutex::new(Vec::new()));
        let finished = Arc::new(Mutex::new(false));
        let handle = spawn_progress(receiver, Recorder(events.clone(), finished.clone()));

        sender.stage(
            Stage::Execution,
            ProgressStatus::Running,
            "Executing parallel strategy with 2 models",
        );
        sender.model(1, 2, "Coder", ProgressStatus::Running, None);
        sender.model(1, 2, "Coder", ProgressStatus::Completed, None);
        drop(sender);
        handle.await.unwrap();

        assert_eq!(events.lock().unwrap().len(), 3);
        assert!(*finished.lock().unwrap());
    }

    #[test]
    fn test_describe_skips_running_models() {
        let running = ProgressEvent::Model {
            step: 1,
            total: 3,
            role: "Coder".to_string(),
            status: ProgressStatus::Running,
            error: None,
        };
        assert!(describe(&running).is_none());
    }

    #[test]
    fn test_describe_failed_model_includes_error() {
        let failed = ProgressEvent::Model {
            step: 2,
            total: 3,
            role: "Reviewer".to_string(),
            status: ProgressStatus::Failed,
            error: Some("timeout".to_string()),
        };
        let line = describe(&failed).unwrap();
        assert!(line.contains("[2/3] Reviewer (timeout)"));
    }

    #[test]
    fn test_describe_scenario_events() {
        let event = ProgressEvent::Scenario {
            index: 1,
            total: 2,
            name: "Review".to_string(),
            status: ProgressStatus::Failed,
            error: Some("All models failed to respond".to_string()),
        };
        let line = describe(&event).unwrap();
        assert!(line.contains("Scenario Review failed: All models failed to respond"));
    }

    #[test]
    fn test_reporter_handles_a_full_run() {
        let mut reporter = ProgressReporter::new();
        reporter.on_event(&ProgressEvent::Stage {
            stage: Stage::Execution,
            status: ProgressStatus::Running,
            message: "Executing".to_string(),
        });
        reporter.on_event(&ProgressEvent::Model {
            step: 1,
            total: 1,
            role: "Coder".to_string(),
            status: ProgressStatus::Completed,
            error: None,
        });
        assert!(reporter.model_bar.is_some());
        reporter.on_event(&ProgressEvent::Stage {
            stage: Stage::Aggregation,
            status: ProgressStatus::Running,
            message: "Aggregating".to_string(),
        });
        assert!(reporter.model_bar.is_none());
        assert!(reporter.stage_spinner.is_some());
        reporter.on_event(&ProgressEvent::Stage {
            stage: Stage::Aggregation,
            status: ProgressStatus::Completed,
            message: "Aggregation complete".to_string(),
        });
        assert!(reporter.stage_spinner.is_none());
        reporter.finish();
    }

    #[test]
    fn test_describe_failed_stage() {
        let event = ProgressEvent::Stage {
            stage: Stage::Aggregation,
            status: ProgressStatus::Failed,
            message: "Aggregation failed: Request failed: down".to_string(),
        };
        let line = describe(&event).unwrap();
        assert!(line.contains("!!"));
        assert!(line.ends_with("Aggregation failed: Request failed: down"));
    }
}
