//! External-process model transport.
//!
//! A [`CommandInvoker`] hands each request to a user-configured shell
//! command. The request (without the credential) is written to the
//! command's stdin as JSON and the command's stdout is the model's reply.
//!
//! The credential travels only through the child's environment:
//!
//! | Variable | Value |
//! |---|---|
//! | `MOA_CREDENTIAL` | provider secret (unset when none is needed) |
//! | `MOA_PROVIDER` | provider id |
//! | `MOA_MODEL` | model id |
//!
//! # Example Configuration
//!
//! ```toml
//! [providers.openai]
//! command = "python3 ~/bin/openai_bridge.py"
//! ```

use async_trait::async_trait;
use moa_application::{InvocationRequest, InvokerError, ModelInvoker};
use moa_domain::Credential;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs one shell command per invocation
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    command: String,
}

impl CommandInvoker {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn shell(&self) -> Command {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", &self.command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", &self.command]);
            c
        };

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ModelInvoker for CommandInvoker {
    async fn invoke(&self, request: InvocationRequest) -> Result<String, InvokerError> {
        let provider = request.provider.to_string();

        let secret = match &request.credential {
            Some(Credential::Secret(secret)) => Some(secret.clone()),
            Some(Credential::NotRequired) => None,
            None if request.provider.requires_credential() => {
                return Err(InvokerError::MissingCredential(provider));
            }
            None => None,
        };

        let payload = serde_json::to_vec(&request)
            .map_err(|e| InvokerError::Transport(format!("Failed to encode request: {e}")))?;

        let mut cmd = self.shell();
        cmd.env("MOA_PROVIDER", &provider)
            .env("MOA_MODEL", &request.model);
        match &secret {
            Some(secret) => cmd.env("MOA_CREDENTIAL", secret),
            None => cmd.env_remove("MOA_CREDENTIAL"),
        };

        debug!(provider = %provider, model = %request.model, "Spawning model command");

        let mut child = cmd
            .spawn()
            .map_err(|e| InvokerError::Transport(format!("Failed to execute command: {e}")))?;

        // Feed stdin while draining stdout, or a chatty command fills the
        // pipe and both sides block. Dropping stdin at the end closes it.
        let stdin = child.stdin.take();
        let write_request = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(&payload).await {
                // Commands that ignore stdin may exit before the write completes.
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            }
        };

        let (written, output) = tokio::join!(write_request, child.wait_with_output());
        written.map_err(|e| InvokerError::Transport(format!("Failed to write request: {e}")))?;
        let output =
            output.map_err(|e| InvokerError::Transport(format!("Failed to read output: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                provider = %provider,
                model = %request.model,
                code = ?output.status.code(),
                "Model command failed"
            );
            let message = if stderr.is_empty() {
                match output.status.code() {
                    Some(code) => format!("command exited with {code}"),
                    None => "command terminated by signal".to_string(),
                }
            } else {
                stderr
            };
            return Err(InvokerError::RequestFailed(message));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(InvokerError::EmptyResponse(format!(
                "{provider}/{}",
                request.model
            )));
        }

        Ok(text)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use moa_domain::{ModelInvocationConfig, Provider};

    fn request(provider: Provider, credential: Option<Credential>) -> InvocationRequest {
        let mut config = ModelInvocationConfig::new("Coder", provider, "gpt-4");
        config.credential = credential;
        InvocationRequest::from_config(&config, config.messages_for("write a parser")).unwrap()
    }

    #[tokio::test]
    async fn test_request_json_on_stdin() {
        let invoker = CommandInvoker::new("cat");
        let reply = invoker
            .invoke(request(
                Provider::OpenAi,
                Some(Credential::secret("sk-hidden")),
            ))
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(json["provider"], "openai");
        assert_eq!(json["model"], "gpt-4");
        assert!(!reply.contains("sk-hidden"));
        assert!(reply.contains("write a parser"));
    }

    #[tokio::test]
    async fn test_large_request_does_not_block_on_pipe_buffer() {
        let mut config = ModelInvocationConfig::new("Coder", Provider::Ollama, "llama3");
        config.credential = None;
        let prompt = "x".repeat(512 * 1024);
        let request =
            InvocationRequest::from_config(&config, config.messages_for(&prompt)).unwrap();

        let reply = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            CommandInvoker::new("cat").invoke(request),
        )
        .await
        .expect("command invocation stalled")
        .unwrap();

        assert!(reply.len() > prompt.len());
        assert!(reply.contains(&prompt));
    }

    #[tokio::test]
    async fn test_credential_passed_through_env() {
        let invoker = CommandInvoker::new("printf '%s' \"$MOA_CREDENTIAL:$MOA_MODEL\"");
        let reply = invoker
            .invoke(request(Provider::Claude, Some(Credential::secret("sk-7"))))
            .await
            .unwrap();
        assert_eq!(reply, "sk-7:gpt-4");
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let invoker = CommandInvoker::new("echo 'rate limited' >&2; exit 3");
        let err = invoker
            .invoke(request(Provider::OpenAi, Some(Credential::secret("k"))))
            .await
            .unwrap_err();
        assert_eq!(err, InvokerError::RequestFailed("rate limited".to_string()));
    }

    #[tokio::test]
    async fn test_non_zero_exit_without_stderr() {
        let invoker = CommandInvoker::new("exit 4");
        let err = invoker
            .invoke(request(Provider::Ollama, None))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            InvokerError::RequestFailed("command exited with 4".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_output_is_rejected() {
        let invoker = CommandInvoker::new("true");
        let err = invoker
            .invoke(request(Provider::Ollama, None))
            .await
            .unwrap_err();
        assert!(matches!(err, InvokerError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_credential_rejected_before_spawn() {
        let invoker = CommandInvoker::new("echo should-not-run");
        let err = invoker
            .invoke(request(Provider::Gemini, None))
            .await
            .unwrap_err();
        assert_eq!(err, InvokerError::MissingCredential("gemini".to_string()));
    }

    #[tokio::test]
    async fn test_keyless_provider_runs_without_credential() {
        let invoker = CommandInvoker::new("printf 'ok:%s' \"${MOA_CREDENTIAL:-none}\"");
        let reply = invoker
            .invoke(request(Provider::Ollama, None))
            .await
            .unwrap();
        assert_eq!(reply, "ok:none");
    }
}
