use super::{CommandError, CommandRunner, Invocation};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs invocations as child processes.
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        debug!(
            command = %invocation,
            dir = %invocation.dir.display(),
            "Running command"
        );

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.dir)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null());
        command
    }

    fn spawn_error(invocation: &Invocation, source: std::io::Error) -> CommandError {
        CommandError::Spawn {
            program: invocation.program.clone(),
            source,
        }
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
        let status = Self::command(invocation)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Self::spawn_error(invocation, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                command: invocation.command_line(),
                code: status.code(),
                output: String::new(),
            })
        }
    }

    async fn output(&self, invocation: &Invocation) -> Result<String, CommandError> {
        let output = Self::command(invocation)
            .output()
            .await
            .map_err(|e| Self::spawn_error(invocation, e))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(combined)
        } else {
            Err(CommandError::Failed {
                command: invocation.command_line(),
                code: output.status.code(),
                output: combined,
            })
        }
    }
}
