//! CommandRunner trait definition

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {}", exit_description(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

impl CommandError {
    /// Exit code of a command that ran to completion, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::Failed { code, .. } => *code,
            CommandError::Spawn { .. } => None,
        }
    }

    /// Captured output of a failed command; empty for streamed runs.
    pub fn output(&self) -> &str {
        match self {
            CommandError::Failed { output, .. } => output,
            CommandError::Spawn { .. } => "",
        }
    }
}

/// One program invocation: what to run, where, and with which extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: dir.as_ref().to_path_buf(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Program and arguments as one shell-like line.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Abstraction over running external tools
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion, streaming output to this process's stdout/stderr.
    async fn run(&self, invocation: &Invocation) -> Result<(), CommandError>;

    /// Run to completion and return combined stdout and stderr.
    async fn output(&self, invocation: &Invocation) -> Result<String, CommandError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let invocation = Invocation::new("pip", "/app")
            .arg("install")
            .args(["-r", "requirements.txt"])
            .envs([("PATH", "/deps/0/bin")]);

        assert_eq!(invocation.command_line(), "pip install -r requirements.txt");
        assert_eq!(invocation.dir, PathBuf::from("/app"));
        assert_eq!(invocation.env_var("PATH"), Some("/deps/0/bin"));
        assert_eq!(invocation.env_var("HOME"), None);
    }

    #[test]
    fn test_later_env_entries_win() {
        let invocation = Invocation::new("python", "/app")
            .envs([("LANG", "C")])
            .envs([("LANG", "en_US.UTF-8")]);

        assert_eq!(invocation.env_var("LANG"), Some("en_US.UTF-8"));
    }

    #[test]
    fn test_failed_error_display() {
        let err = CommandError::Failed {
            command: "pip-grep -s requirements.txt pylibmc".to_string(),
            code: Some(1),
            output: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "'pip-grep -s requirements.txt pylibmc' exited with status 1"
        );
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_signal_error_display() {
        let err = CommandError::Failed {
            command: "python setup.py install".to_string(),
            code: None,
            output: "Killed".to_string(),
        };
        assert!(err.to_string().ends_with("exited with a signal"));
        assert_eq!(err.output(), "Killed");
    }
}
