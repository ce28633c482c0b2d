use super::{CommandError, CommandRunner, Invocation};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Run,
    Output,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub invocation: Invocation,
}

#[derive(Debug, Clone)]
enum Outcome {
    Success(String),
    Exit(i32, String),
    SpawnFailure,
}

/// Records every invocation and answers from prefix-matched rules.
///
/// Invocations without a matching rule succeed with empty output.
pub struct MockCommandRunner {
    rules: Mutex<Vec<(String, Outcome)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeed_with(&self, command_prefix: &str, output: &str) {
        self.push_rule(command_prefix, Outcome::Success(output.to_string()));
    }

    pub fn fail_with(&self, command_prefix: &str, code: i32, output: &str) {
        self.push_rule(command_prefix, Outcome::Exit(code, output.to_string()));
    }

    pub fn fail_to_spawn(&self, command_prefix: &str) {
        self.push_rule(command_prefix, Outcome::SpawnFailure);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| call.invocation.command_line())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn find(&self, command_prefix: &str) -> Option<RecordedCall> {
        self.calls()
            .into_iter()
            .find(|call| call.invocation.command_line().starts_with(command_prefix))
    }

    fn push_rule(&self, command_prefix: &str, outcome: Outcome) {
        self.rules
            .lock()
            .unwrap()
            .push((command_prefix.to_string(), outcome));
    }

    fn answer(&self, kind: CallKind, invocation: &Invocation) -> Result<String, CommandError> {
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            invocation: invocation.clone(),
        });

        let command_line = invocation.command_line();
        let outcome = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| command_line.starts_with(prefix.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or(Outcome::Success(String::new()));

        match outcome {
            Outcome::Success(output) => Ok(output),
            Outcome::Exit(code, output) => Err(CommandError::Failed {
                command: command_line,
                code: Some(code),
                output,
            }),
            Outcome::SpawnFailure => Err(CommandError::Spawn {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock spawn failure"),
            }),
        }
    }
}

impl Default for MockCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
        self.answer(CallKind::Run, invocation).map(|_| ())
    }

    async fn output(&self, invocation: &Invocation) -> Result<String, CommandError> {
        self.answer(CallKind::Output, invocation)
    }
}
