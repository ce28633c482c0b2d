//! External command execution for testable tool invocations

mod mock;
mod real;
mod r#trait;

pub use mock::{CallKind, MockCommandRunner, RecordedCall};
pub use r#trait::{CommandError, CommandRunner, Invocation};
pub use real::SystemCommandRunner;
