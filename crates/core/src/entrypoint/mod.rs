//! Locating a web framework's management entry point inside the build directory

mod finder;
mod mock;
mod r#trait;

pub use finder::{ManagePyFinder, MANAGE_PY};
pub use mock::MockEntryPointFinder;
pub use r#trait::{EntryPointError, EntryPointFinder};
