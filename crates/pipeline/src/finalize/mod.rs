//! Second phase: application-specific work once the dependency root is in place.
//!
//! Nothing is shared in memory with the supply phase; the build environment is
//! re-derived from what supply persisted under the dependency root.

pub mod context;
pub mod orchestrator;
pub mod steps;

pub use context::FinalizeContext;
pub use orchestrator::FinalizeOrchestrator;
