//! First phase: install the interpreter, its tooling and the application's packages.

pub mod context;
pub mod orchestrator;
pub mod steps;

pub use context::SupplyContext;
pub use orchestrator::SupplyOrchestrator;
