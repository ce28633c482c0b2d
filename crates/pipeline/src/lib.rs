pub mod finalize;
pub mod probe;
pub mod shebang;
pub mod step_trait;
pub mod supply;

pub use finalize::{FinalizeContext, FinalizeOrchestrator};
pub use probe::Probe;
pub use step_trait::{FinalizeStep, SupplyStep};
pub use supply::{SupplyContext, SupplyOrchestrator};
