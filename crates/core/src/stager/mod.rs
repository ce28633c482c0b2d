//! Staging directory layout: build directory, dependency root and its
//! persisted environment.

mod mock;
mod real;
mod r#trait;

pub use mock::{MockStager, StagerCall};
pub use r#trait::{Stager, StagerError};
pub use real::DirStager;
