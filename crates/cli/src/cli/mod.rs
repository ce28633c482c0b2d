pub mod commands;

pub use commands::{Phase, StagingCli};
