use pybuildpack_cli::cli::{Phase, StagingCli};
use std::process;

#[tokio::main]
async fn main() {
    let cli = StagingCli::parse_for(Phase::Supply);
    let exit_code = pybuildpack_cli::run(Phase::Supply, cli).await;
    process::exit(exit_code);
}
