use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod fluree;
mod hedera;
#[cfg(test)]
mod test_support;
mod util;
mod workflow;

use cli::{Command, FlureeCommand, HederaCommand, RootArgs};
use fluree::PromptEndpoint;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Hedera(HederaCommand::Bootstrap(args)) => workflow::run_hedera_bootstrap(args),
        Command::Fluree(command) => match command {
            FlureeCommand::CreateDataset(args) => workflow::run_fluree_create_dataset(args),
            FlureeCommand::Transact(args) => workflow::run_fluree_transact(args),
            FlureeCommand::GenerateSparql(args) => {
                workflow::run_fluree_generate(args, PromptEndpoint::GenerateSparql)
            }
            FlureeCommand::GenerateAnswer(args) => {
                workflow::run_fluree_generate(args, PromptEndpoint::GenerateAnswer)
            }
            FlureeCommand::GeneratePrompt(args) => {
                workflow::run_fluree_generate(args, PromptEndpoint::GeneratePrompt)
            }
        },
    }
}

/// Logs go to stderr so stdout stays pure JSON.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
