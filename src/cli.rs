//! CLI argument parsing for `bhashctl`.
//!
//! Parsing only; every command body lives in `workflow`.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default deadline for a bootstrap run, checked between ledger calls.
///
/// Fluree requests are bounded by the client's own request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "bhashctl",
    version,
    about = "Bootstrap Hedera artifacts and publish them to Fluree as JSON-LD",
    after_help = "Examples:\n  bhashctl hedera bootstrap --spec bootstrap.json --ledger tenant/dataset\n  bhashctl hedera bootstrap --spec bootstrap.json --live --commit\n  bhashctl fluree transact --ledger tenant/dataset --insert insert.json\n  bhashctl fluree generate-sparql --owner tenant --dataset tenant/dataset --prompt \"List tokens\"",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Log progress to stderr (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Hedera network operations
    #[command(subcommand)]
    Hedera(HederaCommand),
    /// Fluree Cloud operations
    #[command(subcommand)]
    Fluree(FlureeCommand),
}

#[derive(Subcommand, Debug)]
pub enum HederaCommand {
    Bootstrap(BootstrapArgs),
}

#[derive(Subcommand, Debug)]
pub enum FlureeCommand {
    CreateDataset(CreateDatasetArgs),
    Transact(TransactArgs),
    GenerateSparql(GenerateArgs),
    GenerateAnswer(GenerateArgs),
    GeneratePrompt(GenerateArgs),
}

/// Fluree credentials shared by every command that talks to Fluree.
#[derive(Args, Debug, Clone, Default)]
pub struct FlureeArgs {
    /// Fluree API token (defaults to $FLUREE_API_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub api_token: Option<String>,

    /// Fluree tenant handle (defaults to $FLUREE_HANDLE)
    #[arg(long, value_name = "HANDLE")]
    pub tenant: Option<String>,

    /// Fluree API base URL (defaults to $FLUREE_BASE_URL)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Bootstrap inputs: the spec, backend selection, and publishing options.
#[derive(Parser, Debug)]
#[command(about = "Create the accounts, topics, and tokens named in a spec")]
pub struct BootstrapArgs {
    /// Path to the bootstrap spec JSON
    #[arg(long, value_name = "PATH")]
    pub spec: PathBuf,

    /// Fluree ledger identifier (owner/dataset); defaults to the spec's ledger
    #[arg(long, value_name = "ID")]
    pub ledger: Option<String>,

    /// Submit to a real Hedera network instead of the simulator
    #[arg(long)]
    pub live: bool,

    /// Submit the generated transaction to Fluree
    #[arg(long)]
    pub commit: bool,

    /// Hedera network (overrides the spec and $HEDERA_NETWORK)
    #[arg(long, value_name = "NAME")]
    pub network: Option<String>,

    /// Hedera operator account id
    #[arg(long, value_name = "ID")]
    pub operator_id: Option<String>,

    /// Hedera operator private key
    #[arg(long, value_name = "KEY")]
    pub operator_key: Option<String>,

    /// Hedera mirror node address used by --live (host:port)
    #[arg(long, value_name = "URL")]
    pub mirror_url: Option<String>,

    #[command(flatten)]
    pub fluree: FlureeArgs,

    /// Abort the run after this many seconds (0 disables the deadline)
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Write the result JSON here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Create a Fluree dataset")]
pub struct CreateDatasetArgs {
    #[command(flatten)]
    pub fluree: FlureeArgs,

    /// Owner handle responsible for the dataset
    #[arg(long)]
    pub owner: String,

    #[arg(long)]
    pub dataset_name: String,

    #[arg(long, default_value = "sparql")]
    pub storage_type: String,

    #[arg(long)]
    pub description: String,

    #[arg(long, default_value = "private")]
    pub visibility: String,

    /// Tag to apply to the dataset (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Submit a transaction assembled from JSON files")]
pub struct TransactArgs {
    #[command(flatten)]
    pub fluree: FlureeArgs,

    #[arg(long, value_name = "ID")]
    pub ledger: String,

    /// JSON file holding an array of insert statements
    #[arg(long, value_name = "PATH")]
    pub insert: Option<PathBuf>,

    /// JSON file holding an array of delete statements
    #[arg(long, value_name = "PATH")]
    pub delete: Option<PathBuf>,

    /// JSON file holding a where clause array
    #[arg(long = "where", value_name = "PATH")]
    pub where_clause: Option<PathBuf>,

    /// JSON file holding a JSON-LD context object
    #[arg(long, value_name = "PATH")]
    pub context: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Call a Fluree generation endpoint")]
pub struct GenerateArgs {
    #[command(flatten)]
    pub fluree: FlureeArgs,

    /// Owner handle responsible for the datasets
    #[arg(long)]
    pub owner: String,

    /// Prompt or question to send
    #[arg(long)]
    pub prompt: String,

    /// Dataset identifier to include (repeatable)
    #[arg(long = "dataset", value_name = "ID")]
    pub datasets: Vec<String>,
}
