//! Command bodies for `bhashctl`.
//!
//! Each `run_*` resolves configuration (environment first, flags on top),
//! performs one operation, and prints pretty JSON.
use crate::cli::{BootstrapArgs, CreateDatasetArgs, FlureeArgs, GenerateArgs, TransactArgs};
use crate::fluree::{
    CreateDatasetRequest, FlureeClient, FlureeConfig, PromptEndpoint, PromptRequest,
    TransactionRequest, Transactor,
};
use crate::hedera::{
    load_bootstrap_spec, AccountRecord, BootstrapSpec, Bootstrapper, HederaConfig,
    HederaOverrides, LiveNetwork, MockNetwork, Network, RunContext, TokenRecord, TopicRecord,
};
use crate::util::{print_json, read_json, write_json};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::time::{Duration, Instant};

/// Everything a bootstrap run reports.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapOutput {
    pub network: String,
    pub ledger: String,
    pub accounts: Vec<AccountRecord>,
    pub topics: Vec<TopicRecord>,
    pub tokens: Vec<TokenRecord>,
    pub transaction: TransactionRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fluree_response: Option<Value>,
}

pub fn run_hedera_bootstrap(args: BootstrapArgs) -> Result<()> {
    let spec = load_bootstrap_spec(&args.spec)?
        .with_overrides(args.network.as_deref(), args.ledger.as_deref());
    if spec.ledger.is_empty() {
        return Err(anyhow!(
            "ledger is required (pass --ledger or set \"ledger\" in the spec)"
        ));
    }

    let config = HederaConfig::from_env().with_overrides(&HederaOverrides {
        network: Some(spec.network.as_str()),
        operator_account_id: args.operator_id.as_deref(),
        operator_private_key: args.operator_key.as_deref(),
        mirror_network_url: args.mirror_url.as_deref(),
    });
    config.validate().context("hedera configuration")?;

    // Resolve Fluree credentials up front so a bad config fails before any
    // artifact is created.
    let client = if args.commit {
        Some(fluree_client(&args.fluree)?)
    } else {
        None
    };
    let transactor = client.as_ref().map(|client| client as &dyn Transactor);

    let ctx = match args.timeout_secs {
        0 => RunContext::background(),
        secs => RunContext::with_timeout(Duration::from_secs(secs)),
    };
    let output = if args.live {
        let network = LiveNetwork::open(&config).context("open live hedera network")?;
        bootstrap_output(&network, &ctx, &spec, transactor)?
    } else {
        let network = MockNetwork::new(config.network.clone());
        bootstrap_output(&network, &ctx, &spec, transactor)?
    };

    match &args.out {
        Some(path) => {
            write_json(path, &output)?;
            tracing::info!(path = %path.display(), "wrote bootstrap result");
            Ok(())
        }
        None => print_json(&output),
    }
}

/// Run the bootstrap, release the backend, project, and optionally commit.
///
/// The backend is released whether or not the run succeeded.
pub fn bootstrap_output(
    network: &dyn Network,
    ctx: &RunContext,
    spec: &BootstrapSpec,
    transactor: Option<&dyn Transactor>,
) -> Result<BootstrapOutput> {
    let executed = Bootstrapper::new(network).execute(ctx, spec);
    let released = network.release();
    let result = match (executed, released) {
        (Ok(result), Ok(())) => result,
        (Ok(_), Err(release_err)) => {
            return Err(anyhow::Error::new(release_err).context("release hedera network"))
        }
        (Err(run_err), Ok(())) => {
            return Err(anyhow::Error::new(run_err).context("hedera bootstrap"))
        }
        (Err(run_err), Err(release_err)) => {
            tracing::warn!(error = %release_err, "release hedera network after failed bootstrap");
            return Err(anyhow::Error::new(run_err).context(format!(
                "hedera bootstrap (release hedera network also failed: {release_err})"
            )));
        }
    };
    if result.is_empty() {
        tracing::warn!("spec declares no artifacts; the transaction has nothing to insert");
    }

    let transaction = result.transaction(&spec.ledger);
    let fluree_response = match transactor {
        Some(transactor) => {
            let started = Instant::now();
            let response = transactor
                .transact(&transaction)
                .context("commit transaction to fluree")?;
            tracing::info!(
                ledger = %spec.ledger,
                nodes = transaction.insert.len(),
                elapsed_ms = started.elapsed().as_millis(),
                "committed bootstrap transaction"
            );
            Some(response)
        }
        None => None,
    };

    Ok(BootstrapOutput {
        network: result.network,
        ledger: spec.ledger.clone(),
        accounts: result.accounts,
        topics: result.topics,
        tokens: result.tokens,
        transaction,
        fluree_response,
    })
}

pub fn run_fluree_create_dataset(args: CreateDatasetArgs) -> Result<()> {
    let client = fluree_client(&args.fluree)?;
    for (flag, value) in [
        ("--owner", &args.owner),
        ("--dataset-name", &args.dataset_name),
        ("--description", &args.description),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!("{flag} cannot be blank"));
        }
    }
    let response = client.create_dataset(
        &args.owner,
        &CreateDatasetRequest {
            dataset_name: args.dataset_name,
            storage_type: args.storage_type,
            description: args.description,
            visibility: args.visibility,
            tags: args.tags,
        },
    )?;
    print_json(&response)
}

pub fn run_fluree_transact(args: TransactArgs) -> Result<()> {
    let client = fluree_client(&args.fluree)?;
    let request = transaction_from_files(&args)?;
    let response = client.transact(&request)?;
    print_json(&response)
}

pub fn run_fluree_generate(args: GenerateArgs, endpoint: PromptEndpoint) -> Result<()> {
    let client = fluree_client(&args.fluree)?;
    if args.prompt.trim().is_empty() {
        return Err(anyhow!("--prompt cannot be blank"));
    }
    let response = client.generate(
        &args.owner,
        endpoint,
        &PromptRequest {
            datasets: args.datasets,
            prompt: args.prompt,
        },
    )?;
    print_json(&response)
}

fn fluree_client(args: &FlureeArgs) -> Result<FlureeClient> {
    let config = FlureeConfig::from_env().with_overrides(
        args.api_token.as_deref(),
        args.tenant.as_deref(),
        args.base_url.as_deref(),
    );
    config.validate()?;
    Ok(FlureeClient::new(config))
}

fn transaction_from_files(args: &TransactArgs) -> Result<TransactionRequest> {
    let ledger = args.ledger.trim();
    if ledger.is_empty() {
        return Err(anyhow!("--ledger cannot be blank"));
    }
    Ok(TransactionRequest {
        ledger: ledger.to_string(),
        context: args
            .context
            .as_deref()
            .map(|path| read_json::<Map<String, Value>>(path).context("load context payload"))
            .transpose()?,
        insert: load_statements(args.insert.as_deref(), "insert")?,
        delete: load_statements(args.delete.as_deref(), "delete")?,
        where_clause: load_statements(args.where_clause.as_deref(), "where")?,
    })
}

fn load_statements(path: Option<&Path>, label: &str) -> Result<Vec<Map<String, Value>>> {
    match path {
        Some(path) => read_json(path).with_context(|| format!("load {label} payload")),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
