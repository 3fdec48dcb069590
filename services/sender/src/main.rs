use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sender::config::Config;
use sender::identity_store::IdentityStore;
use sender::ledger_endpoint::RpcLedgerEndpoint;
use sender::solana_tx::TransactionSubmitter;
use shared::errors::SenderError;
use shared::program_ids::parse_program_id;
use shared::types::{SendOptions, TransactionRequest};

#[tokio::main]
async fn main() -> Result<()> {
    // Human-readable by default; LOG_FORMAT=json for machine consumption
    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "text".to_string())
        .eq_ignore_ascii_case("json");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sender=info".into());

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!(
        service = "sender",
        version = env!("CARGO_PKG_VERSION"),
        "Starting greeter sender"
    );

    let config = Config::load()?;
    info!(
        rpc_url = %config.solana.rpc_url,
        cluster = %config.solana.cluster,
        program_id = %config.solana.program_id,
        keypair_path = %config.identity.keypair_path.display(),
        "Configuration loaded"
    );

    let program_id = parse_program_id(&config.solana.program_id).map_err(report)?;

    let identity = IdentityStore::new(&config.identity.keypair_path)
        .resolve()
        .map_err(report)?;
    info!(fee_payer = %identity.address(), "Identity ready");

    let endpoint = Arc::new(RpcLedgerEndpoint::new(
        config.solana.rpc_url.clone(),
        &config.solana.commitment,
        Duration::from_secs(config.solana.rpc_timeout_seconds),
    ));
    let submitter = TransactionSubmitter::new(
        endpoint,
        SendOptions::new(config.solana.skip_preflight, config.solana.commitment.clone()),
    );

    submitter.check_fee_payer_balance(&identity.address()).await;

    let request = TransactionRequest::greeting(program_id);
    let result = submitter.submit(&identity, &request).await.map_err(report)?;

    println!("Transaction sent!");
    println!("Signature: {}", result);
    println!("View on explorer: {}", result.explorer_url(&config.solana.cluster));

    Ok(())
}

/// Log a pipeline failure at the severity its category calls for
fn report(error: SenderError) -> SenderError {
    let category = error.category();
    if category.log_level() == "warn" {
        warn!(code = error.code(), category = %category, error = %error, "Sender failed");
    } else {
        error!(code = error.code(), category = %category, error = %error, "Sender failed");
    }
    error
}
