//! Remote ledger capability
//!
//! The submitter only needs three calls from a node: a fresh blockhash, raw
//! transaction submission, and a balance lookup. `RpcLedgerEndpoint` serves
//! them over JSON-RPC; tests substitute their own implementation.

use async_trait::async_trait;
use serde_json::json;
use shared::errors::{Result, SenderError};
use shared::types::{RecencyAnchor, SendOptions};
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_request::{RpcError, RpcRequest, RpcResponseErrorData},
};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// JSON-RPC error codes that describe the node rather than the transaction
const JSON_RPC_INTERNAL_ERROR: i64 = -32603;
const JSON_RPC_NODE_UNHEALTHY: i64 = -32005;
const JSON_RPC_MIN_CONTEXT_SLOT_NOT_REACHED: i64 = -32016;

#[async_trait]
pub trait LedgerEndpoint: Send + Sync {
    /// Fetch the latest blockhash
    async fn latest_anchor(&self) -> Result<RecencyAnchor>;

    /// Submit a base64-encoded signed transaction, returning its signature
    async fn submit_encoded(&self, encoded: &str, options: &SendOptions) -> Result<String>;

    /// Balance of `address` in lamports
    async fn balance(&self, address: &Pubkey) -> Result<u64>;
}

pub struct RpcLedgerEndpoint {
    client: RpcClient,
    url: String,
}

impl RpcLedgerEndpoint {
    pub fn new(url: String, commitment: &str, timeout: Duration) -> Self {
        let client =
            RpcClient::new_with_timeout_and_commitment(url.clone(), timeout, parse_commitment(commitment));

        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LedgerEndpoint for RpcLedgerEndpoint {
    async fn latest_anchor(&self) -> Result<RecencyAnchor> {
        let blockhash = self.client.get_latest_blockhash().await.map_err(|e| {
            SenderError::EndpointUnavailable(format!(
                "failed to fetch latest blockhash from {}: {}",
                self.url, e
            ))
        })?;

        debug!(rpc_url = %self.url, blockhash = %blockhash, "Fetched latest blockhash");
        Ok(RecencyAnchor(blockhash))
    }

    async fn submit_encoded(&self, encoded: &str, options: &SendOptions) -> Result<String> {
        let params = json!([
            encoded,
            {
                "encoding": "base64",
                "skipPreflight": options.skip_preflight,
                "preflightCommitment": options.preflight_commitment,
            }
        ]);

        let signature: String = self
            .client
            .send(RpcRequest::SendTransaction, params)
            .await
            .map_err(map_submit_error)?;

        check_returned_signature(signature)
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        self.client.get_balance(address).await.map_err(|e| {
            SenderError::EndpointUnavailable(format!("failed to fetch balance of {}: {}", address, e))
        })
    }
}

pub fn parse_commitment(commitment: &str) -> CommitmentConfig {
    match commitment {
        "processed" => CommitmentConfig::processed(),
        "confirmed" => CommitmentConfig::confirmed(),
        "finalized" => CommitmentConfig::finalized(),
        _ => CommitmentConfig::confirmed(),
    }
}

/// The node must answer `sendTransaction` with a base58 signature
pub fn check_returned_signature(signature: String) -> Result<String> {
    match Signature::from_str(&signature) {
        Ok(_) => Ok(signature),
        Err(e) => Err(SenderError::EndpointUnavailable(format!(
            "endpoint returned malformed signature {:?}: {}",
            signature, e
        ))),
    }
}

fn is_node_health_code(code: i64) -> bool {
    matches!(
        code,
        JSON_RPC_INTERNAL_ERROR | JSON_RPC_NODE_UNHEALTHY | JSON_RPC_MIN_CONTEXT_SLOT_NOT_REACHED
    )
}

/// Split `sendTransaction` failures into refusals and transport problems
///
/// A JSON-RPC error object or a transaction error means the node looked at
/// the transaction and said no, unless the error code only reports node
/// health. Everything else means we never got a usable answer.
pub fn map_submit_error(error: ClientError) -> SenderError {
    match error.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError { code, message, .. })
            if is_node_health_code(*code) =>
        {
            SenderError::EndpointUnavailable(format!("{} (code {})", message, code))
        }
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            code,
            message,
            data,
        }) => {
            let mut reason = format!("{} (code {})", message, code);
            if let RpcResponseErrorData::SendTransactionPreflightFailure(simulation) = data {
                if let Some(logs) = simulation.logs.as_ref().filter(|logs| !logs.is_empty()) {
                    reason.push_str(&format!("; logs: {}", logs.join(" | ")));
                }
            }
            SenderError::rejected(reason)
        }
        ClientErrorKind::TransactionError(tx_error) => SenderError::rejected(tx_error.to_string()),
        _ => SenderError::EndpointUnavailable(error.to_string()),
    }
}
