//! Transaction assembly, signing and submission
//!
//! One `submit` call is one attempt: fetch a blockhash, build a v0 message,
//! sign it, encode it and hand it to the endpoint. The first failure ends the
//! call; nothing is retried here.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::constants::LAMPORTS_PER_SOL;
use shared::errors::{Result, SenderError};
use shared::types::{RecencyAnchor, SendOptions, SubmissionResult, TransactionRequest};
use solana_sdk::{
    message::{v0, VersionedMessage},
    packet::PACKET_DATA_SIZE,
    pubkey::Pubkey,
    signature::Signer,
    transaction::VersionedTransaction,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::ledger_endpoint::LedgerEndpoint;

pub struct TransactionSubmitter {
    endpoint: Arc<dyn LedgerEndpoint>,
    options: SendOptions,
}

impl TransactionSubmitter {
    pub fn new(endpoint: Arc<dyn LedgerEndpoint>, options: SendOptions) -> Self {
        Self { endpoint, options }
    }

    /// Build, sign and submit `request` with `signer` as fee payer
    pub async fn submit(
        &self,
        signer: &dyn Signer,
        request: &TransactionRequest,
    ) -> Result<SubmissionResult> {
        let payer = signer
            .try_pubkey()
            .map_err(|e| SenderError::Signing(e.to_string()))?;
        validate_request(&payer, request)?;

        let anchor = self.endpoint.latest_anchor().await?;

        let message = assemble_message(&payer, &anchor, request)?;
        let transaction = sign_message(message, signer)?;
        let encoded = encode_transaction(&transaction)?;

        info!(
            fee_payer = %payer,
            program_id = %request.program_id,
            blockhash = %anchor,
            encoded_len = encoded.len(),
            skip_preflight = self.options.skip_preflight,
            "Submitting transaction"
        );

        let signature = self.endpoint.submit_encoded(&encoded, &self.options).await?;

        info!(signature = %signature, "Transaction accepted by endpoint");
        Ok(SubmissionResult::new(signature))
    }

    /// Log the fee payer's balance, warning when it cannot cover fees
    ///
    /// Advisory only: a failed lookup is logged and never stops a submission.
    pub async fn check_fee_payer_balance(&self, payer: &Pubkey) -> Option<u64> {
        match self.endpoint.balance(payer).await {
            Ok(0) => {
                warn!(
                    fee_payer = %payer,
                    "Fee payer has 0 SOL balance, fund it first (solana airdrop 1 {})",
                    payer
                );
                Some(0)
            }
            Ok(lamports) => {
                info!(
                    fee_payer = %payer,
                    lamports,
                    sol = lamports as f64 / LAMPORTS_PER_SOL as f64,
                    "Fee payer balance"
                );
                Some(lamports)
            }
            Err(e) => {
                warn!(fee_payer = %payer, error = %e, "Could not fetch fee payer balance");
                None
            }
        }
    }
}

/// Reject requests that need a signature we cannot provide
///
/// The fee payer is the only available signer.
pub fn validate_request(payer: &Pubkey, request: &TransactionRequest) -> Result<()> {
    if let Some(account) = request
        .accounts
        .iter()
        .find(|account| account.role.is_signer() && account.address != *payer)
    {
        return Err(SenderError::InvalidRequest(format!(
            "account {} is marked as signer but only the fee payer {} can sign",
            account.address, payer
        )));
    }

    Ok(())
}

/// Compile an unsigned v0 message; pure and deterministic
pub fn assemble_message(
    payer: &Pubkey,
    anchor: &RecencyAnchor,
    request: &TransactionRequest,
) -> Result<VersionedMessage> {
    validate_request(payer, request)?;

    let message = v0::Message::try_compile(payer, &[request.to_instruction()], &[], anchor.hash())
        .map_err(|e| SenderError::InvalidRequest(format!("failed to compile message: {}", e)))?;

    debug!(
        fee_payer = %payer,
        account_keys = message.account_keys.len(),
        "Assembled v0 message"
    );

    Ok(VersionedMessage::V0(message))
}

pub fn sign_message(message: VersionedMessage, signer: &dyn Signer) -> Result<VersionedTransaction> {
    let signature = signer
        .try_sign_message(&message.serialize())
        .map_err(|e| SenderError::Signing(e.to_string()))?;

    Ok(VersionedTransaction {
        signatures: vec![signature],
        message,
    })
}

/// Wire-encode a signed transaction as base64
pub fn encode_transaction(transaction: &VersionedTransaction) -> Result<String> {
    let bytes = bincode::serialize(transaction).map_err(|e| {
        SenderError::InvalidRequest(format!("failed to serialize transaction: {}", e))
    })?;

    if bytes.len() > PACKET_DATA_SIZE {
        return Err(SenderError::InvalidRequest(format!(
            "transaction is {} bytes, limit is {}",
            bytes.len(),
            PACKET_DATA_SIZE
        )));
    }

    Ok(STANDARD.encode(bytes))
}
