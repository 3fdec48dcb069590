/// Data model for a single transaction submission
///
/// A `TransactionRequest` describes one instruction. The sender adds the fee
/// payer and a `RecencyAnchor` when it assembles the envelope.

use serde::{Deserialize, Serialize};
use solana_sdk::{
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use std::fmt;

use crate::constants::{EXPLORER_TX_BASE_URL, MAINNET_CLUSTER};

/// Access mode of an account reference
///
/// Discriminants match the role numbering of the JS client kit
/// (0 = read-only ... 3 = writable signer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Readonly = 0,
    Writable = 1,
    ReadonlySigner = 2,
    WritableSigner = 3,
}

impl AccountRole {
    pub fn is_signer(self) -> bool {
        matches!(self, AccountRole::ReadonlySigner | AccountRole::WritableSigner)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, AccountRole::Writable | AccountRole::WritableSigner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountReference {
    pub address: Pubkey,
    pub role: AccountRole,
}

impl AccountReference {
    pub fn new(address: Pubkey, role: AccountRole) -> Self {
        Self { address, role }
    }

    pub fn readonly(address: Pubkey) -> Self {
        Self::new(address, AccountRole::Readonly)
    }

    pub fn writable(address: Pubkey) -> Self {
        Self::new(address, AccountRole::Writable)
    }

    pub fn to_account_meta(&self) -> AccountMeta {
        if self.role.is_writable() {
            AccountMeta::new(self.address, self.role.is_signer())
        } else {
            AccountMeta::new_readonly(self.address, self.role.is_signer())
        }
    }
}

/// One instruction targeting `program_id`
///
/// Account order is passed through untouched; it must match what the
/// target program expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountReference>,
    pub data: Vec<u8>,
}

impl TransactionRequest {
    pub fn new(program_id: Pubkey, accounts: Vec<AccountReference>, data: Vec<u8>) -> Self {
        Self {
            program_id,
            accounts,
            data,
        }
    }

    /// Empty-payload request that passes the program account itself read-only
    pub fn greeting(program_id: Pubkey) -> Self {
        Self::new(program_id, vec![AccountReference::readonly(program_id)], Vec::new())
    }

    pub fn to_instruction(&self) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: self
                .accounts
                .iter()
                .map(AccountReference::to_account_meta)
                .collect(),
            data: self.data.clone(),
        }
    }
}

/// Recent blockhash bounding the validity window of a transaction
///
/// Fetched fresh for every submission; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyAnchor(pub Hash);

impl RecencyAnchor {
    pub fn hash(&self) -> Hash {
        self.0
    }
}

impl From<Hash> for RecencyAnchor {
    fn from(hash: Hash) -> Self {
        Self(hash)
    }
}

impl fmt::Display for RecencyAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options forwarded with `sendTransaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOptions {
    /// Skip the endpoint's simulation pass
    pub skip_preflight: bool,
    /// Commitment used by the endpoint for preflight
    pub preflight_commitment: String,
}

impl SendOptions {
    pub fn new(skip_preflight: bool, preflight_commitment: impl Into<String>) -> Self {
        Self {
            skip_preflight,
            preflight_commitment: preflight_commitment.into(),
        }
    }
}

/// Endpoint-assigned transaction signature
///
/// Acceptance into the pending pool only; says nothing about finality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub signature: String,
}

impl SubmissionResult {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }

    /// Explorer link for this signature on `cluster`
    pub fn explorer_url(&self, cluster: &str) -> String {
        if cluster.is_empty() || cluster == MAINNET_CLUSTER {
            format!("{}/{}", EXPLORER_TX_BASE_URL, self.signature)
        } else {
            format!("{}/{}?cluster={}", EXPLORER_TX_BASE_URL, self.signature, cluster)
        }
    }
}

impl fmt::Display for SubmissionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature)
    }
}
