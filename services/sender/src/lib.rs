// Library interface for the sender - exposes modules for testing

pub mod config;
pub mod identity_store;
pub mod ledger_endpoint;
pub mod solana_tx;
