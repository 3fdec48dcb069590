use anyhow::{bail, Context};
use serde::Deserialize;
use shared::constants::{
    DEFAULT_CLUSTER, DEFAULT_COMMITMENT, DEFAULT_KEYPAIR_RELATIVE_PATH, DEFAULT_RPC_TIMEOUT_SECS,
    DEFAULT_RPC_URL,
};
use shared::program_ids::GREETER_PROGRAM_ID;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub identity: IdentityConfig,
    pub solana: SolanaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub keypair_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaConfig {
    pub rpc_url: String,
    pub commitment: String,
    pub cluster: String,
    pub program_id: String,
    pub skip_preflight: bool,
    pub rpc_timeout_seconds: u64,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let keypair_path = match get("SENDER_KEYPAIR_PATH") {
            Some(path) => PathBuf::from(path),
            None => match get("HOME") {
                Some(home) => PathBuf::from(home).join(DEFAULT_KEYPAIR_RELATIVE_PATH),
                None => bail!("SENDER_KEYPAIR_PATH must be set when HOME is not"),
            },
        };

        Ok(Config {
            identity: IdentityConfig { keypair_path },
            solana: SolanaConfig {
                rpc_url: get("SOLANA_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
                commitment: get("SOLANA_COMMITMENT")
                    .unwrap_or_else(|| DEFAULT_COMMITMENT.to_string()),
                cluster: get("SOLANA_CLUSTER").unwrap_or_else(|| DEFAULT_CLUSTER.to_string()),
                program_id: get("GREETER_PROGRAM_ID")
                    .unwrap_or_else(|| GREETER_PROGRAM_ID.to_string()),
                skip_preflight: match get("SOLANA_SKIP_PREFLIGHT") {
                    Some(value) => parse_bool(&value)
                        .with_context(|| format!("SOLANA_SKIP_PREFLIGHT={:?}", value))?,
                    None => false,
                },
                rpc_timeout_seconds: get("SOLANA_RPC_TIMEOUT_SECONDS")
                    .unwrap_or_else(|| DEFAULT_RPC_TIMEOUT_SECS.to_string())
                    .parse()
                    .context("SOLANA_RPC_TIMEOUT_SECONDS must be a whole number of seconds")?,
            },
        })
    }
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => bail!("expected a boolean, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("HOME", "/home/alice")])).unwrap();

        assert_eq!(
            config.identity.keypair_path,
            PathBuf::from("/home/alice/.config/solana/id.json")
        );
        assert_eq!(config.solana.rpc_url, "https://api.devnet.solana.com");
        assert_eq!(config.solana.commitment, "confirmed");
        assert_eq!(config.solana.cluster, "devnet");
        assert_eq!(config.solana.program_id, GREETER_PROGRAM_ID);
        assert!(!config.solana.skip_preflight);
        assert_eq!(config.solana.rpc_timeout_seconds, 30);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SENDER_KEYPAIR_PATH", "/etc/sender/id.json"),
            ("SOLANA_RPC_URL", "http://127.0.0.1:8899"),
            ("SOLANA_CLUSTER", "custom"),
            ("SOLANA_SKIP_PREFLIGHT", "TRUE"),
            ("SOLANA_RPC_TIMEOUT_SECONDS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.identity.keypair_path, PathBuf::from("/etc/sender/id.json"));
        assert_eq!(config.solana.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(config.solana.cluster, "custom");
        assert!(config.solana.skip_preflight);
        assert_eq!(config.solana.rpc_timeout_seconds, 5);
    }

    #[test]
    fn test_missing_home_and_path_fails() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_invalid_values_fail() {
        let bad_bool = Config::from_lookup(lookup(&[
            ("HOME", "/home/alice"),
            ("SOLANA_SKIP_PREFLIGHT", "maybe"),
        ]));
        assert!(bad_bool.is_err());

        let bad_timeout = Config::from_lookup(lookup(&[
            ("HOME", "/home/alice"),
            ("SOLANA_RPC_TIMEOUT_SECONDS", "soon"),
        ]));
        assert!(bad_timeout.is_err());
    }
}
