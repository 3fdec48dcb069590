/// Shared constants for the greeter sender
///
/// Defaults here are only consulted by the outermost configuration layer.
/// Components always receive explicit values.

/// Public devnet JSON-RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Cluster name used in explorer links
pub const DEFAULT_CLUSTER: &str = "devnet";

/// Cluster for which explorer links carry no `cluster` query parameter
pub const MAINNET_CLUSTER: &str = "mainnet-beta";

/// Commitment used for the recency anchor and preflight
pub const DEFAULT_COMMITMENT: &str = "confirmed";

/// Transport deadline for a single RPC call
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Identity file location relative to the user's home directory
///
/// Same location the Solana CLI uses, so an existing CLI wallet is picked up.
pub const DEFAULT_KEYPAIR_RELATIVE_PATH: &str = ".config/solana/id.json";

/// Transaction explorer base URL
pub const EXPLORER_TX_BASE_URL: &str = "https://explorer.solana.com/tx";

/// Length of a full keypair file (ed25519 secret followed by public key)
pub const KEYPAIR_BYTES_LEN: usize = 64;

/// Length of a bare ed25519 secret seed
pub const SECRET_SEED_LEN: usize = 32;

/// Lamports per SOL, for human-readable balance logging
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
