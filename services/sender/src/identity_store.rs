//! Durable signing identity
//!
//! `IdentityStore::resolve` loads the keypair file if it exists and otherwise
//! generates a fresh keypair and persists it before returning. The file holds
//! a JSON array of bytes, the same layout the Solana CLI uses for `id.json`.
//!
//! A new file is published with a hard link from a fully written temp file.
//! Filesystems without hard links (vfat, some FUSE mounts) fall back to an
//! exclusive create of the target, which keeps first-writer-wins but lets a
//! concurrent reader observe a partially written file.

use shared::constants::{KEYPAIR_BYTES_LEN, SECRET_SEED_LEN};
use shared::errors::{Result, SenderError};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    signer::{keypair::keypair_from_seed, SignerError},
};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Public address plus the private signing capability
pub struct Identity {
    keypair: Keypair,
}

impl Identity {
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    fn export_bytes(&self) -> [u8; KEYPAIR_BYTES_LEN] {
        self.keypair.to_bytes()
    }
}

impl Signer for Identity {
    fn try_pubkey(&self) -> std::result::Result<Pubkey, SignerError> {
        self.keypair.try_pubkey()
    }

    fn try_sign_message(&self, message: &[u8]) -> std::result::Result<Signature, SignerError> {
        self.keypair.try_sign_message(message)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

// Never print key material.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the identity at `path`, generating and persisting one if absent
    pub fn resolve(&self) -> Result<Identity> {
        match fs::read(&self.path) {
            Ok(contents) => {
                let identity = self.decode(&contents)?;
                info!(
                    path = %self.path.display(),
                    address = %identity.address(),
                    "Loaded existing identity"
                );
                Ok(identity)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.generate(),
            Err(e) => Err(SenderError::storage(self.path.display(), e)),
        }
    }

    fn decode(&self, contents: &[u8]) -> Result<Identity> {
        decode_keypair(contents)
            .map(Identity::from_keypair)
            .map_err(|reason| SenderError::corrupt_identity(self.path.display(), reason))
    }

    fn generate(&self) -> Result<Identity> {
        let identity = Identity::from_keypair(Keypair::new());
        let encoded = encode_keypair(&identity.export_bytes())
            .map_err(|e| SenderError::storage(self.path.display(), e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| SenderError::storage(parent.display(), e))?;
            }
        }

        match self.publish(encoded.as_bytes()) {
            Ok(()) => {
                info!(
                    path = %self.path.display(),
                    address = %identity.address(),
                    "Generated and persisted new identity"
                );
                Ok(identity)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                warn!(
                    path = %self.path.display(),
                    "Identity file was created concurrently, using the existing one"
                );
                let contents = fs::read(&self.path)
                    .map_err(|e| SenderError::storage(self.path.display(), e))?;
                self.decode(&contents)
            }
            Err(e) => Err(SenderError::storage(self.path.display(), e)),
        }
    }

    /// Write `contents` to `path` unless a file is already there
    ///
    /// Fails with `AlreadyExists` when another writer got there first.
    fn publish(&self, contents: &[u8]) -> io::Result<()> {
        let temp_path = self.temp_path();
        if let Err(e) = write_private_file(&temp_path, contents, false) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        // hard_link refuses to overwrite, so the first writer wins.
        let linked = fs::hard_link(&temp_path, &self.path);
        if let Err(e) = fs::remove_file(&temp_path) {
            debug!(path = %temp_path.display(), error = %e, "Failed to remove temporary identity file");
        }

        match linked {
            Err(e) if links_unsupported(&e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Hard links unsupported, writing identity file in place"
                );
                write_private_file(&self.path, contents, true)
            }
            other => other,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "identity".to_string());
        let unique = TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.path.with_file_name(format!(
            ".{}.{}.{}.tmp",
            file_name,
            std::process::id(),
            unique
        ))
    }
}

/// Serialize raw keypair bytes as a JSON array of integers
pub fn encode_keypair(bytes: &[u8]) -> io::Result<String> {
    serde_json::to_string(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Parse a JSON byte array into a keypair
///
/// Accepts a full 64-byte keypair (secret then public key, which must agree)
/// or a bare 32-byte secret seed.
pub fn decode_keypair(contents: &[u8]) -> std::result::Result<Keypair, String> {
    let bytes: Vec<u8> = serde_json::from_slice(contents)
        .map_err(|e| format!("not a JSON byte array: {}", e))?;

    match bytes.len() {
        KEYPAIR_BYTES_LEN => {
            let keypair = Keypair::from_bytes(&bytes)
                .map_err(|e| format!("invalid keypair bytes: {}", e))?;
            if keypair.pubkey().as_ref() != &bytes[SECRET_SEED_LEN..] {
                return Err("public key does not match secret key".to_string());
            }
            Ok(keypair)
        }
        SECRET_SEED_LEN => {
            keypair_from_seed(&bytes).map_err(|e| format!("invalid secret seed: {}", e))
        }
        len => Err(format!(
            "expected {} or {} bytes, found {}",
            KEYPAIR_BYTES_LEN, SECRET_SEED_LEN, len
        )),
    }
}

fn links_unsupported(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::Unsupported | io::ErrorKind::PermissionDenied
    )
}

/// Write an owner-only file; with `exclusive` an existing file is an error
fn write_private_file(path: &Path, contents: &[u8], exclusive: bool) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true);
    if exclusive {
        options.create_new(true);
    } else {
        options.create(true).truncate(true);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
