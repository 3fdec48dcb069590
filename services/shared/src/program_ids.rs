//! Program IDs used by the sender
//!
//! The default target is the greeter program deployed on devnet.

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::errors::{Result, SenderError};

/// Greeter program ID on devnet
pub const GREETER_PROGRAM_ID: &str = "Xx7cEWNkXWJWjRNNwXZZxicQpL2abzwhWHroXD64fSE";

/// Parse a base58 program ID
///
/// # Errors
/// Returns `InvalidRequest` if the string is not a valid Pubkey
pub fn parse_program_id(id: &str) -> Result<Pubkey> {
    Pubkey::from_str(id.trim())
        .map_err(|e| SenderError::InvalidRequest(format!("invalid program id {:?}: {}", id, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeter_program_id_constant_is_valid() {
        let parsed = parse_program_id(GREETER_PROGRAM_ID).unwrap();
        assert_eq!(parsed.to_string(), GREETER_PROGRAM_ID);
    }

    #[test]
    fn test_parse_program_id_trims_whitespace() {
        let parsed = parse_program_id(&format!("  {}\n", GREETER_PROGRAM_ID)).unwrap();
        assert_eq!(parsed.to_string(), GREETER_PROGRAM_ID);
    }

    #[test]
    fn test_parse_program_id_rejects_garbage() {
        let err = parse_program_id("not-a-pubkey").unwrap_err();
        assert_eq!(err.code(), "REQUEST_INVALID");
    }
}
