// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet signature verification.
//!
//! Wallets sign challenges with `personal_sign` (EIP-191): the message is
//! prefixed with `"\x19Ethereum Signed Message:\n" + len` before hashing, and
//! the 65-byte `r || s || v` signature lets the signer address be recovered.

use std::str::FromStr;

use alloy::hex;
use alloy::primitives::{Address, Signature};

/// Length of an `r || s || v` secp256k1 signature.
const SIGNATURE_LEN: usize = 65;

/// Verification input could not be parsed.
///
/// A well-formed signature from the wrong key is not an error; it verifies
/// as `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    #[error("could not recover signer: {0}")]
    Recovery(String),
}

/// Checks that `signature` over `message` was produced by the key behind `address`.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, address: &str, message: &[u8], signature: &str) -> Result<bool, SignatureError>;
}

/// EIP-191 `personal_sign` verification for `0x`-prefixed Ethereum addresses.
///
/// Address comparison ignores hex case, so checksummed and lowercase
/// addresses are equivalent.
#[derive(Debug, Default, Clone, Copy)]
pub struct Eip191Verifier;

impl SignatureVerifier for Eip191Verifier {
    fn verify(&self, address: &str, message: &[u8], signature: &str) -> Result<bool, SignatureError> {
        let expected = Address::from_str(address.trim())
            .map_err(|e| SignatureError::InvalidAddress(e.to_string()))?;

        let bytes = hex::decode(signature.trim())
            .map_err(|e| SignatureError::MalformedSignature(format!("invalid hex: {e}")))?;
        if bytes.len() != SIGNATURE_LEN {
            return Err(SignatureError::MalformedSignature(format!(
                "expected {SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let signature = Signature::try_from(bytes.as_slice())
            .map_err(|e| SignatureError::MalformedSignature(e.to_string()))?;

        let recovered = signature
            .recover_address_from_msg(message)
            .map_err(|e| SignatureError::Recovery(e.to_string()))?;

        Ok(recovered == expected)
    }
}
