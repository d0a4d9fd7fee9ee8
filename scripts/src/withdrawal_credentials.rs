//! Construction of the execution-layer withdrawal credentials River is
//! initialized with.
//!
//! The credentials are a 32 byte word laid out as
//! `0x01 || 0x00 * 11 || address`, see
//! https://github.com/ethereum/consensus-specs/blob/dev/specs/phase0/validator.md#eth1_address_withdrawal_prefix

use std::str::FromStr;

use alloy_primitives::{hex, Address, B256};

use crate::{
    constants::{
        ETH1_ADDRESS_WITHDRAWAL_PREFIX, HEX_PREFIX, NUM_BYTES_ADDRESS,
        WITHDRAWAL_CREDENTIALS_PADDING_BYTES,
    },
    errors::ScriptError,
};

/// Build the hex-encoded withdrawal credentials pointing at `address`.
///
/// The address must be `0x`-prefixed and consist of exactly 40 hex characters.
/// Its digits are copied verbatim, so checksum casing is preserved in the output.
pub fn build_withdrawal_credentials(address: &str) -> Result<String, ScriptError> {
    let digits = validate_address_format(address)?;

    Ok(format!(
        "{HEX_PREFIX}{}{}{digits}",
        hex::encode(ETH1_ADDRESS_WITHDRAWAL_PREFIX),
        "00".repeat(WITHDRAWAL_CREDENTIALS_PADDING_BYTES),
    ))
}

/// Build the withdrawal credentials pointing at `address` as a `bytes32` word
pub fn withdrawal_credentials_word(address: &str) -> Result<B256, ScriptError> {
    let credentials = build_withdrawal_credentials(address)?;
    B256::from_str(&credentials).map_err(|e| ScriptError::InvalidAddressFormat(e.to_string()))
}

/// Build the withdrawal credentials pointing at an already parsed address
#[must_use]
pub fn eth1_address_withdrawal_credentials(address: Address) -> B256 {
    let mut withdrawal_credentials = B256::ZERO;

    withdrawal_credentials[..ETH1_ADDRESS_WITHDRAWAL_PREFIX.len()]
        .copy_from_slice(ETH1_ADDRESS_WITHDRAWAL_PREFIX);

    withdrawal_credentials[B256::len_bytes() - NUM_BYTES_ADDRESS..]
        .copy_from_slice(address.as_slice());

    withdrawal_credentials
}

/// Check that `address` is a `0x`-prefixed 20 byte hex string, returning its
/// hex digits with the prefix stripped
fn validate_address_format(address: &str) -> Result<&str, ScriptError> {
    let digits = address.strip_prefix(HEX_PREFIX).ok_or_else(|| {
        ScriptError::InvalidAddressFormat(format!("{address} is missing the {HEX_PREFIX} prefix"))
    })?;

    if digits.len() != NUM_BYTES_ADDRESS * 2 {
        return Err(ScriptError::InvalidAddressFormat(format!(
            "{address} has {} hex characters, expected {}",
            digits.len(),
            NUM_BYTES_ADDRESS * 2
        )));
    }

    hex::decode(digits)
        .map_err(|e| ScriptError::InvalidAddressFormat(format!("{address}: {e}")))?;

    Ok(digits)
}
