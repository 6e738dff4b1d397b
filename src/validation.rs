// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Input validation for facade requests.
//!
//! Every check is pure and returns `Err(ValidationError)` with a readable
//! reason instead of panicking. The facade runs these before any network
//! call; callers may also use them directly to pre-validate user input.

use std::str::FromStr;

use alloy::primitives::{Address, U256};

use crate::config::{FactoryRevision, VestingRevision};

/// Maximum token name length, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum token symbol length, in characters.
pub const MAX_SYMBOL_LEN: usize = 10;

/// Maximum lock duration (~10 years).
pub const MAX_DURATION_DAYS: u32 = 3650;

/// A caller-supplied parameter violated a constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Token name cannot be empty")]
    EmptyName,

    #[error("Token name must be {MAX_NAME_LEN} characters or less (got {0})")]
    NameTooLong(usize),

    #[error("Token symbol cannot be empty")]
    EmptySymbol,

    #[error("Token symbol must be {MAX_SYMBOL_LEN} characters or less (got {0})")]
    SymbolTooLong(usize),

    #[error("Token symbol must contain only letters and numbers")]
    SymbolFormat,

    #[error("Invalid {field} address: {reason}")]
    InvalidAddress { field: &'static str, reason: String },

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Duration must be between 1 and {MAX_DURATION_DAYS} days (got {0})")]
    DurationOutOfRange(u32),

    #[error("Pool manager tier must be 1, 2, or 3 (got {0})")]
    InvalidTier(u8),

    #[error("Vesting option must be 1, 2, 3, or 4 (got {0})")]
    InvalidVestingOption(u8),

    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("Request targets the {requested} protocol revision but the client is configured for {configured}")]
    RevisionMismatch {
        requested: &'static str,
        configured: &'static str,
    },
}

pub type ValidationResult = Result<(), ValidationError>;

/// Validate a token name: non-blank and at most 50 characters.
pub fn validate_token_name(name: &str) -> ValidationResult {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong(len));
    }
    Ok(())
}

/// Validate a token symbol: non-blank, at most 10 characters, ASCII
/// letters and digits only.
pub fn validate_token_symbol(symbol: &str) -> ValidationResult {
    if symbol.trim().is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    let len = symbol.chars().count();
    if len > MAX_SYMBOL_LEN {
        return Err(ValidationError::SymbolTooLong(len));
    }
    if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::SymbolFormat);
    }
    Ok(())
}

/// Parse and validate an EVM address.
///
/// Accepts `0x` followed by 40 hex digits. All-lowercase and all-uppercase
/// hex are accepted as-is; mixed case must match the EIP-55 checksum.
pub fn parse_address(field: &'static str, raw: &str) -> Result<Address, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidAddress {
        field,
        reason: reason.to_string(),
    };

    let hex = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| invalid("missing 0x prefix"))?;

    if hex.len() != 40 {
        return Err(invalid("expected 40 hex digits"));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{hex}"), None)
            .map_err(|_| invalid("bad EIP-55 checksum"))
    } else {
        Address::from_str(hex).map_err(|e| invalid(&e.to_string()))
    }
}

/// Validate an EVM address without keeping the parsed value.
pub fn validate_address(field: &'static str, raw: &str) -> ValidationResult {
    parse_address(field, raw).map(|_| ())
}

/// Validate that an amount is strictly positive.
pub fn validate_amount(amount: U256) -> ValidationResult {
    if amount.is_zero() {
        return Err(ValidationError::ZeroAmount);
    }
    Ok(())
}

/// Validate a lock duration in days: `0 < days <= 3650`.
pub fn validate_duration(days: u32) -> ValidationResult {
    if days == 0 || days > MAX_DURATION_DAYS {
        return Err(ValidationError::DurationOutOfRange(days));
    }
    Ok(())
}

/// Validate a pool manager tier (1, 2 or 3).
pub fn validate_tier(tier: u8) -> ValidationResult {
    if !(1..=3).contains(&tier) {
        return Err(ValidationError::InvalidTier(tier));
    }
    Ok(())
}

/// Validate a preset vesting option (1=30d, 2=60d, 3=90d, 4=180d).
pub fn validate_vesting_option(option: u8) -> ValidationResult {
    if !(1..=4).contains(&option) {
        return Err(ValidationError::InvalidVestingOption(option));
    }
    Ok(())
}

/// Validate an optional URL field. Absent or blank values pass.
pub fn validate_optional_url(field: &'static str, value: Option<&str>) -> ValidationResult {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(()),
        Some(raw) => url::Url::parse(raw)
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidUrl {
                field,
                reason: e.to_string(),
            }),
    }
}

/// Ensure a DEX selection matches the deployed factory revision.
pub fn ensure_factory_revision(
    requested: FactoryRevision,
    configured: FactoryRevision,
) -> ValidationResult {
    if requested != configured {
        return Err(ValidationError::RevisionMismatch {
            requested: requested.as_str(),
            configured: configured.as_str(),
        });
    }
    Ok(())
}

/// Ensure a vesting request matches the deployed vesting revision.
pub fn ensure_vesting_revision(
    requested: VestingRevision,
    configured: VestingRevision,
) -> ValidationResult {
    if requested != configured {
        return Err(ValidationError::RevisionMismatch {
            requested: requested.as_str(),
            configured: configured.as_str(),
        });
    }
    Ok(())
}
