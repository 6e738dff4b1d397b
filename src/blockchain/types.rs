// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use alloy::primitives::{Log, U256};
use serde::{Deserialize, Serialize};

/// Ink L2 mainnet chain ID.
pub const INK_CHAIN_ID: u64 = 57073;

/// Public Ink RPC endpoint.
pub const INK_RPC_URL: &str = "https://rpc-gel.inkonchain.com";

/// Ink block explorer.
pub const INK_EXPLORER_URL: &str = "https://explorer.inkonchain.com";

/// Network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: String,
    /// Short tag stored with token metadata (e.g. "ink")
    pub tag: String,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Block explorer URL
    pub explorer_url: String,
}

impl NetworkConfig {
    /// Ink L2 mainnet with its public RPC.
    pub fn ink_mainnet() -> Self {
        Self {
            name: "Ink".to_string(),
            tag: "ink".to_string(),
            chain_id: INK_CHAIN_ID,
            rpc_url: INK_RPC_URL.to_string(),
            explorer_url: INK_EXPLORER_URL.to_string(),
        }
    }

    /// Explorer link for a transaction.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

/// Transaction receipt after inclusion.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    /// Transaction hash (0x-prefixed hex)
    pub tx_hash: String,
    /// Block number where transaction was included
    pub block_number: u64,
    /// Gas actually used
    pub gas_used: u64,
    /// Whether the transaction was successful
    pub success: bool,
    /// Logs emitted, in log-index order
    pub logs: Vec<Log>,
}

/// Result of a successful token deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    /// Address of the new token, taken from the `TokenDeployed` event
    pub token_address: String,
    /// Deployment transaction hash
    pub tx_hash: String,
    /// Liquidity pool created for the token, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_address: Option<String>,
    /// Liquidity position NFT id, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_id: Option<U256>,
}

/// A lock owned by the caller, as reported by the locker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Index in the user's lock list; pass to `unlock`
    pub lock_id: u64,
    pub amount: U256,
    /// Unix seconds
    pub lock_time: u64,
    /// Unix seconds
    pub unlock_time: u64,
    pub withdrawn: bool,
}

/// A lock on a token, with its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLockRecord {
    pub user: String,
    pub amount: U256,
    pub lock_time: u64,
    pub unlock_time: u64,
    pub withdrawn: bool,
}

/// Total value locked, recomputed on every query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TvlSnapshot {
    pub total_value_usd: f64,
    pub position_count: usize,
}

impl TvlSnapshot {
    /// Combine two snapshots.
    pub fn merge(self, other: TvlSnapshot) -> TvlSnapshot {
        TvlSnapshot {
            total_value_usd: self.total_value_usd + other.total_value_usd,
            position_count: self.position_count + other.position_count,
        }
    }
}

/// Vesting schedule state (schedule revision).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingScheduleInfo {
    pub beneficiary: Option<String>,
    pub total_amount: U256,
    pub released: U256,
    pub start_time: u64,
    pub cliff_duration: u64,
    pub vesting_duration: u64,
    pub revoked: bool,
}

/// Format token units to a human-readable amount.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }
}

/// Saturating conversion for on-chain timestamps and durations.
pub(crate) fn to_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
