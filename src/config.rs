// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Client Configuration
//!
//! Everything the client needs is carried by an explicit [`SdkConfig`]
//! injected at construction. There is no process-wide default holding
//! contract addresses or credentials; [`SdkConfig::from_env`] is a
//! convenience loader for deployments configured through the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MAVRK_RPC_URL` | JSON-RPC endpoint | Ink public RPC |
//! | `MAVRK_CHAIN_ID` | Chain ID | `57073` |
//! | `MAVRK_TOKEN_FACTORY` | Token factory address | Required |
//! | `MAVRK_TOKEN_LOCKER` | Token locker address | Required |
//! | `MAVRK_VESTING` | Vesting contract address | Required |
//! | `MAVRK_LENS` | Lens contract address | Required |
//! | `MAVRK_FACTORY_REVISION` | `tiered` or `position-manager` | `position-manager` |
//! | `MAVRK_VESTING_REVISION` | `schedule` or `preset` | `preset` |
//! | `MAVRK_LOCK_DURATION_UNIT` | `seconds` or `days` | `seconds` |
//! | `MAVRK_PRICE_API_URL` | Price quote API base URL | `https://api.relay.link` |
//! | `MAVRK_PRICE_CACHE_TTL_SECS` | Price cache TTL, `0` disables | `60` |
//! | `MAVRK_METADATA_DB` | redb file for token metadata | Optional |
//! | `MAVRK_BLOB_ROOT` | Directory for logo/cover uploads | Required with `MAVRK_METADATA_DB` |
//! | `MAVRK_BLOB_PUBLIC_URL` | Public base URL for uploaded images | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::blockchain::NetworkConfig;
use crate::error::SdkError;

pub const RPC_URL_ENV: &str = "MAVRK_RPC_URL";
pub const CHAIN_ID_ENV: &str = "MAVRK_CHAIN_ID";
pub const TOKEN_FACTORY_ENV: &str = "MAVRK_TOKEN_FACTORY";
pub const TOKEN_LOCKER_ENV: &str = "MAVRK_TOKEN_LOCKER";
pub const VESTING_ENV: &str = "MAVRK_VESTING";
pub const LENS_ENV: &str = "MAVRK_LENS";
pub const FACTORY_REVISION_ENV: &str = "MAVRK_FACTORY_REVISION";
pub const VESTING_REVISION_ENV: &str = "MAVRK_VESTING_REVISION";
pub const LOCK_DURATION_UNIT_ENV: &str = "MAVRK_LOCK_DURATION_UNIT";
pub const PRICE_API_URL_ENV: &str = "MAVRK_PRICE_API_URL";
pub const PRICE_CACHE_TTL_ENV: &str = "MAVRK_PRICE_CACHE_TTL_SECS";
pub const METADATA_DB_ENV: &str = "MAVRK_METADATA_DB";
pub const BLOB_ROOT_ENV: &str = "MAVRK_BLOB_ROOT";
pub const BLOB_PUBLIC_URL_ENV: &str = "MAVRK_BLOB_PUBLIC_URL";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Relay currency API used for USD quotes.
pub const DEFAULT_PRICE_API_URL: &str = "https://api.relay.link";

/// Default lifetime of a cached price quote.
pub const DEFAULT_PRICE_CACHE_TTL: Duration = Duration::from_secs(60);

/// How the deployed factory picks the liquidity destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactoryRevision {
    /// `newMavrkToken(string,string,uint8)`: integer tier mapped to a
    /// preconfigured pool manager.
    Tiered,
    /// `newMavrkToken(string,string,address)`: explicit position manager.
    PositionManager,
}

impl FactoryRevision {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactoryRevision::Tiered => "tiered",
            FactoryRevision::PositionManager => "position-manager",
        }
    }
}

impl FromStr for FactoryRevision {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiered" | "tier" => Ok(Self::Tiered),
            "position-manager" | "npm" => Ok(Self::PositionManager),
            other => Err(SdkError::Config(format!("unknown factory revision `{other}`"))),
        }
    }
}

/// Which vesting contract ABI is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VestingRevision {
    /// Beneficiary, start, cliff and duration chosen by the caller.
    Schedule,
    /// Fixed presets (1=30d, 2=60d, 3=90d, 4=180d).
    Preset,
}

impl VestingRevision {
    pub fn as_str(&self) -> &'static str {
        match self {
            VestingRevision::Schedule => "schedule",
            VestingRevision::Preset => "preset",
        }
    }
}

impl FromStr for VestingRevision {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "schedule" => Ok(Self::Schedule),
            "preset" => Ok(Self::Preset),
            other => Err(SdkError::Config(format!("unknown vesting revision `{other}`"))),
        }
    }
}

/// Unit the deployed locker expects for `lock(token, amount, duration)`.
///
/// The contract accepts any value without complaint, so a wrong unit
/// silently creates locks of the wrong length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LockDurationUnit {
    Seconds,
    Days,
}

impl LockDurationUnit {
    /// Convert a day count into the on-chain duration argument.
    pub fn encode_days(&self, days: u32) -> u64 {
        match self {
            LockDurationUnit::Seconds => u64::from(days) * 86_400,
            LockDurationUnit::Days => u64::from(days),
        }
    }
}

impl FromStr for LockDurationUnit {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seconds" | "secs" => Ok(Self::Seconds),
            "days" => Ok(Self::Days),
            other => Err(SdkError::Config(format!("unknown lock duration unit `{other}`"))),
        }
    }
}

/// Deployed contract addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAddresses {
    pub token_factory: Address,
    pub token_locker: Address,
    pub vesting: Address,
    pub lens: Address,
}

impl ContractAddresses {
    /// Production deployment on Ink mainnet.
    pub fn ink_mainnet() -> Self {
        Self {
            token_factory: address!("D827F74E292060D4B495b7b82d6f2470C59ce89d"),
            token_locker: address!("d2C5947A6777500D9b7ad55a4D48AeF855AE6aBA"),
            vesting: address!("9496Ff7A7BE0A91F582Baa96ac12a0A36300750c"),
            lens: address!("89C17fEBb23d78802c85B541275a5689aec5852D"),
        }
    }
}

/// Off-chain metadata projection settings.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    /// redb database file.
    pub db_path: PathBuf,
    /// Directory receiving logo/cover uploads.
    pub blob_root: PathBuf,
    /// Public URL the blob root is served under, if any.
    pub public_base_url: Option<String>,
}

/// Full client configuration.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub network: NetworkConfig,
    pub contracts: ContractAddresses,
    pub factory_revision: FactoryRevision,
    pub vesting_revision: VestingRevision,
    pub lock_duration_unit: LockDurationUnit,
    pub price_api_url: String,
    pub price_cache_ttl: Duration,
    pub metadata: Option<MetadataConfig>,
}

impl SdkConfig {
    /// Build a configuration for `network` with the given contracts and the
    /// default revisions, price API and no metadata store.
    pub fn new(network: NetworkConfig, contracts: ContractAddresses) -> Self {
        Self {
            network,
            contracts,
            factory_revision: FactoryRevision::PositionManager,
            vesting_revision: VestingRevision::Preset,
            lock_duration_unit: LockDurationUnit::Seconds,
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            price_cache_ttl: DEFAULT_PRICE_CACHE_TTL,
            metadata: None,
        }
    }

    /// Load the configuration from `MAVRK_*` environment variables.
    pub fn from_env() -> Result<Self, SdkError> {
        let mut network = NetworkConfig::ink_mainnet();
        if let Some(rpc_url) = env_optional(RPC_URL_ENV) {
            network.rpc_url = rpc_url;
        }
        if let Some(chain_id) = env_optional(CHAIN_ID_ENV) {
            network.chain_id = chain_id
                .parse()
                .map_err(|e| SdkError::Config(format!("{CHAIN_ID_ENV}: {e}")))?;
        }

        let contracts = ContractAddresses {
            token_factory: env_address(TOKEN_FACTORY_ENV)?,
            token_locker: env_address(TOKEN_LOCKER_ENV)?,
            vesting: env_address(VESTING_ENV)?,
            lens: env_address(LENS_ENV)?,
        };

        let mut config = Self::new(network, contracts);

        if let Some(raw) = env_optional(FACTORY_REVISION_ENV) {
            config.factory_revision = raw.parse()?;
        }
        if let Some(raw) = env_optional(VESTING_REVISION_ENV) {
            config.vesting_revision = raw.parse()?;
        }
        if let Some(raw) = env_optional(LOCK_DURATION_UNIT_ENV) {
            config.lock_duration_unit = raw.parse()?;
        }
        config.price_api_url = env_or_default(PRICE_API_URL_ENV, DEFAULT_PRICE_API_URL);
        if let Some(raw) = env_optional(PRICE_CACHE_TTL_ENV) {
            let secs: u64 = raw
                .parse()
                .map_err(|e| SdkError::Config(format!("{PRICE_CACHE_TTL_ENV}: {e}")))?;
            config.price_cache_ttl = Duration::from_secs(secs);
        }

        if let Some(db_path) = env_optional(METADATA_DB_ENV) {
            config.metadata = Some(MetadataConfig {
                db_path: PathBuf::from(db_path),
                blob_root: PathBuf::from(env_required(BLOB_ROOT_ENV)?),
                public_base_url: env_optional(BLOB_PUBLIC_URL_ENV),
            });
        }

        Ok(config)
    }
}

fn env_required(name: &str) -> Result<String, SdkError> {
    env_optional(name).ok_or_else(|| SdkError::Config(format!("{name} is not set")))
}

fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}

fn env_address(name: &str) -> Result<Address, SdkError> {
    let raw = env_required(name)?;
    Address::from_str(&raw).map_err(|e| SdkError::Config(format!("{name}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_unit_conversion() {
        assert_eq!(LockDurationUnit::Seconds.encode_days(30), 2_592_000);
        assert_eq!(LockDurationUnit::Days.encode_days(30), 30);
        assert_eq!(LockDurationUnit::Seconds.encode_days(3650), 315_360_000);
    }

    #[test]
    fn revisions_parse_from_strings() {
        assert_eq!("tiered".parse::<FactoryRevision>().unwrap(), FactoryRevision::Tiered);
        assert_eq!(
            " NPM ".parse::<FactoryRevision>().unwrap(),
            FactoryRevision::PositionManager
        );
        assert_eq!("preset".parse::<VestingRevision>().unwrap(), VestingRevision::Preset);
        assert_eq!("Days".parse::<LockDurationUnit>().unwrap(), LockDurationUnit::Days);
        assert!(matches!(
            "weeks".parse::<LockDurationUnit>(),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn new_config_has_no_metadata_store() {
        let contracts = ContractAddresses {
            token_factory: Address::repeat_byte(1),
            token_locker: Address::repeat_byte(2),
            vesting: Address::repeat_byte(3),
            lens: Address::repeat_byte(4),
        };
        let config = SdkConfig::new(NetworkConfig::ink_mainnet(), contracts);
        assert!(config.metadata.is_none());
        assert_eq!(config.lock_duration_unit, LockDurationUnit::Seconds);
        assert_eq!(config.price_api_url, DEFAULT_PRICE_API_URL);
    }

    #[test]
    fn mainnet_contracts_are_distinct() {
        let contracts = ContractAddresses::ink_mainnet();
        let all = [
            contracts.token_factory,
            contracts.token_locker,
            contracts.vesting,
            contracts.lens,
        ];
        for (i, a) in all.iter().enumerate() {
            assert!(!a.is_zero());
            assert!(all[i + 1..].iter().all(|b| b != a));
        }
    }
}
