// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mavrk SDK - Token Launch, Lock & Vesting Client
//!
//! Client library for the Mavrk contracts on Ink L2. A [`MavrkClient`]
//! deploys tokens with their liquidity pools, time-locks balances, creates
//! vesting schedules and reads aggregate TVL, all signed by one key. Deployed
//! tokens can be recorded in an off-chain metadata store, and USD prices are
//! fetched from the Relay API.
//!
//! ## Modules
//!
//! - `blockchain` - RPC backend and contract adapters (alloy)
//! - `config` - Network, contract and store configuration
//! - `error` - Error taxonomy
//! - `prices` - Cached USD price quotes
//! - `sdk` - The client facade
//! - `storage` - Token metadata records and image blobs (redb)
//! - `telemetry` - Optional `tracing` subscriber setup
//! - `validation` - Input checks run before any network call

pub mod blockchain;
pub mod config;
pub mod error;
pub mod prices;
pub mod sdk;
pub mod storage;
pub mod telemetry;
pub mod validation;

#[cfg(test)]
mod testing;

pub use blockchain::{
    create_signer, DeploymentResult, DexSelector, LockRecord, NetworkConfig, TvlSnapshot,
    VestingRequest, VestingScheduleInfo,
};
pub use config::{
    ContractAddresses, FactoryRevision, LockDurationUnit, MetadataConfig, SdkConfig,
    VestingRevision,
};
pub use error::{ErrorKind, SdkError, SdkResult};
pub use prices::PriceOracle;
pub use sdk::{Deployment, DeploymentRequest, LockRequest, MavrkClient};
pub use storage::{
    ImageAsset, MetadataStore, StoreError, TokenCategory, TokenMetadata, TokenMetadataRecord,
};
pub use validation::ValidationError;
