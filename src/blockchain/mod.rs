// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration for the Mavrk contracts on Ink.
//!
//! This module provides:
//! - The [`ChainBackend`] seam and its JSON-RPC implementation
//! - Typed adapters for the factory, locker, vesting and lens contracts
//! - ERC-20 allowance handling ahead of token transfers
//! - Receipt event resolution

pub mod client;
pub mod erc20;
pub mod events;
pub mod factory;
pub mod lens;
pub mod locker;
pub mod types;
pub mod vesting;

pub use client::{create_signer, ChainBackend, RpcBackend};
pub use erc20::{ensure_allowance, Erc20Contract};
pub use factory::{DexSelector, DexTarget, FactoryContract};
pub use lens::LensContract;
pub use locker::LockerContract;
pub use types::*;
pub use vesting::{VestingContract, VestingRequest};
