// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token factory contract.
//!
//! Two factory revisions exist on-chain and differ only in how the liquidity
//! destination is chosen: an integer tier mapped to a preconfigured pool
//! manager, or an explicit NonfungiblePositionManager address. The revision
//! is fixed when the adapter is built.

use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    sol,
};

use super::client::{transact, view, ChainBackend};
use super::events::{find_event, require_event};
use super::types::DeploymentResult;
use crate::config::FactoryRevision;
use crate::error::SdkResult;
use crate::validation::{ensure_factory_revision, parse_address, validate_tier, ValidationError};

sol! {
    interface ITieredTokenFactory {
        function newMavrkToken(string _name, string _symbol, uint8 poolManagerTier) external;
        function poolManagers(uint8 tier) external view returns (address);
        function nftCreators(uint256 tokenId) external view returns (address);
        function creatorNFTs(address creator) external view returns (uint256[]);
    }

    interface IPositionManagerTokenFactory {
        function newMavrkToken(string _name, string _symbol, address positionManager) external;
    }

    event TokenDeployed(address tokenAddress, string name, string symbol, address indexed creator);
    event PoolInitialized(address pool);
    event LiquidityMinted(uint256 tokenId, address indexed creator);
    event NFTLocked(uint256 tokenId, address indexed creator);
}

/// Where the factory should seed liquidity for a new token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DexSelector {
    /// Preconfigured pool manager tier (1, 2 or 3).
    Tier(u8),
    /// NonfungiblePositionManager address.
    PositionManager(String),
}

impl DexSelector {
    /// Factory revision this selector is valid for.
    pub fn revision(&self) -> FactoryRevision {
        match self {
            DexSelector::Tier(_) => FactoryRevision::Tiered,
            DexSelector::PositionManager(_) => FactoryRevision::PositionManager,
        }
    }

    /// Tier number, when tier based.
    pub fn tier(&self) -> Option<u8> {
        match self {
            DexSelector::Tier(tier) => Some(*tier),
            DexSelector::PositionManager(_) => None,
        }
    }

    /// Validate the tier or parse the position manager address.
    pub fn resolve(&self) -> Result<DexTarget, ValidationError> {
        match self {
            DexSelector::Tier(tier) => {
                validate_tier(*tier)?;
                Ok(DexTarget::Tier(*tier))
            }
            DexSelector::PositionManager(raw) => {
                parse_address("position manager", raw).map(DexTarget::PositionManager)
            }
        }
    }
}

/// Liquidity destination after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DexTarget {
    Tier(u8),
    PositionManager(Address),
}

/// Token factory adapter.
#[derive(Clone)]
pub struct FactoryContract {
    backend: Arc<dyn ChainBackend>,
    address: Address,
    revision: FactoryRevision,
}

impl FactoryContract {
    pub fn new(backend: Arc<dyn ChainBackend>, address: Address, revision: FactoryRevision) -> Self {
        Self {
            backend,
            address,
            revision,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn revision(&self) -> FactoryRevision {
        self.revision
    }

    /// Deploy a token with its liquidity pool and wait for inclusion.
    ///
    /// The token address comes from the `TokenDeployed` event; a receipt
    /// without it is an error even though the transaction succeeded. Pool
    /// and position id are filled in when their events are present.
    pub async fn deploy(
        &self,
        name: &str,
        symbol: &str,
        target: DexTarget,
    ) -> SdkResult<DeploymentResult> {
        let receipt = match target {
            DexTarget::Tier(tier) => {
                ensure_factory_revision(FactoryRevision::Tiered, self.revision)?;
                validate_tier(tier)?;
                tracing::info!(token_name = name, token_symbol = symbol, tier, "Deploying token");
                transact(
                    self.backend.as_ref(),
                    self.address,
                    ITieredTokenFactory::newMavrkTokenCall {
                        _name: name.to_string(),
                        _symbol: symbol.to_string(),
                        poolManagerTier: tier,
                    },
                )
                .await?
            }
            DexTarget::PositionManager(position_manager) => {
                ensure_factory_revision(FactoryRevision::PositionManager, self.revision)?;
                tracing::info!(
                    token_name = name,
                    token_symbol = symbol,
                    position_manager = %position_manager,
                    "Deploying token"
                );
                transact(
                    self.backend.as_ref(),
                    self.address,
                    IPositionManagerTokenFactory::newMavrkTokenCall {
                        _name: name.to_string(),
                        _symbol: symbol.to_string(),
                        positionManager: position_manager,
                    },
                )
                .await?
            }
        };

        tracing::info!(
            tx_hash = %receipt.tx_hash,
            block = receipt.block_number,
            gas_used = receipt.gas_used,
            "Deployment included"
        );

        let deployed = require_event::<TokenDeployed>(&receipt, self.address, "TokenDeployed")?;
        let pool_address =
            find_event::<PoolInitialized>(&receipt, self.address).map(|e| format!("{:#x}", e.pool));
        let position_id = find_event::<LiquidityMinted>(&receipt, self.address).map(|e| e.tokenId);
        if let Some(locked) = find_event::<NFTLocked>(&receipt, self.address) {
            tracing::debug!(position_id = %locked.tokenId, "Liquidity position locked");
        }

        let result = DeploymentResult {
            token_address: format!("{:#x}", deployed.tokenAddress),
            tx_hash: receipt.tx_hash,
            pool_address,
            position_id,
        };
        tracing::info!(
            token = %result.token_address,
            pool = ?result.pool_address,
            "Token deployed"
        );
        Ok(result)
    }

    /// Pool manager configured for a tier.
    pub async fn pool_manager(&self, tier: u8) -> SdkResult<Address> {
        validate_tier(tier)?;
        view(
            self.backend.as_ref(),
            self.address,
            ITieredTokenFactory::poolManagersCall { tier },
        )
        .await
    }

    /// Creator recorded for a liquidity position NFT.
    pub async fn nft_creator(&self, token_id: U256) -> SdkResult<Address> {
        view(
            self.backend.as_ref(),
            self.address,
            ITieredTokenFactory::nftCreatorsCall { tokenId: token_id },
        )
        .await
    }

    /// Liquidity position NFTs created by `creator`.
    pub async fn creator_nfts(&self, creator: Address) -> SdkResult<Vec<U256>> {
        view(
            self.backend.as_ref(),
            self.address,
            ITieredTokenFactory::creatorNFTsCall { creator },
        )
        .await
    }
}
