// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Mavrk client facade
//!
//! [`MavrkClient`] bundles the contract adapters, the metadata registry and
//! the price oracle behind one object bound to a single signer.
//!
//! Every state-changing operation runs in a fixed order:
//!
//! 1. validate the request (no network traffic on failure)
//! 2. approve the spender when the allowance is short
//! 3. submit the contract call and wait for inclusion
//! 4. resolve the expected events from the receipt
//! 5. record off-chain metadata (deployments only, best-effort)
//!
//! Once step 3 succeeds the on-chain change is final. Off-chain failures
//! after that point are reported as warnings, never as errors.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    signers::local::PrivateKeySigner,
};
use serde::{Deserialize, Serialize};

use crate::blockchain::{
    ChainBackend, DeploymentResult, DexSelector, Erc20Contract, FactoryContract, LensContract,
    LockerContract, RpcBackend, TvlSnapshot, VestingContract, VestingRequest,
};
use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use crate::prices::PriceOracle;
use crate::storage::{
    DeployedToken, FsBlobStore, MetadataStore, RedbMetadataStore, TokenCategory, TokenMetadata,
    TokenMetadataRecord, TokenRegistry,
};
use crate::validation::{
    ensure_factory_revision, parse_address, validate_amount, validate_duration,
    validate_optional_url, validate_token_name, validate_token_symbol,
};

/// Request to deploy a token with its liquidity pool.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub name: String,
    pub symbol: String,
    pub dex: DexSelector,
    /// Off-chain details recorded after deployment, if any.
    pub metadata: Option<TokenMetadata>,
}

/// Outcome of [`MavrkClient::deploy_token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub result: DeploymentResult,
    /// Best-effort steps that did not complete. The token is deployed
    /// regardless.
    pub warnings: Vec<String>,
}

/// Request to time-lock tokens held by the signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRequest {
    pub token_address: String,
    pub amount: U256,
    pub duration_days: u32,
}

/// Client for the Mavrk contracts, metadata and prices.
pub struct MavrkClient {
    config: SdkConfig,
    backend: Arc<dyn ChainBackend>,
    factory: FactoryContract,
    locker: LockerContract,
    vesting: VestingContract,
    lens: LensContract,
    registry: Option<TokenRegistry>,
    prices: PriceOracle,
}

impl MavrkClient {
    /// Connect over JSON-RPC, signing with `signer`.
    ///
    /// Opens the metadata database and blob directory when
    /// `config.metadata` is set.
    pub fn connect(config: SdkConfig, signer: PrivateKeySigner) -> SdkResult<Self> {
        let backend = Arc::new(RpcBackend::connect(config.network.clone(), signer)?);

        let registry = match &config.metadata {
            Some(metadata) => {
                let store = RedbMetadataStore::open(&metadata.db_path)?;
                let blobs =
                    FsBlobStore::new(metadata.blob_root.clone(), metadata.public_base_url.clone());
                Some(TokenRegistry::new(Arc::new(store), Arc::new(blobs)))
            }
            None => None,
        };

        let prices = PriceOracle::relay(
            &config.price_api_url,
            config.network.chain_id,
            config.price_cache_ttl,
        );

        tracing::info!(
            network = %config.network.name,
            chain_id = config.network.chain_id,
            sender = %backend.sender(),
            metadata = registry.is_some(),
            "Mavrk client connected"
        );
        Ok(Self::with_backend(config, backend, registry, prices))
    }

    /// Build a client on an existing backend.
    pub fn with_backend(
        config: SdkConfig,
        backend: Arc<dyn ChainBackend>,
        registry: Option<TokenRegistry>,
        prices: PriceOracle,
    ) -> Self {
        let contracts = &config.contracts;
        let factory = FactoryContract::new(
            backend.clone(),
            contracts.token_factory,
            config.factory_revision,
        );
        let locker = LockerContract::new(
            backend.clone(),
            contracts.token_locker,
            config.lock_duration_unit,
        );
        let vesting =
            VestingContract::new(backend.clone(), contracts.vesting, config.vesting_revision);
        let lens = LensContract::new(backend.clone(), contracts.lens);

        Self {
            config,
            backend,
            factory,
            locker,
            vesting,
            lens,
            registry,
            prices,
        }
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Deploy a token and record its metadata.
    ///
    /// Fails if the transaction reverts or the receipt has no
    /// `TokenDeployed` event. Metadata problems only add warnings.
    pub async fn deploy_token(&self, request: DeploymentRequest) -> SdkResult<Deployment> {
        validate_token_name(&request.name)?;
        validate_token_symbol(&request.symbol)?;
        ensure_factory_revision(request.dex.revision(), self.factory.revision())?;
        let target = request.dex.resolve()?;
        if let Some(metadata) = &request.metadata {
            validate_optional_url("website", metadata.website.as_deref())?;
        }

        let result = self
            .factory
            .deploy(&request.name, &request.symbol, target)
            .await?;

        let mut warnings = Vec::new();
        if let Some(metadata) = &request.metadata {
            if let Some(warning) = self.record_metadata(&request, &result, metadata).await {
                tracing::warn!(token = %result.token_address, "{warning}");
                warnings.push(warning);
            }
        }

        Ok(Deployment { result, warnings })
    }

    async fn record_metadata(
        &self,
        request: &DeploymentRequest,
        result: &DeploymentResult,
        metadata: &TokenMetadata,
    ) -> Option<String> {
        let Some(registry) = &self.registry else {
            return Some("metadata store not configured; token metadata was not saved".into());
        };

        let token = DeployedToken {
            contract_address: result.token_address.clone(),
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            deployer_address: format!("{:#x}", self.backend.sender()),
            network: self.config.network.tag.clone(),
            pool_manager_tier: request.dex.tier(),
        };

        match registry.save_token(&token, metadata).await {
            Ok(_) => None,
            Err(e) => Some(format!(
                "token deployed but metadata could not be saved: {e}"
            )),
        }
    }

    /// Lock tokens, approving the locker first if needed. Returns the lock
    /// transaction hash.
    pub async fn lock_tokens(&self, request: LockRequest) -> SdkResult<String> {
        let token = parse_address("token", &request.token_address)?;
        validate_amount(request.amount)?;
        validate_duration(request.duration_days)?;

        self.locker
            .lock(token, request.amount, request.duration_days)
            .await
    }

    /// Create a vesting schedule, approving the vesting contract first if
    /// needed. Returns the creation transaction hash.
    pub async fn create_vesting(&self, request: VestingRequest) -> SdkResult<String> {
        self.vesting.create(&request).await
    }

    // =========================================================================
    // Token metadata
    // =========================================================================

    fn metadata(&self) -> SdkResult<&dyn MetadataStore> {
        self.registry
            .as_ref()
            .map(TokenRegistry::store)
            .ok_or_else(|| SdkError::Config("metadata store is not configured".into()))
    }

    pub fn token(&self, address: &str) -> SdkResult<Option<TokenMetadataRecord>> {
        Ok(self.metadata()?.get(address)?)
    }

    /// Most recently deployed tokens, newest first.
    pub fn all_tokens(&self, limit: usize) -> SdkResult<Vec<TokenMetadataRecord>> {
        Ok(self.metadata()?.list_recent(limit)?)
    }

    pub fn search_tokens(&self, query: &str) -> SdkResult<Vec<TokenMetadataRecord>> {
        Ok(self.metadata()?.search(query)?)
    }

    pub fn tokens_by_deployer(&self, deployer: &str) -> SdkResult<Vec<TokenMetadataRecord>> {
        Ok(self.metadata()?.by_deployer(deployer)?)
    }

    pub fn tokens_by_category(
        &self,
        category: TokenCategory,
    ) -> SdkResult<Vec<TokenMetadataRecord>> {
        Ok(self.metadata()?.by_category(category)?)
    }

    // =========================================================================
    // TVL and prices
    // =========================================================================

    async fn locker_tvl(&self, is_liquidity: bool) -> TvlSnapshot {
        match self.lens.locker_tvl(is_liquidity).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(is_liquidity, error = %e, "TVL query failed, reporting zero");
                TvlSnapshot::default()
            }
        }
    }

    /// Value of locked liquidity positions. Zero if the lens call fails.
    pub async fn liquidity_locker_tvl(&self) -> TvlSnapshot {
        self.locker_tvl(true).await
    }

    /// Value of locked tokens. Zero if the lens call fails.
    pub async fn token_locker_tvl(&self) -> TvlSnapshot {
        self.locker_tvl(false).await
    }

    pub async fn total_tvl(&self) -> TvlSnapshot {
        let liquidity = self.liquidity_locker_tvl().await;
        let tokens = self.token_locker_tvl().await;
        liquidity.merge(tokens)
    }

    pub async fn token_price(&self, token: &str) -> Option<f64> {
        self.prices.token_price(token).await
    }

    /// Prices keyed by lowercase address; tokens without a quote are omitted.
    pub async fn token_prices(&self, tokens: &[String]) -> HashMap<String, f64> {
        self.prices.token_prices(tokens).await
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Address transactions are sent from.
    pub fn sender(&self) -> Address {
        self.backend.sender()
    }

    /// Latest block number seen by the node.
    pub async fn block_number(&self) -> SdkResult<u64> {
        self.backend.block_number().await
    }

    pub fn factory(&self) -> &FactoryContract {
        &self.factory
    }

    pub fn locker(&self) -> &LockerContract {
        &self.locker
    }

    pub fn vesting(&self) -> &VestingContract {
        &self.vesting
    }

    pub fn lens(&self) -> &LensContract {
        &self.lens
    }

    pub fn registry(&self) -> Option<&TokenRegistry> {
        self.registry.as_ref()
    }

    /// ERC-20 adapter for any token, bound to this client's signer.
    pub fn erc20(&self, token: Address) -> Erc20Contract {
        Erc20Contract::new(self.backend.clone(), token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use alloy::primitives::LogData;
    use alloy::sol_types::{SolCall, SolEvent, SolValue};

    use crate::blockchain::erc20::IERC20;
    use crate::blockchain::factory::{ITieredTokenFactory, PoolInitialized, TokenDeployed};
    use crate::blockchain::lens::{IMavrkLens, LockedPosition};
    use crate::blockchain::locker::ITokenLocker;
    use crate::blockchain::NetworkConfig;
    use crate::config::{ContractAddresses, FactoryRevision};
    use crate::error::ErrorKind;
    use crate::storage::FsBlobStore;
    use crate::testing::{
        sample_metadata, FailingBlobStore, FailingMetadataStore, FakePrices, MockChain,
    };
    use crate::validation::ValidationError;

    const TOKEN: Address = Address::repeat_byte(0x70);
    const POOL: Address = Address::repeat_byte(0x90);

    fn config() -> SdkConfig {
        let mut config = SdkConfig::new(
            NetworkConfig::ink_mainnet(),
            ContractAddresses {
                token_factory: Address::repeat_byte(0xfa),
                token_locker: Address::repeat_byte(0x10),
                vesting: Address::repeat_byte(0x5a),
                lens: Address::repeat_byte(0x1e),
            },
        );
        config.factory_revision = FactoryRevision::Tiered;
        config
    }

    fn prices() -> PriceOracle {
        PriceOracle::new(
            Arc::new(FakePrices::new(&[("0xaaa", 1.0), ("0xccc", 3.0)])),
            Duration::ZERO,
        )
    }

    fn deployed_event(chain: &MockChain) -> LogData {
        TokenDeployed {
            tokenAddress: TOKEN,
            name: "Test".into(),
            symbol: "TST".into(),
            creator: chain.sender_address(),
        }
        .encode_log_data()
    }

    fn chain_with_deploy_events() -> Arc<MockChain> {
        let chain = Arc::new(MockChain::new());
        let selector = ITieredTokenFactory::newMavrkTokenCall::SELECTOR;
        let factory = Address::repeat_byte(0xfa);
        chain.emit_on_send(selector, factory, deployed_event(&chain));
        chain.emit_on_send(selector, factory, PoolInitialized { pool: POOL }.encode_log_data());
        chain
    }

    fn request(name: &str, metadata: Option<TokenMetadata>) -> DeploymentRequest {
        DeploymentRequest {
            name: name.into(),
            symbol: "TST".into(),
            dex: DexSelector::Tier(1),
            metadata,
        }
    }

    fn redb_registry(blobs: Arc<dyn crate::storage::BlobStore>) -> (TokenRegistry, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbMetadataStore::open(&dir.path().join("tokens.redb")).unwrap();
        (TokenRegistry::new(Arc::new(store), blobs), dir)
    }

    #[tokio::test]
    async fn deploy_end_to_end_records_metadata() {
        let chain = chain_with_deploy_events();
        let blob_dir = tempfile::tempdir().unwrap();
        let (registry, _dir) =
            redb_registry(Arc::new(FsBlobStore::new(blob_dir.path(), Some("https://cdn.test".into()))));
        let client =
            MavrkClient::with_backend(config(), chain.clone(), Some(registry), prices());

        let deployment = client
            .deploy_token(request("Test", Some(sample_metadata())))
            .await
            .unwrap();

        let token = format!("{TOKEN:#x}");
        assert_eq!(deployment.result.token_address, token);
        assert_eq!(deployment.result.pool_address, Some(format!("{POOL:#x}")));
        assert!(deployment.warnings.is_empty());

        let record = client.token(&token).unwrap().unwrap();
        assert_eq!(record.name, "Test");
        assert_eq!(record.network, "ink");
        assert_eq!(record.pool_manager_tier, Some(1));
        assert_eq!(
            record.deployer_address,
            format!("{:#x}", chain.sender_address())
        );
        assert!(record.logo_url.is_some());

        assert_eq!(client.all_tokens(10).unwrap().len(), 1);
        assert_eq!(client.search_tokens("tst").unwrap().len(), 1);
        assert_eq!(
            client
                .tokens_by_deployer(&format!("{:#x}", chain.sender_address()))
                .unwrap()
                .len(),
            1
        );
        assert_eq!(client.tokens_by_category(TokenCategory::Meme).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn block_number_follows_inclusions() {
        let chain = chain_with_deploy_events();
        let client = MavrkClient::with_backend(config(), chain, None, prices());

        let before = client.block_number().await.unwrap();
        client.deploy_token(request("Test", None)).await.unwrap();
        assert_eq!(client.block_number().await.unwrap(), before + 1);
    }

    #[tokio::test]
    async fn failed_uploads_do_not_fail_deploy() {
        let chain = chain_with_deploy_events();
        let (registry, _dir) = redb_registry(Arc::new(FailingBlobStore));
        let client = MavrkClient::with_backend(config(), chain, Some(registry), prices());

        let deployment = client
            .deploy_token(request("Test", Some(sample_metadata())))
            .await
            .unwrap();

        assert!(deployment.warnings.is_empty());
        let record = client
            .token(&deployment.result.token_address)
            .unwrap()
            .unwrap();
        assert!(record.logo_url.is_none());
        assert!(record.cover_photo_url.is_none());
    }

    #[tokio::test]
    async fn metadata_is_keyed_by_the_factory_event() {
        let chain = Arc::new(MockChain::new());
        let selector = ITieredTokenFactory::newMavrkTokenCall::SELECTOR;
        let impostor = TokenDeployed {
            tokenAddress: Address::repeat_byte(0x66),
            name: "Other".into(),
            symbol: "OTH".into(),
            creator: chain.sender_address(),
        }
        .encode_log_data();
        chain.emit_on_send(selector, Address::repeat_byte(0xee), impostor);
        chain.emit_on_send(selector, Address::repeat_byte(0xfa), deployed_event(&chain));
        let (registry, _dir) = redb_registry(Arc::new(FailingBlobStore));
        let client = MavrkClient::with_backend(config(), chain, Some(registry), prices());

        let deployment = client
            .deploy_token(request("Test", Some(sample_metadata())))
            .await
            .unwrap();

        let token = format!("{TOKEN:#x}");
        assert_eq!(deployment.result.token_address, token);
        assert!(client.token(&token).unwrap().is_some());
        assert!(client.token(&format!("{:#x}", Address::repeat_byte(0x66))).unwrap().is_none());
    }

    #[tokio::test]
    async fn metadata_failure_becomes_warning() {
        let chain = chain_with_deploy_events();
        let registry = TokenRegistry::new(Arc::new(FailingMetadataStore), Arc::new(FailingBlobStore));
        let client = MavrkClient::with_backend(config(), chain.clone(), Some(registry), prices());

        let deployment = client
            .deploy_token(request("Test", Some(sample_metadata())))
            .await
            .unwrap();

        assert_eq!(deployment.result.token_address, format!("{TOKEN:#x}"));
        assert_eq!(deployment.warnings.len(), 1);
        assert!(deployment.warnings[0].contains("metadata could not be saved"));
        assert_eq!(chain.sent_count(), 1);
    }

    #[tokio::test]
    async fn metadata_without_store_becomes_warning() {
        let chain = chain_with_deploy_events();
        let client = MavrkClient::with_backend(config(), chain, None, prices());

        let deployment = client
            .deploy_token(request("Test", Some(sample_metadata())))
            .await
            .unwrap();
        assert_eq!(deployment.warnings.len(), 1);

        let plain = client.deploy_token(request("Test", None)).await.unwrap();
        assert!(plain.warnings.is_empty());
    }

    #[tokio::test]
    async fn empty_name_fails_before_any_network_call() {
        let chain = chain_with_deploy_events();
        let client = MavrkClient::with_backend(config(), chain.clone(), None, prices());

        let err = client.deploy_token(request("", None)).await.unwrap_err();

        assert!(matches!(err, SdkError::Validation(ValidationError::EmptyName)));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(chain.call_count(), 0);
        assert_eq!(chain.sent_count(), 0);
    }

    #[tokio::test]
    async fn deploy_checks_revision_and_website() {
        let chain = chain_with_deploy_events();
        let client = MavrkClient::with_backend(config(), chain.clone(), None, prices());

        let mut wrong_dex = request("Test", None);
        wrong_dex.dex = DexSelector::PositionManager(format!("{POOL:#x}"));
        assert!(matches!(
            client.deploy_token(wrong_dex).await,
            Err(SdkError::Validation(ValidationError::RevisionMismatch { .. }))
        ));

        let mut metadata = sample_metadata();
        metadata.website = Some("not a url".into());
        assert!(matches!(
            client.deploy_token(request("Test", Some(metadata))).await,
            Err(SdkError::Validation(ValidationError::InvalidUrl { .. }))
        ));
        assert_eq!(chain.sent_count(), 0);
    }

    #[tokio::test]
    async fn deploy_without_event_is_confirmation_error() {
        let chain = Arc::new(MockChain::new());
        let client = MavrkClient::with_backend(config(), chain, None, prices());

        let err = client.deploy_token(request("Test", None)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Confirmation);
    }

    #[tokio::test]
    async fn lock_tokens_approves_once_then_skips() {
        let chain = Arc::new(MockChain::new());
        chain.on_call(IERC20::allowanceCall::SELECTOR, U256::ZERO.abi_encode());
        let client = MavrkClient::with_backend(config(), chain.clone(), None, prices());

        let lock = LockRequest {
            token_address: format!("{TOKEN:#x}"),
            amount: U256::from(1_000u64),
            duration_days: 90,
        };
        client.lock_tokens(lock.clone()).await.unwrap();
        assert_eq!(
            chain.sent_selectors(),
            vec![IERC20::approveCall::SELECTOR, ITokenLocker::lockCall::SELECTOR]
        );

        chain.on_call(IERC20::allowanceCall::SELECTOR, U256::from(1_000u64).abi_encode());
        client.lock_tokens(lock).await.unwrap();
        assert_eq!(chain.sent_count(), 3);
    }

    #[tokio::test]
    async fn lock_tokens_validates_first() {
        let chain = Arc::new(MockChain::new());
        let client = MavrkClient::with_backend(config(), chain.clone(), None, prices());

        let bad = LockRequest {
            token_address: "0xnot-an-address".into(),
            amount: U256::from(1u64),
            duration_days: 10,
        };
        assert!(matches!(
            client.lock_tokens(bad).await,
            Err(SdkError::Validation(ValidationError::InvalidAddress { field: "token", .. }))
        ));
        assert_eq!(chain.call_count(), 0);
    }

    #[tokio::test]
    async fn create_vesting_uses_configured_revision() {
        let chain = Arc::new(MockChain::new());
        chain.on_call(IERC20::allowanceCall::SELECTOR, U256::MAX.abi_encode());
        let client = MavrkClient::with_backend(config(), chain.clone(), None, prices());

        let tx_hash = client
            .create_vesting(VestingRequest::Preset {
                token: format!("{TOKEN:#x}"),
                amount: U256::from(5u64),
                option: 1,
            })
            .await
            .unwrap();
        assert!(tx_hash.starts_with("0x"));
        assert_eq!(chain.sent_count(), 1);
    }

    #[test]
    fn metadata_reads_need_a_store() {
        let client = MavrkClient::with_backend(config(), Arc::new(MockChain::new()), None, prices());
        let err = client.all_tokens(10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(client.token("0xabc").is_err());
    }

    #[test]
    fn store_failures_surface_on_reads() {
        let registry = TokenRegistry::new(Arc::new(FailingMetadataStore), Arc::new(FailingBlobStore));
        let client =
            MavrkClient::with_backend(config(), Arc::new(MockChain::new()), Some(registry), prices());
        assert_eq!(
            client.search_tokens("x").unwrap_err().kind(),
            ErrorKind::OffChainStore
        );
    }

    #[tokio::test]
    async fn tvl_sums_and_degrades_to_zero() {
        let chain = Arc::new(MockChain::new());
        let client = MavrkClient::with_backend(config(), chain.clone(), None, prices());

        assert_eq!(client.total_tvl().await, TvlSnapshot::default());

        let ten_usd = U256::from(10u64) * U256::from(10u64).pow(U256::from(18u64));
        let position = LockedPosition {
            token: TOKEN,
            tokenId: U256::from(1u64),
            liquidity: 1,
            amount0: U256::ZERO,
            amount1: U256::ZERO,
            valueUSD: ten_usd,
        };
        chain.on_call(
            IMavrkLens::lockerTVLCall::SELECTOR,
            vec![position.clone(), position].abi_encode(),
        );

        let liquidity = client.liquidity_locker_tvl().await;
        assert_eq!(liquidity.position_count, 2);
        assert!((liquidity.total_value_usd - 20.0).abs() < 1e-9);

        // Both locker queries share a selector in the mock
        let total = client.total_tvl().await;
        assert_eq!(total.position_count, 4);
    }

    #[tokio::test]
    async fn batch_prices_keep_only_quoted_tokens() {
        let client = MavrkClient::with_backend(config(), Arc::new(MockChain::new()), None, prices());

        let prices = client
            .token_prices(&["0xAAA".into(), "0xBBB".into(), "0xCCC".into()])
            .await;

        assert_eq!(prices.len(), 2);
        assert_eq!(prices["0xaaa"], 1.0);
        assert_eq!(prices["0xccc"], 3.0);
        assert_eq!(client.token_price("0xbbb").await, None);
    }
}
