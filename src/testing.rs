// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test doubles shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy::primitives::{Address, Bytes, Log, LogData};
use async_trait::async_trait;

use crate::blockchain::{ChainBackend, TxReceipt};
use crate::error::{SdkError, SdkResult};
use crate::prices::{PriceError, PriceSource};
use crate::storage::{
    BlobStore, ImageAsset, MetadataStore, StoreError, StoreResult, TokenCategory, TokenMetadata,
    TokenMetadataRecord,
};

/// A transaction submitted to [`MockChain`].
#[derive(Debug, Clone)]
pub struct SentTx {
    pub to: Address,
    pub input: Bytes,
}

/// In-memory chain keyed by function selector.
///
/// Views answer with canned return data. Sends always succeed with a fresh
/// hash unless told to revert, and carry the logs registered for their
/// selector.
pub struct MockChain {
    sender: Address,
    views: Mutex<HashMap<[u8; 4], Bytes>>,
    logs: Mutex<HashMap<[u8; 4], Vec<Log>>>,
    reverts: Mutex<HashSet<[u8; 4]>>,
    sent: Mutex<Vec<SentTx>>,
    calls: Mutex<usize>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            sender: Address::repeat_byte(0x5e),
            views: Mutex::new(HashMap::new()),
            logs: Mutex::new(HashMap::new()),
            reverts: Mutex::new(HashSet::new()),
            sent: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn sender_address(&self) -> Address {
        self.sender
    }

    /// Answer views with `selector` using `output`.
    pub fn on_call(&self, selector: [u8; 4], output: impl Into<Bytes>) {
        self.views.lock().unwrap().insert(selector, output.into());
    }

    /// Attach an event emitted by `emitter` to sends with `selector`.
    pub fn emit_on_send(&self, selector: [u8; 4], emitter: Address, data: LogData) {
        self.logs
            .lock()
            .unwrap()
            .entry(selector)
            .or_default()
            .push(Log {
                address: emitter,
                data,
            });
    }

    /// Make sends with `selector` produce a reverted receipt.
    pub fn revert_send(&self, selector: [u8; 4]) {
        self.reverts.lock().unwrap().insert(selector);
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent_selectors(&self) -> Vec<[u8; 4]> {
        self.sent()
            .iter()
            .map(|tx| selector_of(&tx.input))
            .collect()
    }

    /// Number of views executed.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

fn selector_of(input: &[u8]) -> [u8; 4] {
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&input[..4]);
    selector
}

#[async_trait]
impl ChainBackend for MockChain {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn call(&self, _to: Address, input: Bytes) -> SdkResult<Bytes> {
        *self.calls.lock().unwrap() += 1;
        let selector = selector_of(&input);
        self.views
            .lock()
            .unwrap()
            .get(&selector)
            .cloned()
            .ok_or_else(|| SdkError::chain_call("execution reverted"))
    }

    async fn send(&self, to: Address, input: Bytes) -> SdkResult<TxReceipt> {
        let selector = selector_of(&input);
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentTx { to, input });
        let nonce = sent.len();

        Ok(TxReceipt {
            tx_hash: format!("0x{nonce:064x}"),
            block_number: 100 + nonce as u64,
            gas_used: 150_000,
            success: !self.reverts.lock().unwrap().contains(&selector),
            logs: self
                .logs
                .lock()
                .unwrap()
                .get(&selector)
                .cloned()
                .unwrap_or_default(),
        })
    }

    async fn block_number(&self) -> SdkResult<u64> {
        Ok(100 + self.sent_count() as u64)
    }
}

/// Metadata for a deployment, with a blank website.
pub fn sample_metadata() -> TokenMetadata {
    TokenMetadata {
        description: Some("A token for tests".into()),
        website: Some("  ".into()),
        twitter: Some("https://x.com/mavrk".into()),
        telegram: None,
        discord: None,
        category: TokenCategory::Meme,
        logo: ImageAsset::png(vec![0x89, b'P', b'N', b'G']),
        cover_photo: ImageAsset::png(vec![0x89, b'P', b'N', b'G', 0x00]),
    }
}

/// Blob store whose uploads always fail.
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        _file_name: &str,
        _content_type: &str,
        _bytes: &[u8],
    ) -> StoreResult<String> {
        Err(StoreError::Blob(format!("bucket {bucket} unavailable")))
    }
}

/// Metadata store that rejects every operation.
pub struct FailingMetadataStore;

impl FailingMetadataStore {
    fn down<T>() -> StoreResult<T> {
        Err(StoreError::Io(std::io::Error::other("metadata store offline")))
    }
}

impl MetadataStore for FailingMetadataStore {
    fn insert(&self, _record: &TokenMetadataRecord) -> StoreResult<()> {
        Self::down()
    }

    fn get(&self, _address: &str) -> StoreResult<Option<TokenMetadataRecord>> {
        Self::down()
    }

    fn search(&self, _query: &str) -> StoreResult<Vec<TokenMetadataRecord>> {
        Self::down()
    }

    fn by_deployer(&self, _deployer: &str) -> StoreResult<Vec<TokenMetadataRecord>> {
        Self::down()
    }

    fn by_category(&self, _category: TokenCategory) -> StoreResult<Vec<TokenMetadataRecord>> {
        Self::down()
    }

    fn list_recent(&self, _limit: usize) -> StoreResult<Vec<TokenMetadataRecord>> {
        Self::down()
    }
}

/// Price source with fixed quotes. Unknown tokens fail with a 404.
pub struct FakePrices {
    quotes: HashMap<String, f64>,
    calls: AtomicUsize,
}

impl FakePrices {
    pub fn new(quotes: &[(&str, f64)]) -> Self {
        Self {
            quotes: quotes
                .iter()
                .map(|(token, price)| (token.to_lowercase(), *price))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for FakePrices {
    async fn fetch_price(&self, token: &str) -> Result<f64, PriceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.quotes
            .get(&token.to_lowercase())
            .copied()
            .ok_or(PriceError::Status(404))
    }
}
