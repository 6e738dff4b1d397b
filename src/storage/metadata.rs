// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded token metadata database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `tokens`: lowercase address → serialized TokenMetadataRecord
//! - `recent_index`: `!created_at_ms | address` → address
//! - `deployer_index`: `deployer | !created_at_ms | address` → address

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{MetadataStore, StoreError, StoreResult, TokenCategory, TokenMetadataRecord};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: address → serialized record (JSON bytes).
const TOKENS: TableDefinition<&str, &[u8]> = TableDefinition::new("tokens");

/// Index: inverted creation time → address, for newest-first scans.
const RECENT_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("recent_index");

/// Index: `deployer|!timestamp_be|address` → address.
const DEPLOYER_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("deployer_index");

// =============================================================================
// Index Key Helpers
// =============================================================================

fn inverted(timestamp_ms: i64) -> [u8; 8] {
    // Invert timestamp for descending order (newest first)
    (!timestamp_ms as u64).to_be_bytes()
}

fn make_recent_key(timestamp_ms: i64, address: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 1 + address.len());
    key.extend_from_slice(&inverted(timestamp_ms));
    key.push(b'|');
    key.extend_from_slice(address.as_bytes());
    key
}

fn make_deployer_key(deployer: &str, timestamp_ms: i64, address: &str) -> Vec<u8> {
    let mut key = make_deployer_prefix(deployer);
    key.extend_from_slice(&inverted(timestamp_ms));
    key.push(b'|');
    key.extend_from_slice(address.as_bytes());
    key
}

fn make_deployer_prefix(deployer: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(deployer.len() + 1);
    prefix.extend_from_slice(deployer.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Upper bound for a prefix scan (prefix with 0xFF bytes appended).
fn make_deployer_prefix_end(deployer: &str) -> Vec<u8> {
    let mut end = make_deployer_prefix(deployer);
    // Past any inverted timestamp + separator + address
    end.extend_from_slice(&[0xFF; 20]);
    end
}

fn normalize(record: &TokenMetadataRecord) -> TokenMetadataRecord {
    let mut record = record.clone();
    record.contract_address = record.contract_address.to_lowercase();
    record.deployer_address = record.deployer_address.to_lowercase();
    record
}

// =============================================================================
// RedbMetadataStore
// =============================================================================

/// redb-backed [`MetadataStore`].
pub struct RedbMetadataStore {
    db: Database,
}

impl RedbMetadataStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TOKENS)?;
            let _ = write_txn.open_table(RECENT_INDEX)?;
            let _ = write_txn.open_table(DEPLOYER_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Walk the recency index newest first, keeping records accepted by
    /// `keep`, until `limit` are collected.
    fn scan_recent<F>(&self, limit: usize, keep: F) -> StoreResult<Vec<TokenMetadataRecord>>
    where
        F: Fn(&TokenMetadataRecord) -> bool,
    {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(RECENT_INDEX)?;
        let tokens = read_txn.open_table(TOKENS)?;

        let mut results = Vec::new();
        for entry in idx_table.iter()? {
            if results.len() >= limit {
                break;
            }
            let (_, address) = entry?;
            if let Some(value) = tokens.get(address.value())? {
                let record: TokenMetadataRecord = serde_json::from_slice(value.value())?;
                if keep(&record) {
                    results.push(record);
                }
            }
        }
        Ok(results)
    }
}

impl MetadataStore for RedbMetadataStore {
    fn insert(&self, record: &TokenMetadataRecord) -> StoreResult<()> {
        let record = normalize(record);
        let address = record.contract_address.as_str();
        let timestamp = record.created_at.timestamp_millis();
        let json = serde_json::to_vec(&record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut tokens = write_txn.open_table(TOKENS)?;
            if tokens.get(address)?.is_some() {
                return Err(StoreError::AlreadyExists(address.to_string()));
            }
            tokens.insert(address, json.as_slice())?;

            let mut recent = write_txn.open_table(RECENT_INDEX)?;
            recent.insert(make_recent_key(timestamp, address).as_slice(), address)?;

            let mut by_deployer = write_txn.open_table(DEPLOYER_INDEX)?;
            by_deployer.insert(
                make_deployer_key(&record.deployer_address, timestamp, address).as_slice(),
                address,
            )?;
        }
        write_txn.commit()?;

        tracing::debug!(address, symbol = %record.symbol, "Stored token metadata");
        Ok(())
    }

    fn get(&self, address: &str) -> StoreResult<Option<TokenMetadataRecord>> {
        let address = address.to_lowercase();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TOKENS)?;
        match table.get(address.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn search(&self, query: &str) -> StoreResult<Vec<TokenMetadataRecord>> {
        let needle = query.to_lowercase();
        self.scan_recent(usize::MAX, |r| {
            r.name.to_lowercase().contains(&needle) || r.symbol.to_lowercase().contains(&needle)
        })
    }

    fn by_deployer(&self, deployer: &str) -> StoreResult<Vec<TokenMetadataRecord>> {
        let deployer = deployer.to_lowercase();
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(DEPLOYER_INDEX)?;
        let tokens = read_txn.open_table(TOKENS)?;

        let start = make_deployer_prefix(&deployer);
        let end = make_deployer_prefix_end(&deployer);

        let mut results = Vec::new();
        for entry in idx_table.range(start.as_slice()..end.as_slice())? {
            let (_, address) = entry?;
            if let Some(value) = tokens.get(address.value())? {
                results.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(results)
    }

    fn by_category(&self, category: TokenCategory) -> StoreResult<Vec<TokenMetadataRecord>> {
        self.scan_recent(usize::MAX, |r| r.category == category)
    }

    fn list_recent(&self, limit: usize) -> StoreResult<Vec<TokenMetadataRecord>> {
        self.scan_recent(limit, |_| true)
    }
}
