// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Token Metadata Storage
//!
//! Off-chain projection of deployed tokens: a keyed store of
//! [`TokenMetadataRecord`]s plus blob storage for logo and cover images.
//!
//! ## Layout
//!
//! ```text
//! metadata.redb        # tokens + recency / deployer indexes
//! {blob_root}/
//!   token-logos/{address}-logo.png
//!   token-covers/{address}-cover.png
//! ```
//!
//! ## Notes
//!
//! - Addresses are lowercased on every write and lookup
//! - Records are created once and never updated or deleted
//! - The chain is the source of truth; this store is best-effort

pub mod blobs;
pub mod metadata;
pub mod registry;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use blobs::{BlobStore, FsBlobStore, ImageAsset, COVER_BUCKET, LOGO_BUCKET};
pub use metadata::RedbMetadataStore;
pub use registry::{DeployedToken, TokenMetadata, TokenRegistry};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("token already recorded: {0}")]
    AlreadyExists(String),

    #[error("blob upload failed: {0}")]
    Blob(String),

    #[error("invalid image data: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Token category shown by explorers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    Meme,
    Utility,
    Gaming,
    Defi,
    Community,
    Other,
}

impl TokenCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenCategory::Meme => "meme",
            TokenCategory::Utility => "utility",
            TokenCategory::Gaming => "gaming",
            TokenCategory::Defi => "defi",
            TokenCategory::Community => "community",
            TokenCategory::Other => "other",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meme" => Ok(Self::Meme),
            "utility" => Ok(Self::Utility),
            "gaming" => Ok(Self::Gaming),
            "defi" => Ok(Self::Defi),
            "community" => Ok(Self::Community),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown token category `{other}`")),
        }
    }
}

/// Persisted description of a deployed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadataRecord {
    /// Lowercase token address; unique key.
    pub contract_address: String,
    pub name: String,
    pub symbol: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub category: TokenCategory,
    /// `None` when the upload failed.
    pub logo_url: Option<String>,
    /// `None` when the upload failed.
    pub cover_photo_url: Option<String>,
    /// Network tag, e.g. "ink".
    pub network: String,
    /// Lowercase deployer address.
    pub deployer_address: String,
    pub pool_manager_tier: Option<u8>,
    pub created_at: DateTime<Utc>,
}

/// Keyed store of token metadata. Every listing is newest first.
pub trait MetadataStore: Send + Sync {
    /// Insert a new record. Fails with `AlreadyExists` for a known address.
    fn insert(&self, record: &TokenMetadataRecord) -> StoreResult<()>;

    fn get(&self, address: &str) -> StoreResult<Option<TokenMetadataRecord>>;

    /// Case-insensitive substring match on name or symbol.
    fn search(&self, query: &str) -> StoreResult<Vec<TokenMetadataRecord>>;

    fn by_deployer(&self, deployer: &str) -> StoreResult<Vec<TokenMetadataRecord>>;

    fn by_category(&self, category: TokenCategory) -> StoreResult<Vec<TokenMetadataRecord>>;

    /// At most `limit` records.
    fn list_recent(&self, limit: usize) -> StoreResult<Vec<TokenMetadataRecord>>;
}
