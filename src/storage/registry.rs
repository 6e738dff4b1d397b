// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token metadata registry: image uploads plus the metadata record.

use std::sync::Arc;

use chrono::Utc;

use super::blobs::{cover_file_name, logo_file_name, BlobStore, ImageAsset, COVER_BUCKET, LOGO_BUCKET};
use super::{MetadataStore, StoreError, StoreResult, TokenCategory, TokenMetadataRecord};

/// Human-facing token details supplied at deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub description: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub category: TokenCategory,
    pub logo: ImageAsset,
    pub cover_photo: ImageAsset,
}

/// On-chain identity of a freshly deployed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedToken {
    pub contract_address: String,
    pub name: String,
    pub symbol: String,
    pub deployer_address: String,
    pub network: String,
    pub pool_manager_tier: Option<u8>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Metadata store and blob store used together.
#[derive(Clone)]
pub struct TokenRegistry {
    store: Arc<dyn MetadataStore>,
    blobs: Arc<dyn BlobStore>,
}

impl TokenRegistry {
    pub fn new(store: Arc<dyn MetadataStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    pub fn store(&self) -> &dyn MetadataStore {
        self.store.as_ref()
    }

    async fn upload(&self, bucket: &str, file_name: String, asset: &ImageAsset) -> Option<String> {
        match self
            .blobs
            .upload(bucket, &file_name, &asset.content_type, &asset.bytes)
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(bucket, file_name = %file_name, error = %e, "Image upload failed");
                None
            }
        }
    }

    /// Upload both images, then insert the record.
    ///
    /// A known address is rejected with `AlreadyExists` before anything is
    /// uploaded. A failed upload leaves that image reference empty and does
    /// not stop the insert. Insert failures are returned.
    pub async fn save_token(
        &self,
        token: &DeployedToken,
        metadata: &TokenMetadata,
    ) -> StoreResult<TokenMetadataRecord> {
        let address = token.contract_address.to_lowercase();
        if self.store.get(&address)?.is_some() {
            return Err(StoreError::AlreadyExists(address));
        }

        let logo_url = self
            .upload(LOGO_BUCKET, logo_file_name(&address), &metadata.logo)
            .await;
        let cover_photo_url = self
            .upload(COVER_BUCKET, cover_file_name(&address), &metadata.cover_photo)
            .await;

        let record = TokenMetadataRecord {
            contract_address: address,
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            description: non_blank(&metadata.description),
            website: non_blank(&metadata.website),
            twitter: non_blank(&metadata.twitter),
            telegram: non_blank(&metadata.telegram),
            discord: non_blank(&metadata.discord),
            category: metadata.category,
            logo_url,
            cover_photo_url,
            network: token.network.clone(),
            deployer_address: token.deployer_address.to_lowercase(),
            pool_manager_tier: token.pool_manager_tier,
            created_at: Utc::now(),
        };

        self.store.insert(&record)?;
        tracing::info!(
            address = %record.contract_address,
            logo = record.logo_url.is_some(),
            cover = record.cover_photo_url.is_some(),
            "Token metadata saved"
        );
        Ok(record)
    }
}
