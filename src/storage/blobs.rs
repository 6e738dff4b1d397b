// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blob storage for token images.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64ct::{Base64, Encoding};

use super::{StoreError, StoreResult};

/// Bucket holding token logos.
pub const LOGO_BUCKET: &str = "token-logos";

/// Bucket holding token cover photos.
pub const COVER_BUCKET: &str = "token-covers";

const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Deterministic logo file name for a token.
pub fn logo_file_name(address: &str) -> String {
    format!("{}-logo.png", address.to_lowercase())
}

/// Deterministic cover file name for a token.
pub fn cover_file_name(address: &str) -> String {
    format!("{}-cover.png", address.to_lowercase())
}

/// An image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ImageAsset {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// Decode raw base64 or a `data:image/<kind>;base64,` URL.
    pub fn from_base64(data: &str) -> StoreResult<Self> {
        let data = data.trim();
        let (content_type, payload) = match data.strip_prefix("data:") {
            Some(rest) => {
                let (mime, payload) = rest
                    .split_once(";base64,")
                    .ok_or_else(|| StoreError::Decode("data URL is not base64".into()))?;
                if !mime.starts_with("image/") {
                    return Err(StoreError::Decode(format!("unsupported media type `{mime}`")));
                }
                (mime.to_string(), payload)
            }
            None => (DEFAULT_CONTENT_TYPE.to_string(), data),
        };

        let bytes =
            Base64::decode_vec(payload).map_err(|e| StoreError::Decode(e.to_string()))?;
        if bytes.is_empty() {
            return Err(StoreError::Decode("image is empty".into()));
        }
        Ok(Self {
            bytes,
            content_type,
        })
    }
}

/// Object storage addressed by bucket and file name.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes`, replacing any existing object, and return its public URL.
    async fn upload(
        &self,
        bucket: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> StoreResult<String>;
}

/// Blob store writing under a local directory.
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl FsBlobStore {
    /// Objects land in `root/{bucket}/{file_name}`. With a public base URL
    /// the returned URL is `{base}/{bucket}/{file_name}`, otherwise a
    /// `file://` URL.
    pub fn new(root: impl Into<PathBuf>, public_base_url: Option<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn public_url(&self, bucket: &str, file_name: &str, path: &Path) -> StoreResult<String> {
        match &self.public_base_url {
            Some(base) => Ok(format!(
                "{}/{}/{}",
                base.trim_end_matches('/'),
                bucket,
                file_name
            )),
            None => {
                let absolute = std::path::absolute(path)?;
                url::Url::from_file_path(&absolute)
                    .map(|u| u.to_string())
                    .map_err(|_| StoreError::Blob(format!("no URL for {}", absolute.display())))
            }
        }
    }
}

fn check_segment(kind: &str, value: &str) -> StoreResult<()> {
    if value.is_empty() || value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(StoreError::Blob(format!("invalid {kind} `{value}`")));
    }
    Ok(())
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> StoreResult<String> {
        check_segment("bucket", bucket)?;
        check_segment("file name", file_name)?;

        let dir = self.root.join(bucket);
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(
            bucket,
            file_name,
            content_type,
            size = bytes.len(),
            "Uploaded blob"
        );
        self.public_url(bucket, file_name, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn decodes_raw_base64() {
        let asset = ImageAsset::from_base64(&STANDARD.encode(PNG_MAGIC)).unwrap();
        assert_eq!(asset.bytes, PNG_MAGIC);
        assert_eq!(asset.content_type, "image/png");
    }

    #[test]
    fn strips_data_url_prefix() {
        let url = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"jpeg-bytes"));
        let asset = ImageAsset::from_base64(&url).unwrap();
        assert_eq!(asset.bytes, b"jpeg-bytes");
        assert_eq!(asset.content_type, "image/jpeg");
    }

    #[test]
    fn rejects_bad_payloads() {
        assert!(ImageAsset::from_base64("not base64!").is_err());
        assert!(ImageAsset::from_base64("").is_err());
        let text = format!("data:text/plain;base64,{}", STANDARD.encode(b"hi"));
        assert!(ImageAsset::from_base64(&text).is_err());
    }

    #[test]
    fn file_names_are_lowercase() {
        assert_eq!(logo_file_name("0xABC"), "0xabc-logo.png");
        assert_eq!(cover_file_name("0xABC"), "0xabc-cover.png");
    }

    #[tokio::test]
    async fn upload_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), Some("https://cdn.mavrk.fun/".into()));

        let url = store
            .upload(LOGO_BUCKET, "0xabc-logo.png", "image/png", &PNG_MAGIC)
            .await
            .unwrap();

        assert_eq!(url, "https://cdn.mavrk.fun/token-logos/0xabc-logo.png");
        let written = std::fs::read(dir.path().join("token-logos/0xabc-logo.png")).unwrap();
        assert_eq!(written, PNG_MAGIC);
    }

    #[tokio::test]
    async fn upload_without_base_returns_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), None);
        let url = store
            .upload(COVER_BUCKET, "0xabc-cover.png", "image/png", b"x")
            .await
            .unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("/token-covers/0xabc-cover.png"));
    }

    #[tokio::test]
    async fn upload_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), None);
        assert!(store
            .upload(LOGO_BUCKET, "../escape.png", "image/png", b"x")
            .await
            .is_err());
    }
}
