// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::storage::StoreError;
use crate::validation::ValidationError;

/// Broad class of an [`SdkError`], for callers deciding how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, rejected before any network call.
    Validation,
    /// The node rejected the call or the transaction reverted.
    ChainCall,
    /// The transaction was accepted but its outcome could not be assembled.
    /// On-chain state may already have changed.
    Confirmation,
    /// Metadata or blob storage failed.
    OffChainStore,
    /// Invalid or incomplete client configuration.
    Config,
}

/// Errors returned by the client.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chain call failed: {0}")]
    ChainCall(String),

    #[error("Confirmation failed: {0}")]
    Confirmation(String),

    #[error("{event} event not found in transaction logs of {tx_hash}")]
    EventNotFound { event: &'static str, tx_hash: String },

    #[error("Off-chain store error: {0}")]
    OffChainStore(#[from] StoreError),
}

impl SdkError {
    pub fn chain_call(message: impl Into<String>) -> Self {
        Self::ChainCall(message.into())
    }

    pub fn confirmation(message: impl Into<String>) -> Self {
        Self::Confirmation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SdkError::Validation(_) => ErrorKind::Validation,
            SdkError::Config(_) => ErrorKind::Config,
            SdkError::ChainCall(_) => ErrorKind::ChainCall,
            SdkError::Confirmation(_) | SdkError::EventNotFound { .. } => ErrorKind::Confirmation,
            SdkError::OffChainStore(_) => ErrorKind::OffChainStore,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
