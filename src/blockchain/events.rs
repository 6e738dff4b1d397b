// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Receipt log resolution.
//!
//! Logs are matched on the emitting contract and on topic0 (the event
//! signature hash) before any decode is attempted. Events from other
//! contracts in the same transaction, or foreign events whose data happens
//! to decode, are never mistaken for the one requested. The first matching
//! log in receipt order wins.

use alloy::primitives::Address;
use alloy::sol_types::SolEvent;

use super::types::TxReceipt;
use crate::error::{SdkError, SdkResult};

/// Find the first log emitted by `emitter` in `receipt` that decodes as `E`.
pub fn find_event<E: SolEvent>(receipt: &TxReceipt, emitter: Address) -> Option<E> {
    for (index, log) in receipt.logs.iter().enumerate() {
        if log.address != emitter || log.topics().first() != Some(&E::SIGNATURE_HASH) {
            continue;
        }
        match E::decode_log_data(&log.data) {
            Ok(event) => return Some(event),
            Err(e) => {
                tracing::debug!(
                    tx_hash = %receipt.tx_hash,
                    log_index = index,
                    event = E::SIGNATURE,
                    error = %e,
                    "Skipping log that matched topic but failed to decode"
                );
            }
        }
    }
    None
}

/// Like [`find_event`], but a missing event is an error.
///
/// The transaction has already been included when this fails; nothing is
/// retried or rolled back.
pub fn require_event<E: SolEvent>(
    receipt: &TxReceipt,
    emitter: Address,
    event: &'static str,
) -> SdkResult<E> {
    find_event::<E>(receipt, emitter).ok_or_else(|| {
        tracing::warn!(
            tx_hash = %receipt.tx_hash,
            emitter = %emitter,
            event,
            logs = receipt.logs.len(),
            "Expected event missing from receipt"
        );
        SdkError::EventNotFound {
            event,
            tx_hash: receipt.tx_hash.clone(),
        }
    })
}
