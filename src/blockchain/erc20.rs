// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token contract interactions.

use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    sol,
};

use super::client::{transact, view, ChainBackend};
use crate::error::SdkResult;

// Define the ERC-20 interface using alloy's sol! macro
sol! {
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// ERC-20 contract wrapper.
#[derive(Clone)]
pub struct Erc20Contract {
    backend: Arc<dyn ChainBackend>,
    address: Address,
}

impl Erc20Contract {
    pub fn new(backend: Arc<dyn ChainBackend>, address: Address) -> Self {
        Self { backend, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Amount `spender` may still transfer on behalf of `owner`.
    pub async fn allowance(&self, owner: Address, spender: Address) -> SdkResult<U256> {
        view(
            self.backend.as_ref(),
            self.address,
            IERC20::allowanceCall { owner, spender },
        )
        .await
    }

    /// Approve `spender` for exactly `amount` and wait for inclusion.
    pub async fn approve(&self, spender: Address, amount: U256) -> SdkResult<String> {
        let receipt = transact(
            self.backend.as_ref(),
            self.address,
            IERC20::approveCall { spender, amount },
        )
        .await?;
        Ok(receipt.tx_hash)
    }

    /// Get the raw balance of an address.
    pub async fn balance_of(&self, account: Address) -> SdkResult<U256> {
        view(
            self.backend.as_ref(),
            self.address,
            IERC20::balanceOfCall { account },
        )
        .await
    }
}

/// Make sure `spender` may move at least `required` of `token` for `owner`.
///
/// Reads the current allowance and, only when it falls short, approves
/// exactly `required` and waits for the approval to be included. Returns the
/// approval transaction hash when one was sent. Nothing is retried.
pub async fn ensure_allowance(
    token: &Erc20Contract,
    owner: Address,
    spender: Address,
    required: U256,
) -> SdkResult<Option<String>> {
    let current = token.allowance(owner, spender).await?;
    if current >= required {
        tracing::debug!(
            token = %token.address(),
            spender = %spender,
            allowance = %current,
            "Allowance sufficient, skipping approve"
        );
        return Ok(None);
    }

    tracing::info!(
        token = %token.address(),
        spender = %spender,
        allowance = %current,
        required = %required,
        "Approving token spend"
    );
    let tx_hash = token.approve(spender, required).await?;
    tracing::info!(tx_hash = %tx_hash, "Approval confirmed");
    Ok(Some(tx_hash))
}
