// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token locker contract.

use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    sol,
};

use super::client::{transact, view, ChainBackend};
use super::erc20::{ensure_allowance, Erc20Contract};
use super::events::find_event;
use super::types::{to_u64, LockRecord, TokenLockRecord};
use crate::config::LockDurationUnit;
use crate::error::SdkResult;
use crate::validation::{validate_amount, validate_duration};

sol! {
    struct LockInfo {
        uint256 amount;
        uint256 lockTime;
        uint256 unlockTime;
        bool withdrawn;
    }

    struct TokenLock {
        address user;
        uint256 amount;
        uint256 lockTime;
        uint256 unlockTime;
        bool withdrawn;
    }

    interface ITokenLocker {
        function lock(address _token, uint256 _amount, uint256 _duration) external;
        function unlock(address _token, uint256 _lockIndex) external;
        function getUserLocks(address _user, address _token) external view returns (LockInfo[] memory);
        function getTokenLocks(address _token) external view returns (TokenLock[] memory);
    }

    event TokensLocked(address indexed user, address indexed token, uint256 amount, uint256 unlockTime);
    event TokensUnlocked(address indexed user, address indexed token, uint256 amount);
}

impl From<TokenLock> for TokenLockRecord {
    fn from(lock: TokenLock) -> Self {
        TokenLockRecord {
            user: format!("{:#x}", lock.user),
            amount: lock.amount,
            lock_time: to_u64(lock.lockTime),
            unlock_time: to_u64(lock.unlockTime),
            withdrawn: lock.withdrawn,
        }
    }
}

/// Token locker adapter.
#[derive(Clone)]
pub struct LockerContract {
    backend: Arc<dyn ChainBackend>,
    address: Address,
    unit: LockDurationUnit,
}

impl LockerContract {
    pub fn new(backend: Arc<dyn ChainBackend>, address: Address, unit: LockDurationUnit) -> Self {
        Self {
            backend,
            address,
            unit,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Lock `amount` of `token` for `duration_days`.
    ///
    /// Approves the locker first when the current allowance is short, then
    /// submits the lock and waits for inclusion.
    pub async fn lock(&self, token: Address, amount: U256, duration_days: u32) -> SdkResult<String> {
        validate_amount(amount)?;
        validate_duration(duration_days)?;

        let erc20 = Erc20Contract::new(self.backend.clone(), token);
        ensure_allowance(&erc20, self.backend.sender(), self.address, amount).await?;

        let duration = self.unit.encode_days(duration_days);
        tracing::info!(
            token = %token,
            amount = %amount,
            duration_days,
            duration,
            "Locking tokens"
        );

        let receipt = transact(
            self.backend.as_ref(),
            self.address,
            ITokenLocker::lockCall {
                _token: token,
                _amount: amount,
                _duration: U256::from(duration),
            },
        )
        .await?;

        match find_event::<TokensLocked>(&receipt, self.address) {
            Some(locked) => tracing::info!(
                tx_hash = %receipt.tx_hash,
                unlock_time = %locked.unlockTime,
                "Tokens locked"
            ),
            None => tracing::info!(tx_hash = %receipt.tx_hash, "Tokens locked"),
        }
        Ok(receipt.tx_hash)
    }

    /// Withdraw an expired lock. `lock_index` is the position in
    /// [`user_locks`](Self::user_locks).
    pub async fn unlock(&self, token: Address, lock_index: u64) -> SdkResult<String> {
        let receipt = transact(
            self.backend.as_ref(),
            self.address,
            ITokenLocker::unlockCall {
                _token: token,
                _lockIndex: U256::from(lock_index),
            },
        )
        .await?;

        if let Some(unlocked) = find_event::<TokensUnlocked>(&receipt, self.address) {
            tracing::info!(tx_hash = %receipt.tx_hash, amount = %unlocked.amount, "Tokens unlocked");
        }
        Ok(receipt.tx_hash)
    }

    /// Locks held by `user` on `token`, indexed as the contract indexes them.
    pub async fn user_locks(&self, user: Address, token: Address) -> SdkResult<Vec<LockRecord>> {
        let locks = view(
            self.backend.as_ref(),
            self.address,
            ITokenLocker::getUserLocksCall {
                _user: user,
                _token: token,
            },
        )
        .await?;

        Ok(locks
            .into_iter()
            .enumerate()
            .map(|(index, lock)| LockRecord {
                lock_id: index as u64,
                amount: lock.amount,
                lock_time: to_u64(lock.lockTime),
                unlock_time: to_u64(lock.unlockTime),
                withdrawn: lock.withdrawn,
            })
            .collect())
    }

    /// Every lock on `token`.
    pub async fn token_locks(&self, token: Address) -> SdkResult<Vec<TokenLockRecord>> {
        let locks = view(
            self.backend.as_ref(),
            self.address,
            ITokenLocker::getTokenLocksCall { _token: token },
        )
        .await?;
        Ok(locks.into_iter().map(TokenLockRecord::from).collect())
    }
}
