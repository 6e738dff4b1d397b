// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only lens aggregator.

use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    sol,
};

use super::client::{view, ChainBackend};
use super::types::{format_amount, to_u64, TokenLockRecord, TvlSnapshot, VestingScheduleInfo};
use crate::error::SdkResult;

sol! {
    struct LockedPosition {
        address token;
        uint256 tokenId;
        uint128 liquidity;
        uint256 amount0;
        uint256 amount1;
        uint256 valueUSD;
    }

    struct ScheduleView {
        address beneficiary;
        uint256 totalAmount;
        uint256 released;
        uint256 startTime;
        uint256 cliffDuration;
        uint256 vestingDuration;
        bool revoked;
    }

    struct LockView {
        address user;
        uint256 amount;
        uint256 lockTime;
        uint256 unlockTime;
        bool withdrawn;
    }

    interface IMavrkLens {
        function lockerTVL(bool isLiquidity) external view returns (LockedPosition[] memory);
        function vestingSchedulesByToken(address _token) external view returns (ScheduleView[] memory);
        function tokenLocksByToken(address _token) external view returns (LockView[] memory);
    }
}

/// USD values from the lens are fixed point with 18 decimals.
const USD_DECIMALS: u8 = 18;

/// Lens adapter.
#[derive(Clone)]
pub struct LensContract {
    backend: Arc<dyn ChainBackend>,
    address: Address,
}

impl LensContract {
    pub fn new(backend: Arc<dyn ChainBackend>, address: Address) -> Self {
        Self { backend, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// TVL of the liquidity locker (`true`) or the token locker (`false`).
    pub async fn locker_tvl(&self, is_liquidity: bool) -> SdkResult<TvlSnapshot> {
        let positions = view(
            self.backend.as_ref(),
            self.address,
            IMavrkLens::lockerTVLCall {
                isLiquidity: is_liquidity,
            },
        )
        .await?;
        Ok(summarize_positions(&positions))
    }

    /// All vesting schedules on `token`.
    pub async fn vesting_schedules_by_token(
        &self,
        token: Address,
    ) -> SdkResult<Vec<VestingScheduleInfo>> {
        let schedules = view(
            self.backend.as_ref(),
            self.address,
            IMavrkLens::vestingSchedulesByTokenCall { _token: token },
        )
        .await?;

        Ok(schedules
            .into_iter()
            .map(|s| VestingScheduleInfo {
                beneficiary: Some(format!("{:#x}", s.beneficiary)),
                total_amount: s.totalAmount,
                released: s.released,
                start_time: to_u64(s.startTime),
                cliff_duration: to_u64(s.cliffDuration),
                vesting_duration: to_u64(s.vestingDuration),
                revoked: s.revoked,
            })
            .collect())
    }

    /// All locks on `token`.
    pub async fn token_locks_by_token(&self, token: Address) -> SdkResult<Vec<TokenLockRecord>> {
        let locks = view(
            self.backend.as_ref(),
            self.address,
            IMavrkLens::tokenLocksByTokenCall { _token: token },
        )
        .await?;

        Ok(locks
            .into_iter()
            .map(|l| TokenLockRecord {
                user: format!("{:#x}", l.user),
                amount: l.amount,
                lock_time: to_u64(l.lockTime),
                unlock_time: to_u64(l.unlockTime),
                withdrawn: l.withdrawn,
            })
            .collect())
    }
}

fn usd_value(value: U256) -> f64 {
    format_amount(value, USD_DECIMALS).parse().unwrap_or(0.0)
}

/// Sum position values into a snapshot.
pub(crate) fn summarize_positions(positions: &[LockedPosition]) -> TvlSnapshot {
    TvlSnapshot {
        total_value_usd: positions.iter().map(|p| usd_value(p.valueUSD)).sum(),
        position_count: positions.len(),
    }
}
