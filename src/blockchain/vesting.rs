// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Linear vesting contract.
//!
//! The schedule revision lets the caller pick beneficiary, start, cliff and
//! duration; the preset revision only takes one of four fixed options and
//! vests to the caller. Each adapter speaks exactly one revision.

use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    sol,
};

use super::client::{transact, view, ChainBackend};
use super::erc20::{ensure_allowance, Erc20Contract};
use super::events::find_event;
use super::types::{to_u64, TxReceipt, VestingScheduleInfo};
use crate::config::VestingRevision;
use crate::error::SdkResult;
use crate::validation::{
    ensure_vesting_revision, parse_address, validate_amount, validate_vesting_option,
};

sol! {
    struct VestingSchedule {
        uint256 totalAmount;
        uint256 released;
        uint256 startTime;
        uint256 cliffDuration;
        uint256 vestingDuration;
        bool revoked;
    }

    interface IScheduleVesting {
        function createVestingSchedule(address _beneficiary, address _token, uint256 _amount, uint256 _startTime, uint256 _cliffDuration, uint256 _vestingDuration) external;
        function release(address _token) external;
        function getVestingSchedule(address _beneficiary, address _token) external view returns (VestingSchedule memory);
        function computeReleasableAmount(address _beneficiary, address _token) external view returns (uint256);
    }

    interface IPresetVesting {
        function createVestingSchedule(address _token, uint256 _amount, uint8 _vestingOption) external;
        function claimVestedTokens(uint256 _vestingId) external;
        function getClaimableAmount(address _user, uint256 _vestingId) external view returns (uint256);
    }

    event VestingScheduleCreated(address indexed beneficiary, address indexed token, uint256 amount, uint256 startTime, uint256 duration);
    event TokensReleased(address indexed beneficiary, address indexed token, uint256 amount);
}

/// Request to put tokens under a vesting schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VestingRequest {
    /// Caller-defined schedule. Times and durations are unix seconds.
    Schedule {
        beneficiary: String,
        token: String,
        amount: U256,
        start_time: u64,
        cliff_duration: u64,
        vesting_duration: u64,
    },
    /// Fixed preset: 1=30d, 2=60d, 3=90d, 4=180d.
    Preset {
        token: String,
        amount: U256,
        option: u8,
    },
}

impl VestingRequest {
    /// Contract revision this request is valid for.
    pub fn revision(&self) -> VestingRevision {
        match self {
            VestingRequest::Schedule { .. } => VestingRevision::Schedule,
            VestingRequest::Preset { .. } => VestingRevision::Preset,
        }
    }

    pub fn amount(&self) -> U256 {
        match self {
            VestingRequest::Schedule { amount, .. } | VestingRequest::Preset { amount, .. } => {
                *amount
            }
        }
    }
}

/// Linear vesting adapter.
#[derive(Clone)]
pub struct VestingContract {
    backend: Arc<dyn ChainBackend>,
    address: Address,
    revision: VestingRevision,
}

impl VestingContract {
    pub fn new(backend: Arc<dyn ChainBackend>, address: Address, revision: VestingRevision) -> Self {
        Self {
            backend,
            address,
            revision,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn revision(&self) -> VestingRevision {
        self.revision
    }

    /// Validate, approve if needed, and create the vesting schedule.
    pub async fn create(&self, request: &VestingRequest) -> SdkResult<String> {
        ensure_vesting_revision(request.revision(), self.revision)?;

        let receipt = match request {
            VestingRequest::Schedule {
                beneficiary,
                token,
                amount,
                start_time,
                cliff_duration,
                vesting_duration,
            } => {
                let beneficiary = parse_address("beneficiary", beneficiary)?;
                let token = parse_address("token", token)?;
                validate_amount(*amount)?;

                self.approve(token, *amount).await?;
                tracing::info!(
                    beneficiary = %beneficiary,
                    token = %token,
                    amount = %amount,
                    start_time,
                    cliff_duration,
                    vesting_duration,
                    "Creating vesting schedule"
                );
                transact(
                    self.backend.as_ref(),
                    self.address,
                    IScheduleVesting::createVestingScheduleCall {
                        _beneficiary: beneficiary,
                        _token: token,
                        _amount: *amount,
                        _startTime: U256::from(*start_time),
                        _cliffDuration: U256::from(*cliff_duration),
                        _vestingDuration: U256::from(*vesting_duration),
                    },
                )
                .await?
            }
            VestingRequest::Preset {
                token,
                amount,
                option,
            } => {
                let token = parse_address("token", token)?;
                validate_amount(*amount)?;
                validate_vesting_option(*option)?;

                self.approve(token, *amount).await?;
                tracing::info!(token = %token, amount = %amount, option, "Creating vesting schedule");
                transact(
                    self.backend.as_ref(),
                    self.address,
                    IPresetVesting::createVestingScheduleCall {
                        _token: token,
                        _amount: *amount,
                        _vestingOption: *option,
                    },
                )
                .await?
            }
        };

        match self.schedule_created(&receipt) {
            Some(created) => tracing::info!(
                tx_hash = %receipt.tx_hash,
                beneficiary = %created.beneficiary,
                start_time = %created.startTime,
                duration = %created.duration,
                "Vesting schedule created"
            ),
            None => tracing::info!(tx_hash = %receipt.tx_hash, "Vesting schedule created"),
        }
        Ok(receipt.tx_hash)
    }

    /// `VestingScheduleCreated` from a creation receipt. Only the schedule
    /// revision emits it.
    fn schedule_created(&self, receipt: &TxReceipt) -> Option<VestingScheduleCreated> {
        match self.revision {
            VestingRevision::Schedule => {
                find_event::<VestingScheduleCreated>(receipt, self.address)
            }
            VestingRevision::Preset => None,
        }
    }

    async fn approve(&self, token: Address, amount: U256) -> SdkResult<Option<String>> {
        let erc20 = Erc20Contract::new(self.backend.clone(), token);
        ensure_allowance(&erc20, self.backend.sender(), self.address, amount).await
    }

    /// Release vested tokens of `token` to the caller.
    pub async fn release(&self, token: Address) -> SdkResult<String> {
        ensure_vesting_revision(VestingRevision::Schedule, self.revision)?;
        let receipt = transact(
            self.backend.as_ref(),
            self.address,
            IScheduleVesting::releaseCall { _token: token },
        )
        .await?;
        if let Some(released) = find_event::<TokensReleased>(&receipt, self.address) {
            tracing::info!(tx_hash = %receipt.tx_hash, amount = %released.amount, "Tokens released");
        }
        Ok(receipt.tx_hash)
    }

    /// Schedule of `beneficiary` for `token`.
    pub async fn schedule(
        &self,
        beneficiary: Address,
        token: Address,
    ) -> SdkResult<VestingScheduleInfo> {
        ensure_vesting_revision(VestingRevision::Schedule, self.revision)?;
        let schedule = view(
            self.backend.as_ref(),
            self.address,
            IScheduleVesting::getVestingScheduleCall {
                _beneficiary: beneficiary,
                _token: token,
            },
        )
        .await?;

        Ok(VestingScheduleInfo {
            beneficiary: Some(format!("{beneficiary:#x}")),
            total_amount: schedule.totalAmount,
            released: schedule.released,
            start_time: to_u64(schedule.startTime),
            cliff_duration: to_u64(schedule.cliffDuration),
            vesting_duration: to_u64(schedule.vestingDuration),
            revoked: schedule.revoked,
        })
    }

    /// Amount `beneficiary` could release now.
    pub async fn releasable_amount(&self, beneficiary: Address, token: Address) -> SdkResult<U256> {
        ensure_vesting_revision(VestingRevision::Schedule, self.revision)?;
        view(
            self.backend.as_ref(),
            self.address,
            IScheduleVesting::computeReleasableAmountCall {
                _beneficiary: beneficiary,
                _token: token,
            },
        )
        .await
    }

    /// Claim everything vested so far on a preset schedule.
    pub async fn claim(&self, vesting_id: U256) -> SdkResult<String> {
        ensure_vesting_revision(VestingRevision::Preset, self.revision)?;
        let receipt = transact(
            self.backend.as_ref(),
            self.address,
            IPresetVesting::claimVestedTokensCall {
                _vestingId: vesting_id,
            },
        )
        .await?;
        Ok(receipt.tx_hash)
    }

    /// Amount `user` could claim now on a preset schedule.
    pub async fn claimable_amount(&self, user: Address, vesting_id: U256) -> SdkResult<U256> {
        ensure_vesting_revision(VestingRevision::Preset, self.revision)?;
        view(
            self.backend.as_ref(),
            self.address,
            IPresetVesting::getClaimableAmountCall {
                _user: user,
                _vestingId: vesting_id,
            },
        )
        .await
    }
}
