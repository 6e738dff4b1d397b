// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain access for the contract adapters.
//!
//! Every adapter talks to the node through [`ChainBackend`]: read-only
//! `eth_call`s, and transactions that are submitted and awaited until
//! inclusion. [`RpcBackend`] is the alloy-backed implementation bound to a
//! single signer.

use std::str::FromStr;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use async_trait::async_trait;

use super::types::{NetworkConfig, TxReceipt};
use crate::error::{SdkError, SdkResult};

/// Node access used by the contract adapters.
#[async_trait]
pub trait ChainBackend: Send + Sync {
    /// Address transactions are sent from.
    fn sender(&self) -> Address;

    /// Execute a read-only call and return the raw return data.
    async fn call(&self, to: Address, input: Bytes) -> SdkResult<Bytes>;

    /// Submit a transaction and wait until it is included.
    ///
    /// A reverted transaction still yields a receipt with `success == false`.
    async fn send(&self, to: Address, input: Bytes) -> SdkResult<TxReceipt>;

    /// Latest block number seen by the node.
    async fn block_number(&self) -> SdkResult<u64>;
}

/// JSON-RPC backend with a local signer.
pub struct RpcBackend {
    network: NetworkConfig,
    sender: Address,
    provider: DynProvider,
}

impl RpcBackend {
    /// Connect to `network.rpc_url`, signing with `signer`.
    pub fn connect(network: NetworkConfig, signer: PrivateKeySigner) -> SdkResult<Self> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| SdkError::Config(format!("Invalid RPC URL: {e}")))?;

        let sender = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self {
            network,
            sender,
            provider,
        })
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

#[async_trait]
impl ChainBackend for RpcBackend {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn call(&self, to: Address, input: Bytes) -> SdkResult<Bytes> {
        let tx = TransactionRequest::default()
            .from(self.sender)
            .to(to)
            .input(input.into());

        self.provider
            .call(tx)
            .await
            .map_err(|e| SdkError::chain_call(e.to_string()))
    }

    async fn send(&self, to: Address, input: Bytes) -> SdkResult<TxReceipt> {
        let tx = TransactionRequest::default().to(to).input(input.into());

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| SdkError::chain_call(format!("Failed to send: {e}")))?;

        let tx_hash = format!("{:#x}", pending.tx_hash());
        tracing::debug!(
            tx_hash = %tx_hash,
            explorer = %self.network.tx_url(&tx_hash),
            "Transaction sent, waiting for inclusion"
        );

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| SdkError::confirmation(format!("{tx_hash}: {e}")))?;

        Ok(TxReceipt {
            tx_hash: format!("{:#x}", receipt.transaction_hash),
            block_number: receipt.block_number.unwrap_or(0),
            gas_used: receipt.gas_used,
            success: receipt.status(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        })
    }

    async fn block_number(&self) -> SdkResult<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| SdkError::chain_call(format!("RPC error: {e}")))
    }
}

/// Create a signer from a private key (hex string, with or without 0x).
pub fn create_signer(private_key_hex: &str) -> SdkResult<PrivateKeySigner> {
    PrivateKeySigner::from_str(private_key_hex.trim())
        .map_err(|e| SdkError::Config(format!("Invalid private key: {e}")))
}

/// Encode `call`, run it as a view against `to` and decode the return data.
pub(crate) async fn view<C: SolCall>(
    backend: &dyn ChainBackend,
    to: Address,
    call: C,
) -> SdkResult<C::Return> {
    let output = backend.call(to, call.abi_encode().into()).await?;
    C::abi_decode_returns(&output)
        .map_err(|e| SdkError::chain_call(format!("{}: bad return data: {e}", C::SIGNATURE)))
}

/// Encode `call`, submit it to `to` and require a successful receipt.
pub(crate) async fn transact<C: SolCall>(
    backend: &dyn ChainBackend,
    to: Address,
    call: C,
) -> SdkResult<TxReceipt> {
    let receipt = backend.send(to, call.abi_encode().into()).await?;
    ensure_success(receipt, C::SIGNATURE)
}

/// Fail with `ChainCall` if the receipt reports a revert.
pub(crate) fn ensure_success(receipt: TxReceipt, action: &str) -> SdkResult<TxReceipt> {
    if receipt.success {
        Ok(receipt)
    } else {
        Err(SdkError::chain_call(format!(
            "{action} reverted in transaction {}",
            receipt.tx_hash
        )))
    }
}
