//! Bundle Builder
//!
//! Assembles, prices, and signs the transaction that captures an
//! opportunity through the flash-loan executor contract. Every step is
//! independently fallible and nothing is retried within an attempt: by
//! the time a retry resolved, the one-block window would be gone.
//!
//! Gas limit is a fixed conservative ceiling rather than an estimate.
//! The executor contract's execution path depends on the opportunity,
//! and eth_estimateGas is a round trip the race cannot afford.
//!
//! Author: AI-Generated
//! Created: 2026-02-04

use crate::arbitrage::nonce::NonceAllocator;
use crate::contracts::IFlashArbExecutor;
use crate::errors::BuildError;
use crate::types::{Opportunity, SignedBundle};
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::utils::keccak256;
use std::sync::Arc;
use tracing::debug;

pub struct BundleBuilder<M> {
    provider: Arc<M>,
    wallet: LocalWallet,
    executor_address: Address,
    gas_limit: u64,
    chain_id: u64,
    nonces: Arc<NonceAllocator<M>>,
}

impl<M: Middleware + 'static> BundleBuilder<M> {
    pub fn new(
        provider: Arc<M>,
        wallet: LocalWallet,
        executor_address: Address,
        gas_limit: u64,
        chain_id: u64,
        nonces: Arc<NonceAllocator<M>>,
    ) -> Self {
        Self {
            provider,
            wallet,
            executor_address,
            gas_limit,
            chain_id,
            nonces,
        }
    }

    /// Build and sign the arbitrage transaction for the next block.
    pub async fn build(
        &self,
        opportunity: &Opportunity,
        current_block: u64,
    ) -> Result<SignedBundle, BuildError> {
        // Nonce first: it is the only shared resource and must be fresh
        // per attempt.
        let nonce = self.nonces.reserve().await?;

        let calldata = self.arbitrage_calldata(opportunity)?;

        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| BuildError::GasPrice(e.to_string()))?;

        let request = TransactionRequest::new()
            .from(self.wallet.address())
            .to(self.executor_address)
            .value(0)
            .gas(self.gas_limit)
            .gas_price(gas_price)
            .nonce(nonce)
            .data(calldata)
            .chain_id(self.chain_id);
        let tx: TypedTransaction = request.into();

        let signature = self
            .wallet
            .sign_transaction(&tx)
            .await
            .map_err(|e| BuildError::Sign(e.to_string()))?;

        let raw_tx = tx.rlp_signed(&signature);
        let tx_hash = H256::from(keccak256(&raw_tx));
        let target_block = current_block + 1;

        debug!(
            "Bundle built: {:?} | nonce {} | gas_price {} | target block {}",
            tx_hash, nonce, gas_price, target_block
        );

        Ok(SignedBundle {
            raw_tx,
            tx_hash,
            target_block,
        })
    }

    /// startArbitrage(tokenIn, tokenOut, amountIn, routerBuy, routerSell)
    fn arbitrage_calldata(&self, opportunity: &Opportunity) -> Result<Bytes, BuildError> {
        let executor = IFlashArbExecutor::new(self.executor_address, Arc::clone(&self.provider));
        executor
            .start_arbitrage(
                opportunity.token_in,
                opportunity.token_out,
                opportunity.amount_in,
                opportunity.buy.router,
                opportunity.sell.router,
            )
            .calldata()
            .ok_or_else(|| BuildError::Encode("startArbitrage".to_string()))
    }
}
