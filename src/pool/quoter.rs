//! Pool Quoter
//!
//! Resolves the concrete pair contract for a (token_in, token_out) pair
//! through a venue's factory, reads its reserves, and applies the
//! constant-product formula. All three reads accept an optional block
//! context so that block-sourced passes can pin both venue quotes to the
//! same chain height; pending-path passes quote against the freshest
//! available state (best-effort: the reserves may move before the
//! comparison completes).
//!
//! Author: AI-Generated
//! Created: 2026-02-03

use crate::contracts::{IUniswapV2Factory, IUniswapV2Pair};
use crate::errors::QuoteError;
use crate::pool::math;
use crate::types::{Quote, Venue};
use ethers::prelude::*;
use std::sync::Arc;
use tracing::debug;

pub struct PoolQuoter<M> {
    provider: Arc<M>,
}

impl<M: Middleware + 'static> PoolQuoter<M> {
    pub fn new(provider: Arc<M>) -> Self {
        Self { provider }
    }

    /// Expected output for swapping `amount_in` of `token_in` into
    /// `token_out` on `venue`'s pool, at `block` (None = latest).
    pub async fn quote(
        &self,
        venue: &Venue,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        block: Option<u64>,
    ) -> Result<Quote, QuoteError> {
        let factory = IUniswapV2Factory::new(venue.factory, Arc::clone(&self.provider));

        let mut pair_call = factory.get_pair(token_in, token_out);
        if let Some(number) = block {
            pair_call = pair_call.block(number);
        }
        let pool: Address = pair_call
            .call()
            .await
            .map_err(|e| QuoteError::Node(format!("getPair on {}: {}", venue.name, e)))?;

        if pool == Address::zero() {
            return Err(QuoteError::PairNotFound {
                venue: venue.name.clone(),
            });
        }

        let pair = IUniswapV2Pair::new(pool, Arc::clone(&self.provider));

        let mut reserves_call = pair.get_reserves();
        if let Some(number) = block {
            reserves_call = reserves_call.block(number);
        }
        let (reserve0, reserve1, _timestamp) = reserves_call
            .call()
            .await
            .map_err(|e| QuoteError::Node(format!("getReserves on {}: {}", venue.name, e)))?;

        let mut token0_call = pair.token_0();
        if let Some(number) = block {
            token0_call = token0_call.block(number);
        }
        let token0: Address = token0_call
            .call()
            .await
            .map_err(|e| QuoteError::Node(format!("token0 on {}: {}", venue.name, e)))?;

        // Orient the reserves: getReserves() always reports in token0
        // order, regardless of the direction being quoted.
        let (reserve_in, reserve_out) = if token_in == token0 {
            (U256::from(reserve0), U256::from(reserve1))
        } else {
            (U256::from(reserve1), U256::from(reserve0))
        };

        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(QuoteError::InsufficientLiquidity {
                venue: venue.name.clone(),
                pool,
            });
        }

        let amount_out = math::amount_out(amount_in, reserve_in, reserve_out);

        debug!(
            "Quote {} | pool {:?} | in={} out={} (reserves {}/{})",
            venue.name, pool, amount_in, amount_out, reserve_in, reserve_out
        );

        Ok(Quote {
            venue: venue.clone(),
            pool,
            amount_out,
        })
    }

    /// Raw reserve snapshot for a pair on one venue, in token0 order.
    /// Used by the per-block reserve monitor; detection goes through
    /// quote() instead.
    pub async fn reserves(
        &self,
        venue: &Venue,
        token_a: Address,
        token_b: Address,
        block: Option<u64>,
    ) -> Result<(Address, U256, U256), QuoteError> {
        let factory = IUniswapV2Factory::new(venue.factory, Arc::clone(&self.provider));

        let mut pair_call = factory.get_pair(token_a, token_b);
        if let Some(number) = block {
            pair_call = pair_call.block(number);
        }
        let pool: Address = pair_call
            .call()
            .await
            .map_err(|e| QuoteError::Node(format!("getPair on {}: {}", venue.name, e)))?;

        if pool == Address::zero() {
            return Err(QuoteError::PairNotFound {
                venue: venue.name.clone(),
            });
        }

        let pair = IUniswapV2Pair::new(pool, Arc::clone(&self.provider));
        let mut reserves_call = pair.get_reserves();
        if let Some(number) = block {
            reserves_call = reserves_call.block(number);
        }
        let (reserve0, reserve1, _timestamp) = reserves_call
            .call()
            .await
            .map_err(|e| QuoteError::Node(format!("getReserves on {}: {}", venue.name, e)))?;

        Ok((pool, U256::from(reserve0), U256::from(reserve1)))
    }
}
