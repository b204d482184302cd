//! Nonce Allocation
//!
//! Serializes nonce assignment for the bot account. Concurrent detection
//! passes that both reach execution must not sign two transactions with
//! the same nonce, so allocation goes through a single mutex-guarded
//! counter seeded from the node's pending nonce. After a failed attempt
//! the reserved nonce is never consumed on-chain; callers invalidate the
//! counter so the next attempt re-seeds from the node.
//!
//! Author: AI-Generated
//! Created: 2026-02-04

use crate::errors::BuildError;
use ethers::prelude::*;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct NonceAllocator<M> {
    provider: Arc<M>,
    address: Address,
    next: Mutex<Option<U256>>,
}

impl<M: Middleware + 'static> NonceAllocator<M> {
    pub fn new(provider: Arc<M>, address: Address) -> Self {
        Self {
            provider,
            address,
            next: Mutex::new(None),
        }
    }

    /// Reserve the next nonce. Seeds from the node's pending-state view
    /// on first use (and after invalidation), then hands out consecutive
    /// values without further node round trips.
    pub async fn reserve(&self) -> Result<U256, BuildError> {
        let mut slot = self.next.lock().await;

        let nonce = match *slot {
            Some(cached) => cached,
            None => {
                let fetched = self
                    .provider
                    .get_transaction_count(self.address, Some(BlockNumber::Pending.into()))
                    .await
                    .map_err(|e| BuildError::Nonce(e.to_string()))?;
                debug!("Nonce counter seeded at {} for {:?}", fetched, self.address);
                fetched
            }
        };

        *slot = Some(nonce + U256::one());
        Ok(nonce)
    }

    /// Drop the cached counter. The next reserve() re-seeds from the
    /// node, reclaiming nonces reserved by attempts that never landed.
    pub async fn invalidate(&self) {
        let mut slot = self.next.lock().await;
        if slot.take().is_some() {
            debug!("Nonce counter invalidated for {:?}", self.address);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::providers::Provider;

    #[tokio::test]
    async fn test_seeds_once_then_increments() {
        let (provider, mock) = Provider::mocked();
        mock.push(U256::from(7)).unwrap();

        let allocator = NonceAllocator::new(Arc::new(provider), Address::repeat_byte(0xab));

        assert_eq!(allocator.reserve().await.unwrap(), U256::from(7));
        // No further mock responses queued: these must come from the cache.
        assert_eq!(allocator.reserve().await.unwrap(), U256::from(8));
        assert_eq!(allocator.reserve().await.unwrap(), U256::from(9));
    }

    #[tokio::test]
    async fn test_invalidate_reseeds_from_node() {
        let (provider, mock) = Provider::mocked();
        mock.push(U256::from(3)).unwrap();

        let allocator = NonceAllocator::new(Arc::new(provider), Address::repeat_byte(0xab));
        assert_eq!(allocator.reserve().await.unwrap(), U256::from(3));

        allocator.invalidate().await;
        mock.push(U256::from(3)).unwrap();
        assert_eq!(allocator.reserve().await.unwrap(), U256::from(3));
    }

    #[tokio::test]
    async fn test_node_failure_surfaces_as_build_error() {
        let (provider, _mock) = Provider::mocked();
        // Nothing queued: the mocked transport errors out.
        let allocator = NonceAllocator::new(Arc::new(provider), Address::repeat_byte(0xab));
        assert!(matches!(
            allocator.reserve().await,
            Err(BuildError::Nonce(_))
        ));
    }
}
