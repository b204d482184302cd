//! Opportunity Detector
//!
//! Compares two quotes for the identical (token_in, token_out, amount_in)
//! and emits an Opportunity when venue B's output beats venue A's by more
//! than the configured minimum profit. Detection is one-directional:
//! venue A is the buy leg, venue B the sell leg. Ties and negative
//! spreads are discarded without error; absence of opportunity is the
//! common case.
//!
//! Author: AI-Generated
//! Created: 2026-02-03

use crate::types::{DecodedSwap, Opportunity, Quote};
use ethers::types::U256;
use tracing::debug;

pub struct OpportunityDetector {
    /// Spread must exceed this to be worth an execution attempt.
    /// Zero preserves the any-positive-spread behavior.
    min_profit_wei: U256,
}

impl OpportunityDetector {
    pub fn new(min_profit_wei: U256) -> Self {
        Self { min_profit_wei }
    }

    /// Evaluate a quote pair. Both quotes must have been computed for
    /// `swap`'s token pair and input amount; callers uphold that.
    pub fn evaluate(
        &self,
        swap: &DecodedSwap,
        quote_a: &Quote,
        quote_b: &Quote,
    ) -> Option<Opportunity> {
        if quote_b.amount_out <= quote_a.amount_out {
            debug!(
                "No spread for {:?}->{:?}: {}={} {}={}",
                swap.token_in,
                swap.token_out,
                quote_a.venue.name,
                quote_a.amount_out,
                quote_b.venue.name,
                quote_b.amount_out
            );
            return None;
        }

        let profit = quote_b.amount_out - quote_a.amount_out;
        if profit <= self.min_profit_wei {
            debug!(
                "Spread {} below minimum {} for {:?}->{:?}",
                profit, self.min_profit_wei, swap.token_in, swap.token_out
            );
            return None;
        }

        Some(Opportunity {
            token_in: swap.token_in,
            token_out: swap.token_out,
            amount_in: swap.amount_in,
            buy: quote_a.venue.clone(),
            sell: quote_b.venue.clone(),
            buy_amount_out: quote_a.amount_out,
            sell_amount_out: quote_b.amount_out,
            profit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Venue;
    use ethers::types::Address;

    fn venue(name: &str, seed: u8) -> Venue {
        Venue {
            name: name.to_string(),
            factory: Address::repeat_byte(seed),
            router: Address::repeat_byte(seed + 1),
        }
    }

    fn quote(name: &str, seed: u8, amount_out: u64) -> Quote {
        Quote {
            venue: venue(name, seed),
            pool: Address::repeat_byte(seed + 2),
            amount_out: U256::from(amount_out),
        }
    }

    fn swap(amount_in: u64) -> DecodedSwap {
        DecodedSwap {
            function_name: "swapExactTokensForTokens",
            token_in: Address::repeat_byte(0x01),
            token_out: Address::repeat_byte(0x02),
            amount_in: U256::from(amount_in),
            amount_out_min: U256::zero(),
        }
    }

    #[test]
    fn test_emits_when_b_beats_a() {
        // The 1000/3000 vs 1000/3050 reserve scenario: 29 vs 30.
        let detector = OpportunityDetector::new(U256::zero());
        let opp = detector
            .evaluate(
                &swap(10),
                &quote("UniswapV2", 0x10, 29),
                &quote("SushiSwap", 0x20, 30),
            )
            .expect("spread of 1 must be detected");

        assert_eq!(opp.profit, U256::from(1));
        assert_eq!(opp.buy.name, "UniswapV2");
        assert_eq!(opp.sell.name, "SushiSwap");
        assert_eq!(opp.amount_in, U256::from(10));
        assert_eq!(opp.buy_amount_out, U256::from(29));
        assert_eq!(opp.sell_amount_out, U256::from(30));
    }

    #[test]
    fn test_tie_discarded() {
        let detector = OpportunityDetector::new(U256::zero());
        let a = quote("UniswapV2", 0x10, 30);
        let b = quote("SushiSwap", 0x20, 30);
        assert!(detector.evaluate(&swap(10), &a, &b).is_none());
    }

    #[test]
    fn test_negative_spread_discarded() {
        let detector = OpportunityDetector::new(U256::zero());
        let a = quote("UniswapV2", 0x10, 31);
        let b = quote("SushiSwap", 0x20, 30);
        assert!(detector.evaluate(&swap(10), &a, &b).is_none());
    }

    #[test]
    fn test_min_profit_threshold() {
        let a = quote("UniswapV2", 0x10, 29);
        let b = quote("SushiSwap", 0x20, 30);

        // Profit of exactly the minimum is not enough.
        let detector = OpportunityDetector::new(U256::from(1));
        assert!(detector.evaluate(&swap(10), &a, &b).is_none());

        let detector = OpportunityDetector::new(U256::zero());
        assert!(detector.evaluate(&swap(10), &a, &b).is_some());
    }
}
