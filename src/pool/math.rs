//! Constant-Product Math
//!
//! Output calculation for V2-style pools (x * y = k) with the standard
//! 0.30% fee (997/1000). All arithmetic is integer; intermediate
//! products use U512 so that adversarial calldata amounts near 2^256
//! cannot overflow. Floor division matches the on-chain router exactly.
//!
//! Author: AI-Generated
//! Created: 2026-02-03

use ethers::types::{U256, U512};

/// Fee-adjusted input multiplier: the pool keeps 3/1000 of the input.
const FEE_NUMERATOR: u64 = 997;
const FEE_DENOMINATOR: u64 = 1000;

/// Output amount for a given input against (reserve_in, reserve_out).
///
/// Formula: amount_out = (amount_in * 997 * reserve_out)
///                     / (reserve_in * 1000 + amount_in * 997)
///
/// Zero input or a zero reserve yields zero output; callers that need to
/// distinguish an empty pool check the reserves before calling.
pub fn amount_out(amount_in: U256, reserve_in: U256, reserve_out: U256) -> U256 {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return U256::zero();
    }

    let amount_in_with_fee: U512 = amount_in.full_mul(U256::from(FEE_NUMERATOR));
    let numerator = amount_in_with_fee * U512::from(reserve_out);
    let denominator = U512::from(reserve_in) * U512::from(FEE_DENOMINATOR) + amount_in_with_fee;

    // The quotient is strictly below reserve_out, so it always fits U256.
    U256::try_from(numerator / denominator).unwrap_or(U256::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_reserve_scenario() {
        // reserves (1000, 3000) vs (1000, 3050), amount_in 10:
        // floor(10*997*3000 / (1000*1000 + 10*997)) = 29
        // floor(10*997*3050 / 1009970) = 30
        let out_a = amount_out(U256::from(10), U256::from(1000), U256::from(3000));
        let out_b = amount_out(U256::from(10), U256::from(1000), U256::from(3050));
        assert_eq!(out_a, U256::from(29));
        assert_eq!(out_b, U256::from(30));
    }

    #[test]
    fn test_zero_cases() {
        let r = U256::from(1_000_000u64);
        assert_eq!(amount_out(U256::zero(), r, r), U256::zero());
        assert_eq!(amount_out(r, U256::zero(), r), U256::zero());
        assert_eq!(amount_out(r, r, U256::zero()), U256::zero());
    }

    #[test]
    fn test_monotonic_in_amount_in() {
        let reserve_in = U256::from(1_000_000_000_000u64);
        let reserve_out = U256::from(2_500_000_000_000u64);

        let mut previous = U256::zero();
        for exp in 0..12u32 {
            let amount_in = U256::from(10u64).pow(U256::from(exp));
            let out = amount_out(amount_in, reserve_in, reserve_out);
            assert!(
                out >= previous,
                "output decreased at amount_in=10^{}: {} < {}",
                exp,
                out,
                previous
            );
            previous = out;
        }
    }

    #[test]
    fn test_fee_strictly_reduces_output() {
        // With fee, output must be strictly below the no-fee spot amount
        // amount_in * reserve_out / reserve_in for any positive input.
        // Compared cross-multiplied (out * reserve_in < amount_in *
        // reserve_out) to keep the bound exact under integer flooring.
        let cases = [
            (10u64, 1000u64, 3000u64),
            (1u64, 7u64, 13u64),
            (500u64, 1_000_000u64, 900_000u64),
            (1_000_000u64, 2u64, 1_000_000_000u64),
        ];
        for (a, rin, rout) in cases {
            let with_fee = amount_out(U256::from(a), U256::from(rin), U256::from(rout));
            assert!(
                with_fee.full_mul(U256::from(rin)) < U256::from(a).full_mul(U256::from(rout)),
                "fee did not reduce output for ({}, {}, {})",
                a,
                rin,
                rout
            );
        }
    }

    #[test]
    fn test_extreme_amount_does_not_panic() {
        // Adversarial calldata can carry amount_in near 2^256; the U512
        // intermediates keep the computation total.
        let out = amount_out(
            U256::MAX,
            U256::from(1_000_000u64),
            U256::from(3_000_000u64),
        );
        // Output asymptotically approaches reserve_out but never reaches it.
        assert!(out < U256::from(3_000_000u64));
        assert!(out > U256::from(2_999_000u64));
    }

    #[test]
    fn test_output_bounded_by_reserve_out() {
        let out = amount_out(
            U256::from(u128::MAX),
            U256::from(1u64),
            U256::from(5_000u64),
        );
        assert!(out < U256::from(5_000u64));
    }
}
