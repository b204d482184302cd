//! Centralized Contract Definitions
//!
//! All Solidity interfaces the engine touches, defined once with
//! ethers' `abigen!` macro. Quote reads go through the V2 factory/pair
//! pair of interfaces; execution encodes against the flash-loan
//! executor contract.
//!
//! Author: AI-Generated
//! Created: 2026-02-03

use ethers::prelude::abigen;

// V2-style pair factory. getPair returns the zero address when no pool
// exists for the pair.
abigen!(
    IUniswapV2Factory,
    r#"[
        function getPair(address tokenA, address tokenB) external view returns (address pair)
    ]"#
);

// V2-style liquidity pool. Reserves are uint112 on-chain; token0 orders
// the reserves.
abigen!(
    IUniswapV2Pair,
    r#"[
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
        function token0() external view returns (address)
        function token1() external view returns (address)
    ]"#
);

// Flash-loan arbitrage executor. startArbitrage borrows amountIn of
// tokenIn, buys on routerBuy, sells on routerSell, and repays the loan
// inside the same transaction.
abigen!(
    IFlashArbExecutor,
    r#"[
        function startArbitrage(address tokenIn, address tokenOut, uint256 amountIn, address routerBuy, address routerSell) external
    ]"#
);
