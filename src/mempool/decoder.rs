//! Calldata Decoder
//!
//! Decodes V2 router swap calldata from pending transaction input bytes
//! against a table of known 4-byte function selectors.
//!
//! Supported Function Selectors:
//!     0x38ed1739 — swapExactTokensForTokens(uint256,uint256,address[],address,uint256)
//!     0x18cbafe5 — swapExactTokensForETH(uint256,uint256,address[],address,uint256)
//!
//! Both share the same argument layout; the decoded swap uses the path's
//! first and last addresses as token_in/token_out. Intermediate hops are
//! ignored for quoting purposes.
//!
//! Author: AI-Generated
//! Created: 2026-02-03

use crate::errors::DecodeError;
use crate::types::DecodedSwap;
use ethers::abi::{decode, ParamType, Token};
use ethers::types::{Address, U256};

const SWAP_EXACT_TOKENS_FOR_TOKENS: [u8; 4] = [0x38, 0xed, 0x17, 0x39];
const SWAP_EXACT_TOKENS_FOR_ETH: [u8; 4] = [0x18, 0xcb, 0xaf, 0xe5];

/// Decode swap calldata from transaction input bytes.
pub fn decode_calldata(input: &[u8]) -> Result<DecodedSwap, DecodeError> {
    if input.len() < 4 {
        return Err(DecodeError::ShortCalldata(input.len()));
    }

    let mut selector = [0u8; 4];
    selector.copy_from_slice(&input[..4]);
    let data = &input[4..];

    match selector {
        SWAP_EXACT_TOKENS_FOR_TOKENS => decode_swap_exact_in(data, "swapExactTokensForTokens"),
        SWAP_EXACT_TOKENS_FOR_ETH => decode_swap_exact_in(data, "swapExactTokensForETH"),
        _ => Err(DecodeError::UnknownSelector(selector_hex(input))),
    }
}

/// The 4-byte selector as a hex string for logging.
pub fn selector_hex(input: &[u8]) -> String {
    if input.len() < 4 {
        return "0x????".to_string();
    }
    format!(
        "0x{:02x}{:02x}{:02x}{:02x}",
        input[0], input[1], input[2], input[3]
    )
}

/// Decode the shared exact-in layout:
/// (uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline)
fn decode_swap_exact_in(data: &[u8], fn_name: &'static str) -> Result<DecodedSwap, DecodeError> {
    let params = vec![
        ParamType::Uint(256),                           // amountIn
        ParamType::Uint(256),                           // amountOutMin
        ParamType::Array(Box::new(ParamType::Address)), // path
        ParamType::Address,                             // to
        ParamType::Uint(256),                           // deadline
    ];

    let tokens = decode(&params, data)?;

    let amount_in = token_to_u256(&tokens[0])?;
    let amount_out_min = token_to_u256(&tokens[1])?;
    let (token_in, token_out) = path_endpoints(&tokens[2])?;

    Ok(DecodedSwap {
        function_name: fn_name,
        token_in,
        token_out,
        amount_in,
        amount_out_min,
    })
}

/// First and last tokens of an address[] path. A path shorter than two
/// addresses cannot describe a swap.
fn path_endpoints(token: &Token) -> Result<(Address, Address), DecodeError> {
    let addresses = match token {
        Token::Array(list) => list,
        _ => return Err(DecodeError::Abi(ethers::abi::Error::InvalidData)),
    };
    if addresses.len() < 2 {
        return Err(DecodeError::MalformedPath);
    }

    let first = token_to_address(&addresses[0])?;
    let last = token_to_address(&addresses[addresses.len() - 1])?;
    Ok((first, last))
}

fn token_to_address(token: &Token) -> Result<Address, DecodeError> {
    match token {
        Token::Address(addr) => Ok(*addr),
        _ => Err(DecodeError::Abi(ethers::abi::Error::InvalidData)),
    }
}

fn token_to_u256(token: &Token) -> Result<U256, DecodeError> {
    match token {
        Token::Uint(val) => Ok(*val),
        _ => Err(DecodeError::Abi(ethers::abi::Error::InvalidData)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::encode;

    /// Build swapExactTokensForTokens calldata the way a sender would.
    fn encode_swap(amount_in: u64, amount_out_min: u64, path: &[Address]) -> Vec<u8> {
        let mut calldata = SWAP_EXACT_TOKENS_FOR_TOKENS.to_vec();
        calldata.extend(encode(&[
            Token::Uint(U256::from(amount_in)),
            Token::Uint(U256::from(amount_out_min)),
            Token::Array(path.iter().map(|a| Token::Address(*a)).collect()),
            Token::Address(Address::repeat_byte(0xee)), // recipient
            Token::Uint(U256::from(1_900_000_000u64)),  // deadline
        ]));
        calldata
    }

    #[test]
    fn test_round_trip() {
        let token_x = Address::repeat_byte(0x01);
        let token_y = Address::repeat_byte(0x02);
        let calldata = encode_swap(42_000, 41_000, &[token_x, token_y]);

        let swap = decode_calldata(&calldata).unwrap();
        assert_eq!(swap.function_name, "swapExactTokensForTokens");
        assert_eq!(swap.token_in, token_x);
        assert_eq!(swap.token_out, token_y);
        assert_eq!(swap.amount_in, U256::from(42_000u64));
        assert_eq!(swap.amount_out_min, U256::from(41_000u64));
    }

    #[test]
    fn test_multi_hop_path_collapses_to_endpoints() {
        let token_x = Address::repeat_byte(0x01);
        let token_mid = Address::repeat_byte(0x02);
        let token_y = Address::repeat_byte(0x03);
        let calldata = encode_swap(5, 1, &[token_x, token_mid, token_y]);

        let swap = decode_calldata(&calldata).unwrap();
        assert_eq!(swap.token_in, token_x);
        assert_eq!(swap.token_out, token_y);
    }

    #[test]
    fn test_swap_exact_tokens_for_eth() {
        let mut calldata = encode_swap(7, 6, &[Address::repeat_byte(0x01), Address::repeat_byte(0x02)]);
        calldata[..4].copy_from_slice(&SWAP_EXACT_TOKENS_FOR_ETH);

        let swap = decode_calldata(&calldata).unwrap();
        assert_eq!(swap.function_name, "swapExactTokensForETH");
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let err = decode_calldata(&[0x38, 0xed, 0x17]).unwrap_err();
        assert!(matches!(err, DecodeError::ShortCalldata(3)));
    }

    #[test]
    fn test_unknown_selector_rejected() {
        let err = decode_calldata(&[0xde, 0xad, 0xbe, 0xef, 0x00]).unwrap_err();
        match err {
            DecodeError::UnknownSelector(sel) => assert_eq!(sel, "0xdeadbeef"),
            other => panic!("expected UnknownSelector, got {:?}", other),
        }
    }

    #[test]
    fn test_single_address_path_rejected() {
        let calldata = encode_swap(10, 9, &[Address::repeat_byte(0x01)]);
        let err = decode_calldata(&calldata).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPath));
    }

    #[test]
    fn test_garbage_arguments_rejected() {
        // Valid selector, truncated argument block.
        let mut calldata = SWAP_EXACT_TOKENS_FOR_TOKENS.to_vec();
        calldata.extend([0u8; 16]);
        assert!(matches!(
            decode_calldata(&calldata),
            Err(DecodeError::Abi(_))
        ));
    }

    #[test]
    fn test_selector_hex() {
        assert_eq!(selector_hex(&[0x38, 0xed, 0x17, 0x39, 0xff]), "0x38ed1739");
        assert_eq!(selector_hex(&[0x38]), "0x????");
    }
}
