//! ABI encoders for the constructor arguments of the deployed contracts
//!
//! The encodings are appended to the creation bytecode and also recorded,
//! hex encoded, for source verification.

use alloy::{
    primitives::{Address, U256},
    sol_types::SolValue,
};

/// `UniswapV2Factory(address _feeToSetter)`
pub fn factory_args(fee_to_setter: Address) -> Vec<u8> {
    (fee_to_setter,).abi_encode_params()
}

/// `UniswapV2Router02(address _factory, address _WETH)`
pub fn router_args(factory: Address, weth: Address) -> Vec<u8> {
    (factory, weth).abi_encode_params()
}

/// The test `ERC20(uint256 _totalSupply)`
pub fn test_erc20_args(total_supply: U256) -> Vec<u8> {
    (total_supply,).abi_encode_params()
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, U256};

    use super::*;

    #[test]
    fn test_factory_args_is_padded_address() {
        let setter = address!("0x17ec8597ff92c3f44523bdc65bf0f1be632917ff");
        let encoded = factory_args(setter);

        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(&encoded[12..], setter.as_slice());
    }

    #[test]
    fn test_router_args_preserve_order() {
        let factory = address!("0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f");
        let weth = address!("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        let encoded = router_args(factory, weth);

        assert_eq!(encoded.len(), 64);
        assert_eq!(&encoded[12..32], factory.as_slice());
        assert_eq!(&encoded[44..64], weth.as_slice());
    }

    #[test]
    fn test_erc20_args_big_endian_supply() {
        let encoded = test_erc20_args(U256::from(10_000u64));

        assert_eq!(encoded.len(), 32);
        assert_eq!(U256::from_be_slice(&encoded), U256::from(10_000u64));
    }
}
