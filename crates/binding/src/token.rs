//! ERC20 token contract bindings.

use alloy_sol_types::sol;

sol! {
    /// ERC20 subset used by the allowance flow.
    #[sol(rpc)]
    interface IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);

        /// Emitted whenever `approve` replaces an owner's allowance for a spender.
        event Approval(address indexed owner, address indexed spender, uint256 value);

        /// Token precision used to scale human amounts into base units.
        function decimals() external view returns (uint8);

        function symbol() external view returns (string memory);

        function balanceOf(address account) external view returns (uint256);

        /// Remaining amount `spender` may move out of `owner`'s balance.
        function allowance(address owner, address spender) external view returns (uint256);

        /// Set (not increase) the allowance of `spender` over the caller's tokens.
        function approve(address spender, uint256 value) external returns (bool);

        /// Move `value` from `from` to `to` using the caller's allowance.
        function transferFrom(address from, address to, uint256 value) external returns (bool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use alloy_sol_types::SolCall;

    #[test]
    fn test_approve_selector() {
        // keccak256("approve(address,uint256)")[..4]
        assert_eq!(IERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[test]
    fn test_transfer_from_selector() {
        // keccak256("transferFrom(address,address,uint256)")[..4]
        assert_eq!(IERC20::transferFromCall::SELECTOR, [0x23, 0xb8, 0x72, 0xdd]);
    }

    #[test]
    fn test_approve_calldata_layout() {
        let call = IERC20::approveCall {
            spender: Address::repeat_byte(0xaa),
            value: U256::from(7),
        };
        let data = call.abi_encode();

        assert_eq!(data.len(), 4 + 32 + 32);
        assert_eq!(&data[16..36], Address::repeat_byte(0xaa).as_slice());
        assert_eq!(data[67], 7);
    }
}
