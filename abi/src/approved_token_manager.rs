//! Bindings for the approved token manager, the allowlist consulted by the
//! factory before a pair may be created

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IApprovedTokenManager {
        function owner() external view returns (address);
        function transferOwnership(address newOwner) external;
        function approveToken(address token, bool approved) external;
        function isApprovedToken(address token) external view returns (bool);

        #[derive(Debug, PartialEq, Eq)]
        event ApproveToken(address indexed token, bool approved);
        #[derive(Debug, PartialEq, Eq)]
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }
}
