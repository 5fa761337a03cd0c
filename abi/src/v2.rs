//! Bindings for the Uniswap V2 factory, router and pair contracts
//!
//! The factory carries two extensions over upstream Uniswap V2: an approved
//! token manager gating `createPair`, and the light reward parameters.

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IUniswapV2Factory {
        function feeTo() external view returns (address);
        function feeToSetter() external view returns (address);
        function approvedTokenManager() external view returns (address);
        function getPair(address tokenA, address tokenB) external view returns (address pair);
        function allPairs(uint256 index) external view returns (address pair);
        function allPairsLength() external view returns (uint256);

        function createPair(address tokenA, address tokenB) external returns (address pair);
        function setFeeTo(address feeTo) external;
        function setFeeToSetter(address feeToSetter) external;
        function setApprovedTokenManager(address approvedTokenManager) external;
        function setLightRewardParams(address stHope, address minter, address ltToken) external;

        #[derive(Debug, PartialEq, Eq)]
        event PairCreated(address indexed token0, address indexed token1, address pair, uint256 index);
    }
}

sol! {
    #[allow(missing_docs, clippy::too_many_arguments)]
    #[sol(rpc)]
    interface IUniswapV2Router02 {
        function factory() external view returns (address);
        function WETH() external view returns (address);

        function addLiquidity(
            address tokenA,
            address tokenB,
            uint256 amountADesired,
            uint256 amountBDesired,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline
        ) external returns (uint256 amountA, uint256 amountB, uint256 liquidity);

        function removeLiquidity(
            address tokenA,
            address tokenB,
            uint256 liquidity,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline
        ) external returns (uint256 amountA, uint256 amountB);

        function swapExactTokensForTokens(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);

        function getAmountOut(uint256 amountIn, uint256 reserveIn, uint256 reserveOut)
            external
            pure
            returns (uint256 amountOut);
        function getAmountsOut(uint256 amountIn, address[] calldata path)
            external
            view
            returns (uint256[] memory amounts);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IUniswapV2Pair {
        function name() external pure returns (string memory);
        function symbol() external pure returns (string memory);
        function decimals() external pure returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
        function transfer(address to, uint256 value) external returns (bool);

        function factory() external view returns (address);
        function token0() external view returns (address);
        function token1() external view returns (address);
        function getReserves()
            external
            view
            returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function burn(address to) external returns (uint256 amount0, uint256 amount1);

        #[derive(Debug, PartialEq, Eq)]
        event Mint(address indexed sender, uint256 amount0, uint256 amount1);
        #[derive(Debug, PartialEq, Eq)]
        event Burn(address indexed sender, uint256 amount0, uint256 amount1, address indexed to);
        #[derive(Debug, PartialEq, Eq)]
        event Swap(
            address indexed sender,
            uint256 amount0In,
            uint256 amount1In,
            uint256 amount0Out,
            uint256 amount1Out,
            address indexed to
        );
        #[derive(Debug, PartialEq, Eq)]
        event Sync(uint112 reserve0, uint112 reserve1);
    }
}
