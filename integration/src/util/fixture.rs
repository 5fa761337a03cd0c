//! Deploys a fresh pool for a test: two test tokens, a wrapped ETH stand-in,
//! the approved token manager, the factory, the router and the pair

use alloy::{
    primitives::{Address, U256},
    providers::DynProvider,
};
use dex_abi::{
    approved_token_manager::IApprovedTokenManager::{self, IApprovedTokenManagerInstance},
    constructor::{factory_args, router_args, test_erc20_args},
    erc20::IERC20::{self, IERC20Instance},
    v2::{
        IUniswapV2Factory::{self, IUniswapV2FactoryInstance},
        IUniswapV2Pair::{self, IUniswapV2PairInstance},
        IUniswapV2Router02::{self, IUniswapV2Router02Instance},
    },
};
use eyre::Result;
use scripts::{
    constants::{
        APPROVED_TOKEN_MANAGER_CONTRACT, FACTORY_CONTRACT, NUM_DEPLOY_CONFIRMATIONS,
        ROUTER_CONTRACT,
    },
    types::Artifact,
    utils::{deploy_contract, format_amount, send_tx},
};
use tracing::info;

use crate::{
    constants::{TEST_ERC20_CONTRACT, TEST_TOKEN_SUPPLY},
    test_inventory::{Actor, TestArgs},
    util::{
        expand_to_18_decimals,
        transactions::{send_router_tx, wait_for_tx_success},
    },
};

/// The addresses of a freshly deployed pool
///
/// `token_a` is always the pair's `token0`, so the pair's reserves are
/// reported in `(token_a, token_b)` order.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    /// The pair's `token0`
    pub token_a: Address,
    /// The pair's `token1`
    pub token_b: Address,
    /// The ERC20 standing in for WETH in the router
    pub weth: Address,
    /// The approved token manager
    pub approved_token_manager: Address,
    /// The factory
    pub factory: Address,
    /// The router
    pub router: Address,
    /// The pair of `token_a` and `token_b`, also the liquidity token
    pub pair: Address,
}

impl Fixture {
    /// Deploy the fixture from the `wallet` actor and point the protocol fee
    /// at the `fee_to` actor
    pub async fn deploy(args: &TestArgs) -> Result<Self> {
        let deployer = &args.wallet;
        let client = &deployer.client;

        let erc20_artifact = Artifact::load(&args.artifacts_dir, TEST_ERC20_CONTRACT)?;
        let atm_artifact = Artifact::load(&args.artifacts_dir, APPROVED_TOKEN_MANAGER_CONTRACT)?;
        let factory_artifact = Artifact::load(&args.artifacts_dir, FACTORY_CONTRACT)?;
        let router_artifact = Artifact::load(&args.artifacts_dir, ROUTER_CONTRACT)?;

        // --- Tokens --- //

        let supply_args = test_erc20_args(expand_to_18_decimals(TEST_TOKEN_SUPPLY));
        let first = deploy_contract(
            client,
            &erc20_artifact,
            &supply_args,
            NUM_DEPLOY_CONFIRMATIONS,
        )
        .await?;
        let second = deploy_contract(
            client,
            &erc20_artifact,
            &supply_args,
            NUM_DEPLOY_CONFIRMATIONS,
        )
        .await?;
        let weth = deploy_contract(
            client,
            &erc20_artifact,
            &supply_args,
            NUM_DEPLOY_CONFIRMATIONS,
        )
        .await?;

        // --- Approved Token Manager --- //

        let approved_token_manager =
            deploy_contract(client, &atm_artifact, &[], NUM_DEPLOY_CONFIRMATIONS).await?;
        let atm = IApprovedTokenManager::new(approved_token_manager, client.clone());
        send_tx(atm.approveToken(first, true)).await?;
        send_tx(atm.approveToken(second, true)).await?;

        // --- Factory and Router --- //

        let factory = deploy_contract(
            client,
            &factory_artifact,
            &factory_args(deployer.address),
            NUM_DEPLOY_CONFIRMATIONS,
        )
        .await?;
        let factory_contract = IUniswapV2Factory::new(factory, client.clone());
        send_tx(factory_contract.setApprovedTokenManager(approved_token_manager)).await?;

        let router = deploy_contract(
            client,
            &router_artifact,
            &router_args(factory, weth),
            NUM_DEPLOY_CONFIRMATIONS,
        )
        .await?;

        // --- Pair --- //

        send_tx(factory_contract.createPair(first, second)).await?;
        let pair = factory_contract.getPair(first, second).call().await?;
        let token0 = IUniswapV2Pair::new(pair, client.clone())
            .token0()
            .call()
            .await?;
        let (token_a, token_b) = if token0 == first {
            (first, second)
        } else {
            (second, first)
        };

        send_tx(factory_contract.setFeeTo(args.fee_to.address)).await?;
        let fee_to = factory_contract.feeTo().call().await?;
        info!("set feeTo = {fee_to:#x}");

        Ok(Self {
            token_a,
            token_b,
            weth,
            approved_token_manager,
            factory,
            router,
            pair,
        })
    }

    // --- Contracts --- //

    /// `token_a` as seen by the given actor
    pub fn token_a(&self, actor: &Actor) -> IERC20Instance<DynProvider> {
        IERC20::new(self.token_a, actor.client.clone())
    }

    /// `token_b` as seen by the given actor
    pub fn token_b(&self, actor: &Actor) -> IERC20Instance<DynProvider> {
        IERC20::new(self.token_b, actor.client.clone())
    }

    /// The pair as seen by the given actor
    pub fn pair(&self, actor: &Actor) -> IUniswapV2PairInstance<DynProvider> {
        IUniswapV2Pair::new(self.pair, actor.client.clone())
    }

    /// The router as seen by the given actor
    pub fn router(&self, actor: &Actor) -> IUniswapV2Router02Instance<DynProvider> {
        IUniswapV2Router02::new(self.router, actor.client.clone())
    }

    /// The factory as seen by the given actor
    pub fn factory(&self, actor: &Actor) -> IUniswapV2FactoryInstance<DynProvider> {
        IUniswapV2Factory::new(self.factory, actor.client.clone())
    }

    /// The approved token manager as seen by the given actor
    pub fn approved_token_manager(
        &self,
        actor: &Actor,
    ) -> IApprovedTokenManagerInstance<DynProvider> {
        IApprovedTokenManager::new(self.approved_token_manager, actor.client.clone())
    }

    // --- Balances --- //

    /// The `(token_a, token_b, liquidity)` balances of an address
    pub async fn balances(&self, reader: &Actor, owner: Address) -> Result<(U256, U256, U256)> {
        let a = self.token_a(reader).balanceOf(owner).call().await?;
        let b = self.token_b(reader).balanceOf(owner).call().await?;
        let p = self.pair(reader).balanceOf(owner).call().await?;
        Ok((a, b, p))
    }

    /// The pair's reserves, in `(token_a, token_b)` order
    pub async fn reserves(&self, reader: &Actor) -> Result<(U256, U256)> {
        let reserves = self.pair(reader).getReserves().call().await?;
        Ok((U256::from(reserves.reserve0), U256::from(reserves.reserve1)))
    }

    // --- Actions --- //

    /// Send tokens between actors, skipping zero amounts
    pub async fn fund(
        &self,
        from: &Actor,
        to: &Actor,
        amount_a: U256,
        amount_b: U256,
    ) -> Result<()> {
        if !amount_a.is_zero() {
            wait_for_tx_success(self.token_a(from).transfer(to.address, amount_a), self.pair)
                .await?;
        }
        if !amount_b.is_zero() {
            wait_for_tx_success(self.token_b(from).transfer(to.address, amount_b), self.pair)
                .await?;
        }

        Ok(())
    }

    /// Approve the router for exactly the deposited amounts and add them as
    /// liquidity, returning the liquidity tokens minted
    pub async fn add_liquidity(
        &self,
        actor: &Actor,
        amount_a: U256,
        amount_b: U256,
    ) -> Result<U256> {
        wait_for_tx_success(self.token_a(actor).approve(self.router, amount_a), self.pair).await?;
        wait_for_tx_success(self.token_b(actor).approve(self.router, amount_b), self.pair).await?;

        info!(
            "{} add {} tokenA and {} tokenB to the pool",
            actor.name,
            format_amount(amount_a),
            format_amount(amount_b)
        );

        let before = self.pair(actor).balanceOf(actor.address).call().await?;
        let router = self.router(actor);
        send_router_tx(
            router.addLiquidity(
                self.token_a,
                self.token_b,
                amount_a,
                amount_b,
                U256::ZERO, // amountAMin
                U256::ZERO, // amountBMin
                actor.address,
                U256::MAX, // deadline
            ),
            self.pair,
        )
        .await?;
        let after = self.pair(actor).balanceOf(actor.address).call().await?;

        Ok(after - before)
    }

    /// Swap the actor's whole balance of one token for the other, demanding
    /// exactly the router's quote at the current reserves
    ///
    /// Returns `(amount_in, amount_out)`.
    pub async fn swap_all(&self, actor: &Actor, a_for_b: bool) -> Result<(U256, U256)> {
        let (token_in, token_out) = if a_for_b {
            (self.token_a(actor), self.token_b(actor))
        } else {
            (self.token_b(actor), self.token_a(actor))
        };
        let (reserve_a, reserve_b) = self.reserves(actor).await?;
        let (reserve_in, reserve_out) = if a_for_b {
            (reserve_a, reserve_b)
        } else {
            (reserve_b, reserve_a)
        };

        let router = self.router(actor);
        let amount_in = token_in.balanceOf(actor.address).call().await?;
        let amount_out_min = router
            .getAmountOut(amount_in, reserve_in, reserve_out)
            .call()
            .await?;

        wait_for_tx_success(token_in.approve(self.router, amount_in), self.pair).await?;
        info!(
            "{} swap {} {}",
            actor.name,
            format_amount(amount_in),
            if a_for_b { "tokenA" } else { "tokenB" }
        );

        let out_before = token_out.balanceOf(actor.address).call().await?;
        send_router_tx(
            router.swapExactTokensForTokens(
                amount_in,
                amount_out_min,
                vec![*token_in.address(), *token_out.address()],
                actor.address,
                U256::MAX, // deadline
            ),
            self.pair,
        )
        .await?;
        let out_after = token_out.balanceOf(actor.address).call().await?;

        Ok((amount_in, out_after - out_before))
    }

    /// Remove all of the actor's liquidity, returning the liquidity burned
    pub async fn remove_all_liquidity(&self, actor: &Actor) -> Result<U256> {
        let pair = self.pair(actor);
        let liquidity = pair.balanceOf(actor.address).call().await?;
        wait_for_tx_success(pair.approve(self.router, liquidity), self.pair).await?;

        info!("{} remove liquidity with all their liquidity tokens", actor.name);
        let router = self.router(actor);
        send_router_tx(
            router.removeLiquidity(
                self.token_a,
                self.token_b,
                liquidity,
                U256::ZERO, // amountAMin
                U256::ZERO, // amountBMin
                actor.address,
                U256::MAX, // deadline
            ),
            self.pair,
        )
        .await?;

        Ok(liquidity)
    }
}
