//! # Prediction Market AMM
//!
//! Binary-outcome prediction markets on Solana, each with its own liquidity
//! pool.
//!
//! ## Overview
//!
//! LPs deposit a stable asset and receive LP shares. Traders buy and sell YES
//! and NO tokens against the pool's inventory, priced by an LMSR cost
//! function. When the event is decided the market authority resolves the
//! market; winning tokens redeem for stable and LPs claim what is left.
//!
//! ## How it works
//! - `math`: integer fixed-point `exp`/`ln` behind the curve
//! - `amm`: LMSR quotes and spot prices
//! - `engine`: liquidity, swap and settlement state transitions
//! - `controller`: lifecycle and authority checks
//! - `instructions`: Anchor account validation and SPL token CPIs

use anchor_lang::prelude::*;

pub mod amm;
pub mod constants;
pub mod controller;
pub mod engine;
pub mod error;
pub mod instructions;
pub mod math;
pub mod state;

pub use amm::*;
pub use engine::{LiquidityWithdrawal, TokenLedger};
pub use instructions::*;
pub use state::*;

// Replace with your deployed program ID
declare_id!("8NeEkxgPMV5AnZ8o5ksjPhqsHwkWXdvGCGyHmEt6tJTn");

#[program]
pub mod prediction_market_amm {
    use super::*;

    /// Create a market with its mints and vaults
    pub fn initialize(
        ctx: Context<Initialize>,
        seed: u64,
        name: String,
        fee_bps: u16,
        end_time: i64,
    ) -> Result<Pubkey> {
        ctx.accounts
            .initialize(seed, name, fee_bps, end_time, &ctx.bumps)
    }

    /// Deposit liquidity; returns LP shares minted
    pub fn add_liquidity(
        ctx: Context<Liquidity>,
        amount_stable: u64,
        amount_yes: u64,
        amount_no: u64,
        deadline: i64,
    ) -> Result<u64> {
        ctx.accounts
            .add_liquidity(amount_stable, amount_yes, amount_no, deadline)
    }

    /// Burn LP shares for a pro-rata slice of the reserves
    pub fn remove_liquidity(
        ctx: Context<Liquidity>,
        lp_burn: u64,
        deadline: i64,
    ) -> Result<LiquidityWithdrawal> {
        ctx.accounts.remove_liquidity(lp_burn, deadline)
    }

    /// Buy or sell outcome tokens; returns the output amount
    pub fn swap(
        ctx: Context<Swap>,
        direction: SwapDirection,
        side: Outcome,
        amount_in: u64,
        min_out: u64,
        deadline: i64,
    ) -> Result<u64> {
        ctx.accounts
            .swap(direction, side, amount_in, min_out, deadline)
    }

    /// Record the winning outcome (authority only)
    pub fn resolve(ctx: Context<Resolve>, outcome: Outcome) -> Result<()> {
        ctx.accounts.resolve(outcome)
    }

    /// Burn outcome tokens for the settlement payout
    pub fn redeem(ctx: Context<Redeem>, side: Outcome, amount: u64) -> Result<u64> {
        ctx.accounts.redeem(side, amount)
    }

    /// Burn LP shares after resolution; returns stable paid out
    pub fn claim_liquidity(ctx: Context<ClaimLiquidity>, lp_burn: u64) -> Result<u64> {
        ctx.accounts.claim_liquidity(lp_burn)
    }

    /// Halt trading and liquidity changes (authority only)
    pub fn pause(ctx: Context<MarketAdmin>) -> Result<()> {
        ctx.accounts.pause()
    }

    /// Resume a paused market (authority only)
    pub fn unpause(ctx: Context<MarketAdmin>) -> Result<()> {
        ctx.accounts.unpause()
    }

    /// Close a fully settled market (authority only)
    pub fn close_market(ctx: Context<MarketAdmin>) -> Result<()> {
        ctx.accounts.close_market()
    }
}
