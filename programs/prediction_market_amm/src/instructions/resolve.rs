//! Market Resolution
//!
//! The market authority settles the market once trading has ended. Its
//! signature is the finality signal; there is no oracle integration.
//!
//! ## Resolution Flow
//!
//! 1. `end_time` passes
//! 2. Authority calls `resolve` with the winning side
//! 3. Payout rate and claim split are fixed on the market record
//! 4. Holders `redeem`, LPs `claim_liquidity`

use anchor_lang::prelude::*;

use crate::controller;
use crate::error::MarketError;
use crate::state::{Market, Outcome};

/// Event emitted when a market is resolved
#[event]
pub struct MarketResolved {
    pub market: Pubkey,
    pub outcome: Outcome,
    pub resolver: Pubkey,
    pub payout_numerator: u64,
    pub payout_denominator: u64,
    pub holder_reserved: u64,
    pub lp_residual: u64,
    pub timestamp: i64,
}

#[derive(Accounts)]
pub struct Resolve<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [Market::SEED, market.seed.to_le_bytes().as_ref()],
        bump = market.bump,
        has_one = authority @ MarketError::Unauthorized,
    )]
    pub market: Box<Account<'info, Market>>,
}

impl<'info> Resolve<'info> {
    pub fn resolve(&mut self, outcome: Outcome) -> Result<()> {
        let clock = Clock::get()?;

        let settlement = controller::resolve(
            &mut self.market,
            &self.authority.key(),
            outcome,
            clock.unix_timestamp,
        )?;

        emit!(MarketResolved {
            market: self.market.key(),
            outcome,
            resolver: self.authority.key(),
            payout_numerator: settlement.payout_numerator,
            payout_denominator: settlement.payout_denominator,
            holder_reserved: settlement.holder_reserved,
            lp_residual: settlement.lp_residual,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }
}
