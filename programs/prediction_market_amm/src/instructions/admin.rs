//! Authority-only lifecycle controls: pause, unpause and close.

use anchor_lang::prelude::*;

use crate::controller;
use crate::error::MarketError;
use crate::state::{Market, MarketStatus};

/// Event emitted on pause, unpause and close
#[event]
pub struct MarketStatusChanged {
    pub market: Pubkey,
    pub previous: MarketStatus,
    pub current: MarketStatus,
    pub timestamp: i64,
}

#[derive(Accounts)]
pub struct MarketAdmin<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [Market::SEED, market.seed.to_le_bytes().as_ref()],
        bump = market.bump,
        has_one = authority @ MarketError::Unauthorized,
    )]
    pub market: Box<Account<'info, Market>>,
}

impl<'info> MarketAdmin<'info> {
    pub fn pause(&mut self) -> Result<()> {
        let previous = self.market.status;
        controller::pause(&mut self.market, &self.authority.key())?;
        self.emit_status_change(previous)
    }

    pub fn unpause(&mut self) -> Result<()> {
        let previous = self.market.status;
        controller::unpause(&mut self.market, &self.authority.key())?;
        self.emit_status_change(previous)
    }

    /// Vault dust left by rounding stays in the vaults.
    pub fn close_market(&mut self) -> Result<()> {
        let previous = self.market.status;
        controller::close(&mut self.market, &self.authority.key())?;
        self.emit_status_change(previous)
    }

    fn emit_status_change(&self, previous: MarketStatus) -> Result<()> {
        emit!(MarketStatusChanged {
            market: self.market.key(),
            previous,
            current: self.market.status,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}
