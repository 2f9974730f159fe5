//! Prediction Market State
//!
//! Each market is a single yes/no event with its own pool. The record holds
//! the pool inventory, the LMSR depth, the lifecycle status and, once the
//! event is decided, the settlement snapshot that redemptions draw from.
//!
//! ```text
//!   Uninitialized ──▶ Open ──▶ Resolved ──▶ Closed
//!                     ▲  │
//!                     │  ▼
//!                    Paused
//! ```

use anchor_lang::prelude::*;

use crate::error::MarketError;

/// Individual prediction market account
///
/// Seeds: ["market", seed.to_le_bytes()]
#[account]
#[derive(InitSpace, Debug, Default, PartialEq, Eq)]
pub struct Market {
    /// Caller-supplied unique identifier
    pub seed: u64,

    /// Human-readable event description
    #[max_len(100)]
    pub name: String,

    /// Key allowed to resolve, pause and close the market
    pub authority: Pubkey,

    /// Reference asset deposited by LPs and traders
    pub stable_mint: Pubkey,

    /// YES outcome token mint (market PDA is mint authority)
    pub yes_mint: Pubkey,

    /// NO outcome token mint (market PDA is mint authority)
    pub no_mint: Pubkey,

    /// LP share mint (market PDA is mint authority)
    pub lp_mint: Pubkey,

    /// Swap fee in basis points, retained by the pool
    pub fee_bps: u16,

    /// Unix timestamp when trading ends
    pub end_time: i64,

    /// Unix timestamp when the market was initialized
    pub created_at: i64,

    pub status: MarketStatus,

    /// Pool inventory; each must match its vault balance
    pub reserve_yes: u64,
    pub reserve_no: u64,
    pub reserve_stable: u64,

    /// Outstanding LP shares
    pub lp_supply: u64,

    /// LMSR depth `b`
    pub liquidity: u64,

    /// Outcome tokens in existence, pool inventory included
    pub supply_yes: u64,
    pub supply_no: u64,

    /// Cumulative swap fees retained in each reserve
    pub fees_stable: u64,
    pub fees_yes: u64,
    pub fees_no: u64,

    /// Winning side, set on resolution
    pub outcome: Option<Outcome>,

    pub settlement: Settlement,

    /// PDA bump seed
    pub bump: u8,
}

impl Market {
    pub const SEED: &'static [u8] = b"market";

    pub fn reserves(&self) -> Reserves {
        Reserves {
            yes: self.reserve_yes,
            no: self.reserve_no,
            stable: self.reserve_stable,
            liquidity: self.liquidity,
        }
    }

    pub fn outcome_reserve(&self, side: Outcome) -> u64 {
        match side {
            Outcome::Yes => self.reserve_yes,
            Outcome::No => self.reserve_no,
        }
    }

    pub fn outcome_reserve_mut(&mut self, side: Outcome) -> &mut u64 {
        match side {
            Outcome::Yes => &mut self.reserve_yes,
            Outcome::No => &mut self.reserve_no,
        }
    }

    pub fn outcome_supply(&self, side: Outcome) -> u64 {
        match side {
            Outcome::Yes => self.supply_yes,
            Outcome::No => self.supply_no,
        }
    }

    pub fn outcome_supply_mut(&mut self, side: Outcome) -> &mut u64 {
        match side {
            Outcome::Yes => &mut self.supply_yes,
            Outcome::No => &mut self.supply_no,
        }
    }

    pub fn outcome_fees_mut(&mut self, side: Outcome) -> &mut u64 {
        match side {
            Outcome::Yes => &mut self.fees_yes,
            Outcome::No => &mut self.fees_no,
        }
    }

    /// Outcome tokens held outside the pool
    pub fn holder_supply(&self, side: Outcome) -> u64 {
        self.outcome_supply(side)
            .saturating_sub(self.outcome_reserve(side))
    }

    /// Trading and deposits need an open market before its end time
    pub fn require_trading(&self, now: i64) -> Result<()> {
        require!(self.status == MarketStatus::Open, MarketError::MarketClosed);
        require!(now < self.end_time, MarketError::Expired);
        Ok(())
    }

    pub fn transition_to(&mut self, next: MarketStatus) -> Result<()> {
        require!(
            self.status.can_transition_to(next),
            MarketError::InvalidStatusTransition
        );
        self.status = next;
        Ok(())
    }

    /// Check the record-level invariants for the current status.
    pub fn check_invariants(&self) -> Result<()> {
        ensure(
            self.reserve_yes <= self.supply_yes && self.reserve_no <= self.supply_no,
            "pool inventory exceeds outcome supply",
        )?;

        match self.status {
            MarketStatus::Uninitialized => {
                ensure(self.lp_supply == 0, "uninitialized market has LP supply")
            }
            MarketStatus::Open | MarketStatus::Paused => {
                let empty = self.lp_supply == 0;
                ensure(
                    empty
                        == (self.reserve_yes == 0
                            && self.reserve_no == 0
                            && self.reserve_stable == 0),
                    "LP supply and reserves disagree on emptiness",
                )?;
                ensure(
                    empty == (self.liquidity == 0),
                    "LP supply and liquidity disagree on emptiness",
                )?;
                ensure(self.outcome.is_none(), "unresolved market has an outcome")
            }
            MarketStatus::Resolved => {
                ensure(self.outcome.is_some(), "resolved market has no outcome")?;
                let claims = self
                    .settlement
                    .holder_reserved
                    .checked_add(self.settlement.lp_residual)
                    .ok_or(MarketError::ArithmeticOverflow)?;
                ensure(
                    self.reserve_stable >= claims,
                    "stable reserve below outstanding claims",
                )
            }
            MarketStatus::Closed => ensure(self.outcome.is_some(), "closed market has no outcome"),
        }
    }
}

fn ensure(condition: bool, what: &str) -> Result<()> {
    if !condition {
        msg!("FATAL: market invariant violated: {}", what);
        return err!(MarketError::InvariantViolation);
    }
    Ok(())
}

/// Pool snapshot handed to the pricing curve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reserves {
    pub yes: u64,
    pub no: u64,
    pub stable: u64,
    pub liquidity: u64,
}

impl Reserves {
    pub fn outcome(&self, side: Outcome) -> u64 {
        match side {
            Outcome::Yes => self.yes,
            Outcome::No => self.no,
        }
    }
}

/// Payout terms fixed when the market resolves
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub struct Settlement {
    /// Stable units paid per `payout_denominator` winning tokens
    pub payout_numerator: u64,
    pub payout_denominator: u64,
    /// Stable still owed to winning-token holders
    pub holder_reserved: u64,
    /// Stable left for LPs
    pub lp_residual: u64,
}

/// Market lifecycle status
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum MarketStatus {
    #[default]
    Uninitialized,
    /// Trading and liquidity changes allowed
    Open,
    /// Halted by the authority
    Paused,
    /// Outcome decided, redemptions open
    Resolved,
    /// All claims settled
    Closed,
}

impl MarketStatus {
    pub fn can_transition_to(self, next: MarketStatus) -> bool {
        use MarketStatus::*;
        matches!(
            (self, next),
            (Uninitialized, Open)
                | (Open, Paused)
                | (Paused, Open)
                | (Open, Resolved)
                | (Resolved, Closed)
        )
    }
}

/// Binary outcome, used for resolution and for the side of a trade
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    pub fn opposite(self) -> Outcome {
        match self {
            Outcome::Yes => Outcome::No,
            Outcome::No => Outcome::Yes,
        }
    }
}
