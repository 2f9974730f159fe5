//! # Market Lifecycle
//!
//! Authority checks and status transitions. Trading, liquidity and
//! settlement math live in [`crate::engine`]; this module decides whether a
//! lifecycle step is allowed at all.
//!
//! | Operation    | Signer    | From       | To       |
//! |--------------|-----------|------------|----------|
//! | `initialize` | anyone    | –          | Open     |
//! | `pause`      | authority | Open       | Paused   |
//! | `unpause`    | authority | Paused     | Open     |
//! | `resolve`    | authority | Open       | Resolved |
//! | `close`      | authority | Resolved   | Closed   |

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, MAX_NAME_LEN};
use crate::engine;
use crate::error::MarketError;
use crate::state::{Market, MarketStatus, Outcome, Settlement};

/// Mints a market is bound to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarketMints {
    pub stable: Pubkey,
    pub yes: Pubkey,
    pub no: Pubkey,
    pub lp: Pubkey,
}

/// Caller-chosen market parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketParams {
    pub seed: u64,
    pub name: String,
    pub fee_bps: u16,
    pub end_time: i64,
}

pub fn initialize(
    market: &mut Market,
    authority: Pubkey,
    mints: MarketMints,
    params: MarketParams,
    bump: u8,
    now: i64,
) -> Result<()> {
    require!(
        (params.fee_bps as u64) < BPS_DENOMINATOR,
        MarketError::InvalidFee
    );
    require!(params.name.len() <= MAX_NAME_LEN, MarketError::NameTooLong);
    require!(params.end_time > now, MarketError::InvalidEndTime);

    let mut staged = Market {
        seed: params.seed,
        name: params.name,
        authority,
        stable_mint: mints.stable,
        yes_mint: mints.yes,
        no_mint: mints.no,
        lp_mint: mints.lp,
        fee_bps: params.fee_bps,
        end_time: params.end_time,
        created_at: now,
        status: market.status,
        bump,
        ..Market::default()
    };
    staged.transition_to(MarketStatus::Open)?;
    staged.check_invariants()?;

    *market = staged;
    msg!("Market {} opened, trading until {}", market.seed, market.end_time);
    Ok(())
}

fn require_authority(market: &Market, signer: &Pubkey) -> Result<()> {
    require_keys_eq!(*signer, market.authority, MarketError::Unauthorized);
    Ok(())
}

pub fn pause(market: &mut Market, signer: &Pubkey) -> Result<()> {
    require_authority(market, signer)?;
    market.transition_to(MarketStatus::Paused)?;
    msg!("Market {} paused", market.seed);
    Ok(())
}

pub fn unpause(market: &mut Market, signer: &Pubkey) -> Result<()> {
    require_authority(market, signer)?;
    market.transition_to(MarketStatus::Open)?;
    msg!("Market {} resumed", market.seed);
    Ok(())
}

/// The authority's signature is the finality signal.
pub fn resolve(
    market: &mut Market,
    signer: &Pubkey,
    outcome: Outcome,
    now: i64,
) -> Result<Settlement> {
    require_authority(market, signer)?;
    let settlement = engine::resolve(market, outcome, now)?;
    msg!(
        "Market {} resolved: {:?}, payout {}/{}",
        market.seed,
        outcome,
        settlement.payout_numerator,
        settlement.payout_denominator
    );
    Ok(settlement)
}

/// Resolved → Closed once every LP share is claimed and every winning token
/// redeemed.
pub fn close(market: &mut Market, signer: &Pubkey) -> Result<()> {
    require_authority(market, signer)?;
    let outcome = market.outcome.ok_or(MarketError::NotResolved)?;
    require!(
        market.lp_supply == 0 && market.outcome_supply(outcome) == 0,
        MarketError::MarketNotSettled
    );

    let mut staged = market.clone();
    staged.transition_to(MarketStatus::Closed)?;
    staged.check_invariants()?;

    *market = staged;
    msg!("Market {} closed", market.seed);
    Ok(())
}
