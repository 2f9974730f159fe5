//! # Swap Execution
//!
//! ```text
//!   Validate ──▶ Quote ──▶ Apply ──▶ Settle
//!      │           │         │          │
//!   status,     LMSR      slippage,   transfer_in,
//!   end time,   curve     staged      transfer_out,
//!   deadline              reserves    commit
//! ```
//!
//! The fee stays in the pool as part of the input reserve and is tallied in
//! the matching `fees_*` counter.

use anchor_lang::prelude::*;

use crate::amm::{LmsrCurve, SwapDirection, SwapQuote};
use crate::engine::{Asset, TokenLedger};
use crate::error::MarketError;
use crate::state::{Market, Outcome};

/// Caller's swap parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub direction: SwapDirection,
    pub side: Outcome,
    pub amount_in: u64,
    /// Smallest acceptable output
    pub min_out: u64,
    pub deadline: i64,
}

pub fn execute_swap<L: TokenLedger>(
    market: &mut Market,
    ledger: &mut L,
    request: &SwapRequest,
    now: i64,
) -> Result<SwapQuote> {
    // Validate
    market.require_trading(now)?;
    require!(now < request.deadline, MarketError::Expired);
    require!(request.amount_in > 0, MarketError::InvalidAmount);
    if request.direction == SwapDirection::Sell {
        // Only tokens held outside the pool can be sold back into it
        require!(
            request.amount_in <= market.holder_supply(request.side),
            MarketError::InvalidAmount
        );
    }

    // Quote
    let quote = LmsrCurve::quote_swap(
        &market.reserves(),
        request.direction,
        request.side,
        request.amount_in,
        market.fee_bps,
    )?;

    // Apply
    require!(
        quote.amount_out >= request.min_out,
        MarketError::SlippageExceeded
    );

    let mut staged = market.clone();
    let side = request.side;
    let (asset_in, asset_out) = match request.direction {
        SwapDirection::Buy => {
            staged.reserve_stable = add(staged.reserve_stable, quote.amount_in)?;
            *staged.outcome_reserve_mut(side) = sub(staged.outcome_reserve(side), quote.amount_out)?;
            staged.fees_stable = add(staged.fees_stable, quote.fee_amount)?;
            (Asset::Stable, Asset::from(side))
        }
        SwapDirection::Sell => {
            *staged.outcome_reserve_mut(side) = add(staged.outcome_reserve(side), quote.amount_in)?;
            staged.reserve_stable = sub(staged.reserve_stable, quote.amount_out)?;
            let fees = staged.outcome_fees_mut(side);
            *fees = add(*fees, quote.fee_amount)?;
            (Asset::from(side), Asset::Stable)
        }
    };
    staged.check_invariants()?;

    // Settle
    ledger.transfer_in(asset_in, quote.amount_in)?;
    ledger.transfer_out(asset_out, quote.amount_out)?;

    *market = staged;
    Ok(quote)
}

fn add(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b)
        .ok_or_else(|| error!(MarketError::ArithmeticOverflow))
}

fn sub(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b)
        .ok_or_else(|| error!(MarketError::InsufficientLiquidity))
}
