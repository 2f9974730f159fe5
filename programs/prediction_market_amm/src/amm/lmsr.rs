//! # LMSR Cost-Function Curve
//!
//! Prices YES/NO trades against the pool's own outcome inventory.
//!
//! ## The Cost Potential
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │          P(Y, N) = b · ln( e^(-Y/b) + e^(-N/b) )            │
//! │                                                              │
//! │   Where:                                                     │
//! │   • Y, N = Pool inventory of YES / NO tokens                │
//! │   • b    = Liquidity depth (set by LP deposits)             │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Taking `Δ` tokens out of the pool raises `P` by exactly the stable the
//! trader pays; putting tokens back lowers `P` by what the pool pays out.
//!
//! ## Closed Forms
//!
//! With `z = (R_side - R_other) / b` and `x = effective_in / b`:
//!
//! ```text
//! Buy:   Δ / b = ln( (1 + e^z)·e^x - e^z )
//!              = z + ln( (1 + e^-z)·e^x - 1 )          (z > 0)
//!
//! Sell:  s / b = ln(1 + e^z) - ln(e^-x + e^z)
//!              = ln(1 + e^-z) - ln(1 + e^-z · e^-x)    (z > 0)
//!
//! Spot:  price_side = 1 / (1 + e^z)
//! ```
//!
//! Every exponent handed to `approx_exp` is at most `x`, so skewed pools never
//! overflow. The pool holds more of the side it prices cheaply.

use anchor_lang::prelude::*;

use crate::constants::BPS_DENOMINATOR;
use crate::error::MarketError;
use crate::math::{approx_exp, approx_ln, mul_div, Fixed, Rounding, PRECISION};
use crate::state::{Outcome, Reserves};

/// Which way stable flows in a swap
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SwapDirection {
    /// Stable in, outcome tokens out
    Buy,
    /// Outcome tokens in, stable out
    Sell,
}

/// Result of pricing a swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapQuote {
    pub amount_in: u64,
    /// Input after the fee, the part that moves the curve
    pub effective_in: u64,
    /// Retained by the pool in the input asset
    pub fee_amount: u64,
    pub amount_out: u64,
}

/// LMSR curve over pool inventory
pub struct LmsrCurve;

impl LmsrCurve {
    /// Price a swap against the current reserves.
    ///
    /// # Arguments
    /// * `reserves` - Pool inventory and liquidity depth
    /// * `direction` - Buy (stable → side) or Sell (side → stable)
    /// * `side` - Outcome being bought or sold
    /// * `amount_in` - Input amount before fees
    /// * `fee_bps` - Market fee, charged on the input
    ///
    /// # Example
    /// ```ignore
    /// // 1e9 / 1e9 / 1e9 pool, b = 1e9, 1% fee
    /// let quote = LmsrCurve::quote_swap(&reserves, SwapDirection::Buy, Outcome::Yes, 10_000_000, 100)?;
    /// // quote.fee_amount == 100_000, quote.amount_out ≈ 19_702_950
    /// ```
    pub fn quote_swap(
        reserves: &Reserves,
        direction: SwapDirection,
        side: Outcome,
        amount_in: u64,
        fee_bps: u16,
    ) -> Result<SwapQuote> {
        require!(amount_in > 0, MarketError::InvalidAmount);
        require!(reserves.liquidity > 0, MarketError::DivisionByZero);

        // Fee on input
        let fee_complement = BPS_DENOMINATOR
            .checked_sub(fee_bps as u64)
            .ok_or(MarketError::InvalidFee)?;
        let effective_in = mul_div(amount_in, fee_complement, BPS_DENOMINATOR, Rounding::Down)?;
        let fee_amount = amount_in - effective_in;

        let z = Self::skew(reserves, side)?;
        let x = Fixed::from_ratio(effective_in, reserves.liquidity)?;

        let (ratio, drawn_reserve) = match direction {
            SwapDirection::Buy => (Self::buy_ratio(z, x)?, reserves.outcome(side)),
            SwapDirection::Sell => (Self::sell_ratio(z, x)?, reserves.stable),
        };

        // Rounding can push a dust trade a hair below zero
        require!(ratio.is_positive(), MarketError::ZeroOutput);

        let amount_out = ratio.mul_int(reserves.liquidity, Rounding::Down)?;
        require!(amount_out > 0, MarketError::ZeroOutput);
        require!(amount_out < drawn_reserve, MarketError::InsufficientLiquidity);

        Ok(SwapQuote {
            amount_in,
            effective_in,
            fee_amount,
            amount_out,
        })
    }

    /// Marginal price of `side` in basis points (10000 = 1.0)
    ///
    /// YES and NO prices sum to 10000, give or take one from rounding.
    pub fn spot_price_bps(reserves: &Reserves, side: Outcome) -> Result<u64> {
        require!(reserves.liquidity > 0, MarketError::DivisionByZero);

        let z = Self::skew(reserves, side)?;
        let price = if z.is_positive() {
            let u = approx_exp(-z)?;
            u.checked_div(Fixed::ONE.checked_add(u)?)?
        } else {
            let ez = approx_exp(z)?;
            Fixed::ONE.checked_div(Fixed::ONE.checked_add(ez)?)?
        };

        price.mul_int(BPS_DENOMINATOR, Rounding::Down)
    }

    /// `z = (R_side - R_other) / b`
    fn skew(reserves: &Reserves, side: Outcome) -> Result<Fixed> {
        let diff = reserves.outcome(side) as i128 - reserves.outcome(side.opposite()) as i128;
        let scaled = diff
            .checked_mul(PRECISION)
            .ok_or(MarketError::ArithmeticOverflow)?;
        Ok(Fixed::from_raw(scaled / reserves.liquidity as i128))
    }

    /// Δ / b for a buy
    fn buy_ratio(z: Fixed, x: Fixed) -> Result<Fixed> {
        let ex = approx_exp(x)?;

        if z.is_positive() {
            let u = approx_exp(-z)?;
            let arg = Fixed::ONE
                .checked_add(u)?
                .checked_mul(ex)?
                .checked_sub(Fixed::ONE)?;
            require!(arg.is_positive(), MarketError::ZeroOutput);
            z.checked_add(approx_ln(arg)?)
        } else {
            let ez = approx_exp(z)?;
            let arg = Fixed::ONE
                .checked_add(ez)?
                .checked_mul(ex)?
                .checked_sub(ez)?;
            approx_ln(arg)
        }
    }

    /// s / b for a sell
    fn sell_ratio(z: Fixed, x: Fixed) -> Result<Fixed> {
        let e_neg_x = approx_exp(-x)?;

        let (before, after) = if z.is_positive() {
            let u = approx_exp(-z)?;
            (
                Fixed::ONE.checked_add(u)?,
                Fixed::ONE.checked_add(u.checked_mul(e_neg_x)?)?,
            )
        } else {
            let ez = approx_exp(z)?;
            (Fixed::ONE.checked_add(ez)?, e_neg_x.checked_add(ez)?)
        };

        // Both terms underflow only for sells far beyond the stable reserve
        require!(after.is_positive(), MarketError::InsufficientLiquidity);

        approx_ln(before)?.checked_sub(approx_ln(after)?)
    }
}

// ============================================================================
// TESTS
// ============================================================================
