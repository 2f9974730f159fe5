//! # Deterministic Fixed-Point Arithmetic
//!
//! Every quantity the pricing curve touches is an integer. Token amounts are
//! `u64`; curve exponents and logarithms are [`Fixed`] values carrying
//! twelve decimal places in an `i128`.
//!
//! ```text
//!   Fixed(raw)  ==  raw / 10^12
//!
//!   Fixed::ONE  ==  1_000_000_000_000
//! ```
//!
//! ## Approximation bounds
//!
//! | function     | domain         | error                                         |
//! |--------------|----------------|-----------------------------------------------|
//! | `approx_exp` | x ≤ 30         | relative < 1e-9 (result ≥ 1e-3), else < 1e-11 |
//! | `approx_ln`  | x > 0          | absolute < 1e-10                              |
//!
//! Both are monotonic non-decreasing on the integer lattice: every series term
//! is non-negative and floor-rounded, and the range-reduction constant `LN_2`
//! is rounded up, so no cell boundary can step backwards.

use anchor_lang::prelude::*;
use std::ops::Neg;

use crate::error::MarketError;

/// Scale of a [`Fixed`] value (12 decimal places)
pub const PRECISION: i128 = 1_000_000_000_000;

/// ln(2) scaled by `PRECISION`, rounded up
const LN_2: i128 = 693_147_180_560;

/// Largest exponent accepted by [`approx_exp`]
pub const MAX_EXP_INPUT: i128 = 30 * PRECISION;

/// Exponents below this underflow to zero
const MIN_EXP_INPUT: i128 = -40 * PRECISION;

const MAX_SERIES_TERMS: i128 = 24;

/// Rounding direction for integer division
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

/// Compute `a * b / denom` through a `u128` intermediate.
///
/// # Errors
/// * `DivisionByZero` if `denom == 0`
/// * `ArithmeticOverflow` if the result does not fit in `u64`
pub fn mul_div(a: u64, b: u64, denom: u64, rounding: Rounding) -> Result<u64> {
    require!(denom != 0, MarketError::DivisionByZero);

    // (2^64 - 1)^2 < 2^128
    let product = (a as u128) * (b as u128);
    let denom = denom as u128;

    let mut quotient = product / denom;
    if rounding == Rounding::Up && product % denom != 0 {
        quotient += 1;
    }

    u64::try_from(quotient).map_err(|_| error!(MarketError::ArithmeticOverflow))
}

/// Signed fixed-point number with 12 decimal places
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fixed(i128);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(PRECISION);

    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i128 {
        self.0
    }

    pub fn from_int(value: u64) -> Self {
        Self(value as i128 * PRECISION)
    }

    /// `num / den`, truncated
    pub fn from_ratio(num: u64, den: u64) -> Result<Self> {
        require!(den != 0, MarketError::DivisionByZero);
        Ok(Self(num as i128 * PRECISION / den as i128))
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Fixed) -> Result<Fixed> {
        self.0.checked_add(other.0).map(Fixed).ok_or_else(overflow)
    }

    pub fn checked_sub(self, other: Fixed) -> Result<Fixed> {
        self.0.checked_sub(other.0).map(Fixed).ok_or_else(overflow)
    }

    pub fn checked_mul(self, other: Fixed) -> Result<Fixed> {
        self.0
            .checked_mul(other.0)
            .map(|product| Fixed(product / PRECISION))
            .ok_or_else(overflow)
    }

    pub fn checked_div(self, other: Fixed) -> Result<Fixed> {
        require!(other.0 != 0, MarketError::DivisionByZero);
        self.0
            .checked_mul(PRECISION)
            .map(|numerator| Fixed(numerator / other.0))
            .ok_or_else(overflow)
    }

    /// Multiply by a whole token amount and return whole units.
    ///
    /// Negative values are rejected; a token amount is never negative.
    pub fn mul_int(self, value: u64, rounding: Rounding) -> Result<u64> {
        require!(self.0 >= 0, MarketError::ArithmeticOverflow);

        let product = self.0.checked_mul(value as i128).ok_or_else(overflow)?;
        let mut whole = product / PRECISION;
        if rounding == Rounding::Up && product % PRECISION != 0 {
            whole += 1;
        }

        u64::try_from(whole).map_err(|_| error!(MarketError::ArithmeticOverflow))
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

fn overflow() -> anchor_lang::error::Error {
    error!(MarketError::ArithmeticOverflow)
}

/// e^x
///
/// Range reduction `x = k·ln2 + r` with `r ∈ [0, ln2)`, Taylor series for
/// `e^r`, then a shift by `2^k`.
pub fn approx_exp(x: Fixed) -> Result<Fixed> {
    require!(x.0 <= MAX_EXP_INPUT, MarketError::ArithmeticOverflow);
    if x.0 < MIN_EXP_INPUT {
        return Ok(Fixed::ZERO);
    }

    let k = x.0.div_euclid(LN_2);
    let r = x.0.rem_euclid(LN_2);

    let mut sum = PRECISION;
    let mut term = PRECISION;
    for n in 1..=MAX_SERIES_TERMS {
        term = term * r / (PRECISION * n);
        if term == 0 {
            break;
        }
        sum += term;
    }

    // k ∈ [-58, 43] on the accepted domain
    let value = if k >= 0 {
        sum << (k as u32)
    } else {
        sum >> ((-k) as u32)
    };

    Ok(Fixed(value))
}

/// ln(x)
///
/// Normalizes `x = m·2^k` with `m ∈ [1, 2)` and sums
/// `ln m = 2·(t + t³/3 + t⁵/5 + …)` for `t = (m - 1)/(m + 1) < 1/3`.
pub fn approx_ln(x: Fixed) -> Result<Fixed> {
    require!(x.0 > 0, MarketError::ArithmeticOverflow);

    let mut m = x.0;
    let mut k: i128 = 0;
    while m >= 2 * PRECISION {
        m >>= 1;
        k += 1;
    }
    while m < PRECISION {
        m <<= 1;
        k -= 1;
    }

    let t = (m - PRECISION) * PRECISION / (m + PRECISION);
    let t_squared = t * t / PRECISION;

    let mut power = t;
    let mut series = t;
    let mut divisor = 3;
    while divisor <= 2 * MAX_SERIES_TERMS + 1 {
        power = power * t_squared / PRECISION;
        if power == 0 {
            break;
        }
        series += power / divisor;
        divisor += 2;
    }

    Ok(Fixed(2 * series + k * LN_2))
}
