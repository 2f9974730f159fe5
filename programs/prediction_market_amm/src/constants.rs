//! Protocol-wide constants
//!
//! Per-market parameters (fee, end time) are fixed at `initialize`; everything
//! here is compiled into the program.

/// Basis-point denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Maximum byte length of a market name
pub const MAX_NAME_LEN: usize = 100;

/// Smallest stable deposit accepted for the first liquidity provision
/// (1 token with 6 decimals)
pub const MIN_INITIAL_LIQUIDITY: u64 = 1_000_000;

/// LP shares minted per stable unit on the first deposit
pub const INITIAL_LP_SHARES_PER_UNIT: u64 = 1;

/// LMSR liquidity parameter `b` as a fraction of the first stable deposit.
///
/// Must stay at or below 10000 / ln(2) ≈ 14427 bps so that the stable reserve
/// covers every winning token at 1:1.
pub const LIQUIDITY_PARAM_BPS: u64 = 10_000;

pub const SEED_YES_MINT: &[u8] = b"yes_mint";
pub const SEED_NO_MINT: &[u8] = b"no_mint";
pub const SEED_LP_MINT: &[u8] = b"lp_mint";
