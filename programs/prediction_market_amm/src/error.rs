//! Error codes for the prediction market AMM
//!
//! Every instruction surfaces failures through [`MarketError`]. Validation
//! errors are raised before any reserve is touched, so a failed instruction
//! never leaves the market record half-updated.

use anchor_lang::prelude::*;

#[error_code]
pub enum MarketError {
    #[msg("Amount must be greater than zero and within bounds")]
    InvalidAmount,
    #[msg("Market is not open")]
    MarketClosed,
    #[msg("Market end time or instruction deadline has passed")]
    Expired,
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,
    #[msg("Insufficient liquidity in pool")]
    InsufficientLiquidity,
    #[msg("Trade would produce zero output")]
    ZeroOutput,
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
    #[msg("Division by zero")]
    DivisionByZero,
    #[msg("Signer is not the market authority")]
    Unauthorized,
    #[msg("Market is not resolved")]
    NotResolved,
    #[msg("Vault cannot cover the payout")]
    InsufficientReserve,

    #[msg("Fee must be below 10000 basis points")]
    InvalidFee,
    #[msg("Market name exceeds maximum length")]
    NameTooLong,
    #[msg("End time must be in the future")]
    InvalidEndTime,
    #[msg("Market has not ended yet")]
    MarketNotEnded,
    #[msg("Market status does not allow this transition")]
    InvalidStatusTransition,
    #[msg("Market still has unclaimed liquidity or winning tokens")]
    MarketNotSettled,
    #[msg("Recorded reserve does not match vault balance")]
    VaultBalanceMismatch,
    #[msg("Market invariant violated")]
    InvariantViolation,
    #[msg("Token transfer failed")]
    TransferFailed,
    #[msg("Outcome tokens from a drained pool are still outstanding")]
    OutstandingSupply,
}
