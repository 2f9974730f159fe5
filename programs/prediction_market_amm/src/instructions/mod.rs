//! Instruction handlers for the prediction market
//!
//! Each instruction represents an action users can take:
//! - `initialize` - Create a market, its mints and vaults
//! - `liquidity` - Add or remove pool liquidity
//! - `swap` - Buy/sell outcome tokens
//! - `resolve` - Record the winning outcome (authority only)
//! - `redeem` - Burn outcome tokens for the settlement payout
//! - `claim` - LP withdrawal after resolution
//! - `admin` - Pause, unpause and close (authority only)

pub mod admin;
pub mod claim;
pub mod initialize;
pub mod liquidity;
pub mod redeem;
pub mod resolve;
pub mod swap;
pub mod token_ledger;

pub use admin::*;
pub use claim::*;
pub use initialize::*;
pub use liquidity::*;
pub use redeem::*;
pub use resolve::*;
pub use swap::*;
