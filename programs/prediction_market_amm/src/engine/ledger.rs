//! Token movements requested by the engines
//!
//! The engines never touch token accounts directly. They stage their
//! bookkeeping on a copy of the market, ask a [`TokenLedger`] to move tokens,
//! and commit only after every request has succeeded.

use anchor_lang::prelude::*;

use crate::state::Outcome;

/// Asset held in one of the market vaults
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Asset {
    Stable,
    Yes,
    No,
}

impl From<Outcome> for Asset {
    fn from(side: Outcome) -> Self {
        match side {
            Outcome::Yes => Asset::Yes,
            Outcome::No => Asset::No,
        }
    }
}

/// Token whose mint authority is the market
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareToken {
    Lp,
    Outcome(Outcome),
}

/// Owner of the token account a mint or burn applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Holder {
    /// Market-owned vault
    Vault,
    /// The instruction's signer
    Caller,
}

pub trait TokenLedger {
    /// Caller custody → vault
    fn transfer_in(&mut self, asset: Asset, amount: u64) -> Result<()>;

    /// Vault → caller custody, signed by the market
    fn transfer_out(&mut self, asset: Asset, amount: u64) -> Result<()>;

    fn mint(&mut self, token: ShareToken, holder: Holder, amount: u64) -> Result<()>;

    fn burn(&mut self, token: ShareToken, holder: Holder, amount: u64) -> Result<()>;
}
