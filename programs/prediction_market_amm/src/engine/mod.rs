//! # Market Engines
//!
//! Pure state-transition logic for a single market. Each operation takes the
//! market record and a [`TokenLedger`] explicitly:
//!
//! ```text
//!   validate ──▶ stage on a copy ──▶ check invariants ──▶ ledger calls ──▶ commit
//! ```
//!
//! Any error before the commit leaves the caller's record untouched.

pub mod ledger;
pub mod liquidity;
pub mod settlement;
pub mod swap;

pub use ledger::*;
pub use liquidity::*;
pub use settlement::*;
pub use swap::*;

#[cfg(test)]
pub(crate) mod testing {
    use anchor_lang::prelude::*;

    use super::*;
    use crate::error::MarketError;
    use crate::state::{Market, MarketStatus, Outcome};

    pub const NOW: i64 = 100;
    pub const END_TIME: i64 = 1_000;
    pub const DEADLINE: i64 = 500;

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct Balances {
        pub stable: u64,
        pub yes: u64,
        pub no: u64,
        pub lp: u64,
    }

    impl Balances {
        fn asset(&mut self, asset: Asset) -> &mut u64 {
            match asset {
                Asset::Stable => &mut self.stable,
                Asset::Yes => &mut self.yes,
                Asset::No => &mut self.no,
            }
        }

        fn share(&mut self, token: ShareToken) -> &mut u64 {
            match token {
                ShareToken::Lp => &mut self.lp,
                ShareToken::Outcome(side) => self.asset(side.into()),
            }
        }

        pub fn outcome(&self, side: Outcome) -> u64 {
            match side {
                Outcome::Yes => self.yes,
                Outcome::No => self.no,
            }
        }
    }

    /// In-memory ledger with one vault set and one caller
    #[derive(Clone, Debug, Default)]
    pub struct MockLedger {
        pub vault: Balances,
        pub caller: Balances,
        /// Fail every request once this many have succeeded
        pub fail_after: Option<usize>,
        pub calls: usize,
    }

    impl MockLedger {
        pub fn funded(stable: u64) -> Self {
            Self {
                caller: Balances {
                    stable,
                    ..Balances::default()
                },
                ..Self::default()
            }
        }

        fn step(&mut self) -> Result<()> {
            if let Some(limit) = self.fail_after {
                if self.calls >= limit {
                    return err!(MarketError::TransferFailed);
                }
            }
            self.calls += 1;
            Ok(())
        }
    }

    fn debit(balance: &mut u64, amount: u64) -> Result<()> {
        *balance = balance
            .checked_sub(amount)
            .ok_or(MarketError::TransferFailed)?;
        Ok(())
    }

    impl TokenLedger for MockLedger {
        fn transfer_in(&mut self, asset: Asset, amount: u64) -> Result<()> {
            self.step()?;
            debit(self.caller.asset(asset), amount)?;
            *self.vault.asset(asset) += amount;
            Ok(())
        }

        fn transfer_out(&mut self, asset: Asset, amount: u64) -> Result<()> {
            self.step()?;
            debit(self.vault.asset(asset), amount)?;
            *self.caller.asset(asset) += amount;
            Ok(())
        }

        fn mint(&mut self, token: ShareToken, holder: Holder, amount: u64) -> Result<()> {
            self.step()?;
            let balances = match holder {
                Holder::Vault => &mut self.vault,
                Holder::Caller => &mut self.caller,
            };
            *balances.share(token) += amount;
            Ok(())
        }

        fn burn(&mut self, token: ShareToken, holder: Holder, amount: u64) -> Result<()> {
            self.step()?;
            let balances = match holder {
                Holder::Vault => &mut self.vault,
                Holder::Caller => &mut self.caller,
            };
            debit(balances.share(token), amount)
        }
    }

    pub fn open_market() -> Market {
        Market {
            seed: 7,
            name: "Will it rain tomorrow?".to_string(),
            fee_bps: 100,
            end_time: END_TIME,
            created_at: 0,
            status: MarketStatus::Open,
            ..Market::default()
        }
    }

    /// Open market seeded with an equal-split first deposit of `amount`.
    /// The caller keeps `spare` stable for trading.
    pub fn seeded_market(amount: u64, spare: u64) -> (Market, MockLedger) {
        let mut market = open_market();
        let mut ledger = MockLedger::funded(amount + spare);
        add_liquidity(&mut market, &mut ledger, amount, 0, 0, DEADLINE, NOW)
            .expect("seed deposit");
        (market, ledger)
    }

    /// Vault balances must always equal the recorded reserves
    pub fn assert_reconciled(market: &Market, ledger: &MockLedger) {
        assert_eq!(ledger.vault.stable, market.reserve_stable);
        assert_eq!(ledger.vault.yes, market.reserve_yes);
        assert_eq!(ledger.vault.no, market.reserve_no);
        assert_eq!(ledger.caller.lp, market.lp_supply);
    }
}
