//! # Settlement
//!
//! Resolution fixes a payout rate for the winning side and splits the stable
//! reserve between token holders and LPs:
//!
//! ```text
//!   W               = winning supply (pool inventory + holders)
//!   held            = W - pool inventory of the winning side
//!   payout          = min(reserve_stable, W) / W          (1:1 when collateralized)
//!   holder_reserved = ceil(held · payout)
//!   lp_residual     = reserve_stable - holder_reserved
//! ```
//!
//! Holders redeem against `holder_reserved` (losing tokens are burned for
//! nothing). LPs burn their shares against `lp_residual`, and the pool's own
//! outcome inventory is burned with them.

use anchor_lang::prelude::*;

use crate::engine::{Asset, Holder, ShareToken, TokenLedger};
use crate::error::MarketError;
use crate::math::{mul_div, Rounding};
use crate::state::{Market, MarketStatus, Outcome, Settlement};

/// What an LP received from a post-resolution claim
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidityClaim {
    pub lp_burned: u64,
    pub stable_out: u64,
    /// Pool inventory burned from the vaults
    pub yes_burned: u64,
    pub no_burned: u64,
}

/// Record the outcome and snapshot the payout terms. Irreversible.
pub fn resolve(market: &mut Market, outcome: Outcome, now: i64) -> Result<Settlement> {
    require!(market.status == MarketStatus::Open, MarketError::MarketClosed);
    require!(now >= market.end_time, MarketError::MarketNotEnded);

    let winning_supply = market.outcome_supply(outcome);
    let held = market.holder_supply(outcome);

    let (payout_numerator, payout_denominator) = if winning_supply == 0 {
        (1, 1)
    } else {
        (market.reserve_stable.min(winning_supply), winning_supply)
    };

    // Never above the numerator, hence never above the stable reserve
    let holder_reserved = mul_div(held, payout_numerator, payout_denominator, Rounding::Up)?;
    let settlement = Settlement {
        payout_numerator,
        payout_denominator,
        holder_reserved,
        lp_residual: market.reserve_stable - holder_reserved,
    };

    let mut staged = market.clone();
    staged.transition_to(MarketStatus::Resolved)?;
    staged.outcome = Some(outcome);
    staged.settlement = settlement;
    staged.check_invariants()?;

    *market = staged;
    Ok(settlement)
}

fn require_resolved(market: &Market) -> Result<Outcome> {
    match (market.status, market.outcome) {
        (MarketStatus::Resolved, Some(outcome)) => Ok(outcome),
        (MarketStatus::Closed, _) => err!(MarketError::MarketClosed),
        _ => err!(MarketError::NotResolved),
    }
}

/// Burn `amount` outcome tokens held by the caller; pay the winning rate.
pub fn redeem<L: TokenLedger>(
    market: &mut Market,
    ledger: &mut L,
    side: Outcome,
    amount: u64,
) -> Result<u64> {
    let outcome = require_resolved(market)?;
    require!(
        amount > 0 && amount <= market.holder_supply(side),
        MarketError::InvalidAmount
    );

    let settlement = market.settlement;
    let payout = if side == outcome {
        mul_div(
            amount,
            settlement.payout_numerator,
            settlement.payout_denominator,
            Rounding::Down,
        )?
    } else {
        0
    };

    if payout > market.reserve_stable || payout > settlement.holder_reserved {
        msg!(
            "FATAL: redemption of {} needs {} stable, reserve {} reserved {}",
            amount,
            payout,
            market.reserve_stable,
            settlement.holder_reserved
        );
        return err!(MarketError::InsufficientReserve);
    }

    let mut staged = market.clone();
    *staged.outcome_supply_mut(side) -= amount;
    staged.reserve_stable -= payout;
    staged.settlement.holder_reserved -= payout;
    staged.check_invariants()?;

    ledger.burn(ShareToken::Outcome(side), Holder::Caller, amount)?;
    if payout > 0 {
        ledger.transfer_out(Asset::Stable, payout)?;
    }

    *market = staged;
    Ok(payout)
}

/// Burn LP shares after resolution for a pro-rata slice of `lp_residual`.
pub fn claim_liquidity<L: TokenLedger>(
    market: &mut Market,
    ledger: &mut L,
    lp_burn: u64,
) -> Result<LiquidityClaim> {
    require_resolved(market)?;
    require!(
        lp_burn > 0 && lp_burn <= market.lp_supply,
        MarketError::InsufficientLiquidity
    );

    let lp_supply = market.lp_supply;
    let claim = LiquidityClaim {
        lp_burned: lp_burn,
        stable_out: mul_div(market.settlement.lp_residual, lp_burn, lp_supply, Rounding::Down)?,
        yes_burned: mul_div(market.reserve_yes, lp_burn, lp_supply, Rounding::Down)?,
        no_burned: mul_div(market.reserve_no, lp_burn, lp_supply, Rounding::Down)?,
    };

    if claim.stable_out > market.reserve_stable {
        msg!(
            "FATAL: LP claim of {} exceeds stable reserve {}",
            claim.stable_out,
            market.reserve_stable
        );
        return err!(MarketError::InsufficientReserve);
    }

    let mut staged = market.clone();
    staged.lp_supply -= lp_burn;
    staged.liquidity -= mul_div(market.liquidity, lp_burn, lp_supply, Rounding::Down)?;
    staged.settlement.lp_residual -= claim.stable_out;
    staged.reserve_stable -= claim.stable_out;
    staged.reserve_yes -= claim.yes_burned;
    staged.reserve_no -= claim.no_burned;
    staged.supply_yes -= claim.yes_burned;
    staged.supply_no -= claim.no_burned;
    staged.check_invariants()?;

    ledger.burn(ShareToken::Lp, Holder::Caller, lp_burn)?;
    if claim.yes_burned > 0 {
        ledger.burn(ShareToken::Outcome(Outcome::Yes), Holder::Vault, claim.yes_burned)?;
    }
    if claim.no_burned > 0 {
        ledger.burn(ShareToken::Outcome(Outcome::No), Holder::Vault, claim.no_burned)?;
    }
    if claim.stable_out > 0 {
        ledger.transfer_out(Asset::Stable, claim.stable_out)?;
    }

    *market = staged;
    Ok(claim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::SwapDirection;
    use crate::engine::testing::*;
    use crate::engine::{execute_swap, SwapRequest};
    use proptest::prelude::*;

    fn buy(market: &mut Market, ledger: &mut MockLedger, side: Outcome, amount_in: u64) -> u64 {
        let request = SwapRequest {
            direction: SwapDirection::Buy,
            side,
            amount_in,
            min_out: 0,
            deadline: DEADLINE,
        };
        execute_swap(market, ledger, &request, NOW).unwrap().amount_out
    }

    /// Seeded market where the caller holds YES and NO, resolved to `outcome`
    fn resolved_market(outcome: Outcome) -> (Market, MockLedger, u64, u64) {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 15_000_000);
        let yes = buy(&mut market, &mut ledger, Outcome::Yes, 10_000_000);
        let no = buy(&mut market, &mut ledger, Outcome::No, 5_000_000);
        resolve(&mut market, outcome, END_TIME).unwrap();
        (market, ledger, yes, no)
    }

    #[test]
    fn test_resolve_requires_end_time() {
        let (mut market, _) = seeded_market(1_000_000_000, 0);
        assert_eq!(
            resolve(&mut market, Outcome::Yes, END_TIME - 1).unwrap_err(),
            MarketError::MarketNotEnded.into()
        );
        assert_eq!(market.status, MarketStatus::Open);
    }

    #[test]
    fn test_resolve_requires_open() {
        let (mut market, _) = seeded_market(1_000_000_000, 0);
        market.status = MarketStatus::Paused;
        assert_eq!(
            resolve(&mut market, Outcome::Yes, END_TIME).unwrap_err(),
            MarketError::MarketClosed.into()
        );

        market.status = MarketStatus::Open;
        resolve(&mut market, Outcome::No, END_TIME).unwrap();
        assert_eq!(
            resolve(&mut market, Outcome::Yes, END_TIME).unwrap_err(),
            MarketError::MarketClosed.into()
        );
        assert_eq!(market.outcome, Some(Outcome::No));
    }

    #[test]
    fn test_resolve_snapshot_collateralized() {
        let (market, _, yes, _) = resolved_market(Outcome::Yes);
        assert_eq!(market.status, MarketStatus::Resolved);
        assert_eq!(market.settlement.payout_numerator, market.settlement.payout_denominator);
        assert_eq!(market.settlement.holder_reserved, yes);
        assert_eq!(
            market.settlement.lp_residual,
            market.reserve_stable - yes
        );
    }

    #[test]
    fn test_redeem_before_resolution() {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 10_000_000);
        buy(&mut market, &mut ledger, Outcome::Yes, 10_000_000);
        assert_eq!(
            redeem(&mut market, &mut ledger, Outcome::Yes, 1).unwrap_err(),
            MarketError::NotResolved.into()
        );
    }

    #[test]
    fn test_losing_side_pays_nothing() {
        let (mut market, mut ledger, _, no) = resolved_market(Outcome::Yes);
        let stable_before = market.reserve_stable;

        assert_eq!(redeem(&mut market, &mut ledger, Outcome::No, no).unwrap(), 0);
        assert_eq!(ledger.caller.no, 0);
        assert_eq!(market.reserve_stable, stable_before);
        assert_reconciled(&market, &ledger);
    }

    #[test]
    fn test_winning_side_pays_one_to_one() {
        let (mut market, mut ledger, yes, _) = resolved_market(Outcome::Yes);
        let stable_before = market.reserve_stable;
        let supply_before = market.supply_yes;
        let caller_before = ledger.caller.stable;

        let paid = redeem(&mut market, &mut ledger, Outcome::Yes, yes).unwrap();

        assert_eq!(paid, yes);
        assert_eq!(market.reserve_stable, stable_before - yes);
        assert_eq!(market.supply_yes, supply_before - yes);
        assert_eq!(market.settlement.holder_reserved, 0);
        assert_eq!(ledger.caller.stable, caller_before + yes);
        assert_reconciled(&market, &ledger);

        // Already burned
        assert!(redeem(&mut market, &mut ledger, Outcome::Yes, yes).is_err());
    }

    #[test]
    fn test_redeem_more_than_held() {
        let (mut market, mut ledger, yes, _) = resolved_market(Outcome::No);
        assert_eq!(
            redeem(&mut market, &mut ledger, Outcome::Yes, yes + 1).unwrap_err(),
            MarketError::InvalidAmount.into()
        );
        assert_eq!(
            redeem(&mut market, &mut ledger, Outcome::Yes, 0).unwrap_err(),
            MarketError::InvalidAmount.into()
        );
    }

    #[test]
    fn test_undercollateralized_pays_pro_rata() {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 10_000_000);
        let yes = buy(&mut market, &mut ledger, Outcome::Yes, 10_000_000);

        // Stable drained below the winning supply
        market.reserve_stable = 500_000_000;
        ledger.vault.stable = 500_000_000;

        let settlement = resolve(&mut market, Outcome::Yes, END_TIME).unwrap();
        assert_eq!(settlement.payout_numerator, 500_000_000);
        assert_eq!(settlement.payout_denominator, 1_000_000_000);

        let paid = redeem(&mut market, &mut ledger, Outcome::Yes, yes).unwrap();
        assert_eq!(paid, yes / 2);
    }

    #[test]
    fn test_claims_drain_vault_exactly() {
        let (mut market, mut ledger, yes, no) = resolved_market(Outcome::Yes);

        redeem(&mut market, &mut ledger, Outcome::Yes, yes).unwrap();
        redeem(&mut market, &mut ledger, Outcome::No, no).unwrap();
        let lp_supply = market.lp_supply;
        let claim = claim_liquidity(&mut market, &mut ledger, lp_supply).unwrap();

        assert!(claim.stable_out > 0);
        assert_eq!(market.lp_supply, 0);
        assert_eq!(market.reserve_stable, 0);
        assert_eq!(market.supply_yes, 0);
        assert_eq!(market.supply_no, 0);
        assert_eq!(ledger.vault, Balances::default());
        assert!(market.check_invariants().is_ok());
    }

    #[test]
    fn test_claim_requires_resolution() {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 0);
        assert_eq!(
            claim_liquidity(&mut market, &mut ledger, 1).unwrap_err(),
            MarketError::NotResolved.into()
        );
    }

    #[test]
    fn test_failed_payout_leaves_record_untouched() {
        let (mut market, mut ledger, yes, _) = resolved_market(Outcome::Yes);
        let before = market.clone();
        ledger.fail_after = Some(ledger.calls + 1);

        assert_eq!(
            redeem(&mut market, &mut ledger, Outcome::Yes, yes).unwrap_err(),
            MarketError::TransferFailed.into()
        );
        assert_eq!(market, before);
    }

    proptest! {
        #[test]
        fn prop_payouts_never_exceed_vault(
            buys in prop::collection::vec((any::<bool>(), 1_000u64..40_000_000), 1..12),
            yes_wins in any::<bool>(),
            drained_bps in 0u64..9_000,
        ) {
            let (mut market, mut ledger) = seeded_market(1_000_000_000, 400_000_000);
            for (is_yes, amount) in buys {
                let side = if is_yes { Outcome::Yes } else { Outcome::No };
                let request = SwapRequest {
                    direction: SwapDirection::Buy,
                    side,
                    amount_in: amount,
                    min_out: 0,
                    deadline: DEADLINE,
                };
                let _ = execute_swap(&mut market, &mut ledger, &request, NOW);
            }

            // Optionally leave the pool short of stable
            let drained = market.reserve_stable * drained_bps / 10_000;
            market.reserve_stable -= drained;
            ledger.vault.stable -= drained;

            let outcome = if yes_wins { Outcome::Yes } else { Outcome::No };
            resolve(&mut market, outcome, END_TIME).unwrap();

            for side in [Outcome::Yes, Outcome::No] {
                let held = ledger.caller.outcome(side);
                if held > 0 {
                    redeem(&mut market, &mut ledger, side, held).unwrap();
                }
            }
            let lp_supply = market.lp_supply;
            claim_liquidity(&mut market, &mut ledger, lp_supply).unwrap();

            prop_assert_eq!(market.reserve_stable, ledger.vault.stable);
            prop_assert_eq!(market.settlement.holder_reserved, ledger.vault.stable);
            prop_assert!(market.check_invariants().is_ok());
        }
    }
}
