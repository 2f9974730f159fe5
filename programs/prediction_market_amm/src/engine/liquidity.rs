//! # Liquidity Provision
//!
//! LP shares are a pro-rata claim on all three reserves.
//!
//! ## First Deposit (equal split)
//!
//! ```text
//!   stable in      = S
//!   YES, NO minted = S each, into the vaults   (S complete sets)
//!   LP minted      = S · INITIAL_LP_SHARES_PER_UNIT
//!   b              = S · LIQUIDITY_PARAM_BPS / 10000
//! ```
//!
//! Both sides start at a 50/50 price. YES/NO amounts offered by the caller
//! are not pulled. A pool drained by a full withdrawal cannot be re-seeded
//! while YES/NO tokens from its earlier life are still in circulation, since
//! they would settle against the new depositor's stable.
//!
//! ## Later Deposits (proportional minimum)
//!
//! ```text
//!   lp_minted = floor( min_x  lp_supply · amount_x / reserve_x )
//!   pulled_x  = ceil( lp_minted · reserve_x / lp_supply )
//! ```
//!
//! The binding asset sets the mint; anything above `pulled_x` stays with the
//! caller and is reported as refunded.

use anchor_lang::prelude::*;

use crate::constants::{
    BPS_DENOMINATOR, INITIAL_LP_SHARES_PER_UNIT, LIQUIDITY_PARAM_BPS, MIN_INITIAL_LIQUIDITY,
};
use crate::engine::{Asset, Holder, ShareToken, TokenLedger};
use crate::error::MarketError;
use crate::math::{mul_div, Rounding};
use crate::state::{Market, MarketStatus, Outcome};

/// What a deposit pulled and minted
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidityDeposit {
    pub lp_minted: u64,
    pub stable_in: u64,
    pub yes_in: u64,
    pub no_in: u64,
    /// Offered but not pulled
    pub stable_refunded: u64,
    pub yes_refunded: u64,
    pub no_refunded: u64,
}

/// What a withdrawal paid out
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidityWithdrawal {
    pub lp_burned: u64,
    pub stable_out: u64,
    pub yes_out: u64,
    pub no_out: u64,
}

/// Deposit liquidity and mint LP shares to the caller.
pub fn add_liquidity<L: TokenLedger>(
    market: &mut Market,
    ledger: &mut L,
    amount_stable: u64,
    amount_yes: u64,
    amount_no: u64,
    deadline: i64,
    now: i64,
) -> Result<LiquidityDeposit> {
    market.require_trading(now)?;
    require!(now < deadline, MarketError::Expired);
    require!(amount_stable > 0, MarketError::InvalidAmount);

    let mut staged = market.clone();
    let deposit = if market.lp_supply == 0 {
        stage_first_deposit(&mut staged, amount_stable, amount_yes, amount_no)?
    } else {
        stage_proportional_deposit(&mut staged, amount_stable, amount_yes, amount_no)?
    };
    staged.check_invariants()?;

    if market.lp_supply == 0 {
        ledger.transfer_in(Asset::Stable, deposit.stable_in)?;
        ledger.mint(ShareToken::Outcome(Outcome::Yes), Holder::Vault, deposit.yes_in)?;
        ledger.mint(ShareToken::Outcome(Outcome::No), Holder::Vault, deposit.no_in)?;
    } else {
        ledger.transfer_in(Asset::Stable, deposit.stable_in)?;
        ledger.transfer_in(Asset::Yes, deposit.yes_in)?;
        ledger.transfer_in(Asset::No, deposit.no_in)?;
    }
    ledger.mint(ShareToken::Lp, Holder::Caller, deposit.lp_minted)?;

    *market = staged;
    Ok(deposit)
}

fn stage_first_deposit(
    market: &mut Market,
    amount_stable: u64,
    amount_yes: u64,
    amount_no: u64,
) -> Result<LiquidityDeposit> {
    require!(
        amount_stable >= MIN_INITIAL_LIQUIDITY,
        MarketError::InsufficientLiquidity
    );
    if market.supply_yes != 0 || market.supply_no != 0 {
        msg!(
            "Cannot re-seed: {} YES and {} NO still outstanding",
            market.supply_yes,
            market.supply_no
        );
        return err!(MarketError::OutstandingSupply);
    }

    let lp_minted = amount_stable
        .checked_mul(INITIAL_LP_SHARES_PER_UNIT)
        .ok_or(MarketError::ArithmeticOverflow)?;
    let liquidity = mul_div(
        amount_stable,
        LIQUIDITY_PARAM_BPS,
        BPS_DENOMINATOR,
        Rounding::Down,
    )?;

    market.reserve_stable = amount_stable;
    market.reserve_yes = amount_stable;
    market.reserve_no = amount_stable;
    market.supply_yes = amount_stable;
    market.supply_no = amount_stable;
    market.lp_supply = lp_minted;
    market.liquidity = liquidity;

    Ok(LiquidityDeposit {
        lp_minted,
        stable_in: amount_stable,
        yes_in: amount_stable,
        no_in: amount_stable,
        stable_refunded: 0,
        yes_refunded: amount_yes,
        no_refunded: amount_no,
    })
}

fn stage_proportional_deposit(
    market: &mut Market,
    amount_stable: u64,
    amount_yes: u64,
    amount_no: u64,
) -> Result<LiquidityDeposit> {
    let lp_supply = market.lp_supply;

    let lp_minted = [
        (amount_stable, market.reserve_stable),
        (amount_yes, market.reserve_yes),
        (amount_no, market.reserve_no),
    ]
    .iter()
    .map(|&(amount, reserve)| mul_div(lp_supply, amount, reserve, Rounding::Down))
    .collect::<Result<Vec<u64>>>()?
    .into_iter()
    .min()
    .unwrap_or(0);
    require!(lp_minted > 0, MarketError::ZeroOutput);

    // Rounded up so existing LPs are never diluted
    let stable_in = mul_div(lp_minted, market.reserve_stable, lp_supply, Rounding::Up)?;
    let yes_in = mul_div(lp_minted, market.reserve_yes, lp_supply, Rounding::Up)?;
    let no_in = mul_div(lp_minted, market.reserve_no, lp_supply, Rounding::Up)?;
    let liquidity_added = mul_div(market.liquidity, lp_minted, lp_supply, Rounding::Down)?;

    market.reserve_stable = checked_add(market.reserve_stable, stable_in)?;
    market.reserve_yes = checked_add(market.reserve_yes, yes_in)?;
    market.reserve_no = checked_add(market.reserve_no, no_in)?;
    market.lp_supply = checked_add(lp_supply, lp_minted)?;
    market.liquidity = checked_add(market.liquidity, liquidity_added)?;

    Ok(LiquidityDeposit {
        lp_minted,
        stable_in,
        yes_in,
        no_in,
        stable_refunded: amount_stable - stable_in,
        yes_refunded: amount_yes - yes_in,
        no_refunded: amount_no - no_in,
    })
}

/// Burn LP shares for a pro-rata slice of every reserve.
pub fn remove_liquidity<L: TokenLedger>(
    market: &mut Market,
    ledger: &mut L,
    lp_burn: u64,
    deadline: i64,
    now: i64,
) -> Result<LiquidityWithdrawal> {
    require!(market.status == MarketStatus::Open, MarketError::MarketClosed);
    require!(now < deadline, MarketError::Expired);
    require!(
        lp_burn > 0 && lp_burn <= market.lp_supply,
        MarketError::InsufficientLiquidity
    );

    let lp_supply = market.lp_supply;
    let withdrawal = LiquidityWithdrawal {
        lp_burned: lp_burn,
        stable_out: mul_div(market.reserve_stable, lp_burn, lp_supply, Rounding::Down)?,
        yes_out: mul_div(market.reserve_yes, lp_burn, lp_supply, Rounding::Down)?,
        no_out: mul_div(market.reserve_no, lp_burn, lp_supply, Rounding::Down)?,
    };
    let liquidity_removed = mul_div(market.liquidity, lp_burn, lp_supply, Rounding::Down)?;

    let mut staged = market.clone();
    staged.reserve_stable -= withdrawal.stable_out;
    staged.reserve_yes -= withdrawal.yes_out;
    staged.reserve_no -= withdrawal.no_out;
    staged.lp_supply -= lp_burn;
    staged.liquidity -= liquidity_removed;
    staged.check_invariants()?;

    ledger.burn(ShareToken::Lp, Holder::Caller, lp_burn)?;
    ledger.transfer_out(Asset::Stable, withdrawal.stable_out)?;
    ledger.transfer_out(Asset::Yes, withdrawal.yes_out)?;
    ledger.transfer_out(Asset::No, withdrawal.no_out)?;

    *market = staged;
    Ok(withdrawal)
}

fn checked_add(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b)
        .ok_or_else(|| error!(MarketError::ArithmeticOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::SwapDirection;
    use crate::engine::testing::*;
    use crate::engine::{execute_swap, SwapRequest};

    #[test]
    fn test_first_deposit_equal_split() {
        let mut market = open_market();
        let mut ledger = MockLedger::funded(1_000_000_000);

        let deposit = add_liquidity(
            &mut market,
            &mut ledger,
            1_000_000_000,
            5,
            9,
            DEADLINE,
            NOW,
        )
        .unwrap();

        assert_eq!(deposit.lp_minted, 1_000_000_000);
        assert_eq!(deposit.yes_refunded, 5);
        assert_eq!(deposit.no_refunded, 9);
        assert_eq!(market.reserve_stable, 1_000_000_000);
        assert_eq!(market.reserve_yes, 1_000_000_000);
        assert_eq!(market.reserve_no, 1_000_000_000);
        assert_eq!(market.supply_yes, 1_000_000_000);
        assert_eq!(market.liquidity, 1_000_000_000);
        assert_eq!(ledger.caller.stable, 0);
        assert_reconciled(&market, &ledger);
    }

    #[test]
    fn test_reseed_rejected_while_tokens_outstanding() {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 10_000_000);
        execute_swap(
            &mut market,
            &mut ledger,
            &SwapRequest {
                direction: SwapDirection::Buy,
                side: Outcome::Yes,
                amount_in: 10_000_000,
                min_out: 0,
                deadline: DEADLINE,
            },
            NOW,
        )
        .unwrap();
        remove_liquidity(&mut market, &mut ledger, 1_000_000_000, DEADLINE, NOW).unwrap();
        assert_eq!(market.lp_supply, 0);

        // A second LP would otherwise back the earlier pool's tokens
        let before = market.clone();
        ledger.caller.stable += 1_000_000_000;
        assert_eq!(
            add_liquidity(&mut market, &mut ledger, 1_000_000_000, 0, 0, DEADLINE, NOW)
                .unwrap_err(),
            MarketError::OutstandingSupply.into()
        );
        assert_eq!(market, before);
    }

    #[test]
    fn test_first_deposit_minimum() {
        let mut market = open_market();
        let mut ledger = MockLedger::funded(MIN_INITIAL_LIQUIDITY);
        assert_eq!(
            add_liquidity(&mut market, &mut ledger, MIN_INITIAL_LIQUIDITY - 1, 0, 0, DEADLINE, NOW)
                .unwrap_err(),
            MarketError::InsufficientLiquidity.into()
        );
        assert_eq!(market, open_market());
    }

    #[test]
    fn test_deposit_validation_order() {
        let mut market = open_market();
        let mut ledger = MockLedger::funded(10_000_000);

        market.status = MarketStatus::Paused;
        assert_eq!(
            add_liquidity(&mut market, &mut ledger, 10_000_000, 0, 0, DEADLINE, NOW).unwrap_err(),
            MarketError::MarketClosed.into()
        );

        market.status = MarketStatus::Open;
        assert_eq!(
            add_liquidity(&mut market, &mut ledger, 10_000_000, 0, 0, DEADLINE, END_TIME).unwrap_err(),
            MarketError::Expired.into()
        );
        assert_eq!(
            add_liquidity(&mut market, &mut ledger, 10_000_000, 0, 0, NOW - 1, NOW).unwrap_err(),
            MarketError::Expired.into()
        );
        assert_eq!(
            add_liquidity(&mut market, &mut ledger, 0, 0, 0, DEADLINE, NOW).unwrap_err(),
            MarketError::InvalidAmount.into()
        );
    }

    #[test]
    fn test_proportional_deposit_in_exact_ratio() {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 0);
        // Second depositor arrives with a matching basket
        ledger.caller = Balances {
            stable: 250_000_000,
            yes: 250_000_000,
            no: 250_000_000,
            lp: ledger.caller.lp,
        };
        market.supply_yes += 250_000_000;
        market.supply_no += 250_000_000;

        let deposit = add_liquidity(
            &mut market,
            &mut ledger,
            250_000_000,
            250_000_000,
            250_000_000,
            DEADLINE,
            NOW,
        )
        .unwrap();

        assert_eq!(deposit.lp_minted, 250_000_000);
        assert_eq!(deposit.stable_refunded, 0);
        assert_eq!(deposit.yes_refunded, 0);
        assert_eq!(deposit.no_refunded, 0);
        assert_eq!(market.lp_supply, 1_250_000_000);
        assert_eq!(market.liquidity, 1_250_000_000);
        assert_reconciled(&market, &ledger);
    }

    #[test]
    fn test_proportional_deposit_refunds_excess() {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 0);
        ledger.caller.stable = 500_000_000;
        ledger.caller.yes = 100_000_000;
        ledger.caller.no = 300_000_000;
        market.supply_yes += 100_000_000;
        market.supply_no += 300_000_000;

        let deposit = add_liquidity(
            &mut market,
            &mut ledger,
            500_000_000,
            100_000_000,
            300_000_000,
            DEADLINE,
            NOW,
        )
        .unwrap();

        // YES binds
        assert_eq!(deposit.lp_minted, 100_000_000);
        assert_eq!(deposit.stable_in, 100_000_000);
        assert_eq!(deposit.stable_refunded, 400_000_000);
        assert_eq!(deposit.no_refunded, 200_000_000);
        assert_eq!(ledger.caller.stable, 400_000_000);
        assert_eq!(ledger.caller.no, 200_000_000);
    }

    #[test]
    fn test_deposit_missing_asset_mints_nothing() {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 10_000_000);
        let before = market.clone();
        assert_eq!(
            add_liquidity(&mut market, &mut ledger, 10_000_000, 0, 0, DEADLINE, NOW).unwrap_err(),
            MarketError::ZeroOutput.into()
        );
        assert_eq!(market, before);
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 0);

        let withdrawal =
            remove_liquidity(&mut market, &mut ledger, 1_000_000_000, DEADLINE, NOW).unwrap();

        assert_eq!(withdrawal.stable_out, 1_000_000_000);
        assert_eq!(withdrawal.yes_out, 1_000_000_000);
        assert_eq!(withdrawal.no_out, 1_000_000_000);
        assert_eq!(market.lp_supply, 0);
        assert_eq!(market.liquidity, 0);
        assert!(market.check_invariants().is_ok());
        assert_reconciled(&market, &ledger);
    }

    #[test]
    fn test_proportional_round_trip_never_profits() {
        let (mut market, mut ledger) = seeded_market(1_000_000_003, 0);
        market.reserve_yes = 700_000_001;
        ledger.vault.yes = 700_000_001;
        market.supply_no += 333_333_333;
        ledger.caller.stable = 333_333_333;
        ledger.caller.yes = 233_333_334;
        ledger.caller.no = 333_333_333;

        let deposit = add_liquidity(
            &mut market,
            &mut ledger,
            333_333_333,
            233_333_334,
            333_333_333,
            DEADLINE,
            NOW,
        )
        .unwrap();
        assert_eq!(deposit.lp_minted, 333_333_333);
        // Ceil pull on the uneven side
        assert_eq!(deposit.yes_in, 233_333_333);

        let withdrawal =
            remove_liquidity(&mut market, &mut ledger, deposit.lp_minted, DEADLINE, NOW).unwrap();

        assert!(withdrawal.stable_out <= deposit.stable_in);
        assert!(withdrawal.yes_out <= deposit.yes_in);
        assert!(withdrawal.no_out <= deposit.no_in);
        assert_eq!(withdrawal.yes_out, 233_333_332);
        assert_eq!(market.lp_supply, 1_000_000_003);
        assert_reconciled(&market, &ledger);
    }

    #[test]
    fn test_partial_remove_floors_in_pool_favor() {
        let (mut market, mut ledger) = seeded_market(1_000_000_003, 0);
        market.reserve_yes = 700_000_001;
        ledger.vault.yes = 700_000_001;

        let withdrawal =
            remove_liquidity(&mut market, &mut ledger, 333_333_334, DEADLINE, NOW).unwrap();

        // 700_000_001 · 333_333_334 / 1_000_000_003 = 233_333_333.9...
        assert_eq!(withdrawal.yes_out, 233_333_333);
        assert!(withdrawal.stable_out <= 333_333_334);
        assert_reconciled(&market, &ledger);
    }

    #[test]
    fn test_remove_bounds() {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 0);
        assert_eq!(
            remove_liquidity(&mut market, &mut ledger, 0, DEADLINE, NOW).unwrap_err(),
            MarketError::InsufficientLiquidity.into()
        );
        assert_eq!(
            remove_liquidity(&mut market, &mut ledger, 1_000_000_001, DEADLINE, NOW).unwrap_err(),
            MarketError::InsufficientLiquidity.into()
        );
        assert_eq!(
            remove_liquidity(&mut market, &mut ledger, 1, NOW, NOW).unwrap_err(),
            MarketError::Expired.into()
        );
    }

    #[test]
    fn test_remove_failure_leaves_record_untouched() {
        let (mut market, mut ledger) = seeded_market(1_000_000_000, 0);
        let before = market.clone();
        ledger.fail_after = Some(ledger.calls + 2);

        assert_eq!(
            remove_liquidity(&mut market, &mut ledger, 10, DEADLINE, NOW).unwrap_err(),
            MarketError::TransferFailed.into()
        );
        assert_eq!(market, before);
    }
}
