//! Token Trading
//!
//! Buys and sells YES/NO tokens against the pool inventory. Pricing is the
//! LMSR curve in [`crate::amm`]; the fee stays in the pool.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::amm::{LmsrCurve, SwapDirection};
use crate::engine::{self, SwapRequest};
use crate::instructions::token_ledger::{SplLedger, TokenRoute, VaultBalances, VaultSurplus};
use crate::state::{Market, Outcome};

/// Event emitted for every executed swap
#[event]
pub struct SwapExecuted {
    pub market: Pubkey,
    pub trader: Pubkey,
    pub direction: SwapDirection,
    pub side: Outcome,
    pub amount_in: u64,
    pub fee_amount: u64,
    pub amount_out: u64,
    pub reserve_stable: u64,
    pub reserve_yes: u64,
    pub reserve_no: u64,
    /// Post-trade marginal prices, basis points
    pub price_yes_bps: u64,
    pub price_no_bps: u64,
}

#[derive(Accounts)]
pub struct Swap<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

    #[account(
        mut,
        seeds = [Market::SEED, market.seed.to_le_bytes().as_ref()],
        bump = market.bump,
        has_one = stable_mint,
        has_one = yes_mint,
        has_one = no_mint,
    )]
    pub market: Box<Account<'info, Market>>,

    pub stable_mint: Box<InterfaceAccount<'info, Mint>>,
    pub yes_mint: Box<InterfaceAccount<'info, Mint>>,
    pub no_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = stable_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub vault_stable: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        associated_token::mint = yes_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub vault_yes: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        associated_token::mint = no_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub vault_no: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = stable_mint,
        associated_token::authority = trader,
        associated_token::token_program = token_program,
    )]
    pub trader_stable: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = yes_mint,
        associated_token::authority = trader,
        associated_token::token_program = token_program,
    )]
    pub trader_yes: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = no_mint,
        associated_token::authority = trader,
        associated_token::token_program = token_program,
    )]
    pub trader_no: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> Swap<'info> {
    fn vault_balances(&self) -> VaultBalances {
        VaultBalances {
            stable: self.vault_stable.amount,
            yes: self.vault_yes.amount,
            no: self.vault_no.amount,
        }
    }

    pub fn swap(
        &mut self,
        direction: SwapDirection,
        side: Outcome,
        amount_in: u64,
        min_out: u64,
        deadline: i64,
    ) -> Result<u64> {
        let now = Clock::get()?.unix_timestamp;
        let surplus = VaultSurplus::capture(&self.market, self.vault_balances())?;

        let seed_bytes = self.market.seed.to_le_bytes();
        let bump = [self.market.bump];
        let signer_seeds: &[&[&[u8]]] = &[&[Market::SEED, &seed_bytes, &bump]];
        let mut ledger = SplLedger {
            token_program: self.token_program.to_account_info(),
            market: self.market.to_account_info(),
            user: self.trader.to_account_info(),
            signer_seeds,
            stable: Some(
                TokenRoute::new(&self.stable_mint)
                    .vault(&self.vault_stable)
                    .user(&self.trader_stable),
            ),
            yes: Some(
                TokenRoute::new(&self.yes_mint)
                    .vault(&self.vault_yes)
                    .user(&self.trader_yes),
            ),
            no: Some(
                TokenRoute::new(&self.no_mint)
                    .vault(&self.vault_no)
                    .user(&self.trader_no),
            ),
            lp: None,
        };

        let request = SwapRequest {
            direction,
            side,
            amount_in,
            min_out,
            deadline,
        };
        let quote = engine::execute_swap(&mut self.market, &mut ledger, &request, now)?;

        self.vault_stable.reload()?;
        self.vault_yes.reload()?;
        self.vault_no.reload()?;
        surplus.verify(&self.market, self.vault_balances())?;

        let reserves = self.market.reserves();
        let price_yes_bps = LmsrCurve::spot_price_bps(&reserves, Outcome::Yes)?;
        let price_no_bps = LmsrCurve::spot_price_bps(&reserves, Outcome::No)?;
        msg!("YES {} bps / NO {} bps after swap", price_yes_bps, price_no_bps);

        emit!(SwapExecuted {
            market: self.market.key(),
            trader: self.trader.key(),
            direction,
            side,
            amount_in,
            fee_amount: quote.fee_amount,
            amount_out: quote.amount_out,
            reserve_stable: self.market.reserve_stable,
            reserve_yes: self.market.reserve_yes,
            reserve_no: self.market.reserve_no,
            price_yes_bps,
            price_no_bps,
        });

        Ok(quote.amount_out)
    }
}
