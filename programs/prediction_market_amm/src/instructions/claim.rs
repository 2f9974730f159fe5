//! Post-resolution LP Claims
//!
//! LPs burn their shares for a pro-rata slice of the stable left after
//! holder claims. The pool's own YES/NO inventory is burned alongside, so the
//! last claim empties both outcome vaults.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::engine;
use crate::instructions::token_ledger::{SplLedger, TokenRoute, VaultBalances, VaultSurplus};
use crate::state::Market;

/// Event emitted when an LP claims after resolution
#[event]
pub struct LiquidityClaimed {
    pub market: Pubkey,
    pub provider: Pubkey,
    pub lp_burned: u64,
    pub stable_out: u64,
    pub yes_burned: u64,
    pub no_burned: u64,
}

#[derive(Accounts)]
pub struct ClaimLiquidity<'info> {
    #[account(mut)]
    pub provider: Signer<'info>,

    #[account(
        mut,
        seeds = [Market::SEED, market.seed.to_le_bytes().as_ref()],
        bump = market.bump,
        has_one = stable_mint,
        has_one = yes_mint,
        has_one = no_mint,
        has_one = lp_mint,
    )]
    pub market: Box<Account<'info, Market>>,

    pub stable_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(mut)]
    pub yes_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(mut)]
    pub no_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(mut)]
    pub lp_mint: Box<InterfaceAccount<'info, Mint>>,

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
        init_if_needed,
        payer = provider,
        associated_token::mint = stable_mint,
        associated_token::authority = provider,
        associated_token::token_program = token_program,
    )]
    pub provider_stable: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        associated_token::mint = lp_mint,
        associated_token::authority = provider,
        associated_token::token_program = token_program,
    )]
    pub provider_lp: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> ClaimLiquidity<'info> {
    fn vault_balances(&self) -> VaultBalances {
        VaultBalances {
            stable: self.vault_stable.amount,
            yes: self.vault_yes.amount,
            no: self.vault_no.amount,
        }
    }

    pub fn claim_liquidity(&mut self, lp_burn: u64) -> Result<u64> {
        let surplus = VaultSurplus::capture(&self.market, self.vault_balances())?;

        let seed_bytes = self.market.seed.to_le_bytes();
        let bump = [self.market.bump];
        let signer_seeds: &[&[&[u8]]] = &[&[Market::SEED, &seed_bytes, &bump]];
        let mut ledger = SplLedger {
            token_program: self.token_program.to_account_info(),
            market: self.market.to_account_info(),
            user: self.provider.to_account_info(),
            signer_seeds,
            stable: Some(
                TokenRoute::new(&self.stable_mint)
                    .vault(&self.vault_stable)
                    .user(&self.provider_stable),
            ),
            yes: Some(TokenRoute::new(&self.yes_mint).vault(&self.vault_yes)),
            no: Some(TokenRoute::new(&self.no_mint).vault(&self.vault_no)),
            lp: Some(TokenRoute::new(&self.lp_mint).user(&self.provider_lp)),
        };

        let claim = engine::claim_liquidity(&mut self.market, &mut ledger, lp_burn)?;

        self.vault_stable.reload()?;
        self.vault_yes.reload()?;
        self.vault_no.reload()?;
        surplus.verify(&self.market, self.vault_balances())?;

        emit!(LiquidityClaimed {
            market: self.market.key(),
            provider: self.provider.key(),
            lp_burned: claim.lp_burned,
            stable_out: claim.stable_out,
            yes_burned: claim.yes_burned,
            no_burned: claim.no_burned,
        });

        Ok(claim.stable_out)
    }
}
