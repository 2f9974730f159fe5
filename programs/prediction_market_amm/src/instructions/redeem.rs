//! Position Redemption
//!
//! After resolution, holders burn outcome tokens. Winning tokens pay the
//! settlement rate in stable; losing tokens are burned for nothing.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::engine;
use crate::instructions::token_ledger::{SplLedger, TokenRoute, VaultBalances, VaultSurplus};
use crate::state::{Market, Outcome};

/// Event emitted when a holder redeems outcome tokens
#[event]
pub struct PositionRedeemed {
    pub market: Pubkey,
    pub holder: Pubkey,
    pub side: Outcome,
    pub tokens_burned: u64,
    pub payout: u64,
}

#[derive(Accounts)]
pub struct Redeem<'info> {
    #[account(mut)]
    pub holder: Signer<'info>,

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
    #[account(mut)]
    pub yes_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(mut)]
    pub no_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = stable_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub vault_stable: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        associated_token::mint = yes_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub vault_yes: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        associated_token::mint = no_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub vault_no: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = holder,
        associated_token::mint = stable_mint,
        associated_token::authority = holder,
        associated_token::token_program = token_program,
    )]
    pub holder_stable: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        init_if_needed,
        payer = holder,
        associated_token::mint = yes_mint,
        associated_token::authority = holder,
        associated_token::token_program = token_program,
    )]
    pub holder_yes: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        init_if_needed,
        payer = holder,
        associated_token::mint = no_mint,
        associated_token::authority = holder,
        associated_token::token_program = token_program,
    )]
    pub holder_no: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> Redeem<'info> {
    fn vault_balances(&self) -> VaultBalances {
        VaultBalances {
            stable: self.vault_stable.amount,
            yes: self.vault_yes.amount,
            no: self.vault_no.amount,
        }
    }

    pub fn redeem(&mut self, side: Outcome, amount: u64) -> Result<u64> {
        let surplus = VaultSurplus::capture(&self.market, self.vault_balances())?;

        let seed_bytes = self.market.seed.to_le_bytes();
        let bump = [self.market.bump];
        let signer_seeds: &[&[&[u8]]] = &[&[Market::SEED, &seed_bytes, &bump]];
        let mut ledger = SplLedger {
            token_program: self.token_program.to_account_info(),
            market: self.market.to_account_info(),
            user: self.holder.to_account_info(),
            signer_seeds,
            stable: Some(
                TokenRoute::new(&self.stable_mint)
                    .vault(&self.vault_stable)
                    .user(&self.holder_stable),
            ),
            yes: Some(TokenRoute::new(&self.yes_mint).user(&self.holder_yes)),
            no: Some(TokenRoute::new(&self.no_mint).user(&self.holder_no)),
            lp: None,
        };

        let payout = engine::redeem(&mut self.market, &mut ledger, side, amount)?;

        self.vault_stable.reload()?;
        surplus.verify(&self.market, self.vault_balances())?;

        emit!(PositionRedeemed {
            market: self.market.key(),
            holder: self.holder.key(),
            side,
            tokens_burned: amount,
            payout,
        });

        Ok(payout)
    }
}
