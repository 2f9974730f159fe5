//! Liquidity Provision
//!
//! `add_liquidity` and `remove_liquidity` share one account layout: the
//! caller's stable/YES/NO/LP accounts and the three market vaults.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::engine::{self, LiquidityWithdrawal};
use crate::instructions::token_ledger::{SplLedger, TokenRoute, VaultBalances, VaultSurplus};
use crate::state::Market;

/// Event emitted when liquidity is deposited
#[event]
pub struct LiquidityAdded {
    pub market: Pubkey,
    pub provider: Pubkey,
    pub lp_minted: u64,
    pub stable_in: u64,
    pub yes_in: u64,
    pub no_in: u64,
    pub stable_refunded: u64,
    pub yes_refunded: u64,
    pub no_refunded: u64,
    pub liquidity: u64,
}

/// Event emitted when liquidity is withdrawn
#[event]
pub struct LiquidityRemoved {
    pub market: Pubkey,
    pub provider: Pubkey,
    pub lp_burned: u64,
    pub stable_out: u64,
    pub yes_out: u64,
    pub no_out: u64,
    pub liquidity: u64,
}

#[derive(Accounts)]
pub struct Liquidity<'info> {
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
        mut,
        associated_token::mint = stable_mint,
        associated_token::authority = provider,
        associated_token::token_program = token_program,
    )]
    pub provider_stable: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        init_if_needed,
        payer = provider,
        associated_token::mint = yes_mint,
        associated_token::authority = provider,
        associated_token::token_program = token_program,
    )]
    pub provider_yes: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        init_if_needed,
        payer = provider,
        associated_token::mint = no_mint,
        associated_token::authority = provider,
        associated_token::token_program = token_program,
    )]
    pub provider_no: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        init_if_needed,
        payer = provider,
        associated_token::mint = lp_mint,
        associated_token::authority = provider,
        associated_token::token_program = token_program,
    )]
    pub provider_lp: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> Liquidity<'info> {
    fn vault_balances(&self) -> VaultBalances {
        VaultBalances {
            stable: self.vault_stable.amount,
            yes: self.vault_yes.amount,
            no: self.vault_no.amount,
        }
    }

    fn reload_vaults(&mut self) -> Result<VaultBalances> {
        self.vault_stable.reload()?;
        self.vault_yes.reload()?;
        self.vault_no.reload()?;
        Ok(self.vault_balances())
    }

    fn ledger<'a>(&self, signer_seeds: &'a [&'a [&'a [u8]]]) -> SplLedger<'a, 'info> {
        SplLedger {
            token_program: self.token_program.to_account_info(),
            market: self.market.to_account_info(),
            user: self.provider.to_account_info(),
            signer_seeds,
            stable: Some(
                TokenRoute::new(&self.stable_mint)
                    .vault(&self.vault_stable)
                    .user(&self.provider_stable),
            ),
            yes: Some(
                TokenRoute::new(&self.yes_mint)
                    .vault(&self.vault_yes)
                    .user(&self.provider_yes),
            ),
            no: Some(
                TokenRoute::new(&self.no_mint)
                    .vault(&self.vault_no)
                    .user(&self.provider_no),
            ),
            lp: Some(TokenRoute::new(&self.lp_mint).user(&self.provider_lp)),
        }
    }

    pub fn add_liquidity(
        &mut self,
        amount_stable: u64,
        amount_yes: u64,
        amount_no: u64,
        deadline: i64,
    ) -> Result<u64> {
        let now = Clock::get()?.unix_timestamp;
        let surplus = VaultSurplus::capture(&self.market, self.vault_balances())?;

        let seed_bytes = self.market.seed.to_le_bytes();
        let bump = [self.market.bump];
        let signer_seeds: &[&[&[u8]]] = &[&[Market::SEED, &seed_bytes, &bump]];
        let mut ledger = self.ledger(signer_seeds);

        let deposit = engine::add_liquidity(
            &mut self.market,
            &mut ledger,
            amount_stable,
            amount_yes,
            amount_no,
            deadline,
            now,
        )?;

        let vaults = self.reload_vaults()?;
        surplus.verify(&self.market, vaults)?;

        emit!(LiquidityAdded {
            market: self.market.key(),
            provider: self.provider.key(),
            lp_minted: deposit.lp_minted,
            stable_in: deposit.stable_in,
            yes_in: deposit.yes_in,
            no_in: deposit.no_in,
            stable_refunded: deposit.stable_refunded,
            yes_refunded: deposit.yes_refunded,
            no_refunded: deposit.no_refunded,
            liquidity: self.market.liquidity,
        });

        Ok(deposit.lp_minted)
    }

    pub fn remove_liquidity(&mut self, lp_burn: u64, deadline: i64) -> Result<LiquidityWithdrawal> {
        let now = Clock::get()?.unix_timestamp;
        let surplus = VaultSurplus::capture(&self.market, self.vault_balances())?;

        let seed_bytes = self.market.seed.to_le_bytes();
        let bump = [self.market.bump];
        let signer_seeds: &[&[&[u8]]] = &[&[Market::SEED, &seed_bytes, &bump]];
        let mut ledger = self.ledger(signer_seeds);

        let withdrawal =
            engine::remove_liquidity(&mut self.market, &mut ledger, lp_burn, deadline, now)?;

        let vaults = self.reload_vaults()?;
        surplus.verify(&self.market, vaults)?;

        emit!(LiquidityRemoved {
            market: self.market.key(),
            provider: self.provider.key(),
            lp_burned: withdrawal.lp_burned,
            stable_out: withdrawal.stable_out,
            yes_out: withdrawal.yes_out,
            no_out: withdrawal.no_out,
            liquidity: self.market.liquidity,
        });

        Ok(withdrawal)
    }
}
