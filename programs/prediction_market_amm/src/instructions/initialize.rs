//! Market Initialization
//!
//! Creates the market record, its YES/NO/LP mints and the three vaults in one
//! instruction. Every address is derived from the caller's `seed`:
//!
//! ```text
//!   market   = PDA["market",   seed]
//!   yes_mint = PDA["yes_mint", seed]     authority: market
//!   no_mint  = PDA["no_mint",  seed]     authority: market
//!   lp_mint  = PDA["lp_mint",  seed]     authority: market
//!   vaults   = ATA(market, {stable, yes, no})
//! ```
//!
//! The pool stays empty until the first `add_liquidity`.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::constants::{SEED_LP_MINT, SEED_NO_MINT, SEED_YES_MINT};
use crate::controller::{self, MarketMints, MarketParams};
use crate::state::Market;

/// Event emitted when a market is opened
#[event]
pub struct MarketInitialized {
    pub market: Pubkey,
    pub seed: u64,
    pub authority: Pubkey,
    pub stable_mint: Pubkey,
    pub fee_bps: u16,
    pub end_time: i64,
    pub timestamp: i64,
}

#[derive(Accounts)]
#[instruction(seed: u64)]
pub struct Initialize<'info> {
    /// Market authority, pays for every created account
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + Market::INIT_SPACE,
        seeds = [Market::SEED, seed.to_le_bytes().as_ref()],
        bump,
    )]
    pub market: Box<Account<'info, Market>>,

    /// Reference asset (e.g., USDC)
    #[account(mint::token_program = token_program)]
    pub stable_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        seeds = [SEED_YES_MINT, seed.to_le_bytes().as_ref()],
        bump,
        mint::decimals = stable_mint.decimals,
        mint::authority = market,
        mint::token_program = token_program,
    )]
    pub yes_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        seeds = [SEED_NO_MINT, seed.to_le_bytes().as_ref()],
        bump,
        mint::decimals = stable_mint.decimals,
        mint::authority = market,
        mint::token_program = token_program,
    )]
    pub no_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        seeds = [SEED_LP_MINT, seed.to_le_bytes().as_ref()],
        bump,
        mint::decimals = stable_mint.decimals,
        mint::authority = market,
        mint::token_program = token_program,
    )]
    pub lp_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        associated_token::mint = stable_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub vault_stable: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = authority,
        associated_token::mint = yes_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub vault_yes: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = authority,
        associated_token::mint = no_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub vault_no: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    pub fn initialize(
        &mut self,
        seed: u64,
        name: String,
        fee_bps: u16,
        end_time: i64,
        bumps: &InitializeBumps,
    ) -> Result<Pubkey> {
        let now = Clock::get()?.unix_timestamp;

        controller::initialize(
            &mut self.market,
            self.authority.key(),
            MarketMints {
                stable: self.stable_mint.key(),
                yes: self.yes_mint.key(),
                no: self.no_mint.key(),
                lp: self.lp_mint.key(),
            },
            MarketParams {
                seed,
                name,
                fee_bps,
                end_time,
            },
            bumps.market,
            now,
        )?;

        emit!(MarketInitialized {
            market: self.market.key(),
            seed,
            authority: self.authority.key(),
            stable_mint: self.stable_mint.key(),
            fee_bps,
            end_time,
            timestamp: now,
        });

        Ok(self.market.key())
    }
}
