//! SPL token plumbing behind [`TokenLedger`]
//!
//! Every instruction that moves tokens builds an [`SplLedger`] from its own
//! accounts. Routes an instruction does not carry stay `None`, and a request
//! that needs one fails with `TransferFailed`.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, mint_to, transfer_checked, Burn, Mint, MintTo, TokenAccount, TransferChecked,
};

use crate::engine::{Asset, Holder, ShareToken, TokenLedger};
use crate::error::MarketError;
use crate::state::{Market, Outcome};

/// One mint with the market vault and caller account used for it
#[derive(Clone)]
pub struct TokenRoute<'info> {
    pub mint: AccountInfo<'info>,
    pub decimals: u8,
    pub vault: Option<AccountInfo<'info>>,
    pub user: Option<AccountInfo<'info>>,
}

impl<'info> TokenRoute<'info> {
    pub fn new(mint: &InterfaceAccount<'info, Mint>) -> Self {
        Self {
            mint: mint.to_account_info(),
            decimals: mint.decimals,
            vault: None,
            user: None,
        }
    }

    pub fn vault(mut self, account: &InterfaceAccount<'info, TokenAccount>) -> Self {
        self.vault = Some(account.to_account_info());
        self
    }

    pub fn user(mut self, account: &InterfaceAccount<'info, TokenAccount>) -> Self {
        self.user = Some(account.to_account_info());
        self
    }

    fn holder(&self, holder: Holder) -> Result<AccountInfo<'info>> {
        let account = match holder {
            Holder::Vault => self.vault.clone(),
            Holder::Caller => self.user.clone(),
        };
        account.ok_or_else(|| {
            msg!("No {:?} token account supplied for mint {}", holder, self.mint.key);
            error!(MarketError::TransferFailed)
        })
    }
}

/// [`TokenLedger`] backed by token-interface CPIs; the market PDA signs for
/// vaults and mints.
pub struct SplLedger<'a, 'info> {
    pub token_program: AccountInfo<'info>,
    pub market: AccountInfo<'info>,
    pub user: AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
    pub stable: Option<TokenRoute<'info>>,
    pub yes: Option<TokenRoute<'info>>,
    pub no: Option<TokenRoute<'info>>,
    pub lp: Option<TokenRoute<'info>>,
}

impl<'a, 'info> SplLedger<'a, 'info> {
    fn asset_route(&self, asset: Asset) -> Result<&TokenRoute<'info>> {
        let route = match asset {
            Asset::Stable => self.stable.as_ref(),
            Asset::Yes => self.yes.as_ref(),
            Asset::No => self.no.as_ref(),
        };
        route.ok_or_else(|| {
            msg!("No {:?} route supplied", asset);
            error!(MarketError::TransferFailed)
        })
    }

    fn share_route(&self, token: ShareToken) -> Result<&TokenRoute<'info>> {
        match token {
            ShareToken::Outcome(Outcome::Yes) => self.asset_route(Asset::Yes),
            ShareToken::Outcome(Outcome::No) => self.asset_route(Asset::No),
            ShareToken::Lp => self.lp.as_ref().ok_or_else(|| {
                msg!("No LP route supplied");
                error!(MarketError::TransferFailed)
            }),
        }
    }
}

impl<'a, 'info> TokenLedger for SplLedger<'a, 'info> {
    fn transfer_in(&mut self, asset: Asset, amount: u64) -> Result<()> {
        let route = self.asset_route(asset)?;
        transfer_checked(
            CpiContext::new(
                self.token_program.clone(),
                TransferChecked {
                    from: route.holder(Holder::Caller)?,
                    mint: route.mint.clone(),
                    to: route.holder(Holder::Vault)?,
                    authority: self.user.clone(),
                },
            ),
            amount,
            route.decimals,
        )
    }

    fn transfer_out(&mut self, asset: Asset, amount: u64) -> Result<()> {
        let route = self.asset_route(asset)?;
        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                TransferChecked {
                    from: route.holder(Holder::Vault)?,
                    mint: route.mint.clone(),
                    to: route.holder(Holder::Caller)?,
                    authority: self.market.clone(),
                },
                self.signer_seeds,
            ),
            amount,
            route.decimals,
        )
    }

    fn mint(&mut self, token: ShareToken, holder: Holder, amount: u64) -> Result<()> {
        let route = self.share_route(token)?;
        mint_to(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                MintTo {
                    mint: route.mint.clone(),
                    to: route.holder(holder)?,
                    authority: self.market.clone(),
                },
                self.signer_seeds,
            ),
            amount,
        )
    }

    fn burn(&mut self, token: ShareToken, holder: Holder, amount: u64) -> Result<()> {
        let route = self.share_route(token)?;
        let accounts = Burn {
            mint: route.mint.clone(),
            from: route.holder(holder)?,
            authority: match holder {
                Holder::Vault => self.market.clone(),
                Holder::Caller => self.user.clone(),
            },
        };

        match holder {
            Holder::Vault => burn(
                CpiContext::new_with_signer(self.token_program.clone(), accounts, self.signer_seeds),
                amount,
            ),
            Holder::Caller => burn(CpiContext::new(self.token_program.clone(), accounts), amount),
        }
    }
}

/// Vault balances as read from the token accounts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VaultBalances {
    pub stable: u64,
    pub yes: u64,
    pub no: u64,
}

/// Tokens sitting in the vaults beyond the recorded reserves
///
/// Anyone can send tokens to a vault, so a surplus is tolerated, but the
/// instruction's own transfers must move vaults and reserves in lockstep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultSurplus(VaultBalances);

impl VaultSurplus {
    pub fn capture(market: &Market, vaults: VaultBalances) -> Result<Self> {
        Ok(Self(VaultBalances {
            stable: surplus("stable", vaults.stable, market.reserve_stable)?,
            yes: surplus("YES", vaults.yes, market.reserve_yes)?,
            no: surplus("NO", vaults.no, market.reserve_no)?,
        }))
    }

    /// Re-read after the instruction ran; the surplus must not have moved.
    pub fn verify(&self, market: &Market, vaults: VaultBalances) -> Result<()> {
        let after = Self::capture(market, vaults)?;
        if after != *self {
            msg!(
                "FATAL: vault surplus moved from {:?} to {:?}",
                self.0,
                after.0
            );
            return err!(MarketError::VaultBalanceMismatch);
        }
        Ok(())
    }
}

fn surplus(label: &str, vault: u64, reserve: u64) -> Result<u64> {
    vault.checked_sub(reserve).ok_or_else(|| {
        msg!(
            "FATAL: {} vault holds {} but reserve records {}",
            label,
            vault,
            reserve
        );
        error!(MarketError::VaultBalanceMismatch)
    })
}
