use anchor_lang::prelude::*;
use anchor_spl::{
    metadata::{update_metadata_accounts_v2, Metadata, MetadataAccount, UpdateMetadataAccountsV2},
    token::Mint,
};
use cnft_tree_authority::{
    checks::{check_rebind, RebindAction},
    Authority,
};

use crate::{errors::to_anchor_error, state::read_collection_state, AUTHORITY_SEED};

#[derive(Accounts)]
pub struct BindCollection<'info> {
    /// Current update authority of the collection.
    pub update_authority: Signer<'info>,
    /// CHECK: (seed constraints) becomes the update authority.
    #[account(seeds = [AUTHORITY_SEED], bump)]
    pub authority: UncheckedAccount<'info>,
    pub collection_mint: Account<'info, Mint>,
    #[account(mut, constraint = collection_metadata.mint == collection_mint.key())]
    pub collection_metadata: Account<'info, MetadataAccount>,
    pub token_metadata_program: Program<'info, Metadata>,
}

pub fn process_bind_collection(ctx: Context<BindCollection>) -> Result<()> {
    let authority = Authority::from_bump(&crate::ID, ctx.bumps.authority).map_err(to_anchor_error)?;
    let collection_mint = ctx.accounts.collection_mint.key();
    let state = read_collection_state(&collection_mint, &ctx.accounts.collection_metadata);
    let caller = ctx.accounts.update_authority.key();

    match check_rebind(&authority, &state, &caller, &authority.address())
        .map_err(to_anchor_error)?
    {
        RebindAction::AlreadyBound => {
            msg!("collection {} is already bound", collection_mint);
            Ok(())
        }
        RebindAction::Transfer => {
            let cpi_ctx = CpiContext::new(
                ctx.accounts.token_metadata_program.to_account_info(),
                UpdateMetadataAccountsV2 {
                    metadata: ctx.accounts.collection_metadata.to_account_info(),
                    update_authority: ctx.accounts.update_authority.to_account_info(),
                },
            );
            update_metadata_accounts_v2(cpi_ctx, Some(authority.address()), None, None, None)?;
            msg!(
                "collection {} update authority {} -> {}",
                collection_mint,
                caller,
                authority.address()
            );
            Ok(())
        }
    }
}
