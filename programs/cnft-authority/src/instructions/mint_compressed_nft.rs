use anchor_lang::prelude::*;
use anchor_spl::{
    metadata::{Metadata, MetadataAccount},
    token::Mint,
};
use cnft_tree_authority::{checks::check_mint, state::get_asset_id, Authority, TreeHandle};
use mpl_bubblegum::{
    instructions::{
        MintToCollectionV1Cpi, MintToCollectionV1CpiAccounts, MintToCollectionV1InstructionArgs,
    },
    types::{Collection, Creator, MetadataArgs, TokenProgramVersion, TokenStandard},
};
use spl_account_compression::{program::SplAccountCompression, Noop};

use crate::{
    errors::to_anchor_error,
    state::{read_collection_state, read_num_minted, read_tree_state},
    AUTHORITY_SEED, BUBBLEGUM_SIGNER_SEED,
};

#[derive(Accounts)]
pub struct MintCompressedNft<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    /// CHECK: (seed constraints) tree creator and collection authority.
    #[account(seeds = [AUTHORITY_SEED], bump)]
    pub authority: UncheckedAccount<'info>,
    /// CHECK: (bubblegum program) tree config.
    #[account(
        mut,
        seeds = [merkle_tree.key().as_ref()],
        bump,
        seeds::program = bubblegum_program.key()
    )]
    pub tree_authority: UncheckedAccount<'info>,
    /// CHECK: (account compression program).
    #[account(mut)]
    pub merkle_tree: UncheckedAccount<'info>,
    /// CHECK: receives the asset, defaults to the payer.
    pub leaf_owner: Option<UncheckedAccount<'info>>,
    /// CHECK: (seed constraints) bubblegum signer for collection cpis.
    #[account(
        seeds = [BUBBLEGUM_SIGNER_SEED],
        seeds::program = bubblegum_program.key(),
        bump,
    )]
    pub bubblegum_signer: UncheckedAccount<'info>,
    pub log_wrapper: Program<'info, Noop>,
    pub compression_program: Program<'info, SplAccountCompression>,
    /// CHECK: (address constraint).
    #[account(address = mpl_bubblegum::ID)]
    pub bubblegum_program: UncheckedAccount<'info>,
    pub token_metadata_program: Program<'info, Metadata>,
    pub system_program: Program<'info, System>,
    pub collection_mint: Account<'info, Mint>,
    #[account(mut, constraint = collection_metadata.mint == collection_mint.key())]
    pub collection_metadata: Account<'info, MetadataAccount>,
    /// CHECK: (token metadata program) verified by bubblegum.
    pub edition_account: UncheckedAccount<'info>,
}

pub fn process_mint_compressed_nft(ctx: Context<MintCompressedNft>) -> Result<Pubkey> {
    let authority = Authority::from_bump(&crate::ID, ctx.bumps.authority).map_err(to_anchor_error)?;
    let signer_seeds = authority.signer_seeds();
    let tree = TreeHandle {
        merkle_tree: ctx.accounts.merkle_tree.key(),
        tree_authority: ctx.accounts.tree_authority.key(),
    };
    let collection_mint = ctx.accounts.collection_mint.key();

    let merkle_tree = &ctx.accounts.merkle_tree.to_account_info();
    let tree_config = &ctx.accounts.tree_authority.to_account_info();
    let tree_state = read_tree_state(merkle_tree, tree_config, None).map_err(to_anchor_error)?;
    let collection = read_collection_state(&collection_mint, &ctx.accounts.collection_metadata);
    let plan = check_mint(&authority, &signer_seeds, &tree, &tree_state, &collection)
        .map_err(to_anchor_error)?;

    // The compressed nft carries the collection's metadata.
    let metadata = MetadataArgs {
        name: collection.metadata.name,
        symbol: collection.metadata.symbol,
        uri: collection.metadata.uri,
        seller_fee_basis_points: 0,
        primary_sale_happened: true,
        is_mutable: true,
        edition_nonce: None,
        token_standard: Some(TokenStandard::NonFungible),
        // Bubblegum verifies the collection.
        collection: Some(Collection {
            verified: false,
            key: collection_mint,
        }),
        uses: None,
        token_program_version: TokenProgramVersion::Original,
        creators: vec![Creator {
            address: authority.address(),
            verified: true,
            share: 100,
        }],
    };

    let payer = &ctx.accounts.payer.to_account_info();
    let leaf_owner = &match &ctx.accounts.leaf_owner {
        Some(leaf_owner) => leaf_owner.to_account_info(),
        None => ctx.accounts.payer.to_account_info(),
    };
    let pda = &ctx.accounts.authority.to_account_info();
    let bubblegum_program = &ctx.accounts.bubblegum_program.to_account_info();
    let collection_mint_info = &ctx.accounts.collection_mint.to_account_info();
    let collection_metadata = &ctx.accounts.collection_metadata.to_account_info();
    let collection_edition = &ctx.accounts.edition_account.to_account_info();
    let bubblegum_signer = &ctx.accounts.bubblegum_signer.to_account_info();
    let log_wrapper = &ctx.accounts.log_wrapper.to_account_info();
    let compression_program = &ctx.accounts.compression_program.to_account_info();
    let token_metadata_program = &ctx.accounts.token_metadata_program.to_account_info();
    let system_program = &ctx.accounts.system_program.to_account_info();

    let seeds = signer_seeds.seeds();
    MintToCollectionV1Cpi::new(
        bubblegum_program,
        MintToCollectionV1CpiAccounts {
            tree_config,
            leaf_owner,
            leaf_delegate: leaf_owner,
            merkle_tree,
            payer,
            tree_creator_or_delegate: pda,
            collection_authority: pda,
            // The collection authority is the update authority, no record.
            collection_authority_record_pda: Some(bubblegum_program),
            collection_mint: collection_mint_info,
            collection_metadata,
            collection_edition,
            bubblegum_signer,
            log_wrapper,
            compression_program,
            token_metadata_program,
            system_program,
        },
        MintToCollectionV1InstructionArgs { metadata },
    )
    .invoke_signed(&[&seeds[..]])?;

    // Bubblegum counted this mint, its leaf index is the previous count.
    let leaf_index = read_num_minted(tree_config)?
        .checked_sub(1)
        .ok_or(ProgramError::InvalidAccountData)?;
    let asset_id = get_asset_id(&mpl_bubblegum::ID, &tree.merkle_tree, leaf_index);
    msg!(
        "minted asset {} leaf {} of tree {} ({} remaining before mint)",
        asset_id,
        leaf_index,
        tree.merkle_tree,
        plan.remaining
    );
    Ok(asset_id)
}
