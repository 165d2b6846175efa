#![cfg(not(target_os = "solana"))]
use anchor_lang::{system_program, Id, InstructionData, ToAccountMetas};
use anchor_spl::{associated_token::get_associated_token_address, metadata::Metadata, token};
use cnft_tree_authority::{CollectionMetadata, TreeAuthorityError, TreeConfig};
use mpl_token_metadata::{
    instructions::{CreateV1Builder, MintV1Builder},
    types::{CollectionDetails, PrintSupply, TokenStandard},
};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, rent::Rent, system_instruction};
use spl_account_compression::Noop;

use crate::utils::{
    get_authority_pda, get_bubblegum_signer_pda, get_master_edition_pda, get_metadata_pda,
    get_tree_config_pda,
};

/// Allocates the tree account. Trees outgrow what a program may allocate
/// through a cpi, so the client creates the account at the top level of the
/// transaction and the merkle tree keypair signs.
pub fn create_allocate_tree_instruction(
    payer: &Pubkey,
    merkle_tree: &Pubkey,
    config: &TreeConfig,
    rent: &Rent,
    payer_balance: u64,
) -> Result<Instruction, TreeAuthorityError> {
    config.validate()?;
    let lamports = config.rent_exempt_lamports(rent)?;
    if payer_balance < lamports {
        return Err(TreeAuthorityError::InsufficientFunds {
            required: lamports,
            available: payer_balance,
        });
    }
    Ok(system_instruction::create_account(
        payer,
        merkle_tree,
        lamports,
        config.account_size()? as u64,
        &spl_account_compression::ID,
    ))
}

/// Allocates a tree of `max_depth` with the largest buffer `payer_balance`
/// can fund, for trees that take many concurrent mints.
pub fn create_allocate_largest_tree_instruction(
    payer: &Pubkey,
    merkle_tree: &Pubkey,
    max_depth: u32,
    canopy_depth: u32,
    rent: &Rent,
    payer_balance: u64,
) -> Result<(TreeConfig, Instruction), TreeAuthorityError> {
    let config = TreeConfig::with_largest_buffer(max_depth, canopy_depth, rent, payer_balance)?;
    let instruction =
        create_allocate_tree_instruction(payer, merkle_tree, &config, rent, payer_balance)?;
    Ok((config, instruction))
}

pub fn create_create_tree_instruction(
    payer: &Pubkey,
    merkle_tree: &Pubkey,
    config: &TreeConfig,
) -> Instruction {
    let accounts = crate::accounts::CreateTree {
        payer: *payer,
        authority: get_authority_pda().0,
        tree_authority: get_tree_config_pda(merkle_tree),
        merkle_tree: *merkle_tree,
        log_wrapper: Noop::id(),
        system_program: system_program::ID,
        bubblegum_program: mpl_bubblegum::ID,
        compression_program: spl_account_compression::ID,
    };
    let instruction_data = crate::instruction::CreateTree {
        max_depth: config.max_depth,
        max_buffer_size: config.max_buffer_size,
    };
    Instruction {
        program_id: crate::ID,
        accounts: accounts.to_account_metas(Some(true)),
        data: instruction_data.data(),
    }
}

pub fn create_bind_collection_instruction(
    update_authority: &Pubkey,
    collection_mint: &Pubkey,
) -> Instruction {
    let accounts = crate::accounts::BindCollection {
        update_authority: *update_authority,
        authority: get_authority_pda().0,
        collection_mint: *collection_mint,
        collection_metadata: get_metadata_pda(collection_mint),
        token_metadata_program: Metadata::id(),
    };
    Instruction {
        program_id: crate::ID,
        accounts: accounts.to_account_metas(Some(true)),
        data: crate::instruction::BindCollection {}.data(),
    }
}

/// Mint instruction, the asset goes to `leaf_owner` or the payer.
pub fn create_mint_compressed_nft_instruction(
    payer: &Pubkey,
    merkle_tree: &Pubkey,
    collection_mint: &Pubkey,
    leaf_owner: Option<Pubkey>,
) -> Instruction {
    let accounts = crate::accounts::MintCompressedNft {
        payer: *payer,
        authority: get_authority_pda().0,
        tree_authority: get_tree_config_pda(merkle_tree),
        merkle_tree: *merkle_tree,
        leaf_owner,
        bubblegum_signer: get_bubblegum_signer_pda(),
        log_wrapper: Noop::id(),
        compression_program: spl_account_compression::ID,
        bubblegum_program: mpl_bubblegum::ID,
        token_metadata_program: Metadata::id(),
        system_program: system_program::ID,
        collection_mint: *collection_mint,
        collection_metadata: get_metadata_pda(collection_mint),
        edition_account: get_master_edition_pda(collection_mint),
    };
    Instruction {
        program_id: crate::ID,
        accounts: accounts.to_account_metas(Some(true)),
        data: crate::instruction::MintCompressedNft {}.data(),
    }
}

/// Creates a sized collection nft owned by `payer` and mints its single
/// token to the payer. The mint keypair signs.
pub fn create_collection_instructions(
    payer: &Pubkey,
    collection_mint: &Pubkey,
    metadata: &CollectionMetadata,
) -> Result<[Instruction; 2], TreeAuthorityError> {
    metadata.validate()?;
    let metadata_account = get_metadata_pda(collection_mint);
    let master_edition = get_master_edition_pda(collection_mint);
    let create = CreateV1Builder::new()
        .metadata(metadata_account)
        .master_edition(Some(master_edition))
        .mint(*collection_mint, true)
        .authority(*payer)
        .payer(*payer)
        .update_authority(*payer, true)
        .spl_token_program(Some(token::ID))
        .name(metadata.name.clone())
        .symbol(metadata.symbol.clone())
        .uri(metadata.uri.clone())
        .seller_fee_basis_points(0)
        .is_mutable(true)
        .token_standard(TokenStandard::NonFungible)
        .collection_details(CollectionDetails::V1 { size: 0 })
        .print_supply(PrintSupply::Zero)
        .instruction();
    let mint = MintV1Builder::new()
        .token(get_associated_token_address(payer, collection_mint))
        .token_owner(Some(*payer))
        .metadata(metadata_account)
        .master_edition(Some(master_edition))
        .mint(*collection_mint)
        .authority(*payer)
        .payer(*payer)
        .amount(1)
        .instruction();
    Ok([create, mint])
}
