use anchor_lang::InstructionData;
use cnft_authority::{
    sdk::{
        create_allocate_largest_tree_instruction, create_allocate_tree_instruction,
        create_bind_collection_instruction,
        create_collection_instructions, create_create_tree_instruction,
        create_mint_compressed_nft_instruction,
    },
    utils::{get_asset_id, get_authority_pda, get_master_edition_pda, get_metadata_pda},
    AUTHORITY_SEED,
};
use cnft_authority_test::collection_metadata;
use cnft_tree_authority::{Authority, CollectionMetadata, ErrorKind, TreeAuthorityError, TreeConfig};
use solana_sdk::{pubkey::Pubkey, rent::Rent, system_instruction, system_program};

#[test]
fn test_authority_pda_matches_derivation() {
    let (address, bump) = get_authority_pda();
    let authority = Authority::derive(&cnft_authority::ID).unwrap();
    assert_eq!(authority.address(), address);
    assert_eq!(authority.bump(), bump);
    assert_eq!(
        Pubkey::create_program_address(&[AUTHORITY_SEED, &[bump][..]], &cnft_authority::ID).unwrap(),
        address
    );
}

#[test]
fn test_allocate_tree_instruction() {
    let payer = Pubkey::new_unique();
    let merkle_tree = Pubkey::new_unique();
    let config = TreeConfig::default();
    let rent = Rent::default();
    let lamports = config.rent_exempt_lamports(&rent).unwrap();

    let instruction =
        create_allocate_tree_instruction(&payer, &merkle_tree, &config, &rent, lamports).unwrap();
    assert_eq!(
        instruction,
        system_instruction::create_account(
            &payer,
            &merkle_tree,
            lamports,
            64504,
            &spl_account_compression::ID
        )
    );
    assert_eq!(instruction.program_id, system_program::ID);
    assert!(instruction.accounts[1].is_signer);
}

#[test]
fn test_allocate_tree_instruction_checks_funds_and_config() {
    let payer = Pubkey::new_unique();
    let merkle_tree = Pubkey::new_unique();
    let config = TreeConfig::default();
    let rent = Rent::default();
    let lamports = config.rent_exempt_lamports(&rent).unwrap();

    assert_eq!(
        create_allocate_tree_instruction(&payer, &merkle_tree, &config, &rent, lamports - 1),
        Err(TreeAuthorityError::InsufficientFunds {
            required: lamports,
            available: lamports - 1,
        })
    );
    let invalid = TreeConfig {
        canopy_depth: 14,
        ..config
    };
    let error = create_allocate_tree_instruction(&payer, &merkle_tree, &invalid, &rent, u64::MAX)
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidConfig);
}

#[test]
fn test_allocate_largest_tree_instruction() {
    let payer = Pubkey::new_unique();
    let merkle_tree = Pubkey::new_unique();
    let rent = Rent::default();
    let buffer_256 = TreeConfig::new(14, 256, 9).unwrap();
    let buffer_1024 = TreeConfig::new(14, 1024, 9).unwrap();
    let balance = buffer_1024.rent_exempt_lamports(&rent).unwrap() - 1;

    let (config, instruction) =
        create_allocate_largest_tree_instruction(&payer, &merkle_tree, 14, 9, &rent, balance)
            .unwrap();
    assert_eq!(config, buffer_256);
    assert_eq!(
        instruction,
        create_allocate_tree_instruction(&payer, &merkle_tree, &buffer_256, &rent, balance)
            .unwrap()
    );

    let error =
        create_allocate_largest_tree_instruction(&payer, &merkle_tree, 14, 9, &rent, 1).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InsufficientFunds);
}

#[test]
fn test_create_tree_instruction() {
    let payer = Pubkey::new_unique();
    let merkle_tree = Pubkey::new_unique();
    let config = TreeConfig::default();
    let instruction = create_create_tree_instruction(&payer, &merkle_tree, &config);

    assert_eq!(instruction.program_id, cnft_authority::ID);
    assert_eq!(
        instruction.data,
        cnft_authority::instruction::CreateTree {
            max_depth: 14,
            max_buffer_size: 64,
        }
        .data()
    );
    let keys = instruction
        .accounts
        .iter()
        .map(|meta| meta.pubkey)
        .collect::<Vec<_>>();
    assert_eq!(keys[0], payer);
    assert!(instruction.accounts[0].is_signer);
    assert_eq!(keys[1], get_authority_pda().0);
    // The authority signs through the program only.
    assert!(!instruction.accounts[1].is_signer);
    assert_eq!(
        keys[2],
        mpl_bubblegum::accounts::TreeConfig::find_pda(&merkle_tree).0
    );
    assert_eq!(keys[3], merkle_tree);
    assert!(instruction.accounts[3].is_writable);
    assert!(keys.contains(&mpl_bubblegum::ID));
    assert!(keys.contains(&spl_account_compression::ID));
}

#[test]
fn test_bind_collection_instruction() {
    let update_authority = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let instruction = create_bind_collection_instruction(&update_authority, &mint);
    assert_eq!(instruction.accounts[0].pubkey, update_authority);
    assert!(instruction.accounts[0].is_signer);
    assert_eq!(instruction.accounts[1].pubkey, get_authority_pda().0);
    assert_eq!(instruction.accounts[2].pubkey, mint);
    assert_eq!(instruction.accounts[3].pubkey, get_metadata_pda(&mint));
    assert!(instruction.accounts[3].is_writable);
    assert_eq!(
        instruction.data,
        cnft_authority::instruction::BindCollection {}.data()
    );
}

#[test]
fn test_mint_instruction_leaf_owner() {
    let payer = Pubkey::new_unique();
    let merkle_tree = Pubkey::new_unique();
    let mint = Pubkey::new_unique();

    // Absent optional accounts are passed as the program id.
    let instruction = create_mint_compressed_nft_instruction(&payer, &merkle_tree, &mint, None);
    assert_eq!(instruction.accounts[4].pubkey, cnft_authority::ID);

    let owner = Pubkey::new_unique();
    let instruction =
        create_mint_compressed_nft_instruction(&payer, &merkle_tree, &mint, Some(owner));
    assert_eq!(instruction.accounts[4].pubkey, owner);
    let keys = instruction
        .accounts
        .iter()
        .map(|meta| meta.pubkey)
        .collect::<Vec<_>>();
    assert!(keys.contains(&get_metadata_pda(&mint)));
    assert!(keys.contains(&get_master_edition_pda(&mint)));
    assert_eq!(
        instruction.data,
        cnft_authority::instruction::MintCompressedNft {}.data()
    );
}

#[test]
fn test_asset_id_matches_bubblegum() {
    let merkle_tree = Pubkey::new_unique();
    for leaf_index in [0, 1, 16383] {
        assert_eq!(
            get_asset_id(&merkle_tree, leaf_index),
            mpl_bubblegum::utils::get_asset_id(&merkle_tree, leaf_index)
        );
    }
}

#[test]
fn test_metadata_pdas_match_token_metadata() {
    let mint = Pubkey::new_unique();
    assert_eq!(
        get_metadata_pda(&mint),
        mpl_token_metadata::accounts::Metadata::find_pda(&mint).0
    );
    assert_eq!(
        get_master_edition_pda(&mint),
        mpl_token_metadata::accounts::MasterEdition::find_pda(&mint).0
    );
}

#[test]
fn test_collection_instructions() {
    let payer = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let [create, mint_token] =
        create_collection_instructions(&payer, &mint, &collection_metadata()).unwrap();
    assert_eq!(create.program_id, mpl_token_metadata::ID);
    assert_eq!(mint_token.program_id, mpl_token_metadata::ID);
    assert!(create
        .accounts
        .iter()
        .any(|meta| meta.pubkey == mint && meta.is_signer));

    let metadata = CollectionMetadata {
        name: String::new(),
        ..collection_metadata()
    };
    let error = create_collection_instructions(&payer, &mint, &metadata).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidMetadata);
}
