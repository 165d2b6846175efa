#![cfg(feature = "test-sbf")]

use anchor_lang::{AccountDeserialize, AnchorDeserialize, Id};
use anchor_spl::metadata::MetadataAccount;
use cnft_authority::{
    errors::CnftAuthorityError,
    sdk::{
        create_allocate_tree_instruction, create_bind_collection_instruction,
        create_collection_instructions, create_create_tree_instruction,
        create_mint_compressed_nft_instruction,
    },
    state::read_tree_header,
    utils::{get_asset_id, get_authority_pda, get_metadata_pda, get_tree_config_pda},
};
use cnft_authority_test::{collection_metadata, init_logger};
use cnft_tree_authority::TreeConfig;
use serial_test::serial;
use solana_program_test::{BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::{Transaction, TransactionError},
};

async fn setup_test_programs() -> ProgramTestContext {
    init_logger();
    let mut program_test = ProgramTest::new("cnft_authority", cnft_authority::ID, None);
    program_test.add_program("bubblegum", mpl_bubblegum::ID, None);
    program_test.add_program("spl_account_compression", spl_account_compression::ID, None);
    program_test.add_program("spl_noop", spl_account_compression::Noop::id(), None);
    program_test.add_program("mpl_token_metadata", mpl_token_metadata::ID, None);
    program_test.set_compute_max_units(1_400_000u64);
    program_test.start_with_context().await
}

async fn process(
    context: &mut ProgramTestContext,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let mut all_signers = vec![&context.payer];
    all_signers.extend_from_slice(signers);
    let blockhash = context.banks_client.get_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        instructions,
        Some(&context.payer.pubkey()),
        &all_signers,
        blockhash,
    );
    context.banks_client.process_transaction(transaction).await
}

fn assert_transaction_error(
    result: Result<(), BanksClientError>,
    index: u8,
    expected_error_code: u32,
) {
    match result {
        Err(BanksClientError::TransactionError(TransactionError::InstructionError(
            i,
            InstructionError::Custom(error_code),
        ))) if i == index => assert_eq!(error_code, expected_error_code),
        result => panic!("Expected error code {}, got {:?}", expected_error_code, result),
    }
}

async fn create_collection(context: &mut ProgramTestContext) -> Pubkey {
    let mint = Keypair::new();
    let payer = context.payer.pubkey();
    let instructions =
        create_collection_instructions(&payer, &mint.pubkey(), &collection_metadata()).unwrap();
    process(context, &instructions, &[&mint]).await.unwrap();
    mint.pubkey()
}

async fn allocate_tree(context: &mut ProgramTestContext, config: &TreeConfig) -> Pubkey {
    let merkle_tree = Keypair::new();
    let payer = context.payer.pubkey();
    let rent = context.banks_client.get_rent().await.unwrap();
    let balance = context.banks_client.get_balance(payer).await.unwrap();
    let instruction =
        create_allocate_tree_instruction(&payer, &merkle_tree.pubkey(), config, &rent, balance)
            .unwrap();
    process(context, &[instruction], &[&merkle_tree])
        .await
        .unwrap();
    merkle_tree.pubkey()
}

async fn tree_config(
    context: &mut ProgramTestContext,
    merkle_tree: &Pubkey,
) -> mpl_bubblegum::accounts::TreeConfig {
    let account = context
        .banks_client
        .get_account(get_tree_config_pda(merkle_tree))
        .await
        .unwrap()
        .unwrap();
    mpl_bubblegum::accounts::TreeConfig::from_bytes(&account.data).unwrap()
}

/// Tests:
/// 1. mint before the collection is bound fails with NotReady
/// 2. bind the collection, binding again is a no-op
/// 3. create the tree, creating it again is a no-op
/// 4. two mints land on leaves 0 and 1
#[serial]
#[tokio::test]
async fn test_create_bind_and_mint() {
    let mut context = setup_test_programs().await;
    let payer = context.payer.pubkey();
    let config = TreeConfig::default();
    let collection_mint = create_collection(&mut context).await;
    let merkle_tree = allocate_tree(&mut context, &config).await;

    let create_tree = create_create_tree_instruction(&payer, &merkle_tree, &config);
    process(&mut context, &[create_tree.clone()], &[])
        .await
        .unwrap();
    let record = tree_config(&mut context, &merkle_tree).await;
    assert_eq!(record.tree_creator, get_authority_pda().0);
    assert_eq!(record.tree_delegate, get_authority_pda().0);
    assert_eq!(record.total_mint_capacity, config.capacity());
    assert!(!record.is_public);

    let account = context
        .banks_client
        .get_account(merkle_tree)
        .await
        .unwrap()
        .unwrap();
    let header = read_tree_header(&account.data).unwrap();
    assert_eq!(header.get_max_depth(), 14);
    assert_eq!(header.get_max_buffer_size(), 64);
    assert!(header
        .assert_valid_authority(&get_tree_config_pda(&merkle_tree))
        .is_ok());
    assert_eq!(
        TreeConfig::from_account_size(14, 64, account.data.len()).unwrap(),
        config
    );

    let mint = create_mint_compressed_nft_instruction(&payer, &merkle_tree, &collection_mint, None);
    assert_transaction_error(
        process(&mut context, &[mint.clone()], &[]).await,
        0,
        CnftAuthorityError::NotReady.into(),
    );

    let bind = create_bind_collection_instruction(&payer, &collection_mint);
    process(&mut context, &[bind.clone()], &[]).await.unwrap();
    let metadata_account = context
        .banks_client
        .get_account(get_metadata_pda(&collection_mint))
        .await
        .unwrap()
        .unwrap();
    let metadata = MetadataAccount::try_deserialize(&mut metadata_account.data.as_slice()).unwrap();
    assert_eq!(metadata.update_authority, get_authority_pda().0);

    // Both are idempotent, a fresh blockhash keeps the transactions distinct.
    context.warp_to_slot(10).unwrap();
    process(&mut context, &[bind], &[]).await.unwrap();
    process(&mut context, &[create_tree], &[]).await.unwrap();

    process(&mut context, &[mint.clone()], &[]).await.unwrap();
    assert_eq!(tree_config(&mut context, &merkle_tree).await.num_minted, 1);

    let owner = Keypair::new().pubkey();
    let mint_to_owner =
        create_mint_compressed_nft_instruction(&payer, &merkle_tree, &collection_mint, Some(owner));
    let blockhash = context.banks_client.get_latest_blockhash().await.unwrap();
    let transaction = Transaction::new_signed_with_payer(
        &[mint_to_owner.clone()],
        Some(&payer),
        &[&context.payer],
        blockhash,
    );
    let result = context
        .banks_client
        .simulate_transaction(transaction)
        .await
        .unwrap();
    let return_data = result
        .simulation_details
        .unwrap()
        .return_data
        .unwrap()
        .data;
    assert_eq!(
        Pubkey::try_from_slice(&return_data).unwrap(),
        get_asset_id(&merkle_tree, 1)
    );
    process(&mut context, &[mint_to_owner], &[]).await.unwrap();
    assert_eq!(tree_config(&mut context, &merkle_tree).await.num_minted, 2);
}

#[serial]
#[tokio::test]
async fn test_bind_collection_by_stranger() {
    let mut context = setup_test_programs().await;
    let collection_mint = create_collection(&mut context).await;
    let stranger = Keypair::new();
    let bind = create_bind_collection_instruction(&stranger.pubkey(), &collection_mint);
    assert_transaction_error(
        process(&mut context, &[bind], &[&stranger]).await,
        0,
        CnftAuthorityError::Unauthorized.into(),
    );
}

#[serial]
#[tokio::test]
async fn test_create_tree_with_mismatched_config() {
    let mut context = setup_test_programs().await;
    let payer = context.payer.pubkey();
    let merkle_tree = allocate_tree(&mut context, &TreeConfig::default()).await;

    // The account was sized for a buffer of 64.
    let config = TreeConfig {
        max_buffer_size: 256,
        ..TreeConfig::default()
    };
    let create_tree = create_create_tree_instruction(&payer, &merkle_tree, &config);
    assert_transaction_error(
        process(&mut context, &[create_tree], &[]).await,
        0,
        CnftAuthorityError::InvalidConfig.into(),
    );
}

#[serial]
#[tokio::test]
async fn test_mint_into_unallocated_tree() {
    let mut context = setup_test_programs().await;
    let payer = context.payer.pubkey();
    let collection_mint = create_collection(&mut context).await;
    let bind = create_bind_collection_instruction(&payer, &collection_mint);
    process(&mut context, &[bind], &[]).await.unwrap();

    let mint = create_mint_compressed_nft_instruction(
        &payer,
        &Keypair::new().pubkey(),
        &collection_mint,
        None,
    );
    assert_transaction_error(
        process(&mut context, &[mint], &[]).await,
        0,
        CnftAuthorityError::NotReady.into(),
    );
}
