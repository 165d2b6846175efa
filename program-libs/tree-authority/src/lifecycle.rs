use log::{debug, info};
use solana_program::pubkey::Pubkey;

use crate::{
    authority::{Authority, SignerSeeds},
    checks::{check_initialize, InitializeAction},
    error::TreeAuthorityError,
    interface::CompressionProgram,
    state::{TreeHandle, TreeState},
    tree_config::TreeConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializeOutcome {
    Initialized,
    AlreadyInitialized,
}

/// Allocates a tree account. The config is validated before anything is
/// submitted.
pub fn allocate_tree<P: CompressionProgram>(
    program: &mut P,
    payer: &Pubkey,
    merkle_tree: &Pubkey,
    config: TreeConfig,
) -> Result<TreeHandle, TreeAuthorityError> {
    config.validate()?;
    let tree = program.allocate(payer, merkle_tree, &config)?;
    debug!(
        "allocated tree {} depth {} buffer {} canopy {}",
        merkle_tree, config.max_depth, config.max_buffer_size, config.canopy_depth
    );
    Ok(tree)
}

/// Makes the authority creator and delegate of an allocated tree.
/// Initializing a tree the authority already controls is a no-op.
pub fn initialize_tree<P: CompressionProgram>(
    program: &mut P,
    authority: &Authority,
    signer_seeds: SignerSeeds,
    tree: &TreeHandle,
) -> Result<InitializeOutcome, TreeAuthorityError> {
    let state = program.tree_state(tree)?;
    match check_initialize(authority, &signer_seeds, tree, &state)? {
        InitializeAction::AlreadyInitialized => {
            debug!("tree {} is already initialized", tree.merkle_tree);
            Ok(InitializeOutcome::AlreadyInitialized)
        }
        InitializeAction::Initialize { config } => {
            program.initialize(tree, signer_seeds)?;
            info!(
                "initialized tree {} with capacity {}",
                tree.merkle_tree,
                config.capacity()
            );
            Ok(InitializeOutcome::Initialized)
        }
    }
}

/// Brings `merkle_tree` to the initialized state, resuming whatever step a
/// previous attempt stopped at.
pub fn setup_tree<P: CompressionProgram>(
    program: &mut P,
    authority: &Authority,
    payer: &Pubkey,
    merkle_tree: &Pubkey,
    config: TreeConfig,
) -> Result<TreeHandle, TreeAuthorityError> {
    let tree = program.tree_handle(merkle_tree);
    if program.tree_state(&tree)? == TreeState::Unallocated {
        allocate_tree(program, payer, merkle_tree, config)?;
    }
    initialize_tree(program, authority, authority.signer_seeds(), &tree)?;
    Ok(tree)
}
