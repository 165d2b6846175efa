//! Authorization and readiness rules shared by the on chain handlers and the
//! generic operations. Checks only read state, they never mutate it.
use solana_program::pubkey::Pubkey;

use crate::{
    authority::{Authority, SignerSeeds},
    error::{Precondition, TreeAuthorityError},
    state::{CollectionState, TreeHandle, TreeState},
    tree_config::TreeConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializeAction {
    Initialize { config: TreeConfig },
    /// The tree is already controlled by the authority, nothing to do.
    AlreadyInitialized,
}

/// Decides whether `tree` can be initialized with the authority as creator.
pub fn check_initialize(
    authority: &Authority,
    signer_seeds: &SignerSeeds,
    tree: &TreeHandle,
    state: &TreeState,
) -> Result<InitializeAction, TreeAuthorityError> {
    let derived = signer_seeds.signer().unwrap_or_default();
    authority.verify(&derived)?;
    match state {
        TreeState::Unallocated => Err(Precondition::TreeNotAllocated(tree.merkle_tree).into()),
        TreeState::Allocated { config } => Ok(InitializeAction::Initialize { config: *config }),
        TreeState::Initialized(initialized) if initialized.is_controlled_by(&authority.address()) => {
            Ok(InitializeAction::AlreadyInitialized)
        }
        TreeState::Initialized(initialized) => Err(TreeAuthorityError::AlreadyInitialized {
            tree: tree.merkle_tree,
            authority: initialized.holder_other_than(&authority.address()),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebindAction {
    Transfer,
    /// The collection already has the requested update authority.
    AlreadyBound,
}

/// Decides whether `caller` may hand the collection update authority to
/// `new_authority`. Once the program authority holds it the binding is
/// final.
pub fn check_rebind(
    authority: &Authority,
    state: &CollectionState,
    caller: &Pubkey,
    new_authority: &Pubkey,
) -> Result<RebindAction, TreeAuthorityError> {
    if state.update_authority == *new_authority {
        return Ok(RebindAction::AlreadyBound);
    }
    if state.update_authority == authority.address() {
        return Err(TreeAuthorityError::AuthorityMismatch {
            expected: authority.address(),
            derived: *new_authority,
        });
    }
    if state.update_authority != *caller {
        return Err(TreeAuthorityError::Unauthorized {
            signer: *caller,
            recorded: state.update_authority,
        });
    }
    Ok(RebindAction::Transfer)
}

/// Snapshot taken before a mint. The leaf index the mint lands on is only
/// known once the append went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintPlan {
    pub num_minted: u64,
    pub remaining: u64,
}

/// Verifies that the signer is the authority, the tree is initialized and
/// controlled by it, the collection is bound to it and the tree has space.
pub fn check_mint(
    authority: &Authority,
    signer_seeds: &SignerSeeds,
    tree: &TreeHandle,
    tree_state: &TreeState,
    collection: &CollectionState,
) -> Result<MintPlan, TreeAuthorityError> {
    signer_seeds.check_signs_for(&authority.address())?;
    let initialized = match tree_state {
        TreeState::Unallocated => {
            return Err(Precondition::TreeNotAllocated(tree.merkle_tree).into())
        }
        TreeState::Allocated { .. } => {
            return Err(Precondition::TreeNotInitialized(tree.merkle_tree).into())
        }
        TreeState::Initialized(initialized) => initialized,
    };
    if !initialized.is_controlled_by(&authority.address()) {
        return Err(TreeAuthorityError::Unauthorized {
            signer: authority.address(),
            recorded: initialized.holder_other_than(&authority.address()),
        });
    }
    if collection.update_authority != authority.address() {
        return Err(Precondition::CollectionNotBound {
            mint: collection.mint,
            current: collection.update_authority,
        }
        .into());
    }
    if initialized.is_full() {
        return Err(TreeAuthorityError::TreeFull {
            capacity: initialized.capacity(),
        });
    }
    Ok(MintPlan {
        num_minted: initialized.num_minted,
        remaining: initialized.capacity() - initialized.num_minted,
    })
}
