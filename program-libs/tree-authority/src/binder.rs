use log::{debug, info};
use solana_program::pubkey::Pubkey;

use crate::{
    authority::Authority,
    checks::{check_rebind, RebindAction},
    error::TreeAuthorityError,
    interface::CollectionProgram,
    metadata::CollectionMetadata,
    state::CollectionHandle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebindOutcome {
    Rebound,
    AlreadyBound,
}

/// Creates a collection controlled by `payer`. Metadata is validated before
/// submission.
pub fn create_collection<C: CollectionProgram>(
    program: &mut C,
    payer: &Pubkey,
    metadata: &CollectionMetadata,
) -> Result<CollectionHandle, TreeAuthorityError> {
    metadata.validate()?;
    let collection = program.create_collection(payer, metadata)?;
    debug!("created collection {} ({})", collection.mint, metadata.name);
    Ok(collection)
}

/// Transfers the update authority of `collection` from `caller` to
/// `new_authority`.
pub fn rebind_authority<C: CollectionProgram>(
    program: &mut C,
    authority: &Authority,
    collection: &CollectionHandle,
    caller: &Pubkey,
    new_authority: &Pubkey,
) -> Result<RebindOutcome, TreeAuthorityError> {
    let state = program.collection_state(collection)?;
    match check_rebind(authority, &state, caller, new_authority)? {
        RebindAction::AlreadyBound => Ok(RebindOutcome::AlreadyBound),
        RebindAction::Transfer => {
            program.set_update_authority(collection, caller, new_authority)?;
            info!(
                "collection {} update authority {} -> {}",
                collection.mint, caller, new_authority
            );
            Ok(RebindOutcome::Rebound)
        }
    }
}

/// Hands the collection to the program authority. After this only the
/// program can mint into it.
pub fn bind_to_authority<C: CollectionProgram>(
    program: &mut C,
    authority: &Authority,
    collection: &CollectionHandle,
    caller: &Pubkey,
) -> Result<RebindOutcome, TreeAuthorityError> {
    rebind_authority(program, authority, collection, caller, &authority.address())
}
