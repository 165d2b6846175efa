use std::time::Duration;

use log::debug;
use solana_program::pubkey::Pubkey;

use crate::{
    authority::{Authority, SignerSeeds},
    checks::check_mint,
    error::TreeAuthorityError,
    interface::{CollectionProgram, CompressionProgram},
    retry::RetryPolicy,
    state::{CollectionHandle, MintedAsset, TreeHandle},
};

/// Mints one compressed asset carrying the collection's metadata into
/// `tree`, signed by the authority.
pub fn mint<L>(
    ledger: &mut L,
    authority: &Authority,
    signer_seeds: SignerSeeds,
    tree: &TreeHandle,
    collection: &CollectionHandle,
    leaf_owner: &Pubkey,
) -> Result<MintedAsset, TreeAuthorityError>
where
    L: CompressionProgram + CollectionProgram,
{
    let tree_state = ledger.tree_state(tree)?;
    let collection_state = ledger.collection_state(collection)?;
    let plan = check_mint(
        authority,
        &signer_seeds,
        tree,
        &tree_state,
        &collection_state,
    )?;
    debug!(
        "minting into tree {} ({} minted, {} remaining)",
        tree.merkle_tree, plan.num_minted, plan.remaining
    );
    let asset = ledger.mint_compressed(
        collection,
        &collection_state.metadata,
        tree,
        leaf_owner,
        signer_seeds,
    )?;
    debug!(
        "minted asset {} at leaf {} of tree {}",
        asset.asset_id, asset.leaf_index, tree.merkle_tree
    );
    Ok(asset)
}

/// Like [`mint`] but resubmits while the tree's concurrent buffer is
/// exhausted.
#[allow(clippy::too_many_arguments)]
pub fn mint_with_retry<L, S>(
    ledger: &mut L,
    policy: &RetryPolicy,
    sleep: S,
    authority: &Authority,
    signer_seeds: SignerSeeds,
    tree: &TreeHandle,
    collection: &CollectionHandle,
    leaf_owner: &Pubkey,
) -> Result<MintedAsset, TreeAuthorityError>
where
    L: CompressionProgram + CollectionProgram,
    S: FnMut(Duration),
{
    policy.run(sleep, || {
        mint(&mut *ledger, authority, signer_seeds, tree, collection, leaf_owner)
    })
}
