use solana_program::pubkey::Pubkey;

use crate::{
    authority::SignerSeeds,
    error::TreeAuthorityError,
    metadata::CollectionMetadata,
    state::{CollectionHandle, CollectionState, MintedAsset, TreeHandle, TreeState},
    tree_config::TreeConfig,
};

/// Program owning concurrent Merkle trees and their authority records.
pub trait CompressionProgram {
    /// Handle of `merkle_tree`, whether the tree exists or not.
    fn tree_handle(&self, merkle_tree: &Pubkey) -> TreeHandle;

    /// Reserves rent exempt space for a tree shaped by `config`, paid by
    /// `payer`.
    fn allocate(
        &mut self,
        payer: &Pubkey,
        merkle_tree: &Pubkey,
        config: &TreeConfig,
    ) -> Result<TreeHandle, TreeAuthorityError>;

    /// Records the address `signer_seeds` sign for as creator and delegate
    /// of the tree.
    fn initialize(
        &mut self,
        tree: &TreeHandle,
        signer_seeds: SignerSeeds,
    ) -> Result<(), TreeAuthorityError>;

    /// Appends `leaf` and returns its index.
    fn append(
        &mut self,
        tree: &TreeHandle,
        leaf: [u8; 32],
        signer_seeds: SignerSeeds,
    ) -> Result<u64, TreeAuthorityError>;

    fn tree_state(&self, tree: &TreeHandle) -> Result<TreeState, TreeAuthorityError>;
}

/// Program owning collections and minting compressed assets into them.
pub trait CollectionProgram {
    /// Creates a collection whose update authority is `payer`.
    fn create_collection(
        &mut self,
        payer: &Pubkey,
        metadata: &CollectionMetadata,
    ) -> Result<CollectionHandle, TreeAuthorityError>;

    fn collection_state(
        &self,
        collection: &CollectionHandle,
    ) -> Result<CollectionState, TreeAuthorityError>;

    /// Transfers the update authority, `current` has to sign.
    fn set_update_authority(
        &mut self,
        collection: &CollectionHandle,
        current: &Pubkey,
        new_authority: &Pubkey,
    ) -> Result<(), TreeAuthorityError>;

    /// Mints a compressed asset into `tree` as a member of `collection`. Either
    /// the leaf is appended and the asset exists, or nothing changed.
    fn mint_compressed(
        &mut self,
        collection: &CollectionHandle,
        metadata: &CollectionMetadata,
        tree: &TreeHandle,
        leaf_owner: &Pubkey,
        signer_seeds: SignerSeeds,
    ) -> Result<MintedAsset, TreeAuthorityError>;
}
