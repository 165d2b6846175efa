use solana_program::pubkey::Pubkey;

use crate::{constants::ASSET_SEED, metadata::CollectionMetadata, tree_config::TreeConfig};

/// Merkle tree account and the record that holds its creator and delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeHandle {
    pub merkle_tree: Pubkey,
    pub tree_authority: Pubkey,
}

impl TreeHandle {
    /// The authority record is a pda of the tree program seeded with the
    /// tree address.
    pub fn derive(merkle_tree: &Pubkey, tree_program_id: &Pubkey) -> Self {
        let (tree_authority, _) =
            Pubkey::find_program_address(&[merkle_tree.as_ref()], tree_program_id);
        Self {
            merkle_tree: *merkle_tree,
            tree_authority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionHandle {
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub master_edition: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializedTree {
    pub config: TreeConfig,
    pub tree_creator: Pubkey,
    pub tree_delegate: Pubkey,
    pub num_minted: u64,
}

impl InitializedTree {
    pub fn is_controlled_by(&self, authority: &Pubkey) -> bool {
        self.tree_creator == *authority && self.tree_delegate == *authority
    }

    /// The recorded account that keeps `authority` from controlling the tree.
    pub fn holder_other_than(&self, authority: &Pubkey) -> Pubkey {
        if self.tree_creator == *authority {
            self.tree_delegate
        } else {
            self.tree_creator
        }
    }

    pub fn capacity(&self) -> u64 {
        self.config.capacity()
    }

    pub fn is_full(&self) -> bool {
        self.num_minted >= self.capacity()
    }
}

/// Observed state of a tree account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    Unallocated,
    Allocated { config: TreeConfig },
    Initialized(InitializedTree),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionState {
    pub mint: Pubkey,
    pub update_authority: Pubkey,
    pub metadata: CollectionMetadata,
}

/// Compressed asset appended as a leaf of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintedAsset {
    pub asset_id: Pubkey,
    pub leaf_index: u64,
    pub leaf_owner: Pubkey,
    pub collection: Pubkey,
}

/// Asset ids are pdas of the tree program over the tree and the leaf nonce.
pub fn get_asset_id(tree_program_id: &Pubkey, merkle_tree: &Pubkey, leaf_index: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[ASSET_SEED, merkle_tree.as_ref(), leaf_index.to_le_bytes().as_ref()],
        tree_program_id,
    )
    .0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_asset_ids_are_unique_per_leaf() {
        let program_id = Pubkey::new_unique();
        let tree = Pubkey::new_unique();
        let first = get_asset_id(&program_id, &tree, 0);
        assert_eq!(first, get_asset_id(&program_id, &tree, 0));
        assert_ne!(first, get_asset_id(&program_id, &tree, 1));
        assert_ne!(first, get_asset_id(&program_id, &Pubkey::new_unique(), 0));
    }

    #[test]
    fn test_is_controlled_by() {
        let authority = Pubkey::new_unique();
        let mut tree = InitializedTree {
            config: TreeConfig::default(),
            tree_creator: authority,
            tree_delegate: authority,
            num_minted: 0,
        };
        assert!(tree.is_controlled_by(&authority));
        tree.tree_delegate = Pubkey::new_unique();
        assert!(!tree.is_controlled_by(&authority));
        tree.num_minted = tree.capacity();
        assert!(tree.is_full());
    }
}
