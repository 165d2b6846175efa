//! In memory stand-in for the compression and collection programs.
use std::collections::{HashMap, VecDeque};

use solana_program::{keccak, pubkey, pubkey::Pubkey, rent::Rent};

use crate::{
    authority::SignerSeeds,
    error::{Precondition, TreeAuthorityError},
    interface::{CollectionProgram, CompressionProgram},
    metadata::CollectionMetadata,
    state::{
        get_asset_id, CollectionHandle, CollectionState, InitializedTree, MintedAsset, TreeHandle,
        TreeState,
    },
    tree_config::TreeConfig,
};

pub const MOCK_TREE_PROGRAM_ID: Pubkey = pubkey!("BGUMAp9Gq7iTEuizy4pqaxsTyUCBK68MDfK752saRPUY");
pub const MOCK_COLLECTION_PROGRAM_ID: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// System program `AccountAlreadyInUse`.
pub const ACCOUNT_ALREADY_IN_USE: u32 = 0;

#[derive(Debug, Clone)]
struct MockTree {
    config: TreeConfig,
    tree_creator: Option<Pubkey>,
    leaves: Vec<[u8; 32]>,
    root: [u8; 32],
    /// Appends of other writers that still occupy the change log buffer.
    in_flight: u32,
}

#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    rent: Rent,
    balances: HashMap<Pubkey, u64>,
    trees: HashMap<Pubkey, MockTree>,
    collections: HashMap<Pubkey, CollectionState>,
    mint_failures: VecDeque<u32>,
}

pub fn leaf_hash(
    leaf_owner: &Pubkey,
    collection: &Pubkey,
    metadata: &CollectionMetadata,
    nonce: u64,
) -> [u8; 32] {
    keccak::hashv(&[
        leaf_owner.as_ref(),
        leaf_owner.as_ref(),
        nonce.to_le_bytes().as_ref(),
        collection.as_ref(),
        metadata.name.as_bytes(),
        metadata.symbol.as_bytes(),
        metadata.uri.as_bytes(),
    ])
    .to_bytes()
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rent(&self) -> &Rent {
        &self.rent
    }

    pub fn airdrop(&mut self, account: &Pubkey, lamports: u64) {
        *self.balances.entry(*account).or_default() += lamports;
    }

    pub fn balance(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn leaves(&self, merkle_tree: &Pubkey) -> Vec<[u8; 32]> {
        self.trees
            .get(merkle_tree)
            .map(|tree| tree.leaves.clone())
            .unwrap_or_default()
    }

    pub fn root(&self, merkle_tree: &Pubkey) -> Option<[u8; 32]> {
        self.trees.get(merkle_tree).map(|tree| tree.root)
    }

    /// Simulates `in_flight` concurrent appends by other writers. Every
    /// rejected append lets one of them settle.
    pub fn congest(&mut self, merkle_tree: &Pubkey, in_flight: u32) {
        if let Some(tree) = self.trees.get_mut(merkle_tree) {
            tree.in_flight = in_flight;
        }
    }

    /// The next mint fails inside the collection program with `code`.
    pub fn fail_next_mint(&mut self, code: u32) {
        self.mint_failures.push_back(code);
    }
}

impl CompressionProgram for MockLedger {
    fn tree_handle(&self, merkle_tree: &Pubkey) -> TreeHandle {
        TreeHandle::derive(merkle_tree, &MOCK_TREE_PROGRAM_ID)
    }

    fn allocate(
        &mut self,
        payer: &Pubkey,
        merkle_tree: &Pubkey,
        config: &TreeConfig,
    ) -> Result<TreeHandle, TreeAuthorityError> {
        config.validate()?;
        if self.trees.contains_key(merkle_tree) {
            return Err(TreeAuthorityError::ExternalProgram(ACCOUNT_ALREADY_IN_USE));
        }
        let required = config.rent_exempt_lamports(&self.rent)?;
        let available = self.balance(payer);
        if available < required {
            return Err(TreeAuthorityError::InsufficientFunds {
                required,
                available,
            });
        }
        self.balances.insert(*payer, available - required);
        self.airdrop(merkle_tree, required);
        self.trees.insert(
            *merkle_tree,
            MockTree {
                config: *config,
                tree_creator: None,
                leaves: Vec::new(),
                root: [0u8; 32],
                in_flight: 0,
            },
        );
        Ok(self.tree_handle(merkle_tree))
    }

    fn initialize(
        &mut self,
        tree: &TreeHandle,
        signer_seeds: SignerSeeds,
    ) -> Result<(), TreeAuthorityError> {
        let signer = signer_seeds.signer()?;
        let account = self
            .trees
            .get_mut(&tree.merkle_tree)
            .ok_or(Precondition::TreeNotAllocated(tree.merkle_tree))?;
        if let Some(authority) = account.tree_creator {
            return Err(TreeAuthorityError::AlreadyInitialized {
                tree: tree.merkle_tree,
                authority,
            });
        }
        account.tree_creator = Some(signer);
        Ok(())
    }

    fn append(
        &mut self,
        tree: &TreeHandle,
        leaf: [u8; 32],
        signer_seeds: SignerSeeds,
    ) -> Result<u64, TreeAuthorityError> {
        let account = self
            .trees
            .get_mut(&tree.merkle_tree)
            .ok_or(Precondition::TreeNotAllocated(tree.merkle_tree))?;
        let creator = account
            .tree_creator
            .ok_or(Precondition::TreeNotInitialized(tree.merkle_tree))?;
        signer_seeds.check_signs_for(&creator)?;
        let capacity = account.config.capacity();
        if account.leaves.len() as u64 >= capacity {
            return Err(TreeAuthorityError::TreeFull { capacity });
        }
        if account.in_flight >= account.config.max_buffer_size {
            account.in_flight -= 1;
            return Err(TreeAuthorityError::BufferExhausted {
                max_buffer_size: account.config.max_buffer_size,
            });
        }
        account.root = keccak::hashv(&[account.root.as_ref(), leaf.as_ref()]).to_bytes();
        account.leaves.push(leaf);
        Ok(account.leaves.len() as u64 - 1)
    }

    fn tree_state(&self, tree: &TreeHandle) -> Result<TreeState, TreeAuthorityError> {
        Ok(match self.trees.get(&tree.merkle_tree) {
            None => TreeState::Unallocated,
            Some(account) => match account.tree_creator {
                None => TreeState::Allocated {
                    config: account.config,
                },
                Some(creator) => TreeState::Initialized(InitializedTree {
                    config: account.config,
                    tree_creator: creator,
                    tree_delegate: creator,
                    num_minted: account.leaves.len() as u64,
                }),
            },
        })
    }
}

impl CollectionProgram for MockLedger {
    fn create_collection(
        &mut self,
        payer: &Pubkey,
        metadata: &CollectionMetadata,
    ) -> Result<CollectionHandle, TreeAuthorityError> {
        metadata.validate()?;
        let mint = Pubkey::new_unique();
        let program_id = MOCK_COLLECTION_PROGRAM_ID;
        let metadata_seeds: [&[u8]; 3] = [b"metadata", program_id.as_ref(), mint.as_ref()];
        let edition_seeds: [&[u8]; 4] = [
            b"metadata",
            program_id.as_ref(),
            mint.as_ref(),
            b"edition",
        ];
        let (metadata_account, _) = Pubkey::find_program_address(&metadata_seeds, &program_id);
        let (master_edition, _) = Pubkey::find_program_address(&edition_seeds, &program_id);
        self.collections.insert(
            mint,
            CollectionState {
                mint,
                update_authority: *payer,
                metadata: metadata.clone(),
            },
        );
        Ok(CollectionHandle {
            mint,
            metadata: metadata_account,
            master_edition,
        })
    }

    fn collection_state(
        &self,
        collection: &CollectionHandle,
    ) -> Result<CollectionState, TreeAuthorityError> {
        self.collections
            .get(&collection.mint)
            .cloned()
            .ok_or_else(|| Precondition::CollectionNotFound(collection.mint).into())
    }

    fn set_update_authority(
        &mut self,
        collection: &CollectionHandle,
        current: &Pubkey,
        new_authority: &Pubkey,
    ) -> Result<(), TreeAuthorityError> {
        let state = self
            .collections
            .get_mut(&collection.mint)
            .ok_or(Precondition::CollectionNotFound(collection.mint))?;
        if state.update_authority != *current {
            return Err(TreeAuthorityError::Unauthorized {
                signer: *current,
                recorded: state.update_authority,
            });
        }
        state.update_authority = *new_authority;
        Ok(())
    }

    fn mint_compressed(
        &mut self,
        collection: &CollectionHandle,
        metadata: &CollectionMetadata,
        tree: &TreeHandle,
        leaf_owner: &Pubkey,
        signer_seeds: SignerSeeds,
    ) -> Result<MintedAsset, TreeAuthorityError> {
        if let Some(code) = self.mint_failures.pop_front() {
            return Err(TreeAuthorityError::ExternalProgram(code));
        }
        let state = self.collection_state(collection)?;
        signer_seeds.check_signs_for(&state.update_authority)?;
        let nonce = self
            .trees
            .get(&tree.merkle_tree)
            .map_or(0, |account| account.leaves.len() as u64);
        let leaf = leaf_hash(leaf_owner, &collection.mint, metadata, nonce);
        let leaf_index = self.append(tree, leaf, signer_seeds)?;
        Ok(MintedAsset {
            asset_id: get_asset_id(&MOCK_TREE_PROGRAM_ID, &tree.merkle_tree, leaf_index),
            leaf_index,
            leaf_owner: *leaf_owner,
            collection: collection.mint,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::authority::Authority;

    #[test]
    fn test_allocate_charges_rent() {
        let mut ledger = MockLedger::new();
        let payer = Pubkey::new_unique();
        let tree = Pubkey::new_unique();
        let config = TreeConfig::default();
        let rent = config.rent_exempt_lamports(ledger.rent()).unwrap();
        ledger.airdrop(&payer, rent + 1);

        ledger.allocate(&payer, &tree, &config).unwrap();
        assert_eq!(ledger.balance(&payer), 1);
        assert_eq!(ledger.balance(&tree), rent);
        assert_eq!(
            ledger.allocate(&payer, &tree, &config),
            Err(TreeAuthorityError::ExternalProgram(ACCOUNT_ALREADY_IN_USE))
        );
    }

    #[test]
    fn test_congested_buffer_drains() {
        let mut ledger = MockLedger::new();
        let payer = Pubkey::new_unique();
        let merkle_tree = Pubkey::new_unique();
        let authority = Authority::derive(&Pubkey::new_unique()).unwrap();
        let config = TreeConfig::new(3, 8, 0).unwrap();
        ledger.airdrop(&payer, u64::MAX / 2);
        let tree = ledger.allocate(&payer, &merkle_tree, &config).unwrap();
        ledger.initialize(&tree, authority.signer_seeds()).unwrap();
        ledger.congest(&merkle_tree, 9);

        let seeds = authority.signer_seeds();
        for _ in 0..2 {
            assert_eq!(
                ledger.append(&tree, [1u8; 32], seeds),
                Err(TreeAuthorityError::BufferExhausted { max_buffer_size: 8 })
            );
        }
        assert_eq!(ledger.append(&tree, [1u8; 32], seeds), Ok(0));
        assert_eq!(ledger.leaves(&merkle_tree).len(), 1);
    }
}
