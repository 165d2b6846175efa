use anchor_lang::prelude::*;
use anchor_spl::metadata::MetadataAccount;
use cnft_tree_authority::{
    state::InitializedTree, CollectionMetadata, CollectionState, Precondition,
    TreeAuthorityError, TreeConfig, TreeState,
};
use mpl_bubblegum::accounts::TreeConfig as BubblegumTreeConfig;
use spl_account_compression::state::{
    CompressionAccountType, ConcurrentMerkleTreeHeader, CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1,
};

/// Decodes the header of a concurrent Merkle tree account. An allocated but
/// uninitialized tree has an all zero header.
pub fn read_tree_header(
    data: &[u8],
) -> std::result::Result<ConcurrentMerkleTreeHeader, TreeAuthorityError> {
    let header_bytes = data
        .get(..CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1)
        .ok_or(TreeAuthorityError::InvalidTreeHeader)?;
    ConcurrentMerkleTreeHeader::try_from_slice(header_bytes)
        .map_err(|_| TreeAuthorityError::InvalidTreeHeader)
}

/// Reads the state of `merkle_tree` and its Bubblegum tree config.
/// `requested` is the shape the caller expects of a tree that is allocated
/// but not yet initialized. Without it such a tree is reported as not
/// ready.
pub fn read_tree_state(
    merkle_tree: &AccountInfo,
    tree_config: &AccountInfo,
    requested: Option<(u32, u32)>,
) -> std::result::Result<TreeState, TreeAuthorityError> {
    if *merkle_tree.owner != spl_account_compression::ID || merkle_tree.data_is_empty() {
        return Ok(TreeState::Unallocated);
    }
    let data = merkle_tree
        .try_borrow_data()
        .map_err(|_| TreeAuthorityError::InvalidTreeHeader)?;
    let header = read_tree_header(&data)?;
    if matches!(header.account_type, CompressionAccountType::Uninitialized) {
        return match requested {
            Some((max_depth, max_buffer_size)) => Ok(TreeState::Allocated {
                config: TreeConfig::from_account_size(max_depth, max_buffer_size, data.len())?,
            }),
            None => Err(Precondition::TreeNotInitialized(*merkle_tree.key).into()),
        };
    }
    let config = TreeConfig::from_account_size(
        header.get_max_depth(),
        header.get_max_buffer_size(),
        data.len(),
    )?;

    // Bubblegum trees are controlled by their tree config. The compression
    // program does not expose any other holder, it is recorded as the
    // default key.
    if header.assert_valid_authority(tree_config.key).is_err() {
        return Ok(TreeState::Initialized(InitializedTree {
            config,
            tree_creator: Pubkey::default(),
            tree_delegate: Pubkey::default(),
            num_minted: 0,
        }));
    }
    if *tree_config.owner != mpl_bubblegum::ID || tree_config.data_is_empty() {
        return Ok(TreeState::Initialized(InitializedTree {
            config,
            tree_creator: *tree_config.key,
            tree_delegate: *tree_config.key,
            num_minted: 0,
        }));
    }
    let record = tree_config
        .try_borrow_data()
        .map_err(|_| Precondition::TreeNotInitialized(*merkle_tree.key))?;
    let record = BubblegumTreeConfig::from_bytes(&record)
        .map_err(|_| Precondition::TreeNotInitialized(*merkle_tree.key))?;
    Ok(TreeState::Initialized(InitializedTree {
        config,
        tree_creator: record.tree_creator,
        tree_delegate: record.tree_delegate,
        num_minted: record.num_minted,
    }))
}

/// Number of leaves Bubblegum minted into the tree of `tree_config`.
pub fn read_num_minted(tree_config: &AccountInfo) -> Result<u64> {
    let data = tree_config.try_borrow_data()?;
    let record = BubblegumTreeConfig::from_bytes(&data)
        .map_err(|_| ProgramError::InvalidAccountData)?;
    Ok(record.num_minted)
}

pub fn read_collection_state(mint: &Pubkey, metadata: &MetadataAccount) -> CollectionState {
    CollectionState {
        mint: *mint,
        update_authority: metadata.update_authority,
        metadata: CollectionMetadata::from_padded(&metadata.name, &metadata.symbol, &metadata.uri),
    }
}
