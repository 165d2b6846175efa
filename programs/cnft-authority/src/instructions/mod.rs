pub mod bind_collection;
pub mod create_tree;
pub mod mint_compressed_nft;
