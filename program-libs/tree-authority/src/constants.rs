// This file stores constants which do not have to be configured.

/// Seed of the program derived address that owns trees and collections.
pub const AUTHORITY_SEED: &[u8] = b"AUTH";

/// Seed of Bubblegum's collection cpi signer.
pub const BUBBLEGUM_SIGNER_SEED: &[u8] = b"collection_cpi";

/// Seed Bubblegum uses to derive asset ids from (tree, leaf index).
pub const ASSET_SEED: &[u8] = b"asset";

/// Token metadata string limits.
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;

pub const NODE_SIZE: usize = 32;

/// Largest account the runtime can hold.
pub const MAX_ACCOUNT_SIZE: usize = 10 * 1024 * 1024;

/// (max_depth, max_buffer_size) pairs the compression program accepts.
pub const SUPPORTED_DEPTH_SIZE_PAIRS: [(u32, u32); 34] = [
    (3, 8),
    (5, 8),
    (6, 16),
    (7, 16),
    (8, 16),
    (9, 16),
    (10, 32),
    (11, 32),
    (12, 32),
    (13, 32),
    (14, 64),
    (14, 256),
    (14, 1024),
    (14, 2048),
    (15, 64),
    (16, 64),
    (17, 64),
    (18, 64),
    (19, 64),
    (20, 64),
    (20, 256),
    (20, 1024),
    (20, 2048),
    (24, 64),
    (24, 256),
    (24, 512),
    (24, 1024),
    (24, 2048),
    (26, 512),
    (26, 1024),
    (26, 2048),
    (30, 512),
    (30, 1024),
    (30, 2048),
];
