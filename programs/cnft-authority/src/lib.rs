use anchor_lang::prelude::*;

pub mod errors;
pub mod instructions;
pub use instructions::{bind_collection::*, create_tree::*, mint_compressed_nft::*};
pub mod state;
pub mod utils;

pub use cnft_tree_authority::constants::{AUTHORITY_SEED, BUBBLEGUM_SIGNER_SEED};

#[cfg(not(target_os = "solana"))]
pub mod sdk;

declare_id!("4bLGdf2gARVZNvgVaV3mWALr2ruSJPjAHESd5qfX3AVV");

#[program]
pub mod cnft_authority {

    use super::*;

    /// Creates the Bubblegum tree config of an allocated tree with the
    /// program authority as tree creator. The tree account has to be
    /// allocated by the client beforehand, see [`crate::sdk`].
    pub fn create_tree(
        ctx: Context<CreateTree>,
        max_depth: u32,
        max_buffer_size: u32,
    ) -> Result<()> {
        process_create_tree(ctx, max_depth, max_buffer_size)
    }

    /// Transfers the collection update authority from the signer to the
    /// program authority.
    pub fn bind_collection(ctx: Context<BindCollection>) -> Result<()> {
        process_bind_collection(ctx)
    }

    /// Mints a compressed NFT into the collection. Returns the asset id.
    pub fn mint_compressed_nft(ctx: Context<MintCompressedNft>) -> Result<Pubkey> {
        process_mint_compressed_nft(ctx)
    }
}
