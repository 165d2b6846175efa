use anchor_lang::{solana_program::pubkey::Pubkey, Id};
use anchor_spl::metadata::Metadata;

use crate::{AUTHORITY_SEED, BUBBLEGUM_SIGNER_SEED};

const METADATA_SEED: &[u8] = b"metadata";
const EDITION_SEED: &[u8] = b"edition";

pub fn get_authority_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[AUTHORITY_SEED], &crate::ID)
}

pub fn get_tree_config_pda(merkle_tree: &Pubkey) -> Pubkey {
    mpl_bubblegum::accounts::TreeConfig::find_pda(merkle_tree).0
}

pub fn get_bubblegum_signer_pda() -> Pubkey {
    Pubkey::find_program_address(&[BUBBLEGUM_SIGNER_SEED], &mpl_bubblegum::ID).0
}

pub fn get_metadata_pda(mint: &Pubkey) -> Pubkey {
    let program_id = Metadata::id();
    Pubkey::find_program_address(
        &[METADATA_SEED, program_id.as_ref(), mint.as_ref()],
        &program_id,
    )
    .0
}

pub fn get_master_edition_pda(mint: &Pubkey) -> Pubkey {
    let program_id = Metadata::id();
    Pubkey::find_program_address(
        &[METADATA_SEED, program_id.as_ref(), mint.as_ref(), EDITION_SEED],
        &program_id,
    )
    .0
}

pub fn get_asset_id(merkle_tree: &Pubkey, leaf_index: u64) -> Pubkey {
    cnft_tree_authority::state::get_asset_id(&mpl_bubblegum::ID, merkle_tree, leaf_index)
}
