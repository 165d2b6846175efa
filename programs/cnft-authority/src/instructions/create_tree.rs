use anchor_lang::prelude::*;
use cnft_tree_authority::{
    checks::{check_initialize, InitializeAction},
    Authority, TreeHandle,
};
use mpl_bubblegum::instructions::CreateTreeConfigCpiBuilder;
use spl_account_compression::{program::SplAccountCompression, Noop};

use crate::{errors::to_anchor_error, state::read_tree_state, AUTHORITY_SEED};

#[derive(Accounts)]
pub struct CreateTree<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    /// CHECK: (seed constraints) signs as tree creator.
    #[account(seeds = [AUTHORITY_SEED], bump)]
    pub authority: UncheckedAccount<'info>,
    /// CHECK: (bubblegum program) created by the cpi.
    #[account(
        mut,
        seeds = [merkle_tree.key().as_ref()],
        bump,
        seeds::program = bubblegum_program.key()
    )]
    pub tree_authority: UncheckedAccount<'info>,
    /// CHECK: (account compression program) allocated by the client.
    #[account(mut)]
    pub merkle_tree: UncheckedAccount<'info>,
    pub log_wrapper: Program<'info, Noop>,
    pub system_program: Program<'info, System>,
    /// CHECK: (address constraint).
    #[account(address = mpl_bubblegum::ID)]
    pub bubblegum_program: UncheckedAccount<'info>,
    pub compression_program: Program<'info, SplAccountCompression>,
}

pub fn process_create_tree(
    ctx: Context<CreateTree>,
    max_depth: u32,
    max_buffer_size: u32,
) -> Result<()> {
    let authority = Authority::from_bump(&crate::ID, ctx.bumps.authority).map_err(to_anchor_error)?;
    let tree = TreeHandle {
        merkle_tree: ctx.accounts.merkle_tree.key(),
        tree_authority: ctx.accounts.tree_authority.key(),
    };
    let signer_seeds = authority.signer_seeds();

    let merkle_tree = &ctx.accounts.merkle_tree.to_account_info();
    let tree_config = &ctx.accounts.tree_authority.to_account_info();
    let state = read_tree_state(merkle_tree, tree_config, Some((max_depth, max_buffer_size)))
        .map_err(to_anchor_error)?;
    let config = match check_initialize(&authority, &signer_seeds, &tree, &state)
        .map_err(to_anchor_error)?
    {
        InitializeAction::AlreadyInitialized => {
            msg!("tree {} is already controlled by {}", tree.merkle_tree, authority.address());
            return Ok(());
        }
        InitializeAction::Initialize { config } => config,
    };

    let compression_program = &ctx.accounts.compression_program.to_account_info();
    let payer = &ctx.accounts.payer.to_account_info();
    let tree_creator = &ctx.accounts.authority.to_account_info();
    let log_wrapper = &ctx.accounts.log_wrapper.to_account_info();
    let system_program = &ctx.accounts.system_program.to_account_info();
    let bubblegum_program = &ctx.accounts.bubblegum_program.to_account_info();

    let seeds = signer_seeds.seeds();
    CreateTreeConfigCpiBuilder::new(bubblegum_program)
        .tree_config(tree_config)
        .merkle_tree(merkle_tree)
        .payer(payer)
        .tree_creator(tree_creator)
        .log_wrapper(log_wrapper)
        .compression_program(compression_program)
        .system_program(system_program)
        .max_depth(max_depth)
        .max_buffer_size(max_buffer_size)
        .public(false)
        .invoke_signed(&[&seeds[..]])?;

    msg!(
        "created tree {} depth {} buffer {} canopy {} capacity {}",
        tree.merkle_tree,
        config.max_depth,
        config.max_buffer_size,
        config.canopy_depth,
        config.capacity()
    );
    Ok(())
}
