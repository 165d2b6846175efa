use cnft_tree_authority::{
    binder::{bind_to_authority, create_collection},
    lifecycle::setup_tree,
    mock::MockLedger,
    Authority, CollectionHandle, CollectionMetadata, TreeConfig, TreeHandle,
};
use solana_sdk::pubkey::Pubkey;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn collection_metadata() -> CollectionMetadata {
    CollectionMetadata {
        name: "cNft-Zor-Pepe".to_string(),
        symbol: "cZORO".to_string(),
        uri: "https://app.ardrive.io/#/file/74aa07d9-e8a2-46ea-b8d3-dfcfdcb90ecb/view"
            .to_string(),
    }
}

/// Mock ledger with a funded payer and the authority of a fresh program.
pub struct TestEnv {
    pub ledger: MockLedger,
    pub authority: Authority,
    pub payer: Pubkey,
}

impl TestEnv {
    pub fn new() -> Self {
        init_logger();
        let mut ledger = MockLedger::new();
        let payer = Pubkey::new_unique();
        ledger.airdrop(&payer, 1_000_000_000_000);
        let authority = Authority::derive(&Pubkey::new_unique()).unwrap();
        Self {
            ledger,
            authority,
            payer,
        }
    }

    pub fn tree(&mut self, config: TreeConfig) -> TreeHandle {
        setup_tree(
            &mut self.ledger,
            &self.authority,
            &self.payer,
            &Pubkey::new_unique(),
            config,
        )
        .unwrap()
    }

    pub fn collection(&mut self) -> CollectionHandle {
        create_collection(&mut self.ledger, &self.payer, &collection_metadata()).unwrap()
    }

    pub fn bound_collection(&mut self) -> CollectionHandle {
        let collection = self.collection();
        bind_to_authority(&mut self.ledger, &self.authority, &collection, &self.payer).unwrap();
        collection
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
