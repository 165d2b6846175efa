pub mod authority;
pub mod binder;
pub mod checks;
pub mod constants;
pub mod error;
pub mod interface;
pub mod lifecycle;
pub mod metadata;
#[cfg(any(test, feature = "test-only"))]
pub mod mock;
pub mod relay;
pub mod retry;
pub mod state;
pub mod tree_config;

#[cfg(feature = "anchor")]
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
#[cfg(not(feature = "anchor"))]
use borsh::{BorshDeserialize as AnchorDeserialize, BorshSerialize as AnchorSerialize};

pub use authority::{Authority, SignerSeeds};
pub use error::{ErrorKind, Precondition, TreeAuthorityError};
pub use metadata::CollectionMetadata;
pub use retry::RetryPolicy;
pub use state::{CollectionHandle, CollectionState, MintedAsset, TreeHandle, TreeState};
pub use tree_config::TreeConfig;
