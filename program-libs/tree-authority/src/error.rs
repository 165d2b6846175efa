use solana_program::{program_error::ProgramError, pubkey::Pubkey};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeAuthorityError {
    #[error("Unsupported tree size, max depth {max_depth} with max buffer size {max_buffer_size} is not a valid pair")]
    UnsupportedDepthSizePair { max_depth: u32, max_buffer_size: u32 },
    #[error("Invalid canopy depth {canopy_depth}, it has to be less than max depth {max_depth}")]
    CanopyNotBelowDepth { canopy_depth: u32, max_depth: u32 },
    #[error("Tree account of {size} bytes exceeds the maximum account size of {max} bytes")]
    TreeAccountTooLarge { size: usize, max: usize },
    #[error("Tree account length {len} does not fit max depth {max_depth} and max buffer size {max_buffer_size} with any canopy")]
    TreeAccountSizeMismatch {
        len: usize,
        max_depth: u32,
        max_buffer_size: u32,
    },
    #[error("Payer holds {available} lamports but {required} are required for rent")]
    InsufficientFunds { required: u64, available: u64 },
    #[error("Authority mismatch, expected {expected} but derived {derived}")]
    AuthorityMismatch { expected: Pubkey, derived: Pubkey },
    #[error("Unauthorized signer {signer}, recorded authority is {recorded}")]
    Unauthorized { signer: Pubkey, recorded: Pubkey },
    #[error("Tree {tree} is already initialized with authority {authority}")]
    AlreadyInitialized { tree: Pubkey, authority: Pubkey },
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(#[from] InvalidMetadata),
    #[error("Merkle tree is full, all {capacity} leaves are minted")]
    TreeFull { capacity: u64 },
    #[error("Concurrent buffer of {max_buffer_size} slots is exhausted, retry the mint")]
    BufferExhausted { max_buffer_size: u32 },
    #[error("Not ready: {0}")]
    NotReady(#[from] Precondition),
    #[error("No bump produces an off-curve authority address")]
    NoViableBump,
    #[error("Tree account header is malformed")]
    InvalidTreeHeader,
    #[error("External program failed with custom error {0}")]
    ExternalProgram(u32),
}

/// Setup step that has to complete before the failed operation can run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    #[error("tree {0} is not allocated")]
    TreeNotAllocated(Pubkey),
    #[error("tree {0} is allocated but not initialized")]
    TreeNotInitialized(Pubkey),
    #[error("collection {0} does not exist")]
    CollectionNotFound(Pubkey),
    #[error("collection {mint} is still controlled by {current}, bind it to the program authority first")]
    CollectionNotBound { mint: Pubkey, current: Pubkey },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Name,
    Symbol,
    Uri,
}

impl core::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MetadataField::Name => write!(f, "name"),
            MetadataField::Symbol => write!(f, "symbol"),
            MetadataField::Uri => write!(f, "uri"),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMetadata {
    #[error("{field} is {len} bytes, the maximum is {max}")]
    TooLong {
        field: MetadataField,
        len: usize,
        max: usize,
    },
    #[error("{0} is empty")]
    Empty(MetadataField),
    #[error("{0} contains a NUL byte")]
    NulByte(MetadataField),
}

/// Classes callers branch on, one per entry of the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidConfig,
    InsufficientFunds,
    AuthorityMismatch,
    Unauthorized,
    AlreadyInitialized,
    InvalidMetadata,
    TreeFull,
    BufferExhausted,
    NotReady,
    External,
}

impl TreeAuthorityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TreeAuthorityError::UnsupportedDepthSizePair { .. }
            | TreeAuthorityError::CanopyNotBelowDepth { .. }
            | TreeAuthorityError::TreeAccountTooLarge { .. }
            | TreeAuthorityError::TreeAccountSizeMismatch { .. }
            | TreeAuthorityError::InvalidTreeHeader => ErrorKind::InvalidConfig,
            TreeAuthorityError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            TreeAuthorityError::AuthorityMismatch { .. } | TreeAuthorityError::NoViableBump => {
                ErrorKind::AuthorityMismatch
            }
            TreeAuthorityError::Unauthorized { .. } => ErrorKind::Unauthorized,
            TreeAuthorityError::AlreadyInitialized { .. } => ErrorKind::AlreadyInitialized,
            TreeAuthorityError::InvalidMetadata(_) => ErrorKind::InvalidMetadata,
            TreeAuthorityError::TreeFull { .. } => ErrorKind::TreeFull,
            TreeAuthorityError::BufferExhausted { .. } => ErrorKind::BufferExhausted,
            TreeAuthorityError::NotReady(_) => ErrorKind::NotReady,
            TreeAuthorityError::ExternalProgram(_) => ErrorKind::External,
        }
    }

    /// Transient failures clear up on their own and are retried with backoff.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::BufferExhausted
    }

    /// Failures the caller can fix and then resubmit the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::BufferExhausted | ErrorKind::InsufficientFunds | ErrorKind::NotReady
        )
    }
}

impl From<TreeAuthorityError> for u32 {
    fn from(e: TreeAuthorityError) -> u32 {
        match e {
            TreeAuthorityError::UnsupportedDepthSizePair { .. } => 14001,
            TreeAuthorityError::CanopyNotBelowDepth { .. } => 14002,
            TreeAuthorityError::TreeAccountTooLarge { .. } => 14003,
            TreeAuthorityError::TreeAccountSizeMismatch { .. } => 14004,
            TreeAuthorityError::InsufficientFunds { .. } => 14005,
            TreeAuthorityError::AuthorityMismatch { .. } => 14006,
            TreeAuthorityError::Unauthorized { .. } => 14007,
            TreeAuthorityError::AlreadyInitialized { .. } => 14008,
            TreeAuthorityError::InvalidMetadata(_) => 14009,
            TreeAuthorityError::TreeFull { .. } => 14010,
            TreeAuthorityError::BufferExhausted { .. } => 14011,
            TreeAuthorityError::NotReady(_) => 14012,
            TreeAuthorityError::NoViableBump => 14013,
            TreeAuthorityError::InvalidTreeHeader => 14014,
            // External failures keep the code they were raised with.
            TreeAuthorityError::ExternalProgram(code) => code,
        }
    }
}

impl From<TreeAuthorityError> for ProgramError {
    fn from(e: TreeAuthorityError) -> Self {
        ProgramError::Custom(e.into())
    }
}

#[test]
fn test_error_kinds() {
    let config = TreeAuthorityError::CanopyNotBelowDepth {
        canopy_depth: 14,
        max_depth: 14,
    };
    assert_eq!(config.kind(), ErrorKind::InvalidConfig);
    assert!(!config.is_retryable());
    assert_eq!(u32::from(config), 14002);

    let buffer = TreeAuthorityError::BufferExhausted {
        max_buffer_size: 64,
    };
    assert!(buffer.is_transient());
    assert!(buffer.is_retryable());

    let external = TreeAuthorityError::ExternalProgram(6017);
    assert_eq!(ProgramError::from(external), ProgramError::Custom(6017));
}

#[test]
fn test_not_ready_names_precondition() {
    let tree = Pubkey::new_unique();
    let error = TreeAuthorityError::from(Precondition::TreeNotInitialized(tree));
    assert_eq!(
        error.to_string(),
        format!("Not ready: tree {} is allocated but not initialized", tree)
    );
}
