use anchor_lang::prelude::*;
use cnft_tree_authority::{ErrorKind, TreeAuthorityError};

#[error_code]
pub enum CnftAuthorityError {
    #[msg("Tree configuration is not supported")]
    InvalidConfig,
    #[msg("Payer cannot cover rent")]
    InsufficientFunds,
    AuthorityMismatch,
    Unauthorized,
    AlreadyInitialized,
    InvalidMetadata,
    TreeFull,
    BufferExhausted,
    #[msg("A setup step is missing, see the log for which one")]
    NotReady,
    ExternalProgram,
}

impl From<ErrorKind> for CnftAuthorityError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidConfig => CnftAuthorityError::InvalidConfig,
            ErrorKind::InsufficientFunds => CnftAuthorityError::InsufficientFunds,
            ErrorKind::AuthorityMismatch => CnftAuthorityError::AuthorityMismatch,
            ErrorKind::Unauthorized => CnftAuthorityError::Unauthorized,
            ErrorKind::AlreadyInitialized => CnftAuthorityError::AlreadyInitialized,
            ErrorKind::InvalidMetadata => CnftAuthorityError::InvalidMetadata,
            ErrorKind::TreeFull => CnftAuthorityError::TreeFull,
            ErrorKind::BufferExhausted => CnftAuthorityError::BufferExhausted,
            ErrorKind::NotReady => CnftAuthorityError::NotReady,
            ErrorKind::External => CnftAuthorityError::ExternalProgram,
        }
    }
}

/// Logs the detail of `error` and converts it. Custom errors of other
/// programs keep their code.
pub fn to_anchor_error(error: TreeAuthorityError) -> Error {
    msg!("{}", error);
    match error {
        TreeAuthorityError::ExternalProgram(_) => ProgramError::from(error).into(),
        _ => CnftAuthorityError::from(error.kind()).into(),
    }
}
