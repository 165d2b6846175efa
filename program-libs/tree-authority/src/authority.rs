use solana_program::pubkey::Pubkey;

use crate::{constants::AUTHORITY_SEED, error::TreeAuthorityError};

/// Program derived address that is the update authority of every tree and
/// collection a program controls. It is never stored, every caller derives
/// it again from [`AUTHORITY_SEED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authority {
    program_id: Pubkey,
    address: Pubkey,
    bump: u8,
}

impl Authority {
    /// Derives the canonical authority of `program_id`.
    pub fn derive(program_id: &Pubkey) -> Result<Self, TreeAuthorityError> {
        let (address, bump) = Pubkey::try_find_program_address(&[AUTHORITY_SEED], program_id)
            .ok_or(TreeAuthorityError::NoViableBump)?;
        Ok(Self {
            program_id: *program_id,
            address,
            bump,
        })
    }

    /// Rebuilds the authority from a bump that was already searched for,
    /// e.g. by the `seeds` constraint of an instruction. Avoids repeating the
    /// bump search on chain.
    pub fn from_bump(program_id: &Pubkey, bump: u8) -> Result<Self, TreeAuthorityError> {
        let address = Pubkey::create_program_address(&[AUTHORITY_SEED, &[bump]], program_id)
            .map_err(|_| TreeAuthorityError::NoViableBump)?;
        Ok(Self {
            program_id: *program_id,
            address,
            bump,
        })
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn bump(&self) -> u8 {
        self.bump
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Independently derived addresses have to agree, a mismatch aborts.
    pub fn verify(&self, candidate: &Pubkey) -> Result<(), TreeAuthorityError> {
        if *candidate != self.address {
            return Err(TreeAuthorityError::AuthorityMismatch {
                expected: self.address,
                derived: *candidate,
            });
        }
        Ok(())
    }

    pub fn signer_seeds(&self) -> SignerSeeds {
        SignerSeeds::new(self.program_id, self.bump)
    }
}

/// Capability to sign as the authority. On chain the seeds are handed to
/// `invoke_signed`, off chain the signer is recomputed the same way the
/// runtime does it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignerSeeds {
    program_id: Pubkey,
    bump: [u8; 1],
}

impl SignerSeeds {
    pub fn new(program_id: Pubkey, bump: u8) -> Self {
        Self {
            program_id,
            bump: [bump],
        }
    }

    pub fn seeds(&self) -> [&[u8]; 2] {
        [AUTHORITY_SEED, &self.bump]
    }

    /// Address these seeds sign for.
    pub fn signer(&self) -> Result<Pubkey, TreeAuthorityError> {
        Pubkey::create_program_address(&self.seeds(), &self.program_id)
            .map_err(|_| TreeAuthorityError::NoViableBump)
    }

    /// Checks that the seeds sign for the `recorded` authority of an account.
    pub fn check_signs_for(&self, recorded: &Pubkey) -> Result<(), TreeAuthorityError> {
        // Seeds that hit the curve cannot sign for anything.
        let signer = self.signer().unwrap_or_default();
        if signer != *recorded {
            return Err(TreeAuthorityError::Unauthorized {
                signer,
                recorded: *recorded,
            });
        }
        Ok(())
    }
}
