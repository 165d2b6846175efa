use solana_program::{pubkey::Pubkey, rent::Rent};
use spl_account_compression::state::{
    merkle_tree_get_size, ConcurrentMerkleTreeHeader, CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1,
};

use crate::{
    constants::{MAX_ACCOUNT_SIZE, NODE_SIZE, SUPPORTED_DEPTH_SIZE_PAIRS},
    error::TreeAuthorityError,
    AnchorDeserialize, AnchorSerialize,
};

/// Shape of a concurrent Merkle tree, fixed when the tree account is allocated.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// The tree holds `2^max_depth` leaves.
    pub max_depth: u32,
    /// Number of changelog slots, bounds how many concurrent appends the
    /// compression program can reconcile.
    pub max_buffer_size: u32,
    /// Number of upper tree levels cached on chain. Every cached level
    /// shortens the proof a mint has to carry.
    pub canopy_depth: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 14,
            max_buffer_size: 64,
            canopy_depth: 9,
        }
    }
}

pub fn is_supported_depth_size_pair(max_depth: u32, max_buffer_size: u32) -> bool {
    SUPPORTED_DEPTH_SIZE_PAIRS.contains(&(max_depth, max_buffer_size))
}

/// Bytes of a canopy caching `canopy_depth` levels below the root.
pub fn canopy_size(canopy_depth: u32) -> usize {
    match 1usize.checked_shl(canopy_depth + 1) {
        Some(nodes) => (nodes - 2).saturating_mul(NODE_SIZE),
        None => usize::MAX,
    }
}

impl TreeConfig {
    pub fn new(
        max_depth: u32,
        max_buffer_size: u32,
        canopy_depth: u32,
    ) -> Result<Self, TreeAuthorityError> {
        let config = Self {
            max_depth,
            max_buffer_size,
            canopy_depth,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks:
    /// 1. (max_depth, max_buffer_size) is supported by the compression program
    /// 2. canopy_depth < max_depth
    /// 3. the account fits into a single account
    pub fn validate(&self) -> Result<(), TreeAuthorityError> {
        self.check_depth_size_pair()?;
        if self.canopy_depth >= self.max_depth {
            return Err(TreeAuthorityError::CanopyNotBelowDepth {
                canopy_depth: self.canopy_depth,
                max_depth: self.max_depth,
            });
        }
        let size = self.account_size()?;
        if size > MAX_ACCOUNT_SIZE {
            return Err(TreeAuthorityError::TreeAccountTooLarge {
                size,
                max: MAX_ACCOUNT_SIZE,
            });
        }
        Ok(())
    }

    fn check_depth_size_pair(&self) -> Result<(), TreeAuthorityError> {
        if !is_supported_depth_size_pair(self.max_depth, self.max_buffer_size) {
            return Err(TreeAuthorityError::UnsupportedDepthSizePair {
                max_depth: self.max_depth,
                max_buffer_size: self.max_buffer_size,
            });
        }
        Ok(())
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.max_depth
    }

    /// Header the compression program writes when it initializes a tree of
    /// this shape for `authority`.
    pub fn header(
        &self,
        authority: &Pubkey,
        creation_slot: u64,
    ) -> Result<ConcurrentMerkleTreeHeader, TreeAuthorityError> {
        let mut header =
            ConcurrentMerkleTreeHeader::try_from_slice(&[0u8; CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1])
                .map_err(|_| TreeAuthorityError::InvalidTreeHeader)?;
        header.initialize(
            self.max_depth,
            self.max_buffer_size,
            authority,
            creation_slot,
        );
        Ok(header)
    }

    /// Bytes between the header and the canopy.
    pub fn tree_size(&self) -> Result<usize, TreeAuthorityError> {
        self.check_depth_size_pair()?;
        let header = self.header(&Pubkey::default(), 0)?;
        merkle_tree_get_size(&header).map_err(|_| TreeAuthorityError::UnsupportedDepthSizePair {
            max_depth: self.max_depth,
            max_buffer_size: self.max_buffer_size,
        })
    }

    pub fn canopy_size(&self) -> usize {
        canopy_size(self.canopy_depth)
    }

    pub fn account_size(&self) -> Result<usize, TreeAuthorityError> {
        Ok(CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1
            .saturating_add(self.tree_size()?)
            .saturating_add(self.canopy_size()))
    }

    pub fn rent_exempt_lamports(&self, rent: &Rent) -> Result<u64, TreeAuthorityError> {
        Ok(rent.minimum_balance(self.account_size()?))
    }

    /// Recovers the canopy depth of an allocated account from its length.
    pub fn from_account_size(
        max_depth: u32,
        max_buffer_size: u32,
        len: usize,
    ) -> Result<Self, TreeAuthorityError> {
        let without_canopy = Self {
            max_depth,
            max_buffer_size,
            canopy_depth: 0,
        };
        without_canopy.check_depth_size_pair()?;
        let mismatch = TreeAuthorityError::TreeAccountSizeMismatch {
            len,
            max_depth,
            max_buffer_size,
        };
        let canopy_bytes = len
            .checked_sub(without_canopy.account_size()?)
            .ok_or(mismatch.clone())?;
        if canopy_bytes % NODE_SIZE != 0 {
            return Err(mismatch);
        }
        let nodes = canopy_bytes / NODE_SIZE + 2;
        if !nodes.is_power_of_two() {
            return Err(mismatch);
        }
        Self::new(max_depth, max_buffer_size, nodes.trailing_zeros() - 1)
    }

    /// Picks the largest supported buffer for `max_depth` whose rent exempt
    /// balance still fits into `budget` lamports. The buffer caps the safe
    /// concurrent mint rate.
    pub fn with_largest_buffer(
        max_depth: u32,
        canopy_depth: u32,
        rent: &Rent,
        budget: u64,
    ) -> Result<Self, TreeAuthorityError> {
        let mut best: Option<Self> = None;
        let mut cheapest: Option<u64> = None;
        let mut rejected = TreeAuthorityError::UnsupportedDepthSizePair {
            max_depth,
            max_buffer_size: 0,
        };
        for (_, max_buffer_size) in SUPPORTED_DEPTH_SIZE_PAIRS
            .iter()
            .filter(|(depth, _)| *depth == max_depth)
        {
            let candidate = match Self::new(max_depth, *max_buffer_size, canopy_depth) {
                Ok(candidate) => candidate,
                Err(error) => {
                    rejected = error;
                    continue;
                }
            };
            let lamports = candidate.rent_exempt_lamports(rent)?;
            cheapest = Some(cheapest.map_or(lamports, |c| c.min(lamports)));
            if lamports <= budget
                && best.map_or(true, |b| candidate.max_buffer_size > b.max_buffer_size)
            {
                best = Some(candidate);
            }
        }
        match (best, cheapest) {
            (Some(config), _) => Ok(config),
            (None, Some(required)) => Err(TreeAuthorityError::InsufficientFunds {
                required,
                available: budget,
            }),
            (None, None) => Err(rejected),
        }
    }
}
