use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod clock;
pub mod constants;
pub mod factory;

pub use clock::{Clock, FixedClock, SystemClock};
pub use factory::BlockFactory;

pub type Hash = [u8; 32];

/// Deterministic byte encoding of the five hashed fields, in fixed order:
/// index, timestamp, prev_hash, payload, nonce. Integers are u64
/// little-endian; the variable-length fields carry a u64 length prefix so
/// no two distinct field tuples encode to the same bytes.
pub fn canonical_bytes(
    index: u64,
    timestamp: u64,
    prev_hash: &[u8],
    payload: &[u8],
    nonce: u64,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(8 + 8 + 8 + prev_hash.len() + 8 + payload.len() + 8);
    bytes.extend_from_slice(&index.to_le_bytes());
    bytes.extend_from_slice(&timestamp.to_le_bytes());
    bytes.extend_from_slice(&(prev_hash.len() as u64).to_le_bytes());
    bytes.extend_from_slice(prev_hash);
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&nonce.to_le_bytes());
    bytes
}

pub fn sha256(bytes: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..]);
    out
}

/// A block candidate under construction. Mutable, owned by the factory and
/// the proof-of-work search until sealing assigns a hash.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockDraft {
    pub index: u64,
    pub timestamp: u64,
    pub prev_hash: Vec<u8>,
    pub payload: Vec<u8>,
    pub nonce: u64,
}

impl BlockDraft {
    pub fn new(index: u64, timestamp: u64, prev_hash: Vec<u8>, payload: Vec<u8>) -> Self {
        Self {
            index,
            timestamp,
            prev_hash,
            payload,
            nonce: 0,
        }
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_bytes(
            self.index,
            self.timestamp,
            &self.prev_hash,
            &self.payload,
            self.nonce,
        )
    }

    pub fn hash(&self) -> Hash {
        sha256(&self.canonical_bytes())
    }

    /// Seal without a proof-of-work search, taking whatever hash the current
    /// fields produce. This is the genesis path.
    pub fn seal_unchecked(self) -> Block {
        let hash = self.hash();
        self.sealed_with(hash)
    }

    pub(crate) fn sealed_with(self, hash: Hash) -> Block {
        Block {
            index: self.index,
            timestamp: self.timestamp,
            prev_hash: self.prev_hash,
            payload: self.payload,
            nonce: self.nonce,
            hash,
        }
    }
}

/// A sealed block. `prev_hash` is empty only for genesis; `hash` is the
/// SHA-256 digest of the canonical encoding of the other five fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: u64,
    pub prev_hash: Vec<u8>,
    pub payload: Vec<u8>,
    pub nonce: u64,
    pub hash: Hash,
}

impl Block {
    /// Re-derive the hash from the stored fields, ignoring the stored `hash`.
    pub fn recompute_hash(&self) -> Hash {
        sha256(&canonical_bytes(
            self.index,
            self.timestamp,
            &self.prev_hash,
            &self.payload,
            self.nonce,
        ))
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

pub mod pow {
    use super::{Block, BlockDraft, Hash};
    use crate::constants::CANCEL_CHECK_INTERVAL;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Leading-zero-byte difficulty predicate over a block hash. `NONE`
    /// (zero bytes) admits every hash, so sealing finishes on the first try.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Difficulty {
        zero_bytes: usize,
    }

    impl Difficulty {
        pub const NONE: Difficulty = Difficulty { zero_bytes: 0 };

        pub fn leading_zero_bytes(zero_bytes: usize) -> Self {
            Self { zero_bytes }
        }

        pub fn zero_bytes(&self) -> usize {
            self.zero_bytes
        }

        pub fn met_by(&self, hash: &Hash) -> bool {
            hash.iter().take(self.zero_bytes).all(|b| *b == 0)
        }
    }

    /// Shared flag for aborting a running seal. Cloning hands out another
    /// handle to the same flag.
    #[derive(Clone, Debug, Default)]
    pub struct CancelToken(Arc<AtomicBool>);

    impl CancelToken {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn cancel(&self) {
            self.0.store(true, Ordering::Relaxed);
        }

        pub fn is_cancelled(&self) -> bool {
            self.0.load(Ordering::Relaxed)
        }
    }

    /// Result of a cancellable seal. `Cancelled` hands the draft back with
    /// its last tried nonce, so the search can be resumed where it stopped.
    #[derive(Debug)]
    pub enum SealOutcome {
        Sealed(Block),
        Cancelled(BlockDraft),
    }

    /// Seal the draft by incrementing the nonce until its hash satisfies
    /// `difficulty`. Blocking and unbounded: expected attempts grow by a
    /// factor of 256 per required zero byte.
    pub fn seal(mut draft: BlockDraft, difficulty: Difficulty) -> Block {
        loop {
            let hash = draft.hash();
            if difficulty.met_by(&hash) {
                return draft.sealed_with(hash);
            }
            draft.nonce = draft.nonce.wrapping_add(1);
        }
    }

    /// Same search as [`seal`], but checks `cancel` every
    /// `CANCEL_CHECK_INTERVAL` attempts and returns the unfinished draft
    /// instead of spinning forever.
    pub fn seal_cancellable(
        mut draft: BlockDraft,
        difficulty: Difficulty,
        cancel: &CancelToken,
    ) -> SealOutcome {
        let mut attempts: u64 = 0;
        loop {
            if attempts % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return SealOutcome::Cancelled(draft);
            }
            let hash = draft.hash();
            if difficulty.met_by(&hash) {
                return SealOutcome::Sealed(draft.sealed_with(hash));
            }
            draft.nonce = draft.nonce.wrapping_add(1);
            attempts += 1;
        }
    }
}

pub mod chain {
    use super::{Block, BlockDraft};
    use crate::clock::Clock;
    use crate::pow::Difficulty;
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum ChainError {
        #[error("block {index}: prev_hash does not match predecessor hash")]
        LinkMismatch { index: u64 },
        #[error("block {index}: stored hash does not match recomputed hash")]
        HashMismatch { index: u64 },
    }

    /// Append-only sequence of sealed blocks, genesis first.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct Chain {
        blocks: Vec<Block>,
    }

    impl Chain {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_genesis<C: Clock>(payload: impl Into<Vec<u8>>, clock: &C) -> Self {
            Self {
                blocks: vec![genesis_block(payload, clock)],
            }
        }

        /// Audit an externally assembled block sequence.
        pub fn from_blocks(blocks: Vec<Block>) -> Self {
            Self { blocks }
        }

        pub fn push(&mut self, block: Block) {
            self.blocks.push(block);
        }

        pub fn tip(&self) -> Option<&Block> {
            self.blocks.last()
        }

        pub fn blocks(&self) -> &[Block] {
            &self.blocks
        }

        pub fn len(&self) -> usize {
            self.blocks.len()
        }

        pub fn is_empty(&self) -> bool {
            self.blocks.is_empty()
        }

        /// Walk adjacent pairs checking link integrity and hash correctness.
        /// Vacuously ok for a chain of length 0 or 1. Does not re-check the
        /// difficulty predicate; see [`Chain::satisfies_difficulty`].
        pub fn validate(&self) -> Result<(), ChainError> {
            for pair in self.blocks.windows(2) {
                let (prev, current) = (&pair[0], &pair[1]);
                if current.prev_hash.as_slice() != prev.hash {
                    return Err(ChainError::LinkMismatch {
                        index: current.index,
                    });
                }
                if current.recompute_hash() != current.hash {
                    return Err(ChainError::HashMismatch {
                        index: current.index,
                    });
                }
            }
            Ok(())
        }

        pub fn is_valid(&self) -> bool {
            self.validate().is_ok()
        }

        /// Optional strengthening over [`Chain::validate`]: check that every
        /// non-genesis hash meets `difficulty`. Genesis is exempt because it
        /// is sealed without a proof-of-work search.
        pub fn satisfies_difficulty(&self, difficulty: Difficulty) -> bool {
            self.blocks
                .iter()
                .skip(1)
                .all(|b| difficulty.met_by(&b.hash))
        }
    }

    /// The index-0 block: empty prev_hash, nonce 0, hash computed directly
    /// with no difficulty requirement.
    pub fn genesis_block<C: Clock>(payload: impl Into<Vec<u8>>, clock: &C) -> Block {
        BlockDraft::new(0, clock.unix_secs(), Vec::new(), payload.into()).seal_unchecked()
    }
}
