use crate::clock::{Clock, SystemClock};
use crate::pow::{self, CancelToken, Difficulty, SealOutcome};
use crate::{Block, BlockDraft};
use tracing::info;

/// Builds the next block on a chain tip and seals it through the
/// proof-of-work search. Holds the difficulty and the time source so
/// callers configure both once.
#[derive(Clone, Copy, Debug)]
pub struct BlockFactory<C: Clock = SystemClock> {
    difficulty: Difficulty,
    clock: C,
}

impl BlockFactory<SystemClock> {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_clock(difficulty, SystemClock)
    }
}

impl<C: Clock> BlockFactory<C> {
    pub fn with_clock(difficulty: Difficulty, clock: C) -> Self {
        Self { difficulty, clock }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Seal the successor of `prev`. Blocking and unbounded in latency;
    /// `prev` must already be sealed.
    pub fn create_block(&self, prev: &Block, payload: impl Into<Vec<u8>>) -> Block {
        let block = pow::seal(self.draft(prev, payload.into()), self.difficulty);
        info!(
            "sealed block {} with nonce {} and hash {}",
            block.index,
            block.nonce,
            block.hash_hex()
        );
        block
    }

    /// Cancellable form of [`BlockFactory::create_block`]. A cancelled
    /// search returns the draft with its last tried nonce.
    pub fn try_create_block(
        &self,
        prev: &Block,
        payload: impl Into<Vec<u8>>,
        cancel: &CancelToken,
    ) -> SealOutcome {
        let outcome =
            pow::seal_cancellable(self.draft(prev, payload.into()), self.difficulty, cancel);
        match &outcome {
            SealOutcome::Sealed(block) => info!(
                "sealed block {} with nonce {} and hash {}",
                block.index,
                block.nonce,
                block.hash_hex()
            ),
            SealOutcome::Cancelled(draft) => info!(
                "seal of block {} cancelled at nonce {}",
                draft.index, draft.nonce
            ),
        }
        outcome
    }

    fn draft(&self, prev: &Block, payload: Vec<u8>) -> BlockDraft {
        BlockDraft::new(
            prev.index + 1,
            self.clock.unix_secs(),
            prev.hash.to_vec(),
            payload,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::genesis_block;
    use crate::clock::FixedClock;

    #[test]
    fn factory_links_and_numbers_the_new_block() {
        let factory = BlockFactory::with_clock(Difficulty::NONE, FixedClock(1_600_000_042));
        let genesis = genesis_block("Genesis Block", &FixedClock(1_600_000_000));
        let block = factory.create_block(&genesis, b"payload".as_slice());
        assert_eq!(block.index, 1);
        assert_eq!(block.timestamp, 1_600_000_042);
        assert_eq!(block.prev_hash.as_slice(), genesis.hash);
        assert_eq!(block.payload, b"payload");
    }
}
