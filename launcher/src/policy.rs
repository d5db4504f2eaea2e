use anyhow::{anyhow, Result};
use engine_core::{Capabilities, Snapshot};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;

/// Trait for input selection policies
pub trait Policy: Send {
    /// Select an encoded input given the current board
    fn select_input(&mut self, snapshot: &Snapshot) -> Result<Vec<u8>>;
}

/// Random policy that picks one of the game's inputs uniformly
pub struct RandomPolicy {
    rng: ChaCha20Rng,
    input_count: u8,
}

impl RandomPolicy {
    pub fn new(capabilities: &Capabilities, seed: u64) -> Result<Self> {
        let count = capabilities.input_count();
        if count == 0 {
            return Err(anyhow!("{} declares no inputs", capabilities.id.env_id));
        }
        let input_count = u8::try_from(count)
            .map_err(|_| anyhow!("{} declares {} inputs; at most 255 fit one byte", capabilities.id.env_id, count))?;

        Ok(Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            input_count,
        })
    }
}

impl Policy for RandomPolicy {
    fn select_input(&mut self, _snapshot: &Snapshot) -> Result<Vec<u8>> {
        Ok(vec![self.rng.gen_range(0..self.input_count)])
    }
}
