//! Adapter layer turning a typed game into a live engine instance
//!
//! `GameAdapter` owns the game's rules, its current state and the seeded RNG,
//! and exposes them through the `ErasedGame` interface. It is the only place
//! where transition results are committed back into stored state.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::erased::{ErasedGame, ErasedGameError};
use crate::snapshot::Snapshot;
use crate::status::{GameStatus, Outcome};
use crate::typed::{Capabilities, EngineId, Game};

/// Engine instance wrapping a typed game
///
/// Construction runs the game's reset with a ChaCha20 RNG seeded from `seed`,
/// so two adapters built with the same seed replay identically given the same
/// inputs and ticks.
///
/// # Example
///
/// ```rust
/// # use engine_core::typed::*;
/// # use engine_core::{GameAdapter, ErasedGame, GameStatus, Outcome, Snapshot};
/// # use rand_chacha::ChaCha20Rng;
/// # struct Noop;
/// # impl Game for Noop {
/// #     type State = u32;
/// #     type Input = u8;
/// #     fn engine_id(&self) -> EngineId { EngineId { env_id: "noop".into(), build_id: "0".into() } }
/// #     fn capabilities(&self) -> Capabilities { todo!() }
/// #     fn reset(&self, _rng: &mut ChaCha20Rng) -> u32 { 0 }
/// #     fn apply_input(&self, s: &u32, i: u8, _rng: &mut ChaCha20Rng) -> (u32, Outcome) { (s + i as u32, Outcome::accepted(0, GameStatus::InProgress)) }
/// #     fn status(_s: &u32) -> GameStatus { GameStatus::InProgress }
/// #     fn snapshot(&self, s: &u32) -> Snapshot { Snapshot::blank(1, 1, *s, GameStatus::InProgress) }
/// #     fn encode_input(i: &u8, out: &mut Vec<u8>) -> Result<(), EncodeError> { out.push(*i); Ok(()) }
/// #     fn decode_input(buf: &[u8]) -> Result<u8, DecodeError> { decode_index(buf, 4) }
/// # }
/// let mut engine: Box<dyn ErasedGame> = Box::new(GameAdapter::new(Noop, 42));
/// engine.apply_input(&[3]).unwrap();
/// assert_eq!(engine.snapshot().score, 3);
/// ```
pub struct GameAdapter<T: Game> {
    game: T,
    state: T::State,
    rng: ChaCha20Rng,
    seed: u64,
}

impl<T: Game> GameAdapter<T> {
    /// Create a new engine instance seeded with `seed`
    pub fn new(game: T, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let state = game.reset(&mut rng);
        Self {
            game,
            state,
            rng,
            seed,
        }
    }

    /// Get a reference to the underlying game rules
    pub fn game(&self) -> &T {
        &self.game
    }

    /// Get a reference to the current typed state
    pub fn state(&self) -> &T::State {
        &self.state
    }

    /// Seed used for the current game
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Apply a typed input
    pub fn apply(&mut self, input: T::Input) -> Outcome {
        let status = T::status(&self.state);
        if status.is_terminal() {
            return Outcome::rejected(status);
        }
        let (next, outcome) = self.game.apply_input(&self.state, input, &mut self.rng);
        self.commit(next, outcome)
    }

    /// Advance one timer tick
    pub fn advance(&mut self) -> Outcome {
        let status = T::status(&self.state);
        if status.is_terminal() {
            return Outcome::rejected(status);
        }
        let (next, outcome) = self.game.tick(&self.state, &mut self.rng);
        self.commit(next, outcome)
    }

    /// Consume the adapter and return the underlying game rules
    pub fn into_inner(self) -> T {
        self.game
    }

    fn commit(&mut self, next: T::State, outcome: Outcome) -> Outcome {
        if outcome.accepted {
            self.state = next;
            if outcome.is_terminal() {
                debug!(
                    env_id = %self.game.engine_id().env_id,
                    status = ?outcome.status,
                    "game reached terminal status"
                );
            }
        }
        outcome
    }
}

impl<T: Game> ErasedGame for GameAdapter<T> {
    fn engine_id(&self) -> EngineId {
        self.game.engine_id()
    }

    fn capabilities(&self) -> Capabilities {
        self.game.capabilities()
    }

    fn restart(&mut self, seed: u64) {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
        self.seed = seed;
        self.state = self.game.reset(&mut self.rng);
        debug!(env_id = %self.game.engine_id().env_id, seed, "game restarted");
    }

    fn apply_input(&mut self, input: &[u8]) -> Result<Outcome, ErasedGameError> {
        let input = T::decode_input(input).map_err(|e| ErasedGameError::Decoding(e.to_string()))?;
        Ok(self.apply(input))
    }

    fn tick(&mut self) -> Outcome {
        self.advance()
    }

    fn snapshot(&self) -> Snapshot {
        self.game.snapshot(&self.state)
    }

    fn status(&self) -> GameStatus {
        T::status(&self.state)
    }
}
