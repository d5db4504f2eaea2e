//! Typed Game trait providing the ergonomic interface for game implementations
//!
//! Game crates work with strongly-typed state and input values. Transitions are
//! value-in/value-out: a transition borrows the current state and returns the
//! next one together with an [`Outcome`], so every rule can be exercised
//! without an engine instance around it.

use std::time::Duration;

use rand_chacha::ChaCha20Rng;

use crate::snapshot::Snapshot;
use crate::status::{GameStatus, Outcome};

/// Engine identification information
#[derive(Debug, Clone, PartialEq)]
pub struct EngineId {
    pub env_id: String,
    pub build_id: String,
}

/// Board dimensions as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardShape {
    pub rows: usize,
    pub cols: usize,
}

/// Game capabilities and configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    pub id: EngineId,
    pub board: BoardShape,
    /// Input names in encoding order; an input is encoded as its index here
    pub inputs: Vec<String>,
    /// Gravity/movement cadence for games driven by an external timer
    pub tick_interval: Option<Duration>,
}

impl Capabilities {
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Index of the named input, if the game accepts it
    pub fn input_index(&self, name: &str) -> Option<u8> {
        self.inputs
            .iter()
            .position(|input| input == name)
            .and_then(|index| u8::try_from(index).ok())
    }

    pub fn is_timed(&self) -> bool {
        self.tick_interval.is_some()
    }
}

/// Main trait for game implementations
///
/// # Type Parameters
///
/// * `State` - Complete game state: board, score, status and any queued pieces
/// * `Input` - One player intent, small and `Copy`
///
/// # Example
///
/// ```rust
/// # use engine_core::typed::*;
/// # use engine_core::{GameStatus, Outcome, Snapshot};
/// # use rand_chacha::ChaCha20Rng;
/// #[derive(Clone)]
/// struct Counter {
///     value: u32,
/// }
///
/// struct CountToThree;
///
/// impl Game for CountToThree {
///     type State = Counter;
///     type Input = ();
///
///     fn engine_id(&self) -> EngineId {
///         EngineId { env_id: "count".to_string(), build_id: "0.1.0".to_string() }
///     }
///
///     fn capabilities(&self) -> Capabilities {
///         Capabilities {
///             id: self.engine_id(),
///             board: BoardShape { rows: 1, cols: 1 },
///             inputs: vec!["bump".to_string()],
///             tick_interval: None,
///         }
///     }
///
///     fn reset(&self, _rng: &mut ChaCha20Rng) -> Counter {
///         Counter { value: 0 }
///     }
///
///     fn apply_input(&self, state: &Counter, _input: (), _rng: &mut ChaCha20Rng) -> (Counter, Outcome) {
///         let next = Counter { value: state.value + 1 };
///         let status = Self::status(&next);
///         (next, Outcome::accepted(1, status))
///     }
///
///     fn status(state: &Counter) -> GameStatus {
///         if state.value >= 3 { GameStatus::Won(None) } else { GameStatus::InProgress }
///     }
///
///     fn snapshot(&self, state: &Counter) -> Snapshot {
///         Snapshot::blank(1, 1, state.value, Self::status(state))
///     }
///
///     fn encode_input(_input: &(), out: &mut Vec<u8>) -> Result<(), EncodeError> {
///         out.push(0);
///         Ok(())
///     }
///
///     fn decode_input(_buf: &[u8]) -> Result<(), DecodeError> {
///         Ok(())
///     }
/// }
/// ```
pub trait Game: Send + Sync + 'static {
    /// Game state type, cloned on every transition
    type State: Clone + Send + Sync + 'static;

    /// Input type, one per external event
    type Input: Copy + Send + Sync + 'static;

    /// Get engine identification information
    fn engine_id(&self) -> EngineId;

    /// Get game capabilities and configuration
    fn capabilities(&self) -> Capabilities;

    /// Build a fresh initial state
    ///
    /// # Arguments
    ///
    /// * `rng` - Deterministic random number generator for reproducible layouts
    fn reset(&self, rng: &mut ChaCha20Rng) -> Self::State;

    /// Apply one player input
    ///
    /// Rejected inputs return an unchanged copy of `state` and an outcome with
    /// `accepted == false`. Terminal states reject everything.
    fn apply_input(
        &self,
        state: &Self::State,
        input: Self::Input,
        rng: &mut ChaCha20Rng,
    ) -> (Self::State, Outcome);

    /// Advance one timer tick
    ///
    /// Untimed games keep the default, which never mutates.
    fn tick(&self, state: &Self::State, _rng: &mut ChaCha20Rng) -> (Self::State, Outcome) {
        (state.clone(), Outcome::rejected(Self::status(state)))
    }

    /// Current lifecycle status of `state`
    fn status(state: &Self::State) -> GameStatus;

    /// Render-ready copy of `state`
    fn snapshot(&self, state: &Self::State) -> Snapshot;

    /// Encode an input to bytes
    fn encode_input(input: &Self::Input, out: &mut Vec<u8>) -> Result<(), EncodeError>;

    /// Decode an input from bytes
    fn decode_input(buf: &[u8]) -> Result<Self::Input, DecodeError>;
}

/// Encode a single-byte input index, checking it against the input count
pub fn encode_index(index: u8, count: u8, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    if index >= count {
        return Err(EncodeError::InvalidData(format!(
            "Input index {} out of range (0..{})",
            index, count
        )));
    }
    out.push(index);
    Ok(())
}

/// Decode a single-byte input index, checking it against the input count
pub fn decode_index(buf: &[u8], count: u8) -> Result<u8, DecodeError> {
    if buf.len() != 1 {
        return Err(DecodeError::InvalidLength {
            expected: 1,
            actual: buf.len(),
        });
    }
    let index = buf[0];
    if index >= count {
        return Err(DecodeError::CorruptedData(format!(
            "Input index {} out of range (0..{})",
            index, count
        )));
    }
    Ok(index)
}

/// Error type for encoding operations
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Error type for decoding operations
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid buffer length: expected {expected} but got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Corrupted data: {0}")]
    CorruptedData(String),
}

/// Error type for rejected construction parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Board dimensions must be positive, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },
    #[error("Board {rows}x{cols} is smaller than the minimum {min_rows}x{min_cols}")]
    BoardTooSmall {
        rows: usize,
        cols: usize,
        min_rows: usize,
        min_cols: usize,
    },
    #[error("Start position ({x}, {y}) lies outside the {cols}x{rows} board")]
    StartOutOfBounds {
        x: i32,
        y: i32,
        cols: usize,
        rows: usize,
    },
}

/// Check that a board is at least `min_rows` x `min_cols`
pub fn check_board(
    rows: usize,
    cols: usize,
    min_rows: usize,
    min_cols: usize,
) -> Result<(), ConfigError> {
    if rows == 0 || cols == 0 {
        return Err(ConfigError::EmptyBoard { rows, cols });
    }
    if rows < min_rows || cols < min_cols {
        return Err(ConfigError::BoardTooSmall {
            rows,
            cols,
            min_rows,
            min_cols,
        });
    }
    Ok(())
}
