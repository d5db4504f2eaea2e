//! Erased Game interface for runtime polymorphism
//!
//! This trait is the capability the launcher sees: a running engine instance
//! with `apply_input`, `tick`, `snapshot` and `restart`, free of generics so
//! instances can be created by name from the registry. Inputs cross this
//! boundary as the bytes produced by the typed game's input codec.

use crate::snapshot::Snapshot;
use crate::status::{GameStatus, Outcome};
use crate::typed::{Capabilities, EngineId};

/// Runtime error for erased game operations
///
/// Only malformed input bytes end up here. Rejected moves are reported
/// through [`Outcome`], not as errors.
#[derive(Debug, thiserror::Error)]
pub enum ErasedGameError {
    #[error("Decoding error: {0}")]
    Decoding(String),
}

/// Erased game trait: one live engine instance
///
/// # Example Usage
///
/// ```rust
/// # use engine_core::erased::*;
/// fn press_first_input(game: &mut dyn ErasedGame) -> Result<(), ErasedGameError> {
///     let caps = game.capabilities();
///     println!("Driving {}", caps.id.env_id);
///
///     let outcome = game.apply_input(&[0])?;
///     if outcome.is_terminal() {
///         game.restart(42);
///     }
///     println!("{}", game.snapshot());
///     Ok(())
/// }
/// ```
pub trait ErasedGame: Send + Sync + 'static {
    /// Get engine identification information
    fn engine_id(&self) -> EngineId;

    /// Get game capabilities and configuration
    fn capabilities(&self) -> Capabilities;

    /// Discard the current game and start over from a freshly seeded state
    fn restart(&mut self, seed: u64);

    /// Apply one encoded input
    ///
    /// # Errors
    ///
    /// Returns `ErasedGameError::Decoding` if `input` is not a valid encoding
    /// for this game. The state is left untouched in that case.
    fn apply_input(&mut self, input: &[u8]) -> Result<Outcome, ErasedGameError>;

    /// Advance one timer tick; a no-op after the game has ended
    fn tick(&mut self) -> Outcome;

    /// Read-only copy of the current board, score and status
    fn snapshot(&self) -> Snapshot;

    /// Current lifecycle status
    fn status(&self) -> GameStatus;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::BoardShape;

    // Mock implementation for testing
    struct MockErasedGame {
        presses: u32,
    }

    impl ErasedGame for MockErasedGame {
        fn engine_id(&self) -> EngineId {
            EngineId {
                env_id: "mock".to_string(),
                build_id: "0.1.0".to_string(),
            }
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                id: self.engine_id(),
                board: BoardShape { rows: 1, cols: 2 },
                inputs: vec!["press".to_string()],
                tick_interval: None,
            }
        }

        fn restart(&mut self, _seed: u64) {
            self.presses = 0;
        }

        fn apply_input(&mut self, input: &[u8]) -> Result<Outcome, ErasedGameError> {
            if input != [0] {
                return Err(ErasedGameError::Decoding(format!(
                    "Expected [0], got {:?}",
                    input
                )));
            }
            if self.status().is_terminal() {
                return Ok(Outcome::rejected(self.status()));
            }
            self.presses += 1;
            Ok(Outcome::accepted(1, self.status()))
        }

        fn tick(&mut self) -> Outcome {
            Outcome::rejected(self.status())
        }

        fn snapshot(&self) -> Snapshot {
            Snapshot::blank(1, 2, self.presses, self.status())
        }

        fn status(&self) -> GameStatus {
            if self.presses >= 2 {
                GameStatus::Won(None)
            } else {
                GameStatus::InProgress
            }
        }
    }

    #[test]
    fn test_erased_game_through_trait_object() {
        let mut game: Box<dyn ErasedGame> = Box::new(MockErasedGame { presses: 0 });

        assert!(game.apply_input(&[0]).unwrap().accepted);
        let outcome = game.apply_input(&[0]).unwrap();
        assert!(outcome.is_terminal());

        let rejected = game.apply_input(&[0]).unwrap();
        assert!(!rejected.accepted);
        assert_eq!(game.snapshot().score, 2);

        game.restart(1);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.snapshot().score, 0);
    }

    #[test]
    fn test_invalid_input_error() {
        let mut game = MockErasedGame { presses: 0 };

        let result = game.apply_input(&[1, 2, 3]);
        let ErasedGameError::Decoding(msg) = result.unwrap_err();
        assert!(msg.contains("[1, 2, 3]"));
        assert_eq!(game.presses, 0);
    }
}
