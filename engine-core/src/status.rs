//! Game status and transition outcome types shared by every engine
//!
//! Every transition reports one of three shapes: rejected (nothing changed),
//! accepted and still in progress, or accepted and terminal. None of these are
//! errors; they are ordinary values the caller inspects.

use serde::{Deserialize, Serialize};

/// One of the two sides in a turn-based game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Moves first
    A,
    /// Moves second
    B,
}

impl Player {
    /// The player who moves after this one
    pub fn other(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Conventional board symbol for this player
    pub fn symbol(self) -> char {
        match self {
            Player::A => 'X',
            Player::B => 'O',
        }
    }
}

/// Lifecycle status of a game
///
/// Anything other than `InProgress` is terminal: engines reject every mutating
/// transition until restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    /// `None` when the game is won without a specific player (a solo game
    /// reaching its completion condition)
    Won(Option<Player>),
    Lost,
    Draw,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Game-agnostic result of a single transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the transition mutated the state
    pub accepted: bool,
    /// Points earned by this transition
    pub score_delta: u32,
    /// Status after the transition
    pub status: GameStatus,
}

impl Outcome {
    /// A transition that left the state untouched
    pub fn rejected(status: GameStatus) -> Self {
        Self {
            accepted: false,
            score_delta: 0,
            status,
        }
    }

    /// A transition that mutated the state
    pub fn accepted(score_delta: u32, status: GameStatus) -> Self {
        Self {
            accepted: true,
            score_delta,
            status,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_alternates() {
        assert_eq!(Player::A.other(), Player::B);
        assert_eq!(Player::B.other(), Player::A);
        assert_eq!(Player::A.symbol(), 'X');
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!GameStatus::InProgress.is_terminal());
        assert!(GameStatus::Lost.is_terminal());
        assert!(GameStatus::Draw.is_terminal());
        assert!(GameStatus::Won(None).is_terminal());
        assert!(GameStatus::Won(Some(Player::B)).is_terminal());
        assert_eq!(GameStatus::default(), GameStatus::InProgress);
    }

    #[test]
    fn test_outcome_constructors() {
        let rejected = Outcome::rejected(GameStatus::InProgress);
        assert!(!rejected.accepted);
        assert_eq!(rejected.score_delta, 0);
        assert!(!rejected.is_terminal());

        let accepted = Outcome::accepted(400, GameStatus::Lost);
        assert!(accepted.accepted);
        assert_eq!(accepted.score_delta, 400);
        assert!(accepted.is_terminal());
    }
}
