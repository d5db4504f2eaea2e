//! Three-in-a-row game for the grid arcade engine
//!
//! Two players alternate placing their mark on a 3x3 board. The first to fill
//! a row, column or diagonal wins; a full board without a line is a draw.

use engine_core::typed::{
    decode_index, encode_index, BoardShape, Capabilities, DecodeError, EncodeError, EngineId, Game,
};
use engine_core::{Cell, GameStatus, Outcome, Player, Snapshot};
use rand_chacha::ChaCha20Rng;

/// Board side length
pub const SIZE: usize = 3;

/// Winning lines as cell indices (rows, columns, diagonals)
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of one `place`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaceResult {
    pub accepted: bool,
    pub winner: Option<Player>,
    pub draw: bool,
    /// Completed line as `(row, col)` cells when the move won
    pub line: Option<[(usize, usize); 3]>,
}

/// Mark-grid game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    board: [Option<Player>; SIZE * SIZE],
    current_player: Player,
    status: GameStatus,
    winning_line: Option<[usize; 3]>,
}

impl State {
    /// Empty board, player A to move
    pub fn new() -> Self {
        Self {
            board: [None; SIZE * SIZE],
            current_player: Player::A,
            status: GameStatus::InProgress,
            winning_line: None,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        if row >= SIZE || col >= SIZE {
            return None;
        }
        self.board[row * SIZE + col]
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Winning line as `(row, col)` cells, once someone has won
    pub fn winning_line(&self) -> Option<[(usize, usize); 3]> {
        self.winning_line.map(|line| line.map(to_row_col))
    }

    /// Empty cells as `(row, col)`, or nothing once the game is over
    pub fn legal_moves(&self) -> Vec<(usize, usize)> {
        if self.is_terminal() {
            return Vec::new();
        }
        (0..SIZE * SIZE)
            .filter(|&pos| self.board[pos].is_none())
            .map(to_row_col)
            .collect()
    }

    /// Mark `(row, col)` for the player to move
    pub fn place(&self, row: usize, col: usize) -> (State, PlaceResult) {
        if self.is_terminal() || row >= SIZE || col >= SIZE || self.board[row * SIZE + col].is_some() {
            return (*self, PlaceResult::default());
        }

        let mover = self.current_player;
        let mut next = *self;
        next.board[row * SIZE + col] = Some(mover);

        if let Some(line) = LINES
            .iter()
            .find(|line| line.iter().all(|&pos| next.board[pos] == Some(mover)))
        {
            next.status = GameStatus::Won(Some(mover));
            next.winning_line = Some(*line);
            return (
                next,
                PlaceResult {
                    accepted: true,
                    winner: Some(mover),
                    draw: false,
                    line: next.winning_line(),
                },
            );
        }

        if next.board.iter().all(Option::is_some) {
            next.status = GameStatus::Draw;
            return (
                next,
                PlaceResult {
                    accepted: true,
                    draw: true,
                    ..PlaceResult::default()
                },
            );
        }

        next.current_player = mover.other();
        (
            next,
            PlaceResult {
                accepted: true,
                ..PlaceResult::default()
            },
        )
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

fn to_row_col(pos: usize) -> (usize, usize) {
    (pos / SIZE, pos % SIZE)
}

/// Place a mark at board position `row * 3 + col`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Place(pub u8);

impl Place {
    pub fn at(row: usize, col: usize) -> Self {
        Place((row * SIZE + col) as u8)
    }

    pub fn row_col(self) -> (usize, usize) {
        to_row_col(self.0 as usize)
    }
}

/// Mark-grid game implementation
#[derive(Debug, Default)]
pub struct MarkGrid;

impl MarkGrid {
    pub fn new() -> Self {
        Self
    }
}

impl Game for MarkGrid {
    type State = State;
    type Input = Place;

    fn engine_id(&self) -> EngineId {
        EngineId {
            env_id: "mark_grid".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.engine_id(),
            board: BoardShape {
                rows: SIZE,
                cols: SIZE,
            },
            inputs: (0..SIZE * SIZE)
                .map(|pos| {
                    let (row, col) = to_row_col(pos);
                    format!("place_{}_{}", row, col)
                })
                .collect(),
            tick_interval: None,
        }
    }

    fn reset(&self, _rng: &mut ChaCha20Rng) -> Self::State {
        State::new()
    }

    fn apply_input(
        &self,
        state: &Self::State,
        input: Self::Input,
        _rng: &mut ChaCha20Rng,
    ) -> (Self::State, Outcome) {
        let (row, col) = input.row_col();
        let (next, result) = state.place(row, col);
        let outcome = if result.accepted {
            Outcome::accepted(0, next.status)
        } else {
            Outcome::rejected(next.status)
        };
        (next, outcome)
    }

    fn status(state: &Self::State) -> GameStatus {
        state.status
    }

    fn snapshot(&self, state: &Self::State) -> Snapshot {
        let mut snapshot = Snapshot::blank(SIZE, SIZE, 0, state.status);
        for (pos, mark) in state.board.iter().enumerate() {
            if let Some(player) = mark {
                let (row, col) = to_row_col(pos);
                snapshot.set(row, col, Cell::Mark(*player));
            }
        }
        if let Some(line) = state.winning_line() {
            snapshot.highlight = line.to_vec();
        }
        snapshot
    }

    fn encode_input(input: &Self::Input, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_index(input.0, (SIZE * SIZE) as u8, out)
    }

    fn decode_input(buf: &[u8]) -> Result<Self::Input, DecodeError> {
        decode_index(buf, (SIZE * SIZE) as u8).map(Place)
    }
}
