//! Falling-blocks game for the grid arcade engine
//!
//! A tetromino falls one row per timer tick. The player shifts, rotates and
//! drops it; when it can fall no further the next tick freezes it into the
//! settled board, full rows are cleared and the queued piece spawns at the
//! top. The game is lost when a freshly spawned piece does not fit.

pub mod pieces;

use std::time::Duration;

use engine_core::typed::{
    check_board, decode_index, encode_index, BoardShape, Capabilities, DecodeError, EncodeError,
    EngineId, Game,
};
use engine_core::{Cell, ConfigError, GameStatus, Outcome, Snapshot};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

pub use pieces::{rotate_shape, Kind, Shape};

/// Points for clearing `lines` rows in one freeze
pub fn line_score(lines: u32) -> u32 {
    100 * lines * lines
}

/// Board and timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockStackConfig {
    pub rows: usize,
    pub cols: usize,
    /// Gravity cadence the external scheduler should tick at
    pub tick_interval: Duration,
}

impl Default for BlockStackConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 10,
            tick_interval: Duration::from_millis(500),
        }
    }
}

impl BlockStackConfig {
    /// Every piece must fit at the spawn anchor of an empty board
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_board(self.rows, self.cols, 2, 4)
    }
}

/// The falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: Kind,
    pub row: i32,
    pub col: i32,
    pub shape: Shape,
}

impl ActivePiece {
    /// Piece at the spawn anchor: top row, horizontally centred
    pub fn spawn(kind: Kind, cols: usize) -> Self {
        Self {
            kind,
            row: 0,
            col: cols as i32 / 2 - 2,
            shape: kind.shape(),
        }
    }

    /// Absolute `(row, col)` of each block
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.iter().map(move |&(r, c)| (self.row + r, self.col + c))
    }

    fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            row: self.row + dy,
            col: self.col + dx,
            ..*self
        }
    }

    fn rotated(&self) -> Self {
        Self {
            shape: rotate_shape(&self.shape),
            ..*self
        }
    }
}

/// What one gravity step did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// The piece fell one row
    pub moved: bool,
    /// The piece could not fall and was frozen into the board
    pub locked: bool,
    pub lines: u32,
    pub score_delta: u32,
}

/// Block-stack game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    rows: usize,
    cols: usize,
    /// Settled cells, `board[row][col]`
    board: Vec<Vec<Option<Kind>>>,
    active: ActivePiece,
    next: Kind,
    score: u32,
    lines_cleared: u32,
    status: GameStatus,
}

impl State {
    /// Empty board with a random active piece and a random queued piece
    pub fn new<R: Rng + ?Sized>(config: &BlockStackConfig, rng: &mut R) -> Self {
        let active = Kind::random(rng);
        let next = Kind::random(rng);
        Self::from_parts(config.rows, config.cols, Vec::new(), active, next)
    }

    /// State with explicit settled rows and pieces
    ///
    /// `settled` is laid against the bottom of the board, one string per row
    /// with `.` for empty and a piece letter otherwise. `active` spawns at the
    /// usual anchor and the game is lost immediately if it does not fit.
    pub fn from_parts(rows: usize, cols: usize, settled: Vec<&str>, active: Kind, next: Kind) -> Self {
        let mut board = vec![vec![None; cols]; rows];
        let offset = rows.saturating_sub(settled.len());
        for (i, line) in settled.iter().take(rows).enumerate() {
            for (col, ch) in line.chars().take(cols).enumerate() {
                board[offset + i][col] = Kind::from_letter(ch);
            }
        }

        let mut state = Self {
            rows,
            cols,
            board,
            active: ActivePiece::spawn(active, cols),
            next,
            score: 0,
            lines_cleared: 0,
            status: GameStatus::InProgress,
        };
        if !state.fits(&state.active) {
            state.status = GameStatus::Lost;
        }
        state
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn settled(&self, row: usize, col: usize) -> Option<Kind> {
        self.board.get(row).and_then(|line| line.get(col)).copied().flatten()
    }

    pub fn active(&self) -> &ActivePiece {
        &self.active
    }

    pub fn next(&self) -> Kind {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Total rows cleared this game
    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Columns inside the board, rows below the floor, and no settled overlap
    ///
    /// Rows above the top are allowed so a piece can spawn partly hidden.
    fn fits(&self, piece: &ActivePiece) -> bool {
        piece.cells().all(|(row, col)| {
            if col < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
                return false;
            }
            row < 0 || self.board[row as usize][col as usize].is_none()
        })
    }

    /// Try to translate the active piece
    pub fn move_piece(&self, dx: i32, dy: i32) -> (State, bool) {
        if self.is_terminal() {
            return (self.clone(), false);
        }
        let moved = self.active.shifted(dx, dy);
        if !self.fits(&moved) {
            return (self.clone(), false);
        }
        let mut next = self.clone();
        next.active = moved;
        (next, true)
    }

    /// Try to rotate the active piece a quarter turn, keeping it unchanged on collision
    pub fn rotate(&self) -> (State, bool) {
        if self.is_terminal() {
            return (self.clone(), false);
        }
        let rotated = self.active.rotated();
        if !self.fits(&rotated) {
            return (self.clone(), false);
        }
        let mut next = self.clone();
        next.active = rotated;
        (next, true)
    }

    /// Move the active piece down as far as it goes
    ///
    /// Returns the number of rows descended. The piece is not frozen; the
    /// next tick does that.
    pub fn drop(&self) -> (State, u32) {
        let mut state = self.clone();
        let mut rows = 0;
        loop {
            let (next, moved) = state.move_piece(0, 1);
            if !moved {
                return (state, rows);
            }
            state = next;
            rows += 1;
        }
    }

    /// Gravity step: fall one row, or freeze, clear lines and spawn the next piece
    pub fn tick<R: Rng + ?Sized>(&self, rng: &mut R) -> (State, TickReport) {
        if self.is_terminal() {
            return (self.clone(), TickReport::default());
        }

        let (fallen, moved) = self.move_piece(0, 1);
        if moved {
            return (
                fallen,
                TickReport {
                    moved: true,
                    ..TickReport::default()
                },
            );
        }

        let mut next = self.clone();
        next.freeze();
        let lines = next.clear_lines();
        let score_delta = line_score(lines);
        next.score += score_delta;
        next.lines_cleared += lines;

        next.active = ActivePiece::spawn(next.next, next.cols);
        next.next = Kind::random(rng);
        if !next.fits(&next.active) {
            next.status = GameStatus::Lost;
        }

        (
            next,
            TickReport {
                moved: false,
                locked: true,
                lines,
                score_delta,
            },
        )
    }

    /// Write the active piece into the board; blocks above the top are lost
    fn freeze(&mut self) {
        let kind = self.active.kind;
        let cells: Vec<(i32, i32)> = self.active.cells().collect();
        for (row, col) in cells {
            if row >= 0 {
                self.board[row as usize][col as usize] = Some(kind);
            }
        }
    }

    /// Remove full rows, shifting everything above down; returns the count
    fn clear_lines(&mut self) -> u32 {
        let mut compacted = vec![vec![None; self.cols]; self.rows];
        let mut write_row = self.rows;
        let mut cleared = 0;

        for row in self.board.iter().rev() {
            if row.iter().all(Option::is_some) {
                cleared += 1;
                continue;
            }
            write_row -= 1;
            compacted[write_row] = row.clone();
        }

        self.board = compacted;
        cleared
    }
}

/// Player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left = 0,
    Right = 1,
    Down = 2,
    Rotate = 3,
    Drop = 4,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Left,
        Action::Right,
        Action::Down,
        Action::Rotate,
        Action::Drop,
    ];

    pub fn from_index(index: u8) -> Option<Action> {
        Action::ALL.get(index as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Down => "down",
            Action::Rotate => "rotate",
            Action::Drop => "drop",
        }
    }
}

/// Block-stack game implementation
#[derive(Debug, Default)]
pub struct BlockStack {
    config: BlockStackConfig,
}

impl BlockStack {
    pub fn new(config: BlockStackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BlockStackConfig {
        &self.config
    }
}

impl Game for BlockStack {
    type State = State;
    type Input = Action;

    fn engine_id(&self) -> EngineId {
        EngineId {
            env_id: "block_stack".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.engine_id(),
            board: BoardShape {
                rows: self.config.rows,
                cols: self.config.cols,
            },
            inputs: Action::ALL.iter().map(|a| a.name().to_string()).collect(),
            tick_interval: Some(self.config.tick_interval),
        }
    }

    fn reset(&self, rng: &mut ChaCha20Rng) -> Self::State {
        State::new(&self.config, rng)
    }

    fn apply_input(
        &self,
        state: &Self::State,
        input: Self::Input,
        _rng: &mut ChaCha20Rng,
    ) -> (Self::State, Outcome) {
        let (next, accepted) = match input {
            Action::Left => state.move_piece(-1, 0),
            Action::Right => state.move_piece(1, 0),
            Action::Down => state.move_piece(0, 1),
            Action::Rotate => state.rotate(),
            Action::Drop => {
                let (next, rows) = state.drop();
                (next, rows > 0)
            }
        };
        let outcome = if accepted {
            Outcome::accepted(0, next.status)
        } else {
            Outcome::rejected(next.status)
        };
        (next, outcome)
    }

    fn tick(&self, state: &Self::State, rng: &mut ChaCha20Rng) -> (Self::State, Outcome) {
        if state.is_terminal() {
            return (state.clone(), Outcome::rejected(state.status));
        }
        let (next, report) = state.tick(rng);
        let outcome = Outcome::accepted(report.score_delta, next.status);
        (next, outcome)
    }

    fn status(state: &Self::State) -> GameStatus {
        state.status
    }

    fn snapshot(&self, state: &Self::State) -> Snapshot {
        let mut snapshot = Snapshot::blank(state.rows, state.cols, state.score, state.status);
        for (row, line) in state.board.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                if let Some(kind) = cell {
                    snapshot.set(row, col, Cell::Block(kind.letter()));
                }
            }
        }
        if !state.is_terminal() {
            let letter = state.active.kind.letter();
            for (row, col) in state.active.cells().filter(|&(row, _)| row >= 0) {
                snapshot.set(row as usize, col as usize, Cell::Block(letter));
            }
        }
        snapshot.next = Some(state.next.letter());
        snapshot
    }

    fn encode_input(input: &Self::Input, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_index(*input as u8, Action::ALL.len() as u8, out)
    }

    fn decode_input(buf: &[u8]) -> Result<Self::Input, DecodeError> {
        let index = decode_index(buf, Action::ALL.len() as u8)?;
        Action::from_index(index)
            .ok_or_else(|| DecodeError::CorruptedData(format!("Invalid action: {}", index)))
    }
}
