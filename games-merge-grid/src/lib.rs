//! Merge-puzzle (2048-style) game for the grid arcade engine
//!
//! Tiles on a 4x4 board slide in one of four directions; equal neighbours
//! merge once per move into their sum, which is added to the score. Every move
//! that changes the board spawns a new tile on a random empty cell.

use engine_core::typed::{
    decode_index, encode_index, BoardShape, Capabilities, DecodeError, EncodeError, EngineId, Game,
};
use engine_core::{Cell, Direction, GameStatus, Outcome, Snapshot};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// Board edge length
pub const SIZE: usize = 4;

/// Probability that a spawned tile is a 2 rather than a 4
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Row-major tile values; 0 is empty, anything else a power of two
pub type Board = [[u32; SIZE]; SIZE];

/// Result of one `apply_move`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    /// Whether any tile moved or merged (and a new tile was spawned)
    pub changed: bool,
    /// Sum of all merged tile values in this move
    pub score_delta: u32,
}

/// Compact and merge a single line toward index 0
///
/// Each value merges with its right neighbour at most once and the doubled
/// cell is not compared again in the same pass, so `[2, 2, 2, 0]` becomes
/// `[4, 2, 0, 0]`. Returns the new line and the points earned.
pub fn merge_line(line: [u32; SIZE]) -> ([u32; SIZE], u32) {
    let tiles: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut merged = [0u32; SIZE];
    let mut score = 0;
    let mut write = 0;
    let mut i = 0;

    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
            let sum = tiles[i] * 2;
            merged[write] = sum;
            score += sum;
            i += 2;
        } else {
            merged[write] = tiles[i];
            i += 1;
        }
        write += 1;
    }

    (merged, score)
}

/// Read line `index` oriented so that `direction` points toward slot 0
fn read_line(board: &Board, direction: Direction, index: usize) -> [u32; SIZE] {
    let mut line = [0u32; SIZE];
    for (k, slot) in line.iter_mut().enumerate() {
        let (row, col) = line_cell(direction, index, k);
        *slot = board[row][col];
    }
    line
}

fn write_line(board: &mut Board, direction: Direction, index: usize, line: [u32; SIZE]) {
    for (k, value) in line.into_iter().enumerate() {
        let (row, col) = line_cell(direction, index, k);
        board[row][col] = value;
    }
}

/// Board cell holding position `k` of line `index` when sliding in `direction`
fn line_cell(direction: Direction, index: usize, k: usize) -> (usize, usize) {
    match direction {
        Direction::Left => (index, k),
        Direction::Right => (index, SIZE - 1 - k),
        Direction::Up => (k, index),
        Direction::Down => (SIZE - 1 - k, index),
    }
}

/// Slide every line of `board` in `direction` without spawning
///
/// Returns the new board and the points earned.
pub fn slide(board: &Board, direction: Direction) -> (Board, u32) {
    let mut next = *board;
    let mut score = 0;
    for index in 0..SIZE {
        let (line, points) = merge_line(read_line(board, direction, index));
        write_line(&mut next, direction, index, line);
        score += points;
    }
    (next, score)
}

/// Whether `board` is full and has no equal horizontal or vertical neighbours
pub fn is_stuck(board: &Board) -> bool {
    for row in 0..SIZE {
        for col in 0..SIZE {
            let value = board[row][col];
            if value == 0 {
                return false;
            }
            if col + 1 < SIZE && board[row][col + 1] == value {
                return false;
            }
            if row + 1 < SIZE && board[row + 1][col] == value {
                return false;
            }
        }
    }
    true
}

/// Merge-puzzle game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    board: Board,
    score: u32,
    status: GameStatus,
}

impl State {
    /// Fresh game with two random tiles
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut state = Self::from_board([[0; SIZE]; SIZE]);
        state.spawn_tile(rng);
        state.spawn_tile(rng);
        state
    }

    /// State with an explicit layout, score 0 and still in progress
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            score: 0,
            status: GameStatus::InProgress,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Highest tile on the board
    pub fn max_tile(&self) -> u32 {
        self.board.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Whether some direction would change the board
    pub fn can_move(&self) -> bool {
        !is_stuck(&self.board)
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (row, values) in self.board.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value == 0 {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    /// Slide toward `direction`, spawn a tile if anything changed, and check
    /// for the end of the game
    ///
    /// A move that changes nothing returns an identical state; the terminal
    /// check only runs after a changed move.
    pub fn apply_move<R: Rng + ?Sized>(&self, direction: Direction, rng: &mut R) -> (State, MoveResult) {
        let unchanged = MoveResult {
            changed: false,
            score_delta: 0,
        };
        if self.is_terminal() {
            return (self.clone(), unchanged);
        }

        let (board, score_delta) = slide(&self.board, direction);
        if board == self.board {
            return (self.clone(), unchanged);
        }

        let mut next = State {
            board,
            score: self.score + score_delta,
            status: GameStatus::InProgress,
        };
        next.spawn_tile(rng);
        if is_stuck(&next.board) {
            next.status = GameStatus::Lost;
        }

        (
            next,
            MoveResult {
                changed: true,
                score_delta,
            },
        )
    }

    fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(&(row, col)) = self.empty_cells().choose(rng) {
            self.board[row][col] = if rng.gen::<f64>() < SPAWN_TWO_PROBABILITY { 2 } else { 4 };
        }
    }
}

/// Merge-puzzle game implementation
#[derive(Debug, Default)]
pub struct MergeGrid;

impl MergeGrid {
    pub fn new() -> Self {
        Self
    }
}

impl Game for MergeGrid {
    type State = State;
    type Input = Direction;

    fn engine_id(&self) -> EngineId {
        EngineId {
            env_id: "merge_grid".to_string(),
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
            inputs: Direction::ALL.iter().map(|d| d.name().to_string()).collect(),
            tick_interval: None,
        }
    }

    fn reset(&self, rng: &mut ChaCha20Rng) -> Self::State {
        State::new(rng)
    }

    fn apply_input(
        &self,
        state: &Self::State,
        input: Self::Input,
        rng: &mut ChaCha20Rng,
    ) -> (Self::State, Outcome) {
        let (next, result) = state.apply_move(input, rng);
        let outcome = if result.changed {
            Outcome::accepted(result.score_delta, next.status)
        } else {
            Outcome::rejected(next.status)
        };
        (next, outcome)
    }

    fn status(state: &Self::State) -> GameStatus {
        state.status
    }

    fn snapshot(&self, state: &Self::State) -> Snapshot {
        let mut snapshot = Snapshot::blank(SIZE, SIZE, state.score, state.status);
        for (row, values) in state.board.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value != 0 {
                    snapshot.set(row, col, Cell::Tile(value));
                }
            }
        }
        snapshot
    }

    fn encode_input(input: &Self::Input, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_index(input.index(), 4, out)
    }

    fn decode_input(buf: &[u8]) -> Result<Self::Input, DecodeError> {
        let index = decode_index(buf, 4)?;
        Direction::from_index(index)
            .ok_or_else(|| DecodeError::CorruptedData(format!("Invalid direction: {}", index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{ErasedGame, GameAdapter};
    use rand::SeedableRng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(42)
    }

    fn tile_count(board: &Board) -> usize {
        board.iter().flatten().filter(|&&v| v != 0).count()
    }

    #[test]
    fn test_merge_line_no_chained_merge() {
        assert_eq!(merge_line([2, 2, 2, 0]), ([4, 2, 0, 0], 4));
        assert_eq!(merge_line([4, 4, 8, 0]), ([8, 8, 0, 0], 8));
    }

    #[test]
    fn test_merge_line_pairs() {
        assert_eq!(merge_line([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(merge_line([0, 2, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(merge_line([2, 4, 8, 16]), ([2, 4, 8, 16], 0));
        assert_eq!(merge_line([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
    }

    #[test]
    fn test_slide_right_merges_toward_motion() {
        let board = [[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]];
        let (next, score) = slide(&board, Direction::Right);
        assert_eq!(next[0], [0, 0, 2, 4]);
        assert_eq!(score, 4);
    }

    #[test]
    fn test_slide_vertical() {
        let board = [[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 8]];

        let (up, up_score) = slide(&board, Direction::Up);
        assert_eq!([up[0][0], up[1][0], up[2][0], up[3][0]], [4, 4, 0, 0]);
        assert_eq!(up[0][3], 8);
        assert_eq!(up_score, 4);

        let (down, down_score) = slide(&board, Direction::Down);
        assert_eq!([down[0][0], down[1][0], down[2][0], down[3][0]], [0, 0, 4, 4]);
        assert_eq!(down_score, 4);
    }

    #[test]
    fn test_new_state_has_two_tiles() {
        let state = State::new(&mut rng());
        assert_eq!(tile_count(state.board()), 2);
        assert!(state.board().iter().flatten().all(|&v| v == 0 || v == 2 || v == 4));
        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_changed_move_spawns_one_tile() {
        let state = State::from_board([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let (next, result) = state.apply_move(Direction::Left, &mut rng());

        assert!(result.changed);
        assert_eq!(result.score_delta, 4);
        assert_eq!(next.score(), 4);
        assert_eq!(next.board()[0][0], 4);
        assert_eq!(tile_count(next.board()), 2);
    }

    #[test]
    fn test_noop_move_does_not_spawn() {
        let state = State::from_board([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let (next, result) = state.apply_move(Direction::Left, &mut rng());

        assert!(!result.changed);
        assert_eq!(result.score_delta, 0);
        assert_eq!(next, state);
    }

    #[test]
    fn test_noop_move_on_stuck_board_does_not_end_game() {
        // Full, no merges possible; terminal is only detected after a changed move
        let board = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
        let state = State::from_board(board);
        for direction in Direction::ALL {
            let (next, result) = state.apply_move(direction, &mut rng());
            assert!(!result.changed);
            assert_eq!(next.status(), GameStatus::InProgress);
        }
        assert!(!state.can_move());
    }

    #[test]
    fn test_changed_move_into_stuck_board_loses() {
        // Single gap at the left edge: right is a no-op, left frees (0, 3) for the spawn
        let board = [
            [0, 2, 4, 8],
            [16, 32, 64, 128],
            [2, 4, 8, 16],
            [16, 32, 64, 128],
        ];
        let state = State::from_board(board);
        let (next, result) = state.apply_move(Direction::Right, &mut rng());

        assert!(!result.changed);
        assert_eq!(next, state);

        let (next, result) = state.apply_move(Direction::Left, &mut rng());
        assert!(result.changed);
        assert_eq!(next.board()[0][..3], [2, 4, 8]);
        // The spawn fills (0, 3); a 2 or 4 between 8 and 128 has nothing to merge with
        assert_eq!(next.status(), GameStatus::Lost);
        assert!(next.is_terminal());

        let (after, result) = next.apply_move(Direction::Down, &mut rng());
        assert!(!result.changed);
        assert_eq!(after, next);
    }

    #[test]
    fn test_is_stuck() {
        assert!(!is_stuck(&[[0; 4]; 4]));
        assert!(!is_stuck(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 4]]));
        assert!(is_stuck(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]));
    }

    #[test]
    fn test_max_tile_and_empty_cells() {
        let state = State::from_board([[2, 0, 0, 0], [0, 64, 0, 0], [0; 4], [0; 4]]);
        assert_eq!(state.max_tile(), 64);
        assert_eq!(state.empty_cells().len(), 14);
    }

    #[test]
    fn test_snapshot_and_codec() {
        let game = MergeGrid::new();
        let state = State::from_board([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 1024]]);
        let snapshot = game.snapshot(&state);
        assert_eq!(snapshot.cell(0, 0), Some(Cell::Tile(2)));
        assert_eq!(snapshot.cell(3, 3), Some(Cell::Tile(1024)));
        assert_eq!(snapshot.cell(1, 1), Some(Cell::Empty));
        assert_eq!(snapshot, game.snapshot(&state));

        let mut buf = Vec::new();
        MergeGrid::encode_input(&Direction::Down, &mut buf).unwrap();
        assert_eq!(MergeGrid::decode_input(&buf).unwrap(), Direction::Down);
        assert!(MergeGrid::decode_input(&[4]).is_err());
    }

    #[test]
    fn test_engine_capabilities() {
        let caps = MergeGrid::new().capabilities();
        assert_eq!(caps.id.env_id, "merge_grid");
        assert_eq!(caps.board, BoardShape { rows: 4, cols: 4 });
        assert_eq!(caps.input_index("right"), Some(3));
        assert!(!caps.is_timed());
    }

    #[test]
    fn test_adapter_restart_resets_score() {
        let mut engine = GameAdapter::new(MergeGrid::new(), 5);
        let fresh = engine.state().clone();

        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            engine.apply(direction);
        }
        engine.restart(5);
        assert_eq!(engine.state(), &fresh);
        assert_eq!(engine.snapshot().score, 0);
    }
}
