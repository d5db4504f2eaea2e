//! Serpent (snake-style) game for the grid arcade engine
//!
//! The snake advances one cell per timer tick in its current direction. It
//! dies on leaving the board or running into any of its own segments, grows by
//! one when it reaches the food, and the food then reappears on a random free
//! cell. Filling the whole board is a win.

use std::collections::VecDeque;
use std::time::Duration;

use engine_core::typed::{
    check_board, decode_index, encode_index, BoardShape, Capabilities, DecodeError, EncodeError,
    EngineId, Game,
};
use engine_core::{Cell, ConfigError, Coord, Direction, GameStatus, Outcome, Snapshot};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// Points for each food eaten
pub const FOOD_POINTS: u32 = 10;

/// Board and timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerpentConfig {
    pub cols: usize,
    pub rows: usize,
    /// Cell of the single starting segment
    pub start: Coord,
    pub start_direction: Direction,
    /// Cadence the external scheduler should tick at
    pub tick_interval: Duration,
}

impl Default for SerpentConfig {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 20,
            start: Coord::new(5, 5),
            start_direction: Direction::Right,
            tick_interval: Duration::from_millis(100),
        }
    }
}

impl SerpentConfig {
    /// Reject boards that cannot hold a snake and a food cell, or a start
    /// position outside the board
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_board(self.rows, self.cols, 1, 2)?;
        if !self.start.within(self.cols, self.rows) {
            return Err(ConfigError::StartOutOfBounds {
                x: self.start.x,
                y: self.start.y,
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(())
    }
}

/// Result of one `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub alive: bool,
    pub ate: bool,
}

/// Serpent game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    cols: usize,
    rows: usize,
    /// Head first
    body: VecDeque<Coord>,
    /// `None` only once the body covers the whole board
    food: Option<Coord>,
    /// Direction the next tick moves in
    direction: Direction,
    /// Direction the last tick actually moved in
    heading: Direction,
    score: u32,
    status: GameStatus,
}

impl State {
    /// Fresh game: one segment at the configured start, food on a random free cell
    pub fn new<R: Rng + ?Sized>(config: &SerpentConfig, rng: &mut R) -> Self {
        let mut state = Self::from_parts(
            config.cols,
            config.rows,
            vec![config.start],
            config.start_direction,
            None,
        );
        state.food = state.spawn_food(rng);
        state
    }

    /// State with an explicit layout
    ///
    /// `body` is head first, must be non-empty, duplicate-free and inside the
    /// board; `food` must not overlap it.
    pub fn from_parts(
        cols: usize,
        rows: usize,
        body: Vec<Coord>,
        direction: Direction,
        food: Option<Coord>,
    ) -> Self {
        debug_assert!(!body.is_empty());
        Self {
            cols,
            rows,
            body: body.into(),
            food,
            direction,
            heading: direction,
            score: 0,
            status: GameStatus::InProgress,
        }
    }

    pub fn head(&self) -> Coord {
        self.body[0]
    }

    pub fn body(&self) -> impl Iterator<Item = Coord> + '_ {
        self.body.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn food(&self) -> Option<Coord> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
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

    pub fn occupies(&self, cell: Coord) -> bool {
        self.body.contains(&cell)
    }

    /// Queue a new direction for the next tick
    ///
    /// Returns `false` (state unchanged) for the exact reverse of the direction
    /// last moved in, or once the game is over. Several changes between two
    /// ticks are all checked against that same heading, so a quick
    /// up-then-left cannot fold the snake back onto itself.
    pub fn set_direction(&self, direction: Direction) -> (State, bool) {
        if self.is_terminal() || direction == self.heading.opposite() {
            return (self.clone(), false);
        }
        let mut next = self.clone();
        next.direction = direction;
        (next, true)
    }

    /// Advance the snake one cell
    pub fn tick<R: Rng + ?Sized>(&self, rng: &mut R) -> (State, TickResult) {
        if self.is_terminal() {
            return (
                self.clone(),
                TickResult {
                    alive: false,
                    ate: false,
                },
            );
        }

        let mut next = self.clone();
        let new_head = self.head().step(self.direction);

        // The tail has not moved yet, so stepping onto it is a collision too
        if !new_head.within(self.cols, self.rows) || self.occupies(new_head) {
            next.status = GameStatus::Lost;
            return (
                next,
                TickResult {
                    alive: false,
                    ate: false,
                },
            );
        }

        next.body.push_front(new_head);
        next.heading = self.direction;

        let ate = self.food == Some(new_head);
        if ate {
            next.score += FOOD_POINTS;
            next.food = next.spawn_food(rng);
            if next.food.is_none() {
                next.status = GameStatus::Won(None);
            }
        } else {
            next.body.pop_back();
        }

        (next, TickResult { alive: true, ate })
    }

    /// Pick a uniformly random unoccupied cell by resampling
    fn spawn_food<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord> {
        if self.body.len() >= self.cols * self.rows {
            return None;
        }
        loop {
            let candidate = Coord::new(
                rng.gen_range(0..self.cols) as i32,
                rng.gen_range(0..self.rows) as i32,
            );
            if !self.occupies(candidate) {
                return Some(candidate);
            }
        }
    }
}

/// Serpent game implementation
#[derive(Debug, Default)]
pub struct Serpent {
    config: SerpentConfig,
}

impl Serpent {
    pub fn new(config: SerpentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SerpentConfig {
        &self.config
    }
}

impl Game for Serpent {
    type State = State;
    type Input = Direction;

    fn engine_id(&self) -> EngineId {
        EngineId {
            env_id: "serpent".to_string(),
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
            inputs: Direction::ALL.iter().map(|d| d.name().to_string()).collect(),
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
        let (next, accepted) = state.set_direction(input);
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
        let (next, result) = state.tick(rng);
        let points = if result.ate { FOOD_POINTS } else { 0 };
        let outcome = Outcome::accepted(points, next.status);
        (next, outcome)
    }

    fn status(state: &Self::State) -> GameStatus {
        state.status
    }

    fn snapshot(&self, state: &Self::State) -> Snapshot {
        let mut snapshot = Snapshot::blank(state.rows, state.cols, state.score, state.status);
        if let Some(food) = state.food {
            snapshot.set(food.y as usize, food.x as usize, Cell::Food);
        }
        for (i, segment) in state.body().enumerate() {
            let cell = if i == 0 { Cell::Head } else { Cell::Body };
            snapshot.set(segment.y as usize, segment.x as usize, cell);
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
