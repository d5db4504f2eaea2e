use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use engine_core::{ErasedGame, ErasedGameError, GameStatus, Registry, Snapshot};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::policy::{Policy, RandomPolicy};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Unknown game: {0}")]
    UnknownGame(String),
    #[error("Game {env_id} refused input: {source}")]
    Input {
        env_id: String,
        #[source]
        source: ErasedGameError,
    },
    #[error(transparent)]
    Policy(#[from] anyhow::Error),
}

/// Why an episode stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Terminal,
    StepLimit,
    Shutdown,
}

/// Per-episode statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub episode_id: Uuid,
    pub env_id: String,
    pub seed: u64,
    /// Inputs issued by the policy
    pub steps: u64,
    pub ticks: u64,
    /// Inputs the game refused
    pub rejected: u64,
    pub score: u32,
    pub status: GameStatus,
    pub stop: StopReason,
}

/// Drives one game instance with a policy and a tick timer
pub struct Session {
    env_id: String,
    game: Box<dyn ErasedGame>,
    policy: Box<dyn Policy>,
    tick_interval: Option<Duration>,
    input_interval: Duration,
    max_steps: u64,
    shutdown: Arc<AtomicBool>,
}

impl Session {
    pub fn new(
        registry: &Registry,
        config: &Config,
        seed: u64,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self, SessionError> {
        let game = registry
            .create(&config.env_id, seed)
            .ok_or_else(|| SessionError::UnknownGame(config.env_id.clone()))?;
        let capabilities = game.capabilities();
        let policy = RandomPolicy::new(&capabilities, seed)?;
        let tick_interval = config.tick_interval(capabilities.tick_interval);

        info!(
            env_id = %config.env_id,
            rows = capabilities.board.rows,
            cols = capabilities.board.cols,
            inputs = ?capabilities.inputs,
            tick_interval = ?tick_interval,
            "session ready"
        );

        Ok(Self {
            env_id: config.env_id.clone(),
            game,
            policy: Box::new(policy),
            tick_interval,
            input_interval: config.input_interval(),
            max_steps: config.max_steps,
            shutdown,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        self.game.snapshot()
    }

    /// Restart the game with `seed` and play until it ends
    pub async fn run_episode(&mut self, seed: u64) -> Result<EpisodeSummary, SessionError> {
        self.game.restart(seed);
        let episode_id = Uuid::new_v4();
        debug!(%episode_id, seed, "started episode");

        let mut inputs = interval(self.input_interval);
        inputs.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticker = self.tick_interval.map(|period| {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        let mut steps = 0u64;
        let mut ticks = 0u64;
        let mut rejected = 0u64;

        let stop = loop {
            if self.game.status().is_terminal() {
                break StopReason::Terminal;
            }
            if steps + ticks >= self.max_steps {
                break StopReason::StepLimit;
            }
            if self.shutdown.load(Ordering::Relaxed) {
                break StopReason::Shutdown;
            }

            tokio::select! {
                _ = inputs.tick() => {
                    let input = self.policy.select_input(&self.game.snapshot())?;
                    let outcome = self.game.apply_input(&input).map_err(|source| SessionError::Input {
                        env_id: self.env_id.clone(),
                        source,
                    })?;
                    steps += 1;
                    if !outcome.accepted {
                        rejected += 1;
                    }
                }
                _ = next_tick(&mut ticker) => {
                    self.game.tick();
                    ticks += 1;
                }
            }
        };

        let snapshot = self.game.snapshot();
        let summary = EpisodeSummary {
            episode_id,
            env_id: self.env_id.clone(),
            seed,
            steps,
            ticks,
            rejected,
            score: snapshot.score,
            status: snapshot.status,
            stop,
        };
        info!(
            %episode_id,
            env_id = %summary.env_id,
            steps,
            ticks,
            rejected,
            score = summary.score,
            status = ?summary.status,
            stop = ?stop,
            "episode finished"
        );
        Ok(summary)
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
