//! Game registry keyed by environment id
//!
//! The launcher selects games by name: each game registers a factory that
//! builds a seeded engine instance. A process-wide registry backs the free
//! functions; `Registry` values can also be created independently, which keeps
//! tests isolated from each other.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tracing::warn;

use crate::erased::ErasedGame;

/// Factory function type for creating seeded game instances
pub type GameFactory = fn(u64) -> Box<dyn ErasedGame>;

/// Thread-safe mapping from env_id to game factory
#[derive(Default)]
pub struct Registry {
    factories: Mutex<HashMap<String, GameFactory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, GameFactory>> {
        // Factories are plain fn pointers; a panic elsewhere cannot leave the map half-written
        self.factories.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a factory under `env_id`, replacing any previous one
    pub fn register(&self, env_id: impl Into<String>, factory: GameFactory) {
        let env_id = env_id.into();
        let mut factories = self.lock();
        if factories.contains_key(&env_id) {
            warn!(%env_id, "overriding existing game registration");
        }
        factories.insert(env_id, factory);
    }

    /// Create a new game instance by env_id
    ///
    /// Returns `None` if nothing is registered under `env_id`.
    pub fn create(&self, env_id: &str, seed: u64) -> Option<Box<dyn ErasedGame>> {
        let factory = self.lock().get(env_id).copied();
        factory.map(|factory| factory(seed))
    }

    /// All registered env ids, sorted
    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn contains(&self, env_id: &str) -> bool {
        self.lock().contains_key(env_id)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry
pub fn global() -> &'static Registry {
    &REGISTRY
}

/// Register a game with the global registry
///
/// # Example
///
/// ```rust
/// # use engine_core::registry::*;
/// # use engine_core::erased::ErasedGame;
/// fn my_game_factory(seed: u64) -> Box<dyn ErasedGame> {
///     // Box::new(GameAdapter::new(MyGame::default(), seed))
/// #   unimplemented!("{}", seed)
/// }
///
/// register_game("my_game", my_game_factory);
/// assert!(is_registered("my_game"));
/// ```
pub fn register_game(env_id: impl Into<String>, factory: GameFactory) {
    REGISTRY.register(env_id, factory);
}

/// Create a new game instance from the global registry
///
/// ```rust
/// # use engine_core::registry::*;
/// match create_game("mark_grid", 7) {
///     Some(game) => println!("Created game: {}", game.engine_id().env_id),
///     None => println!("Game 'mark_grid' not found"),
/// }
/// ```
pub fn create_game(env_id: &str, seed: u64) -> Option<Box<dyn ErasedGame>> {
    REGISTRY.create(env_id, seed)
}

/// Get list of all registered environment IDs
pub fn list_registered_games() -> Vec<String> {
    REGISTRY.list()
}

/// Check if a game is registered
pub fn is_registered(env_id: &str) -> bool {
    REGISTRY.contains(env_id)
}

/// Convenience macro for registering games that implement `Default`
///
/// ```ignore
/// register_game!(MarkGrid, "mark_grid");
/// ```
#[macro_export]
macro_rules! register_game {
    ($game_type:ty, $env_id:expr) => {{
        fn factory(seed: u64) -> Box<dyn $crate::erased::ErasedGame> {
            Box::new($crate::adapter::GameAdapter::new(
                <$game_type>::default(),
                seed,
            ))
        }
        $crate::registry::register_game($env_id, factory);
    }};
}
