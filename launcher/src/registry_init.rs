//! Game registry initialization
//!
//! Registers every built-in game under its env id.

use engine_core::{ErasedGame, GameAdapter, Registry};
use games_block_stack::BlockStack;
use games_mark_grid::MarkGrid;
use games_merge_grid::MergeGrid;
use games_serpent::Serpent;
use tracing::info;

fn merge_grid(seed: u64) -> Box<dyn ErasedGame> {
    Box::new(GameAdapter::new(MergeGrid::default(), seed))
}

fn serpent(seed: u64) -> Box<dyn ErasedGame> {
    Box::new(GameAdapter::new(Serpent::default(), seed))
}

fn block_stack(seed: u64) -> Box<dyn ErasedGame> {
    Box::new(GameAdapter::new(BlockStack::default(), seed))
}

fn mark_grid(seed: u64) -> Box<dyn ErasedGame> {
    Box::new(GameAdapter::new(MarkGrid::new(), seed))
}

/// Register the built-in games with `registry`
pub fn initialize_registry(registry: &Registry) {
    registry.register("merge_grid", merge_grid);
    registry.register("serpent", serpent);
    registry.register("block_stack", block_stack);
    registry.register("mark_grid", mark_grid);

    let games = registry.list();
    info!(count = games.len(), games = ?games, "initialized game registry");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_all_games_under_their_ids() {
        let registry = Registry::new();
        initialize_registry(&registry);
        assert_eq!(
            registry.list(),
            vec!["block_stack", "mark_grid", "merge_grid", "serpent"]
        );

        for env_id in registry.list() {
            let game = registry.create(&env_id, 1).unwrap();
            assert_eq!(game.engine_id().env_id, env_id);
            assert!(!game.status().is_terminal());
        }
    }

    #[test]
    fn test_timed_games_advertise_ticks() {
        let registry = Registry::new();
        initialize_registry(&registry);
        let timed: Vec<String> = registry
            .list()
            .into_iter()
            .filter(|id| registry.create(id, 0).unwrap().capabilities().is_timed())
            .collect();
        assert_eq!(timed, vec!["block_stack", "serpent"]);
    }
}
