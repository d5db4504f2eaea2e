//! Property tests for the falling-blocks transitions.
//!
//! Invariants covered:
//! - The active piece always fits while the game is in progress.
//! - No full row survives a lock.
//! - Score is the sum of `100 * k^2` over every lock.
//! - A lost game never changes again.

use games_block_stack::{line_score, BlockStackConfig, State};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[derive(Debug, Clone, Copy)]
enum Step {
    Shift(i32),
    Rotate,
    Drop,
    Tick,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (-1i32..=1).prop_map(Step::Shift),
        Just(Step::Rotate),
        Just(Step::Drop),
        Just(Step::Tick),
    ]
}

fn no_full_rows(state: &State) -> bool {
    (0..state.rows()).all(|row| (0..state.cols()).any(|col| state.settled(row, col).is_none()))
}

fn active_in_bounds(state: &State) -> bool {
    state.active().cells().all(|(row, col)| {
        col >= 0
            && col < state.cols() as i32
            && row < state.rows() as i32
            && (row < 0 || state.settled(row as usize, col as usize).is_none())
    })
}

proptest! {
    #[test]
    fn random_play_keeps_board_consistent(seed in any::<u64>(), steps in prop::collection::vec(step(), 1..400)) {
        let config = BlockStackConfig { rows: 8, cols: 6, ..BlockStackConfig::default() };
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut state = State::new(&config, &mut rng);
        let mut expected_score = 0;

        for step in steps {
            let next = match step {
                Step::Shift(dx) => state.move_piece(dx, 0).0,
                Step::Rotate => state.rotate().0,
                Step::Drop => state.drop().0,
                Step::Tick => {
                    let (next, report) = state.tick(&mut rng);
                    expected_score += line_score(report.lines);
                    prop_assert_eq!(report.score_delta, line_score(report.lines));
                    if report.locked {
                        prop_assert!(no_full_rows(&next));
                    }
                    next
                }
            };

            prop_assert_eq!(next.score(), expected_score);
            if next.is_terminal() {
                let (after, report) = next.tick(&mut rng);
                prop_assert_eq!(&after, &next);
                prop_assert!(!report.locked && !report.moved);
                prop_assert!(!next.rotate().1);
                prop_assert_eq!(next.drop().1, 0);
                break;
            }
            prop_assert!(active_in_bounds(&next));
            state = next;
        }
    }
}
