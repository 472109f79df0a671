//! Property-based tests for score entry through the controller.

use proptest::prelude::*;

use domino_application::GameController;
use domino_core::{DominoError, GameMode, GamePhase};
use domino_infrastructure::InMemorySessionStore;
use std::sync::Arc;

const PLAYERS: usize = 3;

#[derive(Debug, Clone)]
enum Command {
    Add { participant: usize, amount: u32 },
    Delete { participant: usize, index: usize },
}

/// Strategy: adds and deletes over three players. Delete indices may point
/// past the end of the sequence.
fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        3 => (0..PLAYERS, 1..=1000u32)
            .prop_map(|(participant, amount)| Command::Add { participant, amount }),
        1 => (0..PLAYERS, 0..8usize)
            .prop_map(|(participant, index)| Command::Delete { participant, index }),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn model_totals(model: &[Vec<u32>]) -> Vec<u64> {
    model
        .iter()
        .map(|scores| scores.iter().map(|&s| u64::from(s)).sum())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // 1. Totals always equal the sum of the recorded scores, and a stale
    //    delete changes nothing
    #[test]
    fn totals_follow_recorded_scores(
        commands in prop::collection::vec(command_strategy(), 0..60),
    ) {
        let rt = runtime();
        let _guard = rt.enter();
        let store = Arc::new(InMemorySessionStore::new());
        let mut controller = GameController::new(store.clone());
        let configuration = controller
            .configure(GameMode::Players, 1_000_000, &["", "", ""])
            .unwrap();
        rt.block_on(controller.start_session(configuration));

        let mut model = vec![vec![0u32]; PLAYERS];
        for command in &commands {
            match *command {
                Command::Add { participant, amount } => {
                    let outcome = controller.submit_score(participant, i64::from(amount)).unwrap();
                    model[participant].push(amount);
                    prop_assert_eq!(outcome.total, model_totals(&model)[participant]);
                    prop_assert!(!outcome.is_game_over());
                }
                Command::Delete { participant, index } if index < model[participant].len() => {
                    let outcome = controller.delete_score(participant, index).unwrap();
                    let removed = model[participant].remove(index);
                    prop_assert_eq!(outcome.removed, removed);
                    prop_assert_eq!(outcome.total, model_totals(&model)[participant]);
                }
                Command::Delete { participant, index } => {
                    let before = controller.view_model();
                    let err = controller.delete_score(participant, index).unwrap_err();
                    let is_out_of_range = matches!(err, DominoError::ScoreOutOfRange { .. });
                    prop_assert!(is_out_of_range);
                    prop_assert_eq!(controller.view_model(), before);
                }
            }

            let view = controller.view_model();
            let scores: Vec<Vec<u32>> = view.participants.iter().map(|p| p.scores.clone()).collect();
            prop_assert_eq!(&scores, &model);
            let totals: Vec<u64> = view.participants.iter().map(|p| p.total).collect();
            prop_assert_eq!(totals, model_totals(&model));
        }

        rt.block_on(controller.flush());
        let saved = rt.block_on(store.active_snapshot()).unwrap();
        prop_assert_eq!(saved.ledger.all_scores(), model.as_slice());
        prop_assert_eq!(controller.phase(), GamePhase::InProgress);
    }

    // 2. The game ends on the first score that reaches the target, and
    //    nothing is recorded after that
    #[test]
    fn first_score_reaching_target_wins(
        commands in prop::collection::vec((0..PLAYERS, 1..=60u32), 1..40),
    ) {
        const TARGET: u32 = 100;

        let rt = runtime();
        let _guard = rt.enter();
        let store = Arc::new(InMemorySessionStore::new());
        let mut controller = GameController::new(store.clone());
        let configuration = controller
            .configure(GameMode::Players, TARGET, &["", "", ""])
            .unwrap();
        rt.block_on(controller.start_session(configuration));

        let mut model = vec![vec![0u32]; PLAYERS];
        let mut winner = None;
        for &(participant, amount) in &commands {
            if winner.is_some() {
                let err = controller.submit_score(participant, i64::from(amount)).unwrap_err();
                let is_invalid_state = matches!(err, DominoError::InvalidState { .. });
                prop_assert!(is_invalid_state);
                continue;
            }

            let outcome = controller.submit_score(participant, i64::from(amount)).unwrap();
            model[participant].push(amount);
            let reached = model_totals(&model)[participant] >= u64::from(TARGET);
            prop_assert_eq!(outcome.is_game_over(), reached);
            if reached {
                winner = Some(participant);
                prop_assert_eq!(outcome.winner.map(|w| w.index), Some(participant));
            }
        }

        let totals: Vec<u64> = controller.view_model().participants.iter().map(|p| p.total).collect();
        prop_assert_eq!(totals, model_totals(&model));

        let history = rt.block_on(controller.history());
        match winner {
            Some(_) => {
                prop_assert_eq!(controller.phase(), GamePhase::Complete);
                prop_assert_eq!(history.len(), 1);
                prop_assert_eq!(history[0].final_totals(), model_totals(&model));
                prop_assert!(rt.block_on(store.active_snapshot()).is_none());
            }
            None => {
                prop_assert_eq!(controller.phase(), GamePhase::InProgress);
                prop_assert!(history.is_empty());
            }
        }
    }
}
