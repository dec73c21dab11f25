//! Property-based tests for the board reducer
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use taskboard_core::{Action, Board, BoardArena, List, Task};

#[derive(Debug, Clone)]
enum Op {
    Add(String, String),
    Update(String, String, bool),
    Delete(String),
}

fn board_id() -> impl Strategy<Value = String> {
    (0u8..4).prop_map(|n| n.to_string())
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (board_id(), "[a-z]{1,8}").prop_map(|(id, title)| Op::Add(id, title)),
        (board_id(), "[a-z]{1,8}", any::<bool>())
            .prop_map(|(id, title, starred)| Op::Update(id, title, starred)),
        board_id().prop_map(Op::Delete),
    ]
}

fn board(id: &str, title: &str, starred: bool) -> Board {
    let mut board = Board::with_id(id, title);
    board.starred = starred;
    board
}

/// Plain vector simulation of add / update-first / delete-all.
fn simulate(reference: &mut Vec<Board>, op: &Op) {
    match op {
        Op::Add(id, title) => reference.push(board(id, title, false)),
        Op::Update(id, title, starred) => {
            if let Some(slot) = reference.iter_mut().find(|b| b.id.as_str() == id) {
                *slot = board(id, title, *starred);
            }
        }
        Op::Delete(id) => reference.retain(|b| b.id.as_str() != id),
    }
}

fn action(op: &Op) -> Action {
    match op {
        Op::Add(id, title) => Action::AddBoard(board(id, title, false)),
        Op::Update(id, title, starred) => Action::UpdateBoard(board(id, title, *starred)),
        Op::Delete(id) => Action::DeleteBoard(id.as_str().into()),
    }
}

fn seeded(count: usize) -> BoardArena {
    let boards = (0..count)
        .map(|i| {
            let mut list = List::with_id("L1", "Todo");
            list.tasks.push(Task::with_id("T1", "first"));
            let mut b = Board::with_id(i.to_string(), format!("board {i}"));
            b.lists = Some(vec![list]);
            b
        })
        .collect();
    BoardArena::from_boards(boards)
}

proptest! {
    #[test]
    fn board_ops_match_reference_simulation(ops in prop::collection::vec(op(), 0..40)) {
        let mut arena = BoardArena::new();
        let mut reference = Vec::new();
        for op in &ops {
            arena.apply(action(op));
            simulate(&mut reference, op);
        }
        prop_assert_eq!(arena.to_boards(), reference);
    }

    #[test]
    fn toggle_star_twice_is_identity(count in 1usize..5, pick in 0usize..5) {
        let mut arena = seeded(count);
        let before = arena.to_boards();
        let id = (pick % count).to_string();
        arena.apply(Action::ToggleStar(id.as_str().into()));
        arena.apply(Action::ToggleStar(id.as_str().into()));
        prop_assert_eq!(arena.to_boards(), before);
    }

    #[test]
    fn missing_board_targets_change_nothing(count in 0usize..5, missing in 10u32..1000) {
        let mut arena = seeded(count);
        let before = arena.to_boards();
        let id = missing.to_string();
        let actions = [
            Action::ToggleStar(id.as_str().into()),
            Action::DeleteBoard(id.as_str().into()),
            Action::AddList(id.as_str().into(), List::with_id("L2", "x")),
            Action::AddTask(id.as_str().into(), "L1".into(), Task::with_id("T2", "x")),
            Action::DeleteTask(id.as_str().into(), "L1".into(), "T1".into()),
            Action::ToggleTaskComplete(id.as_str().into(), "L1".into(), "T1".into()),
        ];
        for a in actions {
            prop_assert!(!arena.apply(a));
        }
        prop_assert_eq!(arena.to_boards(), before);
    }

    #[test]
    fn delete_task_twice_is_idempotent(count in 1usize..5) {
        let mut arena = seeded(count);
        let delete = Action::DeleteTask("0".into(), "L1".into(), "T1".into());
        prop_assert!(arena.apply(delete.clone()));
        let once = arena.to_boards();
        prop_assert!(!arena.apply(delete));
        prop_assert_eq!(arena.to_boards(), once);
    }
}
