// ── Board arena ──
//
// Boards, lists and tasks live in flat maps keyed by an internal node key,
// with parent back-references and per-parent id indexes. Mutations touch
// one node instead of rebuilding nested vectors; `to_boards` projects the
// nested, ordered shape that views and the wire format expect.
//
// Ids are not required to be unique. Every id index keeps keys in
// insertion order, so lookups resolve to the first matching entry while
// deletes remove every entry carrying the id.

use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexMap;

use super::action::Action;
use crate::model::{Board, BoardId, List, ListId, Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey(u64);

/// Id → node keys, oldest first.
#[derive(Debug, Clone)]
struct IdIndex<K> {
    map: HashMap<K, Vec<NodeKey>>,
}

impl<K> Default for IdIndex<K> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq> IdIndex<K> {
    fn first(&self, id: &K) -> Option<NodeKey> {
        self.map.get(id).and_then(|keys| keys.first().copied())
    }

    fn insert(&mut self, id: K, key: NodeKey) {
        self.map.entry(id).or_default().push(key);
    }

    fn remove(&mut self, id: &K, key: NodeKey) {
        if let Some(keys) = self.map.get_mut(id) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.map.remove(id);
            }
        }
    }

    fn take(&mut self, id: &K) -> Vec<NodeKey> {
        self.map.remove(id).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
struct BoardNode {
    /// Board header; its `lists` field is always `None` here.
    board: Board,
    lists: Option<Vec<NodeKey>>,
}

#[derive(Debug, Clone)]
struct ListNode {
    board: NodeKey,
    /// List header; its `tasks` field is always empty here.
    list: List,
    tasks: Vec<NodeKey>,
}

#[derive(Debug, Clone)]
struct TaskNode {
    list: NodeKey,
    task: Task,
}

/// Flat storage for a user's board collection.
#[derive(Debug, Clone, Default)]
pub struct BoardArena {
    next_key: u64,
    boards: IndexMap<NodeKey, BoardNode>,
    lists: HashMap<NodeKey, ListNode>,
    tasks: HashMap<NodeKey, TaskNode>,
    board_index: IdIndex<BoardId>,
    list_index: IdIndex<(NodeKey, ListId)>,
    task_index: IdIndex<(NodeKey, TaskId)>,
}

impl BoardArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_boards(boards: Vec<Board>) -> Self {
        let mut arena = Self::new();
        for board in boards {
            arena.insert_board(board);
        }
        arena
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    // ── Projection ───────────────────────────────────────────────────

    /// The nested, ordered view of the whole collection.
    pub fn to_boards(&self) -> Vec<Board> {
        self.boards
            .values()
            .map(|node| self.project_board(node))
            .collect()
    }

    /// The first board with `id`, fully projected.
    pub fn board(&self, id: &BoardId) -> Option<Board> {
        let key = self.board_index.first(id)?;
        self.boards.get(&key).map(|node| self.project_board(node))
    }

    pub fn contains_board(&self, id: &BoardId) -> bool {
        self.board_index.first(id).is_some()
    }

    fn project_board(&self, node: &BoardNode) -> Board {
        let mut board = node.board.clone();
        board.lists = node
            .lists
            .as_ref()
            .map(|keys| keys.iter().filter_map(|k| self.project_list(*k)).collect());
        board
    }

    fn project_list(&self, key: NodeKey) -> Option<List> {
        let node = self.lists.get(&key)?;
        let mut list = node.list.clone();
        list.tasks = node
            .tasks
            .iter()
            .filter_map(|k| self.tasks.get(k).map(|t| t.task.clone()))
            .collect();
        Some(list)
    }

    // ── Reduction ────────────────────────────────────────────────────

    /// Apply `action` in place. Returns `true` when the collection changed;
    /// a missing target leaves the arena untouched and returns `false`.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::ReplaceAll(boards) => {
                *self = Self::from_boards(boards);
                true
            }
            Action::SetCurrentBoard(_) => false,
            Action::AddBoard(board) => {
                self.insert_board(board);
                true
            }
            Action::UpdateBoard(board) => self.replace_board(board),
            Action::DeleteBoard(id) => {
                let keys = self.board_index.take(&id);
                for key in &keys {
                    self.remove_board_node(*key);
                }
                !keys.is_empty()
            }
            Action::ToggleStar(id) => self.edit_board(&id, |b| {
                b.starred = !b.starred;
                true
            }),
            Action::SetClosed(id, closed) => {
                self.edit_board(&id, |b| std::mem::replace(&mut b.closed, closed) != closed)
            }
            Action::AddList(board_id, list) => self.add_list(&board_id, list),
            Action::UpdateList(board_id, list) => self.replace_list(&board_id, list),
            Action::DeleteList(board_id, list_id) => self.delete_list(&board_id, list_id),
            Action::AddTask(board_id, list_id, task) => self.add_task(&board_id, list_id, task),
            Action::UpdateTask(board_id, list_id, task) => {
                let Some(key) = self.task_key(&board_id, list_id, task.id.clone()) else {
                    return false;
                };
                match self.tasks.get_mut(&key) {
                    Some(node) => {
                        node.task = task;
                        true
                    }
                    None => false,
                }
            }
            Action::DeleteTask(board_id, list_id, task_id) => {
                self.delete_task(&board_id, list_id, task_id)
            }
            Action::ToggleTaskComplete(board_id, list_id, task_id) => {
                let Some(key) = self.task_key(&board_id, list_id, task_id) else {
                    return false;
                };
                match self.tasks.get_mut(&key) {
                    Some(node) => {
                        node.task.completed = !node.task.completed;
                        true
                    }
                    None => false,
                }
            }
        }
    }

    // ── Lookups ──────────────────────────────────────────────────────

    fn list_key(&self, board_id: &BoardId, list_id: ListId) -> Option<NodeKey> {
        let board = self.board_index.first(board_id)?;
        self.list_index.first(&(board, list_id))
    }

    fn task_key(&self, board_id: &BoardId, list_id: ListId, task_id: TaskId) -> Option<NodeKey> {
        let list = self.list_key(board_id, list_id)?;
        self.task_index.first(&(list, task_id))
    }

    fn edit_board(&mut self, id: &BoardId, edit: impl FnOnce(&mut Board) -> bool) -> bool {
        let Some(key) = self.board_index.first(id) else {
            return false;
        };
        self.boards
            .get_mut(&key)
            .is_some_and(|node| edit(&mut node.board))
    }

    // ── Node insertion ───────────────────────────────────────────────

    fn alloc(&mut self) -> NodeKey {
        self.next_key += 1;
        NodeKey(self.next_key)
    }

    fn insert_board(&mut self, mut board: Board) -> NodeKey {
        let key = self.alloc();
        let lists = board.lists.take().map(|lists| {
            lists
                .into_iter()
                .map(|list| self.insert_list(key, list))
                .collect()
        });
        self.board_index.insert(board.id.clone(), key);
        self.boards.insert(key, BoardNode { board, lists });
        key
    }

    fn insert_list(&mut self, board: NodeKey, mut list: List) -> NodeKey {
        let key = self.alloc();
        let tasks = std::mem::take(&mut list.tasks)
            .into_iter()
            .map(|task| self.insert_task(key, task))
            .collect();
        self.list_index.insert((board, list.id.clone()), key);
        self.lists.insert(key, ListNode { board, list, tasks });
        key
    }

    fn insert_task(&mut self, list: NodeKey, task: Task) -> NodeKey {
        let key = self.alloc();
        self.task_index.insert((list, task.id.clone()), key);
        self.tasks.insert(key, TaskNode { list, task });
        key
    }

    // ── Node removal ─────────────────────────────────────────────────

    fn remove_board_node(&mut self, key: NodeKey) {
        if let Some(node) = self.boards.shift_remove(&key) {
            for list in node.lists.into_iter().flatten() {
                self.remove_list_node(list);
            }
            self.board_index.remove(&node.board.id, key);
        }
    }

    fn remove_list_node(&mut self, key: NodeKey) {
        if let Some(node) = self.lists.remove(&key) {
            for task in node.tasks {
                self.remove_task_node(task);
            }
            self.list_index.remove(&(node.board, node.list.id), key);
        }
    }

    fn remove_task_node(&mut self, key: NodeKey) {
        if let Some(node) = self.tasks.remove(&key) {
            self.task_index.remove(&(node.list, node.task.id), key);
        }
    }

    // ── Board / list / task edits ────────────────────────────────────

    fn replace_board(&mut self, mut board: Board) -> bool {
        let Some(key) = self.board_index.first(&board.id) else {
            return false;
        };
        let old_lists = self.boards.get_mut(&key).and_then(|node| node.lists.take());
        for list in old_lists.into_iter().flatten() {
            self.remove_list_node(list);
        }
        let lists = board.lists.take().map(|lists| {
            lists
                .into_iter()
                .map(|list| self.insert_list(key, list))
                .collect()
        });
        if let Some(node) = self.boards.get_mut(&key) {
            node.board = board;
            node.lists = lists;
        }
        true
    }

    fn add_list(&mut self, board_id: &BoardId, list: List) -> bool {
        let Some(board) = self.board_index.first(board_id) else {
            return false;
        };
        let key = self.insert_list(board, list);
        if let Some(node) = self.boards.get_mut(&board) {
            node.lists.get_or_insert_with(Vec::new).push(key);
        }
        true
    }

    fn replace_list(&mut self, board_id: &BoardId, mut list: List) -> bool {
        let Some(key) = self.list_key(board_id, list.id.clone()) else {
            return false;
        };
        let old_tasks = self
            .lists
            .get_mut(&key)
            .map(|node| std::mem::take(&mut node.tasks))
            .unwrap_or_default();
        for task in old_tasks {
            self.remove_task_node(task);
        }
        let tasks = std::mem::take(&mut list.tasks)
            .into_iter()
            .map(|task| self.insert_task(key, task))
            .collect();
        if let Some(node) = self.lists.get_mut(&key) {
            node.list = list;
            node.tasks = tasks;
        }
        true
    }

    fn delete_list(&mut self, board_id: &BoardId, list_id: ListId) -> bool {
        let Some(board) = self.board_index.first(board_id) else {
            return false;
        };
        let keys = self.list_index.take(&(board, list_id));
        if keys.is_empty() {
            return false;
        }
        if let Some(node) = self.boards.get_mut(&board) {
            if let Some(lists) = node.lists.as_mut() {
                lists.retain(|k| !keys.contains(k));
            }
        }
        for key in keys {
            self.remove_list_node(key);
        }
        true
    }

    fn add_task(&mut self, board_id: &BoardId, list_id: ListId, task: Task) -> bool {
        let Some(list) = self.list_key(board_id, list_id) else {
            return false;
        };
        let key = self.insert_task(list, task);
        if let Some(node) = self.lists.get_mut(&list) {
            node.tasks.push(key);
        }
        true
    }

    fn delete_task(&mut self, board_id: &BoardId, list_id: ListId, task_id: TaskId) -> bool {
        let Some(list) = self.list_key(board_id, list_id) else {
            return false;
        };
        let keys = self.task_index.take(&(list, task_id));
        if keys.is_empty() {
            return false;
        }
        if let Some(node) = self.lists.get_mut(&list) {
            node.tasks.retain(|k| !keys.contains(k));
        }
        for key in keys {
            self.remove_task_node(key);
        }
        true
    }
}

/// Pure reduction over a nested snapshot: `(boards, action) -> boards`.
pub fn reduce(boards: Vec<Board>, action: Action) -> Vec<Board> {
    let mut arena = BoardArena::from_boards(boards);
    arena.apply(action);
    arena.to_boards()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn work_board() -> Board {
        let mut board = Board::with_id("1", "Work");
        board.lists = Some(Vec::new());
        board
    }

    fn seeded() -> BoardArena {
        let mut todo = List::with_id("L1", "Todo");
        todo.tasks.push(Task::with_id("T1", "Write docs"));
        todo.tasks.push(Task::with_id("T2", "Review"));
        let mut board = Board::with_id("1", "Work");
        board.lists = Some(vec![todo, List::with_id("L2", "Done")]);
        BoardArena::from_boards(vec![board, Board::with_id("2", "Home")])
    }

    #[test]
    fn projection_round_trips_the_input() {
        let boards = seeded().to_boards();
        assert_eq!(BoardArena::from_boards(boards.clone()).to_boards(), boards);
        assert_eq!(boards[0].lists()[0].tasks.len(), 2);
        assert!(boards[1].lists.is_none());
    }

    #[test]
    fn end_to_end_add_list_then_task() {
        let mut arena = BoardArena::from_boards(vec![work_board()]);

        assert!(arena.apply(Action::AddList("1".into(), List::with_id("L1", "Todo"))));
        assert!(arena.apply(Action::AddTask(
            "1".into(),
            "L1".into(),
            Task::with_id("T1", "Write docs"),
        )));

        let board = arena.board(&"1".into()).unwrap();
        let lists = board.lists();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].title, "Todo");
        assert_eq!(lists[0].tasks.len(), 1);
        assert_eq!(lists[0].tasks[0].title, "Write docs");
        assert!(!lists[0].tasks[0].completed);
    }

    #[test]
    fn toggle_task_complete_flips_and_restores() {
        let mut arena = seeded();
        let toggle = Action::ToggleTaskComplete("1".into(), "L1".into(), "T1".into());

        assert!(arena.apply(toggle.clone()));
        assert!(arena.board(&"1".into()).unwrap().lists()[0].tasks[0].completed);

        assert!(arena.apply(toggle));
        assert!(!arena.board(&"1".into()).unwrap().lists()[0].tasks[0].completed);
    }

    #[test]
    fn add_list_initializes_absent_sequence() {
        let mut arena = BoardArena::from_boards(vec![Board::with_id("2", "Home")]);
        let list = List::with_id("L9", "Ideas");
        arena.apply(Action::AddList("2".into(), list.clone()));
        assert_eq!(arena.board(&"2".into()).unwrap().lists, Some(vec![list]));
    }

    #[test]
    fn toggle_star_is_an_involution() {
        let mut arena = seeded();
        let before = arena.to_boards();
        arena.apply(Action::ToggleStar("2".into()));
        assert!(arena.board(&"2".into()).unwrap().starred);
        arena.apply(Action::ToggleStar("2".into()));
        assert_eq!(arena.to_boards(), before);
    }

    #[test]
    fn update_board_keeps_position_and_takes_lists_verbatim() {
        let mut arena = seeded();
        let mut edited = Board::with_id("1", "Work (renamed)");
        edited.lists = Some(vec![List::with_id("L7", "Only")]);

        assert!(arena.apply(Action::UpdateBoard(edited.clone())));

        let boards = arena.to_boards();
        assert_eq!(boards[0], edited);
        assert_eq!(boards[1].title, "Home");
        // Old children are gone from the indexes too.
        assert!(!arena.apply(Action::ToggleTaskComplete("1".into(), "L1".into(), "T1".into())));
    }

    #[test]
    fn update_list_replaces_tasks() {
        let mut arena = seeded();
        let mut list = List::with_id("L1", "Doing");
        list.tasks.push(Task::with_id("T5", "New"));

        assert!(arena.apply(Action::UpdateList("1".into(), list.clone())));

        let board = arena.board(&"1".into()).unwrap();
        assert_eq!(board.lists()[0], list);
        assert_eq!(board.lists()[1].title, "Done");
    }

    #[test]
    fn update_task_replaces_in_place() {
        let mut arena = seeded();
        let mut task = Task::with_id("T2", "Review carefully");
        task.description = Some("two passes".into());

        assert!(arena.apply(Action::UpdateTask("1".into(), "L1".into(), task.clone())));

        let tasks = arena.board(&"1".into()).unwrap().lists()[0].tasks.clone();
        assert_eq!(tasks[1], task);
        assert_eq!(tasks[0].title, "Write docs");
    }

    #[test]
    fn delete_task_is_idempotent() {
        let mut arena = seeded();
        let delete = Action::DeleteTask("1".into(), "L1".into(), "T1".into());

        assert!(arena.apply(delete.clone()));
        let after_first = arena.to_boards();
        assert!(!arena.apply(delete));
        assert_eq!(arena.to_boards(), after_first);
        assert_eq!(after_first[0].lists()[0].tasks.len(), 1);
    }

    #[test]
    fn delete_list_drops_its_tasks() {
        let mut arena = seeded();
        assert!(arena.apply(Action::DeleteList("1".into(), "L1".into())));
        let board = arena.board(&"1".into()).unwrap();
        assert_eq!(board.lists().len(), 1);
        assert!(arena.tasks.is_empty());
    }

    #[test]
    fn missing_targets_leave_collection_unchanged() {
        let mut arena = seeded();
        let before = arena.to_boards();

        let misses = [
            Action::UpdateBoard(Board::with_id("nope", "x")),
            Action::DeleteBoard("nope".into()),
            Action::ToggleStar("nope".into()),
            Action::SetClosed("nope".into(), true),
            Action::AddList("nope".into(), List::with_id("L1", "x")),
            Action::UpdateList("1".into(), List::with_id("nope", "x")),
            Action::DeleteList("1".into(), "nope".into()),
            Action::AddTask("1".into(), "nope".into(), Task::with_id("T1", "x")),
            Action::AddTask("nope".into(), "L1".into(), Task::with_id("T1", "x")),
            Action::UpdateTask("1".into(), "L1".into(), Task::with_id("nope", "x")),
            Action::DeleteTask("1".into(), "L2".into(), "T1".into()),
            Action::ToggleTaskComplete("1".into(), "L1".into(), "nope".into()),
            Action::SetCurrentBoard(Some("1".into())),
        ];
        for action in misses {
            let name = action.name();
            assert!(!arena.apply(action), "{name} should be a no-op");
            assert_eq!(arena.to_boards(), before, "{name} changed the collection");
        }
    }

    #[test]
    fn set_closed_to_current_value_is_a_no_op() {
        let mut arena = seeded();
        assert!(!arena.apply(Action::SetClosed("1".into(), false)));
        assert!(arena.apply(Action::SetClosed("1".into(), true)));
        assert!(arena.board(&"1".into()).unwrap().closed);
    }

    #[test]
    fn duplicate_ids_resolve_to_first_and_delete_all() {
        let mut arena = BoardArena::from_boards(vec![
            Board::with_id("1", "first"),
            Board::with_id("2", "other"),
        ]);
        arena.apply(Action::AddBoard(Board::with_id("1", "second")));

        arena.apply(Action::ToggleStar("1".into()));
        let boards = arena.to_boards();
        assert!(boards[0].starred);
        assert!(!boards[2].starred);
        assert_eq!(arena.board(&"1".into()).unwrap().title, "first");

        assert!(arena.apply(Action::DeleteBoard("1".into())));
        let titles: Vec<_> = arena.to_boards().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["other"]);
    }

    #[test]
    fn replace_all_installs_verbatim() {
        let mut arena = seeded();
        let fresh = vec![Board::with_id("9", "Fresh")];
        assert!(arena.apply(Action::ReplaceAll(fresh.clone())));
        assert_eq!(arena.to_boards(), fresh);
        assert!(arena.lists.is_empty());
    }

    #[test]
    fn reduce_is_pure() {
        let boards = seeded().to_boards();
        let next = reduce(boards.clone(), Action::ToggleStar("1".into()));
        assert!(!boards[0].starred);
        assert!(next[0].starred);
    }
}
