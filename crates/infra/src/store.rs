use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use kanmind_board::{Board, Comment, Task, UserProfile};
use kanmind_core::{BoardId, CommentId, TaskId, UserId};

/// Storage contract consumed by the core: lookup-by-id plus the filtered
/// queries the views need. Implementations own cascade semantics (board
/// delete removes its tasks and their comments; task delete removes its
/// comments).
pub trait BoardStore: Send + Sync {
    // User directory (identity projections, written by the external auth
    // system's sync path).
    fn user(&self, id: UserId) -> Option<UserProfile>;
    fn user_by_email(&self, email: &str) -> Option<UserProfile>;
    fn upsert_user(&self, user: UserProfile);

    fn board(&self, id: BoardId) -> Option<Board>;
    /// Boards the user owns or is a member of.
    fn boards_for(&self, user: UserId) -> Vec<Board>;
    fn upsert_board(&self, board: Board);
    fn remove_board(&self, id: BoardId);

    fn task(&self, id: TaskId) -> Option<Task>;
    fn tasks_on_board(&self, board: BoardId) -> Vec<Task>;
    fn tasks_assigned_to(&self, user: UserId) -> Vec<Task>;
    fn tasks_reviewed_by(&self, user: UserId) -> Vec<Task>;
    fn upsert_task(&self, task: Task);
    fn remove_task(&self, id: TaskId);

    fn comment(&self, id: CommentId) -> Option<Comment>;
    /// Comments on a task, newest first.
    fn comments_on_task(&self, task: TaskId) -> Vec<Comment>;
    fn comment_count(&self, task: TaskId) -> usize;
    fn upsert_comment(&self, comment: Comment);
    fn remove_comment(&self, id: CommentId);
}

impl<S> BoardStore for Arc<S>
where
    S: BoardStore + ?Sized,
{
    fn user(&self, id: UserId) -> Option<UserProfile> {
        (**self).user(id)
    }

    fn user_by_email(&self, email: &str) -> Option<UserProfile> {
        (**self).user_by_email(email)
    }

    fn upsert_user(&self, user: UserProfile) {
        (**self).upsert_user(user)
    }

    fn board(&self, id: BoardId) -> Option<Board> {
        (**self).board(id)
    }

    fn boards_for(&self, user: UserId) -> Vec<Board> {
        (**self).boards_for(user)
    }

    fn upsert_board(&self, board: Board) {
        (**self).upsert_board(board)
    }

    fn remove_board(&self, id: BoardId) {
        (**self).remove_board(id)
    }

    fn task(&self, id: TaskId) -> Option<Task> {
        (**self).task(id)
    }

    fn tasks_on_board(&self, board: BoardId) -> Vec<Task> {
        (**self).tasks_on_board(board)
    }

    fn tasks_assigned_to(&self, user: UserId) -> Vec<Task> {
        (**self).tasks_assigned_to(user)
    }

    fn tasks_reviewed_by(&self, user: UserId) -> Vec<Task> {
        (**self).tasks_reviewed_by(user)
    }

    fn upsert_task(&self, task: Task) {
        (**self).upsert_task(task)
    }

    fn remove_task(&self, id: TaskId) {
        (**self).remove_task(id)
    }

    fn comment(&self, id: CommentId) -> Option<Comment> {
        (**self).comment(id)
    }

    fn comments_on_task(&self, task: TaskId) -> Vec<Comment> {
        (**self).comments_on_task(task)
    }

    fn comment_count(&self, task: TaskId) -> usize {
        (**self).comment_count(task)
    }

    fn upsert_comment(&self, comment: Comment) {
        (**self).upsert_comment(comment)
    }

    fn remove_comment(&self, id: CommentId) {
        (**self).remove_comment(id)
    }
}

#[derive(Default)]
struct StoreState {
    users: HashMap<UserId, UserProfile>,
    boards: HashMap<BoardId, Board>,
    tasks: HashMap<TaskId, Task>,
    comments: HashMap<CommentId, Comment>,
}

/// In-memory store for tests/dev behind a single `RwLock`.
#[derive(Default)]
pub struct InMemoryBoardStore {
    inner: RwLock<StoreState>,
}

impl InMemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoardStore for InMemoryBoardStore {
    fn user(&self, id: UserId) -> Option<UserProfile> {
        let state = self.inner.read().ok()?;
        state.users.get(&id).cloned()
    }

    fn user_by_email(&self, email: &str) -> Option<UserProfile> {
        let state = self.inner.read().ok()?;
        state.users.values().find(|u| u.email == email).cloned()
    }

    fn upsert_user(&self, user: UserProfile) {
        let Some(mut state) = self.write_state() else {
            return;
        };
        state.users.insert(user.id, user);
    }

    fn board(&self, id: BoardId) -> Option<Board> {
        let state = self.inner.read().ok()?;
        state.boards.get(&id).cloned()
    }

    fn boards_for(&self, user: UserId) -> Vec<Board> {
        let state = match self.inner.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .filter(|b| b.is_owner(user) || b.is_member(user))
            .cloned()
            .collect();
        boards.sort_by_key(|b| *b.id_typed().as_uuid());
        boards
    }

    fn upsert_board(&self, board: Board) {
        let Some(mut state) = self.write_state() else {
            return;
        };
        state.boards.insert(board.id_typed(), board);
    }

    fn remove_board(&self, id: BoardId) {
        let Some(mut state) = self.write_state() else {
            return;
        };
        if state.boards.remove(&id).is_none() {
            return;
        }
        let task_ids: Vec<TaskId> = state
            .tasks
            .values()
            .filter(|t| t.board() == id)
            .map(|t| t.id_typed())
            .collect();
        for task_id in &task_ids {
            state.tasks.remove(task_id);
        }
        state
            .comments
            .retain(|_, c| !task_ids.contains(&c.task()));
        tracing::debug!(board = %id, tasks = task_ids.len(), "cascaded board delete");
    }

    fn task(&self, id: TaskId) -> Option<Task> {
        let state = self.inner.read().ok()?;
        state.tasks.get(&id).cloned()
    }

    fn tasks_on_board(&self, board: BoardId) -> Vec<Task> {
        self.tasks_where(|t| t.board() == board)
    }

    fn tasks_assigned_to(&self, user: UserId) -> Vec<Task> {
        self.tasks_where(|t| t.assignee() == Some(user))
    }

    fn tasks_reviewed_by(&self, user: UserId) -> Vec<Task> {
        self.tasks_where(|t| t.reviewer() == Some(user))
    }

    fn upsert_task(&self, task: Task) {
        let Some(mut state) = self.write_state() else {
            return;
        };
        state.tasks.insert(task.id_typed(), task);
    }

    fn remove_task(&self, id: TaskId) {
        let Some(mut state) = self.write_state() else {
            return;
        };
        if state.tasks.remove(&id).is_some() {
            state.comments.retain(|_, c| c.task() != id);
        }
    }

    fn comment(&self, id: CommentId) -> Option<Comment> {
        let state = self.inner.read().ok()?;
        state.comments.get(&id).cloned()
    }

    fn comments_on_task(&self, task: TaskId) -> Vec<Comment> {
        let state = match self.inner.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.task() == task)
            .cloned()
            .collect();
        comments.sort_by_key(|c| std::cmp::Reverse(c.created_at()));
        comments
    }

    fn comment_count(&self, task: TaskId) -> usize {
        match self.inner.read() {
            Ok(state) => state.comments.values().filter(|c| c.task() == task).count(),
            Err(_) => 0,
        }
    }

    fn upsert_comment(&self, comment: Comment) {
        let Some(mut state) = self.write_state() else {
            return;
        };
        state.comments.insert(comment.id_typed(), comment);
    }

    fn remove_comment(&self, id: CommentId) {
        let Some(mut state) = self.write_state() else {
            return;
        };
        state.comments.remove(&id);
    }
}

impl InMemoryBoardStore {
    /// A poisoned lock turns writes into no-ops; that must never be silent.
    fn write_state(&self) -> Option<RwLockWriteGuard<'_, StoreState>> {
        match self.inner.write() {
            Ok(guard) => Some(guard),
            Err(_) => {
                tracing::error!("store lock poisoned; dropping write");
                None
            }
        }
    }

    fn tasks_where(&self, pred: impl Fn(&Task) -> bool) -> Vec<Task> {
        let state = match self.inner.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut tasks: Vec<Task> = state.tasks.values().filter(|t| pred(t)).cloned().collect();
        tasks.sort_by_key(|t| *t.id_typed().as_uuid());
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kanmind_board::{TaskPriority, TaskStatus};

    fn seed_board(store: &InMemoryBoardStore, owner: UserId) -> Board {
        let board = Board::create(BoardId::new(), "Board", owner, vec![]).unwrap();
        store.upsert_board(board.clone());
        board
    }

    fn seed_task(store: &InMemoryBoardStore, board: BoardId, owner: UserId) -> Task {
        let task = Task::create(
            TaskId::new(),
            board,
            owner,
            "Task",
            None,
            TaskStatus::default(),
            TaskPriority::default(),
            None,
            None,
            None,
        )
        .unwrap();
        store.upsert_task(task.clone());
        task
    }

    fn seed_comment(store: &InMemoryBoardStore, task: TaskId, author: UserId) -> Comment {
        let comment =
            Comment::create(CommentId::new(), task, author, "note", Utc::now()).unwrap();
        store.upsert_comment(comment.clone());
        comment
    }

    #[test]
    fn board_delete_cascades_tasks_and_comments() {
        let store = InMemoryBoardStore::new();
        let owner = UserId::new();
        let board = seed_board(&store, owner);
        let task = seed_task(&store, board.id_typed(), owner);
        let comment = seed_comment(&store, task.id_typed(), owner);

        store.remove_board(board.id_typed());

        assert!(store.board(board.id_typed()).is_none());
        assert!(store.task(task.id_typed()).is_none());
        assert!(store.comment(comment.id_typed()).is_none());
    }

    #[test]
    fn task_delete_cascades_comments_only() {
        let store = InMemoryBoardStore::new();
        let owner = UserId::new();
        let board = seed_board(&store, owner);
        let task = seed_task(&store, board.id_typed(), owner);
        let comment = seed_comment(&store, task.id_typed(), owner);

        store.remove_task(task.id_typed());

        assert!(store.board(board.id_typed()).is_some());
        assert!(store.task(task.id_typed()).is_none());
        assert!(store.comment(comment.id_typed()).is_none());
    }

    #[test]
    fn boards_for_matches_owner_and_member_but_not_outsiders() {
        let store = InMemoryBoardStore::new();
        let owner = UserId::new();
        let member = UserId::new();
        let outsider = UserId::new();

        let board = Board::create(BoardId::new(), "Shared", owner, vec![member]).unwrap();
        store.upsert_board(board);

        assert_eq!(store.boards_for(owner).len(), 1);
        assert_eq!(store.boards_for(member).len(), 1);
        assert!(store.boards_for(outsider).is_empty());
    }

    #[test]
    fn assignment_queries_filter_by_role() {
        let store = InMemoryBoardStore::new();
        let owner = UserId::new();
        let assignee = UserId::new();
        let reviewer = UserId::new();
        let board = seed_board(&store, owner);

        let task = Task::create(
            TaskId::new(),
            board.id_typed(),
            owner,
            "Roles",
            None,
            TaskStatus::default(),
            TaskPriority::default(),
            Some(assignee),
            Some(reviewer),
            None,
        )
        .unwrap();
        store.upsert_task(task);

        assert_eq!(store.tasks_assigned_to(assignee).len(), 1);
        assert!(store.tasks_assigned_to(reviewer).is_empty());
        assert_eq!(store.tasks_reviewed_by(reviewer).len(), 1);
    }

    #[test]
    fn comments_are_listed_newest_first() {
        let store = InMemoryBoardStore::new();
        let owner = UserId::new();
        let board = seed_board(&store, owner);
        let task = seed_task(&store, board.id_typed(), owner);

        let t0 = Utc::now();
        let older = Comment::create(CommentId::new(), task.id_typed(), owner, "old", t0).unwrap();
        let newer = Comment::create(
            CommentId::new(),
            task.id_typed(),
            owner,
            "new",
            t0 + chrono::Duration::seconds(5),
        )
        .unwrap();
        store.upsert_comment(older.clone());
        store.upsert_comment(newer.clone());

        let listed = store.comments_on_task(task.id_typed());
        assert_eq!(listed[0].id_typed(), newer.id_typed());
        assert_eq!(listed[1].id_typed(), older.id_typed());
    }

    #[test]
    fn user_directory_lookup_by_email() {
        let store = InMemoryBoardStore::new();
        let user = UserProfile {
            id: UserId::new(),
            email: "a@example.com".to_string(),
            fullname: "Ada".to_string(),
        };
        store.upsert_user(user.clone());

        assert_eq!(store.user_by_email("a@example.com"), Some(user));
        assert_eq!(store.user_by_email("b@example.com"), None);
    }

    #[test]
    fn a_poisoned_lock_drops_writes_without_panicking() {
        let store = Arc::new(InMemoryBoardStore::new());
        let owner = UserId::new();
        let board = seed_board(&store, owner);

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        // Writes and reads degrade instead of propagating the panic.
        let late = Board::create(BoardId::new(), "Late", owner, vec![]).unwrap();
        store.upsert_board(late.clone());
        store.remove_board(board.id_typed());

        assert!(store.board(late.id_typed()).is_none());
        assert!(store.boards_for(owner).is_empty());
    }
}
