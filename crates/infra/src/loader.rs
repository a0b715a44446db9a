//! Resource loader: eager hydration of the relation chains object-level
//! authorization needs (board → owner/members, task → board,
//! comment → task → board), one store round-trip per hop, no live
//! back-references.

use kanmind_auth::RelationFacts;
use kanmind_board::{Board, Comment, Task};
use kanmind_core::{BoardId, CommentId, TaskId, UserId};

use crate::store::BoardStore;

/// A task together with its board.
#[derive(Debug, Clone)]
pub struct TaskView {
    pub task: Task,
    pub board: Board,
}

/// A comment together with its task and that task's board.
#[derive(Debug, Clone)]
pub struct CommentView {
    pub comment: Comment,
    pub task: Task,
    pub board: Board,
}

/// Facts relating `actor` to a board alone.
pub fn board_facts(board: &Board, actor: UserId) -> RelationFacts {
    RelationFacts {
        is_board_owner: board.is_owner(actor),
        is_board_member: board.is_member(actor),
        ..Default::default()
    }
}

impl TaskView {
    /// Facts relating `actor` to this task, computed once from the snapshot
    /// taken at load time.
    pub fn facts(&self, actor: UserId) -> RelationFacts {
        RelationFacts {
            is_board_owner: self.board.is_owner(actor),
            is_board_member: self.board.is_member(actor),
            is_task_owner: self.task.owner() == actor,
            is_assignee: self.task.assignee() == Some(actor),
            is_reviewer: self.task.reviewer() == Some(actor),
            ..Default::default()
        }
    }
}

impl CommentView {
    pub fn facts(&self, actor: UserId) -> RelationFacts {
        RelationFacts {
            is_board_owner: self.board.is_owner(actor),
            is_board_member: self.board.is_member(actor),
            is_task_owner: self.task.owner() == actor,
            is_comment_author: self.comment.author() == actor,
            is_assignee: self.task.assignee() == Some(actor),
            is_reviewer: self.task.reviewer() == Some(actor),
        }
    }
}

/// Read-only joins over a [`BoardStore`].
pub struct Loader<'a, S: BoardStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: BoardStore + ?Sized> Loader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn board(&self, id: BoardId) -> Option<Board> {
        self.store.board(id)
    }

    pub fn task_view(&self, id: TaskId) -> Option<TaskView> {
        let task = self.store.task(id)?;
        let board = self.store.board(task.board())?;
        Some(TaskView { task, board })
    }

    pub fn comment_view(&self, id: CommentId) -> Option<CommentView> {
        let comment = self.store.comment(id)?;
        let task = self.store.task(comment.task())?;
        let board = self.store.board(task.board())?;
        Some(CommentView {
            comment,
            task,
            board,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryBoardStore;
    use chrono::Utc;
    use kanmind_board::{TaskPriority, TaskStatus};

    struct Fixture {
        store: InMemoryBoardStore,
        owner: UserId,
        member: UserId,
        task_id: TaskId,
        comment_id: CommentId,
    }

    fn fixture() -> Fixture {
        let store = InMemoryBoardStore::new();
        let owner = UserId::new();
        let member = UserId::new();

        let board = Board::create(BoardId::new(), "Board", owner, vec![member]).unwrap();
        let task = Task::create(
            TaskId::new(),
            board.id_typed(),
            member,
            "Task",
            None,
            TaskStatus::default(),
            TaskPriority::default(),
            Some(member),
            None,
            None,
        )
        .unwrap();
        let comment = Comment::create(
            CommentId::new(),
            task.id_typed(),
            member,
            "note",
            Utc::now(),
        )
        .unwrap();

        let task_id = task.id_typed();
        let comment_id = comment.id_typed();
        store.upsert_board(board);
        store.upsert_task(task);
        store.upsert_comment(comment);

        Fixture {
            store,
            owner,
            member,
            task_id,
            comment_id,
        }
    }

    #[test]
    fn task_view_resolves_the_board_and_computes_facts() {
        let f = fixture();
        let loader = Loader::new(&f.store);

        let view = loader.task_view(f.task_id).unwrap();

        let owner_facts = view.facts(f.owner);
        assert!(owner_facts.is_board_owner);
        assert!(owner_facts.is_board_member);
        assert!(!owner_facts.is_task_owner);

        let member_facts = view.facts(f.member);
        assert!(!member_facts.is_board_owner);
        assert!(member_facts.is_board_member);
        assert!(member_facts.is_task_owner);
        assert!(member_facts.is_assignee);
    }

    #[test]
    fn comment_view_walks_the_full_chain() {
        let f = fixture();
        let loader = Loader::new(&f.store);

        let view = loader.comment_view(f.comment_id).unwrap();

        let author_facts = view.facts(f.member);
        assert!(author_facts.is_comment_author);

        let owner_facts = view.facts(f.owner);
        assert!(!owner_facts.is_comment_author);
        assert!(owner_facts.is_board_owner);
    }

    #[test]
    fn outsider_gets_empty_facts() {
        let f = fixture();
        let loader = Loader::new(&f.store);

        let view = loader.task_view(f.task_id).unwrap();
        assert_eq!(view.facts(UserId::new()), RelationFacts::default());
    }

    #[test]
    fn missing_entities_resolve_to_none() {
        let f = fixture();
        let loader = Loader::new(&f.store);

        assert!(loader.task_view(TaskId::new()).is_none());
        assert!(loader.comment_view(CommentId::new()).is_none());
        assert!(loader.board(BoardId::new()).is_none());
    }
}
