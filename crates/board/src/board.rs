use serde::{Deserialize, Serialize};

use kanmind_core::{BoardId, DomainError, DomainResult, Entity, UserId};

const TITLE_MAX: usize = 55;

/// A board: a container of tasks with an owner and a member set.
///
/// The owner is fixed at creation and is always part of the member set; no
/// mutation path can remove them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    title: String,
    owner: UserId,
    members: Vec<UserId>,
}

impl Board {
    /// Create a board owned by `owner`.
    ///
    /// The owner joins the member set implicitly; `members` may carry
    /// additional users and is de-duplicated.
    pub fn create(
        id: BoardId,
        title: impl Into<String>,
        owner: UserId,
        members: Vec<UserId>,
    ) -> DomainResult<Self> {
        let title = validate_title(title.into())?;

        let mut board = Self {
            id,
            title,
            owner,
            members: Vec::new(),
        };
        board.set_members(members);
        Ok(board)
    }

    pub fn id_typed(&self) -> BoardId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    pub fn is_owner(&self, user: UserId) -> bool {
        self.owner == user
    }

    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn rename(&mut self, title: impl Into<String>) -> DomainResult<()> {
        self.title = validate_title(title.into())?;
        Ok(())
    }

    /// Replace the member set.
    ///
    /// The owner is re-added unconditionally, so membership updates can never
    /// break the owner-is-a-member invariant.
    pub fn replace_members(&mut self, members: Vec<UserId>) {
        self.set_members(members);
    }

    fn set_members(&mut self, members: Vec<UserId>) {
        let mut next = vec![self.owner];
        for user in members {
            if !next.contains(&user) {
                next.push(user);
            }
        }
        self.members = next;
    }
}

impl Entity for Board {
    type Id = BoardId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_title(title: String) -> DomainResult<String> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(DomainError::validation("title must not be empty"));
    }
    if title.chars().count() > TITLE_MAX {
        return Err(DomainError::validation(format!(
            "title must be at most {TITLE_MAX} characters"
        )));
    }
    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_board_id() -> BoardId {
        BoardId::new()
    }

    #[test]
    fn owner_is_a_member_immediately_after_creation() {
        let owner = UserId::new();
        let board = Board::create(test_board_id(), "Sprint 12", owner, vec![]).unwrap();

        assert!(board.is_member(owner));
        assert!(board.is_owner(owner));
        assert_eq!(board.member_count(), 1);
    }

    #[test]
    fn extra_members_are_kept_and_deduplicated() {
        let owner = UserId::new();
        let other = UserId::new();
        let board =
            Board::create(test_board_id(), "Sprint 12", owner, vec![other, other, owner]).unwrap();

        assert_eq!(board.member_count(), 2);
        assert!(board.is_member(other));
    }

    #[test]
    fn replace_members_keeps_the_owner() {
        let owner = UserId::new();
        let a = UserId::new();
        let b = UserId::new();
        let mut board = Board::create(test_board_id(), "Sprint 12", owner, vec![a]).unwrap();

        board.replace_members(vec![b]);

        assert!(board.is_member(owner));
        assert!(board.is_member(b));
        assert!(!board.is_member(a));
    }

    #[test]
    fn rejects_empty_title() {
        let err = Board::create(test_board_id(), "   ", UserId::new(), vec![]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_overlong_title() {
        let title = "x".repeat(TITLE_MAX + 1);
        let err = Board::create(test_board_id(), title, UserId::new(), vec![]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rename_trims_and_validates() {
        let mut board = Board::create(test_board_id(), "Old", UserId::new(), vec![]).unwrap();
        board.rename("  New title  ").unwrap();
        assert_eq!(board.title(), "New title");
    }
}
