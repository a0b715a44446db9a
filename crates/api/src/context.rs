use kanmind_core::UserId;

/// Authenticated actor for a request.
///
/// Injected by the auth middleware; handlers can rely on it being present on
/// every protected route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ActorContext {
    user_id: UserId,
}

impl ActorContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
