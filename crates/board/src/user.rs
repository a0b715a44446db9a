use serde::{Deserialize, Serialize};

use kanmind_core::UserId;

/// Minimal projection of an externally-managed identity.
///
/// This is all the core ever sees of a user; credentials and token material
/// live with the auth service and are never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub fullname: String,
}
