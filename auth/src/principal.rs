//! The authenticated caller identity threaded through handlers.

use ticketline_core::{Role, User, UserId};

/// The resolved identity of an authenticated request.
///
/// Built by the web layer after token verification and a fresh user-row
/// lookup, then passed by value into whatever operation needs it. Handlers
/// and stores never consult global state for "the current user".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The authenticated user's id
    pub user_id: UserId,
    /// The authenticated user's login name
    pub username: String,
    /// The authenticated user's current role (from storage, not the token)
    pub role: Role,
}

impl Principal {
    /// Whether this principal holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn principal_from_user() {
        let user = User {
            id: UserId::new(),
            username: "bob".to_string(),
            password_hash: String::new(),
            role: Role::Admin,
            enabled: true,
            created_at: Utc::now(),
        };
        let principal = Principal::from(&user);
        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.username, "bob");
        assert!(principal.is_admin());
    }
}
