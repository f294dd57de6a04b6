use atelier_shared::pii::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Admin,
}

/// The authenticated caller of a domain operation. Token verification happens
/// in the web layer; the core only sees the resolved identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub email: Masked<String>,
    pub role: Role,
}

impl Actor {
    pub fn customer(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: Masked::new(email.into()),
            role: Role::Customer,
        }
    }

    pub fn admin(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: Masked::new(email.into()),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-or-admin rule shared by order read and cancel paths.
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id || self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_or_admin_access() {
        let owner = Uuid::new_v4();
        let customer = Actor::customer(owner, "a@example.com");
        let stranger = Actor::customer(Uuid::new_v4(), "b@example.com");
        let admin = Actor::admin(Uuid::new_v4(), "ops@example.com");

        assert!(customer.can_access(owner));
        assert!(!stranger.can_access(owner));
        assert!(admin.can_access(owner));
    }
}
