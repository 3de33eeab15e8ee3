use uuid::Uuid;

use crate::auth::dto::PublicUser;
use crate::auth::repo::Role;

/// Single owner-or-admin check used by every mutating handler.
pub fn can_modify(user: &PublicUser, owner_id: Uuid) -> bool {
    user.role == Role::Admin || user.id == owner_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn user(id: Uuid, role: Role) -> PublicUser {
        PublicUser {
            id,
            email: "a@example.com".into(),
            username: "a".into(),
            name: "A".into(),
            role,
            avatar: None,
            bio: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn owner_can_modify() {
        let id = Uuid::new_v4();
        assert!(can_modify(&user(id, Role::User), id));
    }

    #[test]
    fn admin_can_modify_anything() {
        assert!(can_modify(&user(Uuid::new_v4(), Role::Admin), Uuid::new_v4()));
    }

    #[test]
    fn other_users_cannot_modify() {
        assert!(!can_modify(&user(Uuid::new_v4(), Role::User), Uuid::new_v4()));
    }
}
