use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Role every account holds regardless of what is stored.
pub const BASE_ROLE: &str = "user";

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub roles: Vec<String>,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Stored roles plus the base role, deduplicated.
    pub fn roles(&self) -> Vec<String> {
        let mut roles = self.roles.clone();
        roles.push(BASE_ROLE.to_string());
        roles.sort();
        roles.dedup();
        roles
    }
}

/// Fields needed to insert a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_always_include_base_role() {
        let mut user = User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            password_hash: String::new(),
            roles: vec![],
            created_at: OffsetDateTime::now_utc(),
        };
        assert_eq!(user.roles(), vec!["user".to_string()]);

        user.roles = vec!["admin".into(), "user".into()];
        assert_eq!(user.roles(), vec!["admin".to_string(), "user".to_string()]);
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            password_hash: "$argon2id$secret".into(),
            roles: vec![],
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
    }
}
