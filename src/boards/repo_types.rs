use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Job board record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub id: Uuid,
    pub user_id: Uuid, // owner
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Board {
    pub fn new(user_id: Uuid, name: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            description,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
