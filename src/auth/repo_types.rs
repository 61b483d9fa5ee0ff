use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String, // unique
    pub email: String,    // unique
    #[serde(skip_serializing)]
    pub hashed_password: String, // bcrypt hash, not exposed in JSON
    pub is_deleted: bool,
    pub created_at: OffsetDateTime,
}
