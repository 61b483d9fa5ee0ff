use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One generation request and its output. Immutable after insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_input: String,
    pub reply_to: Option<String>,
    pub context: Option<String>,
    pub length: Option<i32>,
    pub tone: Option<String>,
    pub generated_email: String,
    pub timestamp: OffsetDateTime,
}

/// Insert parameters for a new log row.
#[derive(Debug)]
pub struct NewEmailLog<'a> {
    pub user_id: Uuid,
    pub user_input: &'a str,
    pub reply_to: Option<&'a str>,
    pub context: Option<&'a str>,
    pub length: Option<i32>,
    pub tone: Option<&'a str>,
    pub generated_email: &'a str,
}
