use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::logs::repo_types::EmailLog;

#[derive(Debug, Serialize)]
pub struct EmailLogRead {
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

impl From<EmailLog> for EmailLogRead {
    fn from(log: EmailLog) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            user_input: log.user_input,
            reply_to: log.reply_to,
            context: log.context,
            length: log.length,
            tone: log.tone,
            generated_email: log.generated_email,
            timestamp: log.timestamp,
        }
    }
}
