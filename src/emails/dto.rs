use serde::{Deserialize, Serialize};

/// Request body for email generation. A `user_id` field in the body is
/// ignored; the log row is always owned by the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub user_input: String,
    pub reply_to: Option<String>,
    pub context: Option<String>,
    #[serde(default = "default_length")]
    pub length: i32,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_length() -> i32 {
    120
}

fn default_tone() -> String {
    "formal".into()
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub generated_email: String,
}
