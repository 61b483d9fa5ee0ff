use uuid::Uuid;

use crate::emails::dto::EmailRequest;
use crate::logs::repo::{EmailLog, NewEmailLog};
use crate::state::AppState;

pub fn build_prompt(req: &EmailRequest) -> String {
    format!(
        "Write an email based on the following input:\n\
         - User Input: {}\n\
         - Reply To: {}\n\
         - Context: {}\n\
         - Length: {} characters\n\
         - Tone: {}\n",
        req.user_input,
        req.reply_to.as_deref().unwrap_or("N/A"),
        req.context.as_deref().unwrap_or("N/A"),
        req.length,
        req.tone,
    )
}

/// Call the generation API and persist one log row owned by `user_id`.
/// A failure in either step fails the whole request; no partial recovery.
pub async fn generate_and_log(
    st: &AppState,
    user_id: Uuid,
    req: &EmailRequest,
) -> anyhow::Result<String> {
    let prompt = build_prompt(req);
    let generated = st.generator.generate(&prompt, req.length.max(1) as u32).await?;

    EmailLog::insert(
        &st.db,
        NewEmailLog {
            user_id,
            user_input: &req.user_input,
            reply_to: req.reply_to.as_deref(),
            context: req.context.as_deref(),
            length: Some(req.length),
            tone: Some(&req.tone),
            generated_email: &generated,
        },
    )
    .await?;

    Ok(generated)
}

#[cfg(test)]
mod prompt_tests {
    use super::*;

    fn base_request() -> EmailRequest {
        serde_json::from_str(r#"{"user_input":"decline the meeting politely"}"#).unwrap()
    }

    #[test]
    fn prompt_includes_all_fields() {
        let mut req = base_request();
        req.reply_to = Some("boss@example.com".into());
        req.context = Some("weekly sync".into());
        let prompt = build_prompt(&req);
        assert!(prompt.contains("decline the meeting politely"));
        assert!(prompt.contains("- Reply To: boss@example.com"));
        assert!(prompt.contains("- Context: weekly sync"));
        assert!(prompt.contains("- Length: 120 characters"));
        assert!(prompt.contains("- Tone: formal"));
    }

    #[test]
    fn absent_optionals_render_as_na() {
        let prompt = build_prompt(&base_request());
        assert!(prompt.contains("- Reply To: N/A"));
        assert!(prompt.contains("- Context: N/A"));
    }
}
