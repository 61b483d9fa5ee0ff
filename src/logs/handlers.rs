use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    logs::dto::EmailLogRead,
    logs::repo::EmailLog,
    state::AppState,
};

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/logs/", get(list_logs))
        .route("/logs/:id", get(get_log))
}

#[instrument(skip(state, user))]
pub async fn list_logs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<EmailLogRead>>, (StatusCode, String)> {
    let logs = EmailLog::list_by_user(&state.db, user.id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "list_by_user failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(logs.into_iter().map(EmailLogRead::from).collect()))
}

#[instrument(skip(state, user))]
pub async fn get_log(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EmailLogRead>, (StatusCode, String)> {
    let log = EmailLog::get_for_user(&state.db, id, user.id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, %id, "get_for_user failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    match log {
        Some(log) => Ok(Json(EmailLogRead::from(log))),
        None => Err((StatusCode::NOT_FOUND, "Log not found".into())),
    }
}

#[cfg(test)]
mod dto_tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn log_read_carries_all_fields() {
        let log = EmailLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_input: "draft a follow-up".into(),
            reply_to: None,
            context: Some("sales call".into()),
            length: Some(120),
            tone: Some("formal".into()),
            generated_email: "Dear customer, ...".into(),
            timestamp: OffsetDateTime::now_utc(),
        };
        let read = EmailLogRead::from(log.clone());
        assert_eq!(read.id, log.id);
        assert_eq!(read.user_id, log.user_id);
        assert_eq!(read.user_input, "draft a follow-up");
        assert_eq!(read.context.as_deref(), Some("sales call"));
        assert_eq!(read.generated_email, "Dear customer, ...");
    }
}
