use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    emails::dto::{EmailRequest, EmailResponse},
    emails::services::generate_and_log,
    state::AppState,
};

pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/generate/", post(generate_email))
}

#[instrument(skip(state, user, payload))]
pub async fn generate_email(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<EmailResponse>, (StatusCode, String)> {
    if payload.user_input.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "user_input is required".into()));
    }

    match generate_and_log(&state, user.id, &payload).await {
        Ok(generated_email) => {
            info!(user_id = %user.id, "email generated");
            Ok(Json(EmailResponse { generated_email }))
        }
        Err(e) => {
            error!(error = %e, user_id = %user.id, "generate_and_log failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
