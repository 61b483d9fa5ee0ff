use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use tracing::warn;

use crate::auth::repo::User;
use crate::auth::services::JwtKeys;
use crate::state::AppState;

/// Extracts the bearer token, verifies it and re-resolves the subject to a
/// user record. Any failure along the way is a 401.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            ))?;

        let keys = JwtKeys::from_ref(state);
        let subject = match keys.verify(token) {
            Ok(s) => s,
            Err(_) => {
                warn!("invalid or expired token");
                return Err((
                    StatusCode::UNAUTHORIZED,
                    "User not authenticated.".to_string(),
                ));
            }
        };

        // The subject is whatever identifier the user logged in with;
        // resolve it by the same email-or-username rule.
        let user = User::find_by_identifier(&state.db, &subject)
            .await
            .ok()
            .flatten()
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "User not authenticated.".to_string(),
            ))?;

        Ok(CurrentUser(user))
    }
}
