use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest, TokenResponse},
        repo::User,
        services::{authenticate, hash_password, is_valid_email, JwtKeys},
    },
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<PublicUser>, (axum::http::StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((axum::http::StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    if payload.username.is_empty() || payload.username.contains('@') {
        warn!(username = %payload.username, "invalid username");
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Invalid username".into(),
        ));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Password too short".into(),
        ));
    }

    // Ensure username and email are not taken
    if let Ok(Some(_)) = User::find_by_email(&state.db, &payload.email).await {
        warn!(email = %payload.email, "email already registered");
        return Err((
            axum::http::StatusCode::CONFLICT,
            "Email already registered".into(),
        ));
    }
    if let Ok(Some(_)) = User::find_by_username(&state.db, &payload.username).await {
        warn!(username = %payload.username, "username already registered");
        return Err((
            axum::http::StatusCode::CONFLICT,
            "Username already registered".into(),
        ));
    }

    let hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let user = match User::create(
        &state.db,
        &payload.name,
        &payload.username,
        &payload.email,
        &hash,
    )
    .await
    {
        Ok(u) => u,
        // The pre-checks above race with concurrent inserts; the unique
        // constraints are authoritative.
        Err(e) if is_unique_violation(&e) => {
            warn!(username = %payload.username, "duplicate registration");
            return Err((
                axum::http::StatusCode::CONFLICT,
                "Username or email already registered".into(),
            ));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(Json(PublicUser {
        id: user.id,
        name: user.name,
        username: user.username,
        email: user.email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, (axum::http::StatusCode, String)> {
    payload.identifier = payload.identifier.trim().to_string();
    if payload.identifier.contains('@') {
        payload.identifier = payload.identifier.to_lowercase();
    }

    let user = match authenticate(&state.db, &payload.identifier, &payload.password).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            // Unknown identifier and wrong password are deliberately
            // indistinguishable here.
            warn!(identifier = %payload.identifier, "login failed");
            return Err((
                axum::http::StatusCode::UNAUTHORIZED,
                "Invalid credentials".into(),
            ));
        }
        Err(e) => {
            error!(error = %e, "authenticate failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let access_token = match keys.sign(&user.username) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "token sign failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
    }))
}

fn is_unique_violation(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
    )
}

#[cfg(test)]
mod dto_tests {
    use super::*;

    #[test]
    fn public_user_never_serializes_a_hash() {
        let response = PublicUser {
            id: uuid::Uuid::new_v4(),
            name: "Test User".to_string(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("testuser"));
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn token_response_shape() {
        let response = TokenResponse {
            access_token: "abc.def.ghi".to_string(),
            token_type: "bearer".to_string(),
        };

        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "abc.def.ghi");
        assert_eq!(json["token_type"], "bearer");
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use sqlx::PgPool;

    async fn register_alice(state: &AppState) {
        let body = RegisterRequest {
            name: "Alice".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "hunter2secret".into(),
        };
        register(State(state.clone()), Json(body))
            .await
            .expect("register alice");
    }

    #[sqlx::test]
    async fn register_then_login_yields_username_subject(db: PgPool) {
        let state = AppState::fake_with_db(db);
        register_alice(&state).await;

        // Login by username and by email both resolve to the same account,
        // and the token subject is always the username.
        for identifier in ["alice", "alice@example.com"] {
            let Json(token) = login(
                State(state.clone()),
                Json(LoginRequest {
                    identifier: identifier.into(),
                    password: "hunter2secret".into(),
                }),
            )
            .await
            .expect("login");

            let keys = JwtKeys::from_ref(&state);
            assert_eq!(keys.verify(&token.access_token).unwrap(), "alice");
            assert_eq!(token.token_type, "bearer");
        }
    }

    #[sqlx::test]
    async fn wrong_password_and_unknown_identifier_fail_identically(db: PgPool) {
        let state = AppState::fake_with_db(db);
        register_alice(&state).await;

        let wrong_password = login(
            State(state.clone()),
            Json(LoginRequest {
                identifier: "alice".into(),
                password: "wrong-password".into(),
            }),
        )
        .await
        .unwrap_err();

        let unknown_identifier = login(
            State(state.clone()),
            Json(LoginRequest {
                identifier: "nobody".into(),
                password: "hunter2secret".into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.0, axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password, unknown_identifier);
    }

    #[sqlx::test]
    async fn duplicate_registration_is_conflict_not_500(db: PgPool) {
        let state = AppState::fake_with_db(db);
        register_alice(&state).await;

        // Re-register through the handler: caught by the pre-check.
        let (status, _) = register(
            State(state.clone()),
            Json(RegisterRequest {
                name: "Alice Again".into(),
                username: "alice".into(),
                email: "alice2@example.com".into(),
                password: "hunter2secret".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, axum::http::StatusCode::CONFLICT);

        // Racing insert that slips past the pre-check: the unique
        // constraint fires and must still map to a conflict.
        let hash = hash_password("hunter2secret").unwrap();
        let err = User::create(&state.db, "Alice Again", "alice", "alice3@example.com", &hash)
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));

        let err = User::create(&state.db, "Alice Again", "alice3", "alice@example.com", &hash)
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
