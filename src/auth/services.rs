pub(crate) use crate::auth::dto::{Claims, JwtKeys};
use crate::auth::repo::User;
use crate::config::JwtConfig;
use crate::state::AppState;
use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use std::time::Duration;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let hash = bcrypt::hash(plain, bcrypt::DEFAULT_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let ok = bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(ok)
}

/// Resolve credentials to a user. The caller cannot tell an unknown
/// identifier apart from a wrong password; both come back as `None`.
pub async fn authenticate(
    db: &PgPool,
    identifier: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    let Some(user) = User::find_by_identifier(db, identifier).await? else {
        return Ok(None);
    };
    if verify_password(password, &user.hashed_password)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, subject: &str) -> anyhow::Result<String> {
        self.sign_with_ttl(subject, TimeDuration::seconds(self.ttl.as_secs() as i64))
    }

    pub fn sign_with_ttl(&self, subject: &str, ttl: TimeDuration) -> anyhow::Result<String> {
        let exp = OffsetDateTime::now_utc() + ttl;
        let claims = Claims {
            sub: subject.to_string(),
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(subject = %subject, "token signed");
        Ok(token)
    }

    /// Verify a token and return its subject. Expired, malformed and
    /// wrongly-signed tokens all come back as errors; callers map them
    /// to an unauthenticated response.
    pub fn verify(&self, token: &str) -> anyhow::Result<String> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(subject = %data.claims.sub, "token verified");
        Ok(data.claims.sub)
    }
}
