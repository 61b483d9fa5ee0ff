pub use crate::auth::repo_types::User;
use sqlx::PgPool;

impl User {
    /// Find a non-deleted user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, email, hashed_password, is_deleted, created_at
            FROM users
            WHERE email = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a non-deleted user by username.
    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, email, hashed_password, is_deleted, created_at
            FROM users
            WHERE username = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Resolve an identifier to a user. An identifier containing '@' is
    /// treated as an email, anything else as a username.
    pub async fn find_by_identifier(db: &PgPool, identifier: &str) -> anyhow::Result<Option<User>> {
        if identifier.contains('@') {
            User::find_by_email(db, identifier).await
        } else {
            User::find_by_username(db, identifier).await
        }
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        name: &str,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, username, email, hashed_password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, username, email, hashed_password, is_deleted, created_at
            "#,
        )
        .bind(name)
        .bind(username)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
