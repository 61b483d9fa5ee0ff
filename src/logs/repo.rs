pub use crate::logs::repo_types::{EmailLog, NewEmailLog};
use sqlx::PgPool;
use uuid::Uuid;

impl EmailLog {
    /// Insert one log row.
    pub async fn insert(db: &PgPool, new: NewEmailLog<'_>) -> anyhow::Result<EmailLog> {
        let log = sqlx::query_as::<_, EmailLog>(
            r#"
            INSERT INTO email_logs
                (user_id, user_input, reply_to, context, length, tone, generated_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, user_input, reply_to, context, length, tone,
                      generated_email, timestamp
            "#,
        )
        .bind(new.user_id)
        .bind(new.user_input)
        .bind(new.reply_to)
        .bind(new.context)
        .bind(new.length)
        .bind(new.tone)
        .bind(new.generated_email)
        .fetch_one(db)
        .await?;
        Ok(log)
    }

    /// All logs belonging to one user, newest first.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<EmailLog>> {
        let rows = sqlx::query_as::<_, EmailLog>(
            r#"
            SELECT id, user_id, user_input, reply_to, context, length, tone,
                   generated_email, timestamp
            FROM email_logs
            WHERE user_id = $1
            ORDER BY timestamp DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Fetch one log by id, scoped to its owner. A log owned by someone
    /// else is indistinguishable from a missing one.
    pub async fn get_for_user(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<EmailLog>> {
        let log = sqlx::query_as::<_, EmailLog>(
            r#"
            SELECT id, user_id, user_input, reply_to, context, length, tone,
                   generated_email, timestamp
            FROM email_logs
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(log)
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::auth::repo::User;
    use crate::auth::services::hash_password;

    async fn make_user(db: &PgPool, name: &str, username: &str, email: &str) -> User {
        let hash = hash_password("hunter2secret").unwrap();
        User::create(db, name, username, email, &hash).await.unwrap()
    }

    async fn log_for(db: &PgPool, user_id: Uuid, input: &str) -> EmailLog {
        EmailLog::insert(
            db,
            NewEmailLog {
                user_id,
                user_input: input,
                reply_to: None,
                context: Some("weekly sync"),
                length: Some(120),
                tone: Some("formal"),
                generated_email: "Dear colleague, ...",
            },
        )
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn get_is_scoped_to_owner(db: PgPool) {
        let alice = make_user(&db, "Alice", "alice", "alice@example.com").await;
        let bob = make_user(&db, "Bob", "bob", "bob@example.com").await;

        let log = log_for(&db, alice.id, "draft a follow-up").await;
        assert_eq!(log.user_id, alice.id);

        let own = EmailLog::get_for_user(&db, log.id, alice.id).await.unwrap();
        assert!(own.is_some());

        // Someone else's log looks exactly like a missing one.
        let foreign = EmailLog::get_for_user(&db, log.id, bob.id).await.unwrap();
        assert!(foreign.is_none());

        let missing = EmailLog::get_for_user(&db, Uuid::new_v4(), alice.id)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[sqlx::test]
    async fn list_returns_only_own_logs(db: PgPool) {
        let alice = make_user(&db, "Alice", "alice", "alice@example.com").await;
        let bob = make_user(&db, "Bob", "bob", "bob@example.com").await;

        log_for(&db, alice.id, "first").await;
        log_for(&db, alice.id, "second").await;
        log_for(&db, bob.id, "bob's draft").await;

        let logs = EmailLog::list_by_user(&db, alice.id).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|l| l.user_id == alice.id));
    }
}
