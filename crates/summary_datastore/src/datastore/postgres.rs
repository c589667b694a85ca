use anyhow::Context;
use chrono::{Duration, Utc};
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    datastore::DataStore,
    domain::{NewQuery, QueryRecord, User},
};

static MIGRATOR: Migrator = sqlx::migrate!();

const USER_COLUMNS: &str = "id, username, email, disabled, created_at, last_login";

/// Postgres-backed [`DataStore`]. Password hashing and key encryption are
/// delegated to pgcrypto so credentials never transit the application in
/// hashed or encrypted form.
#[derive(Debug, Clone)]
pub struct PgDataStore {
    pub pool: PgPool,
    encryption_key: String,
}

impl PgDataStore {
    /// Establish connection to database and run pending migrations.
    /// `encryption_key` is the process secret under which stored model API
    /// keys are encrypted at rest.
    pub async fn init(database_url: &str, encryption_key: impl Into<String>) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .inspect_err(
                |e| tracing::error!(error = ?e, "Failed to establish connection to database"),
            )
            .context("Failed to connect to postgres database")?;

        MIGRATOR
            .run(&pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to run database migrations"))
            .context("Failed to run database migrations")?;

        Ok(PgDataStore {
            pool,
            encryption_key: encryption_key.into(),
        })
    }
}

impl DataStore for PgDataStore {
    async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, hashed_password)
            VALUES ($1, $2, crypt($3, gen_salt('bf')))
            ON CONFLICT (username) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(email)
        .bind(password)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, username, "Failed to create user"))
        .context("Failed to create user")?;

        Ok(user)
    }

    async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET last_login = now()
            WHERE username = $1
              AND hashed_password = crypt($2, hashed_password)
              AND NOT disabled
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(password)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, username, "Failed to authenticate user"))
        .context("Failed to authenticate user")?;

        Ok(user)
    }

    async fn get_user(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, username, "Failed to fetch user"))
        .context("Failed to fetch user")?;

        Ok(user)
    }

    async fn create_session(&self, username: &str, ttl: Duration) -> anyhow::Result<String> {
        let token = Uuid::new_v4();
        let expires_at = Utc::now() + ttl;

        let inserted = sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            SELECT $1::uuid, id, $3::timestamptz FROM users WHERE username = $2
            "#,
        )
        .bind(token)
        .bind(username)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, username, "Failed to create session"))
        .context("Failed to create session")?;

        if inserted.rows_affected() == 0 {
            anyhow::bail!("No such user: {username}");
        }

        Ok(token.to_string())
    }

    async fn resolve_session(&self, token: &str) -> anyhow::Result<Option<User>> {
        // Garbage tokens are an expected outcome, not a storage failure.
        let Ok(token) = Uuid::parse_str(token) else {
            return Ok(None);
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.disabled, u.created_at, u.last_login
            FROM users u
            JOIN sessions s ON s.user_id = u.id
            WHERE s.token = $1 AND s.expires_at > now() AND NOT u.disabled
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to resolve session"))
        .context("Failed to resolve session")?;

        Ok(user)
    }

    async fn upsert_api_key(
        &self,
        username: &str,
        provider: &str,
        api_key: &str,
    ) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_api_keys (user_id, provider, encrypted_key)
            SELECT id, $2::text, pgp_sym_encrypt($3::text, $4::text)
            FROM users WHERE username = $1
            ON CONFLICT (user_id, provider)
            DO UPDATE SET encrypted_key = EXCLUDED.encrypted_key, updated_at = now()
            "#,
        )
        .bind(username)
        .bind(provider)
        .bind(api_key)
        .bind(&self.encryption_key)
        .execute(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, username, provider, "Failed to store api key"))
        .context("Failed to store api key")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("No such user: {username}");
        }

        Ok(())
    }

    async fn get_api_key(&self, username: &str, provider: &str) -> anyhow::Result<Option<String>> {
        #[derive(sqlx::FromRow)]
        struct DecryptedKey {
            api_key: String,
        }

        let key = sqlx::query_as::<_, DecryptedKey>(
            r#"
            SELECT pgp_sym_decrypt(k.encrypted_key, $3) AS api_key
            FROM user_api_keys k
            JOIN users u ON u.id = k.user_id
            WHERE u.username = $1 AND k.provider = $2
            "#,
        )
        .bind(username)
        .bind(provider)
        .bind(&self.encryption_key)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, username, provider, "Failed to fetch api key"))
        .context("Failed to fetch api key")?;

        Ok(key.map(|k| k.api_key))
    }

    async fn delete_api_key(&self, username: &str, provider: &str) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_api_keys k
            USING users u
            WHERE u.id = k.user_id AND u.username = $1 AND k.provider = $2
            "#,
        )
        .bind(username)
        .bind(provider)
        .execute(&self.pool)
        .await
        .inspect_err(
            |e| tracing::error!(error = ?e, username, provider, "Failed to delete api key"),
        )
        .context("Failed to delete api key")?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_api_key_providers(&self, username: &str) -> anyhow::Result<Vec<String>> {
        #[derive(sqlx::FromRow)]
        struct Provider {
            provider: String,
        }

        let providers = sqlx::query_as::<_, Provider>(
            r#"
            SELECT k.provider
            FROM user_api_keys k
            JOIN users u ON u.id = k.user_id
            WHERE u.username = $1
            ORDER BY k.provider
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, username, "Failed to list api keys"))
        .context("Failed to list api keys")?;

        Ok(providers.into_iter().map(|p| p.provider).collect())
    }

    async fn insert_query(&self, query: &NewQuery) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO queries
                (user_id, url, provider_type, model_type, model_name,
                 word_count, valid, processing_time)
            SELECT id, $2::text, $3::text, $4::text, $5::text,
                   $6::int4, $7::boolean, $8::float8
            FROM users WHERE username = $1
            "#,
        )
        .bind(&query.username)
        .bind(&query.url)
        .bind(&query.provider_type)
        .bind(&query.model_type)
        .bind(&query.model_name)
        .bind(query.word_count)
        .bind(query.valid)
        .bind(query.processing_time)
        .execute(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = ?e,
                username = %query.username,
                url = %query.url,
                "Failed to insert query record"
            )
        })
        .context("Failed to insert query record")?;

        Ok(())
    }

    async fn list_queries(&self, username: &str, limit: i64) -> anyhow::Result<Vec<QueryRecord>> {
        let records = sqlx::query_as::<_, QueryRecord>(
            r#"
            SELECT q.id, q.url, q.provider_type, q.model_type, q.model_name,
                   q.word_count, q.valid, q.processing_time, q.created_at
            FROM queries q
            JOIN users u ON u.id = q.user_id
            WHERE u.username = $1
            ORDER BY q.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, username, "Failed to list query records"))
        .context("Failed to list query records")?;

        Ok(records)
    }
}
