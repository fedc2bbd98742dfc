use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};

use crate::config::AppConfig;
use crate::users::{
    repo::{StoreError, UserStore},
    repo_types::{User, UserChanges, UserSummary},
};

/// PostgreSQL-backed user store over the `usuarios` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self { pool })
    }
}

fn classify(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation,
        _ => StoreError::Database(e),
    }
}

/// Builds `UPDATE usuarios SET <col> = $n, ... WHERE id = $m`.
///
/// Column names come from `UserField::column`; every value is a bind parameter.
fn update_query(id: i64, changes: &UserChanges) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE usuarios SET ");
    {
        let mut set = qb.separated(", ");
        for (field, value) in changes.iter() {
            set.push(field.column());
            set.push_unseparated(" = ");
            set.push_bind_unseparated(value.to_owned());
        }
    }
    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password AS password_hash, creado_en AS created_at
            FROM usuarios
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO usuarios (email, password)
            VALUES ($1, $2)
            RETURNING id, email, password AS password_hash, creado_en AS created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn list(&self) -> Result<Vec<UserSummary>, StoreError> {
        let rows = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, email, creado_en AS created_at
            FROM usuarios
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<bool, StoreError> {
        if changes.is_empty() {
            return Ok(false);
        }
        let mut qb = update_query(id, changes);
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
