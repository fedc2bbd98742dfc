use async_trait::async_trait;

use crate::users::repo_types::{User, UserChanges, UserSummary};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The `email` unique constraint rejected the write.
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Storage collaborator for user records.
///
/// The unique constraint on `email` lives here, not in the callers: implementations must
/// reject a duplicate insert or update with [`StoreError::UniqueViolation`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn list(&self) -> Result<Vec<UserSummary>, StoreError>;

    /// Applies `changes` to the row with `id`. Returns `false` when no such row exists.
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<bool, StoreError>;

    /// Releases pooled connections. Called once on shutdown.
    async fn close(&self) {}
}
