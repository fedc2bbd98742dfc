//! In-memory user store used by tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::users::repo::{StoreError, UserStore};
use crate::users::repo_types::{User, UserChanges, UserField, UserSummary};

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

/// Mirrors the `usuarios` table, including its unique `email` index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn get(&self, id: i64) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == email) {
            return Err(StoreError::UniqueViolation);
        }

        inner.last_id += 1;
        let user = User {
            id: inner.last_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<UserSummary>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().cloned().map(UserSummary::from).collect())
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&id) {
            return Ok(false);
        }

        let new_email = changes.iter().find(|(f, _)| *f == UserField::Email).map(|(_, v)| v);
        if let Some(email) = new_email {
            if inner.users.values().any(|u| u.id != id && u.email == email) {
                return Err(StoreError::UniqueViolation);
            }
        }

        if let Some(user) = inner.users.get_mut(&id) {
            for (field, value) in changes.iter() {
                match field {
                    UserField::Email => user.email = value.to_string(),
                    UserField::PasswordHash => user.password_hash = value.to_string(),
                }
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = InMemoryUserStore::new();
        let a = store.insert("a@x.com", "h1").await.unwrap();
        let b = store.insert("b@x.com", "h2").await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();
        store.insert("a@x.com", "h1").await.unwrap();
        let err = store.insert("a@x.com", "h2").await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_reports_missing_row() {
        let store = InMemoryUserStore::new();
        let changes = UserChanges::new().set(UserField::Email, "x@x.com");
        assert!(!store.update(42, &changes).await.unwrap());
    }

    #[tokio::test]
    async fn update_rejects_email_of_another_row() {
        let store = InMemoryUserStore::new();
        store.insert("a@x.com", "h1").await.unwrap();
        let b = store.insert("b@x.com", "h2").await.unwrap();

        let changes = UserChanges::new().set(UserField::Email, "a@x.com");
        let err = store.update(b.id, &changes).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
        assert_eq!(store.get(b.id).await.unwrap().email, "b@x.com");
    }
}
