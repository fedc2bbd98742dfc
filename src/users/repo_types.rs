use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database. Not `Serialize`; responses use [`UserSummary`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,                    // assigned by storage
    pub email: String,              // unique
    pub password_hash: String,      // Argon2 PHC string
    pub created_at: OffsetDateTime, // set by storage on insert
}

/// Public projection of a user, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

/// Mutable columns of the `usuarios` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    Email,
    PasswordHash,
}

impl UserField {
    pub fn column(self) -> &'static str {
        match self {
            UserField::Email => "email",
            UserField::PasswordHash => "password",
        }
    }
}

/// Field -> new value map describing an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges(BTreeMap<UserField, String>);

impl UserChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: UserField, value: impl Into<String>) -> Self {
        self.0.insert(field, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserField, &str)> {
        self.0.iter().map(|(f, v)| (*f, v.as_str()))
    }
}
