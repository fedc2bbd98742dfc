use tracing::{info, warn};

use crate::{
    error::{
        AccountError, EMAIL_TAKEN, MISSING_FIELD, NO_FIELDS, TERMS_NOT_ACCEPTED, WEAK_PASSWORD,
    },
    state::AppState,
    users::{
        dto::{LoginRequest, PatchUserRequest, RegisterRequest, ReplaceUserRequest},
        password::meets_policy,
        repo::StoreError,
        repo_types::{UserChanges, UserField, UserSummary},
    },
};

/// Empty strings count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Validates and stores a new account. Checks run in order: terms, password policy,
/// email presence, email availability.
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<UserSummary, AccountError> {
    if !req.accept_terms {
        warn!("registration without accepting terms");
        return Err(AccountError::Policy(TERMS_NOT_ACCEPTED));
    }

    let password = req.password.unwrap_or_default();
    if !meets_policy(&password) {
        warn!("registration with weak password");
        return Err(AccountError::Policy(WEAK_PASSWORD));
    }

    let email = present(req.email).ok_or(AccountError::Validation(MISSING_FIELD))?;

    // Only a shortcut: concurrent registrations can both get past it, and the
    // unique index on `email` turns the loser's insert into the same conflict.
    if state.store.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AccountError::Conflict(EMAIL_TAKEN));
    }

    let hash = state.hasher.hash(&password).await?;
    let user = state.store.insert(&email, &hash).await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user.into())
}

/// Checks credentials. Unknown email and wrong password yield the same error.
pub async fn authenticate(state: &AppState, req: LoginRequest) -> Result<UserSummary, AccountError> {
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AccountError::Validation(MISSING_FIELD));
    };

    let Some(user) = state.store.find_by_email(&email).await? else {
        // keep latency close to the wrong-password path
        state.hasher.hash(&password).await?;
        warn!(email = %email, "login unknown email");
        return Err(AccountError::Auth);
    };

    if !state.hasher.verify(&password, &user.password_hash).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AccountError::Auth);
    }

    info!(user_id = user.id, "user logged in");
    Ok(user.into())
}

pub async fn list_users(state: &AppState) -> Result<Vec<UserSummary>, AccountError> {
    Ok(state.store.list().await?)
}

/// Full replacement of email and password.
///
/// Neither the password policy nor email uniqueness against other rows is checked here.
pub async fn replace_user(
    state: &AppState,
    id: i64,
    req: ReplaceUserRequest,
) -> Result<(), AccountError> {
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AccountError::Validation(MISSING_FIELD));
    };

    let hash = state.hasher.hash(&password).await?;
    let changes = UserChanges::new()
        .set(UserField::Email, email)
        .set(UserField::PasswordHash, hash);

    apply_changes(state, id, &changes).await?;
    info!(user_id = id, "user replaced");
    Ok(())
}

/// Partial update; only supplied fields change.
pub async fn patch_user(
    state: &AppState,
    id: i64,
    req: PatchUserRequest,
) -> Result<(), AccountError> {
    let email = present(req.email);
    let password = present(req.password);
    if email.is_none() && password.is_none() {
        return Err(AccountError::Validation(NO_FIELDS));
    }

    let mut changes = UserChanges::new();
    if let Some(email) = email {
        changes = changes.set(UserField::Email, email);
    }
    if let Some(password) = password {
        changes = changes.set(UserField::PasswordHash, state.hasher.hash(&password).await?);
    }

    apply_changes(state, id, &changes).await?;
    info!(user_id = id, "user patched");
    Ok(())
}

// Updates do not re-check email uniqueness; if the unique index rejects the new
// email, that is an internal failure rather than a conflict.
async fn apply_changes(state: &AppState, id: i64, changes: &UserChanges) -> Result<(), AccountError> {
    let updated = match state.store.update(id, changes).await {
        Ok(updated) => updated,
        Err(StoreError::UniqueViolation) => {
            return Err(AccountError::Internal(anyhow::anyhow!(
                "unique constraint rejected update of user {id}"
            )));
        }
        Err(e) => return Err(e.into()),
    };
    if !updated {
        warn!(user_id = id, "update of unknown user");
        return Err(AccountError::NotFound);
    }
    Ok(())
}
