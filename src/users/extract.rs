use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{AccountError, INVALID_BODY};

/// `axum::Json` whose rejections (bad syntax, wrong field types, missing
/// content type) all answer 400 like any other validation failure.
#[derive(Debug)]
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AccountError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => {
                warn!(reason = describe(&rejection), "rejected request body");
                Err(AccountError::Validation(INVALID_BODY))
            }
        }
    }
}

// serde messages can echo field values, so only the kind of failure is logged.
fn describe(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::JsonDataError(_) => "invalid JSON data",
        JsonRejection::JsonSyntaxError(_) => "invalid JSON syntax",
        JsonRejection::MissingJsonContentType(_) => "missing JSON content type",
        _ => "unreadable body",
    }
}
