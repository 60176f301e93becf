use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use utoipa::ToSchema;
use validator::Validate;

use crate::item::ItemServiceError;
use crate::list::ListServiceError;

const NOT_FOUND_MESSAGE: &str = "Not found";
const INTERNAL_ERROR_MESSAGE: &str =
    "An unexpected error occurred while processing your request. Please try again later.";

/// JSON response for API errors
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error code
    pub error: String,
    /// Human readable description
    pub message: String,
    /// Per-field validation messages, present only for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            fields: None,
        }
    }

    pub fn with_fields(mut self, fields: BTreeMap<String, Vec<String>>) -> Self {
        self.fields = Some(fields);
        self
    }
}

/// Error type shared by all JSON handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The body deserialized but broke a schema constraint.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
    /// A path segment could not be parsed.
    #[error("Invalid path parameter: {0}")]
    Path(#[from] PathRejection),
    /// A query parameter could not be parsed.
    #[error("Invalid query parameter: {0}")]
    Query(#[from] QueryRejection),
    /// The body was missing, malformed or of the wrong shape.
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
    /// The referenced list or item does not exist.
    #[error("Resource not found")]
    NotFound,
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<ListServiceError> for ApiError {
    fn from(err: ListServiceError) -> Self {
        match err {
            ListServiceError::ListNotFound(_) => ApiError::NotFound,
            ListServiceError::Database(db_err) => ApiError::Database(db_err),
        }
    }
}

impl From<ItemServiceError> for ApiError {
    fn from(err: ItemServiceError) -> Self {
        match err {
            ItemServiceError::ListNotFound(_) | ItemServiceError::ItemNotFound { .. } => {
                ApiError::NotFound
            }
            ItemServiceError::Database(db_err) => ApiError::Database(db_err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_fields(validation_messages(&errors)),
            ),
            ApiError::Path(rejection) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                rejection_response("path", rejection.body_text()),
            ),
            ApiError::Query(rejection) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                rejection_response("query", rejection.body_text()),
            ),
            ApiError::Body(rejection) => (
                rejection.status(),
                rejection_response("body", rejection.body_text()),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", NOT_FOUND_MESSAGE),
            ),
            ApiError::Database(err) => {
                tracing::error!("Database error while handling request: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", INTERNAL_ERROR_MESSAGE),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

fn rejection_response(location: &str, detail: String) -> ErrorResponse {
    let fields = BTreeMap::from([(location.to_string(), vec![detail])]);
    ErrorResponse::new("VALIDATION_ERROR", "Request validation failed").with_fields(fields)
}

/// Flattens validator output into `field -> [message]`, falling back to the
/// rule code when no message was configured.
fn validation_messages(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// `axum::extract::Path` with JSON error responses.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// `axum::extract::Query` with JSON error responses.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

/// JSON body that has passed its `validator` rules.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
