use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

use models::errors::ValidationErrors;
use service::errors::ServiceError;

pub const VALIDATION_TITLE: &str = "One or more validation errors occurred.";

/// JSON error body: `{"title", "status", "detail"?, "errors"?}`.
/// A bare 404 carries no body at all.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
    pub errors: Option<ValidationErrors>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &str, detail: Option<String>) -> Self {
        Self { status, title: title.to_string(), detail, errors: None }
    }

    pub fn not_found() -> Self { Self::new(StatusCode::NOT_FOUND, "Not Found", None) }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self { errors: Some(errors), ..Self::new(StatusCode::BAD_REQUEST, VALIDATION_TITLE, None) }
    }

    pub fn body(&self) -> Value {
        let mut body = json!({"title": self.title, "status": self.status.as_u16()});
        if let Some(detail) = &self.detail {
            body["detail"] = json!(detail);
        }
        if let Some(errors) = &self.errors {
            body["errors"] = json!(errors);
        }
        body
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errs) => JsonApiError::validation(errs),
            ServiceError::IdMismatch { .. } => JsonApiError::new(StatusCode::BAD_REQUEST, "Id Mismatch", Some(e.to_string())),
            ServiceError::NotFound(_) => JsonApiError::not_found(),
            ServiceError::InsufficientStock => JsonApiError::new(StatusCode::BAD_REQUEST, "Insufficient Stock", Some(e.to_string())),
            ServiceError::Concurrency(_) => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Concurrency Conflict", Some(e.to_string())),
            ServiceError::IdGeneration(_) => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Id Generation Failed", Some(e.to_string())),
            ServiceError::Db(_) => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string())),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), title = %self.title, detail = ?self.detail, "request failed");
        }
        if self.status == StatusCode::NOT_FOUND && self.detail.is_none() {
            return StatusCode::NOT_FOUND.into_response();
        }
        (self.status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: ServiceError) -> StatusCode { JsonApiError::from(e).status }

    #[test]
    fn maps_service_errors_to_status_codes() {
        assert_eq!(status_of(ServiceError::Validation(ValidationErrors::single("name", "x"))), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::IdMismatch { path: 1, body: 2 }), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::InsufficientStock), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::NotFound(9)), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ServiceError::Concurrency("c".into())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of(ServiceError::IdGeneration("g".into())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of(ServiceError::Db("d".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_body_lists_fields() {
        let err = JsonApiError::validation(ValidationErrors::single("price", "The price must be greater than 0."));
        let body = err.body();
        assert_eq!(body["status"], 400);
        assert_eq!(body["title"], VALIDATION_TITLE);
        assert_eq!(body["errors"]["price"][0], "The price must be greater than 0.");
        assert!(body.get("detail").is_none());
    }
}
