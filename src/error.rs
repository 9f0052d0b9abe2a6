//! Application error type and its HTTP mapping.
//!
//! Every handler returns `Result<_, AppError>`. Errors render as
//!
//! ```json
//! { "error": { "code": "validation_error", "message": "...", "details": { ... } } }
//! ```
//!
//! Internal errors never leak their details to the client; the cause is
//! logged instead.

use std::sync::LazyLock;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use regex::Regex;
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::domain::gateways::{PaymentError, StatisticsError};

static MISSING_FIELD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"missing field `([^`]+)`").expect("valid regex"));

static UNKNOWN_VARIANT_FIELD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_.\[\]]+): ").expect("valid regex"));

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload, also embedded in partial-result responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced by handlers, services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation { message: String, details: Value },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String, details: Value },

    #[error("forbidden: {message}")]
    Forbidden { message: String, details: Value },

    #[error("not found: {message}")]
    NotFound { message: String, details: Value },

    #[error("conflict: {message}")]
    Conflict { message: String, details: Value },

    #[error("too many requests for {action}")]
    TooManyRequests { action: String, retry_after_secs: u64 },

    #[error("internal error: {message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn too_many_requests(action: impl Into<String>, retry_after_secs: u64) -> Self {
        Self::TooManyRequests {
            action: action.into(),
            retry_after_secs,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Validation error naming a single offending field.
    pub fn invalid_field(field: &str, code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::bad_request(
            "Validation failed",
            json!({ "fields": [{ "field": field, "code": code, "message": message }] }),
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing view of the error. Internal details are replaced.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Unauthorized { message, details } => ErrorInfo {
                code: "unauthorized",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Forbidden { message, details } => ErrorInfo {
                code: "forbidden",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Conflict { message, details } => ErrorInfo {
                code: "conflict",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::TooManyRequests {
                action,
                retry_after_secs,
            } => ErrorInfo {
                code: "rate_limited",
                message: "Too many requests, try again later".to_string(),
                details: json!({ "action": action, "retry_after_secs": retry_after_secs }),
            },
            AppError::Internal { .. } => ErrorInfo {
                code: "internal_error",
                message: "Internal server error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal { message, details } = &self {
            tracing::error!(%message, %details, "Request failed");
        }

        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };
        let mut response = (status, Json(body)).into_response();

        match &self {
            AppError::Unauthorized { .. } => {
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static("Bearer"),
                );
            }
            AppError::TooManyRequests {
                retry_after_secs, ..
            } => {
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(*retry_after_secs));
            }
            _ => {}
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::internal("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        AppError::internal(
            "Payment processing failed",
            json!({ "provider": e.provider.as_str(), "reason": e.reason }),
        )
    }
}

impl From<StatisticsError> for AppError {
    fn from(e: StatisticsError) -> Self {
        AppError::internal("Statistics lookup failed", json!({ "reason": e.to_string() }))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<Value> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(|err| {
                        json!({
                            "field": field,
                            "code": err.code,
                            "message": err
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("Invalid value for {field}")),
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        fields.sort_by(|a, b| a["field"].as_str().cmp(&b["field"].as_str()));

        AppError::bad_request("Validation failed", json!({ "fields": fields }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();

        if let Some(caps) = MISSING_FIELD_REGEX.captures(&text) {
            return AppError::invalid_field(&caps[1], "required", format!("{} is required", &caps[1]));
        }

        match rejection {
            JsonRejection::JsonDataError(err) => {
                let source = std::error::Error::source(&err)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| err.body_text());
                let field = UNKNOWN_VARIANT_FIELD_REGEX
                    .captures(&source)
                    .map(|caps| caps[1].to_string())
                    .unwrap_or_else(|| "body".to_string());
                AppError::invalid_field(&field, "invalid", source)
            }
            JsonRejection::JsonSyntaxError(_) => {
                AppError::invalid_field("body", "malformed_json", "Request body is not valid JSON")
            }
            JsonRejection::MissingJsonContentType(_) => AppError::invalid_field(
                "content-type",
                "unsupported",
                "Expected `Content-Type: application/json`",
            ),
            other => AppError::invalid_field("body", "unreadable", other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        let text = rejection.body_text();

        match MISSING_FIELD_REGEX.captures(&text) {
            Some(caps) => {
                AppError::invalid_field(&caps[1], "required", format!("{} is required", &caps[1]))
            }
            None => AppError::invalid_field("query", "invalid", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "title must not be empty"))]
        title: String,
        #[validate(range(min = 1))]
        rooms: i32,
    }

    #[test]
    fn test_validation_errors_name_each_field() {
        let sample = Sample {
            title: String::new(),
            rooms: 0,
        };
        let err: AppError = sample.validate().unwrap_err().into();
        let info = err.to_error_info();

        assert_eq!(info.code, "validation_error");
        let fields = info.details["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], "rooms");
        assert_eq!(fields[1]["field"], "title");
        assert_eq!(fields[1]["message"], "title must not be empty");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = AppError::internal("Database error", json!({ "reason": "connection refused" }));
        let info = err.to_error_info();

        assert_eq!(info.code, "internal_error");
        assert_eq!(info.message, "Internal server error");
        assert_eq!(info.details, json!({}));
    }

    #[test]
    fn test_too_many_requests_sets_retry_after() {
        let response = AppError::too_many_requests("valuation", 42).into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = AppError::unauthorized("Unauthorized", json!({})).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::forbidden("x", json!({})).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::not_found("x", json!({})).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict("x", json!({})).status(),
            StatusCode::CONFLICT
        );
    }
}
