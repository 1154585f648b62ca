use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use kitflow_core::DomainError;
use kitflow_infra::MailError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InsufficientStock(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_stock", msg)
        }
        DomainError::Unauthorized => {
            json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized")
        }
    }
}

pub fn mail_error_to_response(err: MailError) -> axum::response::Response {
    match err {
        MailError::InvalidAddress(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_address", msg)
        }
        MailError::Config(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "mailer_config", msg)
        }
        MailError::Transport(msg) => json_error(StatusCode::BAD_GATEWAY, "mail_failed", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
