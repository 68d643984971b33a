//! Admission and validation errors - each maps onto one fixed wire message.
//!
//! Internal detail (store error text, parse errors) is logged where the
//! failure happens and never reaches the caller; only the stable
//! status/message pairs below do.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use modcheck_shared::ApiMessage;
use std::fmt;

use crate::responses;

/// Application-level error type covering every terminal outcome of the
/// admission pipeline and the verification handler.
#[derive(Debug)]
pub enum AppError {
    /// No (or no recognized) Api-Key header.
    AuthorizationRequired,
    /// The request body is not decodable JSON.
    InvalidJson,
    /// The payload decoded but the account fields have unexpected lengths.
    InvalidBankAccount,
    /// The caller is over its window quota.
    RateExceeded,
    /// The counter store could not be reached; fail closed.
    StoreUnavailable,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::AuthorizationRequired => write!(f, "Authorization required"),
            AppError::InvalidJson => write!(f, "Cannot decode JSON payload"),
            AppError::InvalidBankAccount => write!(f, "Bank account fields have unexpected lengths"),
            AppError::RateExceeded => write!(f, "Rate limit exceeded"),
            AppError::StoreUnavailable => write!(f, "Counter store unavailable"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthorizationRequired => StatusCode::UNAUTHORIZED,
            AppError::InvalidJson => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidBankAccount => StatusCode::BAD_REQUEST,
            AppError::RateExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::AuthorizationRequired => ApiMessage::unauthorized(),
            AppError::InvalidJson => ApiMessage::invalid_json(),
            AppError::InvalidBankAccount => ApiMessage::invalid_bank_account(),
            AppError::RateExceeded => ApiMessage::rate_exceeded(),
            AppError::StoreUnavailable => ApiMessage::server_error(),
        };

        responses::message_response(self.status_code(), &message)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
