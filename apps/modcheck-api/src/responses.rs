//! Response writer - serializes outcomes to the wire format.
//!
//! A pure function of its inputs: no retries, no side effects beyond the
//! emitted bytes. Used for error termination and for the final success
//! payload alike.

use actix_web::HttpResponse;
use actix_web::http::{StatusCode, header};
use serde::Serialize;

use modcheck_shared::ApiMessage;

/// Every JSON body leaves with this content type.
pub const APPLICATION_JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Write any serializable body with the service's fixed content type.
pub fn json_response<T: Serialize>(code: StatusCode, body: &T) -> HttpResponse {
    let payload = serde_json::to_string(body).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to serialize response body");
        "{}".to_string()
    });

    HttpResponse::build(code)
        .insert_header((header::CONTENT_TYPE, APPLICATION_JSON_UTF8))
        .body(payload)
}

/// Write a message with a given status code, a status tag and a message.
pub fn message_response(code: StatusCode, message: &ApiMessage) -> HttpResponse {
    json_response(code, message)
}
