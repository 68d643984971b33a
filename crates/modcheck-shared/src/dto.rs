//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to verify a bank account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub sort_code: String,
    pub account_number: String,
}

/// Response telling whether a bank account is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidityResponse {
    /// The bank account sort code.
    pub sort_code: String,
    /// The bank account number.
    pub account_number: String,
    /// The validity of the given bank account.
    pub is_valid: bool,
}
