//! # Modcheck Core
//!
//! The domain layer of the bank-account verification service.
//! This crate contains pure admission and validation logic with zero
//! infrastructure dependencies.

pub mod domain;
pub mod ports;
pub mod ratelimit;

pub use ratelimit::{Admission, RateLimitConfig, RateLimiter};
