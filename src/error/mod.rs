//! Error Handling Module
//!
//! This module provides the error type shared by every layer of the relay:
//! - Core error type (`RelayError`) and its coarse `ErrorCategory`
//! - HTTP status mapping used by the server boundary
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use hfrelay::error::{RelayError, ErrorCategory};
//!
//! let error = RelayError::InvalidInput("Missing story prompt".into());
//! assert_eq!(error.category(), ErrorCategory::Validation);
//! assert_eq!(error.status_code(), 400);
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod types;

pub use types::*;
