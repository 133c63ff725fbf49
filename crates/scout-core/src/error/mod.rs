//! Error types for Scout
//!
//! [`ScoutError`] implements [`UnifiedError`], which gives
//! callers a stable error code, a plain message, optional context and a
//! retryability hint. All error enums are `Clone` so a single failure can be
//! handed to every task waiting on the same initialization attempt.

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{ScoutError, ScoutResult, UnifiedError};
