//! Core types for the Sapo connector suite.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod id;
pub mod output;
pub mod pagination;
pub mod timestamp;

pub use credential::SapoCredentials;
pub use id::*;
pub use output::OutputRecord;
pub use pagination::{DEFAULT_LIMIT, Pagination};
pub use timestamp::{FilterTimestamp, TimestampError};
