//! Sapo Core - Shared types library.
//!
//! This crate provides common types used across the Sapo connector suite:
//! - `connectors` - Sapo API client, host contract and the resource connectors
//! - `cli` - Command-line host for listing, describing and running connectors
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, credentials, output records, pagination and filter timestamps

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
