//! # OCTView Common Library
//!
//! Shared code for the OCTView review tool:
//! - Database initialization and models
//! - Error types
//! - Data root / configuration resolution
//! - Timestamp formatting

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
