//! Configuration loading and management.
//!
//! This module loads `.regression-kit/config.toml`, applies environment
//! overrides and validates the result.

pub mod error;
pub mod loader;
pub mod models;
