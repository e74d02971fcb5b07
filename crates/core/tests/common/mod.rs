//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality across all integration tests
//! including:
//! - Test fixtures (dataset files, scripted transports, service replies)
//! - Custom assertions over workflow state and session events
//! - An axum stub of the statistical service

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod stub_server;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
