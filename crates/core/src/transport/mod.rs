//! Transport to the external statistical service.
//!
//! This module provides the `Transport` trait (the wire boundary) with an
//! HTTP implementation and a scripted mock.

pub mod base;
pub mod http;
pub mod mock;

pub use base::{FilePayload, Transport, TransportError};
pub use http::HttpTransport;
pub use mock::MockTransport;
