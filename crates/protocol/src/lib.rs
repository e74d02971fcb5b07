//! # rk-protocol
//!
//! Core protocol definitions and data models for regression-kit.
//!
//! This crate defines all shared data structures used for:
//! - The HTTP contract with the statistical service
//! - Workflow entities (dataset, variable selection, trained model)
//! - Configuration file parsing (`.regression-kit/config.toml`)
//! - Communication between a UI and the core workflow session
//!
//! ## Modules
//!
//! - [`wire_models`]: Request/response bodies for `/upload`, `/train`, `/predict`
//! - [`workflow_models`]: Client-side workflow entities and snapshots
//! - [`config_models`]: Global configuration from config.toml
//! - [`ipc`]: Operations and Events for UI-Core communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, uuid and chrono
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other regression-kit crates

pub mod config_models;
pub mod ipc;
pub mod wire_models;
pub mod workflow_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use ipc::*;
pub use wire_models::*;
pub use workflow_models::*;
