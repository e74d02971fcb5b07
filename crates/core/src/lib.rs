//! # rk-core
//!
//! Workflow engine for regression-kit.
//!
//! This crate provides:
//! - Configuration loading from the `.regression-kit/` directory
//! - The transport boundary to the statistical service (HTTP and scripted mock)
//! - The workflow state machine and its stage controllers
//! - A single-writer session actor for interactive front ends
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`transport`]: `Transport` trait and implementations
//! - [`state`]: Workflow state machine
//! - [`controllers`]: Ingestion, selection, training and prediction
//! - [`session`]: Op/Event actor owning the workflow state
//! - [`error`]: Error taxonomy for workflow actions
//! - [`logging`]: Logger setup for binaries

pub mod config;
pub mod controllers;
pub mod error;
pub mod logging;
pub mod session;
pub mod state;
pub mod transport;
