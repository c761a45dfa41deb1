//! Core types for the crashbridge.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (RequestId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for server, observability, and IPC

mod config;
mod errors;
mod ids;

pub use config::{Config, IpcConfig, ObservabilityConfig, ServerConfig};
pub use errors::{Error, Result};
pub use ids::RequestId;
