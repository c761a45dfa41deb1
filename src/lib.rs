//! # Crashbridge Core - Crash-Reporting Bridge
//!
//! Rust implementation of the crashbridge dispatch layer providing:
//! - A method-name-keyed call router with a one-shot startup gate
//! - Payload translation into strongly-typed reporting-backend calls
//! - Typed key/value metadata with an explicit unsupported-kind fallback
//! - Crash descriptor reconstruction with nested-cause chains
//! - Out-of-band forced-crash hand-off, decoupled from the reply path
//! - TCP+msgpack IPC transport for the application-layer boundary
//!
//! ## Architecture
//!
//! The bridge holds no per-call state; all calls flow one way:
//! ```text
//!                    ┌─────────────────────────────────┐
//!   IPC requests  →  │          Bridge                 │
//!                    │  ┌─────────┐  ┌──────────┐      │
//!                    │  │ Router  │→ │Translator│      │
//!                    │  │ (gate)  │  └────┬─────┘      │
//!                    │  └─────────┘       │            │
//!                    └────────────────────┼────────────┘
//!                        ┌────────────────┴───┐
//!                        ▼                    ▼
//!                 ReportingBackend       FatalHandoff
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod backend;
pub mod bridge;
pub mod ipc;
pub mod report;
pub mod types;

// Internal utilities
pub mod observability;

pub use bridge::{Bridge, Outcome};
pub use types::{Config, Error, IpcConfig, Result};
