//! Reporting backend collaborator seam.
//!
//! The bridge never talks to a crash-reporting SDK directly; it calls the
//! [`ReportingBackend`] trait. Transport, persistence, and upload of what the
//! backend records live behind this seam and outside this crate.

mod event;
mod tracing;
mod value;

pub use event::{CustomEvent, EventAttribute};
pub use tracing::TracingBackend;
pub use value::MetadataValue;

use crate::report::CrashReport;

/// The crash-reporting/analytics backend surface consumed by the translator.
///
/// Every method is best-effort record-keeping: implementations must not fail
/// the calling context. Identity setters take `Option` where `None` means
/// "clear this field", not "leave unchanged".
#[cfg_attr(test, mockall::automock)]
pub trait ReportingBackend: Send + Sync {
    /// Configure and start the backend. Called by `initialize`; must tolerate
    /// being called more than once.
    fn start(&self);

    /// Record a custom analytics event with its typed attributes.
    fn log_event(&self, event: CustomEvent);

    /// Record a free-form log line.
    fn log(&self, line: &str);

    fn set_string(&self, key: &str, value: &str);
    fn set_int(&self, key: &str, value: i32);
    fn set_double(&self, key: &str, value: f64);
    fn set_bool(&self, key: &str, value: bool);
    fn set_float(&self, key: &str, value: f32);
    fn set_long(&self, key: &str, value: i64);

    fn set_user_email(&self, email: Option<String>);
    fn set_user_name(&self, name: Option<String>);
    fn set_user_identifier(&self, id: Option<String>);

    /// Record a non-fatal exception; the process continues.
    fn log_exception(&self, report: &CrashReport);
}
