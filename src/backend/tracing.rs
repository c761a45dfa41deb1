//! Default backend implementation: records every call as a tracing event.
//!
//! Useful as the wired collaborator when no real SDK is linked in; the
//! server binary and the integration tests both run against it.

use super::{CustomEvent, ReportingBackend};
use crate::report::CrashReport;

/// A [`ReportingBackend`] that emits structured `tracing` events instead of
/// talking to a real crash-reporting service.
#[derive(Debug, Default)]
pub struct TracingBackend;

impl ReportingBackend for TracingBackend {
    fn start(&self) {
        tracing::info!(target: "crashbridge::backend", "backend started");
    }

    fn log_event(&self, event: CustomEvent) {
        tracing::info!(
            target: "crashbridge::backend",
            name = event.name(),
            attributes = event.attributes().len(),
            "custom event"
        );
    }

    fn log(&self, line: &str) {
        tracing::info!(target: "crashbridge::backend", "{line}");
    }

    fn set_string(&self, key: &str, value: &str) {
        tracing::info!(target: "crashbridge::backend", key, value, "set string");
    }

    fn set_int(&self, key: &str, value: i32) {
        tracing::info!(target: "crashbridge::backend", key, value, "set int");
    }

    fn set_double(&self, key: &str, value: f64) {
        tracing::info!(target: "crashbridge::backend", key, value, "set double");
    }

    fn set_bool(&self, key: &str, value: bool) {
        tracing::info!(target: "crashbridge::backend", key, value, "set bool");
    }

    fn set_float(&self, key: &str, value: f32) {
        tracing::info!(target: "crashbridge::backend", key, value = f64::from(value), "set float");
    }

    fn set_long(&self, key: &str, value: i64) {
        tracing::info!(target: "crashbridge::backend", key, value, "set long");
    }

    fn set_user_email(&self, email: Option<String>) {
        tracing::info!(target: "crashbridge::backend", email = email.as_deref(), "set user email");
    }

    fn set_user_name(&self, name: Option<String>) {
        tracing::info!(target: "crashbridge::backend", name = name.as_deref(), "set user name");
    }

    fn set_user_identifier(&self, id: Option<String>) {
        tracing::info!(target: "crashbridge::backend", id = id.as_deref(), "set user identifier");
    }

    fn log_exception(&self, report: &CrashReport) {
        tracing::warn!(target: "crashbridge::backend", "non-fatal exception:\n{report}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn records_calls_as_log_events() {
        let backend = TracingBackend;
        backend.start();
        backend.log("hello from the app");
        backend.set_string("env", "prod");
        backend.set_user_name(None);

        assert!(logs_contain("backend started"));
        assert!(logs_contain("hello from the app"));
        assert!(logs_contain("set string"));
        assert!(logs_contain("set user name"));
    }
}
