//! Event translator — coerces opaque payloads into typed backend calls.
//!
//! One function per operation. Unsupported metadata kinds are degraded, not
//! errors: event parameters of the wrong kind are dropped, `setInfo` values
//! of the wrong kind become a diagnostic log line. Malformed payload shapes
//! are contract violations and surface as validation errors.

use crate::backend::{CustomEvent, MetadataValue, ReportingBackend};
use crate::bridge::router::{str_field, Outcome};
use crate::report::{CrashReport, FatalHandoff};
use crate::types::{Error, Result};
use serde_json::Value;

/// `logEvent`: assemble and submit a custom analytics event.
///
/// Numeric parameters attach as number attributes, text as text attributes;
/// every other kind is dropped without note.
pub(crate) fn log_event(backend: &dyn ReportingBackend, payload: &Value) -> Result<Outcome> {
    let name = str_field(payload, "name")?;
    let mut event = CustomEvent::new(name);

    let params = match payload.get("parameters") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => return Err(Error::validation("logEvent parameters must be a mapping")),
    };

    if let Some(params) = params {
        for (key, value) in params {
            match MetadataValue::from(value) {
                MetadataValue::Text(text) => event.put_text(key, text),
                MetadataValue::Int(n) => event.put_number(key, f64::from(n)),
                MetadataValue::Long(n) => event.put_number(key, n as f64),
                MetadataValue::Float(n) => event.put_number(key, f64::from(n)),
                MetadataValue::Double(n) => event.put_number(key, n),
                // Not valid event attributes; omitted rather than coerced.
                MetadataValue::Bool(_) | MetadataValue::Unsupported(_) => {}
            }
        }
    }

    backend.log_event(event);
    Ok(Outcome::Success)
}

/// `log`: forward a log line.
///
/// Accepts a bare string, or a `[level, tag, message]` triple concatenated
/// as `"<level>: <tag> <message>"`.
pub(crate) fn log(backend: &dyn ReportingBackend, payload: &Value) -> Result<Outcome> {
    match payload {
        Value::String(line) => backend.log(line),
        Value::Array(parts) if parts.len() == 3 => {
            let line = format!(
                "{}: {} {}",
                text_of(&parts[0]),
                text_of(&parts[1]),
                text_of(&parts[2])
            );
            backend.log(&line);
        }
        _ => {
            return Err(Error::validation(
                "log payload must be a string or a [level, tag, message] triple",
            ))
        }
    }
    Ok(Outcome::Success)
}

/// `setInfo`: set one typed custom key.
///
/// Exactly one branch fires per call. Unsupported value kinds degrade to a
/// diagnostic line through the backend's logger so telemetry issues stay
/// visible without failing the call.
pub(crate) fn set_info(backend: &dyn ReportingBackend, payload: &Value) -> Result<Outcome> {
    let key = str_field(payload, "key")?;
    let value = payload.get("value").cloned().unwrap_or(Value::Null);

    match MetadataValue::from(&value) {
        MetadataValue::Text(text) => backend.set_string(&key, &text),
        MetadataValue::Int(n) => backend.set_int(&key, n),
        MetadataValue::Double(n) => backend.set_double(&key, n),
        MetadataValue::Bool(b) => backend.set_bool(&key, b),
        MetadataValue::Float(n) => backend.set_float(&key, n),
        MetadataValue::Long(n) => backend.set_long(&key, n),
        MetadataValue::Unsupported(raw) => {
            backend.log(&format!(
                "ignoring unsupported value type for key {key} with value {raw}"
            ));
        }
    }
    Ok(Outcome::Success)
}

/// `setUserInfo`: overwrite the backend user identity.
///
/// All three fields are written unconditionally; an absent key clears its
/// field. Never a partial merge.
pub(crate) fn set_user_info(backend: &dyn ReportingBackend, payload: &Value) -> Result<Outcome> {
    let info = payload
        .as_object()
        .ok_or_else(|| Error::validation("setUserInfo payload must be a mapping"))?;

    let field = |key: &str| {
        info.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    backend.set_user_email(field("email"));
    backend.set_user_name(field("name"));
    backend.set_user_identifier(field("id"));
    Ok(Outcome::Success)
}

/// `reportCrash`: log a non-fatal exception, or schedule a forced crash.
///
/// The forced path never logs in-process: the descriptor goes to the
/// hand-off and the reply completes before any termination takes effect.
pub(crate) fn report_crash(
    backend: &dyn ReportingBackend,
    handoff: &dyn FatalHandoff,
    payload: &Value,
) -> Result<Outcome> {
    let report = CrashReport::from_payload(payload)?;

    if report.force_crash {
        handoff.schedule(report);
    } else {
        backend.log_exception(&report);
    }
    Ok(Outcome::Success)
}

/// Natural text rendering: strings verbatim, everything else as JSON.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{EventAttribute, MockReportingBackend};
    use crate::report::MockFatalHandoff;
    use serde_json::json;

    #[test]
    fn log_event_keeps_numeric_and_text_parameters() {
        let mut backend = MockReportingBackend::new();
        backend
            .expect_log_event()
            .withf(|event| {
                let attrs = event.attributes();
                event.name() == "purchase"
                    && attrs.len() == 2
                    && attrs.contains(&("a".to_string(), EventAttribute::Number(3.0)))
                    && attrs.contains(&("b".to_string(), EventAttribute::Text("x".to_string())))
            })
            .times(1)
            .return_const(());

        let payload = json!({
            "name": "purchase",
            "parameters": {"a": 3, "b": "x", "c": true},
        });
        let outcome = log_event(&backend, &payload).unwrap();
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn log_event_without_parameters_submits_bare_event() {
        let mut backend = MockReportingBackend::new();
        backend
            .expect_log_event()
            .withf(|event| event.name() == "signup" && event.attributes().is_empty())
            .times(1)
            .return_const(());

        log_event(&backend, &json!({"name": "signup"})).unwrap();
    }

    #[test]
    fn log_event_without_name_is_a_contract_violation() {
        let backend = MockReportingBackend::new();
        let err = log_event(&backend, &json!({"parameters": {}})).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn log_event_rejects_non_mapping_parameters() {
        let backend = MockReportingBackend::new();
        let err = log_event(&backend, &json!({"name": "e", "parameters": 5})).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn log_forwards_bare_string_verbatim() {
        let mut backend = MockReportingBackend::new();
        backend
            .expect_log()
            .withf(|line| line == "plain message")
            .times(1)
            .return_const(());

        log(&backend, &json!("plain message")).unwrap();
    }

    #[test]
    fn log_concatenates_level_tag_message() {
        let mut backend = MockReportingBackend::new();
        backend
            .expect_log()
            .withf(|line| line == "INFO: tag1 hello")
            .times(1)
            .return_const(());

        log(&backend, &json!(["INFO", "tag1", "hello"])).unwrap();
    }

    #[test]
    fn log_renders_non_string_elements_naturally() {
        let mut backend = MockReportingBackend::new();
        backend
            .expect_log()
            .withf(|line| line == "3: true null")
            .times(1)
            .return_const(());

        log(&backend, &json!([3, true, null])).unwrap();
    }

    #[test]
    fn log_rejects_wrong_arity() {
        let backend = MockReportingBackend::new();
        assert!(log(&backend, &json!(["INFO", "tag1"])).is_err());
        assert!(log(&backend, &json!(42)).is_err());
    }

    #[test]
    fn set_info_dispatches_on_value_kind() {
        let mut backend = MockReportingBackend::new();
        backend
            .expect_set_double()
            .withf(|key, value| key == "k" && *value == 3.14)
            .times(1)
            .return_const(());
        set_info(&backend, &json!({"key": "k", "value": 3.14})).unwrap();

        let mut backend = MockReportingBackend::new();
        backend
            .expect_set_int()
            .withf(|key, value| key == "retries" && *value == 7)
            .times(1)
            .return_const(());
        set_info(&backend, &json!({"key": "retries", "value": 7})).unwrap();

        let mut backend = MockReportingBackend::new();
        backend
            .expect_set_long()
            .withf(|key, value| key == "big" && *value == 5_000_000_000i64)
            .times(1)
            .return_const(());
        set_info(&backend, &json!({"key": "big", "value": 5_000_000_000i64})).unwrap();

        let mut backend = MockReportingBackend::new();
        backend
            .expect_set_bool()
            .withf(|key, value| key == "beta" && *value)
            .times(1)
            .return_const(());
        set_info(&backend, &json!({"key": "beta", "value": true})).unwrap();

        let mut backend = MockReportingBackend::new();
        backend
            .expect_set_string()
            .withf(|key, value| key == "env" && value == "prod")
            .times(1)
            .return_const(());
        set_info(&backend, &json!({"key": "env", "value": "prod"})).unwrap();
    }

    #[test]
    fn set_info_unsupported_kind_degrades_to_log_line() {
        let mut backend = MockReportingBackend::new();
        backend
            .expect_log()
            .withf(|line| line.contains("k") && line.contains("[1,2]"))
            .times(1)
            .return_const(());

        let outcome = set_info(&backend, &json!({"key": "k", "value": [1, 2]})).unwrap();
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn set_user_info_is_a_full_overwrite() {
        let mut backend = MockReportingBackend::new();
        backend
            .expect_set_user_email()
            .withf(|email| email.is_none())
            .times(1)
            .return_const(());
        backend
            .expect_set_user_name()
            .withf(|name| name.as_deref() == Some("Ann"))
            .times(1)
            .return_const(());
        backend
            .expect_set_user_identifier()
            .withf(|id| id.is_none())
            .times(1)
            .return_const(());

        set_user_info(&backend, &json!({"name": "Ann"})).unwrap();
    }

    #[test]
    fn report_crash_logs_non_fatal_by_default() {
        let mut backend = MockReportingBackend::new();
        backend
            .expect_log_exception()
            .withf(|report| report.exception_type == "StateError" && !report.force_crash)
            .times(1)
            .return_const(());
        let handoff = MockFatalHandoff::new();

        let payload = json!({"type": "StateError", "message": "boom"});
        let outcome = report_crash(&backend, &handoff, &payload).unwrap();
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn forced_crash_goes_to_handoff_not_backend() {
        let backend = MockReportingBackend::new();
        let mut handoff = MockFatalHandoff::new();
        handoff
            .expect_schedule()
            .withf(|report| report.force_crash && report.exception_type == "StateError")
            .times(1)
            .return_const(());

        let payload = json!({"type": "StateError", "message": "boom", "forceCrash": true});
        // The reply outcome is already decided when the hand-off fires.
        let outcome = report_crash(&backend, &handoff, &payload).unwrap();
        assert_eq!(outcome, Outcome::Success);
    }
}
