//! Crash descriptor reconstruction.
//!
//! A reported crash arrives as a loosely-typed mapping; this module rebuilds
//! it into a structured descriptor, including the nested-cause chain. Field
//! reads are tolerant: a reporting payload with holes still produces a
//! usable descriptor rather than an error.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single stack frame of a reported crash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Function/method name.
    pub function: Option<String>,
    /// Declaring class, module, or library.
    pub module: Option<String>,
    /// Source file.
    pub filename: Option<String>,
    /// 1-based source line.
    pub lineno: Option<u32>,
}

impl StackFrame {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            function: string_field(map, &["method", "function"]),
            module: string_field(map, &["class", "module", "library"]),
            filename: string_field(map, &["file", "filename"]),
            lineno: map
                .get("line")
                .or_else(|| map.get("lineno"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let function = self.function.as_deref().unwrap_or("<unknown>");
        match &self.module {
            Some(module) => write!(f, "at {module}.{function}")?,
            None => write!(f, "at {function}")?,
        }
        if let Some(file) = &self.filename {
            match self.lineno {
                Some(line) => write!(f, " ({file}:{line})")?,
                None => write!(f, " ({file})")?,
            }
        }
        Ok(())
    }
}

/// The reconstructed exception-like object built from a reported-crash
/// payload, plus the force-crash flag that decides its fate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashReport {
    /// Exception type name.
    pub exception_type: String,
    /// Human-readable message.
    pub message: String,
    /// Stack representation, outermost frame first.
    pub frames: Vec<StackFrame>,
    /// Nested cause, reconstructed recursively.
    pub cause: Option<Box<CrashReport>>,
    /// Whether the caller asked for a process crash rather than a non-fatal
    /// log entry.
    pub force_crash: bool,
}

impl CrashReport {
    /// Rebuild a descriptor from a reported-crash payload.
    ///
    /// The payload must be a mapping; everything inside it is optional.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let map = payload
            .as_object()
            .ok_or_else(|| Error::validation("reportCrash payload must be a mapping"))?;
        Ok(Self::from_map(map))
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let frames = map
            .get("stackTrace")
            .or_else(|| map.get("trace"))
            .and_then(Value::as_array)
            .map(|frames| {
                frames
                    .iter()
                    .filter_map(Value::as_object)
                    .map(StackFrame::from_map)
                    .collect()
            })
            .unwrap_or_default();

        let cause = map
            .get("cause")
            .and_then(Value::as_object)
            .map(|cause| Box::new(Self::from_map(cause)));

        Self {
            exception_type: string_field(map, &["type", "name"]).unwrap_or_else(|| "Error".to_string()),
            message: string_field(map, &["message", "reason"]).unwrap_or_default(),
            frames,
            cause,
            force_crash: map
                .get("forceCrash")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for CrashReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.exception_type)?;
        } else {
            write!(f, "{}: {}", self.exception_type, self.message)?;
        }
        for frame in &self.frames {
            write!(f, "\n    {frame}")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "\nCaused by: {cause}")?;
        }
        Ok(())
    }
}

fn string_field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
