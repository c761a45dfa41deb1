//! Forced-crash hand-off.
//!
//! Raising a fatal failure synchronously inside the call-handling context
//! would be caught by the bridging layer itself and surface as an opaque
//! dispatch error instead of the intended crash. The hand-off moves the
//! termination to its own execution context so the triggering call's reply
//! completes first and the crash stays attributable.

use crate::report::CrashReport;
use std::time::Duration;

/// Defer-fatal-failure primitive.
///
/// `schedule` is fire-and-forget: it must return promptly and must never
/// fail the calling context, even when the hand-off itself cannot launch.
#[cfg_attr(test, mockall::automock)]
pub trait FatalHandoff: Send + Sync {
    /// Schedule process termination with `report` as the visible cause.
    fn schedule(&self, report: CrashReport);
}

/// Production hand-off: a dedicated named thread logs the rendered report at
/// error level, then aborts the process.
///
/// A tokio task would not do here: the runtime catches task panics and the
/// failure would come back as a join error inside the dispatch path.
#[derive(Debug, Default)]
pub struct ProcessAbortHandoff;

impl ProcessAbortHandoff {
    /// Grace period before the abort, so the reply for the triggering call
    /// can flush to the client first.
    const ABORT_DELAY: Duration = Duration::from_millis(100);
}

impl FatalHandoff for ProcessAbortHandoff {
    fn schedule(&self, report: CrashReport) {
        let rendered = report.to_string();
        let spawned = std::thread::Builder::new().name("crash-handoff".into()).spawn({
            let rendered = rendered.clone();
            move || {
                std::thread::sleep(Self::ABORT_DELAY);
                tracing::error!(target: "crashbridge::fatal", "forced crash:\n{rendered}");
                std::process::abort();
            }
        });

        // Launch failure stays invisible to the caller, but not to operators.
        if let Err(e) = spawned {
            tracing::error!(
                target: "crashbridge::fatal",
                error = %e,
                "crash hand-off thread failed to launch; report:\n{rendered}"
            );
        }
    }
}
