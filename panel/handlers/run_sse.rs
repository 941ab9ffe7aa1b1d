use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use squarefit::RunOutcome;
use tiny_http::Request;

use crate::state::{lock, RunStatus, SharedState, TranscriptSink};
use crate::util::sse::{format_sse_event, format_sse_keepalive, write_sse, SSE_HEAD};

const WAIT: Duration = Duration::from_millis(500);

/// `GET /run/events` — Server-Sent Events stream of the run transcript.
///
/// The first connection while idle starts the run. Every connection then:
/// 1. replays the transcript from the beginning as `event: line` frames,
/// 2. waits up to 500 ms for more text, writing `: ping` on timeout,
/// 3. ends with `event: done` or `event: failed` once the run is over.
pub fn handle(request: Request, state: SharedState) {
    let mut writer = request.into_writer();
    if write_sse(&mut writer, SSE_HEAD).is_err() {
        return;
    }

    start_if_idle(&state);

    let mut cursor = 0;
    loop {
        let (chunks, finished) = {
            let mut st = lock(&state);
            if st.transcript.len() == cursor && st.status.is_running() {
                st = match state.changed.wait_timeout(st, WAIT) {
                    Ok((guard, _)) => guard,
                    Err(poisoned) => poisoned.into_inner().0,
                };
            }
            // A reset can shrink the transcript under us.
            let cursor_now = cursor.min(st.transcript.len());
            let chunks = st.transcript[cursor_now..].to_vec();
            cursor = cursor_now;
            (chunks, final_event(&st.status))
        };

        if chunks.is_empty() && finished.is_none() {
            if write_sse(&mut writer, format_sse_keepalive()).is_err() {
                return;
            }
            continue;
        }

        for chunk in chunks {
            let payload = serde_json::Value::String(chunk).to_string();
            if write_sse(&mut writer, &format_sse_event("line", &payload)).is_err() {
                return;
            }
            cursor += 1;
        }

        if let Some(event) = finished {
            let _ = write_sse(&mut writer, &event);
            return;
        }
    }
}

/// The closing frame for a finished run, or `None` while it is running.
fn final_event(status: &RunStatus) -> Option<String> {
    match status {
        RunStatus::Running => None,
        RunStatus::Done { elapsed_total_ms, final_loss, memory } => {
            let data = serde_json::json!({
                "elapsed_total_ms": elapsed_total_ms,
                "final_loss": final_loss,
                "memory": memory,
            });
            Some(format_sse_event("done", &data.to_string()))
        }
        RunStatus::Failed { reason } => {
            let data = serde_json::json!({ "reason": reason });
            Some(format_sse_event("failed", &data.to_string()))
        }
        RunStatus::Idle => Some(format_sse_event("done", "{}")),
    }
}

/// Starts the single background run unless one already started.
fn start_if_idle(state: &SharedState) {
    let config = {
        let mut st = lock(state);
        if !matches!(st.status, RunStatus::Idle) {
            return;
        }
        st.status = RunStatus::Running;
        st.transcript.clear();
        st.config.clone()
    };

    let shared = state.clone();
    let spawned = thread::Builder::new().name("run".into()).spawn(move || {
        info!("run started");
        let start = Instant::now();
        let mut sink = TranscriptSink::new(shared.clone());
        let status = run_guarded(start, || squarefit::run(&config, &mut sink));
        lock(&shared).status = status;
        shared.changed.notify_all();
        info!("run finished");
    });

    if let Err(e) = spawned {
        warn!("could not start run thread: {}", e);
        lock(state).status = RunStatus::Failed { reason: format!("could not start run thread: {}", e) };
        state.changed.notify_all();
    }
}

/// Runs `job` and turns its result into the terminal status. A panic inside
/// the job becomes `Failed` so waiting streams still get their closing frame.
fn run_guarded<F>(start: Instant, job: F) -> RunStatus
where
    F: FnOnce() -> squarefit::Result<RunOutcome>,
{
    match panic::catch_unwind(AssertUnwindSafe(job)) {
        Ok(Ok(outcome)) => RunStatus::Done {
            elapsed_total_ms: start.elapsed().as_millis() as u64,
            final_loss: outcome.report.final_loss,
            memory: outcome.memory,
        },
        Ok(Err(e)) => {
            error!("run failed: {}", e);
            RunStatus::Failed { reason: e.to_string() }
        }
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("run panicked: {}", msg);
            RunStatus::Failed { reason: format!("run panicked: {}", msg) }
        }
    }
}
