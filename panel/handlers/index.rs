use std::io::Cursor;
use tiny_http::Response;

use crate::render::{render_page, PageView};
use crate::routes::{html_response, json_response, redirect};
use crate::state::{lock, RunStatus, SharedState};

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let st = lock(&state);
    let transcript = st.transcript.concat();
    let status = match &st.status {
        RunStatus::Idle => "idle".to_owned(),
        RunStatus::Running => "running".to_owned(),
        RunStatus::Done { elapsed_total_ms, final_loss, .. } => {
            format!("done in {:.1}s, final loss {:.2}", *elapsed_total_ms as f64 / 1000.0, final_loss)
        }
        RunStatus::Failed { .. } => "failed".to_owned(),
    };
    let view = PageView {
        show_button: matches!(st.status, RunStatus::Idle),
        autoconnect: st.status.is_running(),
        show_reset: matches!(st.status, RunStatus::Done { .. } | RunStatus::Failed { .. }),
        transcript: &transcript,
        status: &status,
    };
    let html = render_page(&view);
    drop(st);

    html_response(html)
}

// ---------------------------------------------------------------------------
// POST /run/reset
// ---------------------------------------------------------------------------

pub fn handle_reset(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let reset = lock(&state).reset();
    if reset {
        log::info!("panel reset");
        state.changed.notify_all();
    }
    redirect("/")
}

// ---------------------------------------------------------------------------
// GET /config
// ---------------------------------------------------------------------------

pub fn handle_config(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let body = {
        let st = lock(&state);
        serde_json::to_string_pretty(&st.config)
    };
    match body {
        Ok(json) => json_response(json),
        Err(e) => {
            log::error!("failed to serialize config: {}", e);
            json_response(format!("{{\"error\":{}}}", serde_json::Value::String(e.to_string())))
        }
    }
}
