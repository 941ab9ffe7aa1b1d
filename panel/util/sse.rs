use std::io::Write;

// ---------------------------------------------------------------------------
// SSE response helpers
// ---------------------------------------------------------------------------

/// Raw HTTP head for an event stream. Written directly to the socket since
/// tiny_http has no streaming response body.
pub const SSE_HEAD: &str = "HTTP/1.1 200 OK\r\n\
                            Content-Type: text/event-stream\r\n\
                            Cache-Control: no-cache\r\n\
                            Connection: keep-alive\r\n\
                            X-Accel-Buffering: no\r\n\
                            \r\n";

/// Formats a named SSE event with a JSON data payload.
///
/// Output format:
/// ```text
/// event: <name>\n
/// data: <json>\n
/// \n
/// ```
pub fn format_sse_event(event_name: &str, json_data: &str) -> String {
    format!("event: {}\ndata: {}\n\n", event_name, json_data)
}

/// SSE comment; ignored by EventSource but keeps the connection open.
pub fn format_sse_keepalive() -> &'static str {
    ": ping\n\n"
}

/// Writes one SSE message and flushes.
pub fn write_sse<W: Write>(writer: &mut W, msg: &str) -> std::io::Result<()> {
    writer.write_all(msg.as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_frame_layout() {
        assert_eq!(format_sse_event("line", "\"\\n E1\""), "event: line\ndata: \"\\n E1\"\n\n");
    }

    #[test]
    fn json_string_payload_stays_on_one_line() {
        let payload = serde_json::to_string("\n E1 V 3.00\n").unwrap();
        let frame = format_sse_event("line", &payload);
        assert_eq!(frame.matches('\n').count(), 3);
    }

    #[test]
    fn write_sse_writes_and_flushes() {
        let mut buf = Vec::new();
        write_sse(&mut buf, format_sse_keepalive()).unwrap();
        assert_eq!(buf, b": ping\n\n");
    }

    #[test]
    fn head_ends_with_blank_line() {
        assert!(SSE_HEAD.ends_with("\r\n\r\n"));
        assert!(SSE_HEAD.contains("text/event-stream"));
    }
}
