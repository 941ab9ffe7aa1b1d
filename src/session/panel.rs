use std::io::Write;
use std::sync::mpsc;

use log::warn;

/// Destination for the human-readable run transcript.
///
/// Text is appended as-is; line breaks are part of the text.
pub trait PanelSink {
    fn append(&mut self, text: &str);
}

impl PanelSink for String {
    fn append(&mut self, text: &str) {
        self.push_str(text);
    }
}

/// Forwards each chunk to a receiver, e.g. a streaming HTTP response.
/// A dropped receiver only means nobody is watching; the run continues.
impl PanelSink for mpsc::Sender<String> {
    fn append(&mut self, text: &str) {
        let _ = self.send(text.to_owned());
    }
}

/// Writes the transcript to any `Write`, flushing after every chunk.
pub struct WriterSink<W: Write> {
    writer: W,
    failed: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PanelSink for WriterSink<W> {
    fn append(&mut self, text: &str) {
        if self.failed {
            return;
        }
        if let Err(e) = self.writer.write_all(text.as_bytes()).and_then(|_| self.writer.flush()) {
            warn!("panel output failed, dropping further text: {}", e);
            self.failed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_sink_accumulates() {
        let mut s = String::new();
        s.append("a");
        s.append("\n b");
        assert_eq!(s, "a\n b");
    }

    #[test]
    fn writer_sink_writes_bytes() {
        let mut sink = WriterSink::new(Vec::new());
        sink.append("E1 V 3.00");
        assert_eq!(sink.into_inner(), b"E1 V 3.00");
    }

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (mut tx, rx) = mpsc::channel::<String>();
        tx.append("one");
        assert_eq!(rx.recv().unwrap(), "one");
        drop(rx);
        tx.append("two");
    }
}
