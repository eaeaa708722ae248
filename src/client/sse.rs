//! Incremental Server-Sent Events decoding.
//!
//! [`SseDecoder`] accepts the body of a `text/event-stream` response in
//! arbitrary chunks and yields complete events. Chunk boundaries may fall
//! anywhere, including inside a UTF-8 sequence or between `\r` and `\n`.

/// A dispatched event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name, `message` when the stream did not set one.
    pub event: String,
    /// Data lines joined with `\n`.
    pub data: String,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    /// The previous chunk ended with `\r`; a leading `\n` belongs to it.
    pending_cr: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning the events it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();
        let mut skip_lf = std::mem::take(&mut self.pending_cr);

        for &byte in chunk {
            if skip_lf {
                skip_lf = false;
                if byte == b'\n' {
                    continue;
                }
            }
            match byte {
                b'\n' => self.end_line(&mut events),
                b'\r' => {
                    self.end_line(&mut events);
                    skip_lf = true;
                }
                _ => self.buffer.push(byte),
            }
        }

        self.pending_cr = skip_lf;
        events
    }

    fn end_line(&mut self, events: &mut Vec<SseEvent>) {
        let line = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        self.process_line(&line, events);
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<SseEvent>) {
        if line.is_empty() {
            if !self.data.is_empty() {
                events.push(SseEvent {
                    event: self
                        .event
                        .take()
                        .unwrap_or_else(|| "message".to_string()),
                    data: self.data.join("\n"),
                });
                self.data.clear();
            }
            self.event = None;
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // Reconnection is never attempted, so ids and retry hints are unused.
            "id" | "retry" => {}
            other => tracing::trace!(field = other, "Ignoring unknown SSE field"),
        }
    }
}
