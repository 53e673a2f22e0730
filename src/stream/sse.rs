//! Incremental decoder for the `text/event-stream` wire format.

/// A decoded server event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name; `"message"` when the block carried no `event:` field.
    pub name: String,

    /// Payload; multi-line `data:` fields joined with `\n`.
    pub data: String,

    /// Last `id:` field seen on the stream, if any.
    pub id: Option<String>,
}

/// Incremental SSE decoder.
///
/// Feed raw byte chunks as they arrive; chunk boundaries may fall
/// anywhere, including inside a UTF-8 sequence or a field line. Events
/// fall out once their terminating blank line is complete. Blocks without
/// any `data:` line dispatch nothing, and server `retry:` hints are
/// ignored since reconnect pacing is owned by the retry policy.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event_name: Option<String>,
    data_lines: Vec<String>,
    last_id: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one chunk, returning the events it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let mut end = raw.len() - 1;
            if end > 0 && raw[end - 1] == b'\r' {
                end -= 1;
            }
            let line = String::from_utf8_lossy(&raw[..end]).into_owned();
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.flush();
        }
        if line.starts_with(':') {
            // Comment line, commonly used as a keep-alive.
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event_name = Some(value.to_string()),
            "data" => self.data_lines.push(value.to_string()),
            "id" => self.last_id = Some(value.to_string()),
            _ => {}
        }
        None
    }

    /// Dispatch the accumulated block, if it carried data.
    fn flush(&mut self) -> Option<SseEvent> {
        let name = self.event_name.take();
        if self.data_lines.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data_lines).join("\n");
        Some(SseEvent {
            name: name.unwrap_or_else(|| "message".to_string()),
            data,
            id: self.last_id.clone(),
        })
    }
}
