//! Server-Sent Events framing for progress streams
//!
//! The gateway serializes each [`ProgressEvent`] as one `data: <JSON>\n\n`
//! frame; the consumer recovers frames from an HTTP body that arrives in
//! arbitrary chunks. A frame split across two chunks must reassemble to
//! the same event sequence as an unsplit stream.

use crate::types::ProgressEvent;

/// Serialize one event as an SSE frame.
pub fn encode_frame(event: &ProgressEvent) -> Result<String, serde_json::Error> {
    Ok(format!("data: {}\n\n", serde_json::to_string(event)?))
}

/// Incremental SSE frame decoder.
///
/// Buffers the trailing partial line of each chunk and prepends it to the
/// next one, so chunk boundaries inside a frame are invisible to callers.
/// Malformed frames are dropped with a warning rather than aborting the
/// stream: one bad frame must not lose previously materialized results.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of the response body, returning every event the
    /// chunk completed, in stream order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ProgressEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = match std::str::from_utf8(&line[..pos]) {
                Ok(line) => line.trim_end_matches('\r'),
                Err(e) => {
                    tracing::warn!(error = %e, "dropping non-UTF-8 stream line");
                    continue;
                }
            };

            let Some(payload) = line.strip_prefix("data:") else {
                // Blank separator lines, comments and other SSE fields.
                continue;
            };

            match serde_json::from_str(payload.trim_start()) {
                Ok(event) => events.push(event),
                Err(e) => {
                    tracing::warn!(error = %e, "dropping malformed stream frame");
                }
            }
        }
        events
    }

    /// Bytes held back waiting for the rest of their line.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BatchOutcome, GeneratedItem, TokenUsage};

    fn sample_events() -> Vec<ProgressEvent> {
        vec![
            ProgressEvent::Progress {
                current: 1,
                total: 2,
                prompt: "a glowing button".to_string(),
            },
            ProgressEvent::Success {
                result: GeneratedItem::new(
                    0,
                    "a glowing button",
                    "function GlowButton() { return null; }",
                    TokenUsage {
                        input_tokens: 12,
                        output_tokens: 80,
                    },
                ),
            },
            ProgressEvent::Complete {
                outcome: BatchOutcome::new(2),
            },
        ]
    }

    fn encode_all(events: &[ProgressEvent]) -> Vec<u8> {
        events
            .iter()
            .map(|e| encode_frame(e).unwrap())
            .collect::<String>()
            .into_bytes()
    }

    #[test]
    fn test_whole_stream_decodes() {
        let events = sample_events();
        let bytes = encode_all(&events);

        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed(&bytes), events);
        assert_eq!(decoder.pending_bytes(), 0);
    }

    #[test]
    fn test_split_at_every_byte_offset() {
        // Splitting a valid stream at any byte boundary must yield the
        // identical event sequence as feeding it whole.
        let events = sample_events();
        let bytes = encode_all(&events);

        for split in 0..=bytes.len() {
            let mut decoder = FrameDecoder::new();
            let mut decoded = decoder.feed(&bytes[..split]);
            decoded.extend(decoder.feed(&bytes[split..]));
            assert_eq!(decoded, events, "split at byte {split}");
        }
    }

    #[test]
    fn test_malformed_frame_is_dropped() {
        let events = sample_events();
        let mut bytes = encode_frame(&events[0]).unwrap().into_bytes();
        bytes.extend_from_slice(b"data: {not json\n\n");
        bytes.extend(encode_frame(&events[1]).unwrap().into_bytes());

        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed(&bytes), events[..2].to_vec());
    }

    #[test]
    fn test_data_prefix_without_space() {
        let json = serde_json::to_string(&sample_events()[0]).unwrap();
        let bytes = format!("data:{json}\n\n").into_bytes();

        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed(&bytes), sample_events()[..1].to_vec());
    }
}
