//! Incremental frame decoding for the feed transports.
//!
//! Bytes arrive in arbitrary chunks; the decoder buffers partial lines and
//! yields complete frame bodies. Two framings are supported:
//!
//! - [`Framing::Sse`]: Server-Sent Events. Only events named `update` are
//!   yielded, with multi-line `data:` fields joined by `\n`.
//! - [`Framing::Lines`]: one JSON document per line.

use crate::error::Error;

/// Name of the SSE event carrying samples.
pub const UPDATE_EVENT: &str = "update";

/// Largest frame the decoder will buffer before giving up on the stream.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// How frame boundaries are marked on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    Sse,
    Lines,
}

/// Stateful decoder turning byte chunks into frame bodies.
#[derive(Debug)]
pub struct FrameDecoder {
    framing: Framing,
    pending: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    data_len: usize,
}

impl FrameDecoder {
    pub fn new(framing: Framing) -> Self {
        Self {
            framing,
            pending: Vec::new(),
            event: None,
            data: Vec::new(),
            data_len: 0,
        }
    }

    /// Feed a chunk of bytes and collect every frame it completes.
    ///
    /// Fails once an unterminated line or an undispatched event grows past
    /// [`MAX_FRAME_BYTES`].
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, Error> {
        self.pending.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            let line = line.strip_suffix('\r').unwrap_or(&line);

            match self.framing {
                Framing::Lines => {
                    if !line.trim().is_empty() {
                        frames.push(line.to_string());
                    }
                }
                Framing::Sse => {
                    if let Some(frame) = self.sse_line(line)? {
                        frames.push(frame);
                    }
                }
            }
        }

        if self.pending.len() > MAX_FRAME_BYTES {
            return Err(oversized());
        }
        Ok(frames)
    }

    fn sse_line(&mut self, line: &str) -> Result<Option<String>, Error> {
        // Blank line dispatches the event being assembled
        if line.is_empty() {
            let event = self.event.take();
            let data = std::mem::take(&mut self.data);
            self.data_len = 0;
            if data.is_empty() {
                return Ok(None);
            }
            return Ok(match event.as_deref() {
                Some(UPDATE_EVENT) => Some(data.join("\n")),
                _ => None,
            });
        }

        // Comment (often used as a keep-alive)
        if line.starts_with(':') {
            return Ok(None);
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                self.data_len += value.len() + 1;
                if self.data_len > MAX_FRAME_BYTES {
                    return Err(oversized());
                }
                self.data.push(value.to_string());
            }
            // id and retry are not used by the dashboard
            _ => {}
        }
        Ok(None)
    }
}

fn oversized() -> Error {
    Error::Read(format!("frame exceeds {} bytes", MAX_FRAME_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sse_update_event() {
        let mut decoder = FrameDecoder::new(Framing::Sse);
        let frames = decoder.push(b"event: update\ndata: {\"cpu_usage\":45}\n\n").unwrap();
        assert_eq!(frames, vec![r#"{"cpu_usage":45}"#.to_string()]);
    }

    #[test]
    fn test_sse_split_across_chunks() {
        let mut decoder = FrameDecoder::new(Framing::Sse);
        assert!(decoder.push(b"event: upd").unwrap().is_empty());
        assert!(decoder.push(b"ate\r\ndata: {\"temperature\"").unwrap().is_empty());
        let frames = decoder.push(b":72}\r\n\r\n").unwrap();
        assert_eq!(frames, vec![r#"{"temperature":72}"#.to_string()]);
    }

    #[test]
    fn test_sse_ignores_other_events_and_comments() {
        let mut decoder = FrameDecoder::new(Framing::Sse);
        let frames = decoder
            .push(
                b": keep-alive\n\ndata: {\"a\":1}\n\nevent: ping\ndata: x\n\nevent: update\ndata: {\"b\":2}\n\n",
            )
            .unwrap();
        assert_eq!(frames, vec![r#"{"b":2}"#.to_string()]);
    }

    #[test]
    fn test_sse_multiline_data() {
        let mut decoder = FrameDecoder::new(Framing::Sse);
        let frames = decoder.push(b"event: update\ndata: {\"a\":\ndata: 1}\n\n").unwrap();
        assert_eq!(frames, vec!["{\"a\":\n1}".to_string()]);
    }

    #[test]
    fn test_sse_event_name_resets_between_events() {
        let mut decoder = FrameDecoder::new(Framing::Sse);
        let frames = decoder.push(b"event: update\ndata: 1\n\ndata: 2\n\n").unwrap();
        assert_eq!(frames, vec!["1".to_string()]);
    }

    #[test]
    fn test_lines_framing() {
        let mut decoder = FrameDecoder::new(Framing::Lines);
        let frames = decoder.push(b"{\"a\":1}\n\n{\"b\"").unwrap();
        assert_eq!(frames, vec![r#"{"a":1}"#.to_string()]);
        let frames = decoder.push(b":2}\n").unwrap();
        assert_eq!(frames, vec![r#"{"b":2}"#.to_string()]);
    }

    #[test]
    fn test_unterminated_line_is_capped() {
        let mut decoder = FrameDecoder::new(Framing::Lines);
        let chunk = vec![b'x'; 64 * 1024];
        for _ in 0..16 {
            assert!(decoder.push(&chunk).is_ok());
        }
        assert!(matches!(decoder.push(&chunk), Err(Error::Read(_))));
    }

    #[test]
    fn test_endless_sse_event_is_capped() {
        let mut decoder = FrameDecoder::new(Framing::Sse);
        let line = format!("data: {}\n", "x".repeat(1023));
        let chunk = line.repeat(600);
        assert!(decoder.push(b"event: update\n").unwrap().is_empty());
        assert!(decoder.push(chunk.as_bytes()).unwrap().is_empty());
        assert!(decoder.push(chunk.as_bytes()).is_err());
    }

    #[test]
    fn test_large_frame_under_cap_passes() {
        let mut decoder = FrameDecoder::new(Framing::Lines);
        let body = format!("{{\"pad\":\"{}\"}}\n", "x".repeat(512 * 1024));
        let frames = decoder.push(body.as_bytes()).unwrap();
        assert_eq!(frames.len(), 1);
    }
}
