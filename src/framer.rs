//! Record framing over a character stream.
//!
//! Each record is an MDSF object terminated by [`DELIMITER`]. The sending side
//! calls [`frame`]; the receiving side feeds whatever arrived to [`reassemble`]
//! and keeps the returned remainder for the next chunk, or lets a
//! [`RecordBuffer`] keep it.
//!
//! ```rust
//! use serde_mdsf::{frame, mdsf, reassemble};
//!
//! let wire = frame(&mdsf!({ "id": 1 })) + &frame(&mdsf!({ "id": 2 }));
//! let (head, tail) = wire.split_at(7);
//!
//! let mut records = Vec::new();
//! let rest = reassemble(head, &mut records).unwrap();
//! assert_eq!(records.len(), 1);
//!
//! let next = format!("{}{}", rest, tail);
//! let rest = reassemble(&next, &mut records).unwrap();
//! assert_eq!(records, vec![mdsf!({ "id": 1 }), mdsf!({ "id": 2 })]);
//! assert_eq!(rest, "");
//! ```

use crate::error::SyntaxError;
use crate::parser::Parser;
use crate::ser::stringify;
use crate::Value;
use log::{debug, trace};

/// Terminates every record on the wire.
pub const DELIMITER: char = '\0';

/// Splits `chunk` into complete records and an unconsumed remainder.
///
/// Every piece followed by a delimiter must parse as an object and is pushed
/// onto `out` in order. The text after the last delimiter is returned; the
/// caller prepends it to the next chunk. On failure, records parsed before the
/// failing one stay in `out`.
pub fn reassemble<'a>(chunk: &'a str, out: &mut Vec<Value>) -> Result<&'a str, SyntaxError> {
    let mut pieces = chunk.split(DELIMITER);
    // `split` always yields at least one piece
    let mut current = pieces.next().unwrap_or_default();

    for next in pieces {
        match Parser::new(current).parse_record() {
            Ok(record) => {
                trace!("reassembled record of {} bytes", current.len());
                out.push(record);
            }
            Err(err) => {
                debug!("dropping stream chunk, record failed to parse: {}", err);
                return Err(err);
            }
        }
        current = next;
    }

    trace!("{} bytes left unconsumed", current.len());
    Ok(current)
}

/// Renders `value` followed by the record delimiter.
///
/// ```rust
/// use serde_mdsf::{frame, mdsf};
///
/// assert_eq!(frame(&mdsf!({ "ok": true })), "{ok:true}\0");
/// ```
#[must_use]
pub fn frame(value: &Value) -> String {
    let mut text = stringify(value);
    text.push(DELIMITER);
    text
}

/// Keeps the partial record between chunks of a stream.
///
/// When a record fails to parse, the buffer drops it up to and including its
/// delimiter and keeps everything after it, so the next `push` resumes on the
/// following record. Records that parsed before the failure are returned by the
/// next successful `push`.
///
/// ```rust
/// use serde_mdsf::{mdsf, RecordBuffer};
///
/// let mut buffer = RecordBuffer::new();
/// assert!(buffer.push("{a:1}\0{b:").unwrap() == vec![mdsf!({ "a": 1 })]);
/// assert_eq!(buffer.pending(), "{b:");
///
/// assert!(buffer.push("oops}\0{c:3}\0").is_err());
/// assert_eq!(buffer.pending(), "{c:3}\0");
/// assert_eq!(buffer.push("").unwrap(), vec![mdsf!({ "c": 3 })]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordBuffer {
    pending: String,
    ready: Vec<Value>,
}

impl RecordBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and returns every record completed so far.
    pub fn push(&mut self, chunk: &str) -> Result<Vec<Value>, SyntaxError> {
        self.pending.push_str(chunk);
        let parsed_before = self.ready.len();

        match reassemble(&self.pending, &mut self.ready) {
            Ok(rest) => {
                let consumed = self.pending.len() - rest.len();
                self.pending.drain(..consumed);
                Ok(std::mem::take(&mut self.ready))
            }
            Err(err) => {
                let failed = self.ready.len() - parsed_before;
                let cut = self
                    .pending
                    .match_indices(DELIMITER)
                    .nth(failed)
                    .map_or(self.pending.len(), |(index, _)| index + DELIMITER.len_utf8());
                debug!("discarding {} buffered bytes after a bad record", cut);
                self.pending.drain(..cut);
                Err(err)
            }
        }
    }

    /// The buffered text not yet terminated by a delimiter.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.ready.is_empty()
    }

    /// Forgets buffered text and undelivered records.
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            debug!("discarding {} buffered bytes", self.pending.len());
        }
        self.pending.clear();
        self.ready.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdsf;

    #[test]
    fn test_incomplete_record_is_kept() {
        let mut out = Vec::new();
        assert_eq!(reassemble("{a:", &mut out).unwrap(), "{a:");
        assert!(out.is_empty());

        assert_eq!(reassemble("{a:1}\0", &mut out).unwrap(), "");
        assert_eq!(out, vec![mdsf!({ "a": 1 })]);
    }

    #[test]
    fn test_split_across_calls() {
        let mut out = Vec::new();
        let rest = reassemble("{a:1}\0{b:", &mut out).unwrap().to_string();
        assert_eq!(rest, "{b:");
        let next = rest + "2}\0";
        assert_eq!(reassemble(&next, &mut out).unwrap(), "");
        assert_eq!(out, vec![mdsf!({ "a": 1 }), mdsf!({ "b": 2 })]);
    }

    #[test]
    fn test_records_must_be_objects() {
        let mut out = Vec::new();
        let err = reassemble("{a:1}\0[1]\0{c:3}\0", &mut out).unwrap_err();
        assert_eq!(err.message(), "`{` expected");
        assert_eq!(err.offset(), 0);
        assert_eq!(out, vec![mdsf!({ "a": 1 })]);
    }

    #[test]
    fn test_clutter_and_trailing_garbage() {
        let mut out = Vec::new();
        reassemble(" /* hi */ {a:1} // done\n\0", &mut out).unwrap();
        assert_eq!(out.len(), 1);

        let err = reassemble("{a:1} x\0", &mut out).unwrap_err();
        assert_eq!(err.offset(), 6);
    }

    #[test]
    fn test_empty_piece_is_an_error() {
        let mut out = Vec::new();
        let err = reassemble("\0", &mut out).unwrap_err();
        assert_eq!(err.message(), "unexpected end of data");
    }

    #[test]
    fn test_frame_round_trip() {
        let record = mdsf!({ "op": "call", "args": [1, "two", null] });
        let wire = frame(&record);
        let mut out = Vec::new();
        let rest = reassemble(&wire, &mut out).unwrap();
        assert_eq!(rest, "");
        assert_eq!(out, vec![record]);
    }

    #[test]
    fn test_buffer_resynchronizes() {
        let mut buffer = RecordBuffer::new();
        assert!(buffer.push("{a:1}\0{b:?}\0{c:").is_err());
        assert_eq!(buffer.pending(), "{c:");
        assert_eq!(
            buffer.push("3}\0").unwrap(),
            vec![mdsf!({ "a": 1 }), mdsf!({ "c": 3 })]
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = RecordBuffer::new();
        buffer.push("{a:").unwrap();
        assert!(!buffer.is_empty());
        buffer.clear();
        assert_eq!(buffer.pending(), "");
    }
}
