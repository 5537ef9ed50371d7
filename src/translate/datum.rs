//! Bounded framing of raw datums out of a JSON array body
//!
//! The request body is one serialized JSON array of row values, too large
//! to materialize. `DatumReader` scans it incrementally and yields one
//! parsed datum at a time. The serialized size of each datum is checked
//! while scanning, so an oversized datum is rejected without ever being
//! buffered past the cap.

use std::io::{BufReader, Bytes, Read};

use serde::de::Error as _;
use serde_json::Value;

use super::errors::{TranslateError, TranslateResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Opening bracket not yet consumed
    Start,
    /// Inside the array, positioned before the next datum
    InArray,
    /// Array closed or the reader failed; the iterator is fused
    Finished,
}

/// Incremental reader over a serialized JSON array of datums.
pub struct DatumReader<R: Read> {
    bytes: Bytes<BufReader<R>>,
    pushback: Option<u8>,
    max_datum_bytes: usize,
    state: ReaderState,
}

impl<R: Read> DatumReader<R> {
    /// Creates a reader enforcing `max_datum_bytes` per serialized datum.
    pub fn new(body: R, max_datum_bytes: usize) -> Self {
        Self {
            bytes: BufReader::new(body).bytes(),
            pushback: None,
            max_datum_bytes,
            state: ReaderState::Start,
        }
    }

    fn next_byte(&mut self) -> TranslateResult<Option<u8>> {
        if let Some(b) = self.pushback.take() {
            return Ok(Some(b));
        }
        match self.bytes.next() {
            Some(Ok(b)) => Ok(Some(b)),
            Some(Err(e)) => Err(TranslateError::Io(e)),
            None => Ok(None),
        }
    }

    fn next_non_ws(&mut self) -> TranslateResult<Option<u8>> {
        loop {
            match self.next_byte()? {
                Some(b) if (b as char).is_ascii_whitespace() => continue,
                other => return Ok(other),
            }
        }
    }

    fn push_capped(&mut self, buf: &mut Vec<u8>, b: u8) -> TranslateResult<()> {
        if buf.len() >= self.max_datum_bytes {
            return Err(TranslateError::OversizedDatum {
                limit: self.max_datum_bytes,
            });
        }
        buf.push(b);
        Ok(())
    }

    /// Scans the raw bytes of exactly one JSON value.
    fn read_raw_datum(&mut self, first: u8) -> TranslateResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.push_capped(&mut buf, first)?;
        match first {
            b'{' | b'[' => self.scan_nested(&mut buf)?,
            b'"' => self.scan_string(&mut buf)?,
            _ => self.scan_scalar(&mut buf)?,
        }
        Ok(buf)
    }

    /// Consumes a bracketed value, tracking string state so brackets inside
    /// string literals do not count toward nesting depth.
    fn scan_nested(&mut self, buf: &mut Vec<u8>) -> TranslateResult<()> {
        let mut depth: usize = 1;
        let mut in_string = false;
        let mut escaped = false;
        while depth > 0 {
            let b = self.next_byte()?.ok_or_else(unexpected_end)?;
            self.push_capped(buf, b)?;
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
            } else {
                match b {
                    b'"' => in_string = true,
                    b'{' | b'[' => depth += 1,
                    b'}' | b']' => depth -= 1,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn scan_string(&mut self, buf: &mut Vec<u8>) -> TranslateResult<()> {
        let mut escaped = false;
        loop {
            let b = self.next_byte()?.ok_or_else(unexpected_end)?;
            self.push_capped(buf, b)?;
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                return Ok(());
            }
        }
    }

    /// Consumes a number or keyword up to the next delimiter, which is
    /// pushed back for the framing step.
    fn scan_scalar(&mut self, buf: &mut Vec<u8>) -> TranslateResult<()> {
        loop {
            match self.next_byte()? {
                None => return Ok(()),
                Some(b) if b == b',' || b == b']' || b == b'}' => {
                    self.pushback = Some(b);
                    return Ok(());
                }
                Some(b) if (b as char).is_ascii_whitespace() => return Ok(()),
                Some(b) => self.push_capped(buf, b)?,
            }
        }
    }

    fn next_datum(&mut self) -> TranslateResult<Option<Value>> {
        if self.state == ReaderState::Start {
            match self.next_non_ws()? {
                Some(b'[') => self.state = ReaderState::InArray,
                Some(other) => {
                    return Err(TranslateError::MalformedJson(serde_json::Error::custom(
                        format!("expected array body, found '{}'", other as char),
                    )))
                }
                None => {
                    return Err(TranslateError::MalformedJson(serde_json::Error::custom(
                        "expected array body, found end of input",
                    )))
                }
            }
            // Empty body closes immediately.
            match self.next_non_ws()? {
                Some(b']') => {
                    self.state = ReaderState::Finished;
                    return Ok(None);
                }
                Some(other) => self.pushback = Some(other),
                None => return Err(unexpected_end().into()),
            }
        }

        let first = self.next_non_ws()?.ok_or_else(unexpected_end)?;
        let raw = self.read_raw_datum(first)?;
        let value: Value = serde_json::from_slice(&raw)?;

        match self.next_non_ws()? {
            Some(b',') => {}
            Some(b']') => self.state = ReaderState::Finished,
            Some(other) => {
                return Err(TranslateError::MalformedJson(serde_json::Error::custom(
                    format!("expected ',' or ']' after datum, found '{}'", other as char),
                )))
            }
            None => return Err(unexpected_end().into()),
        }
        Ok(Some(value))
    }
}

fn unexpected_end() -> serde_json::Error {
    serde_json::Error::custom("unexpected end of input")
}

impl<R: Read> Iterator for DatumReader<R> {
    type Item = TranslateResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ReaderState::Finished {
            return None;
        }
        match self.next_datum() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => None,
            Err(e) => {
                self.state = ReaderState::Finished;
                Some(Err(e))
            }
        }
    }
}
