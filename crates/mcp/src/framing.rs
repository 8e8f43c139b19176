//! Streaming JSON framing over byte streams.
//!
//! Values may arrive back to back, split across reads, or separated by any
//! amount of whitespace. After a syntax error the reader drops input up to
//! the offending byte, then skips ahead to the next `{` or newline.

use std::io::{self, ErrorKind, Read, Write};

use serde::Serialize;
use serde_json::Value;

const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug)]
pub enum Frame {
    Message(Value),
    Malformed(serde_json::Error),
}

pub struct FrameReader<R> {
    reader: R,
    buf: Vec<u8>,
    eof: bool,
    resyncing: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            eof: false,
            resyncing: false,
        }
    }

    /// Next decoded unit, or `None` once the input is exhausted.
    pub fn next_frame(&mut self) -> io::Result<Option<Frame>> {
        loop {
            if self.resyncing && !self.resync() {
                if self.eof {
                    return Ok(None);
                }
                self.fill()?;
                continue;
            }

            self.trim_leading_whitespace();
            if self.buf.is_empty() {
                if self.eof {
                    return Ok(None);
                }
                self.fill()?;
                continue;
            }

            match self.try_decode() {
                Some(frame) => return Ok(Some(frame)),
                None if self.eof => {
                    self.buf.clear();
                    return Ok(None);
                }
                None => self.fill()?,
            }
        }
    }

    fn try_decode(&mut self) -> Option<Frame> {
        let (decoded, consumed) = {
            let mut stream =
                serde_json::Deserializer::from_slice(&self.buf).into_iter::<Value>();
            let decoded = stream.next()?;
            (decoded, stream.byte_offset())
        };

        match decoded {
            Ok(value) => {
                self.buf.drain(..consumed);
                Some(Frame::Message(value))
            }
            Err(e) if e.is_eof() && !self.eof => None,
            Err(e) => {
                // The offending byte sits just before the reported position.
                // Always drop at least one byte so a bad value cannot repeat.
                let at = error_offset(&self.buf, &e)
                    .saturating_sub(1)
                    .max(1)
                    .min(self.buf.len());
                self.buf.drain(..at);
                self.resyncing = true;
                Some(Frame::Malformed(e))
            }
        }
    }

    /// Drop buffered bytes up to the next `{` or newline. Returns false when
    /// neither is buffered yet, in which case everything buffered is dropped.
    fn resync(&mut self) -> bool {
        match self.buf.iter().position(|&b| b == b'{' || b == b'\n') {
            Some(pos) => {
                self.buf.drain(..pos);
                self.resyncing = false;
                true
            }
            None => {
                self.buf.clear();
                false
            }
        }
    }

    fn trim_leading_whitespace(&mut self) {
        let start = self
            .buf
            .iter()
            .position(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
            .unwrap_or(self.buf.len());
        self.buf.drain(..start);
    }

    fn fill(&mut self) -> io::Result<()> {
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Byte index in `buf` matching the line/column reported by `e`.
fn error_offset(buf: &[u8], e: &serde_json::Error) -> usize {
    let line_start = match e.line() {
        0 | 1 => 0,
        line => buf
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b == b'\n')
            .nth(line - 2)
            .map_or(buf.len(), |(i, _)| i + 1),
    };
    (line_start + e.column()).min(buf.len())
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = io::Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

/// Writes one newline-terminated JSON value per frame and flushes.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_frame<T: Serialize>(&mut self, frame: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
