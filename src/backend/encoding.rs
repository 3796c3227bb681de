//! Character encodings on both sides of the XML layer
//!
//! Trees only ever see UTF-8. [`DecodedSource`] sits between a byte source
//! and the parser: it detects the document encoding from a byte order mark,
//! from the layout of a BOM-less UTF-16 declaration, or from the
//! `encoding="..."` of the XML declaration, and transcodes everything else to
//! UTF-8 as the parser pulls. [`EncodedSink`] does the reverse for output.
//!
//! Labels follow the WHATWG Encoding Standard via `encoding_rs`, so
//! `latin1` and `iso-8859-1` both mean windows-1252. Characters the output
//! encoding cannot represent are written as numeric character references.

use crate::errors::{BackendError, BackendResult};
use encoding_rs::{CoderResult, Decoder, Encoder, Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::io::{self, BufRead, Read, Write};

/// Resolves a user-facing encoding label
pub fn resolve_encoding(label: &str) -> BackendResult<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
    let alias = match normalized.as_str() {
        "" | "unicode" | "utf8" => "utf-8",
        "utf16" => "utf-16",
        "latin-1" => "latin1",
        other => other,
    };
    Encoding::for_label(alias.as_bytes())
        .or_else(|| Encoding::for_label(label.trim().as_bytes()))
        .filter(|encoding| *encoding != encoding_rs::REPLACEMENT)
        .ok_or_else(|| BackendError::UnsupportedEncoding(label.to_string()))
}

/// Name written in the XML declaration for `encoding`
pub fn declared_name(encoding: &'static Encoding) -> &'static str {
    if is_utf16(encoding) {
        "UTF-16"
    } else {
        encoding.name()
    }
}

fn is_utf16(encoding: &'static Encoding) -> bool {
    encoding == UTF_16LE || encoding == UTF_16BE
}

/// Encoding of a document, judged from its first bytes; the count is the BOM length
pub fn detect(head: &[u8]) -> (&'static Encoding, usize) {
    if let Some(found) = Encoding::for_bom(head) {
        return found;
    }
    if head.starts_with(&[0x3C, 0x00, 0x3F, 0x00]) {
        return (UTF_16LE, 0);
    }
    if head.starts_with(&[0x00, 0x3C, 0x00, 0x3F]) {
        return (UTF_16BE, 0);
    }
    // An ASCII-compatible document cannot really be UTF-16, whatever it declares
    match declared_label(head).and_then(Encoding::for_label) {
        Some(encoding) if !is_utf16(encoding) && encoding != encoding_rs::REPLACEMENT => (encoding, 0),
        _ => (UTF_8, 0),
    }
}

/// Value of `encoding` in a leading `<?xml ... ?>`
fn declared_label(head: &[u8]) -> Option<&[u8]> {
    let rest = head.strip_prefix(b"<?xml")?;
    let end = rest.windows(2).position(|pair| pair == b"?>")?;
    let declaration = &rest[..end];
    let at = declaration
        .windows(b"encoding".len())
        .position(|window| window == b"encoding")?;
    let after = &declaration[at + b"encoding".len()..];
    let after = after.trim_ascii_start().strip_prefix(b"=")?.trim_ascii_start();
    let (&quote, value) = after.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let close = value.iter().position(|&byte| byte == quote)?;
    Some(&value[..close])
}

// ============================================================================
// INPUT
// ============================================================================

/// UTF-8 view of a byte source in any supported encoding
///
/// Detection happens on the first read. UTF-8 input passes straight
/// through; anything else is decoded chunk by chunk, so memory stays bounded
/// by the underlying buffer.
pub struct DecodedSource<R> {
    inner: R,
    sniffed: bool,
    /// `None` when the input already is UTF-8
    decoder: Option<Decoder>,
    decoded: String,
    pos: usize,
    eof: bool,
}

impl<R: BufRead> DecodedSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            sniffed: false,
            decoder: None,
            decoded: String::new(),
            pos: 0,
            eof: false,
        }
    }

    /// Encoding detected so far; UTF-8 before the first read
    pub fn encoding(&self) -> &'static Encoding {
        self.decoder.as_ref().map_or(UTF_8, Decoder::encoding)
    }

    fn sniff(&mut self) -> io::Result<()> {
        let head = self.inner.fill_buf()?;
        let (encoding, bom) = detect(head);
        self.inner.consume(bom);
        if encoding != UTF_8 {
            log::debug!("decoding {} input", encoding.name());
            self.decoder = Some(encoding.new_decoder_without_bom_handling());
        }
        self.sniffed = true;
        Ok(())
    }
}

impl<R: BufRead> BufRead for DecodedSource<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if !self.sniffed {
            self.sniff()?;
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return self.inner.fill_buf();
        };
        while self.pos >= self.decoded.len() && !self.eof {
            self.decoded.clear();
            self.pos = 0;
            let input = self.inner.fill_buf()?;
            let last = input.is_empty();
            let needed = decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len() * 3 + 4);
            self.decoded.reserve(needed);
            let (_, read, _) = decoder.decode_to_string(input, &mut self.decoded, last);
            self.inner.consume(read);
            self.eof = last;
        }
        Ok(&self.decoded.as_bytes()[self.pos..])
    }

    fn consume(&mut self, amount: usize) {
        if self.decoder.is_some() {
            self.pos = (self.pos + amount).min(self.decoded.len());
        } else {
            self.inner.consume(amount);
        }
    }
}

impl<R: BufRead> Read for DecodedSource<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let count = available.len().min(out.len());
        out[..count].copy_from_slice(&available[..count]);
        self.consume(count);
        Ok(count)
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Byte sink that takes UTF-8 and writes the target encoding
///
/// UTF-16 output starts with a byte order mark. Call [`EncodedSink::finish`]
/// once everything is written so stateful encoders can close their output.
pub struct EncodedSink<W> {
    inner: W,
    encoding: &'static Encoding,
    /// `None` for UTF-8 and UTF-16, which need no `encoding_rs` encoder
    encoder: Option<Encoder>,
    /// Trailing bytes of a UTF-8 sequence split across writes
    pending: Vec<u8>,
    out: Vec<u8>,
    started: bool,
}

impl<W: Write> EncodedSink<W> {
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        let encoder = (encoding != UTF_8 && !is_utf16(encoding)).then(|| encoding.new_encoder());
        Self {
            inner,
            encoding,
            encoder,
            pending: Vec::new(),
            out: Vec::new(),
            started: false,
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Closes the encoder and hands back the inner sink
    pub fn finish(mut self) -> io::Result<W> {
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "output ended inside a UTF-8 sequence",
            ));
        }
        if let Some(encoder) = self.encoder.as_mut() {
            self.out.clear();
            encode_into(encoder, "", &mut self.out, true);
            self.inner.write_all(&self.out)?;
        }
        Ok(self.inner)
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.out.clear();
        if let Some(encoder) = self.encoder.as_mut() {
            encode_into(encoder, text, &mut self.out, false);
        } else {
            let big_endian = self.encoding == UTF_16BE;
            if !self.started {
                self.out.extend_from_slice(if big_endian { &[0xFE, 0xFF] } else { &[0xFF, 0xFE] });
            }
            for unit in text.encode_utf16() {
                let bytes = if big_endian {
                    unit.to_be_bytes()
                } else {
                    unit.to_le_bytes()
                };
                self.out.extend_from_slice(&bytes);
            }
        }
        self.started = true;
        self.inner.write_all(&self.out)
    }
}

fn encode_into(encoder: &mut Encoder, mut text: &str, out: &mut Vec<u8>, last: bool) {
    loop {
        out.reserve(text.len() * 2 + 16);
        let (result, read, _) = encoder.encode_from_utf8_to_vec(text, out, last);
        text = &text[read..];
        if let CoderResult::InputEmpty = result {
            return;
        }
    }
}

impl<W: Write> Write for EncodedSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.encoding == UTF_8 {
            return self.inner.write(buf);
        }
        self.pending.extend_from_slice(buf);
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            Err(err) => return Err(io::Error::new(io::ErrorKind::InvalidData, err)),
        };
        let complete: Vec<u8> = self.pending.drain(..valid).collect();
        let text = std::str::from_utf8(&complete)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        self.write_text(text)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
