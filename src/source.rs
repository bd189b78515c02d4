//! Encoded text source for fixwidth
//!
//! Fixed-width files are frequently produced by legacy systems in single-byte
//! code pages, so the importer does not assume UTF-8. This module resolves an
//! encoding label and decodes a byte stream incrementally into lines.
//!
//! Decoding is strict: a byte sequence that is not valid in the declared
//! encoding stops the stream with a `Decode` error naming the line it occurred
//! on. A byte order mark matching the declared encoding is removed; no other
//! sniffing is done.

use std::io::{ErrorKind, Read};

use encoding_rs::{Decoder, DecoderResult, Encoding};

use crate::error::{FixwidthError, FixwidthResult};

/// Size of each raw read from the underlying reader
const CHUNK_SIZE: usize = 8 * 1024;

/// A resolved source encoding
///
/// WHATWG folds `ascii` and the ISO-8859-1 labels into windows-1252, which
/// would accept bytes that are invalid ASCII and remap 0x80-0x9F. Those labels
/// resolve to dedicated variants instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// 7-bit ASCII; any byte above 0x7F is malformed
    Ascii,
    /// ISO-8859-1; every byte maps to the code point of the same value
    Latin1,
    /// Any other encoding_rs encoding
    Whatwg(&'static Encoding),
}

impl TextEncoding {
    /// Canonical name, as reported in `Decode` errors
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Ascii => "US-ASCII",
            TextEncoding::Latin1 => "ISO-8859-1",
            TextEncoding::Whatwg(encoding) => encoding.name(),
        }
    }
}

/// Resolve an encoding label
///
/// Accepts every WHATWG label (`utf-8`, `windows-1252`, `utf-16le`,
/// `shift_jis`, ...) plus a few common spellings that WHATWG lacks, such as
/// `utf_8`. `ascii` and the ISO-8859-1 labels (`latin1`, `latin-1`,
/// `iso-8859-1`, ...) keep their strict meaning rather than the WHATWG
/// windows-1252 mapping.
pub fn resolve_encoding(label: &str) -> FixwidthResult<TextEncoding> {
    let normalized = label.trim().to_ascii_lowercase();
    let whatwg = match normalized.as_str() {
        "ascii" | "us-ascii" | "us_ascii" | "646" => return Ok(TextEncoding::Ascii),
        "latin1" | "latin-1" | "latin_1" | "l1" | "iso-8859-1" | "iso8859-1" | "iso_8859-1"
        | "iso8859_1" | "iso_8859_1" | "iso88591" | "8859" | "cp819" => {
            return Ok(TextEncoding::Latin1)
        }
        "utf_8" => "utf-8",
        "utf_16" | "utf_16le" | "utf-16-le" => "utf-16le",
        "utf_16be" | "utf-16-be" => "utf-16be",
        other => other,
    };

    match Encoding::for_label(whatwg.as_bytes()) {
        Some(encoding) if encoding != encoding_rs::REPLACEMENT => {
            Ok(TextEncoding::Whatwg(encoding))
        }
        _ => Err(FixwidthError::UnknownEncoding(label.to_string())),
    }
}

/// Iterator over the decoded lines of a byte stream
///
/// Lines are split on `\n`; a trailing `\r` is removed as well, and neither is
/// part of the yielded text. A final line without a terminator is still
/// yielded. After the first error the iterator is exhausted.
pub struct TextSource<R> {
    reader: R,
    encoding: TextEncoding,
    /// Streaming decoder; `None` for the single-byte encodings decoded inline
    decoder: Option<Decoder>,
    /// Layout name reported in `Decode` errors
    layout: String,
    chunk: Vec<u8>,
    /// Decoded text not yet handed out as lines
    pending: String,
    /// Lines handed out so far
    lines_read: usize,
    eof: bool,
    done: bool,
}

impl<R: Read> TextSource<R> {
    /// Wrap a reader, decoding with the given encoding
    pub fn new(reader: R, encoding: TextEncoding) -> Self {
        let decoder = match encoding {
            TextEncoding::Whatwg(encoding) => Some(encoding.new_decoder_with_bom_removal()),
            TextEncoding::Ascii | TextEncoding::Latin1 => None,
        };
        TextSource {
            reader,
            encoding,
            decoder,
            layout: String::new(),
            chunk: vec![0; CHUNK_SIZE],
            pending: String::new(),
            lines_read: 0,
            eof: false,
            done: false,
        }
    }

    /// Wrap a reader, resolving the encoding from its label
    pub fn with_label(reader: R, label: &str) -> FixwidthResult<Self> {
        Ok(Self::new(reader, resolve_encoding(label)?))
    }

    /// Name the layout being read, for error messages
    pub fn for_layout(mut self, layout: &str) -> Self {
        self.layout = layout.to_string();
        self
    }

    /// Canonical name of the encoding in use
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Number of lines yielded so far
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Read one chunk and decode it onto `pending`
    fn fill(&mut self) -> FixwidthResult<()> {
        let n = loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        let last = n == 0;
        let input = &self.chunk[..n];

        if let Some(decoder) = self.decoder.as_mut() {
            let mut input = input;
            loop {
                let needed = decoder
                    .max_utf8_buffer_length_without_replacement(input.len())
                    .unwrap_or(CHUNK_SIZE * 4);
                self.pending.reserve(needed);

                let (result, read) =
                    decoder.decode_to_string_without_replacement(input, &mut self.pending, last);
                input = &input[read..];

                match result {
                    DecoderResult::InputEmpty => break,
                    DecoderResult::OutputFull => continue,
                    DecoderResult::Malformed(_, _) => return Err(self.malformed()),
                }
            }
        } else if self.encoding == TextEncoding::Ascii {
            let valid = encoding_rs::Encoding::ascii_valid_up_to(input);
            self.pending.extend(input[..valid].iter().map(|&b| char::from(b)));
            if valid < input.len() {
                return Err(self.malformed());
            }
        } else {
            self.pending.push_str(&encoding_rs::mem::decode_latin1(input));
        }

        self.eof = last;
        Ok(())
    }

    /// Decode error for the line currently being assembled in `pending`
    fn malformed(&self) -> FixwidthError {
        FixwidthError::Decode {
            layout: self.layout.clone(),
            encoding: self.encoding.name().to_string(),
            line: self.lines_read + self.pending.matches('\n').count() + 1,
        }
    }

    fn take_line(&mut self, end: usize, consumed: usize) -> String {
        let line = strip_cr(&self.pending[..end]).to_string();
        self.pending.drain(..consumed);
        self.lines_read += 1;
        line
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

impl<R: Read> Iterator for TextSource<R> {
    type Item = FixwidthResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Some(nl) = self.pending.find('\n') {
                return Some(Ok(self.take_line(nl, nl + 1)));
            }

            if self.eof {
                self.done = true;
                if self.pending.is_empty() {
                    return None;
                }
                let len = self.pending.len();
                return Some(Ok(self.take_line(len, len)));
            }

            if let Err(e) = self.fill() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}
