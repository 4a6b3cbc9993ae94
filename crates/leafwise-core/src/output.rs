//! JSON and JSON Lines output for reports.
//!
//! A batch produces results one at a time, so besides writing a single
//! object the writer can stream array elements: in JSON format they are
//! wrapped in `[` ... `]` as they arrive, in JSONL each one is a line.

use serde::Serialize;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Serializes reports to JSON or JSONL.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
    array_open: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects JSON; JSONL is always one compact object per line.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
            array_open: false,
        }
    }

    /// Write one standalone item.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        self.serialize(item, self.format == OutputFormat::Json && self.pretty)?;
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    /// Write one element of a streamed batch.
    ///
    /// Call [`finish`](Self::finish) after the last element.
    pub fn write_element<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::JsonLines => self.write(item),
            OutputFormat::Json => {
                let separator = if self.array_open { ",\n" } else { "[\n" };
                self.writer.write_all(separator.as_bytes())?;
                self.array_open = true;
                self.serialize(item, self.pretty)?;
                self.items_written += 1;
                // Keep partial output visible while the batch runs
                self.writer.flush()
            }
        }
    }

    /// Close a streamed batch. An empty JSON batch is written as `[]`.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            if self.array_open {
                self.writer.write_all(b"\n]\n")?;
                self.array_open = false;
            } else if self.items_written == 0 {
                self.writer.write_all(b"[]\n")?;
            }
        }
        self.writer.flush()
    }

    fn serialize<T: Serialize>(&mut self, item: &T, pretty: bool) -> io::Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)
        }
    }
}
