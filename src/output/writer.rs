//! Incremental result array writer
//!
//! Streams results as a pretty-printed JSON array, one entry at a time,
//! so partial output survives an aborted run.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};

/// Writes `[`, comma-separated entries and `]` around serialized results
pub struct ResultWriter<W: Write> {
    inner: W,
    written: usize,
}

impl ResultWriter<Box<dyn Write>> {
    /// Writer for a file, or stdout when the path is `-`
    pub fn open(path: &str) -> Result<Self> {
        let inner: Box<dyn Write> = if path == "-" {
            Box::new(io::stdout())
        } else {
            Box::new(
                File::create(path)
                    .with_context(|| format!("Failed to create output file: {path}"))?,
            )
        };
        Ok(Self::new(inner))
    }
}

impl<W: Write> ResultWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Append one entry; keys come out sorted
    pub fn write_result<T: Serialize>(&mut self, result: &T) -> Result<()> {
        let value = serde_json::to_value(result).context("Failed to serialize result")?;
        let entry = serde_json::to_string_pretty(&value).context("Failed to serialize result")?;

        let separator = if self.written == 0 { "[\n" } else { ",\n" };
        self.inner
            .write_all(separator.as_bytes())
            .and_then(|_| self.inner.write_all(entry.as_bytes()))
            .and_then(|_| self.inner.flush())
            .context("Failed to write result")?;

        self.written += 1;
        Ok(())
    }

    /// Number of entries written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Close the array and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        let closing = if self.written == 0 { "[\n]\n" } else { "\n]\n" };
        self.inner
            .write_all(closing.as_bytes())
            .and_then(|_| self.inner.flush())
            .context("Failed to finish output")?;
        Ok(self.inner)
    }
}
