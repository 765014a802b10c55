//! Persistence of YODA text. Everything else in the crate is pure.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::WriteOptions;
use crate::error::Result;
use crate::histogram::HistogramCollection;
use crate::writer::to_yoda;

/// Write `text` to `path`, replacing any existing file.
pub fn write_yoda_file(path: &Path, text: &str) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(text.as_bytes())?;
    w.flush()?;
    log::info!("wrote {} bytes of YODA to {}", text.len(), path.display());
    Ok(())
}

/// Read a whole YODA file.
pub fn read_yoda_file(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)?;
    log::info!("read {} bytes of YODA from {}", text.len(), path.display());
    Ok(text)
}

/// Serialize `collection` and write it to `path`.
///
/// Nothing is written if serialization fails.
pub fn save_collection(
    path: &Path,
    collection: &HistogramCollection,
    opts: &WriteOptions,
) -> Result<()> {
    let text = to_yoda(collection, opts)?;
    write_yoda_file(path, &text)
}
