/// Append-only score store: one `name,score` row per finished session.
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Entries shown on the end screen.
pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: f64,
}

/// Appends one row, creating the file if needed.
pub fn append_score(path: impl AsRef<Path>, entry: &ScoreEntry) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.serialize(entry)?;
    writer.flush()?;
    Ok(())
}

/// Every stored row in file order. A missing file is an empty store.
pub fn read_scores(path: impl AsRef<Path>) -> Result<Vec<ScoreEntry>> {
    let mut reader = match ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(err) if is_not_found(&err) => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    let mut entries = Vec::new();
    for row in reader.deserialize() {
        entries.push(row?);
    }
    Ok(entries)
}

/// The best `limit` scores, highest first.
pub fn leaderboard(path: impl AsRef<Path>, limit: usize) -> Result<Vec<ScoreEntry>> {
    let mut entries = read_scores(path)?;
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    entries.truncate(limit);
    Ok(entries)
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound)
}
