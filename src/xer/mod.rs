//! Reading schedule interchange files.
//!
//! The format is line oriented: `ERMHDR` opens the export, `%T` starts a
//! table, `%F` lists its fields, `%R` carries one row and `%E` ends the data.
//! Cells are tab separated.

pub mod extract;
pub mod mapping;

use crate::Schedule;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub use extract::{Extraction, RawTable, extract_tables};
pub use mapping::{KnownTable, MappedEntities, map_entities};

/// Failure to obtain parseable text. Nothing inside the file is ever fatal.
#[derive(Debug, Error)]
pub enum XerError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input is not an interchange file (NUL bytes and no table markers)")]
    NotText,
}

pub type XerResult<T> = Result<T, XerError>;

/// Parses already decoded interchange text.
pub fn parse_str(text: &str) -> Schedule {
    let extraction = extract_tables(text);
    let entities = map_entities(&extraction);
    let schedule = Schedule::from_parts(extraction.header, entities);
    info!(
        projects = schedule.projects().len(),
        activities = schedule.activities().len(),
        relationships = schedule.relationships().len(),
        resources = schedule.resources().len(),
        "schedule parsed"
    );
    schedule
}

/// Decodes raw bytes permissively and parses them. Invalid UTF-8 is replaced
/// and stray NUL characters are dropped; only NUL-laden input without any
/// table or header line is refused as binary.
pub fn parse_bytes(bytes: &[u8]) -> XerResult<Schedule> {
    let text = String::from_utf8_lossy(bytes);
    if !text.contains('\0') {
        return Ok(parse_str(&text));
    }

    let cleaned = text.replace('\0', "");
    if !has_markers(&cleaned) {
        return Err(XerError::NotText);
    }
    warn!(removed = text.len() - cleaned.len(), "dropping NUL characters");
    Ok(parse_str(&cleaned))
}

fn has_markers(text: &str) -> bool {
    text.lines().any(|line| {
        let line = line.trim_start_matches('\u{feff}');
        line.starts_with(extract::TABLE_TOKEN) || line.starts_with(extract::HEADER_TOKEN)
    })
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> XerResult<Schedule> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| XerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes(&bytes)
}

/// Parses several files in parallel; each result is independent of the others.
pub fn parse_files<P>(paths: &[P]) -> Vec<XerResult<Schedule>>
where
    P: AsRef<Path> + Sync,
{
    paths.par_iter().map(|path| parse_file(path)).collect()
}
