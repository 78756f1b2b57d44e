// 📂 Collection I/O - CSV ⇄ Archive
//
// Format: serialNumber,title,inventor,type
// - Header row optional (first field starting with "serial")
// - Rows without exactly 4 fields are skipped
// - Rows with a non-numeric serial are skipped
// - Rows that are not valid UTF-8 are skipped
// - Fields are trimmed

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::archive::Archive;
use crate::entities::{SerialNumber, Spellbook};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("no such file: {}", .0.display())]
    NotFound(PathBuf),

    #[error("serial number {0} not found in file")]
    NotInFile(SerialNumber),

    #[error("serial number {0} already exists in the archive")]
    AlreadyExists(SerialNumber),

    #[error("archive has no spellbooks to save")]
    NoSpellbooks,

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

// ============================================================================
// ROW FORMAT
// ============================================================================

const FIELD_COUNT: usize = 4;
const HEADER_PREFIX: &str = "serial";

/// One CSV row (column names match the header we write)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionRow {
    #[serde(rename = "serialNumber")]
    serial_number: SerialNumber,

    #[serde(rename = "title")]
    title: String,

    #[serde(rename = "inventor")]
    inventor: String,

    #[serde(rename = "type")]
    spell_type: String,
}

impl From<CollectionRow> for Spellbook {
    fn from(row: CollectionRow) -> Self {
        Spellbook::new(row.serial_number, row.title, row.inventor, row.spell_type)
    }
}

impl From<&Spellbook> for CollectionRow {
    fn from(book: &Spellbook) -> Self {
        CollectionRow {
            serial_number: book.serial_number(),
            title: book.title().to_string(),
            inventor: book.inventor().to_string(),
            spell_type: book.spell_type().to_string(),
        }
    }
}

/// Counts from a whole-collection import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows added to the archive
    pub added: usize,
    /// Well-formed rows whose serial was already taken
    pub duplicates: usize,
    /// Malformed rows (wrong width, bad serial or not UTF-8)
    pub skipped: usize,
}

// ============================================================================
// READING
// ============================================================================

fn open_reader(path: &Path) -> Result<csv::Reader<File>, CollectionError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CollectionError::NotFound(path.to_path_buf()),
        _ => CollectionError::Io(e),
    })?;

    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .map(|field| field.starts_with(HEADER_PREFIX))
        .unwrap_or(false)
}

/// Parse one data record, or None if it is malformed
fn parse_row(record: &csv::StringRecord) -> Option<CollectionRow> {
    if record.len() != FIELD_COUNT {
        return None;
    }
    record.deserialize::<CollectionRow>(None).ok()
}

/// Visit every data row in file order.
///
/// The visitor gets `Some(row)` for a well-formed row and `None` for a
/// malformed one (including rows that are not valid UTF-8); returning
/// `false` stops the scan.
fn scan_rows<F>(path: &Path, mut visit: F) -> Result<(), CollectionError>
where
    F: FnMut(Option<CollectionRow>) -> bool,
{
    let mut reader = open_reader(path)?;

    for (index, result) in reader.byte_records().enumerate() {
        let record = csv::StringRecord::from_byte_record(result?).ok();

        if index == 0 && record.as_ref().is_some_and(is_header) {
            continue;
        }

        let row = record.as_ref().and_then(parse_row);
        if row.is_none() {
            debug!(line = index + 1, "skipping malformed collection row");
        }
        if !visit(row) {
            break;
        }
    }

    Ok(())
}

/// Add every well-formed row of `path` to the archive
pub fn import_collection(archive: &mut Archive, path: &Path) -> Result<ImportSummary, CollectionError> {
    let mut summary = ImportSummary::default();

    scan_rows(path, |row| {
        match row {
            Some(row) => match archive.add_spellbook(row.into()) {
                Ok(()) => summary.added += 1,
                Err(_) => summary.duplicates += 1,
            },
            None => summary.skipped += 1,
        }
        true
    })?;

    if summary.skipped > 0 {
        warn!(path = %path.display(), skipped = summary.skipped, "malformed rows skipped");
    }
    info!(
        path = %path.display(),
        added = summary.added,
        duplicates = summary.duplicates,
        "collection imported"
    );
    Ok(summary)
}

/// Import only the first row of `path` carrying `serial`
pub fn import_spellbook(
    archive: &mut Archive,
    path: &Path,
    serial: SerialNumber,
) -> Result<Spellbook, CollectionError> {
    let mut found = None;

    scan_rows(path, |row| match row {
        Some(row) if row.serial_number == serial => {
            found = Some(row);
            false
        }
        _ => true,
    })?;

    let spellbook: Spellbook = found.ok_or(CollectionError::NotInFile(serial))?.into();
    archive
        .add_spellbook(spellbook.clone())
        .map_err(|_| CollectionError::AlreadyExists(serial))?;

    info!(path = %path.display(), serial, "spellbook imported");
    Ok(spellbook)
}

// ============================================================================
// WRITING
// ============================================================================

/// Write every spellbook (ascending serial) with a header row.
/// Returns the number of rows written.
pub fn save_collection(archive: &Archive, path: &Path) -> Result<usize, CollectionError> {
    if !archive.has_spellbooks() {
        return Err(CollectionError::NoSpellbooks);
    }

    let mut writer = csv::Writer::from_path(path)?;
    let spellbooks = archive.all_spellbooks();

    for book in &spellbooks {
        writer.serialize(CollectionRow::from(*book))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = spellbooks.len(), "collection saved");
    Ok(spellbooks.len())
}

// ============================================================================
// TESTS
// ============================================================================
