//! Flat, newline-delimited per-user files
//!
//! Every file is rewritten in full on save. Nothing is escaped: a comma in a
//! playlist name is written as-is and only survives reload because the name
//! is always the last field.

mod records;

pub use records::{MembershipRecord, ParseRecordError, PlaylistRecord};

use crate::error::StoreError;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// How a file is replaced on save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate the target and write in place. A crash mid-write can leave
    /// a truncated file.
    #[default]
    Truncate,

    /// Write a temporary file next to the target, then rename it over the
    /// target
    Atomic,
}

/// Parsed lines of a file, with the number of lines that failed to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Records<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for Records<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: 0,
        }
    }
}

/// Read one record per line
///
/// A missing file yields no records (a user who has not saved anything yet).
/// Blank lines are ignored. Lines that are not UTF-8 or fail to parse are
/// logged and skipped so one bad line does not lose the rest of the file.
pub fn read_records<T>(path: &Path) -> Result<Records<T>, StoreError>
where
    T: FromStr,
    T::Err: Display,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No data file at {:?}, starting empty", path);
            return Ok(Records::default());
        }
        Err(e) => return Err(StoreError::read(path, e)),
    };

    let mut records = Records::default();
    for (idx, raw) in BufReader::new(file).split(b'\n').enumerate() {
        let raw = raw.map_err(|e| StoreError::read(path, e))?;
        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line.trim_end_matches('\r'),
            Err(e) => {
                log::warn!("Skipping line {} of {:?}: {}", idx + 1, path, e);
                records.skipped += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<T>() {
            Ok(item) => records.items.push(item),
            Err(e) => {
                log::warn!("Skipping line {} of {:?}: {} ({:?})", idx + 1, path, e, line);
                records.skipped += 1;
            }
        }
    }

    Ok(records)
}

/// Replace `path` with one line per item
pub fn write_lines<I>(path: &Path, lines: I, mode: WriteMode) -> Result<(), StoreError>
where
    I: IntoIterator,
    I::Item: Display,
{
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir).map_err(|e| StoreError::write(dir, e))?;
    }

    match mode {
        WriteMode::Truncate => {
            let file = File::create(path).map_err(|e| StoreError::write(path, e))?;
            write_all_lines(BufWriter::new(file), lines).map_err(|e| StoreError::write(path, e))
        }
        WriteMode::Atomic => {
            let dir = parent.unwrap_or_else(|| Path::new("."));
            let mut tmp =
                tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::write(path, e))?;
            write_all_lines(BufWriter::new(tmp.as_file_mut()), lines)
                .map_err(|e| StoreError::write(path, e))?;
            tmp.persist(path)
                .map_err(|e| StoreError::write(path, e.error))?;
            Ok(())
        }
    }
}

fn write_all_lines<W, I>(mut writer: W, lines: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: Display,
{
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrackId;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let records = read_records::<TrackId>(&dir.path().join("absent.csv")).unwrap();
        assert!(records.items.is_empty());
        assert_eq!(records.skipped, 0);
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ids.csv");
        fs::write(&path, "1\nbanana\n\n3\r\n-4\n").unwrap();

        let records = read_records::<TrackId>(&path).unwrap();
        assert_eq!(records.items, vec![TrackId(1), TrackId(3)]);
        assert_eq!(records.skipped, 2);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites_u.csv");
        fs::write(&path, b"1\n\xff\xfe\n3\n").unwrap();

        let records = read_records::<TrackId>(&path).unwrap();
        assert_eq!(records.items, vec![TrackId(1), TrackId(3)]);
        assert_eq!(records.skipped, 1);
    }

    #[test]
    fn test_write_modes_produce_same_file() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("plain.csv");
        let atomic = dir.path().join("nested").join("atomic.csv");

        write_lines(&plain, [1, 2, 3], WriteMode::Truncate).unwrap();
        write_lines(&atomic, [1, 2, 3], WriteMode::Atomic).unwrap();

        assert_eq!(fs::read_to_string(&plain).unwrap(), "1\n2\n3\n");
        assert_eq!(fs::read_to_string(&atomic).unwrap(), "1\n2\n3\n");
    }

    #[test]
    fn test_rewrite_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ids.csv");
        write_lines(&path, [5, 6, 7], WriteMode::Truncate).unwrap();
        write_lines(&path, [8], WriteMode::Atomic).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "8\n");

        write_lines(&path, Vec::<u32>::new(), WriteMode::Truncate).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
