//! Songs file (songs.csv) parser

use super::{Catalog, MAX_TRACKS};
use crate::model::{Track, TrackId};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse the songs file and build the catalog
///
/// The first line is a header and is skipped. Rows that cannot be parsed
/// are logged and skipped; rows past [`MAX_TRACKS`] are ignored.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let file =
        File::open(path).with_context(|| format!("Failed to open songs file: {:?}", path))?;
    let reader = BufReader::new(file);

    let mut catalog = Catalog::new();
    let mut skipped = 0usize;

    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line.with_context(|| format!("Failed to read songs file: {:?}", path))?;
        if line.trim().is_empty() {
            continue;
        }

        if catalog.len() >= MAX_TRACKS {
            log::warn!(
                "Catalog limit of {} tracks reached, ignoring the rest of {:?}",
                MAX_TRACKS,
                path
            );
            break;
        }

        match parse_catalog_line(&line) {
            Some(track) => {
                if !catalog.push(track) {
                    skipped += 1;
                }
            }
            None => {
                log::warn!("Skipping malformed catalog row {} in {:?}: {}", idx + 1, path, line);
                skipped += 1;
            }
        }
    }

    log::info!(
        "Loaded {} tracks from {:?} ({} skipped)",
        catalog.len(),
        path,
        skipped
    );
    Ok(catalog)
}

/// Parse one `id,title,artist,genre,duration,filePath,imagePath[,dateAdded]` row
///
/// Fields are not escaped, so a comma inside a title shifts every later
/// field. Such rows usually fail the duration parse and are dropped.
pub fn parse_catalog_line(line: &str) -> Option<Track> {
    let fields: Vec<&str> = line.trim_end_matches('\r').split(',').collect();
    if fields.len() < 7 {
        return None;
    }

    let id = fields[0].parse::<TrackId>().ok()?;
    let duration_secs = fields[4].trim().parse::<u32>().ok()?;
    let date_added = fields
        .get(7)
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());

    Some(
        Track::new(id, fields[1], fields[2])
            .with_genre(fields[3])
            .with_duration(duration_secs)
            .with_paths(fields[5], fields[6])
            .with_date_added(date_added),
    )
}
