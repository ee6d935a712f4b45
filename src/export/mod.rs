//! Export photos out of the library before tagging them.
//!
//! Copies land in the export directory, optionally nested by creation date:
//! ```text
//! /Export/
//! ├── IMG_0001.jpg
//! └── 2019/
//!     └── 10/
//!         └── 05/
//!             ├── beach.jpg
//!             └── beach_edited.jpg
//! ```
//! An existing file with the same name is overwritten.

use chrono::{Datelike, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{MetaError, Result};
use crate::library::PhotoRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub dest: PathBuf,
    /// Nest copies as `YYYY/MM/DD` from the photo's creation date.
    pub by_date: bool,
    /// Name copies after the file as originally imported.
    pub original_name: bool,
}

/// Where the exported copies ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPhoto {
    pub primary: PathBuf,
    pub edited: Option<PathBuf>,
}

/// The export directory has to exist up front; it is never created.
pub fn check_export_dir(dest: &Path) -> Result<()> {
    if dest.is_dir() {
        Ok(())
    } else {
        Err(MetaError::ExportPath(dest.to_path_buf()))
    }
}

/// Folder for a photo taken at `date`. Undated photos go in `dest` itself.
pub fn destination_folder(dest: &Path, date: Option<NaiveDateTime>, by_date: bool) -> PathBuf {
    match date {
        Some(dt) if by_date => dest
            .join(format!("{:04}", dt.year()))
            .join(format!("{:02}", dt.month()))
            .join(format!("{:02}", dt.day())),
        _ => dest.to_path_buf(),
    }
}

fn export_name(record: &PhotoRecord, source: &Path, original_name: bool) -> String {
    let name = if original_name {
        &record.original_filename
    } else {
        &record.filename
    };
    if !name.is_empty() {
        return name.clone();
    }
    source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| format!("{}.jpg", record.uuid))
}

/// `beach.jpg` + `edit.heic` → `beach_edited.heic`
fn edited_name(base: &str, edited_source: &Path) -> String {
    let base = Path::new(base);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = edited_source
        .extension()
        .or_else(|| base.extension())
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    format!("{}_edited{}", stem, extension)
}

/// Copy a photo (and its edited derivative, when given) into the export
/// directory.
pub fn export_photo(
    record: &PhotoRecord,
    source: &Path,
    edited_source: Option<&Path>,
    options: &ExportOptions,
) -> Result<ExportedPhoto> {
    check_export_dir(&options.dest)?;
    if !source.is_file() {
        return Err(MetaError::InvalidPath(source.to_path_buf()));
    }

    let folder = destination_folder(&options.dest, record.date, options.by_date);
    fs::create_dir_all(&folder)?;

    let name = export_name(record, source, options.original_name);
    let primary = folder.join(&name);
    debug!("Exporting {} as {}", source.display(), primary.display());
    fs::copy(source, &primary)?;

    let edited = match edited_source {
        Some(edited_source) => {
            if !edited_source.is_file() {
                return Err(MetaError::InvalidPath(edited_source.to_path_buf()));
            }
            let target = folder.join(edited_name(&name, edited_source));
            debug!(
                "Exporting edited version {} as {}",
                edited_source.display(),
                target.display()
            );
            fs::copy(edited_source, &target)?;
            Some(target)
        }
        None => None,
    };

    Ok(ExportedPhoto { primary, edited })
}
