//! Read access to the photo library database.
//!
//! The library owns the "truth" about each photo: keywords, the people
//! recognized in it, album membership, title and description. Records are
//! resolved here and handed to the merge engine read-only.

#[cfg(test)]
mod schema;
pub mod sqlite;
#[cfg(test)]
pub(crate) mod test_support;

use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub use sqlite::Library;

/// One photo as the library knows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoRecord {
    pub uuid: String,
    pub filename: String,
    pub original_filename: String,
    /// Primary file. `None` when the original was never downloaded.
    pub path: Option<PathBuf>,
    pub missing: bool,
    pub keywords: BTreeSet<String>,
    /// Raw person names, may include the unknown-person sentinel.
    pub persons: BTreeSet<String>,
    pub albums: BTreeSet<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub has_edits: bool,
    pub edited_path: Option<PathBuf>,
    pub date: Option<NaiveDateTime>,
}

impl PhotoRecord {
    /// Edited derivative path, only when the library says one exists.
    pub fn edited(&self) -> Option<&PathBuf> {
        if self.has_edits {
            self.edited_path.as_ref()
        } else {
            None
        }
    }
}

/// Which photos to process. Criteria are OR-ed together.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub all: bool,
    pub albums: Vec<String>,
    pub uuids: Vec<String>,
    pub keywords: Vec<String>,
    pub persons: Vec<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        !self.all
            && self.albums.is_empty()
            && self.uuids.is_empty()
            && self.keywords.is_empty()
            && self.persons.is_empty()
    }
}

/// A keyword, person or album name with the number of photos using it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCount {
    pub name: String,
    pub count: i64,
}
