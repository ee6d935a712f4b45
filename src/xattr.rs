//! Mirror keywords and persons into a file's extended attributes so desktop
//! search can find them.
//!
//! Tags are stored as one comma separated list (the freedesktop
//! `user.xdg.tags` convention). New values are appended; tags already on
//! the file are kept.

use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use crate::error::{MetaError, Result};

pub trait AttributeStore {
    fn append_tags(&self, path: &Path, tags: &BTreeSet<String>) -> Result<()>;
}

pub struct XattrStore {
    attribute: String,
}

impl XattrStore {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }
}

impl AttributeStore for XattrStore {
    fn append_tags(&self, path: &Path, tags: &BTreeSet<String>) -> Result<()> {
        let xattr_err = |source| MetaError::Xattr {
            path: path.to_path_buf(),
            source,
        };

        let existing = ::xattr::get(path, &self.attribute).map_err(xattr_err)?;
        let Some(merged) = append_to_list(existing.as_deref(), tags) else {
            debug!("{} already has all tags in {}", path.display(), self.attribute);
            return Ok(());
        };

        ::xattr::set(path, &self.attribute, merged.as_bytes()).map_err(xattr_err)?;
        debug!("set {} on {} to {:?}", self.attribute, path.display(), merged);
        Ok(())
    }
}

/// Append `tags` to a stored list, keeping existing order. `None` when
/// nothing new would be added.
fn append_to_list(existing: Option<&[u8]>, tags: &BTreeSet<String>) -> Option<String> {
    let mut list: Vec<String> = existing
        .map(|raw| {
            String::from_utf8_lossy(raw)
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let before = list.len();
    for tag in tags {
        // A comma would split the tag in two when read back.
        let tag = tag.replace(',', " ");
        if !list.contains(&tag) {
            list.push(tag);
        }
    }

    if list.len() == before {
        None
    } else {
        Some(list.join(","))
    }
}
