//! Reconcile library metadata with the tags already embedded in a file.
//!
//! Keywords and persons are additive: the result is the union of what the
//! library knows and what the file already carries. Title and description
//! are owned by the library and replace the file's values. Fields the
//! library has nothing for are left alone on the file.

use std::collections::BTreeSet;

use super::snapshot::TagSnapshot;
use crate::library::PhotoRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Add every album the photo belongs to as a keyword.
    pub albums_as_keywords: bool,
    /// Placeholder person name for unidentified faces; never written.
    pub unknown_person: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            albums_as_keywords: false,
            unknown_person: "_UNKNOWN_".to_string(),
        }
    }
}

/// Which fields differ from what the file already holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub keywords: bool,
    pub persons: bool,
    pub title: bool,
    pub description: bool,
}

impl Changes {
    pub fn any(&self) -> bool {
        self.keywords || self.persons || self.title || self.description
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    /// Empty when the library has no keywords (or albums) for the photo.
    pub keywords: BTreeSet<String>,
    /// Empty when the library has no named persons for the photo.
    pub persons: BTreeSet<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub changes: Changes,
}

pub fn merge(record: &PhotoRecord, snapshot: &TagSnapshot, options: &MergeOptions) -> MergeResult {
    let mut result = MergeResult::default();

    let use_albums = options.albums_as_keywords && !record.albums.is_empty();
    if !record.keywords.is_empty() || use_albums {
        let file_keywords = snapshot.keywords();
        let file_tags_list = snapshot.tags_list();

        let mut keywords = record.keywords.clone();
        keywords.extend(file_keywords.iter().cloned());
        keywords.extend(file_tags_list.iter().cloned());
        if options.albums_as_keywords {
            for album in &record.albums {
                if !keywords.contains(album) {
                    keywords.insert(album.clone());
                }
            }
        }

        result.changes.keywords = file_keywords != keywords || file_tags_list != keywords;
        result.keywords = keywords;
    }

    let named: BTreeSet<&String> = record
        .persons
        .iter()
        .filter(|p| **p != options.unknown_person)
        .collect();
    if !named.is_empty() {
        let file_persons = snapshot.persons();

        let mut persons: BTreeSet<String> = named.into_iter().cloned().collect();
        persons.extend(file_persons.iter().cloned());
        persons.remove(&options.unknown_person);

        result.changes.persons = file_persons != persons;
        result.persons = persons;
    }

    if let Some(title) = non_empty(&record.title) {
        result.changes.title = snapshot.title().as_deref() != Some(title);
        result.title = Some(title.to_string());
    }

    if let Some(description) = non_empty(&record.description) {
        result.changes.description = snapshot.image_description().as_deref() != Some(description)
            || snapshot.xmp_description().as_deref() != Some(description);
        result.description = Some(description.to_string());
    }

    result
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::snapshot::TagValue;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn record(keywords: &[&str], persons: &[&str]) -> PhotoRecord {
        PhotoRecord {
            uuid: "U1".to_string(),
            keywords: set(keywords),
            persons: set(persons),
            ..Default::default()
        }
    }

    #[test]
    fn test_keywords_union_with_tags_list() {
        let snapshot = TagSnapshot {
            xmp_tags_list: Some(["dog", "cat"].into_iter().collect()),
            ..Default::default()
        };
        let result = merge(&record(&["dog"], &[]), &snapshot, &MergeOptions::default());

        assert_eq!(result.keywords, set(&["cat", "dog"]));
        assert!(result.changes.keywords, "IPTC:Keywords is missing both values");
        assert!(result.persons.is_empty());
        assert!(result.title.is_none());
        assert!(result.description.is_none());
    }

    #[test]
    fn test_keywords_from_both_keyword_tags() {
        let snapshot = TagSnapshot {
            iptc_keywords: Some(TagValue::from("sea")),
            xmp_tags_list: Some(["sand"].into_iter().collect()),
            ..Default::default()
        };
        let result = merge(&record(&["sun"], &[]), &snapshot, &MergeOptions::default());
        assert_eq!(result.keywords, set(&["sand", "sea", "sun"]));
    }

    #[test]
    fn test_no_library_keywords_leaves_file_alone() {
        let snapshot = TagSnapshot {
            iptc_keywords: Some(["old"].into_iter().collect()),
            ..Default::default()
        };
        let result = merge(&record(&[], &[]), &snapshot, &MergeOptions::default());
        assert!(result.keywords.is_empty());
        assert!(!result.changes.any());
    }

    #[test]
    fn test_albums_as_keywords_not_duplicated() {
        let mut photo = record(&["trip"], &[]);
        photo.albums = set(&["trip", "family"]);
        let options = MergeOptions {
            albums_as_keywords: true,
            ..Default::default()
        };

        let result = merge(&photo, &TagSnapshot::default(), &options);
        assert_eq!(result.keywords, set(&["family", "trip"]));
    }

    #[test]
    fn test_albums_as_keywords_without_library_keywords() {
        let mut photo = record(&[], &[]);
        photo.albums = set(&["Pets"]);
        let options = MergeOptions {
            albums_as_keywords: true,
            ..Default::default()
        };

        let result = merge(&photo, &TagSnapshot::default(), &options);
        assert_eq!(result.keywords, set(&["Pets"]));
        assert!(result.changes.keywords);

        // Albums are ignored unless asked for.
        let result = merge(&photo, &TagSnapshot::default(), &MergeOptions::default());
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_persons_union_without_duplicates() {
        let snapshot = TagSnapshot {
            xmp_person_in_image: Some(["Ann", "Bob"].into_iter().collect()),
            ..Default::default()
        };
        let result = merge(&record(&[], &["Ann", "Cid"]), &snapshot, &MergeOptions::default());
        assert_eq!(result.persons, set(&["Ann", "Bob", "Cid"]));
        assert!(result.changes.persons);
    }

    #[test]
    fn test_unknown_person_removed_from_both_sources() {
        let snapshot = TagSnapshot {
            xmp_person_in_image: Some(["_UNKNOWN_", "Bob"].into_iter().collect()),
            ..Default::default()
        };
        let result = merge(
            &record(&[], &["_UNKNOWN_", "Ann"]),
            &snapshot,
            &MergeOptions::default(),
        );
        assert_eq!(result.persons, set(&["Ann", "Bob"]));
        assert!(!result.persons.contains("_UNKNOWN_"));
    }

    #[test]
    fn test_only_unknown_person_is_no_persons() {
        let snapshot = TagSnapshot {
            xmp_person_in_image: Some(TagValue::from("Bob")),
            ..Default::default()
        };
        let result = merge(&record(&[], &["_UNKNOWN_"]), &snapshot, &MergeOptions::default());
        assert!(result.persons.is_empty());
        assert!(!result.changes.persons);
    }

    #[test]
    fn test_custom_unknown_person() {
        let options = MergeOptions {
            unknown_person: "Unknown".to_string(),
            ..Default::default()
        };
        let result = merge(&record(&[], &["Unknown", "Ann"]), &TagSnapshot::default(), &options);
        assert_eq!(result.persons, set(&["Ann"]));
    }

    #[test]
    fn test_title_overrides_file() {
        let mut photo = record(&[], &[]);
        photo.title = Some("A".to_string());
        let snapshot = TagSnapshot {
            xmp_title: Some(TagValue::from("B")),
            ..Default::default()
        };

        let result = merge(&photo, &snapshot, &MergeOptions::default());
        assert_eq!(result.title.as_deref(), Some("A"));
        assert!(result.changes.title);
    }

    #[test]
    fn test_empty_title_and_description_are_omitted() {
        let mut photo = record(&[], &[]);
        photo.title = Some(String::new());
        photo.description = Some(String::new());
        let snapshot = TagSnapshot {
            xmp_title: Some(TagValue::from("Kept")),
            ..Default::default()
        };

        let result = merge(&photo, &snapshot, &MergeOptions::default());
        assert!(result.title.is_none());
        assert!(result.description.is_none());
        assert!(!result.changes.any());
    }

    #[test]
    fn test_description_needs_both_fields() {
        let mut photo = record(&[], &[]);
        photo.description = Some("Lake".to_string());

        let partial = TagSnapshot {
            exif_image_description: Some(TagValue::from("Lake")),
            ..Default::default()
        };
        assert!(merge(&photo, &partial, &MergeOptions::default()).changes.description);

        let complete = TagSnapshot {
            exif_image_description: Some(TagValue::from("Lake")),
            xmp_description: Some(TagValue::from("Lake")),
            ..Default::default()
        };
        assert!(!merge(&photo, &complete, &MergeOptions::default()).changes.description);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut photo = record(&["dog", "park"], &["Ann", "_UNKNOWN_"]);
        photo.title = Some("Walk".to_string());
        photo.description = Some("Sunday walk".to_string());
        let first_snapshot = TagSnapshot {
            xmp_tags_list: Some(["dog", "cat"].into_iter().collect()),
            xmp_person_in_image: Some(TagValue::from("Bob")),
            xmp_title: Some(TagValue::from("Old")),
            ..Default::default()
        };
        let options = MergeOptions::default();

        let first = merge(&photo, &first_snapshot, &options);
        assert!(first.changes.any());

        // What the file looks like after the first write succeeded.
        let written = TagSnapshot {
            iptc_keywords: Some(first.keywords.iter().cloned().collect()),
            xmp_tags_list: Some(first.keywords.iter().cloned().collect()),
            xmp_person_in_image: Some(first.persons.iter().cloned().collect()),
            xmp_title: first.title.as_deref().map(TagValue::from),
            exif_image_description: first.description.as_deref().map(TagValue::from),
            xmp_description: first.description.as_deref().map(TagValue::from),
            ..Default::default()
        };

        let second = merge(&photo, &written, &options);
        assert_eq!(second.keywords, first.keywords);
        assert_eq!(second.persons, first.persons);
        assert_eq!(second.title, first.title);
        assert_eq!(second.description, first.description);
        assert!(!second.changes.any());
    }

    #[test]
    fn test_case_sensitive_dedup() {
        let snapshot = TagSnapshot {
            iptc_keywords: Some(["Dog"].into_iter().collect()),
            ..Default::default()
        };
        let result = merge(&record(&["dog"], &[]), &snapshot, &MergeOptions::default());
        assert_eq!(result.keywords, set(&["Dog", "dog"]));
    }

    #[test]
    fn test_numeric_keywords_read_back_unchanged() {
        let photo = record(&["1.50", "007", "2019"], &[]);
        let written = crate::metadata::parse_exiftool_json(
            br#"[{"IPTC:Keywords": [1.50, "007", 2019], "XMP:TagsList": [1.50, "007", 2019]}]"#,
        )
        .unwrap();

        let result = merge(&photo, &written, &MergeOptions::default());
        assert_eq!(result.keywords, set(&["007", "1.50", "2019"]));
        assert!(!result.changes.any());
    }
}
