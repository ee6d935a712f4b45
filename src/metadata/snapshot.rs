//! Embedded tags as reported by `exiftool -G -j -sort`.
//!
//! Only the tags the merge engine reads are kept; everything else in the
//! tool's output is ignored.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;

/// A single JSON value from the tool. Numeric-looking keywords such as
/// "2019" come back as unquoted numbers; `Number` keeps their exact text
/// (`1.50` stays `1.50`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// List tags with one entry are reported as a bare value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Many(Vec<Scalar>),
    One(Scalar),
}

impl TagValue {
    pub fn values(&self) -> Vec<String> {
        match self {
            TagValue::Many(items) => items.iter().map(Scalar::to_string).collect(),
            TagValue::One(item) => vec![item.to_string()],
        }
    }

    fn text(&self) -> String {
        self.values().join(", ")
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::One(Scalar::Text(value.to_string()))
    }
}

impl<S: Into<String>> FromIterator<S> for TagValue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TagValue::Many(iter.into_iter().map(|s| Scalar::Text(s.into())).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TagSnapshot {
    #[serde(rename = "IPTC:Keywords", default)]
    pub iptc_keywords: Option<TagValue>,

    #[serde(rename = "XMP:TagsList", default)]
    pub xmp_tags_list: Option<TagValue>,

    #[serde(rename = "XMP:Subject", default)]
    pub xmp_subject: Option<TagValue>,

    #[serde(rename = "XMP:PersonInImage", default)]
    pub xmp_person_in_image: Option<TagValue>,

    #[serde(rename = "XMP:Title", default)]
    pub xmp_title: Option<TagValue>,

    #[serde(rename = "EXIF:ImageDescription", default)]
    pub exif_image_description: Option<TagValue>,

    #[serde(rename = "XMP:Description", default)]
    pub xmp_description: Option<TagValue>,
}

fn set_of(tag: &Option<TagValue>) -> BTreeSet<String> {
    tag.as_ref().map(|v| v.values().into_iter().collect()).unwrap_or_default()
}

impl TagSnapshot {
    pub fn keywords(&self) -> BTreeSet<String> {
        set_of(&self.iptc_keywords)
    }

    pub fn tags_list(&self) -> BTreeSet<String> {
        set_of(&self.xmp_tags_list)
    }

    pub fn subject(&self) -> BTreeSet<String> {
        set_of(&self.xmp_subject)
    }

    pub fn persons(&self) -> BTreeSet<String> {
        set_of(&self.xmp_person_in_image)
    }

    pub fn title(&self) -> Option<String> {
        self.xmp_title.as_ref().map(TagValue::text)
    }

    pub fn image_description(&self) -> Option<String> {
        self.exif_image_description.as_ref().map(TagValue::text)
    }

    pub fn xmp_description(&self) -> Option<String> {
        self.xmp_description.as_ref().map(TagValue::text)
    }
}

/// Parse the tool's JSON: an array with one object per file read.
/// An empty array yields an empty snapshot.
pub fn parse_exiftool_json(bytes: &[u8]) -> serde_json::Result<TagSnapshot> {
    let mut files: Vec<TagSnapshot> = serde_json::from_slice(bytes)?;
    if files.is_empty() {
        Ok(TagSnapshot::default())
    } else {
        Ok(files.swap_remove(0))
    }
}
