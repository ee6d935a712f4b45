//! Turn a merge result into exiftool write arguments.

use std::path::{Path, PathBuf};

use super::merge::MergeResult;

/// Tags this tool writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    TagsList,
    Keywords,
    PersonInImage,
    Title,
    ImageDescription,
    XmpDescription,
}

impl Tag {
    pub fn name(&self) -> &'static str {
        match self {
            Tag::TagsList => "XMP:TagsList",
            Tag::Keywords => "Keywords",
            Tag::PersonInImage => "XMP:PersonInImage",
            Tag::Title => "XMP:Title",
            Tag::ImageDescription => "ImageDescription",
            Tag::XmpDescription => "XMP:Description",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WriteDirective {
    Set { tag: Tag, value: String },
    /// Write over the original without leaving a `_original` backup.
    OverwriteInPlace,
    /// Keep the file's modification time.
    PreserveTimestamps,
}

impl WriteDirective {
    fn set(tag: Tag, value: &str) -> Self {
        WriteDirective::Set {
            tag,
            value: value.to_string(),
        }
    }

    pub fn to_arg(&self) -> String {
        match self {
            WriteDirective::Set { tag, value } => format!("-{}={}", tag.name(), value),
            WriteDirective::OverwriteInPlace => "-overwrite_original_in_place".to_string(),
            WriteDirective::PreserveTimestamps => "-P".to_string(),
        }
    }
}

/// Directives plus the files they apply to, one tool run per target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritePlan {
    pub directives: Vec<WriteDirective>,
    pub targets: Vec<PathBuf>,
}

impl WritePlan {
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn args(&self) -> Vec<String> {
        self.directives.iter().map(WriteDirective::to_arg).collect()
    }
}

/// Build the write plan for `targets` (primary first, then the edited
/// derivative if it should be tagged too). A result with nothing changed
/// gives an empty plan, control flags included.
pub fn synthesize(
    result: &MergeResult,
    targets: &[&Path],
    inplace: bool,
    is_export_target: bool,
) -> WritePlan {
    let mut directives = Vec::new();

    if result.changes.keywords {
        for keyword in &result.keywords {
            directives.push(WriteDirective::set(Tag::TagsList, keyword));
            directives.push(WriteDirective::set(Tag::Keywords, keyword));
        }
    }

    if result.changes.persons {
        for person in &result.persons {
            directives.push(WriteDirective::set(Tag::PersonInImage, person));
        }
    }

    if result.changes.title {
        if let Some(title) = &result.title {
            directives.push(WriteDirective::set(Tag::Title, title));
        }
    }

    if result.changes.description {
        if let Some(description) = &result.description {
            directives.push(WriteDirective::set(Tag::ImageDescription, description));
            directives.push(WriteDirective::set(Tag::XmpDescription, description));
        }
    }

    if directives.is_empty() {
        return WritePlan::default();
    }

    // Exported copies are never the original, so they never need a backup.
    if inplace || is_export_target {
        directives.push(WriteDirective::OverwriteInPlace);
    }
    directives.push(WriteDirective::PreserveTimestamps);

    WritePlan {
        directives,
        targets: targets.iter().map(|p| p.to_path_buf()).collect(),
    }
}
