pub mod directives;
pub mod merge;
pub mod snapshot;

pub use directives::{synthesize, Tag, WriteDirective, WritePlan};
pub use merge::{merge, Changes, MergeOptions, MergeResult};
pub use snapshot::{parse_exiftool_json, TagSnapshot, TagValue};
