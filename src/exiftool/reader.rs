use std::path::Path;
use tracing::trace;

use crate::error::{display_command, MetaError, Result};
use crate::metadata::{parse_exiftool_json, TagSnapshot};

/// Grouped tag names (`IPTC:Keywords`), JSON, sorted.
const READ_ARGS: [&str; 3] = ["-G", "-j", "-sort"];

/// Read the embedded tags of one file.
///
/// Fails with [`MetaError::InvalidPath`] before spawning anything if `path`
/// is not an existing regular file.
pub fn read_tags(program: &Path, path: &Path) -> Result<TagSnapshot> {
    if !path.is_file() {
        return Err(MetaError::InvalidPath(path.to_path_buf()));
    }

    let args: Vec<String> = READ_ARGS.iter().map(|a| a.to_string()).collect();
    let stdout = super::run(program, &args, path)?;
    trace!("exiftool output for {:?}: {}", path, String::from_utf8_lossy(&stdout));

    parse_exiftool_json(&stdout).map_err(|source| {
        let mut shown = args.clone();
        shown.push(path.display().to_string());
        MetaError::MalformedOutput {
            command: display_command(program, &shown),
            source,
        }
    })
}
