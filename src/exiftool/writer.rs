use std::path::Path;
use tracing::debug;

use crate::error::{MetaError, Result};
use crate::metadata::WriteDirective;

/// Apply `directives` to one file in a single exiftool run, path last.
/// An empty directive list does nothing.
pub fn write_tags(program: &Path, path: &Path, directives: &[WriteDirective]) -> Result<()> {
    if directives.is_empty() {
        return Ok(());
    }
    if !path.is_file() {
        return Err(MetaError::InvalidPath(path.to_path_buf()));
    }

    let args: Vec<String> = directives.iter().map(WriteDirective::to_arg).collect();
    let stdout = super::run(program, &args, path)?;
    debug!("{}", String::from_utf8_lossy(&stdout).trim());
    Ok(())
}
