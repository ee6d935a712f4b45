//! exiftool subprocess adapter.
//!
//! Each call is a blocking, one-shot `exiftool` run. A non-zero exit is
//! returned as [`MetaError::ExternalTool`] with the full command line.

pub mod reader;
pub mod writer;

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{display_command, MetaError, Result};
use crate::metadata::{TagSnapshot, WriteDirective};

/// Reads and writes embedded tags. Implemented by [`ExifTool`]; the runner
/// only sees this trait.
pub trait TagTool {
    fn read_tags(&self, path: &Path) -> Result<TagSnapshot>;
    fn write_tags(&self, path: &Path, directives: &[WriteDirective]) -> Result<()>;
}

/// Finds the exiftool executable once and remembers it.
#[derive(Debug, Default)]
pub struct ExifToolLocator {
    configured: Option<PathBuf>,
    resolved: OnceCell<PathBuf>,
}

impl ExifToolLocator {
    pub fn new(configured: Option<PathBuf>) -> Self {
        Self {
            configured,
            resolved: OnceCell::new(),
        }
    }

    pub fn locate(&self) -> Result<&Path> {
        if let Some(path) = self.resolved.get() {
            return Ok(path);
        }

        let path = match &self.configured {
            Some(path) if path.is_file() => path.clone(),
            Some(_) => return Err(MetaError::ToolNotFound),
            None => which::which("exiftool").map_err(|_| MetaError::ToolNotFound)?,
        };
        debug!("exiftool path = {:?}", path);

        Ok(self.resolved.get_or_init(|| path))
    }
}

pub struct ExifTool {
    locator: ExifToolLocator,
}

impl ExifTool {
    pub fn new(locator: ExifToolLocator) -> Self {
        Self { locator }
    }

    /// Resolve the executable now rather than on the first photo.
    pub fn program(&self) -> Result<&Path> {
        self.locator.locate()
    }
}

impl TagTool for ExifTool {
    fn read_tags(&self, path: &Path) -> Result<TagSnapshot> {
        reader::read_tags(self.program()?, path)
    }

    fn write_tags(&self, path: &Path, directives: &[WriteDirective]) -> Result<()> {
        writer::write_tags(self.program()?, path, directives)
    }
}

/// Run `program args... target` and return stdout.
pub(crate) fn run(program: &Path, args: &[String], target: &Path) -> Result<Vec<u8>> {
    let command = || {
        let mut shown = args.to_vec();
        shown.push(target.display().to_string());
        display_command(program, &shown)
    };
    debug!("running: {}", command());

    let output = Command::new(program)
        .args(args)
        .arg(target)
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MetaError::ToolNotFound,
            _ => MetaError::Io(e),
        })?;

    if !output.status.success() {
        return Err(MetaError::ExternalTool {
            command: command(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}
