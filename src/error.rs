//! Errors that abort a metadata run.
//!
//! Every variant is fatal: the runner stops at the first one and the
//! process exits non-zero. Photos the library flags as missing are not
//! errors and never produce one of these.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("{} does not appear to be a valid file", .0.display())]
    InvalidPath(PathBuf),

    #[error("command `{command}` failed ({status}): {stderr}")]
    ExternalTool {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("export path {} must be an existing directory", .0.display())]
    ExportPath(PathBuf),

    #[error("could not find exiftool; install it from https://exiftool.org or set [exiftool] path in the config")]
    ToolNotFound,

    #[error("unexpected output from `{command}`: {source}")]
    MalformedOutput {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to update extended attributes on {}: {source}", path.display())]
    Xattr {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetaError>;

/// Render a command line the way a user would type it, for error messages.
pub fn display_command(program: &std::path::Path, args: &[String]) -> String {
    let mut parts = vec![program.display().to_string()];
    for arg in args {
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            parts.push(format!("'{}'", arg));
        } else {
            parts.push(arg.clone());
        }
    }
    parts.join(" ")
}
