//! Command line arguments.

use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::export::ExportOptions;
use crate::library::Selection;
use crate::metadata::MergeOptions;
use crate::runner::RunOptions;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "photometa",
    version,
    about = "Write keywords, people, titles and descriptions from a photo library into the image files",
    group(
        ArgGroup::new("selection")
            .required(true)
            .multiple(true)
            .args(["all", "album", "keyword", "person", "uuid", "list"])
    )
)]
pub struct Cli {
    /// Library database. Falls back to `library_path` in the config file.
    #[arg(long, value_name = "PATH", env = "PHOTOMETA_LIBRARY")]
    pub database: Option<PathBuf>,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Process every photo in the library.
    #[arg(long)]
    pub all: bool,

    /// Process photos in album ALBUM. Repeatable.
    #[arg(long, value_name = "ALBUM")]
    pub album: Vec<String>,

    /// Process photos with keyword KEYWORD. Repeatable.
    #[arg(long, value_name = "KEYWORD")]
    pub keyword: Vec<String>,

    /// Process photos showing person PERSON. Repeatable.
    #[arg(long, value_name = "PERSON")]
    pub person: Vec<String>,

    /// Process the photo with this UUID. Repeatable.
    #[arg(long, value_name = "UUID")]
    pub uuid: Vec<String>,

    /// Dry run: show what would be written, change nothing.
    #[arg(long)]
    pub test: bool,

    /// Overwrite the originals without keeping `_original` backups.
    #[arg(long)]
    pub inplace: bool,

    /// Export photos to DIR and tag the copies instead of the originals.
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Sort exported photos into DIR/YYYY/MM/DD folders.
    #[arg(long, requires = "export")]
    pub export_by_date: bool,

    /// Also tag (and export) the edited version of each photo.
    #[arg(long)]
    pub edited: bool,

    /// Name exported photos after the file as originally imported.
    #[arg(long, requires = "export")]
    pub original_name: bool,

    /// Add album names as keywords.
    #[arg(long)]
    pub albums_as_keywords: bool,

    /// Also store keywords in the file's extended attributes.
    #[arg(long)]
    pub xattrtag: bool,

    /// Also store person names in the file's extended attributes.
    #[arg(long)]
    pub xattrperson: bool,

    /// List selected photos missing from disk and exit.
    #[arg(long)]
    pub showmissing: bool,

    /// Do not ask for confirmation before writing.
    #[arg(long)]
    pub force: bool,

    /// Hide the progress bar.
    #[arg(long)]
    pub noprogress: bool,

    /// Debug output.
    #[arg(short, long)]
    pub verbose: bool,

    /// List keywords, albums or persons with photo counts and exit.
    #[arg(long, value_enum, value_name = "KIND")]
    pub list: Vec<ListKind>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Keyword,
    Album,
    Person,
}

impl Cli {
    pub fn selection(&self) -> Selection {
        Selection {
            all: self.all,
            albums: self.album.clone(),
            uuids: self.uuid.clone(),
            keywords: self.keyword.clone(),
            persons: self.person.clone(),
        }
    }

    /// `--list` and `--showmissing` only read the library; exiftool is not
    /// needed and nothing is written.
    pub fn report_only(&self) -> bool {
        self.showmissing || !self.list.is_empty()
    }

    /// Whether anything would be written, so the user should confirm first.
    pub fn needs_confirmation(&self) -> bool {
        !(self.force || self.test || self.report_only())
    }

    /// Library database from the command line, else from the config.
    pub fn library_path(&self, config: &Config) -> Option<PathBuf> {
        self.database
            .clone()
            .or_else(|| config.library_path.clone())
    }

    pub fn run_options(&self, config: &Config) -> RunOptions {
        RunOptions {
            dry_run: self.test,
            inplace: self.inplace,
            export: self.export.as_ref().map(|dest| ExportOptions {
                dest: dest.clone(),
                by_date: self.export_by_date,
                original_name: self.original_name,
            }),
            edited: self.edited,
            merge: MergeOptions {
                albums_as_keywords: self.albums_as_keywords || config.metadata.albums_as_keywords,
                unknown_person: config.metadata.unknown_person.clone(),
            },
            xattr_tags: self.xattrtag,
            xattr_persons: self.xattrperson,
        }
    }
}
