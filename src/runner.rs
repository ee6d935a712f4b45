//! Sequential driver: read tags, merge, synthesize, write, one photo at a
//! time. Any error stops the run; missing photos are only counted.

use indicatif::ProgressBar;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{display_command, Result};
use crate::exiftool::TagTool;
use crate::export::{self, ExportOptions};
use crate::library::PhotoRecord;
use crate::metadata::{merge, synthesize, MergeOptions, MergeResult, WritePlan};
use crate::xattr::AttributeStore;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Compute everything, write nothing.
    pub dry_run: bool,
    /// Let exiftool overwrite originals without keeping a backup.
    pub inplace: bool,
    pub export: Option<ExportOptions>,
    /// Also tag (and export) the edited derivative.
    pub edited: bool,
    pub merge: MergeOptions,
    pub xattr_tags: bool,
    pub xattr_persons: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped_missing: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Missing,
    Unchanged,
    /// One plan per target that needed writing.
    Updated(Vec<WritePlan>),
}

pub struct Runner<'a> {
    tool: &'a dyn TagTool,
    attributes: &'a dyn AttributeStore,
    options: RunOptions,
    progress: ProgressBar,
    stats: RunStats,
}

impl<'a> Runner<'a> {
    pub fn new(tool: &'a dyn TagTool, attributes: &'a dyn AttributeStore, options: RunOptions) -> Self {
        Self {
            tool,
            attributes,
            options,
            progress: ProgressBar::hidden(),
            stats: RunStats::default(),
        }
    }

    /// Report progress on `progress`. Per-photo messages are printed above it.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn run(&mut self, records: &[PhotoRecord]) -> Result<RunStats> {
        for record in records {
            self.progress.set_message(record.filename.clone());
            debug!("processing photo: {} {:?}", record.filename, record.path);
            self.process(record)?;
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();
        Ok(self.stats)
    }

    /// Process one photo. The original and the edited derivative are each
    /// read, merged and written on their own, so either can be behind the
    /// other.
    pub fn process(&mut self, record: &PhotoRecord) -> Result<Outcome> {
        let Some(source) = self.local_original(record) else {
            self.stats.skipped_missing += 1;
            return Ok(Outcome::Missing);
        };

        let edited_source = if self.options.edited {
            record.edited().map(PathBuf::as_path).filter(|p| p.is_file())
        } else {
            None
        };

        let (primary, edited, is_export) = match &self.options.export {
            Some(export_options) if !self.options.dry_run => {
                let exported =
                    export::export_photo(record, source, edited_source, export_options)?;
                (exported.primary, exported.edited, true)
            }
            Some(export_options) => {
                self.progress.suspend(|| {
                    info!("TEST: would export {} to {}", source.display(), export_options.dest.display())
                });
                (source.to_path_buf(), edited_source.map(Path::to_path_buf), true)
            }
            None => (source.to_path_buf(), edited_source.map(Path::to_path_buf), false),
        };

        let mut targets: Vec<&Path> = vec![primary.as_path()];
        if let Some(edited) = &edited {
            targets.push(edited.as_path());
        }

        let mut plans = Vec::new();
        for target in targets {
            let snapshot = self.tool.read_tags(target)?;
            debug!("existing tags for {}: {:?}", target.display(), snapshot);

            let result = merge(record, &snapshot, &self.options.merge);
            let plan = synthesize(&result, &[target], self.options.inplace, is_export);
            if plan.is_empty() {
                debug!("Skipping {}, nothing to do", target.display());
            } else {
                self.write(target, &plan)?;
                plans.push(plan);
            }
            self.mirror_attributes(target, &result)?;
        }

        self.stats.processed += 1;
        if plans.is_empty() {
            self.stats.unchanged += 1;
            Ok(Outcome::Unchanged)
        } else {
            self.progress.suspend(|| info!("Updated {}", record.filename));
            self.stats.updated += 1;
            Ok(Outcome::Updated(plans))
        }
    }

    fn write(&self, target: &Path, plan: &WritePlan) -> Result<()> {
        if self.options.dry_run {
            let mut args = plan.args();
            args.push(target.display().to_string());
            self.progress
                .suspend(|| info!("TEST: {}", display_command(Path::new("exiftool"), &args)));
            Ok(())
        } else {
            self.tool.write_tags(target, &plan.directives)
        }
    }

    fn mirror_attributes(&self, target: &Path, result: &MergeResult) -> Result<()> {
        let mut tags = BTreeSet::new();
        if self.options.xattr_tags {
            tags.extend(result.keywords.iter().cloned());
        }
        if self.options.xattr_persons {
            tags.extend(result.persons.iter().cloned());
        }
        if tags.is_empty() {
            return Ok(());
        }

        if self.options.dry_run {
            self.progress.suspend(|| {
                info!("TEST: would add {:?} to extended attributes of {}", tags, target.display())
            });
            Ok(())
        } else {
            self.attributes.append_tags(target, &tags)
        }
    }

    /// The original file, if it is actually on disk.
    fn local_original<'r>(&self, record: &'r PhotoRecord) -> Option<&'r Path> {
        if record.missing {
            self.progress.suspend(|| {
                warn!(
                    "Skipping missing photo '{}' (not downloaded from the library store)",
                    record.filename
                )
            });
            return None;
        }
        match record.path.as_deref() {
            Some(path) if path.is_file() => Some(path),
            path => {
                self.progress.suspend(|| {
                    warn!(
                        "File {:?} is missing but the library does not flag it, skipping '{}'",
                        path, record.filename
                    )
                });
                None
            }
        }
    }
}

/// Photos the library flags as missing, for `--showmissing`.
pub fn missing_photos(records: &[PhotoRecord]) -> impl Iterator<Item = &PhotoRecord> {
    records.iter().filter(|r| r.missing)
}
