use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{debug, info};

use photometa::cli::{Cli, ListKind};
use photometa::config::Config;
use photometa::exiftool::{ExifTool, ExifToolLocator};
use photometa::export::check_export_dir;
use photometa::library::{Library, NameCount};
use photometa::logging;
use photometa::runner::{missing_photos, Runner};
use photometa::xattr::XattrStore;

const RULE_WIDTH: usize = 60;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    logging::init(&config.logging.dir, cli.verbose)?;
    debug!("{:?}", cli);

    if let Some(dest) = &cli.export {
        check_export_dir(dest)?;
    }

    let Some(library_path) = cli.library_path(&config) else {
        bail!("No library database given: use --database, PHOTOMETA_LIBRARY or library_path in the config");
    };

    let library = Library::open(&library_path)?;
    if cli.report_only() {
        if !cli.list.is_empty() {
            return print_lists(&library, &cli.list);
        }
        let photos = library.photos(&cli.selection())?;
        for photo in missing_photos(&photos) {
            println!("{} {}", photo.uuid, photo.filename);
        }
        return Ok(());
    }
    let photos = library.photos(&cli.selection())?;

    let tool = ExifTool::new(ExifToolLocator::new(config.exiftool.path.clone()));
    let program = tool.program().context("Could not find exiftool on PATH")?;
    info!("Using exiftool at {}", program.display());

    if photos.is_empty() {
        println!("No photos found to process");
        return Ok(());
    }

    if cli.needs_confirmation() && !confirm(&library_path)? {
        info!("Aborted");
        return Ok(());
    }
    info!("Processing {} photo(s)", photos.len());

    let progress = if cli.noprogress {
        ProgressBar::hidden()
    } else {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-");
        ProgressBar::new(photos.len() as u64).with_style(style)
    };

    let attributes = XattrStore::new(config.xattr.attribute.clone());
    let mut runner =
        Runner::new(&tool, &attributes, cli.run_options(&config)).with_progress(progress.clone());
    let result = runner.run(&photos);
    progress.finish_and_clear();

    let stats = runner.stats();
    info!(
        "Done: {} processed, {} updated, {} unchanged, {} skipped as missing",
        stats.processed, stats.updated, stats.unchanged, stats.skipped_missing
    );
    result?;
    Ok(())
}

fn confirm(library: &Path) -> Result<bool> {
    print!(
        "photometa will modify files referenced by {}. Continue? [y/N] ",
        library.display()
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn print_lists(library: &Library, kinds: &[ListKind]) -> Result<()> {
    for kind in kinds {
        let (title, counts) = match kind {
            ListKind::Keyword => ("Keywords", library.keyword_counts()?),
            ListKind::Album => ("Albums", library.album_counts()?),
            ListKind::Person => ("Persons", library.person_counts()?),
        };
        print_counts(title, &counts);
    }
    Ok(())
}

fn print_counts(title: &str, counts: &[NameCount]) {
    println!("{}", "-".repeat(RULE_WIDTH));
    println!("{} ({}):", title, counts.len());
    for NameCount { name, count } in counts {
        println!("  {:<48} {:>8}", name, count);
    }
}
