use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};

use tonbox::files::{format_file_size, two_digit_prefix};
use tonbox::{
    load_description, organize_files, process_podcast, process_static_album, Config, ContentKind,
    Event, LoftyProber, NoopReporter, PodcastOptions, Reporter, ReqwestClient, SharedReporter,
};

// Emoji with fallback for terminals without Unicode support
static NOTES: Emoji<'_, '_> = Emoji("🎵 ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");

/// Organize albums and RSS podcasts into numbered folders for
/// Tonuino-style audio players
#[derive(Parser, Debug)]
#[command(name = "tonbox")]
#[command(about = "Organize albums and RSS podcasts into numbered folders")]
#[command(version)]
struct Args {
    /// Input directory with two-digit-prefixed album/podcast folders
    #[arg(short, long)]
    input: Option<String>,

    /// Output directory for the numbered device tree
    #[arg(short, long)]
    output: Option<String>,

    /// Update RSS feeds and download new episodes
    #[arg(short, long)]
    update: bool,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Terminal reporter rendering events with indicatif progress bars
struct ConsoleReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start_bar(&self, bar: ProgressBar) {
        let mut slot = self.bar.lock().unwrap();
        if let Some(old) = slot.take() {
            old.finish_and_clear();
        }
        *slot = Some(bar);
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            f(bar);
        }
    }

    fn clear_bar(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let truncated: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: Event) {
        match event {
            Event::FetchingFeed { url } => {
                println!("{SEARCH}Fetching feed: {}", url.cyan());
            }

            Event::FeedParsed { entries, episodes } => {
                println!(
                    "  Found {} episode(s) in {} feed entries",
                    episodes.to_string().cyan(),
                    entries.to_string().cyan()
                );
            }

            Event::FeedUnavailable { url, error } => {
                println!(
                    "{WARNING}{} {} - {}",
                    "Feed unavailable:".yellow(),
                    url.yellow(),
                    error.dimmed()
                );
            }

            Event::FeedParseFailed { url, error } => {
                println!(
                    "{WARNING}{} {} - {}",
                    "Feed could not be parsed:".yellow(),
                    url.yellow(),
                    error.dimmed()
                );
            }

            Event::DownloadStarted {
                number,
                episode_title,
                content_length,
                ..
            } => {
                let style = ProgressStyle::default_bar()
                    .template("  [{bar:30.cyan/blue}] {bytes}/{total_bytes} {wide_msg}")
                    .unwrap()
                    .progress_chars("█▓░");
                let bar = ProgressBar::new(content_length.unwrap_or(0));
                bar.set_style(style);
                bar.set_message(format!(
                    "{:03} {}",
                    number,
                    truncate_title(&episode_title, 40)
                ));
                self.start_bar(bar);
            }

            Event::DownloadProgress {
                bytes_downloaded,
                total_bytes,
            } => {
                self.with_bar(|bar| {
                    if let Some(total) = total_bytes {
                        bar.set_length(total);
                    }
                    bar.set_position(bytes_downloaded);
                });
            }

            Event::DownloadCommitted {
                path,
                bytes_downloaded,
                duration_secs,
            } => {
                self.clear_bar();
                let name = path.file_name().unwrap_or_default().to_string_lossy();
                let detail = if duration_secs > 0.0 {
                    format!("{}, {duration_secs:.1}s", format_file_size(bytes_downloaded))
                } else {
                    format_file_size(bytes_downloaded)
                };
                println!("  {SUCCESS}{} ({})", name.green(), detail.dimmed());
            }

            Event::DownloadRejected {
                episode_title,
                duration_secs,
                min_duration,
            } => {
                self.clear_bar();
                println!(
                    "  {WARNING}{} {} ({duration_secs:.1}s < {min_duration:.1}s)",
                    "Too short, discarding:".yellow(),
                    truncate_title(&episode_title, 40).yellow()
                );
            }

            Event::DownloadFailed {
                episode_title,
                error,
            } => {
                self.clear_bar();
                println!(
                    "  {FAILURE}{} - {}",
                    truncate_title(&episode_title, 40).red(),
                    error.red()
                );
            }

            Event::DestinationExists { path } => {
                println!(
                    "  {WARNING}{} {}",
                    "Destination already exists, skipping:".yellow(),
                    path.display().to_string().yellow()
                );
            }

            Event::TrackNumbersExhausted { episode_title } => {
                println!(
                    "  {WARNING}{} {}",
                    "No free track number for:".yellow(),
                    truncate_title(&episode_title, 40).yellow()
                );
            }

            Event::DurationUnknown { path } => {
                println!(
                    "  {}",
                    format!("Could not read duration of {}", path.display()).dimmed()
                );
            }

            Event::ShortFileRemoved {
                path,
                duration_secs,
            } => {
                println!(
                    "  {WARNING}{} {} ({duration_secs:.1}s)",
                    "Removed too-short file:".yellow(),
                    path.display().to_string().yellow()
                );
            }

            Event::StateReadFailed { path, error } => {
                println!(
                    "  {WARNING}{} {} - {}",
                    "Could not read state file:".yellow(),
                    path.display().to_string().yellow(),
                    error.dimmed()
                );
            }

            Event::StateWriteFailed { path, error } => {
                println!(
                    "  {WARNING}{} {} - {}",
                    "Could not update state file:".yellow(),
                    path.display().to_string().yellow(),
                    error.dimmed()
                );
            }

            Event::MappingLineSkipped { path, line } => {
                println!(
                    "  {WARNING}{} {} - {}",
                    "Skipped malformed mapping line in".yellow(),
                    path.display().to_string().yellow(),
                    line.dimmed()
                );
            }

            Event::FeedProcessed {
                downloaded,
                already_present,
                rejected_skipped,
                failed,
            } => {
                self.clear_bar();
                println!(
                    "  {} {} new, {} present, {} rejected, {} failed",
                    "Feed done:".bold(),
                    downloaded.to_string().green(),
                    already_present.to_string().cyan(),
                    rejected_skipped.to_string().yellow(),
                    if failed > 0 {
                        failed.to_string().red().bold()
                    } else {
                        failed.to_string().green()
                    }
                );
            }

            Event::OrganizeStarted { folder, total } => {
                let style = ProgressStyle::default_bar()
                    .template("  [{bar:30.green/blue}] {pos}/{len} {wide_msg}")
                    .unwrap()
                    .progress_chars("█▓░");
                let bar = ProgressBar::new(total as u64);
                bar.set_style(style);
                bar.set_message(format!("Organizing {folder}"));
                self.start_bar(bar);
            }

            Event::FileCopied { index, total, .. } => {
                self.with_bar(|bar| bar.set_position(index as u64));
                if index == total {
                    self.clear_bar();
                }
            }
        }
    }
}

/// Find input subfolders whose names carry the two-digit device prefix
fn find_content_folders(input_path: &std::path::Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(input_path) else {
        return Vec::new();
    };

    let mut folders: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(two_digit_prefix)
                .is_some()
        })
        .collect();

    folders.sort();
    folders
}

#[derive(Default)]
struct RunStats {
    processed: usize,
    files_copied: usize,
    errors: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::new(args.input.as_deref(), args.output.as_deref());
    config
        .ensure_directories()
        .context("Failed to create input/output directories")?;

    if !args.quiet {
        println!("\n{NOTES}{}\n", "tonbox".bold().magenta());
        println!("Input:  {}", config.input_path.display());
        println!("Output: {}", config.output_path.display());
        if args.update {
            println!(
                "{}",
                "Update mode: RSS feeds will be checked for new episodes".yellow()
            );
        }
        println!();
    }

    let reporter: SharedReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(ConsoleReporter::new())
    };

    let client = ReqwestClient::new();
    let prober = LoftyProber::new();

    let folders = find_content_folders(&config.input_path);
    if folders.is_empty() {
        if !args.quiet {
            println!(
                "{}",
                "No valid folders found (names must start with two digits, e.g. 01_Album)"
                    .yellow()
            );
        }
        return Ok(());
    }

    if !args.quiet {
        println!("Found {} folder(s)\n", folders.len());
    }

    let mut stats = RunStats::default();

    for folder in &folders {
        let folder_name = folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let description = match load_description(folder) {
            Ok(description) => description,
            Err(e) => {
                println!(
                    "{FAILURE}{} {} - {}",
                    "Skipping".red(),
                    folder_name.bold(),
                    e.to_string().red()
                );
                stats.errors += 1;
                continue;
            }
        };

        if !args.quiet {
            println!(
                "{FOLDER}{} {}",
                folder_name.bold(),
                format!("({})", description.kind).dimmed()
            );
        }

        let mp3_files = match description.kind {
            ContentKind::Static => process_static_album(folder),
            ContentKind::Rss => {
                // feed_url presence is validated by load_description
                let feed_url = description.feed_url.clone().unwrap_or_default();
                let options = PodcastOptions {
                    update: args.update,
                    min_duration: description.min_duration(),
                };
                process_podcast(&client, &prober, folder, &feed_url, &options, &reporter).await
            }
        };

        if mp3_files.is_empty() {
            if !args.quiet {
                println!("  {}\n", "No MP3 files to organize".yellow());
            }
            continue;
        }

        match organize_files(&mp3_files, &folder_name, &config.output_path, &reporter) {
            Ok(copied) => {
                stats.files_copied += copied.len();
                stats.processed += 1;
                if !args.quiet {
                    println!(
                        "  {SUCCESS}{} file(s) organized into {}\n",
                        copied.len().to_string().green(),
                        config
                            .output_path
                            .join(two_digit_prefix(&folder_name).unwrap_or_default())
                            .display()
                    );
                }
            }
            Err(e) => {
                println!(
                    "  {FAILURE}{} {} - {}\n",
                    "Failed to organize".red(),
                    folder_name.bold(),
                    e.to_string().red()
                );
                stats.errors += 1;
            }
        }
    }

    if !args.quiet {
        println!(
            "{} {} folder(s) processed, {} file(s) copied{}",
            "Summary:".bold(),
            stats.processed.to_string().green(),
            stats.files_copied.to_string().green(),
            if stats.errors > 0 {
                format!(", {} error(s)", stats.errors.to_string().red().bold())
            } else {
                String::new()
            }
        );
    }

    if stats.errors > 0 && stats.processed == 0 {
        std::process::exit(1);
    }

    Ok(())
}
