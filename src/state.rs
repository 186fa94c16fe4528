use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::progress::{Event, SharedReporter};

/// Per-folder tracking file for successfully downloaded episode URLs
pub const DOWNLOADED_FILE: &str = ".downloaded_files";
/// Per-folder tracking file for URLs rejected as too short
pub const REJECTED_FILE: &str = ".rejected_files";
/// Per-folder tracking file mapping episode URLs to assigned track numbers
pub const MAPPING_FILE: &str = ".url_mapping";

/// Persistent per-podcast-folder download state.
///
/// Three newline-delimited text files back the in-memory sets. Every
/// `record_*` call appends to disk before returning; a failed append is
/// reported as a warning and the in-memory state advances anyway, so the
/// current run stays consistent even if a future run re-processes the
/// episode.
pub struct StateStore {
    downloaded_path: PathBuf,
    rejected_path: PathBuf,
    mapping_path: PathBuf,
    downloaded: HashSet<String>,
    rejected: HashSet<String>,
    mapping: HashMap<String, u32>,
}

impl StateStore {
    /// Load state from a podcast folder. Missing files mean empty state;
    /// unreadable files are reported and treated as empty.
    pub fn load(folder: &Path, reporter: &SharedReporter) -> Self {
        let downloaded_path = folder.join(DOWNLOADED_FILE);
        let rejected_path = folder.join(REJECTED_FILE);
        let mapping_path = folder.join(MAPPING_FILE);

        let downloaded = read_url_set(&downloaded_path, reporter);
        let rejected = read_url_set(&rejected_path, reporter);
        let mapping = read_mapping(&mapping_path, reporter);

        Self {
            downloaded_path,
            rejected_path,
            mapping_path,
            downloaded,
            rejected,
            mapping,
        }
    }

    pub fn downloaded(&self) -> &HashSet<String> {
        &self.downloaded
    }

    pub fn rejected(&self) -> &HashSet<String> {
        &self.rejected
    }

    pub fn mapping(&self) -> &HashMap<String, u32> {
        &self.mapping
    }

    /// Record a URL as successfully downloaded and accepted
    pub fn record_downloaded(&mut self, url: &str, reporter: &SharedReporter) {
        append_line(&self.downloaded_path, url, reporter);
        self.downloaded.insert(url.to_string());
    }

    /// Record a URL as permanently rejected (too short)
    pub fn record_rejected(&mut self, url: &str, reporter: &SharedReporter) {
        append_line(&self.rejected_path, url, reporter);
        self.rejected.insert(url.to_string());
    }

    /// Record the track number assigned to a URL
    pub fn record_mapping(&mut self, url: &str, number: u32, reporter: &SharedReporter) {
        append_line(&self.mapping_path, &format!("{url}|{number}"), reporter);
        self.mapping.insert(url.to_string(), number);
    }
}

fn read_lines(path: &Path, reporter: &SharedReporter) -> Vec<String> {
    if !path.exists() {
        return Vec::new();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
        Err(e) => {
            reporter.report(Event::StateReadFailed {
                path: path.to_path_buf(),
                error: e.to_string(),
            });
            Vec::new()
        }
    }
}

fn read_url_set(path: &Path, reporter: &SharedReporter) -> HashSet<String> {
    read_lines(path, reporter).into_iter().collect()
}

fn read_mapping(path: &Path, reporter: &SharedReporter) -> HashMap<String, u32> {
    let mut mapping = HashMap::new();

    // The file is an append-only log: a URL recorded twice keeps its
    // latest number.
    for line in read_lines(path, reporter) {
        // Split on the last '|' in case the URL itself contains one
        let parsed = line
            .rsplit_once('|')
            .and_then(|(url, num)| num.parse::<u32>().ok().map(|n| (url, n)));

        match parsed {
            Some((url, number)) => {
                mapping.insert(url.to_string(), number);
            }
            None => {
                reporter.report(Event::MappingLineSkipped {
                    path: path.to_path_buf(),
                    line,
                });
            }
        }
    }

    mapping
}

fn append_line(path: &Path, line: &str, reporter: &SharedReporter) {
    let result = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| writeln!(file, "{line}"));

    if let Err(e) = result {
        reporter.report(Event::StateWriteFailed {
            path: path.to_path_buf(),
            error: e.to_string(),
        });
    }
}
