use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted while processing folders, for progress reporting
#[derive(Debug, Clone)]
pub enum Event {
    /// Feed is being fetched from URL
    FetchingFeed { url: String },

    /// Feed has been parsed; `episodes` counts entries with a usable audio URL
    FeedParsed { entries: usize, episodes: usize },

    /// Feed could not be fetched; the folder continues with local files only
    FeedUnavailable { url: String, error: String },

    /// Feed bytes arrived but could not be parsed as RSS
    FeedParseFailed { url: String, error: String },

    /// A download is starting
    DownloadStarted {
        number: u32,
        episode_title: String,
        url: String,
        /// Expected content length in bytes, if known
        content_length: Option<u64>,
    },

    /// Download progress update
    DownloadProgress {
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// Episode downloaded, long enough, and recorded in the state store
    DownloadCommitted {
        path: PathBuf,
        bytes_downloaded: u64,
        duration_secs: f64,
    },

    /// Episode downloaded but shorter than the minimum; file deleted, URL rejected
    DownloadRejected {
        episode_title: String,
        duration_secs: f64,
        min_duration: f64,
    },

    /// A download failed; the episode will be reconsidered next run
    DownloadFailed { episode_title: String, error: String },

    /// Destination file already exists; download skipped
    DestinationExists { path: PathBuf },

    /// No free track number at or below 999 for this episode
    TrackNumbersExhausted { episode_title: String },

    /// Duration could not be read from a file
    DurationUnknown { path: PathBuf },

    /// A local file was shorter than the minimum duration and was deleted
    ShortFileRemoved { path: PathBuf, duration_secs: f64 },

    /// One of the per-folder state files could not be read
    StateReadFailed { path: PathBuf, error: String },

    /// Appending to one of the per-folder state files failed;
    /// in-memory state still advanced
    StateWriteFailed { path: PathBuf, error: String },

    /// A line in the URL mapping file could not be parsed and was skipped
    MappingLineSkipped { path: PathBuf, line: String },

    /// Feed processing for one folder finished
    FeedProcessed {
        downloaded: usize,
        already_present: usize,
        rejected_skipped: usize,
        failed: usize,
    },

    /// Copying into the output tree is starting
    OrganizeStarted { folder: String, total: usize },

    /// One file was copied into the output tree
    FileCopied {
        source: PathBuf,
        dest: PathBuf,
        index: usize,
        total: usize,
        bytes: u64,
    },
}

/// Trait for reporting events during folder processing.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait Reporter: Send + Sync {
    fn report(&self, event: Event);
}

/// A shared reference to a reporter
pub type SharedReporter = Arc<dyn Reporter>;

/// A no-op reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _event: Event) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedReporter {
        Arc::new(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Reporter that collects events for assertions
    pub struct CollectingReporter {
        pub events: Mutex<Vec<Event>>,
    }

    impl Reporter for CollectingReporter {
        fn report(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn noop_reporter_handles_events() {
        let reporter = NoopReporter;

        reporter.report(Event::FetchingFeed {
            url: "https://example.com/feed.xml".to_string(),
        });
        reporter.report(Event::FeedParsed {
            entries: 10,
            episodes: 8,
        });
        reporter.report(Event::DownloadRejected {
            episode_title: "Teaser".to_string(),
            duration_secs: 30.0,
            min_duration: 60.0,
        });
    }

    #[test]
    fn collecting_reporter_records_events() {
        let reporter = CollectingReporter {
            events: Mutex::new(Vec::new()),
        };

        reporter.report(Event::TrackNumbersExhausted {
            episode_title: "Episode 1000".to_string(),
        });

        let events = reporter.events.lock().unwrap();
        assert_eq!(events.len(), 1);
    }
}
