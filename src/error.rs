use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or validating a folder's `description.yaml`
#[derive(Error, Debug)]
pub enum DescriptionError {
    #[error("Description file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read description file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in description file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Description with type 'rss' must contain a non-empty 'feed_url'")]
    MissingFeedUrl,

    #[error("'min_duration' must be a positive number, got {0}")]
    InvalidMinDuration(f64),
}

/// Errors that can occur when fetching an RSS feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch feed from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors that can occur while streaming an episode to disk
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed for {url}: {source}")]
    HttpFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to create file {path}: {source}")]
    FileCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream error while downloading {url}: {source}")]
    StreamFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors organizing files into the numbered output tree
#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("Folder name '{0}' does not start with a two-digit prefix")]
    InvalidFolderPrefix(String),

    #[error("Too many MP3 files ({0}). Maximum is 255.")]
    TooManyFiles(usize),

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
