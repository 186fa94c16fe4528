pub mod album;
pub mod config;
pub mod description;
pub mod episode;
pub mod error;
pub mod feed;
pub mod files;
pub mod http;
pub mod organize;
pub mod podcast;
pub mod probe;
pub mod progress;
pub mod reconcile;
pub mod state;

// Re-export main types for convenience
pub use album::process_static_album;
pub use config::Config;
pub use description::{load_description, ContentKind, Description, DEFAULT_MIN_DURATION_SECS};
pub use error::{DescriptionError, DownloadError, FeedError, OrganizeError};
pub use feed::{fetch_feed, Episode};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use organize::{organize_files, MAX_TRACKS_PER_FOLDER};
pub use podcast::{get_local_files, process_podcast, PodcastOptions};
pub use probe::{DurationProber, LoftyProber};
pub use progress::{Event, NoopReporter, Reporter, SharedReporter};
pub use reconcile::{plan_downloads, Assignment, Plan, MAX_TRACK_NUMBER};
pub use state::StateStore;
