mod download;
mod filename;

pub use download::{download_episode, fetch_and_commit, EpisodeOutcome};
pub use filename::destination_filename;
