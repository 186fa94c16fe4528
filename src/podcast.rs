use std::path::{Path, PathBuf};

use crate::episode::{fetch_and_commit, EpisodeOutcome};
use crate::feed::fetch_feed;
use crate::files::{find_mp3_files, scan_numbered_files};
use crate::http::HttpClient;
use crate::probe::DurationProber;
use crate::progress::{Event, SharedReporter};
use crate::reconcile::plan_downloads;
use crate::state::StateStore;

/// Options for processing one podcast folder
#[derive(Debug, Clone)]
pub struct PodcastOptions {
    /// Fetch the feed and download new episodes before listing
    pub update: bool,
    /// Minimum episode duration in seconds; shorter files are rejected
    pub min_duration: f64,
}

/// Process a podcast folder: optionally update it from its feed, then
/// return the folder's current playable files.
///
/// Every per-episode problem (download failure, short episode, exhausted
/// numbers) is reported and skipped; the folder is always brought to a
/// listable state.
pub async fn process_podcast<C: HttpClient>(
    client: &C,
    prober: &dyn DurationProber,
    folder: &Path,
    feed_url: &str,
    options: &PodcastOptions,
    reporter: &SharedReporter,
) -> Vec<PathBuf> {
    if options.update {
        let mut state = StateStore::load(folder, reporter);
        update_from_feed(client, prober, folder, feed_url, options, &mut state, reporter).await;
    }

    get_local_files(folder, options.min_duration, prober, reporter)
}

/// Fetch the feed, reconcile it against local state, and download new
/// episodes one at a time, oldest first.
#[allow(clippy::too_many_arguments)]
async fn update_from_feed<C: HttpClient>(
    client: &C,
    prober: &dyn DurationProber,
    folder: &Path,
    feed_url: &str,
    options: &PodcastOptions,
    state: &mut StateStore,
    reporter: &SharedReporter,
) {
    // Feeds deliver newest first; the reconciler wants oldest first
    let mut episodes = match fetch_feed(client, feed_url, reporter).await {
        Ok(episodes) => episodes,
        Err(e) => {
            reporter.report(Event::FeedUnavailable {
                url: feed_url.to_string(),
                error: e.to_string(),
            });
            return;
        }
    };
    episodes.reverse();

    let local_files = scan_numbered_files(folder);
    let plan = plan_downloads(&episodes, &local_files, state.mapping(), state.rejected());

    for episode in &plan.exhausted {
        reporter.report(Event::TrackNumbersExhausted {
            episode_title: episode.title.clone(),
        });
    }

    let mut downloaded = 0;
    let mut rejected = 0;
    let mut failed = 0;

    for assignment in &plan.to_download {
        let result = fetch_and_commit(
            client,
            prober,
            &assignment.episode,
            assignment.number,
            folder,
            options.min_duration,
            state,
            reporter,
        )
        .await;

        match result {
            Ok(EpisodeOutcome::Committed(_)) => downloaded += 1,
            Ok(EpisodeOutcome::Rejected) => rejected += 1,
            Ok(EpisodeOutcome::SkippedExisting) => {}
            Err(e) => {
                failed += 1;
                reporter.report(Event::DownloadFailed {
                    episode_title: assignment.episode.title.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    reporter.report(Event::FeedProcessed {
        downloaded,
        already_present: plan.already_present,
        rejected_skipped: plan.rejected_skipped + rejected,
        failed,
    });
}

/// List the folder's MP3 files in natural order, deleting any file whose
/// probed duration is confirmed shorter than `min_duration`.
pub fn get_local_files(
    folder: &Path,
    min_duration: f64,
    prober: &dyn DurationProber,
    reporter: &SharedReporter,
) -> Vec<PathBuf> {
    let mut playable = Vec::new();

    for path in find_mp3_files(folder) {
        let duration_secs = prober.probe(&path);
        if duration_secs == 0.0 {
            reporter.report(Event::DurationUnknown { path: path.clone() });
        }

        if duration_secs > 0.0
            && duration_secs < min_duration
            && std::fs::remove_file(&path).is_ok()
        {
            reporter.report(Event::ShortFileRemoved {
                path,
                duration_secs,
            });
            continue;
        }

        playable.push(path);
    }

    playable
}
