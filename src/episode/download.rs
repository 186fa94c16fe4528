use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::DownloadError;
use crate::feed::Episode;
use crate::http::HttpClient;
use crate::probe::DurationProber;
use crate::progress::{Event, SharedReporter};
use crate::state::StateStore;

use super::filename::destination_filename;

/// What became of one planned episode download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// Downloaded, long enough, recorded in the state store
    Committed(PathBuf),
    /// Downloaded but too short; deleted and permanently rejected
    Rejected,
    /// Destination file already existed; nothing downloaded
    SkippedExisting,
}

/// Stream an episode to `dest`, reporting progress.
///
/// On any network or IO failure the partial file is removed before the
/// error is returned. Returns the number of bytes written on success.
pub async fn download_episode<C: HttpClient>(
    client: &C,
    episode: &Episode,
    number: u32,
    dest: &Path,
    reporter: &SharedReporter,
) -> Result<u64, DownloadError> {
    match stream_to_file(client, episode, number, dest, reporter).await {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            let _ = std::fs::remove_file(dest);
            Err(e)
        }
    }
}

async fn stream_to_file<C: HttpClient>(
    client: &C,
    episode: &Episode,
    number: u32,
    dest: &Path,
    reporter: &SharedReporter,
) -> Result<u64, DownloadError> {
    let url = episode.enclosure_url.as_str();

    let response = client
        .get_stream(url)
        .await
        .map_err(|e| DownloadError::HttpFailed {
            url: url.to_string(),
            source: e,
        })?;

    if response.status >= 400 {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    reporter.report(Event::DownloadStarted {
        number,
        episode_title: episode.title.clone(),
        url: url.to_string(),
        content_length: response.content_length,
    });

    let mut file = File::create(dest)
        .await
        .map_err(|e| DownloadError::FileCreateFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

    let mut bytes_downloaded: u64 = 0;
    let mut stream = response.body;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::StreamFailed {
            url: url.to_string(),
            source: e,
        })?;

        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::FileWriteFailed {
                path: dest.to_path_buf(),
                source: e,
            })?;

        bytes_downloaded += chunk.len() as u64;

        reporter.report(Event::DownloadProgress {
            bytes_downloaded,
            total_bytes: response.content_length,
        });
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::FileWriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

    Ok(bytes_downloaded)
}

/// Download one planned episode into `folder` and settle it against the
/// state store: commit it, or reject it when the probed duration falls
/// below `min_duration`.
///
/// A probe result of `0.0` means the duration is unknown; only a confirmed
/// short duration rejects the file.
#[allow(clippy::too_many_arguments)]
pub async fn fetch_and_commit<C: HttpClient>(
    client: &C,
    prober: &dyn DurationProber,
    episode: &Episode,
    number: u32,
    folder: &Path,
    min_duration: f64,
    state: &mut StateStore,
    reporter: &SharedReporter,
) -> Result<EpisodeOutcome, DownloadError> {
    let dest = folder.join(destination_filename(number, episode));

    // The reconciler never assigns a taken number; anything found here is
    // an untracked leftover we must not clobber
    if dest.exists() {
        reporter.report(Event::DestinationExists { path: dest });
        return Ok(EpisodeOutcome::SkippedExisting);
    }

    let bytes_downloaded = download_episode(client, episode, number, &dest, reporter).await?;

    let duration_secs = prober.probe(&dest);
    if duration_secs == 0.0 {
        reporter.report(Event::DurationUnknown { path: dest.clone() });
    }

    if duration_secs > 0.0 && duration_secs < min_duration {
        let _ = std::fs::remove_file(&dest);
        state.record_rejected(&episode.enclosure_url, reporter);
        reporter.report(Event::DownloadRejected {
            episode_title: episode.title.clone(),
            duration_secs,
            min_duration,
        });
        return Ok(EpisodeOutcome::Rejected);
    }

    state.record_downloaded(&episode.enclosure_url, reporter);
    state.record_mapping(&episode.enclosure_url, number, reporter);
    reporter.report(Event::DownloadCommitted {
        path: dest.clone(),
        bytes_downloaded,
        duration_secs,
    });

    Ok(EpisodeOutcome::Committed(dest))
}
