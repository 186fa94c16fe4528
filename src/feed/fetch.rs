// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::FeedError;
use crate::http::HttpClient;
use crate::progress::{Event, SharedReporter};

use super::parse::{episodes_from_entries, parse_feed, Episode};

/// Fetch a feed and resolve it into episodes in delivery order
/// (newest first, as feeds conventionally deliver them).
///
/// Parse problems are reported as warnings and yield however many entries
/// could be read; only the HTTP fetch itself can fail.
pub async fn fetch_feed<C: HttpClient>(
    client: &C,
    url: &str,
    reporter: &SharedReporter,
) -> Result<Vec<Episode>, FeedError> {
    reporter.report(Event::FetchingFeed {
        url: url.to_string(),
    });

    let bytes = client
        .get_bytes(url)
        .await
        .map_err(|e| FeedError::FetchFailed {
            url: url.to_string(),
            source: e,
        })?;

    let (entries, warning) = parse_feed(&bytes);
    if let Some(warning) = warning {
        reporter.report(Event::FeedParseFailed {
            url: url.to_string(),
            error: warning,
        });
    }

    let episodes = episodes_from_entries(&entries);
    reporter.report(Event::FeedParsed {
        entries: entries.len(),
        episodes: episodes.len(),
    });

    Ok(episodes)
}
