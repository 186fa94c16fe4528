use sha2::{Digest, Sha256};
use url::Url;

use crate::feed::Episode;
use crate::files::parse_track_number;

const AUDIO_EXTENSION: &str = ".mp3";

/// Build the destination filename `NNN_basename.mp3` for an episode.
///
/// The base name comes from the URL's path component when that already
/// names an mp3 file, otherwise from the sanitized episode title, otherwise
/// from a hash of the URL. A three-digit prefix already present on the
/// derived base is stripped so the assigned number is the only prefix.
pub fn destination_filename(number: u32, episode: &Episode) -> String {
    let base = base_name_from_url(&episode.enclosure_url)
        .or_else(|| base_name_from_title(&episode.title))
        .unwrap_or_else(|| hashed_base_name(&episode.enclosure_url));

    format!("{number:03}_{}", strip_track_prefix(&base))
}

fn base_name_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let name = parsed.path_segments()?.next_back()?;

    if name.ends_with(AUDIO_EXTENSION) {
        Some(name.to_string())
    } else {
        None
    }
}

fn base_name_from_title(title: &str) -> Option<String> {
    let safe: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe = safe.trim().replace(' ', "_");

    if safe.is_empty() {
        None
    } else {
        Some(format!("{safe}{AUDIO_EXTENSION}"))
    }
}

fn hashed_base_name(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let short: String = digest[..4].iter().map(|b| format!("{b:02x}")).collect();
    format!("episode_{short}{AUDIO_EXTENSION}")
}

fn strip_track_prefix(name: &str) -> &str {
    if parse_track_number(name).is_some() {
        &name[4..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(title: &str, url: &str) -> Episode {
        Episode {
            title: title.to_string(),
            enclosure_url: url.to_string(),
        }
    }

    #[test]
    fn uses_url_basename_when_it_names_an_mp3() {
        let ep = episode("Some Title", "https://example.com/shows/episode-42.mp3");
        assert_eq!(destination_filename(1, &ep), "001_episode-42.mp3");
    }

    #[test]
    fn ignores_query_parameters_in_url_path() {
        let ep = episode("T", "https://example.com/ep.mp3?token=abc");
        assert_eq!(destination_filename(7, &ep), "007_ep.mp3");
    }

    #[test]
    fn falls_back_to_sanitized_title() {
        let ep = episode("My Great Episode!", "https://example.com/stream?id=5");
        assert_eq!(destination_filename(12, &ep), "012_My_Great_Episode.mp3");
    }

    #[test]
    fn title_keeps_hyphens_and_underscores() {
        let ep = episode("part-1_intro", "https://example.com/audio");
        assert_eq!(destination_filename(3, &ep), "003_part-1_intro.mp3");
    }

    #[test]
    fn hashes_url_when_title_is_unusable() {
        let ep = episode("???", "https://example.com/stream?id=5");
        let name = destination_filename(2, &ep);

        assert!(name.starts_with("002_episode_"));
        assert!(name.ends_with(".mp3"));
        // Same URL always hashes to the same name
        assert_eq!(name, destination_filename(2, &ep));
    }

    #[test]
    fn strips_existing_track_prefix_from_url_basename() {
        let ep = episode("T", "https://example.com/archive/005_old-show.mp3");
        assert_eq!(destination_filename(9, &ep), "009_old-show.mp3");
    }

    #[test]
    fn three_digit_number_is_zero_padded() {
        let ep = episode("T", "https://example.com/a.mp3");
        assert_eq!(destination_filename(42, &ep), "042_a.mp3");
        assert_eq!(destination_filename(999, &ep), "999_a.mp3");
    }

    #[test]
    fn unparseable_url_falls_back_to_title() {
        let ep = episode("Plan B", "not a url");
        assert_eq!(destination_filename(1, &ep), "001_Plan_B.mp3");
    }
}
