use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;

use crate::feed::Episode;

/// Highest track number the player can address
pub const MAX_TRACK_NUMBER: u32 = 999;

/// One new episode together with the track number it will download under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub episode: Episode,
    pub number: u32,
}

/// Outcome of reconciling a feed against the local folder state
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// New episodes to download, oldest first, with their assigned numbers
    pub to_download: Vec<Assignment>,
    /// Episodes whose mapped number still has a file on disk
    pub already_present: usize,
    /// Episodes skipped because their URL was rejected in an earlier run
    pub rejected_skipped: usize,
    /// Episodes that could not get a number at or below the maximum
    pub exhausted: Vec<Episode>,
}

/// Track numbers that must not be handed to new downloads: numbers whose
/// file on disk belongs to no URL in the current feed (feed-pruned or
/// manually curated episodes keep their slot).
pub fn reserved_numbers(
    local_files: &BTreeMap<u32, PathBuf>,
    url_to_number: &HashMap<String, u32>,
    feed_urls: &HashSet<&str>,
) -> BTreeSet<u32> {
    let feed_numbers: HashSet<u32> = url_to_number
        .iter()
        .filter(|(url, _)| feed_urls.contains(url.as_str()))
        .map(|(_, number)| *number)
        .collect();

    local_files
        .keys()
        .filter(|number| !feed_numbers.contains(number))
        .copied()
        .collect()
}

/// Decide which feed episodes are new and assign them track numbers.
///
/// `episodes` must be in chronological order, oldest first. A single
/// cursor walks upward from 1, jumping past numbers already claimed by
/// files still in the feed and past reserved orphan numbers, so episodes
/// get strictly increasing numbers in release order and existing content
/// is never renumbered.
pub fn plan_downloads(
    episodes: &[Episode],
    local_files: &BTreeMap<u32, PathBuf>,
    url_to_number: &HashMap<String, u32>,
    rejected_urls: &HashSet<String>,
) -> Plan {
    let feed_urls: HashSet<&str> = episodes
        .iter()
        .map(|episode| episode.enclosure_url.as_str())
        .collect();

    let reserved = reserved_numbers(local_files, url_to_number, &feed_urls);

    let mut plan = Plan::default();
    let mut next_number: u32 = 1;

    for episode in episodes {
        if rejected_urls.contains(&episode.enclosure_url) {
            plan.rejected_skipped += 1;
            continue;
        }

        if let Some(&number) = url_to_number.get(&episode.enclosure_url)
            && local_files.contains_key(&number)
        {
            plan.already_present += 1;
            // Keep the cursor ahead of every known assignment
            if number >= next_number {
                next_number = number + 1;
            }
            continue;
        }

        while reserved.contains(&next_number) {
            next_number += 1;
        }

        if next_number > MAX_TRACK_NUMBER {
            plan.exhausted.push(episode.clone());
            continue;
        }

        plan.to_download.push(Assignment {
            episode: episode.clone(),
            number: next_number,
        });
        next_number += 1;
    }

    plan
}
