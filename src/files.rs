use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A filename split into alternating text and digit runs for natural sorting
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    // Digit runs sort before text so "10-intro" orders numerically against "2-intro"
    Number(u128),
    Text(String),
}

fn natural_key(name: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for c in name.chars() {
        if c.is_ascii_digit() != in_digits && !current.is_empty() {
            segments.push(finish_segment(current, in_digits));
            current = String::new();
        }
        in_digits = c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        segments.push(finish_segment(current, in_digits));
    }

    segments
}

fn finish_segment(raw: String, in_digits: bool) -> Segment {
    if in_digits {
        match raw.parse::<u128>() {
            Ok(n) => Segment::Number(n),
            Err(_) => Segment::Text(raw),
        }
    } else {
        Segment::Text(raw.to_lowercase())
    }
}

/// Compare two filenames treating digit runs as numbers, so `file2`
/// sorts before `file10`
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Sort paths naturally by filename
pub fn sort_files_naturally(files: &mut [PathBuf]) {
    files.sort_by(|a, b| {
        let a_name = a.file_name().map(|n| n.to_string_lossy().to_string());
        let b_name = b.file_name().map(|n| n.to_string_lossy().to_string());
        match (a_name, b_name) {
            (Some(a), Some(b)) => natural_cmp(&a, &b),
            _ => Ordering::Equal,
        }
    });
}

fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp3"))
}

/// Find all MP3 files below a directory, sorted naturally by filename
pub fn find_mp3_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_mp3(path))
        .collect();

    sort_files_naturally(&mut files);
    files
}

/// Parse the leading `NNN_` track number from a filename, if present
pub fn parse_track_number(name: &str) -> Option<u32> {
    let bytes = name.as_bytes();
    if bytes.len() < 4 || bytes[3] != b'_' {
        return None;
    }
    if !bytes[..3].iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name[..3].parse().ok()
}

/// Map track number to file path for all `NNN_`-prefixed files directly
/// inside a podcast folder
pub fn scan_numbered_files(dir: &Path) -> BTreeMap<u32, PathBuf> {
    let mut by_number = BTreeMap::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return by_number,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(number) = parse_track_number(name) {
            by_number.insert(number, path);
        }
    }

    by_number
}

/// Extract the two leading digits of a folder name, the output subfolder name
pub fn two_digit_prefix(name: &str) -> Option<&str> {
    let bytes = name.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_digit() && bytes[1].is_ascii_digit() {
        Some(&name[..2])
    } else {
        None
    }
}

/// Format a byte count in human readable form
pub fn format_file_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn natural_cmp_orders_digit_runs_numerically() {
        assert_eq!(natural_cmp("file2.mp3", "file10.mp3"), Ordering::Less);
        assert_eq!(natural_cmp("file10.mp3", "file2.mp3"), Ordering::Greater);
        assert_eq!(natural_cmp("file2.mp3", "file2.mp3"), Ordering::Equal);
    }

    #[test]
    fn natural_cmp_is_case_insensitive_for_text() {
        assert_eq!(natural_cmp("Episode1.mp3", "episode1.mp3"), Ordering::Equal);
        assert_eq!(natural_cmp("Alpha.mp3", "beta.mp3"), Ordering::Less);
    }

    #[test]
    fn natural_cmp_handles_mixed_segments() {
        assert_eq!(natural_cmp("track1b.mp3", "track1a.mp3"), Ordering::Greater);
        assert_eq!(natural_cmp("9.mp3", "10.mp3"), Ordering::Less);
    }

    #[test]
    fn sort_files_naturally_sorts_by_filename() {
        let mut files = vec![
            PathBuf::from("/a/file10.mp3"),
            PathBuf::from("/a/file2.mp3"),
            PathBuf::from("/b/file1.mp3"),
        ];
        sort_files_naturally(&mut files);
        assert_eq!(
            files,
            vec![
                PathBuf::from("/b/file1.mp3"),
                PathBuf::from("/a/file2.mp3"),
                PathBuf::from("/a/file10.mp3"),
            ]
        );
    }

    #[test]
    fn find_mp3_files_recurses_and_sorts() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b10.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("b2.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("sub").join("a.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = find_mp3_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.mp3", "b2.mp3", "b10.mp3"]);
    }

    #[test]
    fn find_mp3_files_handles_missing_dir() {
        assert!(find_mp3_files(Path::new("/nonexistent/path")).is_empty());
    }

    #[test]
    fn find_mp3_files_matches_extension_case_insensitively() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("loud.MP3"), b"x").unwrap();
        assert_eq!(find_mp3_files(dir.path()).len(), 1);
    }

    #[test]
    fn parse_track_number_accepts_three_digit_prefix() {
        assert_eq!(parse_track_number("001_intro.mp3"), Some(1));
        assert_eq!(parse_track_number("123_show.mp3"), Some(123));
    }

    #[test]
    fn parse_track_number_rejects_other_names() {
        assert_eq!(parse_track_number("01_short.mp3"), None);
        assert_eq!(parse_track_number("abc_file.mp3"), None);
        assert_eq!(parse_track_number("1234_file.mp3"), None);
        assert_eq!(parse_track_number("123-file.mp3"), None);
        assert_eq!(parse_track_number(""), None);
    }

    #[test]
    fn scan_numbered_files_maps_number_to_path() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("001_first.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("005_fifth.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("unnumbered.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join(".downloaded_files"), b"x").unwrap();

        let map = scan_numbered_files(dir.path());

        assert_eq!(map.len(), 2);
        assert!(map[&1].ends_with("001_first.mp3"));
        assert!(map[&5].ends_with("005_fifth.mp3"));
    }

    #[test]
    fn scan_numbered_files_ignores_directories() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("002_folder")).unwrap();

        assert!(scan_numbered_files(dir.path()).is_empty());
    }

    #[test]
    fn two_digit_prefix_extracts_leading_digits() {
        assert_eq!(two_digit_prefix("01_MyAlbum"), Some("01"));
        assert_eq!(two_digit_prefix("15_Podcast"), Some("15"));
        assert_eq!(two_digit_prefix("99"), Some("99"));
    }

    #[test]
    fn two_digit_prefix_rejects_invalid_names() {
        assert_eq!(two_digit_prefix("album"), None);
        assert_eq!(two_digit_prefix("1_album"), None);
        assert_eq!(two_digit_prefix(""), None);
    }

    #[test]
    fn format_file_size_picks_unit() {
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }
}
