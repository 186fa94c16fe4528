use std::path::{Path, PathBuf};

use crate::files::find_mp3_files;

/// Process a static album folder: find and return all MP3 files in
/// natural-sort order. No network, no state.
pub fn process_static_album(folder: &Path) -> Vec<PathBuf> {
    find_mp3_files(folder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_album_tracks_in_natural_order() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("track10.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("track2.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("cover.jpg"), b"x").unwrap();

        let files = process_static_album(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["track2.mp3", "track10.mp3"]);
    }

    #[test]
    fn includes_nested_disc_folders() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("cd1")).unwrap();
        std::fs::write(dir.path().join("cd1").join("01.mp3"), b"x").unwrap();

        assert_eq!(process_static_album(dir.path()).len(), 1);
    }

    #[test]
    fn empty_folder_yields_empty_list() {
        let dir = tempdir().unwrap();
        assert!(process_static_album(dir.path()).is_empty());
    }
}
