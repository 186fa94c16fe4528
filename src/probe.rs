use std::path::Path;

use lofty::{read_from_path, AudioFile};

/// Reads playback duration from local audio files.
///
/// Returns seconds, or `0.0` when the duration cannot be determined —
/// callers treat that as "unknown", never as an error.
pub trait DurationProber: Send + Sync {
    fn probe(&self, path: &Path) -> f64;
}

/// Duration prober backed by lofty's container metadata parsing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyProber;

impl LoftyProber {
    pub fn new() -> Self {
        Self
    }
}

impl DurationProber for LoftyProber {
    fn probe(&self, path: &Path) -> f64 {
        match read_from_path(path) {
            Ok(tagged) => tagged.properties().duration().as_secs_f64(),
            Err(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn probe_returns_zero_for_unreadable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not-audio.mp3");
        std::fs::write(&path, b"this is not an mp3").unwrap();

        assert_eq!(LoftyProber::new().probe(&path), 0.0);
    }

    #[test]
    fn probe_returns_zero_for_missing_file() {
        let dir = tempdir().unwrap();
        assert_eq!(LoftyProber::new().probe(&dir.path().join("gone.mp3")), 0.0);
    }
}
