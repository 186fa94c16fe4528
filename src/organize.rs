use std::path::{Path, PathBuf};

use crate::error::OrganizeError;
use crate::files::two_digit_prefix;
use crate::progress::{Event, SharedReporter};

/// Most files a single output folder can hold; the player addresses
/// tracks with a single byte
pub const MAX_TRACKS_PER_FOLDER: usize = 255;

/// Copy sorted MP3 files into `{output_root}/{NN}/{NNN}.mp3`.
///
/// The two-digit output folder name comes from the source folder's name;
/// track numbers restart at 001 in sorted input order. Existing files are
/// overwritten. Any copy failure aborts the folder.
pub fn organize_files(
    mp3_files: &[PathBuf],
    folder_name: &str,
    output_root: &Path,
    reporter: &SharedReporter,
) -> Result<Vec<PathBuf>, OrganizeError> {
    if mp3_files.len() > MAX_TRACKS_PER_FOLDER {
        return Err(OrganizeError::TooManyFiles(mp3_files.len()));
    }

    let prefix = two_digit_prefix(folder_name)
        .ok_or_else(|| OrganizeError::InvalidFolderPrefix(folder_name.to_string()))?;

    let output_folder = output_root.join(prefix);
    std::fs::create_dir_all(&output_folder).map_err(|e| OrganizeError::CreateDirectoryFailed {
        path: output_folder.clone(),
        source: e,
    })?;

    reporter.report(Event::OrganizeStarted {
        folder: folder_name.to_string(),
        total: mp3_files.len(),
    });

    let mut copied = Vec::with_capacity(mp3_files.len());

    for (index, source) in mp3_files.iter().enumerate() {
        let dest = output_folder.join(format!("{:03}.mp3", index + 1));

        let bytes = std::fs::copy(source, &dest).map_err(|e| OrganizeError::CopyFailed {
            from: source.clone(),
            to: dest.clone(),
            source: e,
        })?;

        reporter.report(Event::FileCopied {
            source: source.clone(),
            dest: dest.clone(),
            index: index + 1,
            total: mp3_files.len(),
            bytes,
        });

        copied.push(dest);
    }

    Ok(copied)
}
