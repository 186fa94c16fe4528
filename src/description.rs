use std::path::Path;

use serde::Deserialize;

use crate::error::DescriptionError;

/// Name of the per-folder configuration file
pub const DESCRIPTION_FILE: &str = "description.yaml";

/// Minimum episode duration in seconds when the description does not set one
pub const DEFAULT_MIN_DURATION_SECS: f64 = 60.0;

/// How a folder's content is sourced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// MP3 files placed in the folder by hand
    Static,
    /// Episodes downloaded from an RSS feed
    Rss,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Static => write!(f, "static"),
            ContentKind::Rss => write!(f, "rss"),
        }
    }
}

/// Parsed `description.yaml` of one input folder
#[derive(Debug, Clone, Deserialize)]
pub struct Description {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default)]
    pub feed_url: Option<String>,
    #[serde(default)]
    pub min_duration: Option<f64>,
}

impl Description {
    /// Minimum episode duration in seconds, falling back to the default
    pub fn min_duration(&self) -> f64 {
        self.min_duration.unwrap_or(DEFAULT_MIN_DURATION_SECS)
    }
}

/// Load and validate the `description.yaml` of a folder
pub fn load_description(folder: &Path) -> Result<Description, DescriptionError> {
    let path = folder.join(DESCRIPTION_FILE);

    if !path.exists() {
        return Err(DescriptionError::NotFound(path));
    }

    let text = std::fs::read_to_string(&path).map_err(|e| DescriptionError::ReadFailed {
        path: path.clone(),
        source: e,
    })?;

    let description: Description =
        serde_yaml::from_str(&text).map_err(|e| DescriptionError::ParseFailed {
            path: path.clone(),
            source: e,
        })?;

    if description.kind == ContentKind::Rss
        && description
            .feed_url
            .as_deref()
            .is_none_or(|url| url.trim().is_empty())
    {
        return Err(DescriptionError::MissingFeedUrl);
    }

    if let Some(min_duration) = description.min_duration
        && min_duration <= 0.0
    {
        return Err(DescriptionError::InvalidMinDuration(min_duration));
    }

    Ok(description)
}
