use std::path::{Path, PathBuf};

/// Default input tree, relative to the home directory
pub const DEFAULT_INPUT_PATH: &str = "~/data/tonbox/input";
/// Default output tree, relative to the home directory
pub const DEFAULT_OUTPUT_PATH: &str = "~/data/tonbox/output";

/// Resolved input/output locations for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Config {
    pub fn new(input_path: Option<&str>, output_path: Option<&str>) -> Self {
        Self {
            input_path: expand_path(input_path.unwrap_or(DEFAULT_INPUT_PATH)),
            output_path: expand_path(output_path.unwrap_or(DEFAULT_OUTPUT_PATH)),
        }
    }

    /// Create input and output directories if they don't exist
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.input_path)?;
        std::fs::create_dir_all(&self.output_path)
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    Path::new(path).to_path_buf()
}
