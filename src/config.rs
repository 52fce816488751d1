use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::prelude::*;

/// Optional `powerboard.toml`: defaults for the source options, overridden by
/// flags and environment variables.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub results_dir: Option<PathBuf>,

    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub window_hours: Option<usize>,
}

impl Config {
    pub const DEFAULT_PATH: &'static str = "powerboard.toml";

    /// Read the explicit path (missing file is an error there), or fall back
    /// to `powerboard.toml` in the working directory (missing file is fine).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(Self::DEFAULT_PATH), false),
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(Error::from(error)
                    .context(format!("failed to read `{}`", path.display())));
            }
        };
        toml::from_str(&text).with_context(|| format!("failed to parse `{}`", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_load_explicit_path() -> Result {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("powerboard.toml");
        fs::write(&path, "results_dir = \"outputs\"\napi_url = \"http://localhost:8000/\"\n")?;
        let config = Config::load(Some(&path))?;
        assert_eq!(config.results_dir.as_deref(), Some(Path::new("outputs")));
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:8000/"));
        Ok(())
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/powerboard.toml"))).is_err());
    }
}
