use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::fetch::{self, FetchPolicy};

/// Where the audio bytes for one analysis come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    Local(PathBuf),
    Remote(String),
}

/// Raw bytes of a source plus a file-type hint for the decoder.
pub struct LoadedSource {
    pub bytes: Vec<u8>,
    pub extension: Option<String>,
}

impl AudioSource {
    pub fn parse(input: &str) -> Self {
        if input.contains("://") {
            AudioSource::Remote(input.to_string())
        } else {
            AudioSource::Local(PathBuf::from(input))
        }
    }

    pub fn load(&self, policy: &FetchPolicy) -> Result<LoadedSource, SourceError> {
        match self {
            AudioSource::Local(path) => {
                let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(LoadedSource {
                    bytes,
                    extension: extension_of(path),
                })
            }
            AudioSource::Remote(raw) => {
                let url = fetch::validate_url(raw, policy)?;
                let extension = url
                    .path_segments()
                    .and_then(|mut segments| segments.next_back())
                    .and_then(|name| extension_of(Path::new(name)));
                let bytes = fetch::fetch_bytes(url, policy)?;
                Ok(LoadedSource { bytes, extension })
            }
        }
    }
}

impl std::fmt::Display for AudioSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioSource::Local(path) => write!(f, "{}", path.display()),
            AudioSource::Remote(url) => f.write_str(url),
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
