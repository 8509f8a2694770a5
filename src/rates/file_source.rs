use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::rates::{RateError, RateSnapshot, RateSource};

/// Reads the rate snapshot from a JSON file shaped like the HTTP response.
#[derive(Debug, Clone)]
pub struct FileRateSource {
    path: PathBuf
}

impl FileRateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RateSource for FileRateSource {
    async fn fetch(&self) -> Result<RateSnapshot, RateError> {
        debug!("Loading exchange rates from file: {}", self.path.display());

        let body = fs::read_to_string(&self.path).map_err(|source| RateError::File {
            path: self.path.clone(),
            source
        })?;

        RateSnapshot::from_json(&body)
    }
}
