//! Opaque media references and coordinates carried in the consultation state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Reference to an audio or image file on local storage.
///
/// Callers marshal uploads into files and pass handles in; the speech synthesizer returns a
/// handle to the file it wrote.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaHandle(PathBuf);

impl MediaHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Final path component, used to build download URLs.
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.0
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

impl From<PathBuf> for MediaHandle {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&str> for MediaHandle {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}

/// Latitude/longitude pair used by the hospital lookup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Map viewport string understood by the places API (`@lat,lng,10z`).
    pub fn viewport(&self) -> String {
        format!("@{},{},10z", self.latitude, self.longitude)
    }
}
