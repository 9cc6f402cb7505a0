use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{NinError, NinResult};

/// Descriptive project settings read from `project.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Demo title.
    pub title: String,
    /// Authors, joined with ", " in artifact metadata.
    pub authors: Vec<String>,
    /// Free-form description.
    pub description: String,
    /// Analytics identifier substituted into the HTML template.
    #[serde(rename = "googleAnalyticsID", alias = "analytics_id")]
    pub analytics_id: String,
    /// URL of the open-graph preview image.
    #[serde(rename = "previewImage", alias = "preview_image")]
    pub preview_image: String,
    /// Project version string.
    pub version: String,
    /// Where the project lives (repository URL or similar).
    pub origin: String,
}

impl ProjectSettings {
    /// Parse settings from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> NinResult<Self> {
        let mut settings: Self = serde_json::from_reader(r)
            .map_err(|e| NinError::serde(format!("parse project settings JSON: {e}")))?;
        if settings.version.is_empty() {
            settings.version = "0.0.0".to_string();
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> NinResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            NinError::validation(format!("open project settings '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check the fields the packer relies on.
    pub fn validate(&self) -> NinResult<()> {
        if self.title.trim().is_empty() {
            return Err(NinError::validation("project settings need a non-empty title"));
        }
        Ok(())
    }

    /// Authors as a single display string.
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/settings.rs"]
mod tests;
