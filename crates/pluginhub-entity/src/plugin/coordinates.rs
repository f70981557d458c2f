//! Maven artifact coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

use pluginhub_core::AppError;

/// `group:artifact:version` plus packaging, with the layout rules of a
/// Maven 2 repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    /// Dotted group id.
    pub group_id: String,
    /// Artifact id.
    pub artifact_id: String,
    /// Version string.
    pub version: String,
    /// Packaging / extension.
    pub packaging: String,
}

impl Coordinates {
    /// Create coordinates. An empty packaging defaults to `jar`.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        packaging: impl Into<String>,
    ) -> Self {
        let packaging = packaging.into();
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            packaging: if packaging.trim().is_empty() {
                "jar".to_string()
            } else {
                packaging
            },
        }
    }

    /// Reject components that could escape a directory or break a URL.
    pub fn validate(&self) -> Result<(), AppError> {
        check_component("groupId", &self.group_id)?;
        check_component("artifactId", &self.artifact_id)?;
        check_component("version", &self.version)?;
        check_component("packaging", &self.packaging)?;
        Ok(())
    }

    /// Artifact file name, e.g. `flink-sql-connector-kafka-3.2.0-1.19.jar`.
    pub fn file_name(&self) -> String {
        format!("{}-{}.{}", self.artifact_id, self.version, self.packaging)
    }

    /// Path of the artifact relative to the repository root.
    pub fn repository_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version,
            self.file_name()
        )
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

fn check_component(label: &str, value: &str) -> Result<(), AppError> {
    let valid = !value.is_empty()
        && value != "."
        && !value.contains("..")
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+'));
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Invalid {label} in artifact coordinates: '{value}'"
        )))
    }
}
