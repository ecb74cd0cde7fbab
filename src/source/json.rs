//! Saved-response source.
//!
//! Reads builds from a JSON file holding the body of a builds API response,
//! i.e. an array of build objects, for example one saved with
//!
//! ```text
//! curl -H "Authorization: Bearer $BKBREAVER_TOKEN" \
//!   https://api.buildkite.com/v2/organizations/acme/builds > builds.json
//! ```
//!
//! Useful offline and for trying out templates.

use crate::domain::build::Build;
use crate::domain::error::Result;
use crate::source::backend::BuildSource;
use crate::source::models::ApiBuild;
use std::path::PathBuf;

/// Builds loaded from a file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Creates a source reading `path`. The file is only read by
    /// [`fetch`](BuildSource::fetch).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BuildSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<Build>> {
        tracing::debug!(path = ?self.path, "loading builds from file");

        let contents = std::fs::read_to_string(&self.path)?;
        let api: Vec<ApiBuild> = serde_json::from_str(&contents)?;

        let now = chrono::Utc::now();
        let builds: Vec<Build> = api.into_iter().map(|b| b.into_build(now)).collect();

        tracing::info!(builds = builds.len(), path = ?self.path, "builds loaded");
        Ok(builds)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BeaverError;
    use std::fs;

    #[test]
    fn reads_saved_response() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("builds.json");
        fs::write(
            &path,
            r#"[
                {"state": "passed", "branch": "main", "pipeline": {"slug": "lexer"},
                 "web_url": "https://buildkite.com/acme/lexer/builds/2"},
                {"state": "failed", "branch": "fix", "pipeline": {"slug": "parser"}}
            ]"#,
        )
        .unwrap();

        let builds = JsonFileSource::new(&path).fetch().unwrap();
        assert_eq!(builds.len(), 2);
        assert_eq!(builds[0].pipeline, "lexer");
        assert_eq!(builds[1].status, "failed");
        assert!(builds[1].web_url.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("absent.json"));
        assert!(matches!(source.fetch(), Err(BeaverError::Io(_))));
        assert!(source.describe().contains("absent.json"));
    }

    #[test]
    fn non_array_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("builds.json");
        fs::write(&path, r#"{"message": "Unauthorized"}"#).unwrap();

        assert!(matches!(JsonFileSource::new(&path).fetch(), Err(BeaverError::Json(_))));
    }
}
