//! Build domain model.
//!
//! This module defines the `Build` record browsed in the list: a flattened,
//! display-ready summary of one Buildkite build. Conversion from the API wire
//! format lives in [`crate::source::models`]; this type only holds strings.

use crate::domain::record::{Fields, HasLink};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Summary of a single CI build.
///
/// # Fields
///
/// - `pipeline`: Pipeline slug the build belongs to
/// - `message`: Commit or trigger message
/// - `branch`: Branch the build ran on
/// - `status`: Build state (`passed`, `failed`, `running`, ...)
/// - `commit`: Commit SHA
/// - `creator` / `creator_email`: Who triggered the build, empty when unknown
/// - `created_at`: Local creation date, e.g. `Monday, 2-January-2006`
/// - `env`: Build environment rendered as `KEY=value` pairs
/// - `web_url`: Link to the build page
/// - `elapsed`: Time since creation when the list was fetched, e.g. `3h2m1s`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub pipeline: String,
    pub message: String,
    pub branch: String,
    pub status: String,
    pub commit: String,
    pub creator: String,
    pub creator_email: String,
    pub created_at: String,
    pub env: String,
    pub web_url: String,
    pub elapsed: String,
}

impl Build {
    /// Names accepted by [`Fields::field`], in template spelling.
    pub const FIELD_NAMES: [&'static str; 11] = [
        "Pipeline",
        "Message",
        "Branch",
        "Status",
        "Commit",
        "Creator",
        "CreatorEmail",
        "CreatedAt",
        "ENV",
        "WebURL",
        "Elapsed",
    ];
}

/// Formats a duration in whole seconds the way Go prints a `time.Duration`
/// truncated to seconds: `45s`, `1m5s`, `2h0m3s`.
///
/// Negative durations (clock skew between us and the API) are shown as `0s`.
///
/// # Examples
///
/// ```
/// use build_beaver::domain::build::format_elapsed;
///
/// assert_eq!(format_elapsed(45), "45s");
/// assert_eq!(format_elapsed(65), "1m5s");
/// assert_eq!(format_elapsed(7203), "2h0m3s");
/// ```
#[must_use]
pub fn format_elapsed(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / SECONDS_PER_HOUR;
    let mins = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = total % SECONDS_PER_MINUTE;

    if hours > 0 {
        format!("{hours}h{mins}m{secs}s")
    } else if mins > 0 {
        format!("{mins}m{secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Textual form used for search matching: every field, space separated.
impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{} {} {} {} {} {} {} {} {} {} {}}}",
            self.pipeline,
            self.message,
            self.branch,
            self.status,
            self.commit,
            self.creator,
            self.creator_email,
            self.created_at,
            self.env,
            self.web_url,
            self.elapsed,
        )
    }
}

impl HasLink for Build {
    fn link(&self) -> Option<&str> {
        if self.web_url.is_empty() {
            None
        } else {
            Some(&self.web_url)
        }
    }
}

impl Fields for Build {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "Pipeline" => &self.pipeline,
            "Message" => &self.message,
            "Branch" => &self.branch,
            "Status" => &self.status,
            "Commit" => &self.commit,
            "Creator" => &self.creator,
            "CreatorEmail" => &self.creator_email,
            "CreatedAt" => &self.created_at,
            "ENV" => &self.env,
            "WebURL" => &self.web_url,
            "Elapsed" => &self.elapsed,
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}
