//! Buildkite API wire models.
//!
//! These types mirror the subset of the `GET /v2/organizations/{org}/builds`
//! response the browser needs. They are separate from [`Build`] so the domain
//! type stays a flat set of display strings. Every field is optional: the API
//! omits or nulls several of them depending on the build state.

use crate::domain::build::{format_elapsed, Build};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `chrono` format for the creation date, e.g. `Monday, 2-January-2006`.
pub const CREATED_AT_FORMAT: &str = "%A, %-d-%B-%Y";

/// One build as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiBuild {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,

    /// RFC 3339 timestamp, e.g. `2024-03-01T10:15:00.000Z`.
    #[serde(default)]
    pub created_at: Option<String>,

    /// Build environment. Values are usually strings but may be any JSON.
    #[serde(default)]
    pub env: Option<BTreeMap<String, serde_json::Value>>,

    #[serde(default)]
    pub pipeline: Option<ApiPipeline>,
    #[serde(default)]
    pub creator: Option<ApiCreator>,
}

/// The pipeline a build belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPipeline {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// The user who triggered a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCreator {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ApiBuild {
    /// Flattens the API record into a display-ready [`Build`].
    ///
    /// `now` is the reference point for the elapsed time. A missing or
    /// malformed `created_at` leaves both the date and the elapsed time empty.
    #[must_use]
    pub fn into_build(self, now: DateTime<Utc>) -> Build {
        let created = self
            .created_at
            .as_deref()
            .and_then(|raw| match DateTime::parse_from_rfc3339(raw) {
                Ok(created) => Some(created),
                Err(e) => {
                    tracing::debug!(created_at = raw, error = %e, "unparseable timestamp");
                    None
                }
            });

        let (created_at, elapsed) = created.map_or_else(Default::default, |created| {
            let local = created.with_timezone(&Local);
            let seconds = now.signed_duration_since(created).num_seconds();
            (local.format(CREATED_AT_FORMAT).to_string(), format_elapsed(seconds))
        });

        let (creator, creator_email) = self
            .creator
            .map(|c| (c.name.unwrap_or_default(), c.email.unwrap_or_default()))
            .unwrap_or_default();

        Build {
            pipeline: self.pipeline.and_then(|p| p.slug).unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            branch: self.branch.unwrap_or_default(),
            status: self.state.unwrap_or_default(),
            commit: self.commit.unwrap_or_default(),
            creator,
            creator_email,
            created_at,
            env: self.env.as_ref().map(render_env).unwrap_or_default(),
            web_url: self.web_url.unwrap_or_default(),
            elapsed,
        }
    }
}

/// Renders an environment as space-separated `KEY=value` pairs, sorted by key.
fn render_env(env: &BTreeMap<String, serde_json::Value>) -> String {
    env.iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => format!("{key}={s}"),
            other => format!("{key}={other}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
