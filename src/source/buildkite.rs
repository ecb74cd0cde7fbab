//! Buildkite REST API source.
//!
//! Lists the organization's most recent builds with
//! `GET /v2/organizations/{org}/builds`, authenticated with a bearer token.
//! Pagination follows the `Link` response header: the `rel="next"` URL is
//! requested until it is absent or `page_limit` pages have been read.
//!
//! # Example
//!
//! ```no_run
//! use build_beaver::source::{BuildSource, BuildkiteClient};
//!
//! let client = BuildkiteClient::new("acme", "bkua_...")?.with_paging(100, 2);
//! let builds = client.fetch()?;
//! # Ok::<(), build_beaver::BeaverError>(())
//! ```

use crate::domain::build::Build;
use crate::domain::error::{BeaverError, Result};
use crate::source::backend::BuildSource;
use crate::source::models::ApiBuild;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, LINK};
use reqwest::Url;
use std::time::Duration;

/// Public API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.buildkite.com";

const USER_AGENT: &str = concat!("bkb/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest slice of an error response body quoted in the error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Blocking client for the builds endpoint.
#[derive(Debug, Clone)]
pub struct BuildkiteClient {
    http: Client,
    base_url: String,
    org: String,
    token: String,
    per_page: u32,
    page_limit: u32,
}

impl BuildkiteClient {
    /// Creates a client for `org`, fetching one page of 100 builds.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Fetch`] if the HTTP client cannot be built
    /// (e.g. no TLS backend).
    pub fn new(org: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            org: org.into(),
            token: token.into(),
            per_page: 100,
            page_limit: 1,
        })
    }

    /// Sets the page size and the maximum number of pages. Zero values are
    /// raised to one.
    #[must_use]
    pub fn with_paging(mut self, per_page: u32, page_limit: u32) -> Self {
        self.per_page = per_page.max(1);
        self.page_limit = page_limit.max(1);
        self
    }

    /// Points the client at another API host, e.g. a proxy.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// URL of the first page.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Fetch`] if the base URL or organization do not
    /// form a valid URL.
    pub fn first_page_url(&self) -> Result<Url> {
        let endpoint = format!(
            "{}/v2/organizations/{}/builds",
            self.base_url.trim_end_matches('/'),
            self.org
        );
        Url::parse_with_params(
            &endpoint,
            [("page", "1".to_string()), ("per_page", self.per_page.to_string())],
        )
        .map_err(|e| BeaverError::Fetch(format!("invalid URL {endpoint:?}: {e}")))
    }

    fn fetch_page(&self, url: Url) -> Result<(Vec<ApiBuild>, Option<Url>)> {
        let _span = tracing::debug_span!("fetch_page", url = %url).entered();

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let excerpt: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(BeaverError::Fetch(format!("GET {url} returned {status}: {excerpt}")));
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page)
            .and_then(|next| match Url::parse(&next) {
                Ok(next) => Some(next),
                Err(e) => {
                    tracing::warn!(link = %next, error = %e, "ignoring malformed next link");
                    None
                }
            });

        let page: Vec<ApiBuild> = response.json()?;
        tracing::debug!(builds = page.len(), has_next = next.is_some(), "page fetched");

        Ok((page, next))
    }
}

impl BuildSource for BuildkiteClient {
    fn fetch(&self) -> Result<Vec<Build>> {
        let _span = tracing::info_span!("fetch_builds", org = %self.org).entered();

        let mut builds = Vec::new();
        let mut next = Some(self.first_page_url()?);
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages == self.page_limit {
                tracing::debug!(pages, "page limit reached");
                break;
            }
            let (page, following) = self.fetch_page(url)?;
            builds.extend(page);
            next = following;
            pages += 1;
        }

        let now = chrono::Utc::now();
        let builds: Vec<Build> = builds.into_iter().map(|b| b.into_build(now)).collect();
        tracing::info!(builds = builds.len(), pages, "builds fetched");

        Ok(builds)
    }

    fn describe(&self) -> String {
        format!("Buildkite organization {}", self.org)
    }
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header.
///
/// ```
/// use build_beaver::source::buildkite::next_page;
///
/// let header = r#"<https://api.buildkite.com/v2/organizations/acme/builds?page=2>; rel="next", <https://api.buildkite.com/v2/organizations/acme/builds?page=9>; rel="last""#;
/// assert_eq!(
///     next_page(header).as_deref(),
///     Some("https://api.buildkite.com/v2/organizations/acme/builds?page=2")
/// );
/// ```
#[must_use]
pub fn next_page(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim().strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|param| {
            let param = param.trim();
            param
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"'))
                .is_some_and(|rel| rel.split_whitespace().any(|r| r == "next"))
        });
        is_next.then(|| target.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_link_is_found_among_others() {
        let header = r#"<https://x.test/b?page=1>; rel="first", <https://x.test/b?page=3>; rel="next", <https://x.test/b?page=5>; rel="last""#;
        assert_eq!(next_page(header).as_deref(), Some("https://x.test/b?page=3"));
    }

    #[test]
    fn last_page_has_no_next() {
        let header = r#"<https://x.test/b?page=1>; rel="first", <https://x.test/b?page=4>; rel="prev""#;
        assert_eq!(next_page(header), None);
        assert_eq!(next_page(""), None);
    }

    #[test]
    fn unquoted_and_multi_valued_rel() {
        assert_eq!(next_page("<https://x.test/2>; rel=next").as_deref(), Some("https://x.test/2"));
        assert_eq!(
            next_page(r#"<https://x.test/2>; rel="next last""#).as_deref(),
            Some("https://x.test/2")
        );
    }

    #[test]
    fn malformed_targets_are_skipped() {
        assert_eq!(next_page(r#"https://x.test/2; rel="next""#), None);
    }

    #[test]
    fn first_page_url_carries_paging() {
        let client = BuildkiteClient::new("acme", "token")
            .unwrap()
            .with_paging(25, 3)
            .with_base_url("https://proxy.test/");
        let url = client.first_page_url().unwrap();

        assert_eq!(url.path(), "/v2/organizations/acme/builds");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("per_page".into(), "25".into())));
        assert!(query.contains(&("page".into(), "1".into())));
    }

    #[test]
    fn zero_paging_is_raised() {
        let client = BuildkiteClient::new("acme", "token").unwrap().with_paging(0, 0);
        assert_eq!((client.per_page, client.page_limit), (1, 1));
        assert_eq!(client.describe(), "Buildkite organization acme");
    }
}
