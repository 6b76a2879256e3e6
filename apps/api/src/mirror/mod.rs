//! Comment mirroring client: replays a local comment to the external forum thread
//! that a deck or trade listing is linked to.
//!
//! The forum protects its comment API with a CSRF token embedded in the thread
//! page and a session cookie set on that same response. The two must pair up, so
//! every post runs in its own session: a fresh cookie jar fetches the thread page,
//! then posts with the token and the cookie that page set.

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use reqwest::{cookie::Jar, Client};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod handlers;

const REQUEST_TIMEOUT_SECS: u64 = 15;
const MAX_COMMENT_CHARS: usize = 1000;
pub const DEFAULT_AUTHOR_NAME: &str = "Anonymous";

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Forum API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("CSRF token not found in thread page")]
    MissingCsrfToken,

    #[error("Invalid comment: {0}")]
    InvalidComment(String),

    #[error("Invalid token pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A comment to replay onto a forum thread.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorComment {
    pub thread_id: String,
    pub body: String,
    pub author_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct ForumCommentRequest<'a> {
    body: &'a str,
    name: &'a str,
}

// ────────────────────────────────────────────────────────────────────────────
// CSRF token extraction
// ────────────────────────────────────────────────────────────────────────────

/// Finds the CSRF token in a thread page.
///
/// Accepts `<meta name="csrf-token" content="...">` in either attribute order,
/// and a hidden `authenticity_token` form input as a last resort.
pub struct CsrfExtractor {
    patterns: Vec<Regex>,
}

impl CsrfExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = [
            r#"(?i)<meta\s[^>]*name=["']csrf-token["'][^>]*content=["']([^"']+)["']"#,
            r#"(?i)<meta\s[^>]*content=["']([^"']+)["'][^>]*name=["']csrf-token["']"#,
            r#"(?i)<input\s[^>]*name=["']authenticity_token["'][^>]*value=["']([^"']+)["']"#,
        ]
        .into_iter()
        .map(Regex::new)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn extract(&self, html: &str) -> Option<String> {
        self.patterns.iter().find_map(|pattern| {
            pattern
                .captures(html)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

/// Trims the comment and checks it against the forum's limits.
/// Returns the trimmed body.
pub fn validate_comment(comment: &MirrorComment) -> Result<&str, MirrorError> {
    let thread_id = comment.thread_id.trim();
    if thread_id.is_empty()
        || !thread_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MirrorError::InvalidComment(
            "thread_id must be non-empty and alphanumeric".to_string(),
        ));
    }

    let body = comment.body.trim();
    if body.is_empty() {
        return Err(MirrorError::InvalidComment("body cannot be empty".to_string()));
    }
    if body.chars().count() > MAX_COMMENT_CHARS {
        return Err(MirrorError::InvalidComment(format!(
            "body exceeds {MAX_COMMENT_CHARS} characters"
        )));
    }

    Ok(body)
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MirrorClient {
    timeout: Duration,
    api_base: String,
    page_base: String,
    extractor: Arc<CsrfExtractor>,
}

impl MirrorClient {
    pub fn new(api_base: &str, page_base: &str) -> Result<Self, MirrorError> {
        Ok(Self {
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            api_base: api_base.trim_end_matches('/').to_string(),
            page_base: page_base.trim_end_matches('/').to_string(),
            extractor: Arc::new(CsrfExtractor::new()?),
        })
    }

    pub fn thread_page_url(&self, thread_id: &str) -> String {
        format!("{}/threads/{}", self.page_base, thread_id)
    }

    fn comments_url(&self, thread_id: &str) -> String {
        format!("{}/threads/{}/comments", self.api_base, thread_id)
    }

    /// HTTP client with an empty cookie jar of its own.
    fn session(&self) -> Result<Client, MirrorError> {
        Ok(Client::builder()
            .cookie_provider(Arc::new(Jar::default()))
            .timeout(self.timeout)
            .build()?)
    }

    /// Loads the thread page and extracts its CSRF token.
    /// The response's session cookie is retained by `session`'s jar.
    pub async fn fetch_csrf_token(
        &self,
        session: &Client,
        page_url: &str,
    ) -> Result<String, MirrorError> {
        let response = session.get(page_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::Api {
                status: status.as_u16(),
                message: format!("thread page returned {status}"),
            });
        }

        let html = response.text().await?;
        let token = self
            .extractor
            .extract(&html)
            .ok_or(MirrorError::MissingCsrfToken)?;

        debug!(page_url, "csrf token extracted");
        Ok(token)
    }

    /// Posts `comment` to its forum thread.
    pub async fn post_comment(&self, comment: &MirrorComment) -> Result<(), MirrorError> {
        let body = validate_comment(comment)?;
        let thread_id = comment.thread_id.trim();
        let name = comment
            .author_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_AUTHOR_NAME);

        let session = self.session()?;
        let page_url = self.thread_page_url(thread_id);
        let token = self.fetch_csrf_token(&session, &page_url).await?;

        let response = session
            .post(self.comments_url(thread_id))
            .header("X-CSRF-Token", token)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Referer", page_url.as_str())
            .json(&ForumCommentRequest { body, name })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(thread_id, status = status.as_u16(), "forum rejected mirrored comment");
            return Err(MirrorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        info!(thread_id, "comment mirrored");
        Ok(())
    }
}
