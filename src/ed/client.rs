// HTTP client for the Ed Discussion REST API.
//
// Read-only, bearer-token authenticated. Thread listings are paginated with
// limit/offset; thread detail lives at a different path depending on the API
// version a token was issued for, so detail fetches try each known shape in
// turn. Requests are issued one at a time.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Default Ed API root (US region).
pub const DEFAULT_ED_API_URL: &str = "https://us.edstem.org/api";

/// Threads requested per listing page.
const PAGE_SIZE: usize = 30;

/// A thread as returned by the listing endpoint. Only the fields the
/// processor reads are kept; everything is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EdThread {
    pub id: Option<u64>,
    pub title: String,
    pub user: Option<EdUser>,
    /// Post body in Ed's document markup
    pub document: String,
    pub created_at: String,
    pub updated_at: String,
    pub votes: i64,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EdUser {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ThreadListResponse {
    #[serde(default)]
    threads: Vec<EdThread>,
}

/// Client for one Ed course.
pub struct EdClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    course_id: u64,
}

impl EdClient {
    /// Create a client for `course_id`, authenticating with `token`.
    pub fn new(base_url: &str, token: &str, course_id: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("edlens/0.1 (participation-analytics)")
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            course_id,
        })
    }

    pub fn course_id(&self) -> u64 {
        self.course_id
    }

    /// GET a URL with bearer auth and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T> {
        debug!(url = %url, "Ed GET request");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Request failed: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ed API {url} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize response from {url}"))
    }

    /// Fetch every thread in the course, optionally filtered by a search query.
    ///
    /// Pages until the API returns a short or empty page. A page that fails
    /// after earlier pages succeeded ends the listing with what was collected;
    /// a failure on the very first page is an error.
    pub async fn list_threads(&self, query: Option<&str>) -> Result<Vec<EdThread>> {
        let url = format!("{}/courses/{}/threads", self.base_url, self.course_id);
        let limit = PAGE_SIZE.to_string();
        let mut threads = Vec::new();
        let mut offset = 0usize;

        loop {
            let offset_str = offset.to_string();
            let mut params: Vec<(&str, &str)> = vec![
                ("limit", &limit),
                ("offset", &offset_str),
                ("filter", "all"),
            ];
            if let Some(q) = query.filter(|q| !q.is_empty()) {
                params.push(("query", q));
            }

            let page: ThreadListResponse = match self.get_json(&url, &params).await {
                Ok(page) => page,
                Err(e) if !threads.is_empty() => {
                    warn!(offset, error = %e, "Thread page failed, stopping pagination");
                    break;
                }
                Err(e) => return Err(e.context("Failed to fetch first page of threads")),
            };

            let batch_len = page.threads.len();
            if batch_len == 0 {
                break;
            }
            threads.extend(page.threads);
            debug!(fetched = threads.len(), "Fetched thread page");

            if batch_len < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }

        info!(threads = threads.len(), "Thread listing complete");
        Ok(threads)
    }

    /// Fetch the full detail payload for one thread.
    ///
    /// The payload shape varies between endpoints, so it is returned as raw
    /// JSON for the merger to dig through.
    pub async fn thread_detail(&self, thread_id: u64) -> Result<Value> {
        let endpoints = [
            (
                format!("{}/courses/{}/threads/{}", self.base_url, self.course_id, thread_id),
                None,
            ),
            (
                format!("{}/courses/{}/threads/{}", self.base_url, self.course_id, thread_id),
                Some(("view", "full")),
            ),
            (format!("{}/threads/{}", self.base_url, thread_id), None),
        ];

        let mut last_err = None;
        for (url, param) in &endpoints {
            let params: Vec<(&str, &str)> = param.iter().copied().collect();
            match self.get_json::<Value>(url, &params).await {
                Ok(detail) => return Ok(detail),
                Err(e) => {
                    debug!(url = %url, error = %e, "Detail endpoint failed, trying next");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) => Err(e.context(format!("Failed to fetch detail for thread {thread_id}"))),
            None => anyhow::bail!("No detail endpoints configured for thread {thread_id}"),
        }
    }
}
