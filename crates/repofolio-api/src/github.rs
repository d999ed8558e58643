use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GITHUB_API_BASE: &str = "https://api.github.com";

/// GitHub caps `per_page` at 100, and we never ask for a second page
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Unauthenticated client for the public user and repo listing endpoints
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise instances (or a local stub server)
    pub fn with_base_url(base_url: String) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "repofolio/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /users/{username}`
    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        let url = self.user_url(username);
        let body = self.get_text(&url, &[], username).await?;
        let user: GitHubUser = serde_json::from_str(&body)?;
        Ok(user)
    }

    /// `GET /users/{username}/repos?per_page=..&sort=updated`
    ///
    /// One page only. `per_page` is clamped to what GitHub accepts.
    pub async fn list_user_repos(&self, username: &str, per_page: u32) -> Result<Vec<GitHubRepo>> {
        let url = self.repos_url(username);
        let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();
        let query = [("per_page", per_page.as_str()), ("sort", "updated")];

        let body = self.get_text(&url, &query, username).await?;
        let repos: Vec<GitHubRepo> = serde_json::from_str(&body)?;
        debug!("Fetched {} repositories for {}", repos.len(), username);
        Ok(repos)
    }

    fn user_url(&self, username: &str) -> String {
        format!("{}/users/{}", self.base_url, urlencoding::encode(username))
    }

    fn repos_url(&self, username: &str) -> String {
        format!("{}/repos", self.user_url(username))
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)], subject: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            warn!("GitHub returned 404 for {}", url);
            return Err(GitHubError::NotFound(subject.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || is_rate_limited(&response) {
            warn!("GitHub rate limit hit while requesting {}", url);
            return Err(GitHubError::RateLimitExceeded);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GitHub request to {} failed with {}", url, status);
            return Err(GitHubError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        Ok(response.text().await?)
    }
}

/// Unauthenticated callers get 403 with a zeroed remaining counter
fn is_rate_limited(response: &reqwest::Response) -> bool {
    response.status() == reqwest::StatusCode::FORBIDDEN
        && response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|h| h.to_str().ok())
            .map(|remaining| remaining.trim() == "0")
            .unwrap_or(false)
}

/// The slice of `/users/{username}` we care about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub public_repos: Option<u32>,
}

/// One entry of `/users/{username}/repos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    /// Kept as the raw ISO string; parsing happens downstream
    #[serde(default)]
    pub updated_at: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
}
