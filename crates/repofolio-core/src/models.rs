use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One public repository, as fetched once per load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u32,
    pub forks: u32,
    /// Raw ISO-8601 string from the API; see `updated_timestamp`
    pub updated_at: Option<String>,
    pub url: String,
    pub homepage_url: Option<String>,
    pub is_fork: bool,
    pub is_archived: bool,
}

impl Repository {
    /// Parsed `updated_at`. Garbage or missing values come back as `None`,
    /// which orders before every real timestamp.
    pub fn updated_timestamp(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(parse_timestamp)
    }

    /// Only absolute http(s) homepages get a "Live" link
    pub fn live_url(&self) -> Option<&str> {
        self.homepage_url
            .as_deref()
            .filter(|url| url.starts_with("http"))
    }
}

/// Accepts full RFC 3339 timestamps and bare `YYYY-MM-DD` dates
pub fn parse_timestamp(iso: &str) -> Option<DateTime<Utc>> {
    let iso = iso.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(iso) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// The profile fields feeding the repo counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub public_repos: Option<u32>,
}
