//! GitHub repository stats for project cards.
//!
//! A project's source link is reduced to its `owner/repo` path, stats are
//! fetched from the REST API, and results are cached for an hour so a
//! session never hammers the API for the same repo. Failures are never
//! fatal: callers get `None` and render an "unavailable" placeholder.
//!
//! The HTTP layer sits behind [`StatsTransport`] so tests can count
//! calls without a socket.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Freshness window for cached stats: one hour, in milliseconds.
pub const STATS_TTL_MS: u64 = 3_600_000;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("stats unavailable: {0}")]
    Unavailable(String),
}

/// The slice of the repo payload the site shows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoStats {
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub updated_at: DateTime<Utc>,
}

/// Reduce a repository URL to its normalized `owner/repo` path.
///
/// Returns `None` unless the URL parses, points at github.com, and has
/// both segments. Deep links (`/owner/repo/tree/main`) truncate to the
/// repo itself.
pub fn extract_repo_path(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    if host != "github.com" && host != "www.github.com" {
        return None;
    }
    let mut segments = parsed.path().split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return None;
    }
    Some(format!("{owner}/{repo}"))
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// One stats request. Implementations do not cache; that is the
/// client's job.
pub trait StatsTransport: Sync {
    fn repo_stats(&self, api_base: &str, repo_path: &str) -> Result<RepoStats, StatsError>;
}

/// Production transport over the GitHub REST API.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, StatsError> {
        // GitHub rejects requests without a User-Agent.
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("plain-folio/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

impl StatsTransport for HttpTransport {
    fn repo_stats(&self, api_base: &str, repo_path: &str) -> Result<RepoStats, StatsError> {
        let url = format!("{api_base}/repos/{repo_path}");
        Ok(self.client.get(&url).send()?.error_for_status()?.json()?)
    }
}

// ---------------------------------------------------------------------------
// Client with freshness cache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct CacheEntry {
    stats: RepoStats,
    fetched_at_ms: u64,
}

/// Stats lookup with a per-path freshness cache. Session-scoped and
/// unbounded; a site has a handful of repos.
pub struct StatsClient<T: StatsTransport> {
    transport: T,
    api_base: String,
    cache: HashMap<String, CacheEntry>,
}

impl<T: StatsTransport> StatsClient<T> {
    pub fn new(api_base: impl Into<String>, transport: T) -> Self {
        Self {
            transport,
            api_base: api_base.into(),
            cache: HashMap::new(),
        }
    }

    /// Stats for `repo_path`, from cache when fresh. Any failure is
    /// logged and folded to `None`.
    pub fn fetch(&mut self, repo_path: &str) -> Option<RepoStats> {
        self.fetch_at(repo_path, now_ms())
    }

    /// Clock-injected variant of [`fetch`](Self::fetch).
    pub fn fetch_at(&mut self, repo_path: &str, now_ms: u64) -> Option<RepoStats> {
        if let Some(entry) = self.cache.get(repo_path) {
            if now_ms.saturating_sub(entry.fetched_at_ms) < STATS_TTL_MS {
                return Some(entry.stats.clone());
            }
        }
        match self.transport.repo_stats(&self.api_base, repo_path) {
            Ok(stats) => {
                self.cache.insert(
                    repo_path.to_string(),
                    CacheEntry {
                        stats: stats.clone(),
                        fetched_at_ms: now_ms,
                    },
                );
                Some(stats)
            }
            Err(err) => {
                log::warn!("repo stats for {repo_path} unavailable: {err}");
                None
            }
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
