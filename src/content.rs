//! Content records and the store that holds them.
//!
//! Posts and projects arrive as JSON (a local file under the content
//! directory, or a remote URL), get decoded into typed records, and are
//! replaced wholesale on every successful load. The store hands out
//! load tickets so that when loads overlap, only the newest one may
//! commit; superseded results are dropped and logged.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("no {kind} with id {id}")]
    NotFound { kind: &'static str, id: u64 },
}

/// A blog post. `content` is an HTML subset and is sanitized at render
/// time, never at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique within one load.
    pub id: u64,
    pub title: String,
    /// ISO-8601 calendar date.
    pub date: NaiveDate,
    /// Plain-text teaser shown on the list view.
    pub excerpt: String,
    /// Body, HTML subset.
    pub content: String,
    /// Display string, e.g. "4 min read".
    pub read_time: String,
}

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Long-form body, HTML subset.
    pub content: String,
    /// Facets used by the grid filter. Order matters for discovery.
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub links: ProjectLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One complete load: both collections, taken together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentSet {
    pub posts: Vec<Post>,
    pub projects: Vec<Project>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PostsEnvelope {
    posts: Vec<Post>,
}

#[derive(Deserialize)]
struct ProjectsEnvelope {
    projects: Vec<Project>,
}

pub fn parse_posts(json: &str) -> Result<Vec<Post>, ContentError> {
    Ok(serde_json::from_str::<PostsEnvelope>(json)?.posts)
}

pub fn parse_projects(json: &str) -> Result<Vec<Project>, ContentError> {
    Ok(serde_json::from_str::<ProjectsEnvelope>(json)?.projects)
}

pub fn load_posts(path: &Path) -> Result<Vec<Post>, ContentError> {
    parse_posts(&std::fs::read_to_string(path)?)
}

pub fn load_projects(path: &Path) -> Result<Vec<Project>, ContentError> {
    parse_projects(&std::fs::read_to_string(path)?)
}

/// One-shot fetch. A non-success status is a `Network` error; there is
/// no retry here, callers decide what a failed load means for the page.
pub fn fetch_posts(url: &str) -> Result<Vec<Post>, ContentError> {
    let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    parse_posts(&body)
}

pub fn fetch_projects(url: &str) -> Result<Vec<Project>, ContentError> {
    let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    parse_projects(&body)
}

/// Load both collections in one go.
pub fn load_set(posts_path: &Path, projects_path: &Path) -> Result<ContentSet, ContentError> {
    Ok(ContentSet {
        posts: load_posts(posts_path)?,
        projects: load_projects(projects_path)?,
    })
}

/// Fetch both collections from their published URLs.
pub fn fetch_set(posts_url: &str, projects_url: &str) -> Result<ContentSet, ContentError> {
    Ok(ContentSet {
        posts: fetch_posts(posts_url)?,
        projects: fetch_projects(projects_url)?,
    })
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Ticket for one load attempt. Only the newest outstanding ticket may
/// commit its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Holds the current content. Single-owner, mutated in place; loads
/// that lose the ticket race leave it untouched.
#[derive(Debug, Default)]
pub struct ContentStore {
    posts: Vec<Post>,
    projects: Vec<Project>,
    generation: u64,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store already holding `set`, for callers that load once.
    pub fn from_set(set: ContentSet) -> Self {
        Self {
            posts: set.posts,
            projects: set.projects,
            generation: 1,
        }
    }

    /// Start a load. The returned ticket supersedes all earlier ones.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Commit a finished load. Returns false (and changes nothing) when
    /// a newer load has started since `ticket` was issued.
    pub fn commit(&mut self, ticket: LoadTicket, set: ContentSet) -> bool {
        if ticket.0 != self.generation {
            log::info!(
                "discarding stale content load (ticket {}, current {})",
                ticket.0,
                self.generation
            );
            return false;
        }
        self.posts = set.posts;
        self.projects = set.projects;
        true
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn post(&self, id: u64) -> Result<&Post, ContentError> {
        self.posts
            .iter()
            .find(|p| p.id == id)
            .ok_or(ContentError::NotFound { kind: "post", id })
    }

    pub fn project(&self, id: u64) -> Result<&Project, ContentError> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or(ContentError::NotFound { kind: "project", id })
    }

    /// Distinct project categories, in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for project in &self.projects {
            for cat in &project.category {
                if !seen.contains(&cat.as_str()) {
                    seen.push(cat);
                }
            }
        }
        seen
    }
}
