//! Shared test utilities for the plain-folio test suite.
//!
//! Provides canned content records, a stock config, a populated store,
//! a rendered-page shell for interaction tests, and a temp source
//! directory for pipeline tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let store = sample_store();
//! let mut shell = session_shell();
//! crate::nav::init(&mut shell);
//! ```

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::content::{ContentSet, ContentStore, Post, Project, ProjectLinks};
use crate::render;
use crate::shell::Shell;

// =========================================================================
// Records
// =========================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Three posts, enough for stagger and lookup tests.
pub fn sample_posts() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            title: "First light".to_string(),
            date: date(2026, 1, 12),
            excerpt: "Where this site came from.".to_string(),
            content: "<p>Hello <em>there</em>.</p>".to_string(),
            read_time: "3 min read".to_string(),
        },
        Post {
            id: 2,
            title: "Build logs".to_string(),
            date: date(2026, 2, 3),
            excerpt: "Notes from the workbench.".to_string(),
            content: "<p>More words.</p>".to_string(),
            read_time: "6 min read".to_string(),
        },
        Post {
            id: 3,
            title: "On sharpening".to_string(),
            date: date(2026, 3, 20),
            excerpt: "Tools deserve care.".to_string(),
            content: "<p>Keep the edge.</p>".to_string(),
            read_time: "4 min read".to_string(),
        },
    ]
}

/// Two projects whose categories discover as `web, maps, art`.
pub fn sample_projects() -> Vec<Project> {
    vec![
        Project {
            id: 10,
            title: "Trail mapper".to_string(),
            description: "Offline hiking maps.".to_string(),
            content: "<p>Maps without a signal.</p>".to_string(),
            category: vec!["web".to_string(), "maps".to_string()],
            technologies: vec!["rust".to_string(), "sqlite".to_string()],
            thumbnail: Some("assets/trail.png".to_string()),
            links: ProjectLinks {
                live: Some("https://example.com".to_string()),
                source: Some("https://github.com/u/trail".to_string()),
            },
        },
        Project {
            id: 11,
            title: "Pixel sorter".to_string(),
            description: "Glitch art toy.".to_string(),
            content: "<p>Sorting pixels.</p>".to_string(),
            category: vec!["art".to_string(), "web".to_string()],
            technologies: vec!["rust".to_string()],
            thumbnail: None,
            links: ProjectLinks::default(),
        },
    ]
}

pub fn sample_set() -> ContentSet {
    ContentSet {
        posts: sample_posts(),
        projects: sample_projects(),
    }
}

pub fn sample_store() -> ContentStore {
    ContentStore::from_set(sample_set())
}

pub fn sample_config() -> SiteConfig {
    SiteConfig::default()
}

// =========================================================================
// Rendered page and shell
// =========================================================================

/// A shell loaded from the fully rendered sample page, ready for the
/// navigation and dialog controllers.
pub fn session_shell() -> Shell {
    let html = render::page(&sample_config(), &sample_store(), "").into_string();
    Shell::from_html(&html)
}

// =========================================================================
// Source directory
// =========================================================================

/// A temp source directory holding the sample content JSON, shaped like
/// what `build` expects.
pub fn sample_source_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let posts = serde_json::json!({ "posts": sample_posts() });
    let projects = serde_json::json!({ "projects": sample_projects() });
    std::fs::write(
        tmp.path().join("posts.json"),
        serde_json::to_string_pretty(&posts).unwrap(),
    )
    .unwrap();
    std::fs::write(
        tmp.path().join("projects.json"),
        serde_json::to_string_pretty(&projects).unwrap(),
    )
    .unwrap();
    tmp
}
