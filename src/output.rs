//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary
//! display for every entity (post, project, finding) is its semantic
//! identity — title and positional index — with details shown as
//! indented context lines. This makes `check` readable as a content
//! inventory while still letting users trace records back to fields.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts
//! 001 First light (3 min read)
//!     Date: 2026-01-12
//!     Where this site came from.
//!
//! Projects
//! 001 Trail mapper [web, maps]
//!     Offline hiking maps.
//!     Source: https://github.com/u/trail
//!
//! Config
//!     Title: Plain Folio
//!     Theme default: system
//! ```
//!
//! ## Stats
//!
//! ```text
//! 001 Trail mapper → u/trail
//!     42 stars, 3 forks, updated 2026-03-01
//! 002 Pixel sorter → (no source link)
//! ```
//!
//! ## Audit
//!
//! ```text
//! index.html
//!     img-alt: img hero.png has no alt text
//!
//! 1 finding in 1 file
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::audit::Finding;
use crate::config::{SiteConfig, ThemeDefault};
use crate::content::ContentSet;
use crate::github::RepoStats;
use crate::markup;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Truncate text to `max` characters, appending `...` if truncated.
/// Cuts on a char boundary so multibyte text never splits mid-codepoint.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// One-line plain-text preview of an HTML-subset field.
fn preview(html: &str, max: usize) -> String {
    let plain = markup::text_content(&markup::parse(html));
    truncate_desc(plain.split_whitespace().collect::<Vec<_>>().join(" ").trim(), max)
}

// ============================================================================
// Check output
// ============================================================================

/// Format the content inventory for `check` and `build`.
pub fn format_check_output(config: &SiteConfig, set: &ContentSet) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Posts".to_string());
    for (i, post) in set.posts.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            post.title,
            post.read_time
        ));
        lines.push(format!("    Date: {}", post.date.format("%Y-%m-%d")));
        let teaser = truncate_desc(post.excerpt.trim(), 60);
        if !teaser.is_empty() {
            lines.push(format!("    {teaser}"));
        }
    }

    lines.push(String::new());
    lines.push("Projects".to_string());
    for (i, project) in set.projects.iter().enumerate() {
        let facets = if project.category.is_empty() {
            String::new()
        } else {
            format!(" [{}]", project.category.join(", "))
        };
        lines.push(format!("{} {}{}", format_index(i + 1), project.title, facets));
        let desc = preview(&project.description, 60);
        if !desc.is_empty() {
            lines.push(format!("    {desc}"));
        }
        if let Some(source) = &project.links.source {
            lines.push(format!("    Source: {source}"));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    lines.push(format!("    Title: {}", config.site.title));
    let theme = match config.theme.default {
        ThemeDefault::Light => "light",
        ThemeDefault::Dark => "dark",
        ThemeDefault::System => "system",
    };
    lines.push(format!("    Theme default: {theme}"));

    lines
}

/// Print check output to stdout.
pub fn print_check_output(config: &SiteConfig, set: &ContentSet) {
    for line in format_check_output(config, set) {
        println!("{}", line);
    }
}

// ============================================================================
// Stats output
// ============================================================================

/// Format one project's repo stats entry.
///
/// `repo` is `None` when the project has no GitHub source link; `stats`
/// is `None` when the lookup failed and the placeholder applies.
pub fn format_stats_entry(
    index: usize,
    title: &str,
    repo: Option<&str>,
    stats: Option<&RepoStats>,
) -> Vec<String> {
    let Some(repo) = repo else {
        return vec![format!(
            "{} {} \u{2192} (no source link)",
            format_index(index),
            title
        )];
    };
    let mut lines = vec![format!("{} {} \u{2192} {}", format_index(index), title, repo)];
    match stats {
        Some(stats) => lines.push(format!(
            "    {} stars, {} forks, updated {}",
            stats.stargazers_count,
            stats.forks_count,
            stats.updated_at.format("%Y-%m-%d")
        )),
        None => lines.push("    stats unavailable".to_string()),
    }
    lines
}

// ============================================================================
// Audit output
// ============================================================================

/// Format audit findings grouped by file, with a closing count line.
pub fn format_audit_output(findings: &[Finding]) -> Vec<String> {
    if findings.is_empty() {
        return vec!["No findings".to_string()];
    }

    let mut lines = Vec::new();
    let mut current_file = None;
    for finding in findings {
        if current_file != Some(&finding.file) {
            if current_file.is_some() {
                lines.push(String::new());
            }
            lines.push(finding.file.display().to_string());
            current_file = Some(&finding.file);
        }
        lines.push(format!("    {}: {}", finding.rule, finding.detail));
    }

    let files: std::collections::HashSet<_> = findings.iter().map(|f| &f.file).collect();
    lines.push(String::new());
    lines.push(format!(
        "{} finding{} in {} file{}",
        findings.len(),
        if findings.len() == 1 { "" } else { "s" },
        files.len(),
        if files.len() == 1 { "" } else { "s" },
    ));
    lines
}

/// Print audit output to stdout.
pub fn print_audit_output(findings: &[Finding]) {
    for line in format_audit_output(findings) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_config, sample_set};
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn truncate_desc_caps_length() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
        let text = "a".repeat(50);
        assert_eq!(truncate_desc(&text, 40), format!("{}...", "a".repeat(40)));
    }

    #[test]
    fn truncate_desc_respects_char_boundaries() {
        let text = "é".repeat(70);
        assert_eq!(truncate_desc(&text, 60), format!("{}...", "é".repeat(60)));
        assert_eq!(truncate_desc("日本語のメモ", 60), "日本語のメモ");
    }

    #[test]
    fn check_output_handles_multibyte_excerpts() {
        let mut set = sample_set();
        set.posts[0].excerpt = "маршрут ".repeat(12);
        let lines = format_check_output(&sample_config(), &set);
        assert!(lines.iter().any(|l| l.ends_with("...")));
    }

    #[test]
    fn preview_strips_markup_and_squashes_whitespace() {
        assert_eq!(preview("<p>Hello  <b>world</b></p>", 60), "Hello world");
    }

    // =========================================================================
    // Check output
    // =========================================================================

    #[test]
    fn check_output_lists_posts_and_projects() {
        let lines = format_check_output(&sample_config(), &sample_set());
        let joined = lines.join("\n");
        assert!(joined.contains("Posts"));
        assert!(joined.contains("001 First light (3 min read)"));
        assert!(joined.contains("    Date: 2026-01-12"));
        assert!(joined.contains("Projects"));
        assert!(joined.contains("001 Trail mapper [web, maps]"));
        assert!(joined.contains("    Source: https://github.com/u/trail"));
    }

    #[test]
    fn check_output_shows_config_section() {
        let lines = format_check_output(&sample_config(), &sample_set());
        let joined = lines.join("\n");
        assert!(joined.contains("Config"));
        assert!(joined.contains("    Title: "));
        assert!(joined.contains("    Theme default: system"));
    }

    #[test]
    fn check_output_with_empty_content() {
        let lines = format_check_output(&sample_config(), &ContentSet::default());
        assert_eq!(lines[0], "Posts");
        assert!(lines.contains(&"Projects".to_string()));
    }

    // =========================================================================
    // Stats output
    // =========================================================================

    #[test]
    fn stats_entry_with_stats() {
        let stats = crate::github::tests::sample_stats(42);
        let lines = format_stats_entry(1, "Trail mapper", Some("u/trail"), Some(&stats));
        assert_eq!(lines[0], "001 Trail mapper \u{2192} u/trail");
        assert_eq!(lines[1], "    42 stars, 3 forks, updated 2026-03-01");
    }

    #[test]
    fn stats_entry_unavailable() {
        let lines = format_stats_entry(2, "Pixel sorter", Some("u/pixels"), None);
        assert_eq!(lines[1], "    stats unavailable");
    }

    #[test]
    fn stats_entry_without_source_link() {
        let lines = format_stats_entry(3, "Zine", None, None);
        assert_eq!(lines, vec!["003 Zine \u{2192} (no source link)"]);
    }

    // =========================================================================
    // Audit output
    // =========================================================================

    #[test]
    fn audit_output_empty_is_clean() {
        assert_eq!(format_audit_output(&[]), vec!["No findings"]);
    }

    #[test]
    fn audit_output_groups_by_file_and_counts() {
        let findings = vec![
            Finding {
                file: PathBuf::from("index.html"),
                rule: "img-alt",
                detail: "img hero.png has no alt text".to_string(),
            },
            Finding {
                file: PathBuf::from("index.html"),
                rule: "single-h1",
                detail: "page has 2 h1 elements".to_string(),
            },
            Finding {
                file: PathBuf::from("other.html"),
                rule: "document-lang",
                detail: "html element has no lang".to_string(),
            },
        ];
        let lines = format_audit_output(&findings);
        assert_eq!(lines[0], "index.html");
        assert_eq!(lines[1], "    img-alt: img hero.png has no alt text");
        assert_eq!(lines[2], "    single-h1: page has 2 h1 elements");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "other.html");
        assert_eq!(lines.last().unwrap(), "3 findings in 2 files");
    }

    #[test]
    fn audit_output_singular_count() {
        let findings = vec![Finding {
            file: PathBuf::from("index.html"),
            rule: "img-alt",
            detail: "x".to_string(),
        }];
        assert_eq!(format_audit_output(&findings).last().unwrap(), "1 finding in 1 file");
    }
}
