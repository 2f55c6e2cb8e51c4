//! HTML rendering and the `build` pipeline.
//!
//! Produces the site's single document: masthead navigation, one
//! `<section>` per area (home, writing, projects, about), the post and
//! project list views, and the two dialog shells the interaction layer
//! populates. Everything that came out of a content record passes
//! through [`sanitize`](crate::sanitize) on its way in — plain-text
//! fields via `strip_all`, body fields via `allow_subset` — and is then
//! embedded as `PreEscaped`, so the sanitizer is the only trust
//! boundary.
//!
//! ## Reveal stagger
//!
//! List items carry `transition-delay: N*100+50ms` inline so the
//! stylesheet can fade them in one after another. The delay is data;
//! nothing here animates.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html          # The whole site
//! ├── content/
//! │   ├── posts.json      # Source JSON, republished for re-fetching
//! │   └── projects.json
//! └── assets/             # Copied verbatim when source has them
//! ```
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! templating with automatic escaping.

use crate::config::{self, ConfigError, SiteConfig};
use crate::content::{self, ContentError, ContentSet, ContentStore, LoadTicket, Post, Project};
use crate::sanitize;
use crate::shell::Shell;
use crate::theme;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
}

/// Section ids and their nav labels, in display order. The first entry
/// is the home section.
pub const SECTIONS: &[(&str, &str)] = &[
    ("home", "Home"),
    ("posts", "Writing"),
    ("projects", "Projects"),
    ("about", "About"),
];

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Build the site: load config and content, render, write output.
pub fn build(source_dir: &Path, output_dir: &Path) -> Result<(), BuildError> {
    let config = config::load_config(source_dir)?;
    let set = content::load_set(
        &source_dir.join(&config.content.posts),
        &source_dir.join(&config.content.projects),
    )?;
    let store = ContentStore::from_set(set);

    let css = site_css(&config);

    fs::create_dir_all(output_dir)?;
    fs::write(output_dir.join("index.html"), page(&config, &store, &css).into_string())?;
    println!("Generated index.html");

    // Republish the source JSON so the page (and tests) can re-fetch it.
    let content_out = output_dir.join("content");
    fs::create_dir_all(&content_out)?;
    fs::copy(
        source_dir.join(&config.content.posts),
        content_out.join("posts.json"),
    )?;
    fs::copy(
        source_dir.join(&config.content.projects),
        content_out.join("projects.json"),
    )?;
    println!("Copied content JSON");

    let assets = source_dir.join("assets");
    if assets.is_dir() {
        let assets_out = output_dir.join("assets");
        fs::create_dir_all(&assets_out)?;
        copy_dir_recursive(&assets, &assets_out)?;
        println!("Copied assets");
    }

    println!("Site generated at {}", output_dir.display());
    Ok(())
}

/// Stylesheet for a config: generated color properties, then the
/// embedded base styles.
pub fn site_css(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    )
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    meta: &SiteConfig,
    css: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if !meta.site.author.is_empty() {
                    meta name="author" content=(meta.site.author);
                }
                @if !meta.site.description.is_empty() {
                    meta name="description" content=(meta.site.description);
                }
                title { (meta.site.title) }
                style { (css) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders the masthead: brand control, section navigation, theme toggle.
fn masthead(site_title: &str) -> Markup {
    html! {
        header.site-header {
            button.brand data-section="home" { (site_title) }
            nav.site-nav aria-label="Primary" {
                @for (id, label) in SECTIONS {
                    button.nav-control data-section=(id) { (label) }
                }
            }
            button.theme-toggle id="theme-toggle" aria-label="Toggle color theme" { "◐" }
        }
    }
}

fn reveal_style(index: usize) -> String {
    format!("transition-delay: {}ms", index * 100 + 50)
}

// ----------------------------------------------------------------------------
// Posts
// ----------------------------------------------------------------------------

/// One post preview in the list view.
pub fn post_preview(post: &Post, index: usize) -> Markup {
    html! {
        article.post-preview.reveal data-post-id=(post.id) style=(reveal_style(index)) {
            h3.post-title { (PreEscaped(sanitize::strip_all(&post.title))) }
            p.post-meta {
                time datetime=(post.date.format("%Y-%m-%d")) { (post.date.format("%b %-d, %Y")) }
                span.read-time { (PreEscaped(sanitize::strip_all(&post.read_time))) }
            }
            p.post-excerpt { (PreEscaped(sanitize::strip_all(&post.excerpt))) }
            button.read-more data-post-id=(post.id) { "Read more" }
        }
    }
}

/// The post list view. One preview per record, staggered.
pub fn post_list(posts: &[Post]) -> Markup {
    html! {
        @if posts.is_empty() {
            p.empty-note { "Nothing here yet." }
        }
        @for (index, post) in posts.iter().enumerate() {
            (post_preview(post, index))
        }
    }
}

// ----------------------------------------------------------------------------
// Projects
// ----------------------------------------------------------------------------

/// Whether `project` is visible under `facet`. `"all"` shows
/// everything; any other facet requires exact membership, case
/// sensitively.
pub fn filter_matches(project: &Project, facet: &str) -> bool {
    facet == "all" || project.category.iter().any(|c| c == facet)
}

/// One project card in the grid.
pub fn project_card(project: &Project, index: usize) -> Markup {
    html! {
        article.project-card.reveal
            data-project-id=(project.id)
            data-categories=(project.category.join(" "))
            style=(reveal_style(index)) {
            @if let Some(thumb) = &project.thumbnail {
                img.project-thumb src=(thumb) alt=(project.title) loading="lazy";
            }
            h3.project-title { (PreEscaped(sanitize::strip_all(&project.title))) }
            p.project-description { (PreEscaped(sanitize::strip_all(&project.description))) }
            ul.tag-list {
                @for tech in &project.technologies {
                    li.tag { (PreEscaped(sanitize::strip_all(tech))) }
                }
            }
            button.view-details data-project-id=(project.id) { "View details" }
        }
    }
}

/// The project grid under a filter facet. Reveal delays restart from
/// zero for the visible set.
pub fn project_grid(projects: &[Project], facet: &str) -> Markup {
    let visible: Vec<&Project> = projects
        .iter()
        .filter(|p| filter_matches(p, facet))
        .collect();
    html! {
        @if visible.is_empty() {
            p.empty-note { "Nothing here yet." }
        }
        @for (index, project) in visible.iter().enumerate() {
            (project_card(project, index))
        }
    }
}

/// Filter buttons: "All" first, then each category in discovery order.
pub fn filter_buttons(categories: &[&str]) -> Markup {
    html! {
        button.filter-btn.active data-filter="all" { "All" }
        @for cat in categories {
            button.filter-btn data-filter=(cat) { (PreEscaped(sanitize::strip_all(cat))) }
        }
    }
}

// ----------------------------------------------------------------------------
// Dialog shells
// ----------------------------------------------------------------------------

/// Empty post dialog. The controller populates and reveals it.
fn post_modal() -> Markup {
    html! {
        div.modal id="post-modal" role="dialog" aria-modal="true" aria-hidden="true"
            aria-labelledby="post-modal-title" {
            div.modal-content {
                button.modal-close id="post-modal-close" data-close aria-label="Close dialog" { "×" }
                h2.modal-title id="post-modal-title" {}
                p.modal-meta {
                    span id="post-modal-date" {}
                    span id="post-modal-read-time" {}
                }
                div.modal-body id="post-modal-body" {}
            }
        }
    }
}

/// Empty project dialog.
fn project_modal() -> Markup {
    html! {
        div.modal id="project-modal" role="dialog" aria-modal="true" aria-hidden="true"
            aria-labelledby="project-modal-title" {
            div.modal-content {
                button.modal-close id="project-modal-close" data-close aria-label="Close dialog" { "×" }
                h2.modal-title id="project-modal-title" {}
                p.modal-tags id="project-modal-tags" {}
                div.modal-body id="project-modal-body" {}
                ul.tech-list id="project-modal-tech" {}
                p.modal-links {
                    a id="project-modal-live" href="#" target="_blank" rel="noopener" hidden { "Live site" }
                    a id="project-modal-source" href="#" target="_blank" rel="noopener" hidden { "Source" }
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Page assembly
// ----------------------------------------------------------------------------

fn sections(config: &SiteConfig, store: &ContentStore) -> Markup {
    let about_text = if config.site.description.is_empty() {
        "A personal collection of writing and projects."
    } else {
        &config.site.description
    };
    html! {
        main id="content" {
            section.section.active id="home" {
                h1 { (config.site.title) }
                @if !config.site.description.is_empty() {
                    p.lede { (config.site.description) }
                }
                p { "Have a look at the writing and projects sections, or read on below." }
            }
            section.section id="posts" {
                h2 { "Writing" }
                div.post-list id="post-list" {
                    (post_list(store.posts()))
                }
            }
            section.section id="projects" {
                h2 { "Projects" }
                div.filter-bar id="project-filters" {
                    (filter_buttons(&store.categories()))
                }
                div.project-grid id="project-grid" {
                    (project_grid(store.projects(), "all"))
                }
            }
            section.section id="about" {
                h2 { "About" }
                p { (about_text) }
                @if !config.site.author.is_empty() {
                    p.about-author { "Written and built by " (config.site.author) "." }
                }
            }
        }
    }
}

/// The complete document for a config and store.
pub fn page(config: &SiteConfig, store: &ContentStore, css: &str) -> Markup {
    let body_class = theme::initial_body_class(config.theme.default);
    let content = html! {
        (masthead(&config.site.title))
        (sections(config, store))
        (post_modal())
        (project_modal())
    };
    base_document(config, css, body_class, content)
}

/// Fragment shown in a list container whose load failed.
pub fn unavailable_notice(kind: &str) -> Markup {
    html! {
        p.load-error role="alert" {
            "Couldn't load " (kind) " right now. Please try again later."
        }
    }
}

// ----------------------------------------------------------------------------
// Live refresh
// ----------------------------------------------------------------------------

/// Remount the list containers from the store's current content. The
/// filter buttons are rebuilt too, since a new load may change the
/// category set, and the grid drops back to the "all" facet.
pub fn remount_lists(shell: &mut Shell, store: &ContentStore) {
    if let Some(list) = shell.element_by_id("post-list") {
        shell.set_inner_html(list, &post_list(store.posts()).into_string());
    }
    if let Some(filters) = shell.element_by_id("project-filters") {
        shell.set_inner_html(filters, &filter_buttons(&store.categories()).into_string());
    }
    if let Some(grid) = shell.element_by_id("project-grid") {
        shell.set_inner_html(grid, &project_grid(store.projects(), "all").into_string());
    }
}

/// Apply a finished load to the live page. On success the set commits
/// through `ticket` and the list containers remount; a failed load
/// swaps both containers for [`unavailable_notice`] and leaves the
/// store untouched. A superseded ticket changes nothing either way.
/// Returns true when new content landed.
pub fn apply_load(
    shell: &mut Shell,
    store: &mut ContentStore,
    ticket: LoadTicket,
    result: Result<ContentSet, ContentError>,
) -> bool {
    match result {
        Ok(set) => {
            if !store.commit(ticket, set) {
                return false;
            }
            remount_lists(shell, store);
            true
        }
        Err(err) => {
            log::warn!("content load failed: {err}");
            if let Some(list) = shell.element_by_id("post-list") {
                shell.set_inner_html(list, &unavailable_notice("posts").into_string());
            }
            if let Some(grid) = shell.element_by_id("project-grid") {
                shell.set_inner_html(grid, &unavailable_notice("projects").into_string());
            }
            false
        }
    }
}

/// Re-fetch the published content JSON and apply the outcome.
pub fn refresh(
    shell: &mut Shell,
    store: &mut ContentStore,
    posts_url: &str,
    projects_url: &str,
) -> bool {
    let ticket = store.begin_load();
    apply_load(shell, store, ticket, content::fetch_set(posts_url, projects_url))
}

// ============================================================================
// Tests
// ============================================================================
