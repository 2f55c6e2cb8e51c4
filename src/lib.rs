//! # Plain Folio
//!
//! A single-binary blog/portfolio site kit. Your content is two JSON
//! files — posts and projects — and the binary builds, serves, and
//! audits the site around them.
//!
//! # Architecture: A Headless Interaction Core
//!
//! The published page is one document with section navigation, filtered
//! project cards, and modal dialogs. Instead of leaving that behavior to
//! a pile of untestable browser script, the crate models it headlessly:
//!
//! ```text
//! content JSON  →  sanitize  →  render (maud)  →  Shell (element tree)
//!                                                    ↑
//!                                 nav / dialog / theme controllers
//! ```
//!
//! A [`shell::Shell`] is an in-memory page — element tree, focus,
//! URL fragment, scroll lock, storage — parsed from the rendered HTML.
//! The dialog and navigation controllers mutate it exactly the way
//! their browser counterparts mutate the DOM, so the whole lifecycle
//! (deep link → section switch → open dialog → focus trap → close) runs
//! under ordinary `cargo test` with no browser in sight.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`markup`] | Permissive HTML parser/serializer — the tree everything else walks |
//! | [`sanitize`] | `strip_all` and `allow_subset`: the only trust boundary for content fields |
//! | [`content`] | Post/Project records, JSON loading, the store with load generations |
//! | [`github`] | Repo stats with an hour-long freshness cache behind a transport trait |
//! | [`render`] | Maud components and the `build` pipeline: previews, cards, dialogs, full page |
//! | [`shell`] | The headless page: tree queries, focusables, fragment, storage |
//! | [`dialog`] | Modal lifecycle: populate, reveal, focus trap, close triggers |
//! | [`nav`] | Section switching, fragment deep links, the home affordance |
//! | [`theme`] | Persisted light/dark preference with system fallback |
//! | [`server`] | Static file server for the output directory |
//! | [`audit`] | Structural accessibility checks over generated HTML |
//! | [`config`] | `config.toml` loading, validation, merging, and color CSS generation |
//! | [`output`] | CLI output formatting — information-first display of check/stats/audit results |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a
//! compile-time HTML macro system, rather than Handlebars or Tera:
//!
//! - **Compile-time checking**: malformed HTML is a build error, not a runtime surprise.
//! - **Type-safe**: template variables are Rust expressions — no stringly-typed lookups.
//! - **XSS-safe by default**: all interpolation is auto-escaped.
//! - **Zero runtime files**: no template directory to ship or get out of sync.
//!
//! ## Own Markup Parser
//!
//! The sanitizer must replace a disallowed element by its *flat* text
//! content — every descendant tag stripped, even individually-allowed
//! ones. Off-the-shelf sanitizers unwrap disallowed tags but keep
//! allowed descendants, which is a different (weaker) contract. The
//! [`markup`] module is a few hundred lines of permissive single-pass
//! parsing that never errors; malformed input degrades to a lossy tree.
//!
//! ## Sanitize at Render, Not at Load
//!
//! Records keep their fields verbatim; every path into HTML goes
//! through [`sanitize`]. Loading stays a pure decode step, and there is
//! exactly one place to look when asking "can this string reach the
//! page unescaped?"
//!
//! ## Last Started Load Wins
//!
//! Content loads replace the store wholesale. When loads overlap, the
//! store's generation counter lets only the newest one commit —
//! a slow stale response can never clobber a newer one. Superseded
//! results are dropped and logged.
//!
//! # The Published Output
//!
//! `build` writes plain HTML with inline CSS plus the republished
//! content JSON. The generated site is self-contained and can be
//! dropped on any file server; `plain-folio serve` is one such server,
//! not a requirement.

pub mod audit;
pub mod config;
pub mod content;
pub mod dialog;
pub mod github;
pub mod markup;
pub mod nav;
pub mod output;
pub mod render;
pub mod sanitize;
pub mod server;
pub mod shell;
pub mod theme;

#[cfg(test)]
pub(crate) mod test_helpers;
