//! Structural accessibility checks over generated pages.
//!
//! `audit` walks the output directory, parses every `.html` file, and
//! applies a fixed set of rules against the markup tree. The rules
//! cover what a screen reader or keyboard user hits first: images
//! without alternative text, dialogs missing their ARIA contract,
//! unlabelled controls, a document without a language, duplicated page
//! headings. Findings are data; the CLI formats and prints them and
//! decides the exit status.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use walkdir::WalkDir;

use crate::markup::{self, Element, Node};

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One rule violation in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub file: PathBuf,
    /// Stable rule identifier, e.g. `img-alt`.
    pub rule: &'static str,
    pub detail: String,
}

/// Audit every `.html` file under `dir`. Files are checked in parallel;
/// findings come back sorted by file then rule so output is stable.
pub fn audit_dir(dir: &Path) -> Result<Vec<Finding>, AuditError> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "html")
        {
            pages.push(entry.into_path());
        }
    }

    let mut findings = pages
        .par_iter()
        .map(|path| -> Result<Vec<Finding>, AuditError> {
            let html = std::fs::read_to_string(path)?;
            let rel = path.strip_prefix(dir).unwrap_or(path);
            Ok(audit_html(rel, &html))
        })
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    findings.sort_by(|a, b| (&a.file, a.rule).cmp(&(&b.file, b.rule)));
    Ok(findings)
}

/// Apply all rules to one parsed page. Pure; `file` only labels the
/// findings.
pub fn audit_html(file: &Path, html: &str) -> Vec<Finding> {
    let tree = markup::parse(html);
    let mut elements = Vec::new();
    collect_elements(&tree, &mut elements);

    let mut findings = Vec::new();
    let mut h1_count = 0;
    let mut saw_html_tag = false;

    for el in &elements {
        match el.tag.as_str() {
            "html" => {
                saw_html_tag = true;
                if el.attr("lang").is_none_or(|v| v.trim().is_empty()) {
                    push(&mut findings, file, "document-lang", "html element has no lang".into());
                }
            }
            "img" => {
                if el.attr("alt").is_none_or(|v| v.trim().is_empty()) {
                    let src = el.attr("src").unwrap_or("<no src>");
                    push(&mut findings, file, "img-alt", format!("img {src} has no alt text"));
                }
            }
            "h1" => h1_count += 1,
            "button" | "a" => {
                let has_name = !Node::Element((*el).clone()).text_content().trim().is_empty()
                    || el.attr("aria-label").is_some_and(|v| !v.trim().is_empty());
                if !has_name {
                    push(
                        &mut findings,
                        file,
                        "control-name",
                        format!("{} has no discernible text", el.tag),
                    );
                }
            }
            _ => {}
        }

        if el.attr("role") == Some("dialog") {
            if el.attr("aria-modal").is_none() {
                push(&mut findings, file, "dialog-aria", "dialog lacks aria-modal".into());
            }
            if el.attr("aria-labelledby").is_none() && el.attr("aria-label").is_none() {
                push(&mut findings, file, "dialog-aria", "dialog has no label".into());
            }
        }
    }

    if saw_html_tag && h1_count > 1 {
        push(
            &mut findings,
            file,
            "single-h1",
            format!("page has {h1_count} h1 elements"),
        );
    }

    findings
}

fn push(findings: &mut Vec<Finding>, file: &Path, rule: &'static str, detail: String) {
    findings.push(Finding {
        file: file.to_path_buf(),
        rule,
        detail,
    });
}

fn collect_elements<'a>(nodes: &'a [Node], out: &mut Vec<&'a Element>) {
    for node in nodes {
        if let Node::Element(el) = node {
            out.push(el);
            collect_elements(&el.children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(html: &str) -> Vec<&'static str> {
        audit_html(Path::new("index.html"), html)
            .into_iter()
            .map(|f| f.rule)
            .collect()
    }

    // ========================================================================
    // Individual rules
    // ========================================================================

    #[test]
    fn clean_page_has_no_findings() {
        let html = r#"<html lang="en"><body>
            <h1>Title</h1>
            <img src="x.png" alt="a thing">
            <button>Close</button>
            <a href="/">home</a>
            <div role="dialog" aria-modal="true" aria-labelledby="t"><h2 id="t">T</h2></div>
        </body></html>"#;
        assert!(rules(html).is_empty());
    }

    #[test]
    fn img_without_alt_is_flagged() {
        assert_eq!(rules(r#"<html lang="en"><img src="x.png"></html>"#), ["img-alt"]);
        assert_eq!(rules(r#"<html lang="en"><img src="x.png" alt=" "></html>"#), ["img-alt"]);
    }

    #[test]
    fn dialog_without_aria_contract_is_flagged() {
        let html = r#"<html lang="en"><div role="dialog"><p>hi</p></div></html>"#;
        assert_eq!(rules(html), ["dialog-aria", "dialog-aria"]);
    }

    #[test]
    fn dialog_with_aria_label_passes() {
        let html =
            r#"<html lang="en"><div role="dialog" aria-modal="true" aria-label="Post"></div></html>"#;
        assert!(rules(html).is_empty());
    }

    #[test]
    fn empty_control_is_flagged_unless_labelled() {
        assert_eq!(rules(r#"<html lang="en"><button></button></html>"#), ["control-name"]);
        assert!(rules(r#"<html lang="en"><button aria-label="Close dialog"></button></html>"#)
            .is_empty());
        assert!(rules(r#"<html lang="en"><button><b>x</b></button></html>"#).is_empty());
    }

    #[test]
    fn missing_lang_is_flagged() {
        assert_eq!(rules("<html><body><p>x</p></body></html>"), ["document-lang"]);
    }

    #[test]
    fn multiple_h1_is_flagged() {
        let html = r#"<html lang="en"><h1>a</h1><h1>b</h1></html>"#;
        assert_eq!(rules(html), ["single-h1"]);
    }

    #[test]
    fn fragment_without_html_tag_skips_document_rules() {
        // Audit of a rendered fragment, not a full page.
        assert!(rules("<p>just a fragment</p>").is_empty());
    }

    // ========================================================================
    // The generated site passes its own audit
    // ========================================================================

    #[test]
    fn rendered_page_is_clean() {
        let config = crate::test_helpers::sample_config();
        let store = crate::test_helpers::sample_store();
        let page = crate::render::page(&config, &store, "").into_string();
        let findings = audit_html(Path::new("index.html"), &page);
        assert!(findings.is_empty(), "unexpected findings: {findings:?}");
    }

    // ========================================================================
    // Directory walk
    // ========================================================================

    #[test]
    fn audit_dir_walks_and_sorts() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(
            dir.path().join("a.html"),
            r#"<html lang="en"><img src="x.png"></html>"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("sub/b.html"),
            "<html><p>x</p></html>",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "<img>").unwrap();

        let findings = audit_dir(dir.path()).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].file, Path::new("a.html"));
        assert_eq!(findings[0].rule, "img-alt");
        assert_eq!(findings[1].file, Path::new("sub/b.html"));
        assert_eq!(findings[1].rule, "document-lang");
    }

    #[test]
    fn audit_empty_dir_is_clean() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(audit_dir(dir.path()).unwrap().is_empty());
    }
}
