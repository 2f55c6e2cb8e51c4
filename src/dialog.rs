//! Modal dialog lifecycle.
//!
//! One controller drives both dialog shells the renderer mounts
//! (`#post-modal`, `#project-modal`): open populates the fields from a
//! store record — plain fields through `strip_all`, the body through
//! `allow_subset` — reveals the dialog, locks scrolling and traps
//! keyboard focus; close undoes all of it and hands focus back to
//! whatever element had it before the dialog opened.
//!
//! The focus trap is recomputed on every open, after the content is in
//! place, so links inside a freshly populated body take part in the
//! Tab cycle. At most one dialog is open at a time; opening while
//! another is active is the caller's mistake and is not guarded here.

use crate::content::ContentStore;
use crate::sanitize;
use crate::shell::{NodeId, Shell};

/// Class that makes a dialog visible.
const ACTIVE_CLASS: &str = "active";

/// Tab-cycle bounds for the open dialog. Rebuilt on every open.
#[derive(Debug)]
struct FocusTrap {
    modal: NodeId,
    focusables: Vec<NodeId>,
}

/// Dialog session state: the focus trap and the element to give focus
/// back to on close.
#[derive(Debug, Default)]
pub struct DialogController {
    last_focused: Option<NodeId>,
    trap: Option<FocusTrap>,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a dialog is open.
    pub fn is_open(&self) -> bool {
        self.trap.is_some()
    }

    // ------------------------------------------------------------------
    // Open
    // ------------------------------------------------------------------

    /// Open the post dialog for `id`. An unknown id or a missing mount
    /// point is logged and leaves the page untouched.
    pub fn open_post(&mut self, shell: &mut Shell, store: &ContentStore, id: u64) {
        let post = match store.post(id) {
            Ok(post) => post.clone(),
            Err(err) => {
                log::warn!("dialog: {err}");
                return;
            }
        };
        let Some(modal) = mount_point(shell, "post-modal") else {
            return;
        };

        set_plain(shell, "post-modal-title", &post.title);
        set_plain(shell, "post-modal-date", &post.date.format("%b %-d, %Y").to_string());
        set_plain(shell, "post-modal-read-time", &post.read_time);
        set_body(shell, "post-modal-body", &post.content);

        self.reveal(shell, modal, "post-modal-close");
    }

    /// Open the project dialog for `id`.
    pub fn open_project(&mut self, shell: &mut Shell, store: &ContentStore, id: u64) {
        let project = match store.project(id) {
            Ok(project) => project.clone(),
            Err(err) => {
                log::warn!("dialog: {err}");
                return;
            }
        };
        let Some(modal) = mount_point(shell, "project-modal") else {
            return;
        };

        set_plain(shell, "project-modal-title", &project.title);
        set_plain(shell, "project-modal-tags", &project.category.join(" / "));
        set_body(shell, "project-modal-body", &project.content);

        let tech_items: String = project
            .technologies
            .iter()
            .map(|t| format!("<li>{}</li>", sanitize::strip_all(t)))
            .collect();
        if let Some(list) = shell.element_by_id("project-modal-tech") {
            shell.set_inner_html(list, &tech_items);
        }
        set_link(shell, "project-modal-live", project.links.live.as_deref());
        set_link(shell, "project-modal-source", project.links.source.as_deref());

        self.reveal(shell, modal, "project-modal-close");
    }

    /// Shared tail of both opens: capture focus, show the dialog, lock
    /// scrolling, rebuild the trap over the populated content, and stage
    /// focus on the close control for the next settle.
    fn reveal(&mut self, shell: &mut Shell, modal: NodeId, close_id: &str) {
        self.last_focused = shell.active_element();

        shell.set_attr(modal, "aria-hidden", "false");
        shell.add_class(modal, ACTIVE_CLASS);
        shell.lock_scroll();

        // Any previous trap dies here; only the new bounds apply.
        self.trap = Some(FocusTrap {
            modal,
            focusables: shell.focusables_within(modal),
        });

        match shell.element_by_id(close_id) {
            Some(close) => shell.defer_focus(close),
            None => log::warn!("dialog: close control #{close_id} missing"),
        }
    }

    // ------------------------------------------------------------------
    // Close
    // ------------------------------------------------------------------

    /// Close the open dialog, if any, and restore focus.
    pub fn close(&mut self, shell: &mut Shell) {
        let Some(trap) = self.trap.take() else {
            return;
        };
        shell.set_attr(trap.modal, "aria-hidden", "true");
        shell.remove_class(trap.modal, ACTIVE_CLASS);
        shell.unlock_scroll();
        if let Some(previous) = self.last_focused.take() {
            shell.focus(previous);
        }
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    /// A Tab press while a dialog is open. Returns true when the trap
    /// wrapped focus; false means the press falls through to the normal
    /// order.
    pub fn handle_tab(&mut self, shell: &mut Shell, shift: bool) -> bool {
        let Some(trap) = &self.trap else {
            return false;
        };
        let (Some(&first), Some(&last)) = (trap.focusables.first(), trap.focusables.last()) else {
            return false;
        };
        match shell.active_element() {
            Some(at) if shift && at == first => {
                shell.focus(last);
                true
            }
            Some(at) if !shift && at == last => {
                shell.focus(first);
                true
            }
            _ => false,
        }
    }

    /// Escape closes the open dialog. Returns true when one closed.
    pub fn handle_escape(&mut self, shell: &mut Shell) -> bool {
        if self.trap.is_some() {
            self.close(shell);
            return true;
        }
        false
    }

    /// A click at `target`. Closes when the target is the backdrop of
    /// the open dialog itself (not a descendant pane) or a close
    /// control inside it. Returns true when the dialog closed.
    pub fn handle_click(&mut self, shell: &mut Shell, target: NodeId) -> bool {
        let Some(trap) = &self.trap else {
            return false;
        };
        let on_backdrop = target == trap.modal;
        let on_close_control =
            shell.attr(target, "data-close").is_some() && shell.contains(trap.modal, target);
        if on_backdrop || on_close_control {
            self.close(shell);
            return true;
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Population helpers
// ---------------------------------------------------------------------------

fn mount_point(shell: &Shell, id: &str) -> Option<NodeId> {
    let found = shell.element_by_id(id);
    if found.is_none() {
        log::warn!("dialog: mount point #{id} missing");
    }
    found
}

/// Write a plain-text field. The value goes through `strip_all`, so the
/// inserted subtree is a lone text node whatever the input held.
fn set_plain(shell: &mut Shell, id: &str, value: &str) {
    match shell.element_by_id(id) {
        Some(node) => shell.set_inner_html(node, &sanitize::strip_all(value)),
        None => log::warn!("dialog: field #{id} missing"),
    }
}

/// Write the body field through the allow-list sanitizer.
fn set_body(shell: &mut Shell, id: &str, value: &str) {
    match shell.element_by_id(id) {
        Some(node) => shell.set_inner_html(node, &sanitize::allow_subset(value)),
        None => log::warn!("dialog: field #{id} missing"),
    }
}

/// Point a link anchor at `url`, or hide it when the record has none.
fn set_link(shell: &mut Shell, id: &str, url: Option<&str>) {
    let Some(anchor) = shell.element_by_id(id) else {
        log::warn!("dialog: field #{id} missing");
        return;
    };
    match url {
        Some(url) => {
            shell.set_attr(anchor, "href", url);
            shell.remove_attr(anchor, "hidden");
        }
        None => shell.set_attr(anchor, "hidden", ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_store, session_shell};

    fn open_post_dialog(id: u64) -> (Shell, DialogController) {
        let mut shell = session_shell();
        let mut dialog = DialogController::new();
        dialog.open_post(&mut shell, &sample_store(), id);
        (shell, dialog)
    }

    fn modal(shell: &Shell) -> NodeId {
        shell.element_by_id("post-modal").unwrap()
    }

    // ========================================================================
    // Open
    // ========================================================================

    #[test]
    fn open_populates_fields_and_reveals() {
        let (shell, dialog) = open_post_dialog(1);
        let modal = modal(&shell);
        assert!(dialog.is_open());
        assert_eq!(shell.attr(modal, "aria-hidden"), Some("false"));
        assert!(shell.has_class(modal, "active"));
        assert!(shell.scroll_locked());

        let title = shell.element_by_id("post-modal-title").unwrap();
        assert_eq!(shell.text(title), "First light");
        let date = shell.element_by_id("post-modal-date").unwrap();
        assert_eq!(shell.text(date), "Jan 12, 2026");
        let read_time = shell.element_by_id("post-modal-read-time").unwrap();
        assert_eq!(shell.text(read_time), "3 min read");
        let body = shell.element_by_id("post-modal-body").unwrap();
        assert_eq!(shell.inner_html(body), "<p>Hello <em>there</em>.</p>");
    }

    #[test]
    fn open_unknown_id_leaves_modal_untouched() {
        let (shell, dialog) = open_post_dialog(99);
        let modal = modal(&shell);
        assert!(!dialog.is_open());
        assert_eq!(shell.attr(modal, "aria-hidden"), Some("true"));
        assert!(!shell.scroll_locked());
    }

    #[test]
    fn open_sanitizes_hostile_body() {
        let mut shell = session_shell();
        let mut store = sample_store();
        let ticket = store.begin_load();
        let mut set = crate::test_helpers::sample_set();
        set.posts[0].content = r#"<p>hi<script>steal()</script></p><div onclick="x">y</div>"#.into();
        store.commit(ticket, set);

        DialogController::new().open_post(&mut shell, &store, 1);
        let body = shell.element_by_id("post-modal-body").unwrap();
        assert_eq!(shell.inner_html(body), "<p>histeal()</p>y");
    }

    #[test]
    fn open_defers_focus_to_close_control() {
        let (mut shell, _dialog) = open_post_dialog(1);
        let close = shell.element_by_id("post-modal-close").unwrap();
        assert_ne!(shell.active_element(), Some(close));
        shell.settle();
        assert_eq!(shell.active_element(), Some(close));
    }

    #[test]
    fn open_project_populates_tech_and_links() {
        let mut shell = session_shell();
        let mut dialog = DialogController::new();
        dialog.open_project(&mut shell, &sample_store(), 10);

        let tags = shell.element_by_id("project-modal-tags").unwrap();
        assert_eq!(shell.text(tags), "web / maps");
        let tech = shell.element_by_id("project-modal-tech").unwrap();
        assert_eq!(shell.inner_html(tech), "<li>rust</li><li>sqlite</li>");

        let live = shell.element_by_id("project-modal-live").unwrap();
        assert_eq!(shell.attr(live, "href"), Some("https://example.com"));
        assert_eq!(shell.attr(live, "hidden"), None);
    }

    #[test]
    fn open_project_without_links_hides_anchors() {
        let mut shell = session_shell();
        let mut dialog = DialogController::new();
        dialog.open_project(&mut shell, &sample_store(), 11);

        let live = shell.element_by_id("project-modal-live").unwrap();
        assert!(shell.attr(live, "hidden").is_some());
        let source = shell.element_by_id("project-modal-source").unwrap();
        assert!(shell.attr(source, "hidden").is_some());
    }

    // ========================================================================
    // Close and focus restore
    // ========================================================================

    #[test]
    fn close_hides_and_restores_focus() {
        let mut shell = session_shell();
        let opener = shell.elements_by_tag("button")[0];
        shell.focus(opener);

        let mut dialog = DialogController::new();
        dialog.open_post(&mut shell, &sample_store(), 1);
        shell.settle();
        assert_ne!(shell.active_element(), Some(opener));

        dialog.close(&mut shell);
        let modal = modal(&shell);
        assert!(!dialog.is_open());
        assert_eq!(shell.attr(modal, "aria-hidden"), Some("true"));
        assert!(!shell.has_class(modal, "active"));
        assert!(!shell.scroll_locked());
        assert_eq!(shell.active_element(), Some(opener));
    }

    #[test]
    fn close_without_open_dialog_is_noop() {
        let mut shell = session_shell();
        DialogController::new().close(&mut shell);
        assert!(!shell.scroll_locked());
    }

    // ========================================================================
    // Focus trap
    // ========================================================================

    #[test]
    fn tab_from_last_wraps_to_first() {
        let (mut shell, mut dialog) = open_post_dialog(1);
        let modal = modal(&shell);
        let focusables = shell.focusables_within(modal);

        shell.focus(*focusables.last().unwrap());
        assert!(dialog.handle_tab(&mut shell, false));
        assert_eq!(shell.active_element(), Some(focusables[0]));
    }

    #[test]
    fn shift_tab_from_first_wraps_to_last() {
        let (mut shell, mut dialog) = open_post_dialog(1);
        let modal = modal(&shell);
        let focusables = shell.focusables_within(modal);

        shell.focus(focusables[0]);
        assert!(dialog.handle_tab(&mut shell, true));
        assert_eq!(shell.active_element(), Some(*focusables.last().unwrap()));
    }

    #[test]
    fn tab_in_the_middle_passes_through() {
        let mut shell = session_shell();
        let mut store = sample_store();
        let ticket = store.begin_load();
        let mut set = crate::test_helpers::sample_set();
        // Two links in the body plus the close button = 3 focusables.
        set.posts[0].content =
            r#"<p><a href="/a">a</a> and <a href="/b">b</a></p>"#.to_string();
        store.commit(ticket, set);

        let mut dialog = DialogController::new();
        dialog.open_post(&mut shell, &store, 1);
        let modal = shell.element_by_id("post-modal").unwrap();
        let focusables = shell.focusables_within(modal);
        assert_eq!(focusables.len(), 3);

        shell.focus(focusables[1]);
        assert!(!dialog.handle_tab(&mut shell, false));
        assert_eq!(shell.active_element(), Some(focusables[1]));
    }

    #[test]
    fn trap_includes_links_from_populated_body() {
        let mut shell = session_shell();
        let mut store = sample_store();
        let ticket = store.begin_load();
        let mut set = crate::test_helpers::sample_set();
        set.posts[0].content = r#"<p><a href="/ref">a reference</a></p>"#.to_string();
        store.commit(ticket, set);

        let mut dialog = DialogController::new();
        dialog.open_post(&mut shell, &store, 1);
        let modal = shell.element_by_id("post-modal").unwrap();
        let tags: Vec<_> = shell
            .focusables_within(modal)
            .iter()
            .map(|&id| shell.tag(id).unwrap().to_string())
            .collect();
        assert_eq!(tags, ["button", "a"]);
    }

    #[test]
    fn trap_excludes_hidden_link_anchors() {
        let mut shell = session_shell();
        let mut dialog = DialogController::new();
        // Project 11 carries no live/source links, so its anchors are
        // hidden; the trap must bound on the close control instead.
        dialog.open_project(&mut shell, &sample_store(), 11);

        let modal = shell.element_by_id("project-modal").unwrap();
        let focusables = shell.focusables_within(modal);
        let close = shell.element_by_id("project-modal-close").unwrap();
        assert_eq!(focusables, [close]);

        shell.focus(close);
        assert!(dialog.handle_tab(&mut shell, false));
        assert_eq!(shell.active_element(), Some(close));
    }

    #[test]
    fn reopen_rebuilds_the_trap() {
        let (mut shell, mut dialog) = open_post_dialog(1);
        dialog.close(&mut shell);

        // Second open against the other post; the old trap must not
        // linger.
        dialog.open_post(&mut shell, &sample_store(), 2);
        let modal = modal(&shell);
        let focusables = shell.focusables_within(modal);
        shell.focus(*focusables.last().unwrap());
        assert!(dialog.handle_tab(&mut shell, false));
        assert_eq!(shell.active_element(), Some(focusables[0]));
    }

    #[test]
    fn tab_without_open_dialog_passes_through() {
        let mut shell = session_shell();
        assert!(!DialogController::new().handle_tab(&mut shell, false));
    }

    // ========================================================================
    // Close triggers
    // ========================================================================

    #[test]
    fn escape_closes_open_dialog() {
        let (mut shell, mut dialog) = open_post_dialog(1);
        assert!(dialog.handle_escape(&mut shell));
        assert!(!dialog.is_open());
        assert!(!dialog.handle_escape(&mut shell));
    }

    #[test]
    fn backdrop_self_click_closes() {
        let (mut shell, mut dialog) = open_post_dialog(1);
        let modal = modal(&shell);
        assert!(dialog.handle_click(&mut shell, modal));
        assert!(!dialog.is_open());
    }

    #[test]
    fn click_inside_pane_does_not_close() {
        let (mut shell, mut dialog) = open_post_dialog(1);
        let title = shell.element_by_id("post-modal-title").unwrap();
        assert!(!dialog.handle_click(&mut shell, title));
        assert!(dialog.is_open());
    }

    #[test]
    fn close_control_click_closes() {
        let (mut shell, mut dialog) = open_post_dialog(1);
        let close = shell.element_by_id("post-modal-close").unwrap();
        assert!(dialog.handle_click(&mut shell, close));
        assert!(!dialog.is_open());
    }
}
