//! Section navigation.
//!
//! The page is one document with a `<section>` per area; exactly one
//! carries the `active` class at a time. Nav controls are buttons with a
//! `data-section` attribute naming their target. Activating a target
//! deactivates everything, activates the matching control/section pair,
//! records the target as the URL fragment, and moves accessibility
//! focus to the section through a throwaway tabindex.

use crate::shell::Shell;

/// Section shown when no deep link applies.
pub const HOME_SECTION: &str = "home";

/// Switch the page to `target`. An unknown target is logged and changes
/// nothing.
pub fn activate(shell: &mut Shell, target: &str) {
    let Some(section) = shell
        .element_by_id(target)
        .filter(|&id| shell.has_class(id, "section"))
    else {
        log::warn!("nav: no section for target {target:?}");
        return;
    };

    for control in shell.elements_with_attr("data-section") {
        shell.remove_class(control, "active");
    }
    for other in shell.elements_by_tag("section") {
        shell.remove_class(other, "active");
    }

    for control in shell.elements_with_attr("data-section") {
        if shell.attr(control, "data-section") == Some(target)
            && shell.has_class(control, "nav-control")
        {
            shell.add_class(control, "active");
        }
    }
    shell.add_class(section, "active");
    shell.set_fragment(target);

    // Sections are not natively focusable; borrow a tabindex just long
    // enough to land focus there.
    shell.set_attr(section, "tabindex", "-1");
    shell.focus(section);
    shell.remove_attr(section, "tabindex");
}

/// Resolve the initial view: the fragment's section when the page was
/// opened with a deep link, the home section otherwise.
pub fn init(shell: &mut Shell) {
    let fragment = shell.fragment().to_string();
    if !fragment.is_empty()
        && shell
            .element_by_id(&fragment)
            .is_some_and(|id| shell.has_class(id, "section"))
    {
        activate(shell, &fragment);
    } else {
        activate(shell, HOME_SECTION);
    }
}

/// The brand/home affordance: always return to the home section, no
/// matter what is active.
pub fn go_home(shell: &mut Shell) {
    activate(shell, HOME_SECTION);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::session_shell;

    fn active_section(shell: &Shell) -> Option<String> {
        shell
            .elements_by_tag("section")
            .into_iter()
            .find(|&id| shell.has_class(id, "active"))
            .and_then(|id| shell.attr(id, "id").map(str::to_string))
    }

    fn active_controls(shell: &Shell) -> Vec<String> {
        shell
            .elements_with_attr("data-section")
            .into_iter()
            .filter(|&id| shell.has_class(id, "active"))
            .filter_map(|id| shell.attr(id, "data-section").map(str::to_string))
            .collect()
    }

    // ========================================================================
    // Activation
    // ========================================================================

    #[test]
    fn activate_switches_section_control_and_fragment() {
        let mut shell = session_shell();
        activate(&mut shell, "about");

        assert_eq!(active_section(&shell).as_deref(), Some("about"));
        assert_eq!(active_controls(&shell), ["about"]);
        assert_eq!(shell.fragment(), "about");
    }

    #[test]
    fn activate_deactivates_the_previous_pair() {
        let mut shell = session_shell();
        activate(&mut shell, "posts");
        activate(&mut shell, "projects");

        assert_eq!(active_section(&shell).as_deref(), Some("projects"));
        assert_eq!(active_controls(&shell), ["projects"]);
    }

    #[test]
    fn activate_moves_focus_to_the_section() {
        let mut shell = session_shell();
        activate(&mut shell, "about");

        let section = shell.element_by_id("about").unwrap();
        assert_eq!(shell.active_element(), Some(section));
        // The borrowed tabindex is gone again.
        assert_eq!(shell.attr(section, "tabindex"), None);
    }

    #[test]
    fn activate_unknown_target_changes_nothing() {
        let mut shell = session_shell();
        activate(&mut shell, "posts");
        activate(&mut shell, "guestbook");

        assert_eq!(active_section(&shell).as_deref(), Some("posts"));
        assert_eq!(shell.fragment(), "posts");
    }

    #[test]
    fn activate_ignores_non_section_ids() {
        let mut shell = session_shell();
        activate(&mut shell, "posts");
        // A real element, but not a section.
        activate(&mut shell, "post-modal");
        assert_eq!(active_section(&shell).as_deref(), Some("posts"));
    }

    // ========================================================================
    // Deep links and home
    // ========================================================================

    #[test]
    fn init_without_fragment_lands_home() {
        let mut shell = session_shell();
        init(&mut shell);
        assert_eq!(active_section(&shell).as_deref(), Some("home"));
    }

    #[test]
    fn init_resolves_deep_link() {
        let mut shell = session_shell();
        shell.set_fragment("projects");
        init(&mut shell);
        assert_eq!(active_section(&shell).as_deref(), Some("projects"));
        assert_eq!(active_controls(&shell), ["projects"]);
    }

    #[test]
    fn init_with_bogus_fragment_falls_back_to_home() {
        let mut shell = session_shell();
        shell.set_fragment("no-such-section");
        init(&mut shell);
        assert_eq!(active_section(&shell).as_deref(), Some("home"));
    }

    #[test]
    fn go_home_works_from_anywhere() {
        let mut shell = session_shell();
        activate(&mut shell, "about");
        go_home(&mut shell);
        assert_eq!(active_section(&shell).as_deref(), Some("home"));
        assert_eq!(shell.fragment(), "home");
    }
}
