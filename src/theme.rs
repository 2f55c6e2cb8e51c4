//! Visitor theme preference.
//!
//! The rendered stylesheet carries both color schemes; which one is in
//! effect depends on a `theme-light` / `theme-dark` class on `<body>`
//! (explicit choice) or, absent both, the system `prefers-color-scheme`
//! fallback baked into the CSS. A visitor's explicit choice is persisted
//! in shell storage under [`THEME_KEY`] and wins over everything on the
//! next visit.

use crate::config::ThemeDefault;
use crate::shell::Shell;

/// Storage key for the persisted preference.
pub const THEME_KEY: &str = "folio-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }

    /// Value stored under [`THEME_KEY`].
    pub fn storage_value(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn from_stored(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Body class the renderer bakes into the page for a config default.
/// `system` gets no class so the CSS media query decides.
pub fn initial_body_class(default: ThemeDefault) -> Option<&'static str> {
    match default {
        ThemeDefault::Light => Some("theme-light"),
        ThemeDefault::Dark => Some("theme-dark"),
        ThemeDefault::System => None,
    }
}

/// Stored preference wins; anything unreadable falls back to the system
/// scheme.
pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Theme {
    stored
        .and_then(Theme::from_stored)
        .unwrap_or(if prefers_dark { Theme::Dark } else { Theme::Light })
}

/// Theme currently in effect on the shell, derived from the body class
/// with the same fallback chain as [`resolve`].
pub fn current(shell: &Shell) -> Theme {
    if let Some(body) = shell.body() {
        if shell.has_class(body, "theme-dark") {
            return Theme::Dark;
        }
        if shell.has_class(body, "theme-light") {
            return Theme::Light;
        }
    }
    resolve(shell.storage_get(THEME_KEY), shell.prefers_dark())
}

/// Set the body class for `theme`. Does not persist; only an explicit
/// visitor action ([`toggle`]) writes storage.
pub fn apply(shell: &mut Shell, theme: Theme) {
    let Some(body) = shell.body() else {
        log::warn!("theme: page has no body element");
        return;
    };
    shell.remove_class(body, "theme-light");
    shell.remove_class(body, "theme-dark");
    shell.add_class(body, theme.body_class());
}

/// Resolve and apply the startup theme: stored choice, else the config
/// default, else the system scheme.
pub fn init(shell: &mut Shell, default: ThemeDefault) -> Theme {
    let theme = match shell.storage_get(THEME_KEY).and_then(Theme::from_stored) {
        Some(stored) => stored,
        None => match default {
            ThemeDefault::Light => Theme::Light,
            ThemeDefault::Dark => Theme::Dark,
            ThemeDefault::System => resolve(None, shell.prefers_dark()),
        },
    };
    apply(shell, theme);
    theme
}

/// Flip the theme, apply it, and persist the new choice.
pub fn toggle(shell: &mut Shell) -> Theme {
    let next = match current(shell) {
        Theme::Light => Theme::Dark,
        Theme::Dark => Theme::Light,
    };
    apply(shell, next);
    shell.storage_set(THEME_KEY, next.storage_value());
    next
}
