use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::codec::{Codec, ATTR, BELL_ACTION, CLOCK_MODE_STYLE, COLOR, JUSTIFICATION, KEYMAP};

/// Option name to codec table. Names missing here are passed through as opaque strings.
static REGISTRY: Lazy<HashMap<&'static str, Codec>> = Lazy::new(|| {
    let color = Codec::Enumerated(&COLOR);
    let attr = Codec::Enumerated(&ATTR);
    let keymap = Codec::Enumerated(&KEYMAP);

    HashMap::from([
        ("base-index", Codec::Integer),
        ("bell-action", Codec::Enumerated(&BELL_ACTION)),
        ("buffer-limit", Codec::Integer),
        ("default-command", Codec::String),
        ("default-path", Codec::String),
        ("default-shell", Codec::String),
        ("default-terminal", Codec::String),
        ("detach-on-destroy", Codec::Boolean),
        ("display-panes-colour", color),
        ("display-panes-active-colour", color),
        ("display-panes-time", Codec::Integer),
        ("display-time", Codec::Integer),
        ("history-limit", Codec::Integer),
        ("lock-after-time", Codec::Integer),
        ("lock-command", Codec::String),
        ("lock-server", Codec::Boolean),
        ("message-attr", attr),
        ("message-bg", color),
        ("message-fg", color),
        ("message-limit", Codec::Integer),
        ("mouse-select-pane", Codec::Boolean),
        ("pane-active-border-bg", color),
        ("pane-active-border-fg", color),
        ("pane-border-bg", color),
        ("pane-border-fg", color),
        // Key combinations such as C-b are kept as plain symbols
        ("prefix", Codec::Symbol),
        ("repeat-time", Codec::Integer),
        ("set-remain-on-exit", Codec::Boolean),
        ("set-titles", Codec::Boolean),
        ("set-titles-string", Codec::String),
        ("status", Codec::Boolean),
        ("status-attr", attr),
        ("status-bg", color),
        ("status-fg", color),
        ("status-interval", Codec::Integer),
        ("status-justify", Codec::Enumerated(&JUSTIFICATION)),
        ("status-keys", keymap),
        ("status-left", Codec::String),
        ("status-left-attr", attr),
        ("status-left-bg", color),
        ("status-left-fg", color),
        ("status-left-length", Codec::Integer),
        ("status-right", Codec::String),
        ("status-right-attr", attr),
        ("status-right-bg", color),
        ("status-right-fg", color),
        ("status-right-length", Codec::Integer),
        ("status-utf8", Codec::Boolean),
        ("terminal-overrides", Codec::String),
        ("update-environment", Codec::WordArray),
        ("visual-activity", Codec::Boolean),
        ("visual-bell", Codec::Boolean),
        ("visual-content", Codec::Boolean),
        ("escape-time", Codec::Integer),
        ("quiet", Codec::Boolean),
        ("aggressive-resize", Codec::Boolean),
        ("alternate-screen", Codec::Boolean),
        ("automatic-rename", Codec::Boolean),
        ("clock-mode-colour", color),
        ("clock-mode-style", Codec::Enumerated(&CLOCK_MODE_STYLE)),
        ("force-height", Codec::Integer),
        ("force-width", Codec::Integer),
        ("main-pane-height", Codec::Integer),
        ("main-pane-width", Codec::Integer),
        ("mode-attr", attr),
        ("mode-bg", color),
        ("mode-fg", color),
        ("mode-keys", keymap),
        ("mode-mouse", Codec::Boolean),
        ("monitor-activity", Codec::Boolean),
        ("monitor-content", Codec::String),
        ("remain-on-exit", Codec::Boolean),
        ("synchronize-panes", Codec::Boolean),
        ("utf8", Codec::Boolean),
        ("window-status-alert-attr", attr),
        ("window-status-alert-bg", color),
        ("window-status-alert-fg", color),
        ("window-status-attr", attr),
        ("window-status-bg", color),
        ("window-status-current-attr", attr),
        ("window-status-current-bg", color),
        ("window-status-current-fg", color),
        ("window-status-current-format", Codec::String),
        ("window-status-fg", color),
        ("window-status-format", Codec::String),
        ("word-separators", Codec::CharArray),
        ("xterm-keys", Codec::Boolean),
    ])
});

/// Normalize an option name, accepting the underscore alias (`status_bg`).
/// User options (`@name`) are left untouched.
pub fn canonical_name(name: &str) -> Cow<'_, str> {
    if name.contains('_') && !name.starts_with('@') {
        Cow::Owned(name.replace('_', "-"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Look up the codec for an option, if it has one
pub fn codec_for(name: &str) -> Option<Codec> {
    REGISTRY.get(canonical_name(name).as_ref()).copied()
}

/// All registered option names, sorted
pub fn known_options() -> Vec<&'static str> {
    let mut names: Vec<_> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}
