//! Typed accessors for frequently used options.

use super::error::Result;
use super::store::OptionStore;
use super::value::OptionValue;
use crate::tmux::CommandChannel;

macro_rules! option_accessors {
    ($( $getter:ident, $setter:ident => $name:literal; )*) => {
        /// Options that have a generated getter/setter pair
        pub const ACCESSOR_OPTIONS: &[&str] = &[$($name),*];

        impl<'a, C: CommandChannel> OptionStore<'a, C> {
            $(
                #[doc = concat!("Resolve `", $name, "`.")]
                pub fn $getter(&self) -> Result<Option<OptionValue>> {
                    self.get($name)
                }

                #[doc = concat!("Set `", $name, "`.")]
                pub fn $setter(&self, value: impl Into<OptionValue>) -> Result<OptionValue> {
                    self.set($name, value)
                }
            )*
        }
    };
}

option_accessors! {
    status, set_status => "status";
    status_bg, set_status_bg => "status-bg";
    status_fg, set_status_fg => "status-fg";
    status_attr, set_status_attr => "status-attr";
    status_interval, set_status_interval => "status-interval";
    status_justify, set_status_justify => "status-justify";
    status_keys, set_status_keys => "status-keys";
    status_left, set_status_left => "status-left";
    status_right, set_status_right => "status-right";
    status_utf8, set_status_utf8 => "status-utf8";
    base_index, set_base_index => "base-index";
    history_limit, set_history_limit => "history-limit";
    mode_keys, set_mode_keys => "mode-keys";
    window_status_format, set_window_status_format => "window-status-format";
    window_status_current_format, set_window_status_current_format => "window-status-current-format";
    clock_mode_style, set_clock_mode_style => "clock-mode-style";
}

impl<'a, C: CommandChannel> OptionStore<'a, C> {
    /// Turn the status line off for this store's scope
    pub fn hide_status(&self) -> Result<()> {
        self.set_status(false).map(|_| ())
    }

    /// Turn the status line back on
    pub fn show_status(&self) -> Result<()> {
        self.set_status(true).map(|_| ())
    }
}
