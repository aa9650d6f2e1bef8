//! Option error types.

use thiserror::Error;

use crate::tmux::ChannelError;

/// Errors raised while marshalling or applying an option
#[derive(Debug, Error)]
pub enum OptionError {
    /// A value failed the codec's domain validation before anything was sent.
    #[error("invalid option value {value:?}: expected {expected}")]
    InvalidValue {
        /// The offending value, as the caller supplied it.
        value: String,
        /// Description of the accepted domain.
        expected: String,
    },

    /// tmux answered a `set-option` with `value is invalid:`.
    #[error("tmux rejected option value: {0}")]
    Rejected(String),

    /// Global options cannot be unset.
    #[error("cannot unset global option {0}")]
    CannotUnsetGlobal(String),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl OptionError {
    pub(crate) fn invalid(value: impl ToString, expected: impl Into<String>) -> Self {
        OptionError::InvalidValue {
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// True for both local validation failures and values tmux refused
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, OptionError::InvalidValue { .. } | OptionError::Rejected(_))
    }
}

pub type Result<T> = std::result::Result<T, OptionError>;
