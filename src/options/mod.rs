//! Typed tmux options.
//!
//! [`Codec`]s convert between the text tmux prints and [`OptionValue`]s, the
//! registry maps option names to codecs, and [`OptionStore`] resolves options
//! against one server, session or window table.

mod accessors;
mod codec;
mod error;
mod registry;
mod store;
mod value;

pub use accessors::ACCESSOR_OPTIONS;
pub use codec::{Codec, SymbolSet, ATTR, BELL_ACTION, CLOCK_MODE_STYLE, COLOR, JUSTIFICATION, KEYMAP};
pub use error::{OptionError, Result};
pub use registry::{canonical_name, codec_for, known_options};
pub use store::{NamePattern, OptionKind, OptionMap, OptionStore, INVALID_VALUE_MARKER};
pub use value::{OptionValue, DEFAULT_TOKEN, NONE_TOKEN};
