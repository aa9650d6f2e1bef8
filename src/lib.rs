//! Typed access to tmux options.
//!
//! ```no_run
//! use tmux_opts::options::{OptionStore, OptionValue};
//! use tmux_opts::tmux::TmuxClient;
//!
//! let client = TmuxClient::new();
//! let session = OptionStore::session(&client, "work");
//! session.set("status-bg", OptionValue::symbol("blue"))?;
//! let interval = session.get("status_interval")?;
//! # Ok::<(), tmux_opts::options::OptionError>(())
//! ```

pub mod config;
pub mod filter;
pub mod options;
pub mod tmux;

pub use config::ClientConfig;
pub use filter::{filter, Field, Predicate, Record, RecordSet};
pub use options::{OptionError, OptionKind, OptionStore, OptionValue};
pub use tmux::{CommandChannel, TmuxClient};
