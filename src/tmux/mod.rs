mod client;
mod listing;

pub use client::{join_command, split_command, ChannelError, CommandChannel, TmuxClient};
pub use listing::{parse_clients, parse_panes, parse_sessions, parse_windows, Listings};
