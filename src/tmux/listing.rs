use tracing::warn;

use super::client::{join_command, ChannelError, CommandChannel};
use crate::filter::{Field, Predicate, Record, RecordSet};

/// How a column of a `-F` listing is decoded
#[derive(Debug, Clone, Copy)]
enum Column {
    Text(&'static str),
    Number(&'static str),
    /// `1`/`0`, or a count where anything above zero means true
    Flag(&'static str),
    /// Number that tmux prints as an empty string when unset
    OptionalNumber(&'static str),
}

/// A listing format: the `-F` string and how to read each `|`-separated column.
/// The last column may itself contain `|`.
struct Layout {
    format: &'static str,
    columns: &'static [Column],
}

// Format: windows|created|width|height|group|attached|name
const SESSIONS: Layout = Layout {
    format: "#{session_windows}|#{session_created}|#{session_width}|#{session_height}|#{session_group}|#{session_attached}|#{session_name}",
    columns: &[
        Column::Number("windows"),
        Column::Number("created"),
        Column::Number("width"),
        Column::Number("height"),
        Column::OptionalNumber("group"),
        Column::Flag("attached"),
        Column::Text("name"),
    ],
};

// Format: index|width|height|active|name
const WINDOWS: Layout = Layout {
    format: "#{window_index}|#{window_width}|#{window_height}|#{window_active}|#{window_name}",
    columns: &[
        Column::Number("index"),
        Column::Number("width"),
        Column::Number("height"),
        Column::Flag("active"),
        Column::Text("name"),
    ],
};

// Format: index|id|width|height|active|command
const PANES: Layout = Layout {
    format: "#{pane_index}|#{pane_id}|#{pane_width}|#{pane_height}|#{pane_active}|#{pane_current_command}",
    columns: &[
        Column::Number("index"),
        Column::Text("id"),
        Column::Number("width"),
        Column::Number("height"),
        Column::Flag("active"),
        Column::Text("command"),
    ],
};

// Format: width|height|utf8|device|term|session
const CLIENTS: Layout = Layout {
    format: "#{client_width}|#{client_height}|#{client_utf8}|#{client_tty}|#{client_termname}|#{session_name}",
    columns: &[
        Column::Number("width"),
        Column::Number("height"),
        Column::Flag("utf8"),
        Column::Text("device"),
        Column::Text("term"),
        Column::Text("session"),
    ],
};

/// Parse one listing line, or `None` if it does not fit the layout
fn parse_line(line: &str, layout: &Layout) -> Option<Record> {
    let parts: Vec<&str> = line.splitn(layout.columns.len(), '|').collect();
    if parts.len() != layout.columns.len() {
        return None;
    }

    let mut record = Record::new();
    for (column, raw) in layout.columns.iter().zip(parts) {
        match *column {
            Column::Text(name) => {
                record.insert(name.to_string(), Field::from(raw));
            }
            Column::Number(name) => {
                record.insert(name.to_string(), Field::Number(raw.parse().ok()?));
            }
            Column::Flag(name) => {
                let count: i64 = raw.parse().ok()?;
                record.insert(name.to_string(), Field::Flag(count > 0));
            }
            Column::OptionalNumber(name) => {
                if !raw.is_empty() {
                    record.insert(name.to_string(), Field::Number(raw.parse().ok()?));
                }
            }
        }
    }
    Some(record)
}

fn parse_listing<K>(
    output: &str,
    layout: &Layout,
    key: impl Fn(&Record) -> Option<K>,
) -> RecordSet<K> {
    let mut records = RecordSet::new();
    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        match parse_line(line, layout).and_then(|record| Some((key(&record)?, record))) {
            Some((k, record)) => records.push(k, record),
            None => warn!(line, "skipping malformed listing line"),
        }
    }
    records
}

fn text_key(field: &'static str) -> impl Fn(&Record) -> Option<String> {
    move |record| match record.get(field) {
        Some(Field::Text(text)) => Some(text.clone()),
        _ => None,
    }
}

fn number_key(field: &'static str) -> impl Fn(&Record) -> Option<i64> {
    move |record| match record.get(field) {
        Some(Field::Number(n)) => Some(*n),
        _ => None,
    }
}

/// Sessions keyed by name
pub fn parse_sessions(output: &str) -> RecordSet {
    parse_listing(output, &SESSIONS, text_key("name"))
}

/// Windows keyed by index
pub fn parse_windows(output: &str) -> RecordSet<i64> {
    parse_listing(output, &WINDOWS, number_key("index"))
}

/// Panes keyed by index
pub fn parse_panes(output: &str) -> RecordSet<i64> {
    parse_listing(output, &PANES, number_key("index"))
}

/// Clients keyed by device path
pub fn parse_clients(output: &str) -> RecordSet {
    parse_listing(output, &CLIENTS, text_key("device"))
}

/// True for the replies tmux gives when there is nothing to list
fn is_empty_server(output: &str) -> bool {
    output.starts_with("no server running")
        || output.starts_with("no sessions")
        || output.starts_with("error connecting to")
}

/// Filtered snapshots of the sessions, windows, panes and clients of a server
pub struct Listings<'a, C: CommandChannel> {
    channel: &'a C,
}

impl<'a, C: CommandChannel> Listings<'a, C> {
    pub fn new(channel: &'a C) -> Self {
        Self { channel }
    }

    fn list(&self, verb: &str, target: Option<&str>, layout: &Layout) -> Result<String, ChannelError> {
        let mut args = vec![verb, "-F", layout.format];
        if let Some(target) = target {
            args.extend(["-t", target]);
        }

        match self.channel.invoke(&join_command(&args)) {
            Ok(output) if is_empty_server(&output) => Ok(String::new()),
            Err(ChannelError::Failed { output, .. }) if is_empty_server(&output) => Ok(String::new()),
            result => result,
        }
    }

    pub fn sessions(&self, predicate: &Predicate) -> Result<RecordSet, ChannelError> {
        let output = self.list("list-sessions", None, &SESSIONS)?;
        Ok(parse_sessions(&output).filter(predicate))
    }

    pub fn windows(&self, session: &str, predicate: &Predicate) -> Result<RecordSet<i64>, ChannelError> {
        let output = self.list("list-windows", Some(session), &WINDOWS)?;
        Ok(parse_windows(&output).filter(predicate))
    }

    /// Panes of `window`, a target such as `work:1`
    pub fn panes(&self, window: &str, predicate: &Predicate) -> Result<RecordSet<i64>, ChannelError> {
        let output = self.list("list-panes", Some(window), &PANES)?;
        Ok(parse_panes(&output).filter(predicate))
    }

    pub fn clients(&self, predicate: &Predicate) -> Result<RecordSet, ChannelError> {
        let output = self.list("list-clients", None, &CLIENTS)?;
        Ok(parse_clients(&output).filter(predicate))
    }
}
