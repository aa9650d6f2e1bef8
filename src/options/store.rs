use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{OptionError, Result};
use super::registry::{canonical_name, codec_for};
use super::value::OptionValue;
use crate::tmux::{join_command, CommandChannel};

/// Prefix tmux uses when refusing a `set-option` value
pub const INVALID_VALUE_MARKER: &str = "value is invalid:";

/// Decoded options keyed by canonical name
pub type OptionMap = BTreeMap<String, OptionValue>;

/// Which option table a store operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Server,
    Session,
    Window,
}

impl OptionKind {
    fn flag(self) -> Option<&'static str> {
        match self {
            OptionKind::Server => Some("-s"),
            OptionKind::Session => None,
            OptionKind::Window => Some("-w"),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Server => f.write_str("server"),
            OptionKind::Session => f.write_str("session"),
            OptionKind::Window => f.write_str("window"),
        }
    }
}

/// Option name filter for [`OptionStore::enumerate`]; `*` matches any run of characters
#[derive(Debug, Clone)]
pub enum NamePattern {
    All,
    Exact(String),
    Glob(Regex),
}

impl NamePattern {
    pub fn new(pattern: &str) -> Self {
        let pattern = canonical_name(pattern);
        if pattern == "*" {
            return NamePattern::All;
        }
        if !pattern.contains('*') {
            return NamePattern::Exact(pattern.into_owned());
        }

        // Every literal run is escaped, so the pattern always compiles
        let parts: Vec<String> = pattern.split('*').map(regex::escape).collect();
        let re = Regex::new(&format!("^{}$", parts.join(".*")))
            .expect("escaped glob is a valid regex");
        NamePattern::Glob(re)
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::All => true,
            NamePattern::Exact(exact) => exact == name,
            NamePattern::Glob(re) => re.is_match(name),
        }
    }
}

impl From<&str> for NamePattern {
    fn from(pattern: &str) -> Self {
        NamePattern::new(pattern)
    }
}

/// Typed access to one tmux option table.
///
/// A store is addressed by `(kind, target, global)`. Local stores fall back to
/// the global table of their kind when an option is not set locally. Nothing
/// is cached: every call queries tmux again.
pub struct OptionStore<'a, C: CommandChannel> {
    channel: &'a C,
    kind: OptionKind,
    target: Option<String>,
    global: bool,
}

impl<'a, C: CommandChannel> OptionStore<'a, C> {
    /// Server options are always global and never take a target.
    pub fn new(channel: &'a C, kind: OptionKind, target: Option<String>, global: bool) -> Self {
        let server = kind == OptionKind::Server;
        Self {
            channel,
            kind,
            target: if server { None } else { target },
            global: global || server,
        }
    }

    pub fn server(channel: &'a C) -> Self {
        Self::new(channel, OptionKind::Server, None, true)
    }

    pub fn session(channel: &'a C, target: impl Into<String>) -> Self {
        Self::new(channel, OptionKind::Session, Some(target.into()), false)
    }

    /// Global session options, the defaults every session inherits
    pub fn session_global(channel: &'a C) -> Self {
        Self::new(channel, OptionKind::Session, None, true)
    }

    pub fn window(channel: &'a C, target: impl Into<String>) -> Self {
        Self::new(channel, OptionKind::Window, Some(target.into()), false)
    }

    /// Global window options, the defaults every window inherits
    pub fn window_global(channel: &'a C) -> Self {
        Self::new(channel, OptionKind::Window, None, true)
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    /// The global store this one falls back to
    pub fn global_store(&self) -> OptionStore<'a, C> {
        OptionStore::new(self.channel, self.kind, None, true)
    }

    /// Resolve an option, falling back to the global table on a local miss
    pub fn get(&self, name: &str) -> Result<Option<OptionValue>> {
        let name = canonical_name(name);
        let pattern = NamePattern::Exact(name.to_string());

        if let Some(value) = self.enumerate_pattern(&pattern)?.remove(name.as_ref()) {
            return Ok(Some(value));
        }
        if self.global {
            return Ok(None);
        }

        debug!(option = %name, kind = %self.kind, "not set locally, trying global");
        Ok(self.global_store().enumerate_pattern(&pattern)?.remove(name.as_ref()))
    }

    /// Encode and apply an option value, returning the value that was set
    pub fn set(&self, name: &str, value: impl Into<OptionValue>) -> Result<OptionValue> {
        let name = canonical_name(name);
        let value = value.into();
        let encoded = match codec_for(&name) {
            Some(codec) => codec.argument(&value)?,
            None => value.to_string(),
        };

        let command = self.command("set-option", &[], &[&*name, encoded.as_str()]);
        let response = self.channel.invoke(&command)?;
        if response.starts_with(INVALID_VALUE_MARKER) {
            warn!(option = %name, value = %encoded, "tmux rejected option value");
            return Err(OptionError::Rejected(response.trim_end().to_string()));
        }

        debug!(option = %name, value = %encoded, kind = %self.kind, "option set");
        Ok(value)
    }

    /// Remove a local option so the global value applies again
    pub fn unset(&self, name: &str) -> Result<()> {
        let name = canonical_name(name);
        if self.global {
            return Err(OptionError::CannotUnsetGlobal(name.into_owned()));
        }

        let command = self.command("set-option", &["-u"], &[&*name]);
        self.channel.invoke(&command)?;
        Ok(())
    }

    /// All options at this exact scope whose names match `pattern`
    pub fn enumerate(&self, pattern: impl Into<NamePattern>) -> Result<OptionMap> {
        self.enumerate_pattern(&pattern.into())
    }

    /// Every option set at this exact scope
    pub fn all(&self) -> Result<OptionMap> {
        self.enumerate_pattern(&NamePattern::All)
    }

    fn enumerate_pattern(&self, pattern: &NamePattern) -> Result<OptionMap> {
        let command = self.command("show-options", &[], &[]);
        let output = self.channel.invoke(&command)?;

        let mut values = OptionMap::new();
        for line in output.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let (name, raw) = line.split_once(' ').unwrap_or((line, ""));
            if !pattern.matches(name) {
                continue;
            }
            values.insert(name.to_string(), decode_option(name, raw));
        }
        Ok(values)
    }

    /// Build a command line: scope flags, injected flags, target, then arguments.
    /// Each part is shell-quoted on its own, so values reach tmux unchanged.
    fn command(&self, verb: &str, inject: &[&str], args: &[&str]) -> String {
        let mut parts = vec![verb];
        if self.global {
            parts.push("-g");
        }
        parts.extend(self.kind.flag());
        parts.extend(inject);
        if let (false, Some(target)) = (self.global, &self.target) {
            parts.extend(["-t", target.as_str()]);
        }
        parts.extend(args);
        join_command(&parts)
    }
}

fn decode_option(name: &str, raw: &str) -> OptionValue {
    match codec_for(name) {
        Some(codec) => codec.decode(raw).unwrap_or_else(|err| {
            warn!(option = name, raw, error = %err, "undecodable option value, keeping raw text");
            OptionValue::String(raw.to_string())
        }),
        None => OptionValue::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmux::{split_command, ChannelError};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory stand-in for tmux's option tables
    #[derive(Default)]
    struct FakeTmux {
        tables: RefCell<HashMap<String, BTreeMap<String, String>>>,
        commands: RefCell<Vec<Vec<String>>>,
        set_reply: Option<String>,
    }

    impl FakeTmux {
        fn seed(&self, table: &str, name: &str, value: &str) {
            self.tables
                .borrow_mut()
                .entry(table.to_string())
                .or_default()
                .insert(name.to_string(), value.to_string());
        }

        /// Every command received so far, split into arguments
        fn commands(&self) -> Vec<Vec<String>> {
            self.commands.borrow().clone()
        }
    }

    impl CommandChannel for FakeTmux {
        fn invoke(&self, command: &str) -> std::result::Result<String, ChannelError> {
            let args = split_command(command)?;
            self.commands.borrow_mut().push(args.clone());

            let mut kind = "session";
            let mut scope = "current".to_string();
            let mut unset = false;
            let mut positional = Vec::new();
            let mut iter = args.iter().skip(1);
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "-g" => scope = "global".to_string(),
                    "-s" => kind = "server",
                    "-w" => kind = "window",
                    "-u" => unset = true,
                    "-t" => scope = iter.next().cloned().unwrap_or_default(),
                    other => positional.push(other.to_string()),
                }
            }
            let table = format!("{}:{}", kind, scope);

            match args[0].as_str() {
                "show-options" => {
                    let tables = self.tables.borrow();
                    let mut out = String::new();
                    for (name, value) in tables.get(&table).into_iter().flatten() {
                        if value.contains(' ') {
                            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                            out.push_str(&format!("{} \"{}\"\n", name, escaped));
                        } else {
                            out.push_str(&format!("{} {}\n", name, value));
                        }
                    }
                    Ok(out)
                }
                "set-option" => {
                    if let Some(reply) = &self.set_reply {
                        return Ok(reply.clone());
                    }
                    let mut tables = self.tables.borrow_mut();
                    let entries = tables.entry(table).or_default();
                    if unset {
                        entries.remove(&positional[0]);
                    } else {
                        entries.insert(positional[0].clone(), positional[1].clone());
                    }
                    Ok(String::new())
                }
                other => Ok(format!("unknown command: {}", other)),
            }
        }
    }

    #[test]
    fn test_local_miss_falls_back_to_global() {
        let tmux = FakeTmux::default();
        tmux.seed("session:global", "status-bg", "green");
        let store = OptionStore::session(&tmux, "work");

        assert_eq!(store.get("status-bg").unwrap(), Some(OptionValue::symbol("green")));
        assert_eq!(
            tmux.commands(),
            [vec!["show-options", "-t", "work"], vec!["show-options", "-g"]]
        );

        store.set("status-bg", OptionValue::symbol("red")).unwrap();
        assert_eq!(store.get("status-bg").unwrap(), Some(OptionValue::symbol("red")));
        assert_eq!(
            store.global_store().get("status-bg").unwrap(),
            Some(OptionValue::symbol("green"))
        );
    }

    #[test]
    fn test_global_store_does_not_fall_back() {
        let tmux = FakeTmux::default();
        let store = OptionStore::session_global(&tmux);
        assert_eq!(store.get("status-bg").unwrap(), None);
        assert_eq!(tmux.commands().len(), 1);
    }

    #[test]
    fn test_missing_everywhere_is_none() {
        let tmux = FakeTmux::default();
        let store = OptionStore::window(&tmux, "work:1");
        assert_eq!(store.get("mode-keys").unwrap(), None);
        assert_eq!(
            tmux.commands(),
            [vec!["show-options", "-w", "-t", "work:1"], vec!["show-options", "-g", "-w"]]
        );
    }

    #[test]
    fn test_unset_global_makes_no_call() {
        let tmux = FakeTmux::default();
        let err = OptionStore::session_global(&tmux).unset("status").unwrap_err();
        assert!(matches!(err, OptionError::CannotUnsetGlobal(ref name) if name == "status"));

        let err = OptionStore::server(&tmux).unset("escape-time").unwrap_err();
        assert!(matches!(err, OptionError::CannotUnsetGlobal(_)));
        assert!(tmux.commands().is_empty());
    }

    #[test]
    fn test_unset_local_restores_inheritance() {
        let tmux = FakeTmux::default();
        tmux.seed("session:global", "status-interval", "15");
        let store = OptionStore::session(&tmux, "work");
        store.set("status-interval", 5i64).unwrap();
        assert_eq!(store.get("status-interval").unwrap(), Some(OptionValue::Integer(5)));

        store.unset("status_interval").unwrap();
        assert_eq!(tmux.commands()[2], ["set-option", "-u", "-t", "work", "status-interval"]);
        assert_eq!(store.get("status-interval").unwrap(), Some(OptionValue::Integer(15)));
    }

    #[test]
    fn test_rejected_value_is_invalid() {
        let tmux = FakeTmux {
            set_reply: Some("value is invalid: foo".to_string()),
            ..FakeTmux::default()
        };
        let store = OptionStore::session(&tmux, "work");
        let err = store.set("status-bg", OptionValue::symbol("blue")).unwrap_err();

        assert!(err.is_invalid_value());
        assert!(matches!(err, OptionError::Rejected(ref text) if text == "value is invalid: foo"));
    }

    #[test]
    fn test_local_validation_happens_before_any_call() {
        let tmux = FakeTmux::default();
        let store = OptionStore::session(&tmux, "work");
        let err = store.set("status-bg", OptionValue::symbol("chartreuse")).unwrap_err();
        assert!(matches!(err, OptionError::InvalidValue { .. }));
        assert!(tmux.commands().is_empty());
    }

    #[test]
    fn test_set_returns_value_and_sends_it_verbatim() {
        let tmux = FakeTmux::default();
        let store = OptionStore::session(&tmux, "work");

        assert_eq!(store.set("status", false).unwrap(), OptionValue::Boolean(false));
        assert_eq!(store.set("status_left", "[#S] \"x\"").unwrap(), OptionValue::from("[#S] \"x\""));
        assert_eq!(store.set("status-bg", OptionValue::Default).unwrap(), OptionValue::Default);
        assert_eq!(
            tmux.commands(),
            [
                vec!["set-option", "-t", "work", "status", "off"],
                vec!["set-option", "-t", "work", "status-left", "[#S] \"x\""],
                vec!["set-option", "-t", "work", "status-bg", "default"],
            ]
        );
        assert_eq!(store.get("status_left").unwrap(), Some(OptionValue::from("[#S] \"x\"")));
    }

    #[test]
    fn test_unknown_options_pass_through() {
        let tmux = FakeTmux::default();
        let store = OptionStore::session_global(&tmux);
        store.set("@theme", "dark").unwrap();
        assert_eq!(tmux.commands(), [["set-option", "-g", "@theme", "dark"]]);
        assert_eq!(store.get("@theme").unwrap(), Some(OptionValue::from("dark")));
    }

    #[test]
    fn test_enumerate_with_glob() {
        let tmux = FakeTmux::default();
        tmux.seed("window:global", "mode-keys", "vi");
        tmux.seed("window:global", "mode-fg", "red");
        tmux.seed("window:global", "main-pane-width", "80");
        let store = OptionStore::window_global(&tmux);

        let modes = store.enumerate("mode-*").unwrap();
        assert_eq!(modes.len(), 2);
        assert_eq!(modes["mode-keys"], OptionValue::symbol("vi"));
        assert_eq!(modes["mode-fg"], OptionValue::symbol("red"));

        let all = store.all().unwrap();
        assert_eq!(all["main-pane-width"], OptionValue::Integer(80));
        assert_eq!(store.enumerate("*").unwrap(), all);
    }

    #[test]
    fn test_undecodable_value_kept_raw() {
        let tmux = FakeTmux::default();
        tmux.seed("server:global", "escape-time", "fast");
        let store = OptionStore::server(&tmux);
        assert_eq!(store.get("escape-time").unwrap(), Some(OptionValue::from("fast")));
        assert_eq!(tmux.commands(), [["show-options", "-g", "-s"]]);
    }

    #[test]
    fn test_server_store_ignores_target() {
        let tmux = FakeTmux::default();
        let store = OptionStore::new(&tmux, OptionKind::Server, Some("work".to_string()), false);
        assert!(store.is_global());
        assert_eq!(store.target(), None);
    }

    #[test]
    fn test_targets_with_spaces_are_quoted() {
        let tmux = FakeTmux::default();
        OptionStore::session(&tmux, "my work").all().unwrap();
        assert_eq!(tmux.commands(), [["show-options", "-t", "my work"]]);
    }

    #[test]
    fn test_name_patterns() {
        assert!(NamePattern::new("*").matches("anything"));
        assert!(NamePattern::new("status_bg").matches("status-bg"));
        assert!(!NamePattern::new("status").matches("status-bg"));
        assert!(NamePattern::new("status-*-fg").matches("status-left-fg"));
        assert!(!NamePattern::new("status-*-fg").matches("status-left-bg"));
        assert!(NamePattern::new("*.x").matches("a.x"));
        assert!(!NamePattern::new("*.x").matches("abx"));
        assert!(NamePattern::new("@(a+b)*").matches("@(a+b)-theme"));
        assert!(!NamePattern::new("@(a+b)*").matches("@aab-theme"));
    }

    #[test]
    fn test_channel_errors_propagate() {
        struct Broken;
        impl CommandChannel for Broken {
            fn invoke(&self, _command: &str) -> std::result::Result<String, ChannelError> {
                Err(ChannelError::UnknownCommand("show-options".to_string()))
            }
        }

        let err = OptionStore::server(&Broken).get("escape-time").unwrap_err();
        assert!(matches!(err, OptionError::Channel(ChannelError::UnknownCommand(_))));
    }

    #[test]
    fn test_values_with_quotes_reach_tmux_unchanged() {
        let tmux = FakeTmux::default();
        let store = OptionStore::session_global(&tmux);
        let values = [r#"say "hi""#, r#"x" ; kill-server ""#, "it's; \\ $HOME"];
        for value in values {
            store.set("@x", value).unwrap();
        }
        store.set("prefix", OptionValue::symbol(r#"C-a" ; kill-server ""#)).unwrap();
        store.set("status-left", r#"x" ; kill-server ""#).unwrap();

        let commands = tmux.commands();
        assert_eq!(commands.len(), 5);
        for (command, value) in commands.iter().zip(values) {
            assert_eq!(*command, ["set-option", "-g", "@x", value]);
        }
        assert_eq!(commands[3], ["set-option", "-g", "prefix", r#"C-a" ; kill-server ""#]);
        assert_eq!(commands[4], ["set-option", "-g", "status-left", r#"x" ; kill-server ""#]);
        assert_eq!(
            store.get("status-left").unwrap(),
            Some(OptionValue::from(r#"x" ; kill-server ""#))
        );
    }

    #[test]
    fn test_sentinel_text_is_refused_before_any_call() {
        let tmux = FakeTmux::default();
        let store = OptionStore::session(&tmux, "work");
        assert!(store.set("status-bg", OptionValue::symbol("default")).is_err());
        assert!(store.set("status-left", "none").is_err());
        assert!(tmux.commands().is_empty());
    }

    #[test]
    fn test_failed_lookup_does_not_fall_back() {
        struct MissingSession {
            calls: RefCell<usize>,
        }
        impl CommandChannel for MissingSession {
            fn invoke(&self, command: &str) -> std::result::Result<String, ChannelError> {
                *self.calls.borrow_mut() += 1;
                Err(ChannelError::Failed {
                    command: command.to_string(),
                    output: "can't find session: ghost".to_string(),
                })
            }
        }

        let tmux = MissingSession { calls: RefCell::new(0) };
        let err = OptionStore::session(&tmux, "ghost").get("status").unwrap_err();
        assert!(matches!(err, OptionError::Channel(ChannelError::Failed { .. })));
        assert_eq!(*tmux.calls.borrow(), 1);
    }
}
