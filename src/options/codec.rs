use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{OptionError, Result};
use super::value::OptionValue;

/// Matches the indexed palette colours (`colour0`, `colour255`, ...)
static RE_INDEXED_COLOUR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^colour\d+$").unwrap());

/// A closed set of symbolic tokens an option accepts
pub struct SymbolSet {
    /// Human readable name of the domain, used in error messages
    pub name: &'static str,
    tokens: &'static [&'static str],
    /// Extra tokens accepted by pattern rather than by enumeration
    pattern: Option<&'static Lazy<Regex>>,
    /// `(wire token, symbol)` pairs translated in both directions
    aliases: &'static [(&'static str, &'static str)],
}

impl SymbolSet {
    pub fn accepts(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| *t == token) || self.pattern.is_some_and(|re| re.is_match(token))
    }

    fn symbol_for_wire<'a>(&self, raw: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(wire, _)| *wire == raw)
            .map(|(_, symbol)| *symbol)
            .unwrap_or(raw)
    }

    fn wire_for_symbol<'a>(&self, symbol: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(_, sym)| *sym == symbol)
            .map(|(wire, _)| *wire)
            .unwrap_or(symbol)
    }

    fn expected(&self) -> String {
        let mut expected = format!("{} ({}", self.name, self.tokens.join(", "));
        if self.pattern.is_some() {
            expected.push_str(", colour<N>");
        }
        expected.push(')');
        expected
    }
}

impl fmt::Debug for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolSet").field("name", &self.name).finish()
    }
}

impl PartialEq for SymbolSet {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for SymbolSet {}

pub static COLOR: SymbolSet = SymbolSet {
    name: "colour",
    tokens: &[
        "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
    ],
    pattern: Some(&RE_INDEXED_COLOUR),
    aliases: &[],
};

pub static ATTR: SymbolSet = SymbolSet {
    name: "attribute",
    tokens: &[
        "bright", "bold", "dim", "underscore", "blink", "reverse", "hidden", "italics",
    ],
    pattern: None,
    aliases: &[],
};

pub static KEYMAP: SymbolSet = SymbolSet {
    name: "key table",
    tokens: &["emacs", "vi"],
    pattern: None,
    aliases: &[],
};

pub static JUSTIFICATION: SymbolSet = SymbolSet {
    name: "justification",
    tokens: &["left", "right", "centre"],
    pattern: None,
    aliases: &[],
};

pub static BELL_ACTION: SymbolSet = SymbolSet {
    name: "bell action",
    tokens: &["any", "current"],
    pattern: None,
    aliases: &[],
};

pub static CLOCK_MODE_STYLE: SymbolSet = SymbolSet {
    name: "clock mode style",
    tokens: &["twelve", "twenty_four"],
    pattern: None,
    aliases: &[("12", "twelve"), ("24", "twenty_four")],
};

/// Converts between tmux's textual option values and [`OptionValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Boolean,
    Integer,
    String,
    Symbol,
    WordArray,
    CharArray,
    /// A symbol restricted to a closed set of tokens
    Enumerated(&'static SymbolSet),
}

impl Codec {
    /// Decode a raw value as printed by `show-options`
    pub fn decode(&self, raw: &str) -> Result<OptionValue> {
        if let Some(sentinel) = OptionValue::sentinel(raw) {
            return Ok(sentinel);
        }

        match self {
            Codec::Boolean => Ok(OptionValue::Boolean(raw == "on")),
            Codec::Integer => raw
                .trim()
                .parse()
                .map(OptionValue::Integer)
                .map_err(|_| OptionError::invalid(raw, "a base-10 integer")),
            Codec::String => Ok(OptionValue::String(decode_string(raw))),
            Codec::Symbol => Ok(OptionValue::Symbol(raw.to_string())),
            Codec::WordArray => Ok(OptionValue::Words(
                decode_string(raw).split_whitespace().map(String::from).collect(),
            )),
            Codec::CharArray => Ok(OptionValue::Chars(decode_string(raw).chars().collect())),
            Codec::Enumerated(set) => Ok(OptionValue::Symbol(set.symbol_for_wire(raw).to_string())),
        }
    }

    /// Encode a value for `set-option`, validating it against this codec's domain.
    /// String-like values come back with `"` and `\` escaped, ready to sit
    /// inside a double-quoted tmux string.
    pub fn encode(&self, value: &OptionValue) -> Result<String> {
        let literal = self.argument(value)?;
        match self {
            Codec::String | Codec::WordArray | Codec::CharArray => Ok(escape_string(&literal)),
            _ => Ok(literal),
        }
    }

    /// The validated value exactly as tmux should receive it, unescaped.
    ///
    /// Text that would read back as `default` or `none` is refused: those
    /// are only reachable through [`OptionValue::Default`] and [`OptionValue::None`].
    pub fn argument(&self, value: &OptionValue) -> Result<String> {
        if let Some(token) = value.sentinel_token() {
            return Ok(token.to_string());
        }

        let literal = match self {
            Codec::Boolean => match value {
                OptionValue::Boolean(true) => "on".to_string(),
                OptionValue::Boolean(false) => "off".to_string(),
                other => return Err(OptionError::invalid(other, "a boolean (on/off)")),
            },
            Codec::Integer => match value {
                OptionValue::Integer(n) => n.to_string(),
                other => other
                    .as_text()
                    .and_then(|text| text.trim().parse::<i64>().ok())
                    .map(|n| n.to_string())
                    .ok_or_else(|| OptionError::invalid(other, "a base-10 integer"))?,
            },
            Codec::String => match value.as_text() {
                Some(text) => single_line(text)?,
                None => return Err(OptionError::invalid(value, "a string")),
            },
            Codec::Symbol => match value.as_text() {
                Some(token) => token.to_string(),
                None => return Err(OptionError::invalid(value, "a symbol")),
            },
            Codec::WordArray => match value {
                OptionValue::Words(words) => {
                    if let Some(bad) = words
                        .iter()
                        .find(|w| w.is_empty() || w.chars().any(char::is_whitespace))
                    {
                        return Err(OptionError::invalid(bad, "words without whitespace"));
                    }
                    single_line(&words.join(" "))?
                }
                other => return Err(OptionError::invalid(other, "a list of words")),
            },
            Codec::CharArray => match value {
                OptionValue::Chars(chars) => single_line(&chars.iter().collect::<String>())?,
                other => return Err(OptionError::invalid(other, "a list of characters")),
            },
            Codec::Enumerated(set) => match value.as_text() {
                Some(token) if set.accepts(token) => set.wire_for_symbol(token).to_string(),
                _ => return Err(OptionError::invalid(value, set.expected())),
            },
        };

        if OptionValue::sentinel(&literal).is_some() {
            return Err(OptionError::invalid(
                value,
                "OptionValue::Default or OptionValue::None for the default/none sentinels",
            ));
        }
        Ok(literal)
    }
}

/// Strip the surrounding quotes tmux prints and undo its escaping
fn decode_string(raw: &str) -> String {
    let mut inner = raw.strip_prefix('"').unwrap_or(raw);
    if let Some(stripped) = inner.strip_suffix('"') {
        let escapes = stripped.chars().rev().take_while(|&c| c == '\\').count();
        if escapes % 2 == 0 {
            inner = stripped;
        }
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('"' | '\\')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn single_line(text: &str) -> Result<String> {
    if text.contains(['\n', '\r']) {
        return Err(OptionError::invalid(text.escape_debug(), "a single-line string"));
    }
    Ok(text.to_string())
}

/// Escape a string for use inside a double-quoted tmux string
fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
