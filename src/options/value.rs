use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed tmux option value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OptionValue {
    /// The `default` sentinel, valid for every option
    Default,
    /// The `none` sentinel, valid for every option
    None,
    Boolean(bool),
    Integer(i64),
    String(String),
    /// A symbolic token such as a color or key table name
    Symbol(String),
    Words(Vec<String>),
    Chars(Vec<char>),
}

pub const DEFAULT_TOKEN: &str = "default";
pub const NONE_TOKEN: &str = "none";

impl OptionValue {
    pub fn symbol(token: impl Into<String>) -> Self {
        OptionValue::Symbol(token.into())
    }

    pub fn words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OptionValue::Words(words.into_iter().map(Into::into).collect())
    }

    /// Map a raw token to one of the sentinels, if it is one
    pub fn sentinel(raw: &str) -> Option<Self> {
        match raw {
            DEFAULT_TOKEN => Some(OptionValue::Default),
            NONE_TOKEN => Some(OptionValue::None),
            _ => None,
        }
    }

    /// The literal token of a sentinel value
    pub fn sentinel_token(&self) -> Option<&'static str> {
        match self {
            OptionValue::Default => Some(DEFAULT_TOKEN),
            OptionValue::None => Some(NONE_TOKEN),
            _ => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.sentinel_token().is_some()
    }

    /// Textual content of string-like values (strings and symbols)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) | OptionValue::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

/// Plain-string form, used for options without a registered codec
impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Default => f.write_str(DEFAULT_TOKEN),
            OptionValue::None => f.write_str(NONE_TOKEN),
            OptionValue::Boolean(true) => f.write_str("on"),
            OptionValue::Boolean(false) => f.write_str("off"),
            OptionValue::Integer(n) => write!(f, "{}", n),
            OptionValue::String(s) | OptionValue::Symbol(s) => f.write_str(s),
            OptionValue::Words(words) => f.write_str(&words.join(" ")),
            OptionValue::Chars(chars) => {
                for c in chars {
                    write!(f, "{}", c)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Boolean(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        OptionValue::Words(value)
    }
}

impl From<Vec<char>> for OptionValue {
    fn from(value: Vec<char>) -> Self {
        OptionValue::Chars(value)
    }
}
