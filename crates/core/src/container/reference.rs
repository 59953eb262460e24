//! Parsing of the string reference syntax into tagged arguments
//!
//! | Raw string          | Parsed as                                |
//! |---------------------|------------------------------------------|
//! | `@mailer`           | [`Argument::Service`]                    |
//! | `%port%`            | [`Argument::Parameter`] (type preserved) |
//! | `%env(HOME)%`       | [`Argument::Parameter`] with `Env`       |
//! | `%constant(NAME)%`  | [`Argument::Parameter`] with `Constant`  |
//! | `/srv/%app%/logs`   | [`Argument::Template`]                   |
//! | `100%%`             | [`Argument::Literal`] `"100%"`           |

use crate::value::Value;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static SERVICE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@(.+)$").unwrap());
static PARAMETER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^%([^%]+)%$").unwrap());
static TEMPLATE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"%%|%([^%]+)%").unwrap());
static ENV_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^env\((.+)\)$").unwrap());
static CONSTANT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^constant\((.+)\)$").unwrap());

/// What a `%...%` reference points at
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterRef {
    /// A key in the parameter table
    Named(String),
    /// An environment variable, with `env(VAR)` parameter fallback
    Env(String),
    /// A named constant
    Constant(String),
}

impl ParameterRef {
    /// Classify the text between the percent signs
    pub fn parse(name: &str) -> Self {
        if let Some(captures) = ENV_PATTERN.captures(name) {
            return ParameterRef::Env(captures[1].to_string());
        }
        if let Some(captures) = CONSTANT_PATTERN.captures(name) {
            return ParameterRef::Constant(captures[1].to_string());
        }
        ParameterRef::Named(name.to_string())
    }
}

impl fmt::Display for ParameterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterRef::Named(name) => write!(f, "%{}%", name),
            ParameterRef::Env(var) => write!(f, "%env({})%", var),
            ParameterRef::Constant(name) => write!(f, "%constant({})%", name),
        }
    }
}

/// A piece of a string with embedded references
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Reference(ParameterRef),
}

/// A raw argument parsed once at load time
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Passed through unchanged
    Literal(Value),
    /// `@id`
    Service(String),
    /// Whole-string `%name%`; the referenced value keeps its type
    Parameter(ParameterRef),
    /// Several references inside a larger string; always resolves to a string
    Template(Vec<Segment>),
    List(Vec<Argument>),
    Map(IndexMap<String, Argument>),
}

impl Argument {
    /// Parse a raw value, recursing into lists and maps
    pub fn parse(value: Value) -> Self {
        match value {
            Value::String(s) => Self::parse_str(&s),
            Value::List(items) => Argument::List(items.into_iter().map(Argument::parse).collect()),
            Value::Map(map) => Argument::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Argument::parse(value)))
                    .collect(),
            ),
            other => Argument::Literal(other),
        }
    }

    /// Parse a raw string
    pub fn parse_str(raw: &str) -> Self {
        if let Some(captures) = SERVICE_PATTERN.captures(raw) {
            return Argument::Service(captures[1].to_string());
        }

        if let Some(captures) = PARAMETER_PATTERN.captures(raw) {
            return Argument::Parameter(ParameterRef::parse(&captures[1]));
        }

        let mut segments = Vec::new();
        let mut text = String::new();
        let mut last = 0;

        for captures in TEMPLATE_PATTERN.captures_iter(raw) {
            let Some(matched) = captures.get(0) else {
                continue;
            };
            text.push_str(&raw[last..matched.start()]);
            last = matched.end();

            match captures.get(1) {
                Some(name) => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Reference(ParameterRef::parse(name.as_str())));
                }
                None => text.push('%'),
            }
        }
        text.push_str(&raw[last..]);

        if segments.is_empty() {
            return Argument::Literal(Value::String(text));
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Argument::Template(segments)
    }

    /// Whether resolving this argument needs no lookups at all
    pub fn is_literal(&self) -> bool {
        match self {
            Argument::Literal(_) => true,
            Argument::List(items) => items.iter().all(Argument::is_literal),
            Argument::Map(map) => map.values().all(Argument::is_literal),
            _ => false,
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::parse(value)
    }
}

impl From<&str> for Argument {
    fn from(raw: &str) -> Self {
        Argument::parse_str(raw)
    }
}
