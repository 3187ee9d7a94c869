//! Minimal JSON support: an ordered value tree with a compact encoder, and a
//! tolerant single-field scanner for request bodies.

use std::fmt::{self, Write as _};

use once_cell::sync::Lazy;
use regex::Regex;

static MODEL_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| field_pattern("model").expect("regex should compile"));

/// In-memory JSON value. Objects keep insertion order so encoded output is
/// reproducible.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Object(Map),
    Array(Vec<JsonValue>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

/// Ordered mapping without duplicate keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(String, JsonValue)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`, replacing an existing entry in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Inserts only when `value` is present.
    pub fn insert_opt<V: Into<JsonValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Builder-style [`Map::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl JsonValue {
    /// Wraps any displayable value as a JSON string.
    pub fn display(value: impl fmt::Display) -> Self {
        JsonValue::String(value.to_string())
    }
}

/// Encodes `value` as compact JSON text.
pub fn encode(value: &JsonValue) -> String {
    value.to_string()
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Bool(value) => write!(f, "{value}"),
            JsonValue::Number(number) => write!(f, "{number}"),
            JsonValue::String(value) => write_escaped(f, value),
            JsonValue::Object(map) => {
                f.write_char('{')?;
                for (position, (key, value)) in map.iter().enumerate() {
                    if position > 0 {
                        f.write_char(',')?;
                    }
                    write_escaped(f, key)?;
                    f.write_char(':')?;
                    write!(f, "{value}")?;
                }
                f.write_char('}')
            }
            JsonValue::Array(items) => {
                f.write_char('[')?;
                for (position, item) in items.iter().enumerate() {
                    if position > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(value) => write!(f, "{value}"),
            Number::UInt(value) => write!(f, "{value}"),
            // Debug formatting keeps the fractional part (`0.0`, `1e-7`).
            Number::Float(value) if value.is_finite() => write!(f, "{value:?}"),
            Number::Float(_) => f.write_str("null"),
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in value.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_owned())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<&String> for JsonValue {
    fn from(value: &String) -> Self {
        JsonValue::String(value.clone())
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Number(Number::Int(value))
    }
}

impl From<u32> for JsonValue {
    fn from(value: u32) -> Self {
        JsonValue::Number(Number::UInt(u64::from(value)))
    }
}

impl From<u64> for JsonValue {
    fn from(value: u64) -> Self {
        JsonValue::Number(Number::UInt(value))
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Number(Number::Float(value))
    }
}

impl From<Map> for JsonValue {
    fn from(value: Map) -> Self {
        JsonValue::Object(value)
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(values: Vec<T>) -> Self {
        JsonValue::Array(values.into_iter().map(Into::into).collect())
    }
}

/// Returns the first non-empty quoted string following `"field_name":` in
/// `raw`.
///
/// This is a scanner, not a parser: escape sequences inside the value are
/// returned as written, and a matching pattern nested in another value (for
/// example inside message content) is found just like a top-level one. Only
/// use it for the top-level `model` field of request bodies.
pub fn extract_field(raw: &str, field_name: &str) -> Option<String> {
    if field_name == "model" {
        return first_capture(&MODEL_FIELD_RE, raw);
    }
    let pattern = field_pattern(field_name).ok()?;
    first_capture(&pattern, raw)
}

/// The request's `model` field, or `fallback` when it is absent or empty.
pub fn extract_model(raw: &str, fallback: &str) -> String {
    extract_field(raw, "model").unwrap_or_else(|| fallback.to_owned())
}

fn field_pattern(field_name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#""{}"\s*:\s*"([^"]+)""#,
        regex::escape(field_name)
    ))
}

fn first_capture(pattern: &Regex, raw: &str) -> Option<String> {
    pattern
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}
