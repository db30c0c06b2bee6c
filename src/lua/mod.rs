//! Structured values and their Lua table rendering.
//!
//! The generated project files (`build.settings`, `config.lua`,
//! `information.lua`) are plain Lua assignments. They are described as a
//! [`Value`] tree and rendered by [`serialize`]:
//!
//! ```text
//! settings =
//! {
//!     orientation =
//!     {
//!         default = "portrait",
//!         supported = { "portrait","portraitUpsideDown" }
//!     }
//! }
//! ```
//!
//! ## Entry names
//!
//! | Name | Rendered as |
//! |---|---|
//! | `return` | `return` with no `=` |
//! | starting with `!` | no name at all, just the value; the key only orders siblings |
//! | anything else | `name = ` |
//!
//! Map keys are always emitted in ascending order, which is why ordered
//! anonymous tables use keys like `!100`, `!101`.
//!
//! [`serialize_legacy`] produces the same text through serde_json's pretty
//! printer plus line rewrites. It is kept to check output compatibility only.

mod legacy;
mod writer;

pub use legacy::serialize_legacy;
pub use writer::serialize;

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LuaError {
    #[error("Invalid structure at {path}: {reason}")]
    InvalidStructure { path: String, reason: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn invalid(path: &str, reason: impl Into<String>) -> LuaError {
    LuaError::InvalidStructure {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// A node in a serializable tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
    Str(String),
    Int(i64),
    Float(f64),
    /// Pre-formatted Lua, emitted verbatim (trimmed).
    Literal(String),
}

impl Value {
    pub fn literal(text: impl Into<String>) -> Self {
        Value::Literal(text.into())
    }

    /// A map from `(key, value)` pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Convert a JSON tree. `null` and booleans have no representation.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, LuaError> {
        json_to_value(value, "$")
    }

    /// Convert a TOML tree. Booleans and datetimes have no representation.
    pub fn from_toml(value: &toml::Value) -> Result<Self, LuaError> {
        toml_to_value(value, "$")
    }

    /// The JSON shape of this tree. Literals become strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Literal(s) => serde_json::Value::String(s.trim().to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = LuaError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Value::from_json(&value)
    }
}

impl TryFrom<toml::Value> for Value {
    type Error = LuaError;

    fn try_from(value: toml::Value) -> Result<Self, Self::Error> {
        Value::from_toml(&value)
    }
}

fn json_to_value(value: &serde_json::Value, path: &str) -> Result<Value, LuaError> {
    use serde_json::Value as J;
    match value {
        J::Object(map) => map
            .iter()
            .map(|(k, v)| {
                let child = json_to_value(v, &format!("{path}.{k}"))?;
                Ok((k.clone(), child))
            })
            .collect::<Result<BTreeMap<_, _>, LuaError>>()
            .map(Value::Map),
        J::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| json_to_value(v, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        J::String(s) => Ok(Value::Str(s.clone())),
        J::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| invalid(path, format!("unrepresentable number {n}"))),
        },
        J::Null => Err(invalid(path, "null has no Lua table form")),
        J::Bool(_) => Err(invalid(path, "booleans are not supported")),
    }
}

fn toml_to_value(value: &toml::Value, path: &str) -> Result<Value, LuaError> {
    use toml::Value as T;
    match value {
        T::Table(table) => table
            .iter()
            .map(|(k, v)| {
                let child = toml_to_value(v, &format!("{path}.{k}"))?;
                Ok((k.clone(), child))
            })
            .collect::<Result<BTreeMap<_, _>, LuaError>>()
            .map(Value::Map),
        T::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| toml_to_value(v, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        T::String(s) => Ok(Value::Str(s.clone())),
        T::Integer(i) => Ok(Value::Int(*i)),
        T::Float(f) => Ok(Value::Float(*f)),
        T::Boolean(_) => Err(invalid(path, "booleans are not supported")),
        T::Datetime(_) => Err(invalid(path, "datetimes are not supported")),
    }
}

/// Check a tree before rendering: keys must be non-empty, lists hold only
/// scalars, floats are finite.
pub(crate) fn validate(name: &str, value: &Value) -> Result<(), LuaError> {
    if name.is_empty() {
        return Err(invalid("$", "empty entry name"));
    }
    validate_at(value, name)
}

fn validate_at(value: &Value, path: &str) -> Result<(), LuaError> {
    match value {
        Value::Map(map) => map.iter().try_for_each(|(k, v)| {
            if k.is_empty() {
                return Err(invalid(path, "empty key"));
            }
            validate_at(v, &format!("{path}.{k}"))
        }),
        Value::List(items) => items.iter().enumerate().try_for_each(|(i, v)| {
            let item_path = format!("{path}[{i}]");
            match v {
                Value::Map(_) | Value::List(_) => {
                    Err(invalid(&item_path, "lists may only hold scalars"))
                }
                other => validate_at(other, &item_path),
            }
        }),
        Value::Float(f) if !f.is_finite() => Err(invalid(path, format!("non-finite float {f}"))),
        _ => Ok(()),
    }
}

/// How an entry's name is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryPrefix<'a> {
    Anonymous,
    Return,
    Named(&'a str),
}

impl<'a> EntryPrefix<'a> {
    pub(crate) fn of(name: &'a str) -> Self {
        if name.starts_with('!') {
            EntryPrefix::Anonymous
        } else if name == "return" {
            EntryPrefix::Return
        } else {
            EntryPrefix::Named(name)
        }
    }

    /// The line introducing a map or list body.
    pub(crate) fn push_header(&self, out: &mut String, indent: &str) {
        match self {
            EntryPrefix::Anonymous => {}
            EntryPrefix::Return => {
                out.push_str(indent);
                out.push_str("return\n");
            }
            EntryPrefix::Named(name) => {
                out.push_str(indent);
                out.push_str(name);
                out.push_str(" = \n");
            }
        }
    }

    /// The text before a scalar on the same line.
    pub(crate) fn push_inline(&self, out: &mut String) {
        match self {
            EntryPrefix::Anonymous => {}
            EntryPrefix::Return => out.push_str("return "),
            EntryPrefix::Named(name) => {
                out.push_str(name);
                out.push_str(" = ");
            }
        }
    }
}

/// Four spaces per depth level, shared by the Lua writer and CLI output.
pub(crate) fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Double-quote `text` for Lua.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_ascii_control() => quoted.push_str(&format!("\\{:03}", c as u32)),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// A string in value position. Text starting with `{` is a table literal.
pub(crate) fn format_value_str(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        quote(text)
    }
}

/// A string in list position. Text starting with `[` is a keyed entry.
pub(crate) fn format_element_str(text: &str) -> String {
    if text.starts_with('[') {
        text.to_string()
    } else {
        quote(text)
    }
}

pub(crate) fn format_float(f: f64) -> String {
    format!("{f:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn quote_escapes_specials() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote("two\nlines"), "\"two\\nlines\"");
        assert_eq!(quote("crlf\r\n"), "\"crlf\\r\\n\"");
        assert_eq!(quote("a\tb"), "\"a\\tb\"");
        assert_eq!(quote("bell\u{7}"), "\"bell\\007\"");
        assert_eq!(quote("del\u{7f}"), "\"del\\127\"");
        assert_eq!(quote("café"), "\"café\"");
    }

    #[test]
    fn value_str_table_literal_is_trimmed() {
        assert_eq!(format_value_str("  { 'exclude/*' } "), "{ 'exclude/*' }");
        assert_eq!(format_value_str("x{"), "\"x{\"");
    }

    #[test]
    fn element_str_bracket_is_verbatim() {
        assert_eq!(format_element_str("[\"Key\"] = \"v\""), "[\"Key\"] = \"v\"");
        assert_eq!(format_element_str("Icon.png"), "\"Icon.png\"");
    }

    #[test]
    fn floats_keep_a_fraction() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(0.5), "0.5");
    }

    #[test]
    fn entry_prefix_classification() {
        assert_eq!(EntryPrefix::of("!100"), EntryPrefix::Anonymous);
        assert_eq!(EntryPrefix::of("return"), EntryPrefix::Return);
        assert_eq!(EntryPrefix::of("settings"), EntryPrefix::Named("settings"));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_rejects_empty_key() {
        let value = Value::map([("", 1i64)]);
        let err = validate("settings", &value).unwrap_err();
        assert!(matches!(err, LuaError::InvalidStructure { ref path, .. } if path == "settings"));
    }

    #[test]
    fn validate_rejects_empty_name() {
        assert!(validate("", &Value::Int(1)).is_err());
    }

    #[test]
    fn validate_rejects_nested_list() {
        let value = Value::map([("icons", Value::List(vec![Value::list(["a"])]))]);
        let err = validate("settings", &value).unwrap_err();
        assert!(
            matches!(err, LuaError::InvalidStructure { ref path, .. } if path == "settings.icons[0]")
        );
    }

    #[test]
    fn validate_rejects_nan() {
        assert!(validate("x", &Value::Float(f64::NAN)).is_err());
        assert!(validate("x", &Value::Float(f64::INFINITY)).is_err());
    }

    // =========================================================================
    // Foreign trees
    // =========================================================================

    #[test]
    fn from_json_maps_shapes() {
        let value = Value::from_json(&json!({"a": 1, "b": [2.5, "x"], "c": {"d": "e"}})).unwrap();
        assert_eq!(
            value,
            Value::map([
                ("a", Value::Int(1)),
                ("b", Value::List(vec![Value::Float(2.5), Value::from("x")])),
                ("c", Value::map([("d", "e")])),
            ])
        );
    }

    #[test]
    fn from_json_rejects_null_and_bool() {
        let err = Value::from_json(&json!({"a": {"b": null}})).unwrap_err();
        assert!(matches!(err, LuaError::InvalidStructure { ref path, .. } if path == "$.a.b"));
        assert!(Value::try_from(json!([true])).is_err());
    }

    #[test]
    fn from_toml_maps_shapes() {
        let table: toml::Value = toml::from_str("name = \"Game\"\nversion = 3\nratio = 1.5").unwrap();
        let value = Value::from_toml(&table).unwrap();
        assert_eq!(
            value,
            Value::map([
                ("name", Value::from("Game")),
                ("ratio", Value::Float(1.5)),
                ("version", Value::Int(3)),
            ])
        );
    }

    #[test]
    fn from_toml_rejects_bool() {
        let table: toml::Value = toml::from_str("debug = true").unwrap();
        assert!(Value::from_toml(&table).is_err());
    }

    #[test]
    fn literal_becomes_trimmed_json_string() {
        assert_eq!(Value::literal(" { 1 } ").to_json(), json!("{ 1 }"));
    }
}
