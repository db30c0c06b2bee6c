//! Generic-serializer rendering, kept for output compatibility checks.
//!
//! The tree is wrapped as `{ name: value }`, pretty-printed by serde_json
//! with a four-space indent (keys come out sorted because `serde_json::Map`
//! is ordered), and then rewritten line by line:
//!
//! | JSON line | Lua line |
//! |---|---|
//! | `"key": {` / `"key": [` | `key = ` then `{` |
//! | `"key": {}` / `"key": []` | header plus an empty body |
//! | `"key": 1,` | `key = 1,` |
//! | `"key": "{ x }"` | `key = { x }` |
//! | `"[\"K\"] = \"v\""` in a list | `["K"] = "v"` |
//! | `]` / `}` | `}` |
//!
//! Literals travel as JSON strings, so only literals starting with `{`
//! survive the round trip unquoted.

use super::{
    EntryPrefix, LuaError, Value, format_element_str, format_float, format_value_str, invalid,
    validate,
};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

const JSON_INDENT: &str = "    ";

/// `"key": rest` with the key as a JSON string token.
static KEY_LINE: OnceLock<Regex> = OnceLock::new();
/// A closing bracket or brace, optionally followed by a comma.
static CLOSE_LINE: OnceLock<Regex> = OnceLock::new();

fn key_line() -> &'static Regex {
    KEY_LINE.get_or_init(|| {
        Regex::new(r#"^(?P<indent> *)(?P<key>"(?:[^"\\]|\\.)*"): (?P<rest>.+)$"#)
            .expect("invalid key line regex")
    })
}

fn close_line() -> &'static Regex {
    CLOSE_LINE.get_or_init(|| {
        Regex::new(r"^(?P<indent> *)[\]}](?P<comma>,?)$").expect("invalid close line regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Map,
    List,
}

/// Render `value` as the Lua entry `name` through serde_json.
///
/// Produces the same text as [`serialize`](super::serialize) for every tree
/// whose literals start with `{`.
pub fn serialize_legacy(name: &str, value: &Value) -> Result<String, LuaError> {
    validate(name, value)?;

    let mut root = serde_json::Map::new();
    root.insert(name.to_string(), value.to_json());
    let pretty = to_pretty_json(&serde_json::Value::Object(root))?;

    // Drop the wrapping object's braces and its indent level.
    let lines: Vec<&str> = pretty.lines().collect();
    let body = lines
        .get(1..lines.len().saturating_sub(1))
        .unwrap_or_default();

    let mut out = String::new();
    let mut frames = Vec::new();
    for &line in body {
        let line = line.strip_prefix(JSON_INDENT).unwrap_or(line);
        rewrite_line(line, &mut frames, &mut out)?;
    }
    Ok(out)
}

fn to_pretty_json(value: &serde_json::Value) -> Result<String, LuaError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| invalid("$", format!("non UTF-8 output: {e}")))
}

fn rewrite_line(line: &str, frames: &mut Vec<Frame>, out: &mut String) -> Result<(), LuaError> {
    if let Some(caps) = close_line().captures(line) {
        frames.pop();
        out.push_str(&caps["indent"]);
        out.push('}');
        out.push_str(&caps["comma"]);
        out.push('\n');
        return Ok(());
    }

    if frames.last() == Some(&Frame::List) {
        let pad_len = line.len() - line.trim_start_matches(' ').len();
        let (pad, rest) = line.split_at(pad_len);
        let (token, comma) = split_comma(rest);
        out.push_str(pad);
        out.push_str(&element_text(token)?);
        out.push_str(comma);
        out.push('\n');
        return Ok(());
    }

    let caps = key_line()
        .captures(line)
        .ok_or_else(|| invalid(line.trim(), "unexpected line in generic output"))?;
    let pad = caps.name("indent").map_or("", |m| m.as_str());
    let key: String = serde_json::from_str(&caps["key"])?;
    let rest = caps.name("rest").map_or("", |m| m.as_str());
    let prefix = EntryPrefix::of(&key);

    match rest {
        "{" | "[" => {
            prefix.push_header(out, pad);
            out.push_str(pad);
            out.push_str("{\n");
            frames.push(if rest == "{" { Frame::Map } else { Frame::List });
        }
        _ => {
            let (token, comma) = split_comma(rest);
            match token {
                "{}" | "[]" => {
                    prefix.push_header(out, pad);
                    out.push_str(pad);
                    out.push_str(if token == "{}" { "{\n" } else { "{\n\n" });
                    out.push_str(pad);
                    out.push('}');
                }
                _ => {
                    out.push_str(pad);
                    prefix.push_inline(out);
                    out.push_str(&scalar_text(token)?);
                }
            }
            out.push_str(comma);
            out.push('\n');
        }
    }
    Ok(())
}

/// JSON tokens never end in a bare comma, so a trailing one is a separator.
fn split_comma(token: &str) -> (&str, &str) {
    match token.strip_suffix(',') {
        Some(stripped) => (stripped, ","),
        None => (token, ""),
    }
}

fn scalar_text(token: &str) -> Result<String, LuaError> {
    if token.starts_with('"') {
        let text: String = serde_json::from_str(token)?;
        Ok(format_value_str(&text))
    } else {
        Ok(number_text(token))
    }
}

fn element_text(token: &str) -> Result<String, LuaError> {
    if token.starts_with('"') {
        let text: String = serde_json::from_str(token)?;
        Ok(format_element_str(&text))
    } else {
        Ok(number_text(token))
    }
}

/// Integers pass through; floats are re-rendered so exponents and small
/// fractions read the same as the primary writer's.
fn number_text(token: &str) -> String {
    if token.parse::<i64>().is_ok() {
        return token.to_string();
    }
    match token.parse::<f64>() {
        Ok(f) => format_float(f),
        Err(_) => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua::serialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn assert_same(name: &str, value: &Value) {
        let primary = serialize(name, value).unwrap();
        let legacy = serialize_legacy(name, value).unwrap();
        assert_eq!(legacy, primary, "legacy output diverged for {name}");
    }

    #[test]
    fn nested_mapping_matches() {
        let value = Value::from_json(&json!({"a": 1, "b": {"c": "x"}})).unwrap();
        assert_eq!(
            serialize_legacy("settings", &value).unwrap(),
            "settings = \n{\n    a = 1,\n    b = \n    {\n        c = \"x\"\n    }\n}\n"
        );
    }

    #[test]
    fn lists_and_bracket_entries_match() {
        let value = Value::map([
            ("icons", Value::list(["Icon.png", "Icon@2x.png"])),
            (
                "launch",
                Value::map([
                    ("!100", Value::list(["[\"UILaunchImageName\"] = \"Default\""])),
                    ("!101", Value::list(["[\"UILaunchImageName\"] = \"Default-568h\""])),
                ]),
            ),
        ]);
        assert_same("plist", &value);
    }

    #[test]
    fn brace_literals_and_strings_match() {
        let value = Value::map([
            ("all", Value::literal("{ 'exclude/*' }")),
            ("supported", Value::from("  { \"a\",\"b\" }")),
            ("name", Value::from("Game")),
        ]);
        assert_same("excludeFiles", &value);
    }

    #[test]
    fn numbers_match() {
        let value = Value::map([
            ("width", Value::Int(640)),
            ("ratio", Value::Float(1.5)),
            ("scale", Value::Float(2.0)),
            ("offsets", Value::List(vec![Value::Int(-3), Value::Float(0.25)])),
        ]);
        assert_same("content", &value);
    }

    #[test]
    fn exponent_floats_match() {
        let value = Value::map([
            ("big", Value::Float(1e16)),
            ("huge", Value::Float(1e21)),
            ("tiny", Value::Float(1e-5)),
            ("max", Value::Float(1e100)),
            ("list", Value::List(vec![Value::Float(1e16), Value::Float(-1e-5)])),
            ("count", Value::Int(i64::MAX)),
        ]);
        assert_same("content", &value);
        assert!(
            serialize_legacy("content", &value)
                .unwrap()
                .contains("big = 1e16,")
        );
    }

    #[test]
    fn return_and_anonymous_match() {
        let value = Value::map([
            ("!1", Value::from("first")),
            ("!2", Value::map([("x", 1i64)])),
        ]);
        assert_same("return", &value);
        assert_same("return", &Value::Int(7));
    }

    #[test]
    fn empty_containers_match() {
        let value = Value::map([
            ("none", Value::List(vec![])),
            ("nothing", Value::Map(BTreeMap::new())),
        ]);
        assert_same("t", &value);
        assert_same("l", &Value::List(vec![]));
    }

    #[test]
    fn escaped_text_matches() {
        let value = Value::map([
            ("quote", Value::from("say \"hi\"")),
            ("path", Value::from("C:\\media")),
            ("lines", Value::from("a\nb")),
            ("key \"odd\"", Value::from("tab\there")),
        ]);
        assert_same("t", &value);
    }

    #[test]
    fn control_characters_match() {
        let value = Value::map([
            ("crlf", Value::from("a\r\nb")),
            ("bell", Value::from("ding\u{7}")),
            ("list", Value::list(["\u{1b}[0m", "x\ty"])),
        ]);
        assert_same("t", &value);
        assert!(
            serialize_legacy("t", &value)
                .unwrap()
                .contains("crlf = \"a\\r\\nb\"")
        );
    }

    #[test]
    fn invalid_trees_rejected_too() {
        let value = Value::List(vec![Value::map([("a", 1i64)])]);
        assert!(matches!(
            serialize_legacy("l", &value),
            Err(LuaError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn bare_literal_comes_back_quoted() {
        let value = Value::map([("v", Value::literal("nil"))]);
        assert_eq!(serialize_legacy("t", &value).unwrap(), "t = \n{\n    v = \"nil\"\n}\n");
    }
}
