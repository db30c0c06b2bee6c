//! Direct recursive rendering of a [`Value`] tree.

use super::{
    EntryPrefix, LuaError, Value, format_element_str, format_float, format_value_str, indent,
    validate,
};

/// Render `value` as the Lua entry `name`.
///
/// The result always ends with a newline and never with a comma.
pub fn serialize(name: &str, value: &Value) -> Result<String, LuaError> {
    validate(name, value)?;
    let mut out = String::new();
    write_entry(&mut out, name, value, 0, true);
    Ok(out)
}

fn write_entry(out: &mut String, name: &str, value: &Value, depth: usize, last: bool) {
    let pad = indent(depth);
    let prefix = EntryPrefix::of(name);

    match value {
        Value::Map(map) => {
            prefix.push_header(out, &pad);
            out.push_str(&pad);
            out.push_str("{\n");
            let count = map.len();
            for (i, (key, child)) in map.iter().enumerate() {
                write_entry(out, key, child, depth + 1, i + 1 == count);
            }
            out.push_str(&pad);
            out.push('}');
        }
        Value::List(items) => {
            prefix.push_header(out, &pad);
            out.push_str(&pad);
            out.push_str("{\n");
            let item_pad = indent(depth + 1);
            let lines: Vec<String> = items
                .iter()
                .map(|item| format!("{item_pad}{}", format_element(item)))
                .collect();
            out.push_str(&lines.join(",\n"));
            out.push('\n');
            out.push_str(&pad);
            out.push('}');
        }
        scalar => {
            out.push_str(&pad);
            prefix.push_inline(out);
            out.push_str(&format_scalar(scalar));
        }
    }

    if !last {
        out.push(',');
    }
    out.push('\n');
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::Str(s) => format_value_str(s),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Literal(s) => s.trim().to_string(),
        Value::Map(_) | Value::List(_) => unreachable!("containers are not scalars"),
    }
}

fn format_element(value: &Value) -> String {
    match value {
        Value::Str(s) => format_element_str(s),
        other => format_scalar(other),
    }
}
