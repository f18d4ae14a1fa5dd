//! Serialization codec for project documents
//!
//! Converts between the textual JSON representation, the in-memory value
//! tree, and a flattened CSV representation used for prompt-sheet exports.
//!
//! The JSON side is deliberately conservative: 2-space indentation and key
//! order preserved as inserted, so exported files diff cleanly against the
//! files they were imported from.

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

/// Parse a textual JSON payload into an in-memory value tree.
///
/// # Arguments
/// * `text` - Raw JSON text (UTF-8)
///
/// # Returns
/// The parsed value, or [`DataError::Parse`](crate::DataError::Parse) when
/// the text is not well-formed JSON.
pub fn decode(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Serialize a value back to canonical textual form.
///
/// Output uses 2-space indentation with map keys in insertion order, so
/// `decode(encode(x))` is structurally equal to `x` for any tree of
/// scalars, maps and sequences.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Convert a collection to comma-separated text.
///
/// Two shapes are supported:
/// * a sequence of uniformly-shaped records becomes a header row (keys of
///   the first record) plus one row per record;
/// * a single flat map becomes a two-column `Key,Value` table.
///
/// Anything else, including the empty sequence, yields the empty string.
pub fn to_csv(data: &Value) -> String {
    match data {
        Value::Array(rows) => {
            let Some(first) = rows.first().and_then(Value::as_object) else {
                return String::new();
            };

            let headers: Vec<&String> = first.keys().collect();
            let mut csv = headers
                .iter()
                .map(|h| escape_field(h.as_str()))
                .collect::<Vec<_>>()
                .join(",");
            csv.push('\n');

            for row in rows {
                let fields: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        row.get(h.as_str())
                            .map(csv_field)
                            .unwrap_or_default()
                    })
                    .collect();
                csv.push_str(&fields.join(","));
                csv.push('\n');
            }
            csv
        }
        Value::Object(map) => {
            let rows: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{},{}", escape_field(key), csv_field(value)))
                .collect();
            format!("Key,Value\n{}", rows.join("\n"))
        }
        _ => String::new(),
    }
}

/// Render a single field value for a CSV cell.
///
/// Null becomes the empty string; scalars render directly; nested maps and
/// sequences are re-encoded as compact JSON before escaping.
fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => escape_field(s),
        other => escape_field(&other.to_string()),
    }
}

/// Apply the standard CSV quoting rule: wrap in double quotes when the
/// value contains a comma or newline, doubling internal double quotes.
fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
