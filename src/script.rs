//! Reading and writing rustdoc's `trait.impl/**/trait.*.js` scripts.
//!
//! Each script assigns a crate -> implementor-list table to `implementors` and
//! then hands it to `window.register_implementors`, or parks it in
//! `window.pending_implementors` when the page has not registered the callback
//! yet. Rustdoc has written the table in a few shapes over time:
//!
//! - `var implementors = {"cbc":[["impl ..."]], ...};`
//! - `var implementors = Object.fromEntries([["cbc",[["impl ...",0,[]]]], ...]);`
//! - entries as bare strings or `{"text": .., "synthetic": .., "types": [..]}`
//!
//! All of them decode to the same [`ImplementorTable`].

use crate::error::ScriptError;
use crate::implementor::ImplementorRecord;
use crate::table::ImplementorTable;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static ASSIGNMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:var|let|const)\s+implementors\s*=\s*").unwrap());

const FROM_ENTRIES: &str = "Object.fromEntries(";

const HANDOFF: &str = "if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}";

/// Decode the implementor table assigned by a rustdoc implementor script.
pub fn parse_implementors_script(source: &str) -> Result<ImplementorTable, ScriptError> {
    let assignment = ASSIGNMENT_REGEX
        .find(source)
        .ok_or(ScriptError::MissingAssignment)?;
    let rest = source[assignment.end()..].trim_start();
    let rest = rest.strip_prefix(FROM_ENTRIES).unwrap_or(rest);

    // Only the first JSON value matters; the hand-off code follows it.
    let payload = serde_json::Deserializer::from_str(rest)
        .into_iter::<Value>()
        .next()
        .ok_or(ScriptError::MissingAssignment)??;

    let pairs: Vec<(String, Value)> = match payload {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(entries) => entries
            .into_iter()
            .map(crate_pair)
            .collect::<Result<_, _>>()?,
        other => return Err(ScriptError::InvalidShape(value_kind(&other).to_string())),
    };

    let mut table = ImplementorTable::new();
    for (crate_name, list) in pairs {
        let Value::Array(entries) = list else {
            return Err(ScriptError::InvalidCrateList { crate_name });
        };
        let records = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| record_from_entry(&crate_name, index, entry))
            .collect::<Result<Vec<_>, _>>()?;
        table.set_crate(crate_name, records);
    }

    tracing::trace!(
        crates = table.crate_count(),
        records = table.len(),
        "Decoded implementor script"
    );
    Ok(table)
}

/// Encode a table as the script rustdoc writes for it.
///
/// As in rustdoc, only synthetic entries carry the `,1,[aliases]` suffix.
/// Aliases on a non-synthetic record are not written.
pub fn render_implementors_script(table: &ImplementorTable) -> String {
    let crates: Vec<String> = table
        .iter()
        .map(|(crate_name, records)| {
            let entries = Value::Array(records.iter().map(entry_value).collect());
            format!("{}:{}", Value::String(crate_name.to_string()), entries)
        })
        .collect();

    format!(
        "(function() {{var implementors = {{\n{}\n}};{}}})()",
        crates.join(",\n"),
        HANDOFF
    )
}

fn crate_pair(pair: Value) -> Result<(String, Value), ScriptError> {
    let Value::Array(items) = pair else {
        return Err(ScriptError::InvalidShape(format!(
            "expected [crate, implementors] pair, found {}",
            value_kind(&pair)
        )));
    };
    let mut items = items.into_iter();
    match (items.next(), items.next()) {
        (Some(Value::String(crate_name)), Some(list)) => Ok((crate_name, list)),
        _ => Err(ScriptError::InvalidShape(
            "expected [crate, implementors] pair".to_string(),
        )),
    }
}

fn record_from_entry(
    crate_name: &str,
    index: usize,
    entry: Value,
) -> Result<ImplementorRecord, ScriptError> {
    let invalid = || ScriptError::InvalidEntry {
        crate_name: crate_name.to_string(),
        index,
    };

    match entry {
        Value::String(html) => Ok(ImplementorRecord::new(html)),
        Value::Array(items) => {
            let mut items = items.into_iter();
            let Some(Value::String(html)) = items.next() else {
                return Err(invalid());
            };
            let synthetic = items.next().is_some_and(|flag| is_truthy(&flag));
            let aliases = items.next().map(string_list).unwrap_or_default();
            Ok(ImplementorRecord::with_metadata(html, synthetic, aliases))
        }
        Value::Object(mut map) => {
            let Some(Value::String(html)) = map.remove("text") else {
                return Err(invalid());
            };
            let synthetic = map.get("synthetic").is_some_and(is_truthy);
            let aliases = map.remove("types").map(string_list).unwrap_or_default();
            Ok(ImplementorRecord::with_metadata(html, synthetic, aliases))
        }
        _ => Err(invalid()),
    }
}

fn entry_value(record: &ImplementorRecord) -> Value {
    let mut items = vec![Value::String(record.html().to_string())];
    if record.is_synthetic() {
        items.push(Value::from(1));
        items.push(Value::Array(
            record
                .aliases()
                .iter()
                .cloned()
                .map(Value::String)
                .collect(),
        ));
    }
    Value::Array(items)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

fn string_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
