//! CLI subcommand implementations.

pub mod account;
pub mod auth;
pub mod dashboard;
pub mod list;
pub mod mutate;
pub mod print;
pub mod search;
pub mod show;
pub mod upload;

use anyhow::{anyhow, bail, Result};
use serde_json::{Map, Value};

/// Parses repeated `key=value` arguments.
pub(crate) fn parse_pairs(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected key=value, got {:?}", pair))?;
            let key = key.trim();
            if key.is_empty() {
                bail!("Empty key in {:?}", pair);
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Builds a request body from `--data` JSON and `--set key=value` pairs.
/// `--set` wins over `--data`. Values that parse as JSON (numbers, booleans,
/// `null`, objects) keep that type; anything else is sent as a string.
pub(crate) fn build_body(data: Option<&str>, set: &[String]) -> Result<Map<String, Value>> {
    let mut body = match data {
        Some(raw) => match serde_json::from_str::<Value>(raw)? {
            Value::Object(obj) => obj,
            _ => bail!("--data must be a JSON object"),
        },
        None => Map::new(),
    };
    for (key, value) in parse_pairs(set)? {
        let parsed = serde_json::from_str::<Value>(&value).unwrap_or(Value::String(value));
        body.insert(key, parsed);
    }
    Ok(body)
}
