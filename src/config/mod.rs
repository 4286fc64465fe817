//! Bidirectional codec for server configuration files.
//!
//! Two on-disk formats share one in-memory document model: plain JSON, and
//! the key=value dialect several dedicated servers use, with `[section]`
//! headers and parenthesized compound values like
//! `OptionSettings=(Difficulty=None,ExpRate=1.0)`.
//!
//! The dialect codec is tolerant on the way in (lines without `=` are
//! skipped, comments ignored) and lossy on formatting — comments and blank
//! lines do not survive a round-trip — but it is value-lossless for every
//! construct it recognizes. JSON is different: a config file this system
//! wrote itself failing to parse means real corruption, so JSON errors
//! propagate to the caller instead of degrading.

use crate::catalog::{ConfigFormat, catalog_entry};
use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use thiserror::Error;

/// An ordered mapping from keys to config values; the in-memory form of one
/// config file.
pub type ConfigDocument = IndexMap<String, ConfigValue>;

/// One value in a config document.
///
/// Sections in the textual dialect become one level of [`ConfigValue::Map`];
/// parenthesized compounds become a [`ConfigValue::List`] or a nested map
/// depending on whether their segments carry `=`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
    List(Vec<ConfigValue>),
    Map(IndexMap<String, ConfigValue>),
}

/// Errors from the codec itself.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON config root must be an object")]
    NotAnObject,
}

/// Parse configuration text in the given format.
///
/// The JSON branch is strict; the dialect branch never fails.
pub fn parse_config(text: &str, format: ConfigFormat) -> Result<ConfigDocument, ConfigError> {
    match format {
        ConfigFormat::Json => parse_json(text),
        ConfigFormat::Ini => Ok(parse_ini(text)),
    }
}

/// Serialize a document back to configuration text in the given format.
///
/// JSON output uses two-space indentation.
pub fn serialize_config(doc: &ConfigDocument, format: ConfigFormat) -> Result<String, ConfigError> {
    match format {
        ConfigFormat::Json => {
            let value = serde_json::Value::Object(
                doc.iter()
                    .map(|(key, value)| (key.clone(), to_json(value)))
                    .collect(),
            );
            Ok(serde_json::to_string_pretty(&value)?)
        }
        ConfigFormat::Ini => Ok(serialize_ini(doc)),
    }
}

/// Load and parse a server's config file.
///
/// Resolves the file from the catalog entry's config path relative to the
/// install directory; the format comes from the file extension. Servers
/// without a config path do not support config editing, and asking for one
/// is an error the caller must see.
pub async fn load_server_config(
    app_id: u32,
    install_path: &Utf8Path,
) -> Result<(ConfigDocument, ConfigFormat)> {
    let entry =
        catalog_entry(app_id).with_context(|| format!("Unknown server app ID: {}", app_id))?;
    let relative = entry
        .config_relative_path
        .with_context(|| format!("Config editing not supported for app {}", app_id))?;
    let format = entry.config_format().expect("config path implies a format");

    let config_path = install_path.join(relative);
    let text = tokio::fs::read_to_string(&config_path)
        .await
        .with_context(|| format!("Failed to read config file: {}", config_path))?;

    let doc = parse_config(&text, format)
        .with_context(|| format!("Failed to parse config file: {}", config_path))?;

    tracing::info!("Loaded config for app {} from {}", app_id, config_path);
    Ok((doc, format))
}

/// Serialize and write a server's config file back to disk.
pub async fn save_server_config(
    app_id: u32,
    install_path: &Utf8Path,
    doc: &ConfigDocument,
) -> Result<()> {
    let entry =
        catalog_entry(app_id).with_context(|| format!("Unknown server app ID: {}", app_id))?;
    let relative = entry
        .config_relative_path
        .with_context(|| format!("Config editing not supported for app {}", app_id))?;
    let format = entry.config_format().expect("config path implies a format");

    let config_path = install_path.join(relative);
    let text = serialize_config(doc, format)
        .with_context(|| format!("Failed to serialize config for app {}", app_id))?;

    tokio::fs::write(&config_path, text)
        .await
        .with_context(|| format!("Failed to write config file: {}", config_path))?;

    tracing::info!("Saved config for app {} to {}", app_id, config_path);
    Ok(())
}

fn parse_json(text: &str) -> Result<ConfigDocument, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Object(object) = value else {
        return Err(ConfigError::NotAnObject);
    };
    Ok(object
        .into_iter()
        .map(|(key, value)| (key, from_json(value)))
        .collect())
}

fn from_json(value: serde_json::Value) -> ConfigValue {
    match value {
        serde_json::Value::Null => ConfigValue::Null,
        serde_json::Value::Bool(b) => ConfigValue::Bool(b),
        serde_json::Value::Number(n) => ConfigValue::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => ConfigValue::String(s),
        serde_json::Value::Array(items) => {
            ConfigValue::List(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(object) => ConfigValue::Map(
            object
                .into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
    }
}

fn to_json(value: &ConfigValue) -> serde_json::Value {
    match value {
        ConfigValue::Null => serde_json::Value::Null,
        ConfigValue::Bool(b) => serde_json::Value::Bool(*b),
        ConfigValue::Number(n) => {
            // Keep integral values integral so 1.0 does not turn into "1.0"
            if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
                serde_json::Value::from(*n as i64)
            } else {
                serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        ConfigValue::String(s) => serde_json::Value::String(s.clone()),
        ConfigValue::List(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        ConfigValue::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect(),
        ),
    }
}

fn parse_ini(text: &str) -> ConfigDocument {
    let mut doc = ConfigDocument::new();
    let mut current_section: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim().to_string();
            doc.entry(name.clone())
                .or_insert_with(|| ConfigValue::Map(IndexMap::new()));
            current_section = Some(name);
            continue;
        }

        // Lines without '=' carry nothing we recognize; skip them
        let Some((key, raw_value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_string();
        let value = classify_value(raw_value.trim(), 0);

        match &current_section {
            Some(section) => {
                if let Some(ConfigValue::Map(map)) = doc.get_mut(section) {
                    map.insert(key, value);
                }
            }
            None => {
                doc.insert(key, value);
            }
        }
    }

    doc
}

/// Classify one raw value: quoted string, numeral, boolean, parenthesized
/// compound, or plain string.
///
/// Compounds are only opened at depth 0 — a parenthesized value inside a
/// compound stays a plain string rather than nesting further.
fn classify_value(raw: &str, depth: usize) -> ConfigValue {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return ConfigValue::String(raw[1..raw.len() - 1].to_string());
    }

    if is_numeral(raw) {
        if let Ok(n) = raw.parse::<f64>() {
            return ConfigValue::Number(n);
        }
    }

    if raw.eq_ignore_ascii_case("true") {
        return ConfigValue::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return ConfigValue::Bool(false);
    }

    if depth == 0 && raw.len() >= 2 && raw.starts_with('(') && raw.ends_with(')') {
        return classify_compound(&raw[1..raw.len() - 1]);
    }

    ConfigValue::String(raw.to_string())
}

/// A parenthesized interior: a nested mapping when any comma-separated
/// segment carries `=`, otherwise an ordered list of scalars.
fn classify_compound(interior: &str) -> ConfigValue {
    let segments = split_unquoted_commas(interior);

    if segments.iter().any(|segment| segment.contains('=')) {
        let mut map = IndexMap::new();
        for segment in &segments {
            if let Some((key, value)) = segment.split_once('=') {
                map.insert(key.trim().to_string(), classify_value(value.trim(), 1));
            }
        }
        ConfigValue::Map(map)
    } else {
        ConfigValue::List(
            segments
                .iter()
                .map(|segment| classify_value(segment, 1))
                .collect(),
        )
    }
}

/// Split on commas that are not inside double quotes.
fn split_unquoted_commas(s: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in s.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                segments.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if !current.trim().is_empty() || !segments.is_empty() {
        segments.push(current.trim().to_string());
    }

    segments
}

/// Strict numeral shape: optional sign, digits, optional decimal part.
/// Keeps `inf`/`nan`/exponent forms out of the number class.
fn is_numeral(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() {
        return false;
    }
    match digits.split_once('.') {
        Some((whole, frac)) => {
            !whole.is_empty()
                && !frac.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => digits.bytes().all(|b| b.is_ascii_digit()),
    }
}

fn serialize_ini(doc: &ConfigDocument) -> String {
    let mut out = String::new();

    // Unsectioned keys must all precede the first section header, or they
    // would be absorbed into the last section on reparse
    for (key, value) in doc {
        if !matches!(value, ConfigValue::Map(_)) {
            out.push_str(&format!("{}={}\n", key, serialize_value(value, false)));
        }
    }

    for (key, value) in doc {
        if let ConfigValue::Map(map) = value {
            out.push_str(&format!("[{}]\n", key));
            for (sub_key, sub_value) in map {
                out.push_str(&format!(
                    "{}={}\n",
                    sub_key,
                    serialize_value(sub_value, false)
                ));
            }
        }
    }

    out
}

/// Render one value. `in_compound` switches strings to the quoted-when-needed
/// form used inside parentheses.
fn serialize_value(value: &ConfigValue, in_compound: bool) -> String {
    match value {
        ConfigValue::String(s) => {
            if in_compound && (s.contains(' ') || s.contains(',') || s.contains('"')) {
                format!("\"{}\"", s)
            } else {
                s.clone()
            }
        }
        ConfigValue::Number(n) => format!("{}", n),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Null => String::new(),
        ConfigValue::List(items) => {
            let joined: Vec<String> = items
                .iter()
                .map(|item| serialize_value(item, true))
                .collect();
            format!("({})", joined.join(","))
        }
        ConfigValue::Map(map) => {
            let joined: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}={}", key, serialize_value(value, true)))
                .collect();
            format!("({})", joined.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_quoted_string_strips_one_layer() {
        assert_eq!(
            classify_value("\"hello world\"", 0),
            ConfigValue::String("hello world".to_string())
        );
    }

    #[test]
    fn test_classify_numbers() {
        assert_eq!(classify_value("123", 0), ConfigValue::Number(123.0));
        assert_eq!(classify_value("-4.5", 0), ConfigValue::Number(-4.5));
        assert_eq!(
            classify_value("1.2.3", 0),
            ConfigValue::String("1.2.3".to_string())
        );
        assert_eq!(
            classify_value("inf", 0),
            ConfigValue::String("inf".to_string())
        );
    }

    #[test]
    fn test_classify_booleans_case_insensitive() {
        assert_eq!(classify_value("true", 0), ConfigValue::Bool(true));
        assert_eq!(classify_value("FALSE", 0), ConfigValue::Bool(false));
    }

    #[test]
    fn test_compound_list() {
        let value = classify_value("(a,b,c)", 0);
        assert_eq!(
            value,
            ConfigValue::List(vec![
                ConfigValue::String("a".to_string()),
                ConfigValue::String("b".to_string()),
                ConfigValue::String("c".to_string()),
            ])
        );
    }

    #[test]
    fn test_compound_map() {
        let value = classify_value("(k1=v1,k2=2)", 0);
        let ConfigValue::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(map["k1"], ConfigValue::String("v1".to_string()));
        assert_eq!(map["k2"], ConfigValue::Number(2.0));
    }

    #[test]
    fn test_compound_quoted_comma_survives() {
        let value = classify_value("(name=\"a, b\",count=3)", 0);
        let ConfigValue::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(map["name"], ConfigValue::String("a, b".to_string()));
    }

    #[test]
    fn test_no_deeper_compound_nesting() {
        let value = classify_value("(inner=(x,y))", 0);
        let ConfigValue::Map(map) = value else {
            panic!("expected map");
        };
        // Parenthesized value at depth 1 stays a plain string
        assert_eq!(map["inner"], ConfigValue::String("(x".to_string()));
    }

    #[test]
    fn test_split_unquoted_commas_keeps_trailing_empty() {
        assert_eq!(split_unquoted_commas("a,"), vec!["a", ""]);
        assert!(split_unquoted_commas("").is_empty());
    }

    #[test]
    fn test_serialize_number_display() {
        assert_eq!(serialize_value(&ConfigValue::Number(1.0), false), "1");
        assert_eq!(serialize_value(&ConfigValue::Number(1.5), false), "1.5");
    }
}
