//! Canonical YAML emission with the cosmetic prettify pass
//!
//! The serializer sees an opaque document graph: nulls and empty containers
//! are pruned so published documents stay sparse, then the prettify pass
//! inserts blank lines at section boundaries.

use std::sync::OnceLock;

use regex::Regex;
use serde_yaml_ng::{Mapping, Value};

use crate::config::SerializationSettings;
use crate::error::PipewrightResult;

/// Serialize a definition's document graph to YAML text
pub fn serialize(document: &Value, settings: &SerializationSettings) -> PipewrightResult<String> {
    let pruned = prune(document).unwrap_or(Value::Mapping(Mapping::new()));
    let yaml = serde_yaml_ng::to_string(&pruned)?;
    Ok(if settings.prettify {
        prettify(&yaml)
    } else {
        yaml
    })
}

/// Drop nulls and empty containers, recursively
///
/// Scalar zero-default omission and camelCase field naming are carried by
/// the definition types' serde attributes; the graph arriving here is
/// already field-named for the document format.
fn prune(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Sequence(items) => {
            let kept: Vec<Value> = items.iter().filter_map(prune).collect();
            if kept.is_empty() {
                None
            } else {
                Some(Value::Sequence(kept))
            }
        }
        Value::Mapping(entries) => {
            let mut kept = Mapping::new();
            for (key, item) in entries {
                if let Some(item) = prune(item) {
                    kept.insert(key.clone(), item);
                }
            }
            if kept.is_empty() {
                None
            } else {
                Some(Value::Mapping(kept))
            }
        }
        other => Some(other.clone()),
    }
}

fn section_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[a-zA-Z]+:").expect("valid regex"))
}

fn main_item_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n {0,8}- ?[a-zA-Z]+@?[a-zA-Z.0-9]*:").expect("valid regex"))
}

fn conditioned_block_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n {0,8}- ?\$\{\{ ?(?:if|else|each)[^\n]+\n").expect("valid regex"))
}

fn double_newline_after_key() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":\n\n").expect("valid regex"))
}

/// Insert blank lines so the emitted document is easier to scan
///
/// Four passes in fixed order; the last pass collapses the double breaks
/// the first three introduce directly under a bare `key:` line, so
/// reordering them changes the output.
pub fn prettify(yaml: &str) -> String {
    let yaml = section_start().replace_all(yaml, "\n$0");
    let yaml = main_item_start().replace_all(&yaml, "\n$0");
    let yaml = conditioned_block_start().replace_all(&yaml, "\n$0");
    double_newline_after_key()
        .replace_all(&yaml, ":\n")
        .into_owned()
}

/// Prepend the definition's header comment block
pub fn with_header(yaml: &str, header: &[String]) -> String {
    let mut text = String::with_capacity(yaml.len() + header.len() * 40);
    for line in header {
        if line.is_empty() {
            text.push_str("###\n");
        } else {
            text.push_str("### ");
            text.push_str(line);
            text.push('\n');
        }
    }
    text.push('\n');
    text.push_str(yaml);
    text
}
