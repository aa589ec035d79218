//! YAML document reader.
//!
//! Structure comes from `serde_yaml` (mapping order preserved); trailing
//! comments come from a line-oriented scan of the raw source, keyed by the
//! indent-derived key path. Each key's inline trailing comment is attached
//! verbatim, leading `#` marker included; stripping the marker is the
//! annotation resolver's job, not ours.
//!
//! A mapping of the shape `{value: ..., comment: ..., description: ...}`
//! is the explicit field-metadata wrapper and folds into the entry instead
//! of becoming a nested record. An explicit `comment` member wins over a
//! trailing comment on the same key.

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use ordered_float::OrderedFloat;
use regex::Regex;
use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::value::{FieldEntry, Node, Scalar};

/// A `key:` opener at some indent. Quoted keys allowed; full-line comments
/// never match (a key cannot start with `#`).
static KEY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^([ \t]*(?:- +)*)("[^"]*"|'[^']*'|[^\s:#][^:#]*?)\s*:(?: |$)"#).unwrap());

pub fn load(path: &Path) -> Result<Node> {
    let source = std::fs::read_to_string(path)?;
    parse_str(&source)
}

pub fn parse_str(source: &str) -> Result<Node> {
    let value: Value = serde_yaml::from_str(source)?;
    if !matches!(value, Value::Mapping(_)) {
        return Err(Error::RootNotMapping);
    }
    let comments = scan_comments(source);
    Ok(convert(&value, "", &comments))
}

// ------------------------------ Comments ---------------------------------- //

/// Map dot-joined key paths to their trailing comments. Sequence indices do
/// not extend the path, so a comment inside any element of a
/// sequence-of-maps lands on `parent.key`; the first occurrence wins, which
/// matches the generator's first-element-only view of sequences.
fn scan_comments(source: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let mut stack: Vec<(usize, String)> = Vec::new(); // (indent, key)

    for line in source.lines() {
        let Some(caps) = KEY_LINE.captures(line) else { continue };
        // a `- ` prefix opens one nesting level per dash
        let indent = caps[1].len();
        let key = caps[2].trim_matches(|c| c == '"' || c == '\'').to_string();

        while stack.last().is_some_and(|(i, _)| *i >= indent) {
            stack.pop();
        }

        if let Some(comment) = trailing_comment(line) {
            let path = stack
                .iter()
                .map(|(_, k)| k.as_str())
                .chain(std::iter::once(key.as_str()))
                .collect::<Vec<_>>()
                .join(".");
            out.entry(path).or_insert(comment);
        }
        stack.push((indent, key));
    }
    out
}

/// Inline trailing comment, verbatim from the `#` marker to end of line.
/// A `#` counts only outside quotes and preceded by whitespace.
fn trailing_comment(line: &str) -> Option<String> {
    let mut in_single = false;
    let mut in_double = false;
    let mut prev_ws = true;
    for (i, c) in line.char_indices() {
        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '#' if !in_single && !in_double && prev_ws => {
                return Some(line[i..].trim_end().to_string());
            }
            _ => {}
        }
        prev_ws = c.is_whitespace();
    }
    None
}

// ------------------------------ Conversion -------------------------------- //

fn convert(value: &Value, path: &str, comments: &BTreeMap<String, String>) -> Node {
    match value {
        Value::Mapping(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (k, v) in map {
                let key = key_string(k);
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                out.insert(key, field_entry(v, &child_path, comments));
            }
            Node::Map(out)
        }
        // indices do not extend the comment path
        Value::Sequence(xs) => Node::Seq(xs.iter().map(|x| convert(x, path, comments)).collect()),
        Value::Tagged(tagged) => convert(&tagged.value, path, comments),
        scalar => Node::Scalar(scalar_of(scalar)),
    }
}

fn field_entry(value: &Value, path: &str, comments: &BTreeMap<String, String>) -> FieldEntry {
    let trailing = comments.get(path).cloned();

    if let Value::Mapping(map) = value {
        let mut inner: Option<&Value> = None;
        let mut explicit_comment: Option<String> = None;
        let mut description: Option<String> = None;
        let mut wrapper = true;
        for (k, v) in map {
            match k.as_str() {
                Some("value") => inner = Some(v),
                Some("comment") => explicit_comment = v.as_str().map(str::to_string),
                Some("description") => description = v.as_str().map(str::to_string),
                _ => {
                    wrapper = false;
                    break;
                }
            }
        }
        if wrapper {
            if let Some(inner) = inner {
                return FieldEntry {
                    value: convert(inner, path, comments),
                    comment: explicit_comment.or(trailing),
                    description,
                };
            }
        }
    }

    FieldEntry {
        value: convert(value, path, comments),
        comment: trailing,
        description: None,
    }
}

fn scalar_of(value: &Value) -> Scalar {
    match value {
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Scalar::Int(i),
            None => Scalar::Float(OrderedFloat(n.as_f64().unwrap_or(f64::NAN))),
        },
        Value::String(s) => Scalar::Str(s.clone()),
        _ => Scalar::Null,
    }
}

fn key_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

// -------------------------------- Tests ----------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;

    fn root_map(source: &str) -> IndexMap<String, FieldEntry> {
        match parse_str(source).unwrap() {
            Node::Map(map) => map,
            other => panic!("expected mapping root, got {other:?}"),
        }
    }

    #[test]
    fn trailing_comment_attaches_verbatim_with_marker() {
        let map = root_map("host: localhost # str\nport: 8080\n");
        assert_eq!(map["host"].comment.as_deref(), Some("# str"));
        assert_eq!(map["port"].comment, None);
    }

    #[test]
    fn comments_resolve_by_key_path() {
        let source = "server:\n  host: x # str\nport: 1 # int\n";
        let map = root_map(source);
        let Node::Map(server) = &map["server"].value else { panic!("server must be a map") };
        assert_eq!(server["host"].comment.as_deref(), Some("# str"));
        assert_eq!(map["port"].comment.as_deref(), Some("# int"));
    }

    #[test]
    fn sequence_of_maps_comments_reach_element_fields() {
        let source = "events: # list[Event]\n  - name: a # str\n  - name: b\n";
        let map = root_map(source);
        assert_eq!(map["events"].comment.as_deref(), Some("# list[Event]"));
        let Node::Seq(items) = &map["events"].value else { panic!("events must be a seq") };
        let Node::Map(first) = &items[0] else { panic!("first element must be a map") };
        assert_eq!(first["name"].comment.as_deref(), Some("# str"));
    }

    #[test]
    fn hash_inside_quotes_is_not_a_comment() {
        let map = root_map("url: \"http://x/#frag\" # str\n");
        assert_eq!(map["url"].comment.as_deref(), Some("# str"));
        assert_eq!(
            map["url"].value,
            Node::Scalar(Scalar::Str("http://x/#frag".to_string()))
        );
    }

    #[test]
    fn metadata_wrapper_folds_into_the_entry() {
        let source = "timeout:\n  value: 30\n  description: seconds before giving up\n";
        let map = root_map(source);
        let entry = &map["timeout"];
        assert_eq!(entry.value, Node::Scalar(Scalar::Int(30)));
        assert_eq!(entry.description.as_deref(), Some("seconds before giving up"));
    }

    #[test]
    fn explicit_comment_member_wins_over_trailing() {
        let source = "retries: # bool\n  value: 3\n  comment: \"# int\"\n";
        let map = root_map(source);
        assert_eq!(map["retries"].comment.as_deref(), Some("# int"));
        assert_eq!(map["retries"].value, Node::Scalar(Scalar::Int(3)));
    }

    #[test]
    fn mapping_with_extra_keys_is_not_a_wrapper() {
        let source = "amount:\n  value: 3\n  unit: ms\n";
        let map = root_map(source);
        let Node::Map(inner) = &map["amount"].value else { panic!("amount must stay a map") };
        assert!(inner.contains_key("value"));
        assert!(inner.contains_key("unit"));
    }

    #[test]
    fn scalar_kinds() {
        let map = root_map("a: 1\nb: 1.5\nc: true\nd: x\ne:\n");
        assert_eq!(map["a"].value, Node::Scalar(Scalar::Int(1)));
        assert_eq!(map["b"].value, Node::Scalar(Scalar::Float(OrderedFloat(1.5))));
        assert_eq!(map["c"].value, Node::Scalar(Scalar::Bool(true)));
        assert_eq!(map["d"].value, Node::Scalar(Scalar::Str("x".to_string())));
        assert_eq!(map["e"].value, Node::Scalar(Scalar::Null));
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        assert!(matches!(parse_str("- 1\n- 2\n"), Err(Error::RootNotMapping)));
    }

    #[test]
    fn map_order_is_document_order() {
        let map = root_map("zeta: 1\nalpha: 2\nmid: 3\n");
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
