//! Type annotation resolver.
//!
//! A field's trailing comment is the authoritative source for its type and
//! overrides value-based inference. Resolution here covers scalars and
//! annotation text only; dict/list values need nested record definitions,
//! which is orchestration and lives in the generator.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::value::Scalar;

/// Parametric `list[Event]` / `dict[str, Any]` form first, bare `str` form
/// second. Leftmost match in the text wins, not necessarily the first
/// token; at equal start positions the parametric alternative takes
/// priority.
static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\[([^\]]+)\]|\b(\w+)\b").unwrap());

/// Resolved type information for one field: base kind plus optional type
/// parameters. `params` is non-empty only for parametric bases; scalar
/// bases never carry params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAnnotation {
    // example: "dict[str, Any]" or "list[str]"
    pub base: String,
    pub params: Option<Vec<String>>,
}

impl TypeAnnotation {
    pub fn new(base: impl Into<String>, params: Option<Vec<String>>) -> Self {
        Self { base: base.into(), params }
    }

    /// Resolve from a raw trailing comment, leading marker included.
    ///
    /// An absent or empty comment yields the empty descriptor (base `""`,
    /// no params); callers must treat that as "no override", not as a
    /// valid type. Non-empty text with no identifier token at all is a
    /// fatal parse error.
    pub fn from_comment(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Ok(Self::new("", None));
        };

        let trimmed = raw.trim_matches(|c| c == '#' || c == ' ').trim();

        let Some(caps) = ANNOTATION.captures(trimmed) else {
            return Err(Error::Annotation(trimmed.to_string()));
        };

        if let (Some(base), Some(params)) = (caps.get(1), caps.get(2)) {
            let params = params
                .as_str()
                .split(',')
                .map(|p| p.trim().to_string())
                .collect();
            Ok(Self::new(base.as_str(), Some(params)))
        } else {
            // bare identifier arm
            Ok(Self::new(&caps[3], None))
        }
    }

    /// Resolve from a concrete scalar's runtime kind. No params, ever.
    pub fn from_value(scalar: &Scalar) -> Self {
        Self::new(scalar.type_name(), None)
    }
}
