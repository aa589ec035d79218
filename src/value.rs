// Tagged value model for one parsed document. No serde_yaml::Value here.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Map(IndexMap<String, FieldEntry>), // insertion-ordered, keys unique
    Seq(Vec<Node>),
    Scalar(Scalar),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(OrderedFloat<f64>),
    Bool(bool),
    Null,
}

/// One map entry: a value, plus the raw trailing comment (marker included)
/// and an optional free-text description. Comment absence does not mean
/// "untyped"; it means "infer from value".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub value: Node,
    pub comment: Option<String>,
    pub description: Option<String>,
}

impl Scalar {
    /// Canonical descriptor name for this runtime kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Str(_) => "str",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "bool",
            // YAML nulls carry no usable kind; the loosest descriptor wins
            Scalar::Null => "Any",
        }
    }
}
