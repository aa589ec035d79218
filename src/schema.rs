//! Explicit schema descriptions for the binder.
//!
//! A record schema is a static list of field name + shape pairs consumed
//! directly by the binder; there is no runtime introspection of the target
//! type anywhere.

#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Str,
    Int,
    Float,
    Bool,
    /// Accepts anything, null included.
    Any,
    List(&'static Shape),
    Record(&'static RecordSchema),
}

#[derive(Debug)]
pub struct RecordSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: Shape,
}
