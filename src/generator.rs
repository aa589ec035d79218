//! Schema generator: the recursive walk that turns a parsed document into a
//! closed set of named record definitions.
//!
//! One record per nested mapping encountered (sequence-element mappings
//! included); cross-references become import edges; every record is written
//! as its own source unit under the destination root.
//!
//! Records are deliberately NOT deduplicated by structural equality: two
//! identical mappings under different field names stay two distinct
//! records. That is field-local typing, not canonicalization, and it keeps
//! naming a pure function of the key path.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::annot::TypeAnnotation;
use crate::builder::RecordBuilder;
use crate::error::Result;
use crate::name::Name;
use crate::value::{FieldEntry, Node};

/// Synthetic name seeding the walk at the document's top-level mapping.
const ROOT_NAME: &str = "config";

pub struct Generator {
    dest: PathBuf,
    records: Vec<RecordBuilder>,
}

impl Generator {
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self { dest: dest.into(), records: Vec::new() }
    }

    /// Walk the whole tree, then write every record to
    /// `<dest>/<field_name>.rs`. The walk fully precedes the write phase,
    /// so a failed annotation leaves zero output units.
    pub fn generate(&mut self, root: &IndexMap<String, FieldEntry>) -> Result<Vec<PathBuf>> {
        let record = self.build_record(Name::new(ROOT_NAME), root)?;
        self.records.push(record);

        std::fs::create_dir_all(&self.dest)?;
        let mut written = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let path = self.dest.join(format!("{}.rs", record.name().field_name()));
            std::fs::write(&path, record.build())?;
            written.push(path);
        }
        Ok(written)
    }

    /// Build one record from one mapping, registering nested records as
    /// they complete. The caller registers the returned record itself.
    fn build_record(
        &mut self,
        name: Name,
        map: &IndexMap<String, FieldEntry>,
    ) -> Result<RecordBuilder> {
        let mut record = RecordBuilder::new(name);

        for (key, entry) in map {
            let FieldEntry { value, comment, description } = entry;
            let name = Name::new(key.as_str());
            let comment = comment.as_deref();
            let description = description.as_deref();

            match value {
                Node::Map(inner) => {
                    let nested = self.build_record(name.clone(), inner)?;
                    self.records.push(nested);
                    record.add_import(&self.dest, &name);
                    // the comment wins unconditionally over the Pascal default
                    let annotation = match comment {
                        Some(c) => TypeAnnotation::from_comment(Some(c))?,
                        None => TypeAnnotation::new(name.type_name(), None),
                    };
                    record.add_parameter(name.field_name(), &annotation, description);
                }
                Node::Seq(items) => {
                    self.sequence_field(&mut record, &name, items, comment, description)?;
                }
                Node::Scalar(scalar) => {
                    let annotation = match comment {
                        Some(c) => TypeAnnotation::from_comment(Some(c))?,
                        None => TypeAnnotation::from_value(scalar),
                    };
                    record.add_parameter(name.field_name(), &annotation, description);
                }
            }
        }

        Ok(record)
    }

    /// Sequence handling. Only the first element's shape is ever inspected;
    /// later elements are not validated here (the binder checks instances
    /// exhaustively, the generator does not).
    fn sequence_field(
        &mut self,
        record: &mut RecordBuilder,
        name: &Name,
        items: &[Node],
        comment: Option<&str>,
        description: Option<&str>,
    ) -> Result<()> {
        if let Some(Node::Map(first)) = items.first() {
            // element records get their own singular name, distinct from
            // the plural field name
            let element = name.singular();
            let mut nested = self.build_record(element.clone(), first)?;

            let annotation = match comment {
                Some(c) => {
                    let annotation = TypeAnnotation::from_comment(Some(c))?;
                    // a `list[X]` annotation renames the element record to
                    // a lower-cased `x`, independent of the field name
                    if annotation.base == "list" {
                        if let Some(param) = annotation.params.as_ref().and_then(|p| p.first()) {
                            nested.set_name(Name::new(param.to_lowercase()));
                        }
                    }
                    annotation
                }
                None => TypeAnnotation::new("list", Some(vec![element.type_name()])),
            };

            let nested_name = nested.name().clone();
            self.records.push(nested);
            record.add_import(&self.dest, &nested_name);
            record.add_parameter(name.field_name(), &annotation, description);
        } else {
            // scalar elements, or nothing at all: no nested record
            let annotation = match comment {
                Some(c) => TypeAnnotation::from_comment(Some(c))?,
                None => {
                    let item = match items.first() {
                        Some(Node::Scalar(scalar)) => scalar.type_name(),
                        // empty, or a nested sequence we cannot name
                        _ => "Any",
                    };
                    TypeAnnotation::new("list", Some(vec![item.to_string()]))
                }
            };
            record.add_parameter(name.field_name(), &annotation, description);
        }
        Ok(())
    }
}

// ------------------------------- Tests ------------------------------------ //
