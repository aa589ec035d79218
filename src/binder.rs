//! Instance binder: validates a loaded document against a declared record
//! schema, then deserializes it into the target type.
//!
//! The cache is a plain caller-owned object with an explicit `reset`; there
//! is no process-wide singleton and no state tied to type identity.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::schema::{RecordSchema, Shape};

pub struct ConfigCache<T> {
    schema: &'static RecordSchema,
    cached: Option<T>,
}

impl<T: DeserializeOwned> ConfigCache<T> {
    pub fn new(schema: &'static RecordSchema) -> Self {
        Self { schema, cached: None }
    }

    /// Read, check, and bind the document, caching the result. Subsequent
    /// calls return the cached instance without touching the file system.
    pub fn load(&mut self, path: &Path) -> Result<&T> {
        if self.cached.is_some() {
            return Ok(self.cached.as_ref().unwrap());
        }
        let source = std::fs::read_to_string(path)?;
        let value: Value = serde_yaml::from_str(&source)?;
        check_record(self.schema, &value)?;
        Ok(self.cached.insert(deserialize_with_path(value)?))
    }

    pub fn get(&self) -> Result<&T> {
        self.cached.as_ref().ok_or(Error::NotLoaded)
    }

    /// Drop the cached instance; the next `load` re-reads the file.
    pub fn reset(&mut self) {
        self.cached = None;
    }
}

/// Structural check of a document against a record schema. Every declared
/// field must be present with an agreeing shape; extra document keys are
/// ignored. Sequence elements are all validated here, in contrast to the
/// generator, which only ever inspects the first one.
pub fn check_record(schema: &'static RecordSchema, value: &Value) -> Result<()> {
    if !matches!(value, Value::Mapping(_)) {
        return Err(Error::RootNotMapping);
    }
    for field in schema.fields {
        let Some(v) = value.get(field.name) else {
            return Err(Error::MissingField { record: schema.name, field: field.name });
        };
        check_shape(schema.name, field.name, &field.shape, v)?;
    }
    Ok(())
}

fn check_shape(
    record: &'static str,
    field: &'static str,
    shape: &Shape,
    value: &Value,
) -> Result<()> {
    let mismatch = |expected: &'static str| Error::ShapeMismatch { record, field, expected };
    match *shape {
        Shape::Any => Ok(()),
        Shape::Str => value.as_str().map(|_| ()).ok_or_else(|| mismatch("string")),
        Shape::Int => value.as_i64().map(|_| ()).ok_or_else(|| mismatch("integer")),
        Shape::Float => value.as_f64().map(|_| ()).ok_or_else(|| mismatch("number")),
        Shape::Bool => value.as_bool().map(|_| ()).ok_or_else(|| mismatch("boolean")),
        Shape::List(item) => {
            let Value::Sequence(xs) = value else {
                return Err(mismatch("sequence"));
            };
            for x in xs {
                check_shape(record, field, item, x)?;
            }
            Ok(())
        }
        Shape::Record(nested) => {
            if !matches!(value, Value::Mapping(_)) {
                return Err(mismatch("mapping"));
            }
            check_record(nested, value)
        }
    }
}

/// Deserialize with document-path context in error messages.
fn deserialize_with_path<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        Error::Bind(format!("at {path}: {}", err.into_inner()))
    })
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use std::io::Write;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Server {
        host: String,
        port: i64,
        tags: Vec<String>,
    }

    static SERVER_SCHEMA: RecordSchema = RecordSchema {
        name: "server",
        fields: &[
            FieldSpec { name: "host", shape: Shape::Str },
            FieldSpec { name: "port", shape: Shape::Int },
            FieldSpec { name: "tags", shape: Shape::List(&Shape::Str) },
        ],
    };

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn load_binds_and_caches() {
        let file = write_temp("host: x\nport: 1\ntags: [a, b]\n");
        let mut cache: ConfigCache<Server> = ConfigCache::new(&SERVER_SCHEMA);

        let server = cache.load(file.path()).unwrap();
        assert_eq!(
            *server,
            Server { host: "x".into(), port: 1, tags: vec!["a".into(), "b".into()] }
        );

        // cached: a vanished file no longer matters
        let path = file.path().to_path_buf();
        drop(file);
        assert!(cache.load(&path).is_ok());
        assert!(cache.get().is_ok());
    }

    #[test]
    fn get_before_load_fails() {
        let cache: ConfigCache<Server> = ConfigCache::new(&SERVER_SCHEMA);
        assert!(matches!(cache.get(), Err(Error::NotLoaded)));
    }

    #[test]
    fn reset_forces_a_reload() {
        let first = write_temp("host: x\nport: 1\ntags: []\n");
        let second = write_temp("host: y\nport: 2\ntags: []\n");
        let mut cache: ConfigCache<Server> = ConfigCache::new(&SERVER_SCHEMA);

        assert_eq!(cache.load(first.path()).unwrap().host, "x");
        // still the first instance, the path is ignored while cached
        assert_eq!(cache.load(second.path()).unwrap().host, "x");

        cache.reset();
        assert_eq!(cache.load(second.path()).unwrap().host, "y");
    }

    #[test]
    fn missing_declared_field_fails() {
        let file = write_temp("host: x\ntags: []\n");
        let mut cache: ConfigCache<Server> = ConfigCache::new(&SERVER_SCHEMA);
        let err = cache.load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField { record: "server", field: "port" }
        ));
    }

    #[test]
    fn every_sequence_element_is_checked() {
        let value: Value = serde_yaml::from_str("host: x\nport: 1\ntags: [a, 3]\n").unwrap();
        let err = check_record(&SERVER_SCHEMA, &value).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch { field: "tags", expected: "string", .. }
        ));
    }

    #[test]
    fn scalar_shape_mismatch_is_reported_with_context() {
        let value: Value = serde_yaml::from_str("host: 7\nport: 1\ntags: []\n").unwrap();
        let err = check_record(&SERVER_SCHEMA, &value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "server.host: expected string"
        );
    }

    #[test]
    fn nested_records_recurse() {
        static INNER: RecordSchema = RecordSchema {
            name: "inner",
            fields: &[FieldSpec { name: "flag", shape: Shape::Bool }],
        };
        static OUTER: RecordSchema = RecordSchema {
            name: "outer",
            fields: &[FieldSpec { name: "inner", shape: Shape::Record(&INNER) }],
        };

        let ok: Value = serde_yaml::from_str("inner:\n  flag: true\n").unwrap();
        assert!(check_record(&OUTER, &ok).is_ok());

        let bad: Value = serde_yaml::from_str("inner:\n  other: 1\n").unwrap();
        assert!(matches!(
            check_record(&OUTER, &bad).unwrap_err(),
            Error::MissingField { record: "inner", field: "flag" }
        ));
    }

    #[test]
    fn bind_errors_carry_the_document_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Narrow {
            #[allow(dead_code)]
            port: u8,
        }
        static NARROW: RecordSchema = RecordSchema {
            name: "narrow",
            fields: &[FieldSpec { name: "port", shape: Shape::Int }],
        };

        let file = write_temp("port: 70000\n");
        let mut cache: ConfigCache<Narrow> = ConfigCache::new(&NARROW);
        let err = cache.load(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("port"), "path context missing: {message}");
    }
}
