//! Key-name casing. Every string is a valid input and the namer never
//! fails, so the generator never blocks on naming.

/// Wraps one raw document key. Created once per key encountered, never
/// mutated; `singular` produces a new Name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Pascal-style type name: first letter of every underscore-delimited
    /// component capitalized, components concatenated. Empty keys and keys
    /// with no underscore pass through component-wise unchanged.
    pub fn type_name(&self) -> String {
        self.0
            .split('_')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect()
    }

    /// Field-style name: the raw key, verbatim.
    pub fn field_name(&self) -> &str {
        &self.0
    }

    /// Drop a single trailing pluralizing character, if there is one. Used
    /// only when a sequence's element record needs a name distinct from the
    /// (plural) field name.
    pub fn singular(&self) -> Name {
        match self.0.strip_suffix('s') {
            Some(stripped) if !stripped.is_empty() => Name(stripped.to_string()),
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_casing_over_underscore_components() {
        assert_eq!(Name::new("server_config").type_name(), "ServerConfig");
        assert_eq!(Name::new("host").type_name(), "Host");
        assert_eq!(Name::new("").type_name(), "");
        assert_eq!(Name::new("a_b_c").type_name(), "ABC");
    }

    #[test]
    fn field_name_is_verbatim() {
        assert_eq!(Name::new("retry_count").field_name(), "retry_count");
    }

    #[test]
    fn singular_drops_one_trailing_s() {
        assert_eq!(Name::new("events").singular().field_name(), "event");
        assert_eq!(Name::new("host").singular().field_name(), "host");
        // a bare "s" stays itself rather than vanishing
        assert_eq!(Name::new("s").singular().field_name(), "s");
    }
}
