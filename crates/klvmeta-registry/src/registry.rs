use std::collections::BTreeMap;

use crate::error::{FieldError, Result};
use crate::rule::{FieldRule, STANDARD_RULES};

/// A decoded field ready to be placed in a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    pub tag: u8,
    pub name: &'static str,
    pub value: String,
}

/// Tag-keyed table of decode rules.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    rules: BTreeMap<u8, FieldRule>,
}

impl FieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Registry holding every rule in [`STANDARD_RULES`].
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for rule in STANDARD_RULES {
            registry.register(*rule);
        }
        registry
    }

    /// Register a rule, replacing any existing rule for the same tag.
    pub fn register(&mut self, rule: FieldRule) -> Option<FieldRule> {
        self.rules.insert(rule.tag, rule)
    }

    /// Look up the rule for a tag.
    pub fn lookup(&self, tag: u8) -> Option<&FieldRule> {
        self.rules.get(&tag)
    }

    /// Decode one field value.
    pub fn decode(&self, tag: u8, value: &[u8]) -> Result<DecodedField> {
        let rule = self.lookup(tag).ok_or(FieldError::UnknownTag { tag })?;
        let value = rule.decode(value)?;
        tracing::trace!(tag, name = rule.name, %value, "decoded field");
        Ok(DecodedField {
            tag,
            name: rule.name,
            value,
        })
    }

    /// All rules in ascending tag order.
    pub fn rules(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::DecodeKind;

    #[test]
    fn standard_registry_has_every_rule() {
        let registry = FieldRegistry::standard();
        assert_eq!(registry.len(), STANDARD_RULES.len());
        assert!(registry.lookup(1).is_some());
        assert!(registry.lookup(94).is_some());
        assert!(registry.lookup(3).is_none());
    }

    #[test]
    fn decode_known_tag() {
        let registry = FieldRegistry::standard();
        let field = registry.decode(1, &[0x00, 0x2A]).unwrap();
        assert_eq!(
            field,
            DecodedField {
                tag: 1,
                name: "checksum",
                value: "42".to_string()
            }
        );
    }

    #[test]
    fn decode_unknown_tag() {
        let registry = FieldRegistry::standard();
        let err = registry.decode(99, &[0x01, 0x02]).unwrap_err();
        assert_eq!(err, FieldError::UnknownTag { tag: 99 });
    }

    #[test]
    fn rules_iterate_in_tag_order() {
        let tags: Vec<u8> = FieldRegistry::standard().rules().map(|r| r.tag).collect();
        let mut sorted = tags.clone();
        sorted.sort_unstable();
        assert_eq!(tags, sorted);
    }

    #[test]
    fn register_replaces_existing_rule() {
        let mut registry = FieldRegistry::new();
        assert!(registry.is_empty());
        registry.register(FieldRule {
            tag: 3,
            name: "mission_id",
            kind: DecodeKind::Characters,
        });
        let previous = registry.register(FieldRule {
            tag: 3,
            name: "mission",
            kind: DecodeKind::Characters,
        });

        assert_eq!(previous.map(|r| r.name), Some("mission_id"));
        assert_eq!(registry.decode(3, b"M1").unwrap().name, "mission");
    }
}
