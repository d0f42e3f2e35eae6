//! Host-framework object definitions.
//!
//! During layout the engine consults the host's definition of the object
//! a widget is created for: dynamic sub-widget workers read id lists and
//! class names from it, and write back the subset they could actually
//! resolve. The host calls `process_layout` and `on_connect` from
//! separate call stacks without sharing the definition reference, so a
//! scoped side table bridges the two, keyed by element id and evicted as
//! soon as the connect consumes the entry.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use wren_common::Value;

/// The host framework's object-definition contract.
///
/// Interior mutability is expected: `set_property` takes `&self`, like
/// the host-side objects it models.
pub trait ObjectDefinition {
    /// Read a definition property.
    fn get_property(&self, name: &str) -> Option<Value>;
    /// Write a definition property.
    fn set_property(&self, name: &str, value: Value);
    /// The definition's object type (e.g. `field`, `occurrence`).
    fn object_type(&self) -> String;
    /// The definition's qualified object name.
    fn name(&self) -> String;
}

/// A plain in-memory [`ObjectDefinition`], used by hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryDefinition {
    object_type: String,
    name: String,
    properties: RefCell<BTreeMap<String, Value>>,
}

impl MemoryDefinition {
    /// Create a definition with the given type and name.
    pub fn new(object_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            name: name.into(),
            properties: RefCell::new(BTreeMap::new()),
        }
    }

    /// Builder-style property assignment.
    #[must_use]
    pub fn with_property(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(&name.into(), value.into());
        self
    }
}

impl ObjectDefinition for MemoryDefinition {
    fn get_property(&self, name: &str) -> Option<Value> {
        self.properties.borrow().get(name).cloned()
    }

    fn set_property(&self, name: &str, value: Value) {
        let _ = self.properties.borrow_mut().insert(name.to_string(), value);
    }

    fn object_type(&self) -> String {
        self.object_type.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// The first two colon-delimited segments of an element id; widget
/// element ids encode the owning object there.
fn id_prefix(element_id: &str) -> &str {
    let mut colons = 0;
    for (index, byte) in element_id.bytes().enumerate() {
        if byte == b':' {
            colons += 1;
            if colons == 2 {
                return &element_id[..index];
            }
        }
    }
    element_id
}

/// Side table bridging `process_layout` and `on_connect`.
///
/// Entries are keyed by the layout element's id and removed when a
/// connect consumes them, so the table never grows beyond the widgets
/// currently between their two lifecycle entry points.
#[derive(Default)]
pub struct DefinitionsTable {
    entries: BTreeMap<String, Rc<dyn ObjectDefinition>>,
}

impl DefinitionsTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the definition used to lay out the element with this id.
    pub fn insert(&mut self, element_id: impl Into<String>, definition: Rc<dyn ObjectDefinition>) {
        let _ = self.entries.insert(element_id.into(), definition);
    }

    /// Recover (and evict) the definition for an element id.
    ///
    /// Falls back to matching on the first two colon-delimited segments
    /// when no exact entry exists.
    pub fn take(&mut self, element_id: &str) -> Option<Rc<dyn ObjectDefinition>> {
        if let Some(definition) = self.entries.remove(element_id) {
            return Some(definition);
        }
        let prefix = id_prefix(element_id);
        let key = self
            .entries
            .keys()
            .find(|key| id_prefix(key) == prefix)
            .cloned()?;
        self.entries.remove(&key)
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_takes_first_two_segments() {
        assert_eq!(id_prefix("ufld:FIELD.ENTITY:DSP.1"), "ufld:FIELD.ENTITY");
        assert_eq!(id_prefix("plain"), "plain");
        assert_eq!(id_prefix("one:two"), "one:two");
    }

    #[test]
    fn take_evicts_and_matches_by_prefix() {
        let mut table = DefinitionsTable::new();
        let definition: Rc<dyn ObjectDefinition> =
            Rc::new(MemoryDefinition::new("field", "FIELD.ENTITY"));
        table.insert("ufld:FIELD.ENTITY:DSP.1", definition);

        // Different instance suffix, same object prefix.
        let recovered = table.take("ufld:FIELD.ENTITY:DSP.2");
        assert!(recovered.is_some());
        assert!(table.is_empty());
        assert!(table.take("ufld:FIELD.ENTITY:DSP.1").is_none());
    }
}
