//! Property stores and deltas.
//!
//! A widget instance keeps its current logical state in a
//! [`PropertyStore`], nested by property group exactly like a class's
//! default values. Incoming changes arrive as a [`PropDelta`]: the same
//! shape, carrying RESET-aware entries, with a normalization step that
//! folds the host's flattened key spellings into the nested form.

use std::collections::BTreeMap;

use serde::Serialize;
use wren_common::{DeltaValue, PropPath, ValRepItem, Value};

/// The nested, authoritative property state of a widget instance; also
/// the shape of a widget class's registered default values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PropertyStore {
    /// HTML attribute/property values of the wrapped control, by id.
    pub html: BTreeMap<String, Value>,
    /// Framework-level property values, by id.
    pub uniface: BTreeMap<String, Value>,
    /// Inline style properties, by id.
    pub style: BTreeMap<String, Value>,
    /// Css class toggles, by class name.
    pub classes: BTreeMap<String, Value>,
    /// The scalar field value.
    pub value: Value,
    /// The option list for value-and-representation controls.
    pub valrep: Vec<ValRepItem>,
    /// Nested stores for sub-widget property defaults, by sub-widget id.
    pub sub: BTreeMap<String, PropertyStore>,
    #[serde(skip)]
    value_set: bool,
    #[serde(skip)]
    valrep_set: bool,
}

impl PropertyStore {
    /// Read the value at a property path; absent paths read as `Null`.
    pub fn get(&self, path: &PropPath) -> Value {
        match path {
            PropPath::Value => self.value.clone(),
            PropPath::ValRep => Value::ValRep(self.valrep.clone()),
            PropPath::Html(id) => self.html.get(id).cloned().unwrap_or_default(),
            PropPath::Uniface(id) => self.uniface.get(id).cloned().unwrap_or_default(),
            PropPath::Style(id) => self.style.get(id).cloned().unwrap_or_default(),
            PropPath::Classes(id) => self.classes.get(id).cloned().unwrap_or_default(),
            PropPath::Sub(id, rest) => self
                .sub
                .get(id)
                .map(|store| store.get(rest))
                .unwrap_or_default(),
        }
    }

    /// Convenience form of [`PropertyStore::get`] over a path string.
    pub fn get_path(&self, path: &str) -> Value {
        self.get(&PropPath::parse(path))
    }

    /// Write the value at a property path, creating intermediate
    /// sub-widget nesting as needed.
    pub fn set(&mut self, path: &PropPath, value: Value) {
        match path {
            PropPath::Value => {
                self.value = value;
                self.value_set = true;
            }
            PropPath::ValRep => {
                self.valrep = coerce_valrep(value);
                self.valrep_set = true;
            }
            PropPath::Html(id) => {
                let _ = self.html.insert(id.clone(), value);
            }
            PropPath::Uniface(id) => {
                let _ = self.uniface.insert(id.clone(), value);
            }
            PropPath::Style(id) => {
                let _ = self.style.insert(id.clone(), value);
            }
            PropPath::Classes(id) => {
                let _ = self.classes.insert(id.clone(), value);
            }
            PropPath::Sub(id, rest) => {
                self.sub.entry(id.clone()).or_default().set(rest, value);
            }
        }
    }
}

/// Interpret a value as a valrep list.
///
/// The host may deliver valrep as a string of `value=representation`
/// pairs separated by `;`; anything unrecognized reads as empty.
pub fn coerce_valrep(value: Value) -> Vec<ValRepItem> {
    match value {
        Value::ValRep(items) => items,
        Value::Text(text) => parse_valrep_text(&text),
        _ => Vec::new(),
    }
}

fn parse_valrep_text(text: &str) -> Vec<ValRepItem> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(';')
        .map(|pair| match pair.split_once('=') {
            Some((value, representation)) => ValRepItem::new(value, representation),
            None => ValRepItem::new(pair, ""),
        })
        .collect()
}

/// An incoming property change set, nested by group like
/// [`PropertyStore`], with RESET-aware entries. Paths absent from a
/// delta are left untouched by the runtime.
#[derive(Debug, Clone, Default)]
pub struct PropDelta {
    /// HTML attribute/property changes, by id.
    pub html: BTreeMap<String, DeltaValue>,
    /// Framework-level property changes, by id.
    pub uniface: BTreeMap<String, DeltaValue>,
    /// Inline style changes, by id.
    pub style: BTreeMap<String, DeltaValue>,
    /// Css class toggles, by class name.
    pub classes: BTreeMap<String, DeltaValue>,
    /// Change to the scalar field value.
    pub value: Option<DeltaValue>,
    /// Change to the option list.
    pub valrep: Option<DeltaValue>,
    /// Changes delegated to sub-widgets, by sub-widget id.
    pub sub: BTreeMap<String, PropDelta>,
}

impl PropDelta {
    /// An empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style entry assignment, with the same normalization as
    /// [`PropDelta::from_flat`].
    #[must_use]
    pub fn with(mut self, path: &str, value: impl Into<DeltaValue>) -> Self {
        self.insert(&PropPath::parse(path), value.into());
        self
    }

    /// Insert one entry at a parsed path.
    pub fn insert(&mut self, path: &PropPath, value: DeltaValue) {
        match path {
            PropPath::Value => self.value = Some(value),
            PropPath::ValRep => self.valrep = Some(normalize_valrep_entry(value)),
            PropPath::Html(id) => {
                let _ = self.html.insert(id.clone(), value);
            }
            PropPath::Uniface(id) => {
                let _ = self.uniface.insert(id.clone(), value);
            }
            PropPath::Style(id) => {
                let _ = self.style.insert(id.clone(), value);
            }
            PropPath::Classes(id) => {
                let _ = self.classes.insert(id.clone(), value);
            }
            PropPath::Sub(id, rest) => {
                self.sub.entry(id.clone()).or_default().insert(rest, value);
            }
        }
    }

    /// Normalize a flattened change set into the nested shape.
    ///
    /// This is the boundary where the host's key spellings are fixed up:
    /// `html:`/`style:`/`class:`/`classes:` prefixes route to their
    /// groups, bare ids become framework properties, sub-widget prefixes
    /// nest, and string-encoded valrep lists are parsed.
    pub fn from_flat<K: AsRef<str>, V: Into<DeltaValue>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let mut delta = Self::new();
        for (key, value) in entries {
            delta.insert(&PropPath::parse(key.as_ref()), value.into());
        }
        delta
    }

    /// A delta that sets every property present in `store` (used to
    /// replay class defaults).
    pub fn from_store(store: &PropertyStore) -> Self {
        let mut delta = Self::new();
        for (id, value) in &store.html {
            let _ = delta.html.insert(id.clone(), DeltaValue::Set(value.clone()));
        }
        for (id, value) in &store.uniface {
            let _ = delta.uniface.insert(id.clone(), DeltaValue::Set(value.clone()));
        }
        for (id, value) in &store.style {
            let _ = delta.style.insert(id.clone(), DeltaValue::Set(value.clone()));
        }
        for (id, value) in &store.classes {
            let _ = delta.classes.insert(id.clone(), DeltaValue::Set(value.clone()));
        }
        if store.value_set {
            delta.value = Some(DeltaValue::Set(store.value.clone()));
        }
        if store.valrep_set {
            delta.valrep = Some(DeltaValue::Set(Value::ValRep(store.valrep.clone())));
        }
        for (id, sub_store) in &store.sub {
            let _ = delta.sub.insert(id.clone(), Self::from_store(sub_store));
        }
        delta
    }
}

fn normalize_valrep_entry(entry: DeltaValue) -> DeltaValue {
    match entry {
        DeltaValue::Set(value) => DeltaValue::Set(Value::ValRep(coerce_valrep(value))),
        DeltaValue::Reset => DeltaValue::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_paths_nest() {
        let mut store = PropertyStore::default();
        store.set(&PropPath::parse("html:disabled"), Value::Bool(true));
        store.set(&PropPath::parse("change-button:uniface:icon"), Value::Text("edit".into()));
        assert_eq!(store.get_path("html:disabled"), Value::Bool(true));
        assert_eq!(
            store.sub.get("change-button").unwrap().get_path("uniface:icon"),
            Value::Text("edit".into())
        );
        assert_eq!(store.get_path("html:missing"), Value::Null);
    }

    #[test]
    fn flat_delta_normalization() {
        let delta = PropDelta::from_flat([
            ("html:readonly", DeltaValue::from(true)),
            ("label-text", DeltaValue::from("Name")),
            ("class:u-extra", DeltaValue::from(true)),
            ("sw1:html:disabled", DeltaValue::from(false)),
            ("valrep", DeltaValue::from("1=one;2=two")),
        ]);
        assert!(delta.html.contains_key("readonly"));
        assert!(delta.uniface.contains_key("label-text"));
        assert!(delta.classes.contains_key("u-extra"));
        assert!(delta.sub.get("sw1").unwrap().html.contains_key("disabled"));
        let DeltaValue::Set(Value::ValRep(items)) = delta.valrep.clone().unwrap() else {
            panic!("valrep not normalized");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], ValRepItem::new("1", "one"));
    }

    #[test]
    fn valrep_text_without_separator_keeps_value() {
        assert_eq!(parse_valrep_text("solo"), vec![ValRepItem::new("solo", "")]);
        assert!(parse_valrep_text("").is_empty());
    }

    #[test]
    fn defaults_round_trip_through_delta() {
        let mut defaults = PropertyStore::default();
        defaults.set(&PropPath::parse("html:title"), Value::Text("hi".into()));
        defaults.set(&PropPath::parse("sw:value"), Value::Text("Change".into()));
        let delta = PropDelta::from_store(&defaults);
        assert_eq!(delta.html.get("title"), Some(&DeltaValue::Set(Value::Text("hi".into()))));
        assert!(delta.sub.contains_key("sw"));
    }
}
