//! Element state.

use std::collections::BTreeMap;

use wren_common::Value;

/// The mutable state of one element in the tree.
///
/// Attributes and properties are kept separate, like on a real DOM
/// element: attributes are the string-valued markup surface, properties
/// are the typed IDL surface (`element[name] = value`). Binding workers
/// choose one or the other per attribute definition.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// The element's tag name (e.g. `fluent-checkbox`, `span`).
    pub tag_name: String,
    /// Whether the element is hidden from layout.
    pub hidden: bool,
    /// The named slot this element is assigned to; empty = default slot.
    pub slot: String,
    /// Tooltip text.
    pub title: String,
    /// Plain text content.
    pub text: String,
    attrs: BTreeMap<String, String>,
    props: BTreeMap<String, Value>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
}

impl ElementData {
    /// Create element state for the given tag name.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// The element's id attribute, if set.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Set the element's id attribute.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.set_attr("id", id.into());
    }

    /// Look up a markup attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Set a markup attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let _ = self.attrs.insert(name.into(), value.into());
    }

    /// Remove a markup attribute. No-op if absent.
    pub fn remove_attr(&mut self, name: &str) {
        let _ = self.attrs.remove(name);
    }

    /// Iterate the markup attributes.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up a typed element property.
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Iterate the typed element properties.
    pub fn props(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Assign a typed element property.
    ///
    /// The `hidden` property is mirrored into the typed
    /// [`ElementData::hidden`] field, like the IDL attribute it models.
    pub fn set_prop(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if name == "hidden" {
            self.hidden = wren_common::to_boolean(&value);
        }
        let _ = self.props.insert(name, value);
    }

    /// Remove a typed element property. No-op if absent.
    pub fn remove_prop(&mut self, name: &str) {
        if name == "hidden" {
            self.hidden = false;
        }
        let _ = self.props.remove(name);
    }

    /// The control's live value, read from the `value` property.
    ///
    /// Non-text values render through their display form; an absent or
    /// null property reads as the empty string. Attribute workers use
    /// this to refuse validation-relevant changes mid-edit.
    pub fn live_value(&self) -> String {
        match self.props.get("value") {
            None | Some(Value::Null) => String::new(),
            Some(Value::Text(text)) => text.clone(),
            Some(other) => other.display_string(),
        }
    }

    /// The element's css classes, in insertion order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether the element carries the given css class.
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|class| class == name)
    }

    /// Add a css class; duplicates are ignored.
    pub fn add_class(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_class(&name) {
            self.classes.push(name);
        }
    }

    /// Remove a css class. No-op if absent.
    pub fn remove_class(&mut self, name: &str) {
        self.classes.retain(|class| class != name);
    }

    /// Remove every css class matching the predicate.
    ///
    /// Used by slot workers to clear icon marker classes left over from a
    /// previous refresh.
    pub fn remove_classes_where(&mut self, mut predicate: impl FnMut(&str) -> bool) {
        self.classes.retain(|class| !predicate(class));
    }

    /// Look up an inline style property.
    pub fn style_value(&self, name: &str) -> Option<&str> {
        self.style.get(name).map(String::as_str)
    }

    /// Assign an inline style property.
    pub fn set_style(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let _ = self.style.insert(name.into(), value.into());
    }

    /// Iterate the inline style map.
    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.style.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_deduplicate_and_remove() {
        let mut element = ElementData::new("span");
        element.add_class("u-icon");
        element.add_class("u-icon");
        element.add_class("u-icon--alert");
        assert_eq!(element.classes().len(), 2);
        element.remove_classes_where(|class| class.starts_with("u-icon"));
        assert!(element.classes().is_empty());
    }

    #[test]
    fn live_value_reads_value_property() {
        let mut element = ElementData::new("fluent-text-field");
        assert_eq!(element.live_value(), "");
        element.set_prop("value", Value::Text("abc".into()));
        assert_eq!(element.live_value(), "abc");
        element.set_prop("value", Value::Null);
        assert_eq!(element.live_value(), "");
    }
}
