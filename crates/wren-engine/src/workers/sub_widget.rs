//! Nested widget workers.

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::trace;
use wren_common::logging::{error_skipped, warn_ignored};
use wren_common::{Value, to_boolean};
use wren_dom::{DomTree, NodeId};

use crate::definition::ObjectDefinition;
use crate::descriptor::{DescriptorBuilder, SubWidgetDef, WidgetClass};
use crate::registry::ClassRegistry;
use crate::widget::WidgetInstance;
use crate::worker::{ElementTarget, LayoutContext, UiContext, ValueUpdater, Worker};

/// The style class addressing a sub-widget's element.
pub fn sub_widget_style_class(sub_widget_id: &str) -> String {
    format!("u-sw-{sub_widget_id}")
}

/// A statically declared nested widget, slotted into the component.
///
/// Constructing one both wires the visibility property
/// (`uniface:<sub-widget-id>`) and registers the sub-widget descriptor,
/// so the owning widget's runtime instantiates, connects and forwards
/// lifecycle calls to the nested instance.
pub struct SlottedWidget {
    sub_widget_id: String,
    style_class: String,
    visibility_prop: String,
    slot: String,
    sub_widget_class: Option<Rc<WidgetClass>>,
    defaults: Vec<(String, Value)>,
    visible: bool,
    triggers: Vec<String>,
    target: ElementTarget,
}

impl SlottedWidget {
    /// Declare a nested widget.
    ///
    /// `defaults` are property paths in the sub-widget's own scope
    /// (e.g. `value`, `uniface:icon`) with the parent-provided default.
    /// A class name missing from the registry is reported and the
    /// sub-widget is skipped; the parent stays usable.
    pub fn new(
        registry: &ClassRegistry,
        slot: &str,
        sub_widget_id: &str,
        class_name: &str,
        defaults: Vec<(String, Value)>,
        visible: bool,
        triggers: &[&str],
    ) -> Self {
        let style_class = sub_widget_style_class(sub_widget_id);
        let sub_widget_class = registry.get(class_name);
        if sub_widget_class.is_none() {
            error_skipped(
                "SlottedWidget.new",
                &format!("Widget class with name '{class_name}' not found in the class registry"),
                "Not available",
            );
        }
        Self {
            sub_widget_id: sub_widget_id.to_string(),
            target: ElementTarget::new(&format!(".{style_class}")),
            visibility_prop: format!("uniface:{sub_widget_id}"),
            style_class,
            slot: slot.to_string(),
            sub_widget_class,
            defaults,
            visible,
            triggers: triggers.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl Worker for SlottedWidget {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        let Some(class) = &self.sub_widget_class else {
            return;
        };
        for (prop_path, value) in &self.defaults {
            builder.register_default_value(
                &format!("{}:{prop_path}", self.sub_widget_id),
                value.clone(),
            );
        }
        builder.register_setter(&self.visibility_prop, Rc::clone(own));
        builder.register_default_value(&self.visibility_prop, Value::Bool(self.visible));
        builder.register_sub_widget(
            &self.sub_widget_id,
            SubWidgetDef {
                class: Rc::clone(class),
                style_class: self.style_class.clone(),
                triggers: self.triggers.clone(),
                prop_prefix: self.sub_widget_id.clone(),
            },
        );
    }

    fn layout(&self, dom: &mut DomTree, cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        let Some(class) = &self.sub_widget_class else {
            return Vec::new();
        };
        let built = class.build_layout(dom, cx);
        if let Some(data) = dom.as_element_mut(built) {
            data.hidden = true;
            data.add_class(self.style_class.clone());
        }
        vec![built]
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", sub_widget = %self.sub_widget_id, "SlottedWidget.refresh");
        let Some(root) = widget.root_element() else {
            return;
        };
        let Some(element) = self.target.resolve(widget, ui.dom) else {
            error_skipped(
                "SlottedWidget.refresh",
                &format!("No element found for styleClass '{}'", self.style_class),
                "Skipped",
            );
            return;
        };
        let shown_class = format!("{}-shown", self.style_class);
        if to_boolean(&widget.data.get_path(&self.visibility_prop)) {
            if let Some(data) = ui.dom.as_element_mut(element) {
                data.hidden = false;
                data.slot = self.slot.clone();
            }
            if let Some(data) = ui.dom.as_element_mut(root) {
                data.add_class(shown_class);
            }
        } else {
            if let Some(data) = ui.dom.as_element_mut(element) {
                data.hidden = true;
                data.slot = String::new();
            }
            if let Some(data) = ui.dom.as_element_mut(root) {
                data.remove_class(&shown_class);
            }
        }
    }
}

/// A definition-driven collection of nested widgets, slotted into the
/// component.
///
/// Same id-list resolution as [`WidgetsByProperty`], but purely
/// structural: it registers no value binding, stamps each created
/// sub-widget with a `sub-widget-id` attribute and an optional shared
/// style class, and delegates every trigger.
pub struct SlottedWidgetsByProperty {
    prop_id: String,
    style_class: String,
}

impl SlottedWidgetsByProperty {
    /// Create a slotted collection driven by the given definition
    /// property; `style_class` (may be empty) is added to every created
    /// sub-widget for shared styling.
    pub fn new(prop_id: &str, style_class: &str) -> Self {
        Self {
            prop_id: prop_id.to_string(),
            style_class: style_class.to_string(),
        }
    }
}

impl Worker for SlottedWidgetsByProperty {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_sub_widget_worker(Rc::clone(own));
    }

    fn layout(&self, dom: &mut DomTree, cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        let Some(definition) = cx.definition else {
            warn_ignored(
                "SlottedWidgetsByProperty.layout",
                &format!("Property '{}' not defined for object", self.prop_id),
                "Creation of sub-widgets skipped",
            );
            return Vec::new();
        };
        let mut elements = Vec::new();
        let mut valid_ids = Vec::new();
        for sub_widget_id in resolve_id_list(definition, &self.prop_id) {
            let class_prop = format!("{sub_widget_id}:widget-class");
            let Some(class) = definition
                .get_property(&class_prop)
                .as_ref()
                .and_then(Value::as_text)
                .and_then(|name| cx.registry.get(name))
            else {
                warn_ignored(
                    "SlottedWidgetsByProperty.layout",
                    &format!("No registered widget class for '{class_prop}'"),
                    &format!("Creation of sub-widget '{sub_widget_id}' skipped"),
                );
                continue;
            };
            let built = class.build_layout(dom, cx);
            if let Some(data) = dom.as_element_mut(built) {
                data.add_class(sub_widget_style_class(&sub_widget_id));
                if !self.style_class.is_empty() {
                    data.add_class(self.style_class.clone());
                }
                data.set_attr("sub-widget-id", sub_widget_id.clone());
            }
            elements.push(built);
            valid_ids.push(sub_widget_id);
        }
        definition.set_property(&self.prop_id, Value::Text(valid_ids.join(";")));
        elements
    }

    fn sub_widget_definitions(
        &self,
        definition: &dyn ObjectDefinition,
        registry: &ClassRegistry,
    ) -> BTreeMap<String, SubWidgetDef> {
        let mut defs = BTreeMap::new();
        for sub_widget_id in resolve_id_list(definition, &self.prop_id) {
            let Some(class) = definition
                .get_property(&format!("{sub_widget_id}:widget-class"))
                .as_ref()
                .and_then(Value::as_text)
                .and_then(|name| registry.get(name))
            else {
                continue;
            };
            let def = SubWidgetDef {
                class,
                style_class: sub_widget_style_class(&sub_widget_id),
                triggers: Vec::new(),
                prop_prefix: sub_widget_id.clone(),
            };
            let _ = defs.insert(sub_widget_id, def);
        }
        defs
    }
}

fn resolve_id_list(definition: &dyn ObjectDefinition, prop_id: &str) -> Vec<String> {
    definition
        .get_property(prop_id)
        .as_ref()
        .and_then(Value::as_text)
        .map(|list| {
            list.split(';')
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// A definition-driven collection of nested widgets.
///
/// The definition property named by `prop_id` holds a `;`-separated list
/// of sub-widget ids; each id's widget class comes from its
/// `<id>:widget-class` property, and `<id>:widget-triggers` optionally
/// restricts which triggers the parent delegates. Ids naming an
/// unregistered class are dropped with a warning and the filtered list is
/// written back onto the definition. The collection resolves once at
/// layout time and cannot change afterwards.
pub struct WidgetsByProperty {
    prop_id: String,
}

impl WidgetsByProperty {
    /// Create a collection driven by the given definition property.
    pub fn new(prop_id: &str) -> Self {
        Self {
            prop_id: prop_id.to_string(),
        }
    }

    fn sub_widget_ids(&self, definition: &dyn ObjectDefinition) -> Vec<String> {
        resolve_id_list(definition, &self.prop_id)
    }
}

impl Worker for WidgetsByProperty {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_sub_widget_worker(Rc::clone(own));
        builder.register_setter("value", Rc::clone(own));
        builder.register_default_value("value", Value::Null);
        builder.register_getter(Rc::clone(own));
    }

    fn layout(&self, dom: &mut DomTree, cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        let Some(definition) = cx.definition else {
            warn_ignored(
                "WidgetsByProperty.layout",
                &format!("Property '{}' not defined for object", self.prop_id),
                "Creation of sub-widgets skipped",
            );
            return Vec::new();
        };
        let ids = self.sub_widget_ids(definition);
        if ids.is_empty() {
            warn_ignored(
                "WidgetsByProperty.layout",
                &format!("Property '{}' not defined for object", self.prop_id),
                "Creation of sub-widgets skipped",
            );
            definition.set_property(&self.prop_id, Value::Text(String::new()));
            return Vec::new();
        }
        let mut elements = Vec::new();
        let mut valid_ids = Vec::new();
        for sub_widget_id in ids {
            let class_prop = format!("{sub_widget_id}:widget-class");
            let Some(class_name) = definition
                .get_property(&class_prop)
                .as_ref()
                .and_then(Value::as_text)
                .map(str::to_string)
            else {
                warn_ignored(
                    "WidgetsByProperty.layout",
                    &format!("Property '{class_prop}' not defined for object"),
                    &format!("Creation of sub-widget '{sub_widget_id}' skipped"),
                );
                continue;
            };
            let Some(class) = cx.registry.get(&class_name) else {
                warn_ignored(
                    "WidgetsByProperty.layout",
                    &format!("Widget definition with name '{class_name}' not found in the class registry"),
                    &format!("Creation of sub-widget '{sub_widget_id}' skipped"),
                );
                continue;
            };
            let built = class.build_layout(dom, cx);
            if let Some(data) = dom.as_element_mut(built) {
                data.add_class(sub_widget_style_class(&sub_widget_id));
            }
            elements.push(built);
            valid_ids.push(sub_widget_id);
        }
        // Some sub-widgets might not get created: update the property.
        definition.set_property(&self.prop_id, Value::Text(valid_ids.join(";")));
        elements
    }

    fn value(&self, widget: &WidgetInstance, dom: &DomTree) -> Value {
        let mut aggregate = BTreeMap::new();
        for (sub_widget_id, sub_widget) in &widget.sub_widgets {
            let value = serde_json::to_value(sub_widget.get_value(dom))
                .unwrap_or(serde_json::Value::Null);
            let _ = aggregate.insert(sub_widget_id.clone(), value);
        }
        Value::Text(serde_json::to_string(&aggregate).unwrap_or_default())
    }

    fn value_updaters(&self, _widget: &WidgetInstance, _dom: &DomTree) -> Vec<ValueUpdater> {
        Vec::new()
    }

    fn sub_widget_definitions(
        &self,
        definition: &dyn ObjectDefinition,
        registry: &ClassRegistry,
    ) -> BTreeMap<String, SubWidgetDef> {
        let mut defs = BTreeMap::new();
        for sub_widget_id in self.sub_widget_ids(definition) {
            let Some(class_name) = definition
                .get_property(&format!("{sub_widget_id}:widget-class"))
                .as_ref()
                .and_then(Value::as_text)
                .map(str::to_string)
            else {
                continue;
            };
            let Some(class) = registry.get(&class_name) else {
                continue;
            };
            let triggers = definition
                .get_property(&format!("{sub_widget_id}:widget-triggers"))
                .as_ref()
                .and_then(Value::as_text)
                .map(|list| {
                    list.split(';')
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            let def = SubWidgetDef {
                class,
                style_class: sub_widget_style_class(&sub_widget_id),
                triggers,
                prop_prefix: sub_widget_id.clone(),
            };
            let _ = defs.insert(sub_widget_id, def);
        }
        defs
    }
}
