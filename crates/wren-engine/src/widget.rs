//! The widget instance runtime.
//!
//! A [`WidgetInstance`] is the live object bound to one widget element
//! subtree. It owns the authoritative property state, the nested
//! sub-widget instances, and implements the full host-facing lifecycle:
//! connect, data init/update/cleanup, trigger mapping, value reading,
//! validation, error display and UI blocking. All element mutation is
//! delegated to the class's compiled workers via `set_properties`.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;
use wren_common::logging::{error_skipped, warn_ignored};
use wren_common::{DeltaValue, Value, normalize_trigger_name, to_boolean};
use wren_dom::{DomEvent, DomTree, NodeId, Selector};

use crate::data::{PropDelta, PropertyStore, coerce_valrep};
use crate::definition::{DefinitionsTable, ObjectDefinition};
use crate::descriptor::{ErrorDisplay, SubWidgetDef, UiBlocking, WidgetClass};
use crate::registry::ClassRegistry;
use crate::worker::{TriggerMapping, UiContext, ValueUpdater, Worker};

/// Identifies the structured sub-widget validation envelope in a host
/// error message.
pub const VALIDATION_ENVELOPE_ID: &str = "WREN_VALIDATION_ERRORS";

/// The JSON envelope aggregating sub-widget validation messages.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationEnvelope {
    /// Always [`VALIDATION_ENVELOPE_ID`]; distinguishes the envelope
    /// from arbitrary host messages.
    pub id: String,
    /// Validation message per failing sub-widget id.
    #[serde(rename = "validationMessages")]
    pub validation_messages: BTreeMap<String, String>,
}

/// The key under which the widget's root element is held in
/// [`WidgetInstance::elements`].
pub const ROOT_ELEMENT: &str = "widget";

/// One live widget bound to an element subtree.
pub struct WidgetInstance {
    class: Rc<WidgetClass>,
    /// Live elements by stable key; rebuilt on every connect.
    pub elements: BTreeMap<String, NodeId>,
    /// The authoritative current value of every received property.
    pub data: PropertyStore,
    /// Instance-lifetime scratch state (survives `data_init`), e.g. the
    /// sticky has-ever-set-maxlength flag.
    pub state: BTreeMap<String, Value>,
    /// Instantiated sub-widgets by id.
    pub sub_widgets: BTreeMap<String, WidgetInstance>,
    sub_widget_defs: BTreeMap<String, SubWidgetDef>,
}

impl WidgetInstance {
    /// Create an unconnected instance of a widget class.
    pub fn new(class: Rc<WidgetClass>) -> Self {
        Self {
            class,
            elements: BTreeMap::new(),
            data: PropertyStore::default(),
            state: BTreeMap::new(),
            sub_widgets: BTreeMap::new(),
            sub_widget_defs: BTreeMap::new(),
        }
    }

    /// The widget's class.
    pub fn class(&self) -> &Rc<WidgetClass> {
        &self.class
    }

    /// The widget's root element, once connected.
    pub fn root_element(&self) -> Option<NodeId> {
        self.elements.get(ROOT_ELEMENT).copied()
    }

    /// Bind the instance to its live element subtree.
    ///
    /// Recovers the object definition from `table` when the host did not
    /// pass one, resolves definition-driven sub-widgets, instantiates and
    /// connects every sub-widget (located by style class), and returns
    /// the combined ordered list of value updaters: the host listens on
    /// these to know when to re-read `get_value`.
    pub fn on_connect(
        &mut self,
        dom: &DomTree,
        element: NodeId,
        definition: Option<Rc<dyn ObjectDefinition>>,
        registry: &ClassRegistry,
        table: &mut DefinitionsTable,
    ) -> Vec<ValueUpdater> {
        self.elements.clear();
        let _ = self.elements.insert(ROOT_ELEMENT.to_string(), element);
        trace!(target: "wren", class = %self.class.name, "on_connect");

        let definition = definition.or_else(|| {
            dom.as_element(element)
                .and_then(|data| data.id())
                .and_then(|id| table.take(id))
        });

        self.sub_widget_defs = self.class.descriptor.sub_widgets.clone();
        if let Some(definition) = &definition {
            for worker in &self.class.descriptor.sub_widget_workers {
                for (id, def) in worker.sub_widget_definitions(definition.as_ref(), registry) {
                    let _ = self.sub_widget_defs.insert(id, def);
                }
            }
        }

        let mut updaters = Vec::new();
        let defs: Vec<(String, SubWidgetDef)> = self
            .sub_widget_defs
            .iter()
            .map(|(id, def)| (id.clone(), def.clone()))
            .collect();
        self.sub_widgets.clear();
        for (sub_widget_id, def) in defs {
            let selector = match Selector::parse(&format!(".{}", def.style_class)) {
                Ok(selector) => selector,
                Err(error) => {
                    error_skipped(
                        &format!("{}.on_connect", self.class.name),
                        &error.to_string(),
                        "Sub-widget skipped",
                    );
                    continue;
                }
            };
            let Some(sub_element) = dom.query_selector(element, &selector) else {
                error_skipped(
                    &format!("{}.on_connect", self.class.name),
                    &format!("No element found for style class '{}'", def.style_class),
                    "Sub-widget skipped",
                );
                continue;
            };
            let mut sub_widget = WidgetInstance::new(Rc::clone(&def.class));
            let sub_updaters = sub_widget.on_connect(dom, sub_element, None, registry, table);
            for mut updater in sub_updaters {
                updater.target.insert(0, sub_widget_id.clone());
                updaters.push(updater);
            }
            let _ = self.sub_widgets.insert(sub_widget_id, sub_widget);
        }

        if let Some(getter) = &self.class.descriptor.getter {
            updaters.extend(getter.value_updaters(self, dom));
        }
        updaters
    }

    /// Run a value updater's handler against the widget instance it
    /// belongs to, resolving the updater's sub-widget target chain.
    pub fn dispatch(
        &mut self,
        updater: &ValueUpdater,
        ui: &mut UiContext<'_>,
        event: &mut DomEvent,
    ) {
        self.dispatch_path(&updater.target, updater, ui, event);
    }

    fn dispatch_path(
        &mut self,
        path: &[String],
        updater: &ValueUpdater,
        ui: &mut UiContext<'_>,
        event: &mut DomEvent,
    ) {
        match path.split_first() {
            None => {
                if let Some(handler) = &updater.handler {
                    handler(self, ui, event);
                }
            }
            Some((sub_widget_id, rest)) => match self.sub_widgets.get_mut(sub_widget_id) {
                Some(sub_widget) => sub_widget.dispatch_path(rest, updater, ui, event),
                None => warn_ignored(
                    "WidgetInstance.dispatch",
                    &format!("No sub-widget '{sub_widget_id}' for updater"),
                    "Ignored",
                ),
            },
        }
    }

    /// Map a logical trigger to its DOM event.
    ///
    /// Looks for a direct trigger first; otherwise, a `<sub-widget-id>:`
    /// prefix delegates into that sub-widget (subject to its trigger
    /// allow-list). No match warns and returns `None`.
    pub fn map_trigger(&self, trigger_name: &str, dom: &DomTree) -> Option<TriggerMapping> {
        let trigger_name = &normalize_trigger_name(trigger_name);
        if let Some(worker) = self.class.descriptor.triggers.get(trigger_name) {
            return worker.trigger_mapping(self, dom);
        }
        if let Some((sub_widget_id, rest)) = trigger_name.split_once(':')
            && let Some(sub_widget) = self.sub_widgets.get(sub_widget_id)
        {
            let allowed = self
                .sub_widget_defs
                .get(sub_widget_id)
                .map(|def| def.triggers.is_empty() || def.triggers.iter().any(|t| t == rest))
                .unwrap_or(false);
            if allowed && let Some(mapping) = sub_widget.map_trigger(rest, dom) {
                return Some(mapping);
            }
        }
        warn_ignored(
            &format!("{}.map_trigger", self.class.name),
            &format!("No trigger map found for (web)trigger '{trigger_name}'"),
            "Ignored",
        );
        None
    }

    /// Initialize the widget after binding to a new data object: reset
    /// the property state and replay the class defaults.
    ///
    /// Sub-widgets are initialized and given their delegated defaults
    /// first, so parent-level defaults can still win when both declare
    /// the same path.
    pub fn data_init(&mut self, ui: &mut UiContext<'_>) {
        trace!(target: "wren", class = %self.class.name, "data_init");
        self.data = PropertyStore::default();
        let defaults = self.class.descriptor.defaults.clone();
        for (sub_widget_id, sub_widget) in &mut self.sub_widgets {
            sub_widget.data_init(ui);
            if let Some(sub_defaults) = defaults.sub.get(sub_widget_id) {
                sub_widget.data_update(&PropDelta::from_store(sub_defaults), ui);
            }
        }
        self.set_properties(&PropDelta::from_store(&defaults), ui);
    }

    /// Apply new or changed data.
    ///
    /// Sub-widget portions of the delta are forwarded to the owning
    /// sub-widget instances first; the remainder is applied through
    /// `set_properties`.
    pub fn data_update(&mut self, delta: &PropDelta, ui: &mut UiContext<'_>) {
        trace!(target: "wren", class = %self.class.name, "data_update");
        for (sub_widget_id, sub_widget) in &mut self.sub_widgets {
            if let Some(sub_delta) = delta.sub.get(sub_widget_id) {
                sub_widget.data_update(sub_delta, ui);
            }
        }
        self.set_properties(delta, ui);
    }

    /// Tear down data bindings before the instance is released.
    ///
    /// Sub-widgets are cleaned up with their prefix stripped; css
    /// classes declared through `class:` properties are removed from the
    /// root element.
    pub fn data_cleanup(&mut self, property_names: &[String], ui: &mut UiContext<'_>) {
        trace!(target: "wren", class = %self.class.name, "data_cleanup");
        for (sub_widget_id, sub_widget) in &mut self.sub_widgets {
            let prefix = format!("{sub_widget_id}:");
            let sub_names: Vec<String> = property_names
                .iter()
                .filter_map(|name| name.strip_prefix(&prefix).map(str::to_string))
                .collect();
            if !sub_names.is_empty() {
                sub_widget.data_cleanup(&sub_names, ui);
            }
        }
        let Some(root) = self.root_element() else {
            return;
        };
        for name in property_names {
            if let Some(class_name) = name
                .strip_prefix("class:")
                .or_else(|| name.strip_prefix("classes:"))
                && let Some(element) = ui.dom.as_element_mut(root)
            {
                element.remove_class(class_name);
            }
        }
    }

    /// Apply a property delta: resolve RESETs against the class
    /// defaults, record the new state, and refresh every affected worker
    /// exactly once, in first-seen order across the whole delta.
    pub fn set_properties(&mut self, delta: &PropDelta, ui: &mut UiContext<'_>) {
        let class = Rc::clone(&self.class);
        let descriptor = &class.descriptor;
        let mut pending: Vec<Rc<dyn Worker>> = Vec::new();

        for (id, entry) in &delta.html {
            let value = match entry {
                DeltaValue::Reset => descriptor.defaults.html.get(id).cloned().unwrap_or_default(),
                DeltaValue::Set(value) => value.clone(),
            };
            let _ = self.data.html.insert(id.clone(), value);
            match descriptor.setters.html(id) {
                Some(workers) => enqueue(&mut pending, workers),
                None => self.warn_unsupported(&format!("html:{id}")),
            }
        }
        for (id, entry) in &delta.uniface {
            let value = match entry {
                DeltaValue::Reset => descriptor
                    .defaults
                    .uniface
                    .get(id)
                    .cloned()
                    .unwrap_or_default(),
                DeltaValue::Set(value) => value.clone(),
            };
            let _ = self.data.uniface.insert(id.clone(), value);
            match descriptor.setters.uniface(id) {
                Some(workers) => enqueue(&mut pending, workers),
                None => self.warn_unsupported(&format!("uniface:{id}")),
            }
        }
        for (id, entry) in &delta.style {
            let value = match entry {
                DeltaValue::Reset => descriptor
                    .defaults
                    .style
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| Value::Text("unset".to_string())),
                DeltaValue::Set(value) => value.clone(),
            };
            let _ = self.data.style.insert(id.clone(), value);
            if descriptor.setters.style().is_empty() {
                self.warn_unsupported(&format!("style:{id}"));
            } else {
                enqueue(&mut pending, descriptor.setters.style());
            }
        }
        for (id, entry) in &delta.classes {
            let value = match entry {
                DeltaValue::Reset => descriptor
                    .defaults
                    .classes
                    .get(id)
                    .cloned()
                    .unwrap_or_default(),
                DeltaValue::Set(value) => value.clone(),
            };
            let _ = self.data.classes.insert(id.clone(), value);
            if descriptor.setters.classes().is_empty() {
                self.warn_unsupported(&format!("classes:{id}"));
            } else {
                enqueue(&mut pending, descriptor.setters.classes());
            }
        }
        if let Some(entry) = &delta.value {
            self.data.value = match entry {
                DeltaValue::Reset => descriptor.defaults.value.clone(),
                DeltaValue::Set(value) => value.clone(),
            };
            if descriptor.setters.value().is_empty() {
                self.warn_unsupported("value");
            } else {
                enqueue(&mut pending, descriptor.setters.value());
            }
        }
        if let Some(entry) = &delta.valrep {
            self.data.valrep = match entry {
                DeltaValue::Reset => descriptor.defaults.valrep.clone(),
                DeltaValue::Set(value) => coerce_valrep(value.clone()),
            };
            if descriptor.setters.valrep().is_empty() {
                self.warn_unsupported("valrep");
            } else {
                enqueue(&mut pending, descriptor.setters.valrep());
            }
        }

        for worker in pending {
            worker.refresh(self, ui);
        }
    }

    fn warn_unsupported(&self, path: &str) {
        warn_ignored(
            &format!("{}.set_properties", self.class.name),
            &format!("Widget does not support property '{path}'"),
            "Ignored",
        );
    }

    /// The widget's externally visible value, via its value getter.
    pub fn get_value(&self, dom: &DomTree) -> Value {
        let value = match &self.class.descriptor.getter {
            Some(getter) => getter.value(self, dom),
            None => Value::Null,
        };
        trace!(target: "wren", class = %self.class.name, "get_value");
        value
    }

    /// Validate the widget before its value is passed back to the host.
    ///
    /// A compound widget aggregates failing sub-widget messages into the
    /// JSON validation envelope; a leaf widget reports no error.
    pub fn validate(&self) -> Option<String> {
        let mut messages = BTreeMap::new();
        for (sub_widget_id, sub_widget) in &self.sub_widgets {
            if let Some(message) = sub_widget.validate() {
                let _ = messages.insert(sub_widget_id.clone(), message);
            }
        }
        if messages.is_empty() {
            return None;
        }
        let envelope = ValidationEnvelope {
            id: VALIDATION_ENVELOPE_ID.to_string(),
            validation_messages: messages,
        };
        serde_json::to_string(&envelope).ok()
    }

    /// Show a host-supplied error.
    ///
    /// A message parsing as the validation envelope is routed to the
    /// matching sub-widgets (hiding errors on all others); anything else
    /// - including malformed JSON - is shown as a plain message through
    /// the error property pair.
    pub fn show_error(&mut self, message: &str, ui: &mut UiContext<'_>) {
        if self.class.descriptor.error_display == ErrorDisplay::LogOnly {
            error_skipped(
                &format!("{}.show_error", self.class.name),
                message,
                "Widget has no error affordance",
            );
            return;
        }
        if !self.sub_widgets.is_empty() {
            for sub_widget in self.sub_widgets.values_mut() {
                sub_widget.hide_error(ui);
            }
            if let Ok(envelope) = serde_json::from_str::<ValidationEnvelope>(message)
                && envelope.id == VALIDATION_ENVELOPE_ID
            {
                for (sub_widget_id, sub_message) in envelope.validation_messages {
                    if let Some(sub_widget) = self.sub_widgets.get_mut(&sub_widget_id) {
                        sub_widget.show_error(&sub_message, ui);
                    }
                }
                return;
            }
        }
        self.set_properties(
            &PropDelta::new()
                .with("uniface:error", true)
                .with("uniface:error-message", message),
            ui,
        );
    }

    /// Hide any error previously shown through `show_error`.
    pub fn hide_error(&mut self, ui: &mut UiContext<'_>) {
        for sub_widget in self.sub_widgets.values_mut() {
            sub_widget.hide_error(ui);
        }
        if self.class.descriptor.error_display == ErrorDisplay::LogOnly {
            return;
        }
        self.set_properties(
            &PropDelta::new()
                .with("uniface:error", false)
                .with("uniface:error-message", ""),
            ui,
        );
    }

    /// Block user interaction, sub-widgets first.
    pub fn block_ui(&mut self, ui: &mut UiContext<'_>) {
        for sub_widget in self.sub_widgets.values_mut() {
            sub_widget.block_ui(ui);
        }
        let Some(root) = self.root_element() else {
            return;
        };
        let blocking = self.class.descriptor.ui_blocking;
        if blocking == UiBlocking::None {
            return;
        }
        if let Some(element) = ui.dom.as_element_mut(root) {
            element.add_class("u-blocked");
            match blocking {
                UiBlocking::Disabled => element.set_prop("disabled", Value::Bool(true)),
                UiBlocking::Readonly => element.set_prop("readOnly", Value::Bool(true)),
                UiBlocking::None => {}
            }
        }
    }

    /// Unblock user interaction, restoring the control's prior
    /// disabled/readonly state from the property store (a widget already
    /// readonly before blocking stays readonly).
    pub fn unblock_ui(&mut self, ui: &mut UiContext<'_>) {
        for sub_widget in self.sub_widgets.values_mut() {
            sub_widget.unblock_ui(ui);
        }
        let Some(root) = self.root_element() else {
            return;
        };
        let blocking = self.class.descriptor.ui_blocking;
        if blocking == UiBlocking::None {
            return;
        }
        let disabled = to_boolean(&self.data.html.get("disabled").cloned().unwrap_or_default());
        let readonly = to_boolean(&self.data.html.get("readonly").cloned().unwrap_or_default());
        if let Some(element) = ui.dom.as_element_mut(root) {
            element.remove_class("u-blocked");
            match blocking {
                UiBlocking::Disabled => element.set_prop("disabled", Value::Bool(disabled)),
                UiBlocking::Readonly => element.set_prop("readOnly", Value::Bool(readonly)),
                UiBlocking::None => {}
            }
        }
    }
}

fn enqueue(pending: &mut Vec<Rc<dyn Worker>>, workers: &[Rc<dyn Worker>]) {
    for worker in workers {
        if !pending.iter().any(|seen| Rc::ptr_eq(seen, worker)) {
            pending.push(Rc::clone(worker));
        }
    }
}
