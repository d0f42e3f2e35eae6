//! Compiled widget class descriptors.
//!
//! Building a widget class's structure tree is a compile step: a single
//! pass over the tree collects every worker's registrations into an
//! explicit, immutable [`WidgetDescriptor`]. The descriptor - not the
//! structure - is what the runtime consults afterwards, so registration
//! is inspectable and happens exactly once per class.

use std::collections::BTreeMap;
use std::rc::Rc;

use strum_macros::{Display, EnumString};
use tracing::trace;
use wren_common::logging::warn_ignored;
use wren_common::{PropPath, Value};
use wren_dom::{DomTree, NodeId};

use crate::data::PropertyStore;
use crate::definition::{DefinitionsTable, ObjectDefinition};
use crate::registry::ClassRegistry;
use crate::worker::{LayoutContext, Worker};

/// How a widget class implements UI blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum UiBlocking {
    /// The widget has no blockable control of its own (sub-widgets may).
    #[default]
    None,
    /// Block by setting the control's `disabled` property.
    Disabled,
    /// Block by setting the control's `readOnly` property.
    Readonly,
}

/// How a widget class renders host-supplied errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDisplay {
    /// Through the `uniface:error`/`uniface:error-message` property pair.
    #[default]
    Properties,
    /// Log only; the widget has no error affordance (e.g. buttons).
    LogOnly,
}

/// Descriptor of one nested widget: which class to instantiate, how to
/// find its element back, and which of its triggers the parent exposes.
#[derive(Clone)]
pub struct SubWidgetDef {
    /// The nested widget's class.
    pub class: Rc<WidgetClass>,
    /// The style class locating the nested widget's element
    /// (`u-sw-<id>`).
    pub style_class: String,
    /// Trigger names the parent delegates; empty means all.
    pub triggers: Vec<String>,
    /// The property/trigger prefix addressing this sub-widget.
    pub prop_prefix: String,
}

/// Ordered setter lists, grouped the way deltas arrive.
///
/// `html` and `uniface` setters are per-id; `style` and `classes` workers
/// handle their whole group; `value` and `valrep` are scalar properties.
#[derive(Default)]
pub struct SetterMap {
    html: BTreeMap<String, Vec<Rc<dyn Worker>>>,
    uniface: BTreeMap<String, Vec<Rc<dyn Worker>>>,
    style: Vec<Rc<dyn Worker>>,
    classes: Vec<Rc<dyn Worker>>,
    value: Vec<Rc<dyn Worker>>,
    valrep: Vec<Rc<dyn Worker>>,
}

impl SetterMap {
    /// The setters registered for an `html:<id>` property.
    pub fn html(&self, id: &str) -> Option<&[Rc<dyn Worker>]> {
        self.html.get(id).map(Vec::as_slice)
    }

    /// The setters registered for a `uniface:<id>` property.
    pub fn uniface(&self, id: &str) -> Option<&[Rc<dyn Worker>]> {
        self.uniface.get(id).map(Vec::as_slice)
    }

    /// The group-level style setters.
    pub fn style(&self) -> &[Rc<dyn Worker>] {
        &self.style
    }

    /// The group-level class setters.
    pub fn classes(&self) -> &[Rc<dyn Worker>] {
        &self.classes
    }

    /// The setters registered for the scalar value property.
    pub fn value(&self) -> &[Rc<dyn Worker>] {
        &self.value
    }

    /// The setters registered for the valrep property.
    pub fn valrep(&self) -> &[Rc<dyn Worker>] {
        &self.valrep
    }
}

/// The compiled registries of one widget class.
pub struct WidgetDescriptor {
    /// The root layout worker of the structure tree.
    pub structure: Rc<dyn Worker>,
    /// Default value per registered property path.
    pub defaults: PropertyStore,
    /// Ordered setter lists (refresh order = declaration order).
    pub setters: SetterMap,
    /// The worker producing the widget's externally visible value.
    pub getter: Option<Rc<dyn Worker>>,
    /// Trigger name to trigger worker.
    pub triggers: BTreeMap<String, Rc<dyn Worker>>,
    /// Statically declared sub-widgets.
    pub sub_widgets: BTreeMap<String, SubWidgetDef>,
    /// Workers resolving definition-driven sub-widget collections.
    pub sub_widget_workers: Vec<Rc<dyn Worker>>,
    /// The class's UI blocking policy.
    pub ui_blocking: UiBlocking,
    /// The class's error rendering policy.
    pub error_display: ErrorDisplay,
}

/// Collects worker registrations during the compile pass.
#[derive(Default)]
pub struct DescriptorBuilder {
    defaults: PropertyStore,
    setters: SetterMap,
    getter: Option<Rc<dyn Worker>>,
    triggers: BTreeMap<String, Rc<dyn Worker>>,
    sub_widgets: BTreeMap<String, SubWidgetDef>,
    sub_widget_workers: Vec<Rc<dyn Worker>>,
}

impl DescriptorBuilder {
    /// Register the default value for a property path, creating
    /// intermediate sub-widget nesting as needed. Later registrations
    /// for the same path overwrite.
    pub fn register_default_value(&mut self, path: &str, value: Value) {
        self.defaults.set(&PropPath::parse(path), value);
    }

    /// Append a worker to the ordered setter list of a property path.
    ///
    /// Refresh order equals registration order, which equals structure
    /// declaration order (depth-first).
    pub fn register_setter(&mut self, path: &str, worker: Rc<dyn Worker>) {
        match path {
            "style" => self.setters.style.push(worker),
            "classes" | "class" => self.setters.classes.push(worker),
            "value" => self.setters.value.push(worker),
            "valrep" => self.setters.valrep.push(worker),
            _ => match PropPath::parse(path) {
                PropPath::Html(id) => self.setters.html.entry(id).or_default().push(worker),
                PropPath::Uniface(id) => self.setters.uniface.entry(id).or_default().push(worker),
                PropPath::Style(_) => self.setters.style.push(worker),
                PropPath::Classes(_) => self.setters.classes.push(worker),
                PropPath::Value => self.setters.value.push(worker),
                PropPath::ValRep => self.setters.valrep.push(worker),
                PropPath::Sub(..) => {
                    warn_ignored(
                        "DescriptorBuilder.register_setter",
                        &format!("Setter path '{path}' addresses a sub-widget"),
                        "Ignored",
                    );
                }
            },
        }
    }

    /// Register the value getter. Overwrites any earlier registration.
    pub fn register_getter(&mut self, worker: Rc<dyn Worker>) {
        self.getter = Some(worker);
    }

    /// Register a trigger worker. Overwrites any earlier registration
    /// under the same name.
    pub fn register_trigger(&mut self, trigger_name: &str, worker: Rc<dyn Worker>) {
        let _ = self.triggers.insert(trigger_name.to_string(), worker);
    }

    /// Register a statically declared sub-widget.
    pub fn register_sub_widget(&mut self, sub_widget_id: &str, def: SubWidgetDef) {
        let _ = self.sub_widgets.insert(sub_widget_id.to_string(), def);
    }

    /// Register a worker that resolves sub-widgets from definitions.
    pub fn register_sub_widget_worker(&mut self, worker: Rc<dyn Worker>) {
        self.sub_widget_workers.push(worker);
    }

    fn finish(
        self,
        structure: Rc<dyn Worker>,
        ui_blocking: UiBlocking,
        error_display: ErrorDisplay,
    ) -> WidgetDescriptor {
        WidgetDescriptor {
            structure,
            defaults: self.defaults,
            setters: self.setters,
            getter: self.getter,
            triggers: self.triggers,
            sub_widgets: self.sub_widgets,
            sub_widget_workers: self.sub_widget_workers,
            ui_blocking,
            error_display,
        }
    }
}

/// A widget class: a name plus its compiled descriptor.
pub struct WidgetClass {
    /// The name the class registers under (e.g. `wren.button`).
    pub name: String,
    /// The compiled registries.
    pub descriptor: WidgetDescriptor,
}

impl WidgetClass {
    /// Compile a structure tree into a widget class.
    ///
    /// The single `declare` pass over the tree populates the descriptor;
    /// the returned class is immutable from here on.
    pub fn compile(
        name: &str,
        structure: Rc<dyn Worker>,
        ui_blocking: UiBlocking,
        error_display: ErrorDisplay,
    ) -> Rc<Self> {
        let mut builder = DescriptorBuilder::default();
        structure.declare(&structure, &mut builder);
        trace!(target: "wren", class = name, "compiled widget class");
        Rc::new(WidgetClass {
            name: name.to_string(),
            descriptor: builder.finish(structure, ui_blocking, error_display),
        })
    }

    /// Build this class's layout subtree (no host bookkeeping).
    pub fn build_layout(&self, dom: &mut DomTree, cx: &mut LayoutContext<'_>) -> NodeId {
        self.descriptor
            .structure
            .layout(dom, cx)
            .into_iter()
            .next()
            .unwrap_or_else(|| dom.create_element("div"))
    }

    /// Host entry point: build the widget layout in place of a skeleton
    /// element.
    ///
    /// A skeleton that already carries the structure's root tag is
    /// reused; otherwise the built root replaces it in the tree. Either
    /// way the skeleton's element id carries over, and the supplied
    /// definition is recorded in `table` under that id so `on_connect`
    /// can recover it from a separate call stack.
    pub fn process_layout(
        &self,
        dom: &mut DomTree,
        skeleton: NodeId,
        definition: Option<Rc<dyn ObjectDefinition>>,
        registry: &ClassRegistry,
        table: &mut DefinitionsTable,
    ) -> NodeId {
        let element_id = dom
            .as_element(skeleton)
            .and_then(|element| element.id().map(str::to_string));
        let skeleton_classes: Vec<String> = dom
            .as_element(skeleton)
            .map(|element| element.classes().to_vec())
            .unwrap_or_default();

        let mut cx = LayoutContext {
            registry,
            definition: definition.as_deref(),
        };
        let built = self.build_layout(dom, &mut cx);

        let same_tag = match (dom.as_element(skeleton), dom.as_element(built)) {
            (Some(skeleton_data), Some(built_data)) => {
                skeleton_data.tag_name == built_data.tag_name
            }
            _ => false,
        };
        let root = if same_tag {
            // Reuse the skeleton: adopt the built element's state and
            // children in place, keeping the node the host already holds.
            let children: Vec<NodeId> = dom.children(built).to_vec();
            for child in children {
                dom.append_child(skeleton, child);
            }
            if let Some(mut data) = dom.as_element(built).cloned() {
                if let Some(id) = &element_id {
                    data.set_id(id.clone());
                }
                if let Some(slot) = dom.as_element_mut(skeleton) {
                    *slot = data;
                }
            }
            dom.detach(built);
            skeleton
        } else {
            dom.replace(skeleton, built);
            built
        };

        if let Some(id) = element_id {
            if let Some(element) = dom.as_element_mut(root) {
                element.set_id(id.clone());
            }
            if let Some(definition) = definition {
                // Bound to the host: mirror skeleton classes into the
                // definition and keep it recoverable by element id.
                for class in &skeleton_classes {
                    definition.set_property(&format!("class:{class}"), Value::Bool(true));
                }
                table.insert(id, definition);
            }
        }
        root
    }
}
