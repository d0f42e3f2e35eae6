//! The worker contract.
//!
//! A worker binds one or more logical property paths to an effect on the
//! element tree and can replay that effect (`refresh`) against any widget
//! instance of its class. Workers are constructed once per widget class
//! while building the class's structure tree; they never cache element
//! references, resolving their target element through the widget instance
//! on every refresh.

use std::collections::BTreeMap;
use std::rc::Rc;

use wren_common::Value;
use wren_common::logging::error_skipped;
use wren_dom::{DomEvent, DomTree, NodeId, Selector};

use crate::definition::ObjectDefinition;
use crate::descriptor::{DescriptorBuilder, SubWidgetDef};
use crate::microtask::Microtasks;
use crate::registry::ClassRegistry;
use crate::widget::WidgetInstance;

/// Mutable UI state threaded through refresh call chains: the live
/// element tree plus the post-update reconciliation queue.
pub struct UiContext<'a> {
    /// The live element tree.
    pub dom: &'a mut DomTree,
    /// Deferred reconciliation tasks, drained by the host after updates.
    pub tasks: &'a mut Microtasks,
}

/// Read-only surroundings of a layout build: the widget class registry
/// and (when the host supplied one) the object definition.
pub struct LayoutContext<'a> {
    /// The class registry used to resolve nested widget classes by name.
    pub registry: &'a ClassRegistry,
    /// The definition of the object this layout is built for.
    pub definition: Option<&'a dyn ObjectDefinition>,
}

/// A handler attached to a value updater; invoked by the host when the
/// associated event fires on the associated element.
pub type EventHandler = Rc<dyn Fn(&mut WidgetInstance, &mut UiContext<'_>, &mut DomEvent)>;

/// One DOM event the host must watch to know the widget value changed.
///
/// `target` addresses the widget instance the handler belongs to as a
/// chain of sub-widget ids from the widget that returned the updater
/// (empty = that widget itself); dispatch through
/// [`WidgetInstance::dispatch`] resolves it.
pub struct ValueUpdater {
    /// Sub-widget id chain addressing the owning instance.
    pub target: Vec<String>,
    /// The element the event fires on.
    pub element: NodeId,
    /// The event name.
    pub event_name: String,
    /// Optional handler to run before the host re-reads the value.
    pub handler: Option<EventHandler>,
}

/// The mapping of a logical trigger onto a concrete DOM event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMapping {
    /// The element the host must listen on.
    pub element: NodeId,
    /// The DOM event name to listen for.
    pub event_name: String,
    /// Whether the host should validate the widget before activating.
    pub validate: bool,
}

/// A worker: the polymorphic behavior unit of the engine.
///
/// Workers declare themselves against a widget class (`declare`), may
/// contribute elements to the class layout (`layout`), and replay their
/// property bindings against live instances (`refresh`). Every method has
/// a no-op default so each worker kind implements only its slice.
pub trait Worker {
    /// Inject the owning element's query selector, so the worker can
    /// resolve its target element relative to the widget root. Called by
    /// the owning layout node before the structure is frozen.
    fn set_element_query_selector(&mut self, _selector: &str) {}

    /// Declare defaults, setters, getters, triggers and sub-widgets
    /// against the class under construction. `own` is this worker's own
    /// shared handle, cloned into the registration lists.
    fn declare(&self, _own: &Rc<dyn Worker>, _builder: &mut DescriptorBuilder) {}

    /// Contribute elements to the widget layout. Dynamic collection
    /// workers may return any number of nodes, including none.
    fn layout(&self, _dom: &mut DomTree, _cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        Vec::new()
    }

    /// Replay this worker's bindings against the instance's live DOM.
    ///
    /// Must be idempotent: repeated refreshes with the same instance
    /// state produce identical DOM state.
    fn refresh(&self, _widget: &mut WidgetInstance, _ui: &mut UiContext<'_>) {}

    /// Produce the widget's externally visible value. Only meaningful for
    /// the worker registered as the class's value getter.
    fn value(&self, _widget: &WidgetInstance, _dom: &DomTree) -> Value {
        Value::Null
    }

    /// The DOM events that signal a value change to the host.
    fn value_updaters(&self, _widget: &WidgetInstance, _dom: &DomTree) -> Vec<ValueUpdater> {
        Vec::new()
    }

    /// Translate the worker's logical trigger into a DOM event mapping.
    fn trigger_mapping(&self, _widget: &WidgetInstance, _dom: &DomTree) -> Option<TriggerMapping> {
        None
    }

    /// Resolve definition-driven sub-widget descriptors at connect time.
    /// Only meaningful for dynamic sub-widget workers.
    fn sub_widget_definitions(
        &self,
        _definition: &dyn ObjectDefinition,
        _registry: &ClassRegistry,
    ) -> BTreeMap<String, SubWidgetDef> {
        BTreeMap::new()
    }
}

/// The element a worker operates on, resolved per refresh through the
/// owning widget instance.
///
/// An empty selector means "the widget's own root element" - never
/// "no element".
#[derive(Debug, Clone, Default)]
pub struct ElementTarget {
    selector: Option<Selector>,
}

impl ElementTarget {
    /// Build a target from a selector string (empty = widget root).
    pub fn new(selector: &str) -> Self {
        let mut target = Self::default();
        target.set_selector(selector);
        target
    }

    /// Replace the selector (empty = widget root).
    pub fn set_selector(&mut self, selector: &str) {
        if selector.is_empty() {
            self.selector = None;
            return;
        }
        match Selector::parse(selector) {
            Ok(parsed) => self.selector = Some(parsed),
            Err(error) => {
                error_skipped("ElementTarget.set_selector", &error.to_string(), "Target unresolvable");
                self.selector = None;
            }
        }
    }

    /// Resolve the live element for `widget`, scoped to its root.
    pub fn resolve(&self, widget: &WidgetInstance, dom: &DomTree) -> Option<NodeId> {
        let root = widget.root_element()?;
        match &self.selector {
            None => Some(root),
            Some(selector) => dom.query_selector(root, selector),
        }
    }
}

/// Render a property value as plain text for element content, titles and
/// slot names: text passes through, null reads as empty.
pub fn text_or_empty(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Text(text) => text.clone(),
        other => other.display_string(),
    }
}

/// A property value's presence as slot content: non-empty text only.
pub fn content_of(value: &Value) -> Option<String> {
    match value {
        Value::Text(text) if !text.is_empty() => Some(text.clone()),
        Value::Int(number) => Some(number.to_string()),
        _ => None,
    }
}
