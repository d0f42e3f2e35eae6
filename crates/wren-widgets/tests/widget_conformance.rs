//! Conformance tests for the built-in widget classes, exercising the
//! engine contract end to end: idempotent refresh, default/reset round
//! trips, format-error precedence, attribute validation guards,
//! sub-widget visibility and trigger delegation, tri-state checkbox and
//! select valrep behavior.

use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata};
use wren_common::{DeltaValue, ValRepItem, Value};
use wren_dom::{DomEvent, DomTree, NodeId, Selector, events};
use wren_engine::{
    ClassRegistry, DefinitionsTable, MemoryDefinition, Microtasks, ObjectDefinition, PropDelta,
    UiContext, WidgetInstance,
};

/// Host-side fixture: element tree, task queue, registry, side table.
struct Harness {
    dom: DomTree,
    tasks: Microtasks,
    registry: ClassRegistry,
    table: DefinitionsTable,
}

impl Harness {
    fn new() -> Self {
        // Surface engine warnings under RUST_LOG while debugging tests.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
        let mut registry = ClassRegistry::new();
        wren_widgets::register_builtin(&mut registry);
        Self {
            dom: DomTree::new(),
            tasks: Microtasks::new(),
            registry,
            table: DefinitionsTable::new(),
        }
    }

    fn mount_with(
        &mut self,
        class_name: &str,
        element_id: &str,
        definition: Rc<dyn ObjectDefinition>,
    ) -> WidgetInstance {
        let class = self.registry.get(class_name).expect("registered class");
        let skeleton = self.dom.create_element("span");
        self.dom.as_element_mut(skeleton).expect("skeleton").set_id(element_id);
        let document = self.dom.root();
        self.dom.append_child(document, skeleton);
        let built =
            class.process_layout(&mut self.dom, skeleton, Some(definition), &self.registry, &mut self.table);
        let mut widget = WidgetInstance::new(class);
        let _ = widget.on_connect(&self.dom, built, None, &self.registry, &mut self.table);
        widget
    }

    fn mount(&mut self, class_name: &str, element_id: &str) -> WidgetInstance {
        let definition: Rc<dyn ObjectDefinition> =
            Rc::new(MemoryDefinition::new("field", "FIELD.ENTITY"));
        self.mount_with(class_name, element_id, definition)
    }

    fn ui(&mut self) -> UiContext<'_> {
        UiContext {
            dom: &mut self.dom,
            tasks: &mut self.tasks,
        }
    }

    fn find(&self, scope: NodeId, selector: &str) -> NodeId {
        self.dom
            .query_selector(scope, &Selector::parse(selector).expect("selector"))
            .unwrap_or_else(|| panic!("no element for {selector}"))
    }

    fn run_tasks(&mut self) -> usize {
        self.tasks.run(&mut self.dom)
    }
}

/// Render the observable state of a subtree, excluding element ids so
/// two mounts of the same class compare equal.
fn snapshot(dom: &DomTree, node: NodeId, out: &mut String) {
    if let Some(element) = dom.as_element(node) {
        out.push_str(&format!(
            "<{} classes={:?} hidden={} slot={:?} title={:?} text={:?}",
            element.tag_name,
            element.classes(),
            element.hidden,
            element.slot,
            element.title,
            element.text
        ));
        for (name, value) in element.attrs() {
            if name != "id" {
                out.push_str(&format!(" {name}={value:?}"));
            }
        }
        for (name, value) in element.props() {
            out.push_str(&format!(" [{name}={value:?}]"));
        }
        out.push('>');
    }
    for &child in dom.children(node) {
        snapshot(dom, child, out);
    }
    out.push_str("</>");
}

fn subtree(dom: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    snapshot(dom, node, &mut out);
    out
}

/// Counts WARN-level events while installed.
struct WarnCounter {
    warnings: Arc<AtomicUsize>,
}

impl tracing::Subscriber for WarnCounter {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        if *event.metadata().level() == Level::WARN {
            let _ = self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

#[test]
fn repeated_update_is_idempotent() {
    let mut harness = Harness::new();
    let mut widget = harness.mount(wren_widgets::text_field::NAME, "ufld:F.E:1");
    widget.data_init(&mut harness.ui());

    let delta = PropDelta::new()
        .with("uniface:label-text", "Name")
        .with("classes:u-extra", true)
        .with("html:title", "tip")
        .with("value", "v1");
    widget.data_update(&delta, &mut harness.ui());
    let root = widget.root_element().expect("connected");
    let first = subtree(&harness.dom, root);

    widget.data_update(&delta, &mut harness.ui());
    let second = subtree(&harness.dom, root);
    assert_eq!(first, second);
}

#[test]
fn reset_round_trips_to_defaults() {
    let mut harness = Harness::new();
    let mut pristine = harness.mount(wren_widgets::text_field::NAME, "ufld:F.E:1");
    pristine.data_init(&mut harness.ui());
    let pristine_state = subtree(&harness.dom, pristine.root_element().expect("connected"));

    let mut widget = harness.mount(wren_widgets::text_field::NAME, "ufld:F.E:2");
    widget.data_init(&mut harness.ui());
    widget.data_update(
        &PropDelta::new()
            .with("html:title", "tip")
            .with("classes:u-extra", true),
        &mut harness.ui(),
    );
    widget.data_update(
        &PropDelta::new()
            .with("html:title", DeltaValue::Reset)
            .with("classes:u-extra", DeltaValue::Reset),
        &mut harness.ui(),
    );
    let state = subtree(&harness.dom, widget.root_element().expect("connected"));
    assert_eq!(state, pristine_state);
}

#[test]
fn format_error_outranks_validation_error() {
    let mut harness = Harness::new();
    let mut widget = harness.mount(wren_widgets::checkbox::NAME, "ufld:F.E:1");
    widget.data_init(&mut harness.ui());

    widget.show_error("value out of range", &mut harness.ui());
    widget.data_update(&PropDelta::new().with("value", 123), &mut harness.ui());

    let root = widget.root_element().expect("connected");
    let root_element = harness.dom.as_element(root).expect("root");
    assert!(root_element.has_class("u-format-invalid"));
    assert!(!root_element.has_class("u-invalid"));

    let icon = harness.find(root, ".u-error-icon");
    let icon_element = harness.dom.as_element(icon).expect("icon");
    assert!(!icon_element.hidden);
    assert!(icon_element.title.contains("cannot be represented"));
}

#[test]
fn validated_attributes_guard_while_value_nonempty() {
    let mut harness = Harness::new();
    let mut widget = harness.mount(wren_widgets::text_field::NAME, "ufld:F.E:1");
    widget.data_init(&mut harness.ui());
    widget.data_update(&PropDelta::new().with("value", "abc"), &mut harness.ui());

    let warnings = Arc::new(AtomicUsize::new(0));
    {
        let subscriber = WarnCounter {
            warnings: Arc::clone(&warnings),
        };
        let delta = PropDelta::new().with("html:minlength", 3);
        tracing::subscriber::with_default(subscriber, || {
            widget.data_update(&delta, &mut harness.ui());
        });
    }
    assert_eq!(warnings.load(Ordering::SeqCst), 1);
    let root = widget.root_element().expect("connected");
    assert_eq!(harness.dom.as_element(root).expect("root").prop("minlength"), None);

    // Clearing the value first makes the same change succeed.
    widget.data_update(&PropDelta::new().with("value", ""), &mut harness.ui());
    widget.data_update(&PropDelta::new().with("html:minlength", 3), &mut harness.ui());
    assert_eq!(
        harness.dom.as_element(root).expect("root").prop("minlength"),
        Some(&Value::Int(3))
    );
}

#[test]
fn sub_widget_visibility_toggles_slot_and_class() {
    let mut harness = Harness::new();
    let mut widget = harness.mount(wren_widgets::text_field::NAME, "ufld:F.E:1");
    widget.data_init(&mut harness.ui());

    let root = widget.root_element().expect("connected");
    let button = harness.find(root, ".u-sw-change-button");
    let suffix = harness.find(root, ".u-suffix");
    let suffix_before = subtree(&harness.dom, suffix);
    assert!(harness.dom.as_element(button).expect("button").hidden);

    widget.data_update(&PropDelta::new().with("uniface:change-button", true), &mut harness.ui());
    let shown = harness.dom.as_element(button).expect("button");
    assert!(!shown.hidden);
    assert_eq!(shown.slot, "end");
    assert!(
        harness
            .dom
            .as_element(root)
            .expect("root")
            .has_class("u-sw-change-button-shown")
    );

    widget.data_update(&PropDelta::new().with("uniface:change-button", false), &mut harness.ui());
    let hidden = harness.dom.as_element(button).expect("button");
    assert!(hidden.hidden);
    assert_eq!(hidden.slot, "");
    assert!(
        !harness
            .dom
            .as_element(root)
            .expect("root")
            .has_class("u-sw-change-button-shown")
    );
    // Sibling slots are untouched by the toggle.
    assert_eq!(subtree(&harness.dom, suffix), suffix_before);
}

#[test]
fn trigger_delegation_matches_direct_mapping() {
    let mut harness = Harness::new();
    let mut widget = harness.mount(wren_widgets::text_field::NAME, "ufld:F.E:1");
    widget.data_init(&mut harness.ui());

    let delegated = widget
        .map_trigger("change-button:detail", &harness.dom)
        .expect("delegated mapping");
    let direct = widget
        .sub_widgets
        .get("change-button")
        .expect("sub-widget")
        .map_trigger("detail", &harness.dom)
        .expect("direct mapping");
    assert_eq!(delegated, direct);
    assert_eq!(delegated.event_name, "click");
    assert!(delegated.validate);

    // Host-side spelling (underscore-encoded) maps identically.
    assert_eq!(
        widget.map_trigger("change_button__detail", &harness.dom),
        Some(delegated)
    );

    // A trigger outside the sub-widget's allow-list does not delegate.
    assert!(widget.map_trigger("change-button:onchange", &harness.dom).is_none());
}

#[test]
fn checkbox_tristate_end_to_end() {
    let mut harness = Harness::new();
    let mut widget = harness.mount(wren_widgets::checkbox::NAME, "ufld:F.E:1");
    widget.data_init(&mut harness.ui());

    widget.data_update(&PropDelta::new().with("value", ""), &mut harness.ui());
    let root = widget.root_element().expect("connected");
    {
        let element = harness.dom.as_element(root).expect("root");
        assert_eq!(element.prop("indeterminate"), Some(&Value::Bool(true)));
        assert_eq!(element.prop("checked"), Some(&Value::Bool(false)));
        assert_eq!(element.prop("currentChecked"), Some(&Value::Bool(false)));
        assert!(!element.has_class("u-format-invalid"));
    }
    assert_eq!(widget.get_value(&harness.dom), Value::Text(String::new()));

    widget.data_update(&PropDelta::new().with("value", 123), &mut harness.ui());
    {
        let element = harness.dom.as_element(root).expect("root");
        assert!(element.has_class("u-format-invalid"));
        assert_eq!(element.prop("checked"), Some(&Value::Bool(false)));
    }
    let icon = harness.find(root, ".u-error-icon");
    let icon_element = harness.dom.as_element(icon).expect("icon");
    assert!(!icon_element.hidden);
    assert!(icon_element.title.contains("cannot be represented"));
}

#[test]
fn checkbox_change_event_cycles_through_tristate() {
    let mut harness = Harness::new();
    let mut widget = harness.mount(wren_widgets::checkbox::NAME, "ufld:F.E:1");
    let root = widget.root_element().expect("connected");
    let updaters = widget.on_connect(&harness.dom, root, None, &harness.registry, &mut harness.table);
    widget.data_init(&mut harness.ui());
    widget.data_update(
        &PropDelta::new().with("uniface:tri-state", true).with("value", ""),
        &mut harness.ui(),
    );

    let updater = updaters.first().expect("value updater");
    assert_eq!(updater.event_name, events::CHANGE);

    // indeterminate -> checked -> unchecked -> indeterminate again.
    let mut event = DomEvent::new(events::CHANGE);
    widget.dispatch(updater, &mut harness.ui(), &mut event);
    assert!(event.default_prevented());
    assert_eq!(widget.get_value(&harness.dom), Value::Bool(true));

    let mut event = DomEvent::new(events::CHANGE);
    widget.dispatch(updater, &mut harness.ui(), &mut event);
    assert_eq!(widget.get_value(&harness.dom), Value::Bool(false));

    let mut event = DomEvent::new(events::CHANGE);
    widget.dispatch(updater, &mut harness.ui(), &mut event);
    assert_eq!(widget.get_value(&harness.dom), Value::Text(String::new()));
}

#[test]
fn select_value_without_option_shows_format_error() {
    let mut harness = Harness::new();
    let mut widget = harness.mount(wren_widgets::select::NAME, "ufld:F.E:1");
    widget.data_init(&mut harness.ui());

    widget.data_update(
        &PropDelta::new()
            .with("valrep", Value::ValRep(vec![ValRepItem::new("1", "a")]))
            .with("value", "2"),
        &mut harness.ui(),
    );

    let root = widget.root_element().expect("connected");
    assert!(harness.dom.as_element(root).expect("root").has_class("u-format-invalid"));
    let icon = harness.find(root, ".u-error-icon");
    let icon_element = harness.dom.as_element(icon).expect("icon");
    assert!(!icon_element.hidden);
    assert!(icon_element.title.contains('2'));
    // Nothing is selected: the selected-value element shows no text.
    let selected = harness.find(root, ".u-selected-value");
    assert_eq!(harness.dom.as_element(selected).expect("selected").text, "");

    // A representable value clears the error and shows its rep.
    widget.data_update(&PropDelta::new().with("value", "1"), &mut harness.ui());
    assert!(!harness.dom.as_element(root).expect("root").has_class("u-format-invalid"));
    assert_eq!(harness.dom.as_element(selected).expect("selected").text, "a");
}

#[test]
fn select_reasserts_last_value_after_component_correction() {
    let mut harness = Harness::new();
    let mut widget = harness.mount(wren_widgets::select::NAME, "ufld:F.E:1");
    widget.data_init(&mut harness.ui());
    let _ = harness.run_tasks();

    widget.data_update(
        &PropDelta::new().with("valrep", Value::ValRep(vec![ValRepItem::new("1", "a")])),
        &mut harness.ui(),
    );
    widget.data_update(&PropDelta::new().with("value", "1"), &mut harness.ui());
    widget.data_update(&PropDelta::new().with("value", "2"), &mut harness.ui());

    // Simulate the component's own default-selection between updates.
    let root = widget.root_element().expect("connected");
    harness
        .dom
        .as_element_mut(root)
        .expect("root")
        .set_prop("value", Value::Text("1".into()));

    let ran = harness.run_tasks();
    assert!(ran >= 2);
    // FIFO draining converges on the last scheduled value.
    assert_eq!(
        harness.dom.as_element(root).expect("root").prop("value"),
        Some(&Value::Text("2".into()))
    );
}
