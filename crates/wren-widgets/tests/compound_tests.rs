//! Compound-widget tests: definition-driven sub-widget collections,
//! error routing, UI blocking and aggregate values.

use std::rc::Rc;

use wren_common::{DeltaValue, Value};
use wren_dom::{DomTree, NodeId, Selector};
use wren_engine::{
    ClassRegistry, DefinitionsTable, MemoryDefinition, Microtasks, ObjectDefinition, PropDelta,
    UiContext, WidgetInstance,
};

struct Harness {
    dom: DomTree,
    tasks: Microtasks,
    registry: ClassRegistry,
    table: DefinitionsTable,
}

impl Harness {
    fn new() -> Self {
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
        let built = class.process_layout(
            &mut self.dom,
            skeleton,
            Some(Rc::clone(&definition)),
            &self.registry,
            &mut self.table,
        );
        let mut widget = WidgetInstance::new(class);
        let _ = widget.on_connect(&self.dom, built, None, &self.registry, &mut self.table);
        widget
    }

    fn ui(&mut self) -> UiContext<'_> {
        UiContext {
            dom: &mut self.dom,
            tasks: &mut self.tasks,
        }
    }

    fn find(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.dom
            .query_selector(scope, &Selector::parse(selector).expect("selector"))
    }
}

fn controlbar_definition() -> Rc<MemoryDefinition> {
    Rc::new(
        MemoryDefinition::new("occurrence", "BAR.ENTITY")
            .with_property("controls-start", "ok;bogus")
            .with_property("ok:widget-class", wren_widgets::button::NAME)
            .with_property("ok:widget-triggers", "detail")
            .with_property("bogus:widget-class", "wren.not-a-widget"),
    )
}

#[test]
fn unresolvable_sub_widgets_are_dropped_and_written_back() {
    let mut harness = Harness::new();
    let definition = controlbar_definition();
    let widget = harness.mount_with(
        wren_widgets::controlbar::NAME,
        "ubar:BAR.ENTITY:1",
        definition.clone() as Rc<dyn ObjectDefinition>,
    );

    // Only the resolvable id survived, and the property was updated.
    assert_eq!(
        definition.get_property("controls-start"),
        Some(Value::Text("ok".into()))
    );
    assert!(widget.sub_widgets.contains_key("ok"));
    assert!(!widget.sub_widgets.contains_key("bogus"));

    let root = widget.root_element().expect("connected");
    assert!(harness.find(root, ".u-sw-ok").is_some());
    assert!(harness.find(root, ".u-sw-bogus").is_none());
}

#[test]
fn dynamic_sub_widget_trigger_delegation() {
    let mut harness = Harness::new();
    let definition = controlbar_definition();
    let mut widget = harness.mount_with(
        wren_widgets::controlbar::NAME,
        "ubar:BAR.ENTITY:1",
        definition as Rc<dyn ObjectDefinition>,
    );
    widget.data_init(&mut harness.ui());

    let delegated = widget
        .map_trigger("ok:detail", &harness.dom)
        .expect("delegated mapping");
    let direct = widget
        .sub_widgets
        .get("ok")
        .expect("sub-widget")
        .map_trigger("detail", &harness.dom)
        .expect("direct mapping");
    assert_eq!(delegated, direct);

    // "onchange" is outside the declared trigger list.
    assert!(widget.map_trigger("ok:onchange", &harness.dom).is_none());
}

#[test]
fn aggregate_value_covers_sub_widgets() {
    let mut harness = Harness::new();
    let definition = controlbar_definition();
    let mut widget = harness.mount_with(
        wren_widgets::controlbar::NAME,
        "ubar:BAR.ENTITY:1",
        definition as Rc<dyn ObjectDefinition>,
    );
    widget.data_init(&mut harness.ui());
    widget.data_update(
        &PropDelta::new().with("ok:value", "Save"),
        &mut harness.ui(),
    );

    let Value::Text(aggregate) = widget.get_value(&harness.dom) else {
        panic!("aggregate value is JSON text");
    };
    let parsed: serde_json::Value = serde_json::from_str(&aggregate).expect("valid JSON");
    assert_eq!(parsed["ok"], serde_json::json!("Save"));
}

#[test]
fn malformed_error_envelope_degrades_to_plain_message() {
    let mut harness = Harness::new();
    let mut widget = {
        let definition: Rc<dyn ObjectDefinition> =
            Rc::new(MemoryDefinition::new("field", "FIELD.ENTITY"));
        harness.mount_with(wren_widgets::text_field::NAME, "ufld:F.E:1", definition)
    };
    widget.data_init(&mut harness.ui());

    widget.show_error("{this is not an envelope", &mut harness.ui());
    let root = widget.root_element().expect("connected");
    assert!(harness.dom.as_element(root).expect("root").has_class("u-invalid"));
    assert_eq!(
        widget.data.uniface.get("error-message"),
        Some(&Value::Text("{this is not an envelope".into()))
    );

    widget.hide_error(&mut harness.ui());
    assert!(!harness.dom.as_element(root).expect("root").has_class("u-invalid"));
}

#[test]
fn leaf_widgets_validate_clean() {
    let mut harness = Harness::new();
    let definition: Rc<dyn ObjectDefinition> =
        Rc::new(MemoryDefinition::new("field", "FIELD.ENTITY"));
    let mut widget = harness.mount_with(wren_widgets::switch::NAME, "ufld:F.E:1", definition);
    widget.data_init(&mut harness.ui());
    assert_eq!(widget.validate(), None);
}

#[test]
fn unblock_restores_prior_disabled_state() {
    let mut harness = Harness::new();
    let definition: Rc<dyn ObjectDefinition> =
        Rc::new(MemoryDefinition::new("field", "FIELD.ENTITY"));
    let mut widget = harness.mount_with(wren_widgets::text_field::NAME, "ufld:F.E:1", definition);
    widget.data_init(&mut harness.ui());
    widget.data_update(&PropDelta::new().with("html:disabled", true), &mut harness.ui());

    widget.block_ui(&mut harness.ui());
    let root = widget.root_element().expect("connected");
    {
        let element = harness.dom.as_element(root).expect("root");
        assert!(element.has_class("u-blocked"));
        assert_eq!(element.prop("disabled"), Some(&Value::Bool(true)));
    }

    widget.unblock_ui(&mut harness.ui());
    {
        let element = harness.dom.as_element(root).expect("root");
        assert!(!element.has_class("u-blocked"));
        // Disabled before blocking, so still disabled after unblocking.
        assert_eq!(element.prop("disabled"), Some(&Value::Bool(true)));
    }

    // Re-enable, block, unblock: now the restore lands on enabled.
    widget.data_update(
        &PropDelta::new().with("html:disabled", DeltaValue::Reset),
        &mut harness.ui(),
    );
    widget.block_ui(&mut harness.ui());
    widget.unblock_ui(&mut harness.ui());
    assert_eq!(
        harness.dom.as_element(root).expect("root").prop("disabled"),
        Some(&Value::Bool(false))
    );
}
