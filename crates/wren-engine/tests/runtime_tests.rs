//! Runtime tests: delta application, RESET resolution, refresh ordering.

use std::cell::RefCell;
use std::rc::Rc;

use wren_common::{DeltaValue, Value};
use wren_dom::DomTree;
use wren_engine::workers::{ElementWorker, HtmlAttribute, SlottedWidgetsByProperty, StyleClass};
use wren_engine::{
    ClassRegistry, DefinitionsTable, DescriptorBuilder, ErrorDisplay, MemoryDefinition, Microtasks,
    ObjectDefinition, PropDelta, UiBlocking, UiContext, WidgetClass, WidgetInstance, Worker,
};

/// Records its refreshes so tests can observe dispatch order and count.
struct Probe {
    name: &'static str,
    paths: Vec<&'static str>,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Worker for Probe {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        for path in &self.paths {
            builder.register_setter(path, Rc::clone(own));
            builder.register_default_value(path, Value::Null);
        }
    }

    fn refresh(&self, _widget: &mut WidgetInstance, _ui: &mut UiContext<'_>) {
        self.log.borrow_mut().push(self.name);
    }
}

struct Fixture {
    dom: DomTree,
    tasks: Microtasks,
    registry: ClassRegistry,
    table: DefinitionsTable,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dom: DomTree::new(),
            tasks: Microtasks::new(),
            registry: ClassRegistry::new(),
            table: DefinitionsTable::new(),
        }
    }

    fn mount(&mut self, class: &Rc<WidgetClass>) -> WidgetInstance {
        let skeleton = self.dom.create_element("span");
        let document = self.dom.root();
        self.dom.append_child(document, skeleton);
        let built = class.process_layout(&mut self.dom, skeleton, None, &self.registry, &mut self.table);
        let mut widget = WidgetInstance::new(Rc::clone(class));
        let _ = widget.on_connect(&self.dom, built, None, &self.registry, &mut self.table);
        widget
    }

    fn ui(&mut self) -> UiContext<'_> {
        UiContext {
            dom: &mut self.dom,
            tasks: &mut self.tasks,
        }
    }
}

fn probe_class(log: &Rc<RefCell<Vec<&'static str>>>) -> Rc<WidgetClass> {
    let structure = ElementWorker::new(
        "x-control",
        "",
        "",
        vec![
            Box::new(Probe {
                name: "first",
                paths: vec!["html:alpha", "html:beta"],
                log: Rc::clone(log),
            }),
            Box::new(Probe {
                name: "second",
                paths: vec!["html:beta"],
                log: Rc::clone(log),
            }),
        ],
        Vec::new(),
        Vec::new(),
    );
    WidgetClass::compile(
        "test.probe",
        Rc::new(structure),
        UiBlocking::None,
        ErrorDisplay::Properties,
    )
}

fn titled_class() -> Rc<WidgetClass> {
    let structure = ElementWorker::new(
        "x-control",
        "",
        "",
        vec![
            Box::new(HtmlAttribute::new("html:title", "title", Value::Null)),
            Box::new(StyleClass::new(&["u-test"])),
        ],
        Vec::new(),
        Vec::new(),
    );
    WidgetClass::compile(
        "test.titled",
        Rc::new(structure),
        UiBlocking::None,
        ErrorDisplay::Properties,
    )
}

#[test]
fn workers_refresh_once_in_first_seen_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let class = probe_class(&log);
    let mut fixture = Fixture::new();
    let mut widget = fixture.mount(&class);

    log.borrow_mut().clear();
    let delta = PropDelta::new().with("html:alpha", "a").with("html:beta", "b");
    widget.set_properties(&delta, &mut fixture.ui());
    // "first" handles both paths but refreshes once; "second" follows in
    // registration order.
    assert_eq!(*log.borrow(), vec!["first", "second"]);
}

#[test]
fn reset_restores_registered_default() {
    let class = titled_class();
    let mut fixture = Fixture::new();
    let mut widget = fixture.mount(&class);
    widget.data_init(&mut fixture.ui());

    widget.set_properties(&PropDelta::new().with("html:title", "tip"), &mut fixture.ui());
    let root = widget.root_element().unwrap();
    assert_eq!(
        fixture.dom.as_element(root).unwrap().prop("title"),
        Some(&Value::Text("tip".into()))
    );

    widget.set_properties(
        &PropDelta::new().with("html:title", DeltaValue::Reset),
        &mut fixture.ui(),
    );
    // Default is null: the property is removed entirely.
    assert_eq!(fixture.dom.as_element(root).unwrap().prop("title"), None);
    assert_eq!(widget.data.html.get("title"), Some(&Value::Null));
}

#[test]
fn unsupported_property_is_recorded_not_fatal() {
    let class = titled_class();
    let mut fixture = Fixture::new();
    let mut widget = fixture.mount(&class);
    widget.data_init(&mut fixture.ui());

    widget.set_properties(&PropDelta::new().with("html:mystery", "x"), &mut fixture.ui());
    assert_eq!(widget.data.html.get("mystery"), Some(&Value::Text("x".into())));
}

#[test]
fn style_reset_falls_back_to_unset() {
    let class = titled_class();
    let mut fixture = Fixture::new();
    let mut widget = fixture.mount(&class);
    widget.data_init(&mut fixture.ui());

    widget.set_properties(&PropDelta::new().with("style:width", "10px"), &mut fixture.ui());
    widget.set_properties(
        &PropDelta::new().with("style:width", DeltaValue::Reset),
        &mut fixture.ui(),
    );
    assert_eq!(widget.data.style.get("width"), Some(&Value::Text("unset".into())));
}

#[test]
fn class_defaults_apply_on_data_init() {
    let class = titled_class();
    let mut fixture = Fixture::new();
    let mut widget = fixture.mount(&class);
    widget.data_init(&mut fixture.ui());

    let root = widget.root_element().unwrap();
    assert!(fixture.dom.as_element(root).unwrap().has_class("u-test"));
    assert_eq!(fixture.dom.as_element(root).unwrap().prop("title"), None);
}

#[test]
fn map_trigger_without_registration_returns_none() {
    let class = titled_class();
    let mut fixture = Fixture::new();
    let widget = fixture.mount(&class);
    assert!(widget.map_trigger("onchange", &fixture.dom).is_none());
}

#[test]
fn slotted_collections_stamp_and_connect_sub_widgets() {
    let mut fixture = Fixture::new();
    fixture.registry.add(titled_class());

    let structure = ElementWorker::new(
        "x-panel",
        "",
        "",
        Vec::new(),
        vec![Box::new(SlottedWidgetsByProperty::new("panel-items", "u-panel-item"))],
        Vec::new(),
    );
    let class = WidgetClass::compile(
        "test.panel",
        Rc::new(structure),
        UiBlocking::None,
        ErrorDisplay::Properties,
    );

    let definition: Rc<dyn ObjectDefinition> = Rc::new(
        MemoryDefinition::new("occurrence", "PANEL.ENTITY")
            .with_property("panel-items", "a;b")
            .with_property("a:widget-class", "test.titled")
            .with_property("b:widget-class", "test.missing"),
    );

    let skeleton = fixture.dom.create_element("span");
    fixture.dom.as_element_mut(skeleton).unwrap().set_id("upnl:PANEL.ENTITY:1");
    let document = fixture.dom.root();
    fixture.dom.append_child(document, skeleton);
    let built = class.process_layout(
        &mut fixture.dom,
        skeleton,
        Some(Rc::clone(&definition)),
        &fixture.registry,
        &mut fixture.table,
    );

    // The unresolvable id was dropped and written back.
    assert_eq!(definition.get_property("panel-items"), Some(Value::Text("a".into())));

    let mut widget = WidgetInstance::new(class);
    let _ = widget.on_connect(&fixture.dom, built, None, &fixture.registry, &mut fixture.table);
    assert!(widget.sub_widgets.contains_key("a"));

    let sub_root = widget.sub_widgets.get("a").unwrap().root_element().unwrap();
    let sub_element = fixture.dom.as_element(sub_root).unwrap();
    assert!(sub_element.has_class("u-sw-a"));
    assert!(sub_element.has_class("u-panel-item"));
    assert_eq!(sub_element.attr("sub-widget-id"), Some("a"));
}
