//! Compilation tests: structure trees into widget class descriptors.

use std::rc::Rc;

use wren_common::Value;
use wren_engine::workers::{
    ElementWorker, HtmlAttribute, HtmlAttributeBoolean, SlottedElement, SlottedError, StyleClass,
    TriggerWorker,
};
use wren_engine::{
    ClassRegistry, DefinitionsTable, ErrorDisplay, MemoryDefinition, ObjectDefinition, UiBlocking,
    WidgetClass, WidgetInstance,
};

/// A minimal standalone widget class exercising the common worker kinds.
fn compile_test_class() -> Rc<WidgetClass> {
    let structure = ElementWorker::new(
        "x-control",
        "",
        "",
        vec![
            Box::new(HtmlAttribute::new("html:title", "title", Value::Null)),
            Box::new(HtmlAttribute::new("value", "value", "")),
            Box::new(HtmlAttributeBoolean::new("html:disabled", "disabled", false)),
            Box::new(StyleClass::new(&["u-test"])),
        ],
        vec![
            Box::new(SlottedElement::text("span", "u-label", ".u-label", "", "uniface:label-text")),
            Box::new(SlottedError::new("span", "u-error", ".u-error", "end")),
        ],
        vec![Box::new(TriggerWorker::new("onchange", "change", true))],
    );
    WidgetClass::compile(
        "test.control",
        Rc::new(structure),
        UiBlocking::Disabled,
        ErrorDisplay::Properties,
    )
}

#[test]
fn value_path_wires_the_getter() {
    let class = compile_test_class();
    assert!(class.descriptor.getter.is_some());
}

#[test]
fn defaults_are_nested_by_group() {
    let class = compile_test_class();
    let defaults = &class.descriptor.defaults;
    assert_eq!(defaults.html.get("title"), Some(&Value::Null));
    assert_eq!(defaults.html.get("disabled"), Some(&Value::Bool(false)));
    assert_eq!(defaults.classes.get("u-test"), Some(&Value::Bool(true)));
    assert_eq!(defaults.value, Value::Text(String::new()));
    assert_eq!(defaults.uniface.get("label-text"), Some(&Value::Null));
}

#[test]
fn triggers_register_by_name() {
    let class = compile_test_class();
    assert!(class.descriptor.triggers.contains_key("onchange"));
    assert!(!class.descriptor.triggers.contains_key("ondetail"));
}

#[test]
fn setters_exist_per_registered_path() {
    let class = compile_test_class();
    assert!(class.descriptor.setters.html("title").is_some());
    assert!(class.descriptor.setters.html("disabled").is_some());
    assert!(class.descriptor.setters.html("nope").is_none());
    assert!(!class.descriptor.setters.value().is_empty());
    assert!(!class.descriptor.setters.classes().is_empty());
    // The error slot registers all four error-pair properties.
    assert!(class.descriptor.setters.uniface("error").is_some());
    assert!(class.descriptor.setters.uniface("format-error-message").is_some());
}

#[test]
fn process_layout_preserves_id_and_stashes_definition() {
    let class = compile_test_class();
    let registry = ClassRegistry::new();
    let mut table = DefinitionsTable::new();
    let mut dom = wren_dom::DomTree::new();

    let skeleton = dom.create_element("span");
    dom.as_element_mut(skeleton).unwrap().set_id("ufld:FLD.ENT:DSP.1");
    let document = dom.root();
    dom.append_child(document, skeleton);

    let definition: Rc<dyn ObjectDefinition> = Rc::new(
        MemoryDefinition::new("field", "FLD.ENT").with_property("class:u-host", true),
    );
    let built = class.process_layout(&mut dom, skeleton, Some(definition), &registry, &mut table);

    let element = dom.as_element(built).unwrap();
    assert_eq!(element.tag_name, "x-control");
    assert_eq!(element.id(), Some("ufld:FLD.ENT:DSP.1"));
    // The skeleton was replaced in the document.
    assert_eq!(dom.children(document), &[built]);
    assert_eq!(table.len(), 1);

    // Connecting consumes the stashed definition.
    let mut widget = WidgetInstance::new(Rc::clone(&class));
    let _ = widget.on_connect(&dom, built, None, &registry, &mut table);
    assert!(table.is_empty());
}
