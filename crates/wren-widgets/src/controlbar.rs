//! Controlbar widget.
//!
//! A compound container with three sections, each populated at layout
//! time from the object definition: the `controls-start`,
//! `controls-center` and `controls-end` properties name the sub-widgets
//! to embed. The controlbar has no blockable control of its own; UI
//! blocking recurses into the embedded widgets.

use std::rc::Rc;

use wren_engine::workers::{ElementWorker, HtmlAttributeChoice, StyleClass, WidgetsByProperty};
use wren_engine::{ClassRegistry, ErrorDisplay, UiBlocking, WidgetClass};

/// The class name controlbars register under.
pub const NAME: &str = "wren.controlbar";

fn section(style_class: &str, selector: &str, prop_id: &str) -> ElementWorker {
    ElementWorker::new(
        "div",
        style_class,
        selector,
        Vec::new(),
        vec![Box::new(WidgetsByProperty::new(prop_id))],
        Vec::new(),
    )
}

/// Register the controlbar widget class.
pub fn register(registry: &mut ClassRegistry) {
    let structure = ElementWorker::new(
        "div",
        "",
        "",
        vec![
            Box::new(
                HtmlAttributeChoice::new(
                    "uniface:orientation",
                    "u-orientation",
                    &["horizontal", "vertical"],
                    "horizontal",
                )
                .as_markup_attribute(),
            ),
            Box::new(StyleClass::new(&["u-controlbar"])),
        ],
        vec![
            Box::new(section("u-start-section", ".u-start-section", "controls-start")),
            Box::new(section("u-center-section", ".u-center-section", "controls-center")),
            Box::new(section("u-end-section", ".u-end-section", "controls-end")),
        ],
        Vec::new(),
    );
    registry.add(WidgetClass::compile(
        NAME,
        Rc::new(structure),
        UiBlocking::None,
        ErrorDisplay::Properties,
    ));
}
