//! Number field widget.
//!
//! Wraps a `fluent-number-field` component: the min/max range pair on
//! top of the text-field surface, plus an embedded change button.

use std::rc::Rc;

use wren_common::Value;
use wren_dom::events;

use wren_engine::workers::{
    ElementWorker, HtmlAttribute, HtmlAttributeBoolean, HtmlAttributeChoice, HtmlAttributeMinMax,
    HtmlAttributeMinMaxLength, HtmlAttributeNumber, SlottedElement, SlottedError, SlottedWidget,
    StyleClass, TriggerWorker,
};
use wren_engine::{ClassRegistry, ErrorDisplay, UiBlocking, WidgetClass};

use crate::button;

/// The class name number fields register under.
pub const NAME: &str = "wren.number-field";

const MAXLENGTH_FALLBACK: i64 = 100_000;

/// Register the number field widget class.
pub fn register(registry: &mut ClassRegistry) {
    let structure = ElementWorker::new(
        "fluent-number-field",
        "",
        "",
        vec![
            Box::new(HtmlAttribute::new("html:current-value", "currentValue", "")),
            Box::new(HtmlAttribute::new("value", "value", "")),
            Box::new(HtmlAttribute::new("html:size", "size", "")),
            Box::new(HtmlAttribute::new("html:step", "step", 1)),
            Box::new(HtmlAttribute::new("html:placeholder", "placeholder", Value::Null)),
            Box::new(HtmlAttributeNumber::new(
                "html:tabindex",
                "tabIndex",
                Some(-1),
                None,
                Value::Null,
            )),
            Box::new(HtmlAttributeChoice::new(
                "html:appearance",
                "appearance",
                &["outline", "filled"],
                "outline",
            )),
            Box::new(
                HtmlAttributeChoice::new(
                    "uniface:label-position",
                    "u-label-position",
                    &["above", "below", "before", "after"],
                    "",
                )
                .as_markup_attribute(),
            ),
            Box::new(HtmlAttributeBoolean::new("html:hidden", "hidden", false)),
            Box::new(HtmlAttributeBoolean::new("html:hide-step", "hideStep", false)),
            Box::new(HtmlAttributeBoolean::new("html:disabled", "disabled", false)),
            Box::new(HtmlAttributeBoolean::new("html:readonly", "readOnly", false)),
            Box::new(HtmlAttributeMinMax::new("html:min", "html:max")),
            Box::new(HtmlAttributeMinMaxLength::new(
                "html:minlength",
                "html:maxlength",
                MAXLENGTH_FALLBACK,
            )),
            Box::new(StyleClass::new(&["u-number-field", "neutral"])),
        ],
        vec![
            Box::new(SlottedElement::text(
                "span",
                "u-label-text",
                ".u-label-text",
                "",
                "uniface:label-text",
            )),
            Box::new(SlottedElement::text_and_icon(
                "span",
                "u-prefix",
                ".u-prefix",
                "start",
                "uniface:prefix-text",
                "uniface:prefix-icon",
            )),
            Box::new(SlottedError::new("span", "u-error-icon", ".u-error-icon", "end")),
            Box::new(SlottedElement::text_and_icon(
                "span",
                "u-suffix",
                ".u-suffix",
                "end",
                "uniface:suffix-text",
                "uniface:suffix-icon",
            )),
            Box::new(SlottedWidget::new(
                registry,
                "end",
                "changebutton",
                button::NAME,
                vec![
                    ("uniface:icon-position".to_string(), Value::Text("end".to_string())),
                    ("html:tabindex".to_string(), Value::Int(-1)),
                    ("html:appearance".to_string(), Value::Text("stealth".to_string())),
                ],
                false,
                &["detail"],
            )),
        ],
        vec![Box::new(TriggerWorker::new("onchange", events::CHANGE, true))],
    );
    registry.add(WidgetClass::compile(
        NAME,
        Rc::new(structure),
        UiBlocking::Readonly,
        ErrorDisplay::Properties,
    ));
}
