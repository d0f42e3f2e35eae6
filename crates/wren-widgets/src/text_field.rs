//! Text field widget.
//!
//! Wraps a `fluent-text-field` component with label/prefix/suffix slots,
//! the min/max-length pair, and an embedded change button the host can
//! toggle through `uniface:change-button`.

use std::rc::Rc;

use wren_common::Value;
use wren_dom::events;

use wren_engine::workers::{
    ElementWorker, HtmlAttribute, HtmlAttributeBoolean, HtmlAttributeChoice,
    HtmlAttributeMinMaxLength, HtmlAttributeNumber, SlottedElement, SlottedError, SlottedWidget,
    StyleClass, TriggerWorker,
};
use wren_engine::{ClassRegistry, ErrorDisplay, UiBlocking, WidgetClass};

use crate::button;

/// The class name text fields register under.
pub const NAME: &str = "wren.text-field";

/// Substitute maximum once `maxlength` has ever been set; the control
/// cannot truly unset the attribute again.
const MAXLENGTH_FALLBACK: i64 = 100_000;

/// Register the text field widget class.
pub fn register(registry: &mut ClassRegistry) {
    let structure = ElementWorker::new(
        "fluent-text-field",
        "",
        "",
        vec![
            Box::new(HtmlAttribute::new("html:current-value", "current-value", "")),
            Box::new(HtmlAttribute::new("value", "value", "")),
            Box::new(HtmlAttribute::new("html:title", "title", Value::Null)),
            Box::new(HtmlAttribute::new("html:pattern", "pattern", Value::Null)),
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
            Box::new(HtmlAttributeChoice::new(
                "html:type",
                "type",
                &["text", "email", "password", "tel", "url", "date"],
                "text",
            )),
            Box::new(HtmlAttributeBoolean::new("html:hidden", "hidden", false)),
            Box::new(HtmlAttributeBoolean::new("html:disabled", "disabled", false)),
            Box::new(HtmlAttributeBoolean::new("html:readonly", "readOnly", false)),
            Box::new(HtmlAttributeBoolean::new("html:spellcheck", "spellcheck", false)),
            Box::new(HtmlAttributeMinMaxLength::new(
                "html:minlength",
                "html:maxlength",
                MAXLENGTH_FALLBACK,
            )),
            Box::new(StyleClass::new(&["u-text-field", "neutral"])),
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
                "change-button",
                button::NAME,
                vec![
                    ("uniface:icon".to_string(), Value::Text(String::new())),
                    ("uniface:icon-position".to_string(), Value::Text("end".to_string())),
                    ("value".to_string(), Value::Text("Change".to_string())),
                    ("classes:u-change-button".to_string(), Value::Bool(true)),
                    ("html:title".to_string(), Value::Text(String::new())),
                    ("html:appearance".to_string(), Value::Text(String::new())),
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
        UiBlocking::Disabled,
        ErrorDisplay::Properties,
    ));
}
