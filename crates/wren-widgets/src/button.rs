//! Button widget.
//!
//! Wraps a `fluent-button` component. The text and icon slots cooperate:
//! the icon moves to the configured position next to the text, or takes
//! the default slot alone when there is no text (an icon-only button
//! must not reserve a labeled slot). Buttons have no error affordance;
//! host errors are logged only.

use std::rc::Rc;

use tracing::trace;
use wren_common::Value;
use wren_common::logging::error_skipped;
use wren_dom::{DomTree, NodeId};

use wren_engine::workers::{
    ElementWorker, HtmlAttribute, HtmlAttributeBoolean, HtmlAttributeChoice, HtmlAttributeNumber,
    StyleClass, TriggerWorker,
};
use wren_engine::{
    ClassRegistry, DescriptorBuilder, ElementTarget, ErrorDisplay, LayoutContext, UiBlocking,
    UiContext, WidgetClass, WidgetInstance, Worker,
};

/// The class name buttons register under.
pub const NAME: &str = "wren.button";

const ICON_MARKER: &str = "icon-font";

/// The icon position to use: the configured `uniface:icon-position` when
/// valid, the class default otherwise.
fn icon_position(widget: &WidgetInstance) -> String {
    let configured = widget.data.get_path("uniface:icon-position");
    match configured.as_text() {
        Some(position @ ("start" | "end")) => position.to_string(),
        _ => widget
            .class()
            .descriptor
            .defaults
            .uniface
            .get("icon-position")
            .and_then(|value| value.as_text())
            .unwrap_or("start")
            .to_string(),
    }
}

fn content(value: &Value) -> Option<String> {
    match value.as_text() {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => None,
    }
}

fn build_span(dom: &mut DomTree, style_class: &str) -> NodeId {
    let element = dom.create_element("span");
    if let Some(data) = dom.as_element_mut(element) {
        data.add_class(style_class);
    }
    element
}

/// Private worker: the slotted button text, which is also the button's
/// value.
struct ButtonText {
    target: ElementTarget,
    icon_target: ElementTarget,
}

impl ButtonText {
    fn new() -> Self {
        Self {
            target: ElementTarget::new(".u-text"),
            icon_target: ElementTarget::new(".u-icon"),
        }
    }
}

impl Worker for ButtonText {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter("value", Rc::clone(own));
        builder.register_getter(Rc::clone(own));
        builder.register_default_value("value", Value::Text(String::new()));
    }

    fn layout(&self, dom: &mut DomTree, _cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        vec![build_span(dom, "u-text")]
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", "ButtonText.refresh");
        let Some(element) = self.target.resolve(widget, ui.dom) else {
            error_skipped("ButtonText.refresh", "No element found for styleClass 'u-text'", "Skipped");
            return;
        };
        let text = content(&widget.data.value);
        let icon = content(&widget.data.get_path("uniface:icon"));
        let position = icon_position(widget);
        let icon_element = self.icon_target.resolve(widget, ui.dom);
        if let Some(data) = ui.dom.as_element_mut(element) {
            match &text {
                Some(text) => {
                    data.hidden = false;
                    data.text = text.clone();
                }
                None => {
                    data.hidden = true;
                    data.text = String::new();
                }
            }
        }
        // The icon slot depends on whether there is text next to it: an
        // icon-only button renders the icon in the default slot.
        if icon.is_some()
            && let Some(icon_element) = icon_element
            && let Some(data) = ui.dom.as_element_mut(icon_element)
        {
            data.slot = if text.is_some() { position } else { String::new() };
        }
    }

    fn value(&self, widget: &WidgetInstance, _dom: &DomTree) -> Value {
        widget.data.value.clone()
    }
}

/// Private worker: the slotted button icon.
struct ButtonIcon {
    target: ElementTarget,
}

impl ButtonIcon {
    fn new() -> Self {
        Self {
            target: ElementTarget::new(".u-icon"),
        }
    }
}

impl Worker for ButtonIcon {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter("uniface:icon", Rc::clone(own));
        builder.register_setter("uniface:icon-position", Rc::clone(own));
        builder.register_default_value("uniface:icon", Value::Text(String::new()));
        builder.register_default_value("uniface:icon-position", Value::Text("start".to_string()));
    }

    fn layout(&self, dom: &mut DomTree, _cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        vec![build_span(dom, "u-icon")]
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", "ButtonIcon.refresh");
        let Some(element) = self.target.resolve(widget, ui.dom) else {
            error_skipped("ButtonIcon.refresh", "No element found for styleClass 'u-icon'", "Skipped");
            return;
        };
        let icon = content(&widget.data.get_path("uniface:icon"));
        let text = content(&widget.data.value);
        let position = icon_position(widget);
        if let Some(data) = ui.dom.as_element_mut(element) {
            data.remove_classes_where(|class| class.starts_with(ICON_MARKER));
            match icon {
                Some(icon) => {
                    data.hidden = false;
                    data.add_class(ICON_MARKER);
                    data.add_class(format!("{ICON_MARKER}--{icon}"));
                    data.slot = if text.is_some() { position } else { String::new() };
                }
                None => {
                    data.hidden = true;
                    data.slot = String::new();
                }
            }
        }
    }
}

/// Register the button widget class.
pub fn register(registry: &mut ClassRegistry) {
    let structure = ElementWorker::new(
        "fluent-button",
        "",
        "",
        vec![
            Box::new(HtmlAttribute::new("html:current-value", "currentValue", "")),
            Box::new(HtmlAttribute::new("html:title", "title", Value::Null)),
            Box::new(HtmlAttributeNumber::new(
                "html:tabindex",
                "tabIndex",
                Some(-1),
                None,
                0,
            )),
            Box::new(HtmlAttributeChoice::new(
                "html:appearance",
                "appearance",
                &["neutral", "accent", "outline", "lightweight", "stealth"],
                "neutral",
            )),
            Box::new(HtmlAttributeBoolean::new("html:hidden", "hidden", false)),
            Box::new(HtmlAttributeBoolean::new("html:disabled", "disabled", false)),
            Box::new(StyleClass::new(&["u-button", "neutral"])),
        ],
        vec![Box::new(ButtonIcon::new()), Box::new(ButtonText::new())],
        vec![Box::new(TriggerWorker::new("detail", "click", true))],
    );
    registry.add(WidgetClass::compile(
        NAME,
        Rc::new(structure),
        UiBlocking::Disabled,
        ErrorDisplay::LogOnly,
    ));
}
