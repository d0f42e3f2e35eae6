//! Switch widget.
//!
//! Wraps a `fluent-switch` component. The checked/unchecked message
//! slots double as error slots: while an error shows, the message
//! element sharing the slot is hidden and detached, and restored when
//! the error clears.

use std::rc::Rc;

use wren_common::to_boolean;
use wren_dom::{DomTree, NodeId, events};

use wren_engine::workers::{
    ElementWorker, HtmlAttribute, HtmlAttributeBoolean, HtmlAttributeNumber,
    HtmlValueAttributeBoolean, SlottedElement, SlottedError, StyleClass, TriggerWorker,
};
use wren_engine::{
    ClassRegistry, DescriptorBuilder, ElementTarget, ErrorDisplay, LayoutContext, UiBlocking,
    UiContext, WidgetClass, WidgetInstance, Worker,
};

/// The class name switches register under.
pub const NAME: &str = "wren.switch";

/// Private worker: an error slot that shares its slot with a message
/// element.
struct SwitchErrorSlot {
    inner: SlottedError,
    shared_target: ElementTarget,
}

impl SwitchErrorSlot {
    fn new(tag: &str, style_class: &str, selector: &str, slot: &str, shared_selector: &str) -> Self {
        Self {
            inner: SlottedError::new(tag, style_class, selector, slot),
            shared_target: ElementTarget::new(shared_selector),
        }
    }
}

impl Worker for SwitchErrorSlot {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        SlottedError::declare_error_props(own, builder);
    }

    fn layout(&self, dom: &mut DomTree, cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        self.inner.layout(dom, cx)
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        self.inner.apply(widget, ui);
        let showing = to_boolean(&widget.data.get_path("uniface:error"))
            || to_boolean(&widget.data.get_path("uniface:format-error"));
        if let Some(shared) = self.shared_target.resolve(widget, ui.dom)
            && let Some(data) = ui.dom.as_element_mut(shared)
        {
            if showing {
                data.slot = String::new();
                data.hidden = true;
            } else {
                data.slot = self.inner.slot_name().to_string();
                data.hidden = false;
            }
        }
    }
}

/// Register the switch widget class.
pub fn register(registry: &mut ClassRegistry) {
    let structure = ElementWorker::new(
        "fluent-switch",
        "",
        "",
        vec![
            Box::new(StyleClass::new(&["u-switch"])),
            Box::new(HtmlAttribute::new("html:role", "role", "switch")),
            Box::new(HtmlValueAttributeBoolean::new("value", "checked", false)),
            Box::new(HtmlAttribute::new("html:current-value", "currentValue", "on")),
            Box::new(HtmlAttributeBoolean::new("html:aria-checked", "ariaChecked", false)),
            Box::new(HtmlAttributeBoolean::new("html:aria-disabled", "ariaDisabled", false)),
            Box::new(HtmlAttributeBoolean::new("html:aria-readonly", "ariaReadOnly", false)),
            Box::new(HtmlAttributeBoolean::new(
                "html:current-checked",
                "currentChecked",
                false,
            )),
            Box::new(HtmlAttributeBoolean::new("html:readonly", "readOnly", false)),
            Box::new(HtmlAttributeBoolean::new("html:disabled", "disabled", false)),
            Box::new(HtmlAttributeBoolean::new("html:hidden", "hidden", false)),
            Box::new(HtmlAttributeNumber::new("html:tabindex", "tabIndex", Some(-1), None, 0)),
        ],
        vec![
            Box::new(SlottedElement::text(
                "span",
                "u-label-text",
                ".u-label-text",
                "",
                "uniface:label-text",
            )),
            Box::new(SlottedElement::text(
                "span",
                "u-checked-message",
                ".u-checked-message",
                "checked-message",
                "uniface:checked-message",
            )),
            Box::new(SlottedElement::text(
                "span",
                "u-unchecked-message",
                ".u-unchecked-message",
                "unchecked-message",
                "uniface:unchecked-message",
            )),
            Box::new(SwitchErrorSlot::new(
                "span",
                "u-error-icon-unchecked",
                ".u-error-icon-unchecked",
                "unchecked-message",
                ".u-unchecked-message",
            )),
            Box::new(SwitchErrorSlot::new(
                "span",
                "u-error-icon-checked",
                ".u-error-icon-checked",
                "checked-message",
                ".u-checked-message",
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
