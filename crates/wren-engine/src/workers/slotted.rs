//! Slotted content workers: auxiliary elements slotted into the wrapped
//! component.

use std::rc::Rc;

use tracing::trace;
use wren_common::logging::error_skipped;
use wren_common::{PropPath, Value, to_boolean};
use wren_dom::{DomTree, NodeId};

use crate::descriptor::DescriptorBuilder;
use crate::widget::WidgetInstance;
use crate::worker::{ElementTarget, LayoutContext, UiContext, Worker, content_of, text_or_empty};

/// Prefix of icon marker classes; cleared whenever the slot switches
/// away from the icon branch so stale markers never accumulate.
const ICON_MARKER: &str = "icon-font";

fn build_hidden_element(dom: &mut DomTree, tag: &str, style_class: &str) -> NodeId {
    let element = dom.create_element(tag);
    if let Some(data) = dom.as_element_mut(element) {
        data.hidden = true;
        if !style_class.is_empty() {
            data.add_class(style_class);
        }
    }
    element
}

/// Icon-or-text slot.
///
/// Shows an icon when the icon property is set, otherwise the text,
/// otherwise nothing. Whichever branch wins unhides the element and
/// assigns the configured slot; the empty state hides the element and
/// detaches it to the default slot so the component reserves no layout
/// space for it.
pub struct SlottedElement {
    tag_name: String,
    style_class: String,
    slot: String,
    target: ElementTarget,
    prop_text: Option<String>,
    prop_icon: Option<String>,
}

impl SlottedElement {
    /// A text-only slot (no icon property).
    pub fn text(tag: &str, style_class: &str, selector: &str, slot: &str, prop_text: &str) -> Self {
        Self {
            tag_name: tag.to_string(),
            style_class: style_class.to_string(),
            slot: slot.to_string(),
            target: ElementTarget::new(selector),
            prop_text: Some(prop_text.to_string()),
            prop_icon: None,
        }
    }

    /// A text+icon slot; the icon wins over the text.
    pub fn text_and_icon(
        tag: &str,
        style_class: &str,
        selector: &str,
        slot: &str,
        prop_text: &str,
        prop_icon: &str,
    ) -> Self {
        Self {
            prop_icon: Some(prop_icon.to_string()),
            ..Self::text(tag, style_class, selector, slot, prop_text)
        }
    }
}

impl Worker for SlottedElement {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        if let Some(prop_icon) = &self.prop_icon {
            builder.register_setter(prop_icon, Rc::clone(own));
            builder.register_default_value(prop_icon, Value::Null);
        }
        if let Some(prop_text) = &self.prop_text {
            builder.register_setter(prop_text, Rc::clone(own));
            builder.register_default_value(prop_text, Value::Null);
        }
    }

    fn layout(&self, dom: &mut DomTree, _cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        vec![build_hidden_element(dom, &self.tag_name, &self.style_class)]
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", style_class = %self.style_class, "SlottedElement.refresh");
        let Some(element) = self.target.resolve(widget, ui.dom) else {
            error_skipped(
                "SlottedElement.refresh",
                &format!("No element found for styleClass '{}'", self.style_class),
                "Skipped",
            );
            return;
        };
        let icon = self
            .prop_icon
            .as_ref()
            .and_then(|prop| content_of(&widget.data.get(&PropPath::parse(prop))));
        let text = self
            .prop_text
            .as_ref()
            .and_then(|prop| content_of(&widget.data.get(&PropPath::parse(prop))));
        let Some(data) = ui.dom.as_element_mut(element) else {
            return;
        };
        data.remove_classes_where(|class| class.starts_with(ICON_MARKER));
        if let Some(icon) = icon {
            data.hidden = false;
            data.slot = self.slot.clone();
            data.add_class(ICON_MARKER);
            data.add_class(format!("{ICON_MARKER}--{icon}"));
            data.text = String::new();
        } else if let Some(text) = text {
            data.hidden = false;
            data.slot = self.slot.clone();
            data.text = text;
        } else {
            data.hidden = true;
            // Force to the default slot to avoid reserved paddings and
            // margins in the component.
            data.slot = String::new();
            data.text = String::new();
        }
    }
}

/// Error slot.
///
/// Driven by two independent boolean/message pairs: `uniface:error`
/// (host validation error) and `uniface:format-error` (value coercion
/// failure), the latter taking priority. Each state toggles its own
/// class on the widget root and shows a shared icon element whose title
/// carries the message.
pub struct SlottedError {
    tag_name: String,
    style_class: String,
    slot: String,
    target: ElementTarget,
}

impl SlottedError {
    /// Create an error slot.
    pub fn new(tag: &str, style_class: &str, selector: &str, slot: &str) -> Self {
        Self {
            tag_name: tag.to_string(),
            style_class: style_class.to_string(),
            slot: slot.to_string(),
            target: ElementTarget::new(selector),
        }
    }

    /// The slot name this error icon occupies when shown.
    pub fn slot_name(&self) -> &str {
        &self.slot
    }

    /// Register the four error-pair setters for `own`.
    pub fn declare_error_props(own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        for prop in [
            "uniface:error",
            "uniface:error-message",
            "uniface:format-error",
            "uniface:format-error-message",
        ] {
            builder.register_setter(prop, Rc::clone(own));
        }
    }

    /// Apply the current error state; reused by composing workers.
    pub fn apply(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        let Some(root) = widget.root_element() else {
            return;
        };
        let Some(icon) = self.target.resolve(widget, ui.dom) else {
            error_skipped(
                "SlottedError.refresh",
                &format!("No element found for styleClass '{}'", self.style_class),
                "Ignored",
            );
            return;
        };
        let error = to_boolean(&widget.data.get_path("uniface:error"));
        let error_message = text_or_empty(&widget.data.get_path("uniface:error-message"));
        let format_error = to_boolean(&widget.data.get_path("uniface:format-error"));
        let format_error_message =
            text_or_empty(&widget.data.get_path("uniface:format-error-message"));

        if format_error {
            if let Some(data) = ui.dom.as_element_mut(root) {
                data.add_class("u-format-invalid");
                data.remove_class("u-invalid");
            }
            self.show_icon(ui.dom, icon, &format_error_message);
        } else if error {
            if let Some(data) = ui.dom.as_element_mut(root) {
                data.add_class("u-invalid");
                data.remove_class("u-format-invalid");
            }
            self.show_icon(ui.dom, icon, &error_message);
        } else {
            if let Some(data) = ui.dom.as_element_mut(root) {
                data.remove_class("u-invalid");
                data.remove_class("u-format-invalid");
            }
            if let Some(data) = ui.dom.as_element_mut(icon) {
                data.title = String::new();
                data.hidden = true;
                data.slot = String::new();
                data.remove_classes_where(|class| class.starts_with(ICON_MARKER));
            }
        }
    }

    fn show_icon(&self, dom: &mut DomTree, icon: NodeId, message: &str) {
        if let Some(data) = dom.as_element_mut(icon) {
            data.title = message.to_string();
            data.hidden = false;
            data.slot = self.slot.clone();
            data.add_class(ICON_MARKER);
            data.add_class(format!("{ICON_MARKER}--alert"));
        }
    }
}

impl Worker for SlottedError {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        Self::declare_error_props(own, builder);
    }

    fn layout(&self, dom: &mut DomTree, _cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        vec![build_hidden_element(dom, &self.tag_name, &self.style_class)]
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", style_class = %self.style_class, "SlottedError.refresh");
        self.apply(widget, ui);
    }
}
