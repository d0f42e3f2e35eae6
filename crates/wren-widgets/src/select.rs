//! Select widget.
//!
//! Wraps a `fluent-select` component. The valrep list projects into
//! option elements; the selected-value worker keeps the visible
//! selection in sync with the logical value, shows the placeholder for
//! empty values, and raises a format error when the value matches no
//! option. The wrapped component auto-selects a default option whenever
//! the assigned value matches none, so every refresh schedules a
//! reconciliation task that reasserts the logical value on the next
//! drain.

use std::rc::Rc;

use tracing::trace;
use wren_common::logging::error_skipped;
use wren_common::{Value, to_boolean};
use wren_dom::{DomTree, NodeId, events};

use wren_engine::workers::{
    DisplayFormat, ElementWorker, HtmlAttribute, HtmlAttributeBoolean, HtmlAttributeNumber,
    SlottedElementsByValRep, SlottedError, StyleClass, TriggerWorker, format_error_delta,
};
use wren_engine::{
    ClassRegistry, DescriptorBuilder, ElementTarget, ErrorDisplay, LayoutContext, UiBlocking,
    UiContext, ValueUpdater, WidgetClass, WidgetInstance, Worker,
};

/// The class name selects register under.
pub const NAME: &str = "wren.select";

/// The format-error message for a value no option can represent.
fn mismatch_message(format: DisplayFormat, value: &str) -> String {
    match format {
        DisplayFormat::Val => format!("Invalid value '{value}'"),
        DisplayFormat::Rep | DisplayFormat::ValRep => {
            format!("Unable to show representation of value '{value}'")
        }
    }
}

/// Private worker: the `readonly` property, which the wrapped component
/// does not support natively, becomes a css class.
struct ReadonlyClass {
    target: ElementTarget,
}

impl ReadonlyClass {
    fn new() -> Self {
        Self {
            target: ElementTarget::default(),
        }
    }
}

impl Worker for ReadonlyClass {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter("html:readonly", Rc::clone(own));
        builder.register_default_value("html:readonly", Value::Bool(false));
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        let Some(element) = self.target.resolve(widget, ui.dom) else {
            return;
        };
        let readonly = to_boolean(&widget.data.get_path("html:readonly"));
        if let Some(data) = ui.dom.as_element_mut(element) {
            if readonly {
                data.add_class("u-readonly");
            } else {
                data.remove_class("u-readonly");
            }
        }
    }
}

/// Private worker: the slotted selected-value element.
struct SelectedValue {
    target: ElementTarget,
}

impl SelectedValue {
    fn new() -> Self {
        Self {
            target: ElementTarget::new(".u-selected-value"),
        }
    }
}

impl Worker for SelectedValue {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter("value", Rc::clone(own));
        builder.register_default_value("value", Value::Null);
        builder.register_getter(Rc::clone(own));
        builder.register_setter("valrep", Rc::clone(own));
        builder.register_setter("uniface:display-format", Rc::clone(own));
        builder.register_setter("uniface:show-placeholder", Rc::clone(own));
        builder.register_default_value("uniface:show-placeholder", Value::Bool(false));
        builder.register_setter("uniface:placeholder-text", Rc::clone(own));
        builder.register_default_value("uniface:placeholder-text", Value::Text(String::new()));
    }

    fn layout(&self, dom: &mut DomTree, _cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        let element = dom.create_element("div");
        if let Some(data) = dom.as_element_mut(element) {
            data.add_class("u-selected-value");
        }
        vec![element]
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", "SelectedValue.refresh");
        let Some(root) = widget.root_element() else {
            return;
        };
        let Some(container) = self.target.resolve(widget, ui.dom) else {
            error_skipped(
                "SelectedValue.refresh",
                "No element found for styleClass 'u-selected-value'",
                "Skipped",
            );
            return;
        };
        let value = widget.data.value.clone();
        let value_text = match &value {
            Value::Null => String::new(),
            other => other.display_string(),
        };
        let show_placeholder = to_boolean(&widget.data.get_path("uniface:show-placeholder"));
        let placeholder = widget
            .data
            .get_path("uniface:placeholder-text")
            .as_text()
            .unwrap_or_default()
            .to_string();
        let format = DisplayFormat::of(widget);
        let representation = widget
            .data
            .valrep
            .iter()
            .find(|item| item.value == value_text)
            .map(|item| item.representation.clone());

        if let Some(data) = ui.dom.as_element_mut(container) {
            data.slot = "selected-value".to_string();
            data.remove_class("u-placeholder");
        }
        if value_text.is_empty() && show_placeholder {
            if let Some(data) = ui.dom.as_element_mut(container) {
                data.text = placeholder;
                data.add_class("u-placeholder");
            }
            widget.set_properties(&format_error_delta(false, ""), ui);
        } else if let Some(representation) = representation {
            let shown = match format {
                DisplayFormat::Rep => representation,
                DisplayFormat::Val => value_text.clone(),
                DisplayFormat::ValRep => format!("{representation} {value_text}"),
            };
            if let Some(data) = ui.dom.as_element_mut(container) {
                data.text = shown;
            }
            widget.set_properties(&format_error_delta(false, ""), ui);
        } else if value_text.is_empty() {
            if let Some(data) = ui.dom.as_element_mut(container) {
                data.text = String::new();
            }
            widget.set_properties(&format_error_delta(false, ""), ui);
        } else {
            // No option can represent the value: nothing selected, and
            // the format error names the offending value.
            if let Some(data) = ui.dom.as_element_mut(container) {
                data.text = String::new();
            }
            let message = mismatch_message(format, &value_text);
            widget.set_properties(&format_error_delta(true, &message), ui);
        }

        // The component will auto-select a default option when the value
        // matches none; reassert the logical value after it has done so.
        let logical = value.clone();
        ui.tasks.schedule(move |dom| {
            if dom.parent(root).is_some()
                && let Some(data) = dom.as_element_mut(root)
            {
                data.set_prop("value", logical);
            }
        });
    }

    fn value(&self, widget: &WidgetInstance, _dom: &DomTree) -> Value {
        widget.data.value.clone()
    }

    fn value_updaters(&self, widget: &WidgetInstance, dom: &DomTree) -> Vec<ValueUpdater> {
        match widget.root_element().filter(|root| dom.get(*root).is_some()) {
            Some(root) => vec![ValueUpdater {
                target: Vec::new(),
                element: root,
                event_name: events::CHANGE.to_string(),
                handler: Some(Rc::new(|widget, ui, _event| {
                    // The user picked an option: adopt the control value
                    // and drop any stale format error.
                    if let Some(root) = widget.root_element()
                        && let Some(value) = ui
                            .dom
                            .as_element(root)
                            .and_then(|data| data.prop("value").cloned())
                    {
                        widget.data.value = value;
                    }
                    widget.set_properties(&format_error_delta(false, ""), ui);
                })),
            }],
            None => Vec::new(),
        }
    }
}

/// Register the select widget class.
pub fn register(registry: &mut ClassRegistry) {
    let structure = ElementWorker::new(
        "fluent-select",
        "",
        "",
        vec![
            Box::new(StyleClass::new(&["u-select", "outline"])),
            Box::new(HtmlAttribute::new("html:title", "title", Value::Null)),
            Box::new(HtmlAttribute::fixed("role", "combobox")),
            Box::new(HtmlAttribute::fixed("ariaHaspopup", "listbox")),
            Box::new(HtmlAttributeBoolean::new("html:disabled", "disabled", false)),
            Box::new(ReadonlyClass::new()),
            Box::new(HtmlAttributeNumber::new(
                "html:tabindex",
                "tabIndex",
                Some(-1),
                None,
                Value::Null,
            )),
        ],
        vec![
            Box::new(SlottedElementsByValRep::new("fluent-option", "u-option", "")),
            Box::new(SelectedValue::new()),
            Box::new(SlottedError::new("span", "u-error-icon", ".u-error-icon", "")),
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
