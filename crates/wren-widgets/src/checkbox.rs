//! Checkbox widget.
//!
//! Wraps a `fluent-checkbox` component. The value worker extends the
//! plain boolean value binding with tri-state support: the empty string
//! maps to the indeterminate state, and user interaction cycles
//! checked -> unchecked -> indeterminate when `uniface:tri-state` is on.

use std::rc::Rc;

use tracing::trace;
use wren_common::logging::error_skipped;
use wren_common::{Value, field_value_to_tristate, to_boolean};
use wren_dom::{DomTree, NodeId, events};

use wren_engine::workers::{
    ElementWorker, HtmlAttribute, HtmlAttributeBoolean, HtmlAttributeNumber, SlottedElement,
    SlottedError, StyleClass, TriggerWorker, clear_error_delta, format_error_delta,
};
use wren_engine::{
    ClassRegistry, DescriptorBuilder, ElementTarget, ErrorDisplay, UiBlocking, UiContext,
    ValueUpdater, WidgetClass, WidgetInstance, Worker,
};

/// The class name checkboxes register under.
pub const NAME: &str = "wren.checkbox";

/// Scratch-state key tracking the logical tri-state value currently
/// shown by the control.
const CURRENT_VALUE: &str = "tri-state-current";

fn apply_state(
    widget: &mut WidgetInstance,
    dom: &mut DomTree,
    element: NodeId,
    logical: Value,
    checked: bool,
    indeterminate: bool,
) {
    if let Some(data) = dom.as_element_mut(element) {
        data.set_prop("indeterminate", Value::Bool(indeterminate));
        data.set_prop("checked", Value::Bool(checked));
    }
    let _ = widget.state.insert(CURRENT_VALUE.to_string(), logical);
}

/// Cycle the checkbox on user interaction, honoring tri-state.
fn cycle_on_change(widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
    let Some(root) = widget.root_element() else {
        return;
    };
    let tri_state = to_boolean(&widget.data.get_path("uniface:tri-state"));
    let current = widget.state.get(CURRENT_VALUE).cloned().unwrap_or_default();
    let next = match current {
        Value::Bool(true) => Some(false),
        Value::Bool(false) => {
            if tri_state {
                None
            } else {
                Some(true)
            }
        }
        _ => Some(true),
    };
    let logical = match next {
        Some(flag) => Value::Bool(flag),
        None => Value::Null,
    };
    apply_state(widget, ui.dom, root, logical, next.unwrap_or(false), next.is_none());
}

/// Private worker: tri-state value binding onto the `checked` property.
struct TriStateValue {
    target: ElementTarget,
}

impl TriStateValue {
    fn new() -> Self {
        Self {
            target: ElementTarget::default(),
        }
    }
}

impl Worker for TriStateValue {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter("value", Rc::clone(own));
        builder.register_default_value("value", Value::Null);
        builder.register_getter(Rc::clone(own));
        builder.register_default_value("uniface:tri-state", Value::Bool(false));
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", "TriStateValue.refresh");
        let Some(element) = self.target.resolve(widget, ui.dom) else {
            error_skipped("TriStateValue.refresh", "No element found for value", "Skipped");
            return;
        };
        let value = widget.data.value.clone();
        match field_value_to_tristate(&value) {
            Ok(next) => {
                widget.set_properties(&format_error_delta(false, ""), ui);
                let logical = match next {
                    Some(flag) => Value::Bool(flag),
                    None => Value::Null,
                };
                if widget.state.get(CURRENT_VALUE) != Some(&logical) {
                    apply_state(
                        widget,
                        ui.dom,
                        element,
                        logical,
                        next.unwrap_or(false),
                        next.is_none(),
                    );
                }
            }
            Err(error) => {
                widget.set_properties(&format_error_delta(true, &error.message), ui);
                if widget.state.get(CURRENT_VALUE) != Some(&value) {
                    // Best effort: keep the control in a defined,
                    // unchecked state while the format error shows.
                    apply_state(widget, ui.dom, element, value, false, false);
                }
            }
        }
    }

    fn value(&self, widget: &WidgetInstance, dom: &DomTree) -> Value {
        let Some(element) = self.target.resolve(widget, dom) else {
            return Value::Null;
        };
        let Some(data) = dom.as_element(element) else {
            return Value::Null;
        };
        if to_boolean(&data.prop("indeterminate").cloned().unwrap_or_default()) {
            Value::Text(String::new())
        } else {
            data.prop("checked").cloned().unwrap_or(Value::Bool(false))
        }
    }

    fn value_updaters(&self, widget: &WidgetInstance, dom: &DomTree) -> Vec<ValueUpdater> {
        match self.target.resolve(widget, dom) {
            Some(element) => vec![ValueUpdater {
                target: Vec::new(),
                element,
                event_name: events::CHANGE.to_string(),
                handler: Some(Rc::new(|widget, ui, event| {
                    widget.set_properties(&format_error_delta(false, ""), ui);
                    widget.set_properties(&clear_error_delta(), ui);
                    event.prevent_default();
                    cycle_on_change(widget, ui);
                })),
            }],
            None => Vec::new(),
        }
    }
}

/// Register the checkbox widget class.
pub fn register(registry: &mut ClassRegistry) {
    let structure = ElementWorker::new(
        "fluent-checkbox",
        "",
        "",
        vec![
            Box::new(StyleClass::new(&["u-checkbox"])),
            Box::new(HtmlAttribute::new("html:role", "role", "checkbox")),
            Box::new(HtmlAttribute::new("html:title", "title", "")),
            Box::new(HtmlAttribute::new("html:current-value", "currentValue", "on")),
            Box::new(TriStateValue::new()),
            Box::new(HtmlAttributeBoolean::new("html:aria-checked", "ariaChecked", false)),
            Box::new(HtmlAttributeBoolean::new("html:aria-required", "ariaRequired", false)),
            Box::new(HtmlAttributeBoolean::new("html:aria-disabled", "ariaDisabled", false)),
            Box::new(HtmlAttributeBoolean::new("html:disabled", "disabled", false)),
            Box::new(HtmlAttributeBoolean::new("html:readonly", "readOnly", false)),
            Box::new(HtmlAttributeNumber::new("html:tabindex", "tabIndex", Some(-1), None, 0)),
            Box::new(HtmlAttributeBoolean::new(
                "html:current-checked",
                "currentChecked",
                false,
            )),
        ],
        vec![
            Box::new(SlottedElement::text(
                "span",
                "u-label-text",
                ".u-label-text",
                "",
                "uniface:label-text",
            )),
            Box::new(SlottedError::new("span", "u-error-icon", ".u-error-icon", "")),
        ],
        vec![Box::new(TriggerWorker::new("onchange", events::VALUE_CHANGE, true))],
    );
    registry.add(WidgetClass::compile(
        NAME,
        Rc::new(structure),
        UiBlocking::Readonly,
        ErrorDisplay::Properties,
    ));
}
