//! Attribute workers: one logical property driving one element
//! attribute/property, with per-variant coercion and validation.

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::trace;
use wren_common::logging::{error_skipped, warn_ignored};
use wren_common::{PropPath, Value, field_value_to_boolean, to_boolean};
use wren_dom::{DomTree, NodeId, events};

use crate::descriptor::DescriptorBuilder;
use crate::worker::{ElementTarget, UiContext, ValueUpdater, Worker, text_or_empty};
use crate::workers::{clear_error_delta, format_error_delta};
use crate::widget::WidgetInstance;

/// Attributes that participate in HTML5 validation. Changing one while
/// the control holds a non-empty value leaves the control's validation
/// state undefined, so such changes are refused.
const VALIDATED_ATTRIBUTES: [&str; 7] = [
    "readonly", "type", "pattern", "min", "max", "minlength", "maxlength",
];

/// Sequence for generated private property ids (fixed attributes that
/// need a default but are not host-settable).
static PRIVATE_PROP_SEQ: AtomicUsize = AtomicUsize::new(0);

/// The shared state of every attribute worker: the bound property path,
/// the target attribute, its default, and how to assign it.
pub(crate) struct AttributeBinding {
    prop_path: String,
    parsed: PropPath,
    attr_name: Option<String>,
    default_value: Value,
    set_as_attribute: bool,
    pub(crate) target: ElementTarget,
}

impl AttributeBinding {
    fn new(prop_path: Option<&str>, attr_name: Option<&str>, default_value: Value) -> Self {
        let prop_path = prop_path.map(str::to_string).unwrap_or_else(|| {
            format!("uniface:i{}", PRIVATE_PROP_SEQ.fetch_add(1, Ordering::Relaxed))
        });
        Self {
            parsed: PropPath::parse(&prop_path),
            prop_path,
            attr_name: attr_name.map(str::to_string),
            default_value,
            set_as_attribute: false,
            target: ElementTarget::default(),
        }
    }

    /// Register the setter, the default, and - for the `value` path -
    /// the getter. This single rule is how a widget's externally visible
    /// value gets wired without a second declaration.
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter(&self.prop_path, Rc::clone(own));
        builder.register_default_value(&self.prop_path, self.default_value.clone());
        if self.parsed == PropPath::Value {
            builder.register_getter(Rc::clone(own));
        }
    }

    fn current(&self, widget: &WidgetInstance) -> Value {
        widget.data.get(&self.parsed)
    }

    /// Assign the attribute on the element, honoring the validation
    /// guard and the null-removes-attribute rule. Assignment goes
    /// through the element's typed property surface unless the worker
    /// was configured for markup-attribute assignment.
    fn set_html_attribute(&self, dom: &mut DomTree, element: NodeId, value: Value) {
        let Some(attr_name) = &self.attr_name else {
            return;
        };
        let Some(data) = dom.as_element_mut(element) else {
            error_skipped(
                "AttributeBinding.set_html_attribute",
                &format!("No live element for property '{}'", self.prop_path),
                "Skipped",
            );
            return;
        };
        if VALIDATED_ATTRIBUTES.contains(&attr_name.as_str()) && !data.live_value().is_empty() {
            warn_ignored(
                "HtmlAttribute.refresh",
                &format!(
                    "Property '{}' influences HTML5 validation rules and cannot be set if control-value is not \"\"",
                    self.prop_path
                ),
                "Ignored",
            );
            return;
        }
        if attr_name == "innerText" {
            data.text = text_or_empty(&value);
            return;
        }
        if value.is_null() {
            if self.set_as_attribute {
                data.remove_attr(attr_name);
            } else {
                data.remove_prop(attr_name);
            }
        } else if self.set_as_attribute {
            data.set_attr(attr_name.clone(), text_or_empty(&value));
        } else {
            data.set_prop(attr_name.clone(), value);
        }
    }

    fn read_back(&self, widget: &WidgetInstance, dom: &DomTree) -> Value {
        let Some(attr_name) = &self.attr_name else {
            return Value::Null;
        };
        self.target
            .resolve(widget, dom)
            .and_then(|element| dom.as_element(element))
            .and_then(|data| data.prop(attr_name).cloned())
            .unwrap_or_default()
    }

    fn change_updater(&self, widget: &WidgetInstance, dom: &DomTree) -> Vec<ValueUpdater> {
        match self.target.resolve(widget, dom) {
            Some(element) => vec![ValueUpdater {
                target: Vec::new(),
                element,
                event_name: events::CHANGE.to_string(),
                handler: None,
            }],
            None => Vec::new(),
        }
    }
}

/// String attribute worker.
pub struct HtmlAttribute {
    binding: AttributeBinding,
}

impl HtmlAttribute {
    /// Bind a logical property to an element attribute.
    pub fn new(prop_path: &str, attr_name: &str, default_value: impl Into<Value>) -> Self {
        Self {
            binding: AttributeBinding::new(Some(prop_path), Some(attr_name), default_value.into()),
        }
    }

    /// A fixed attribute: not host-settable, applied from its default on
    /// every data init (a private property id is generated for it).
    pub fn fixed(attr_name: &str, default_value: impl Into<Value>) -> Self {
        Self {
            binding: AttributeBinding::new(None, Some(attr_name), default_value.into()),
        }
    }

    /// Assign through the markup attribute instead of the typed
    /// property.
    #[must_use]
    pub fn as_markup_attribute(mut self) -> Self {
        self.binding.set_as_attribute = true;
        self
    }
}

impl Worker for HtmlAttribute {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.binding.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        self.binding.declare(own, builder);
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", prop = %self.binding.prop_path, "HtmlAttribute.refresh");
        let Some(element) = self.binding.target.resolve(widget, ui.dom) else {
            error_skipped(
                "HtmlAttribute.refresh",
                &format!("No element found for property '{}'", self.binding.prop_path),
                "Skipped",
            );
            return;
        };
        let value = self.binding.current(widget);
        self.binding.set_html_attribute(ui.dom, element, value);
    }

    fn value(&self, widget: &WidgetInstance, dom: &DomTree) -> Value {
        self.binding.read_back(widget, dom)
    }

    fn value_updaters(&self, widget: &WidgetInstance, dom: &DomTree) -> Vec<ValueUpdater> {
        self.binding.change_updater(widget, dom)
    }
}

/// Integer attribute worker with inclusive bounds.
pub struct HtmlAttributeNumber {
    binding: AttributeBinding,
    min: Option<i64>,
    max: Option<i64>,
}

impl HtmlAttributeNumber {
    /// Bind a numeric logical property to an element attribute,
    /// enforcing inclusive `min`/`max` bounds.
    pub fn new(
        prop_path: &str,
        attr_name: &str,
        min: Option<i64>,
        max: Option<i64>,
        default_value: impl Into<Value>,
    ) -> Self {
        Self {
            binding: AttributeBinding::new(Some(prop_path), Some(attr_name), default_value.into()),
            min,
            max,
        }
    }
}

impl Worker for HtmlAttributeNumber {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.binding.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        self.binding.declare(own, builder);
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", prop = %self.binding.prop_path, "HtmlAttributeNumber.refresh");
        let Some(element) = self.binding.target.resolve(widget, ui.dom) else {
            error_skipped(
                "HtmlAttributeNumber.refresh",
                &format!("No element found for property '{}'", self.binding.prop_path),
                "Skipped",
            );
            return;
        };
        let value = self.binding.current(widget);
        if value.is_null() {
            self.binding.set_html_attribute(ui.dom, element, Value::Null);
            return;
        }
        let Some(number) = value.as_int() else {
            warn_ignored(
                "HtmlAttributeNumber.refresh",
                &format!(
                    "Property '{}' is not a number ({})",
                    self.binding.prop_path,
                    value.display_string()
                ),
                "Ignored",
            );
            return;
        };
        if let Some(min) = self.min
            && number < min
        {
            warn_ignored(
                "HtmlAttributeNumber.refresh",
                &format!("Property '{}' must be a number >= {min}", self.binding.prop_path),
                "Ignored",
            );
            return;
        }
        if let Some(max) = self.max
            && number > max
        {
            warn_ignored(
                "HtmlAttributeNumber.refresh",
                &format!("Property '{}' must be a number <= {max}", self.binding.prop_path),
                "Ignored",
            );
            return;
        }
        self.binding.set_html_attribute(ui.dom, element, Value::Int(number));
    }

    fn value(&self, widget: &WidgetInstance, dom: &DomTree) -> Value {
        self.binding.read_back(widget, dom)
    }

    fn value_updaters(&self, widget: &WidgetInstance, dom: &DomTree) -> Vec<ValueUpdater> {
        self.binding.change_updater(widget, dom)
    }
}

/// Attribute worker constrained to an explicit allow-list.
pub struct HtmlAttributeChoice {
    binding: AttributeBinding,
    choices: Vec<String>,
}

impl HtmlAttributeChoice {
    /// Bind a logical property to an attribute, accepting only the
    /// listed values.
    pub fn new(
        prop_path: &str,
        attr_name: &str,
        choices: &[&str],
        default_value: impl Into<Value>,
    ) -> Self {
        Self {
            binding: AttributeBinding::new(Some(prop_path), Some(attr_name), default_value.into()),
            choices: choices.iter().map(|choice| choice.to_string()).collect(),
        }
    }

    /// Assign through the markup attribute instead of the typed
    /// property.
    #[must_use]
    pub fn as_markup_attribute(mut self) -> Self {
        self.binding.set_as_attribute = true;
        self
    }
}

impl Worker for HtmlAttributeChoice {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.binding.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        self.binding.declare(own, builder);
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", prop = %self.binding.prop_path, "HtmlAttributeChoice.refresh");
        let Some(element) = self.binding.target.resolve(widget, ui.dom) else {
            error_skipped(
                "HtmlAttributeChoice.refresh",
                &format!("No element found for property '{}'", self.binding.prop_path),
                "Skipped",
            );
            return;
        };
        let value = self.binding.current(widget);
        let accepted = value
            .as_text()
            .is_some_and(|text| self.choices.iter().any(|choice| choice == text));
        if accepted {
            self.binding.set_html_attribute(ui.dom, element, value);
        } else {
            warn_ignored(
                "HtmlAttributeChoice.refresh",
                &format!(
                    "Property '{}' invalid value ({})",
                    self.binding.prop_path,
                    value.display_string()
                ),
                "Ignored",
            );
        }
    }

    fn value(&self, widget: &WidgetInstance, dom: &DomTree) -> Value {
        self.binding.read_back(widget, dom)
    }

    fn value_updaters(&self, widget: &WidgetInstance, dom: &DomTree) -> Vec<ValueUpdater> {
        self.binding.change_updater(widget, dom)
    }
}

/// Boolean presentation-flag worker: lenient coercion, direct property
/// assignment, never fails.
pub struct HtmlAttributeBoolean {
    binding: AttributeBinding,
}

impl HtmlAttributeBoolean {
    /// Bind a boolean logical property to an element property.
    pub fn new(prop_path: &str, attr_name: &str, default_value: impl Into<Value>) -> Self {
        Self {
            binding: AttributeBinding::new(Some(prop_path), Some(attr_name), default_value.into()),
        }
    }
}

impl Worker for HtmlAttributeBoolean {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.binding.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        self.binding.declare(own, builder);
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", prop = %self.binding.prop_path, "HtmlAttributeBoolean.refresh");
        let Some(attr_name) = self.binding.attr_name.clone() else {
            return;
        };
        let Some(element) = self.binding.target.resolve(widget, ui.dom) else {
            error_skipped(
                "HtmlAttributeBoolean.refresh",
                &format!("No element found for property '{}'", self.binding.prop_path),
                "Skipped",
            );
            return;
        };
        let flag = to_boolean(&self.binding.current(widget));
        if let Some(data) = ui.dom.as_element_mut(element) {
            data.set_prop(attr_name, Value::Bool(flag));
        }
    }

    fn value(&self, widget: &WidgetInstance, dom: &DomTree) -> Value {
        self.binding.read_back(widget, dom)
    }

    fn value_updaters(&self, widget: &WidgetInstance, dom: &DomTree) -> Vec<ValueUpdater> {
        self.binding.change_updater(widget, dom)
    }
}

/// Worker for the value-bearing boolean attribute of a control
/// (e.g. `checked`).
///
/// Uses the strict conversion: a value outside the canonical boolean
/// tokens activates the widget's format-error property pair and the
/// control falls back to an unchecked best-effort state. This is the
/// canonical "bad field value shows an inline format error, never
/// throws" pattern.
pub struct HtmlValueAttributeBoolean {
    binding: AttributeBinding,
}

impl HtmlValueAttributeBoolean {
    /// Bind the scalar value property to a boolean element property.
    pub fn new(prop_path: &str, attr_name: &str, default_value: impl Into<Value>) -> Self {
        Self {
            binding: AttributeBinding::new(Some(prop_path), Some(attr_name), default_value.into()),
        }
    }
}

impl Worker for HtmlValueAttributeBoolean {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.binding.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        self.binding.declare(own, builder);
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", prop = %self.binding.prop_path, "HtmlValueAttributeBoolean.refresh");
        let Some(element) = self.binding.target.resolve(widget, ui.dom) else {
            error_skipped(
                "HtmlValueAttributeBoolean.refresh",
                &format!("No element found for property '{}'", self.binding.prop_path),
                "Skipped",
            );
            return;
        };
        let value = self.binding.current(widget);
        match field_value_to_boolean(&value) {
            Ok(flag) => {
                self.binding.set_html_attribute(ui.dom, element, Value::Bool(flag));
                widget.set_properties(&format_error_delta(false, ""), ui);
            }
            Err(error) => {
                widget.set_properties(&format_error_delta(true, &error.message), ui);
                self.binding.set_html_attribute(ui.dom, element, Value::Bool(false));
            }
        }
    }

    fn value(&self, widget: &WidgetInstance, dom: &DomTree) -> Value {
        self.binding.read_back(widget, dom)
    }

    fn value_updaters(&self, widget: &WidgetInstance, dom: &DomTree) -> Vec<ValueUpdater> {
        match self.binding.target.resolve(widget, dom) {
            Some(element) => vec![ValueUpdater {
                target: Vec::new(),
                element,
                event_name: events::CHANGE.to_string(),
                handler: Some(Rc::new(|widget, ui, _event| {
                    // A user interaction produces a well-formed value, so
                    // both error pairs are stale now.
                    widget.set_properties(&format_error_delta(false, ""), ui);
                    widget.set_properties(&clear_error_delta(), ui);
                })),
            }],
            None => Vec::new(),
        }
    }
}
