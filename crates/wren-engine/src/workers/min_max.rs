//! Cooperating min/max attribute pairs.
//!
//! Both workers bind two logical properties at once and refresh them as a
//! unit, because the underlying control validates the pair together.
//! Like the single validated attributes, neither acts while the control
//! holds a non-empty value.

use std::rc::Rc;

use tracing::trace;
use wren_common::logging::{error_skipped, warn_ignored};
use wren_common::{PropPath, Value, to_boolean};
use wren_dom::NodeId;

use crate::descriptor::DescriptorBuilder;
use crate::widget::WidgetInstance;
use crate::worker::{ElementTarget, UiContext, Worker};

/// State key for the sticky "maxlength has ever been set" flag.
const MAXLENGTH_TOUCHED: &str = "maxlength-has-been-set";

fn bound_from(widget: &WidgetInstance, path: &PropPath) -> Option<i64> {
    widget.data.get(path).as_int()
}

fn apply_pair(
    ui: &mut UiContext<'_>,
    element: NodeId,
    names: (&str, &str),
    min: Option<i64>,
    max: Option<i64>,
) {
    let (min_attr, max_attr) = names;
    let Some(data) = ui.dom.as_element_mut(element) else {
        return;
    };
    match min {
        Some(value) => data.set_prop(min_attr, Value::Int(value)),
        None => data.remove_prop(min_attr),
    }
    match max {
        Some(value) => data.set_prop(max_attr, Value::Int(value)),
        None => data.remove_prop(max_attr),
    }
}

/// The `minlength`/`maxlength` pair.
///
/// A maximum of 0 means "no maximum". The underlying control cannot
/// truly unset `maxlength` once it has been set, so after the first
/// assignment an unset is approximated by substituting the configured
/// fallback maximum instead of removing the attribute; the sticky flag
/// lives in the widget instance's scratch state and survives data
/// re-initialization.
pub struct HtmlAttributeMinMaxLength {
    prop_min: String,
    prop_max: String,
    min_path: PropPath,
    max_path: PropPath,
    fallback_max: i64,
    target: ElementTarget,
}

impl HtmlAttributeMinMaxLength {
    /// Bind a min/max-length property pair. `fallback_max` substitutes
    /// for an unset maximum once `maxlength` has ever been set.
    pub fn new(prop_min: &str, prop_max: &str, fallback_max: i64) -> Self {
        Self {
            min_path: PropPath::parse(prop_min),
            max_path: PropPath::parse(prop_max),
            prop_min: prop_min.to_string(),
            prop_max: prop_max.to_string(),
            fallback_max,
            target: ElementTarget::default(),
        }
    }
}

impl Worker for HtmlAttributeMinMaxLength {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter(&self.prop_min, Rc::clone(own));
        builder.register_setter(&self.prop_max, Rc::clone(own));
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", props = %format!("{}/{}", self.prop_min, self.prop_max), "HtmlAttributeMinMaxLength.refresh");
        let Some(element) = self.target.resolve(widget, ui.dom) else {
            error_skipped(
                "HtmlAttributeMinMaxLength.refresh",
                &format!("No element found for property '{}'", self.prop_min),
                "Skipped",
            );
            return;
        };
        let live_value = ui
            .dom
            .as_element(element)
            .map(|data| data.live_value())
            .unwrap_or_default();
        if !live_value.is_empty() {
            warn_ignored(
                "HtmlAttributeMinMaxLength.refresh",
                &format!(
                    "Property '{}' or '{}' cannot be set if control-value is not \"\"",
                    self.prop_min, self.prop_max
                ),
                "Ignored",
            );
            return;
        }

        let min = bound_from(widget, &self.min_path);
        if let Some(value) = min
            && value < 0
        {
            warn_ignored(
                "HtmlAttributeMinMaxLength.refresh",
                &format!("Property '{}' is not a positive number", self.prop_min),
                "Ignored",
            );
            return;
        }
        let mut max = bound_from(widget, &self.max_path);
        if max == Some(0) {
            // Zero means no maximum length.
            max = None;
        }
        if let Some(value) = max
            && value < 0
        {
            warn_ignored(
                "HtmlAttributeMinMaxLength.refresh",
                &format!("Property '{}' is not a positive number", self.prop_max),
                "Ignored",
            );
            return;
        }

        if max.is_some() {
            let _ = widget
                .state
                .insert(MAXLENGTH_TOUCHED.to_string(), Value::Bool(true));
        } else if to_boolean(&widget.state.get(MAXLENGTH_TOUCHED).cloned().unwrap_or_default()) {
            // The control forces a removed maxlength to 0; substitute the
            // fallback maximum instead.
            max = Some(self.fallback_max);
        }

        if let (Some(low), Some(high)) = (min, max)
            && low > high
        {
            warn_ignored(
                "HtmlAttributeMinMaxLength.refresh",
                &format!(
                    "Invalid combination of '{}' ({low}) and '{}' ({high})",
                    self.prop_min, self.prop_max
                ),
                "Ignored",
            );
            return;
        }
        apply_pair(ui, element, ("minlength", "maxlength"), min, max);
    }
}

/// The `min`/`max` pair for range-bearing controls.
pub struct HtmlAttributeMinMax {
    prop_min: String,
    prop_max: String,
    min_path: PropPath,
    max_path: PropPath,
    target: ElementTarget,
}

impl HtmlAttributeMinMax {
    /// Bind a min/max property pair.
    pub fn new(prop_min: &str, prop_max: &str) -> Self {
        Self {
            min_path: PropPath::parse(prop_min),
            max_path: PropPath::parse(prop_max),
            prop_min: prop_min.to_string(),
            prop_max: prop_max.to_string(),
            target: ElementTarget::default(),
        }
    }
}

impl Worker for HtmlAttributeMinMax {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter(&self.prop_min, Rc::clone(own));
        builder.register_setter(&self.prop_max, Rc::clone(own));
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", props = %format!("{}/{}", self.prop_min, self.prop_max), "HtmlAttributeMinMax.refresh");
        let Some(element) = self.target.resolve(widget, ui.dom) else {
            error_skipped(
                "HtmlAttributeMinMax.refresh",
                &format!("No element found for property '{}'", self.prop_min),
                "Skipped",
            );
            return;
        };
        let live_value = ui
            .dom
            .as_element(element)
            .map(|data| data.live_value())
            .unwrap_or_default();
        if !live_value.is_empty() {
            warn_ignored(
                "HtmlAttributeMinMax.refresh",
                &format!(
                    "Property '{}' or '{}' cannot be set if control-value is not \"\"",
                    self.prop_min, self.prop_max
                ),
                "Ignored",
            );
            return;
        }

        let min = bound_from(widget, &self.min_path);
        let max = bound_from(widget, &self.max_path);
        if let (Some(low), Some(high)) = (min, max)
            && low > high
        {
            warn_ignored(
                "HtmlAttributeMinMax.refresh",
                &format!(
                    "Invalid combination of '{}' ({low}) and '{}' ({high})",
                    self.prop_min, self.prop_max
                ),
                "Ignored",
            );
            return;
        }
        apply_pair(ui, element, ("min", "max"), min, max);
    }
}
