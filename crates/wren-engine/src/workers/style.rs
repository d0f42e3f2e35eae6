//! Bulk presentation workers: css class toggles and inline style.

use std::rc::Rc;

use tracing::trace;
use wren_common::logging::error_skipped;
use wren_common::{Value, to_boolean};

use crate::descriptor::DescriptorBuilder;
use crate::widget::WidgetInstance;
use crate::worker::{ElementTarget, UiContext, Worker, text_or_empty};

/// Applies the whole `classes` property sub-tree to its element: a
/// truthy value adds the class, anything else removes it.
pub struct StyleClass {
    default_classes: Vec<String>,
    target: ElementTarget,
}

impl StyleClass {
    /// Create a class worker with the given always-on default classes.
    pub fn new(default_classes: &[&str]) -> Self {
        Self {
            default_classes: default_classes.iter().map(|class| class.to_string()).collect(),
            target: ElementTarget::default(),
        }
    }
}

impl Worker for StyleClass {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter("classes", Rc::clone(own));
        for class in &self.default_classes {
            builder.register_default_value(&format!("classes:{class}"), Value::Bool(true));
        }
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", "StyleClass.refresh");
        let Some(element) = self.target.resolve(widget, ui.dom) else {
            error_skipped("StyleClass.refresh", "No element found", "Skipped");
            return;
        };
        let toggles: Vec<(String, bool)> = widget
            .data
            .classes
            .iter()
            .map(|(class, value)| (class.clone(), to_boolean(value)))
            .collect();
        if let Some(data) = ui.dom.as_element_mut(element) {
            for (class, on) in toggles {
                if on {
                    data.add_class(class);
                } else {
                    data.remove_class(&class);
                }
            }
        }
    }
}

/// Applies the whole `style` property sub-tree as inline style.
pub struct StyleProperty {
    default_name: String,
    default_value: Value,
    target: ElementTarget,
}

impl StyleProperty {
    /// Create a style worker with one default style property.
    pub fn new(name: &str, default_value: impl Into<Value>) -> Self {
        Self {
            default_name: name.to_string(),
            default_value: default_value.into(),
            target: ElementTarget::default(),
        }
    }
}

impl Worker for StyleProperty {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter("style", Rc::clone(own));
        builder.register_default_value(
            &format!("style:{}", self.default_name),
            self.default_value.clone(),
        );
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", "StyleProperty.refresh");
        let Some(element) = self.target.resolve(widget, ui.dom) else {
            error_skipped("StyleProperty.refresh", "No element found", "Skipped");
            return;
        };
        let styles: Vec<(String, String)> = widget
            .data
            .style
            .iter()
            .map(|(name, value)| (name.clone(), text_or_empty(value)))
            .collect();
        if let Some(data) = ui.dom.as_element_mut(element) {
            for (name, value) in styles {
                data.set_style(name, value);
            }
        }
    }
}
