//! Valrep projection worker.

use std::rc::Rc;
use std::str::FromStr;

use strum_macros::{Display, EnumString};
use tracing::trace;
use wren_common::Value;
use wren_common::logging::error_skipped;
use wren_dom::{DomTree, NodeId};

use crate::descriptor::DescriptorBuilder;
use crate::widget::WidgetInstance;
use crate::worker::{ElementTarget, UiContext, Worker};

/// How an option renders its valrep item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DisplayFormat {
    /// Representation only.
    #[default]
    Rep,
    /// Value only.
    Val,
    /// Representation followed by the value.
    ValRep,
}

impl DisplayFormat {
    /// Read the display format from a widget's property state,
    /// defaulting on anything unrecognized.
    pub fn of(widget: &WidgetInstance) -> Self {
        widget
            .data
            .get_path("uniface:display-format")
            .as_text()
            .and_then(|text| Self::from_str(text).ok())
            .unwrap_or_default()
    }
}

/// Projects the valrep list as one option element per item.
///
/// Options are fully rebuilt on every refresh: stale option elements are
/// detached first, so repeated refreshes with the same state produce the
/// same children.
pub struct SlottedElementsByValRep {
    tag_name: String,
    style_class: String,
    target: ElementTarget,
}

impl SlottedElementsByValRep {
    /// Create an option projector; `selector` locates the container the
    /// options are appended to (empty = widget root).
    pub fn new(tag: &str, style_class: &str, selector: &str) -> Self {
        Self {
            tag_name: tag.to_string(),
            style_class: style_class.to_string(),
            target: ElementTarget::new(selector),
        }
    }

    fn remove_options(&self, dom: &mut DomTree, container: NodeId) {
        let stale: Vec<NodeId> = dom
            .children(container)
            .iter()
            .copied()
            .filter(|&child| {
                dom.as_element(child)
                    .is_some_and(|data| data.tag_name == self.tag_name)
            })
            .collect();
        for node in stale {
            dom.detach(node);
        }
    }

    fn append_span(&self, dom: &mut DomTree, option: NodeId, class: &str, text: String) {
        let span = dom.create_element("span");
        if let Some(data) = dom.as_element_mut(span) {
            data.add_class(class);
            data.text = text;
        }
        dom.append_child(option, span);
    }
}

impl Worker for SlottedElementsByValRep {
    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_setter("valrep", Rc::clone(own));
        builder.register_default_value("valrep", Value::ValRep(Vec::new()));
        builder.register_setter("uniface:display-format", Rc::clone(own));
        builder.register_default_value("uniface:display-format", Value::Text("rep".to_string()));
        builder.register_setter("value", Rc::clone(own));
        builder.register_default_value("value", Value::Null);
    }

    fn refresh(&self, widget: &mut WidgetInstance, ui: &mut UiContext<'_>) {
        trace!(target: "wren", "SlottedElementsByValRep.refresh");
        let Some(container) = self.target.resolve(widget, ui.dom) else {
            error_skipped(
                "SlottedElementsByValRep.refresh",
                &format!("No element found for styleClass '{}'", self.style_class),
                "Skipped",
            );
            return;
        };
        self.remove_options(ui.dom, container);
        let format = DisplayFormat::of(widget);
        for item in widget.data.valrep.clone() {
            let option = ui.dom.create_element(&self.tag_name);
            if let Some(data) = ui.dom.as_element_mut(option) {
                data.set_attr("value", item.value.clone());
                if !self.style_class.is_empty() {
                    data.add_class(self.style_class.clone());
                }
            }
            match format {
                DisplayFormat::Rep => {
                    self.append_span(ui.dom, option, "u-valrep-representation", item.representation);
                }
                DisplayFormat::Val => {
                    self.append_span(ui.dom, option, "u-valrep-value", item.value);
                }
                DisplayFormat::ValRep => {
                    self.append_span(
                        ui.dom,
                        option,
                        "u-valrep-representation",
                        item.representation,
                    );
                    let value = if item.value.is_empty() {
                        "null".to_string()
                    } else {
                        item.value
                    };
                    self.append_span(ui.dom, option, "u-valrep-value", value);
                }
            }
            ui.dom.append_child(container, option);
        }
    }
}
