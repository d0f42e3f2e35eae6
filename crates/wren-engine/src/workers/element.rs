//! Layout worker.

use std::rc::Rc;

use tracing::trace;
use wren_dom::{DomTree, NodeId};

use crate::descriptor::DescriptorBuilder;
use crate::worker::{LayoutContext, Worker};

/// Builds one element of the widget layout and owns the workers that
/// operate on it.
///
/// Attribute and trigger defines receive this element's query selector at
/// construction, so they can resolve the live element relative to the
/// widget root at refresh time. Child defines keep selectors of their
/// own.
pub struct ElementWorker {
    tag_name: String,
    style_class: String,
    attributes: Vec<Rc<dyn Worker>>,
    children: Vec<Rc<dyn Worker>>,
    triggers: Vec<Rc<dyn Worker>>,
}

impl ElementWorker {
    /// Create a layout node.
    ///
    /// `query_selector` is how workers find this element back later; the
    /// empty string means the widget's own root element.
    pub fn new(
        tag_name: &str,
        style_class: &str,
        query_selector: &str,
        mut attributes: Vec<Box<dyn Worker>>,
        children: Vec<Box<dyn Worker>>,
        mut triggers: Vec<Box<dyn Worker>>,
    ) -> Self {
        for attribute in &mut attributes {
            attribute.set_element_query_selector(query_selector);
        }
        for trigger in &mut triggers {
            trigger.set_element_query_selector(query_selector);
        }
        Self {
            tag_name: tag_name.to_string(),
            style_class: style_class.to_string(),
            attributes: attributes.into_iter().map(Rc::from).collect(),
            children: children.into_iter().map(Rc::from).collect(),
            triggers: triggers.into_iter().map(Rc::from).collect(),
        }
    }
}

impl Worker for ElementWorker {
    fn declare(&self, _own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        // Depth-first: this element's attributes, then children, then
        // triggers. Registration order defines refresh order.
        for attribute in &self.attributes {
            attribute.declare(attribute, builder);
        }
        for child in &self.children {
            child.declare(child, builder);
        }
        for trigger in &self.triggers {
            trigger.declare(trigger, builder);
        }
    }

    fn layout(&self, dom: &mut DomTree, cx: &mut LayoutContext<'_>) -> Vec<NodeId> {
        trace!(target: "wren", tag = %self.tag_name, "layout");
        let element = dom.create_element(&self.tag_name);
        if !self.style_class.is_empty()
            && let Some(data) = dom.as_element_mut(element)
        {
            data.add_class(self.style_class.clone());
        }
        for child in &self.children {
            for node in child.layout(dom, cx) {
                dom.append_child(element, node);
            }
        }
        vec![element]
    }
}
