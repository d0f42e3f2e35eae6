//! Trigger mapping worker.

use std::rc::Rc;

use wren_common::logging::error_skipped;
use wren_dom::DomTree;

use crate::descriptor::DescriptorBuilder;
use crate::widget::WidgetInstance;
use crate::worker::{ElementTarget, TriggerMapping, Worker};

/// Maps a logical trigger name to a DOM event on the owning element.
pub struct TriggerWorker {
    trigger_name: String,
    event_name: String,
    validate: bool,
    target: ElementTarget,
}

impl TriggerWorker {
    /// Map `trigger_name` to `event_name`; `validate` tells the host to
    /// validate the widget before firing the trigger.
    pub fn new(trigger_name: &str, event_name: &str, validate: bool) -> Self {
        Self {
            trigger_name: trigger_name.to_string(),
            event_name: event_name.to_string(),
            validate,
            target: ElementTarget::default(),
        }
    }
}

impl Worker for TriggerWorker {
    fn set_element_query_selector(&mut self, selector: &str) {
        self.target.set_selector(selector);
    }

    fn declare(&self, own: &Rc<dyn Worker>, builder: &mut DescriptorBuilder) {
        builder.register_trigger(&self.trigger_name, Rc::clone(own));
    }

    fn trigger_mapping(&self, widget: &WidgetInstance, dom: &DomTree) -> Option<TriggerMapping> {
        match self.target.resolve(widget, dom) {
            Some(element) => Some(TriggerMapping {
                element,
                event_name: self.event_name.clone(),
                validate: self.validate,
            }),
            None => {
                error_skipped(
                    "TriggerWorker.trigger_mapping",
                    &format!("No element found for trigger '{}'", self.trigger_name),
                    "Skipped",
                );
                None
            }
        }
    }
}
