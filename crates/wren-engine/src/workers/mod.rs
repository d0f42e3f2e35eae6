//! The engine's worker catalog.
//!
//! Each worker kind is a small type implementing [`crate::worker::Worker`],
//! selected by construction in a widget's structure tree:
//!
//! - [`ElementWorker`] - layout nodes
//! - attribute workers - one logical property to one element
//!   attribute/property, with per-variant coercion and validation
//! - min/max pairs - two cooperating bound properties
//! - slot workers - auxiliary slotted content (icon/text, error icon)
//! - sub-widget workers - nested widget lifecycles
//! - valrep workers - option-list projection
//! - style workers - bulk css class / inline style application
//! - trigger workers - logical trigger to DOM event mapping

mod attribute;
mod element;
mod min_max;
mod slotted;
mod style;
mod sub_widget;
mod trigger;
mod valrep;

pub use attribute::{
    HtmlAttribute, HtmlAttributeBoolean, HtmlAttributeChoice, HtmlAttributeNumber,
    HtmlValueAttributeBoolean,
};
pub use element::ElementWorker;
pub use min_max::{HtmlAttributeMinMax, HtmlAttributeMinMaxLength};
pub use slotted::{SlottedElement, SlottedError};
pub use style::{StyleClass, StyleProperty};
pub use sub_widget::{
    SlottedWidget, SlottedWidgetsByProperty, WidgetsByProperty, sub_widget_style_class,
};
pub use trigger::TriggerWorker;
pub use valrep::{DisplayFormat, SlottedElementsByValRep};

use crate::data::PropDelta;

/// Delta activating or clearing the format-error property pair.
///
/// This is how a value worker converts a strict-coercion failure into
/// user-visible state: it never lets the error escape the refresh.
pub fn format_error_delta(active: bool, message: &str) -> PropDelta {
    PropDelta::new()
        .with("uniface:format-error", active)
        .with("uniface:format-error-message", message)
}

/// Delta clearing the plain error property pair.
pub fn clear_error_delta() -> PropDelta {
    PropDelta::new()
        .with("uniface:error", false)
        .with("uniface:error-message", "")
}
