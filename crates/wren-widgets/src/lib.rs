//! Built-in widget classes.
//!
//! Every widget here is a *declarative configuration* of the binding
//! engine: a structure tree of layout nodes and workers compiled into a
//! [`wren_engine::WidgetClass`]. A few widgets carry private workers of
//! their own (the tri-state checkbox value, the button text/icon pair,
//! the select selected-value projection), implemented against the same
//! [`wren_engine::Worker`] contract as the engine catalog.

pub mod button;
pub mod checkbox;
pub mod controlbar;
pub mod number_field;
pub mod select;
pub mod switch;
pub mod text_field;

use wren_engine::ClassRegistry;

/// Register every built-in widget class.
///
/// Order matters only in that compound widgets resolve their nested
/// classes at registration time, so leaves come first.
pub fn register_builtin(registry: &mut ClassRegistry) {
    button::register(registry);
    checkbox::register(registry);
    switch::register(registry);
    text_field::register(registry);
    number_field::register(registry);
    select::register(registry);
    controlbar::register(registry);
}
