//! Event descriptors.
//!
//! The engine does not run an event loop of its own; the host dispatches
//! events into handlers the widgets returned at connect time. This module
//! provides the event value those handlers receive and the well-known
//! event names of the underlying components.

/// Well-known event names.
pub mod events {
    /// Control value committed.
    pub const CHANGE: &str = "change";
    /// Pointer activation.
    pub const CLICK: &str = "click";
    /// Key pressed while the control has focus.
    pub const KEYDOWN: &str = "keydown";
    /// Custom event fired when a widget changes its own value.
    pub const VALUE_CHANGE: &str = "valuechange";
}

/// One dispatched event.
#[derive(Debug, Clone)]
pub struct DomEvent {
    /// The event name (see [`events`]).
    pub name: String,
    default_prevented: bool,
}

impl DomEvent {
    /// Create an event with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_prevented: false,
        }
    }

    /// Suppress the component's default reaction to this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a handler suppressed the default reaction.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
