//! The wren property-binding engine.
//!
//! A widget class is a *declarative configuration*: a structure tree of
//! layout nodes and [`worker::Worker`]s describing the element subtree to
//! build and which logical properties drive which elements. Compiling
//! the tree (see [`descriptor::WidgetClass::compile`]) collects every
//! worker's registrations into an explicit
//! [`descriptor::WidgetDescriptor`]; the [`widget::WidgetInstance`]
//! runtime then replays incoming property deltas through the registered
//! workers against the live element tree.
//!
//! # Lifecycle
//!
//! The host drives each widget through a fixed surface:
//! `process_layout` (class-level, builds the subtree) -> instance
//! construction -> `on_connect` (binds live elements, wires sub-widgets)
//! -> `data_init` (class defaults) -> any number of `data_update`s ->
//! `data_cleanup`. `get_value`, `validate`, `map_trigger`,
//! `show_error`/`hide_error` and `block_ui`/`unblock_ui` are available
//! once connected. After each update cycle the host drains
//! [`microtask::Microtasks`] to let controls reconcile deferred state.
//!
//! Nothing in the engine fails hard on bad host input: unsupported
//! properties, out-of-range values and unresolvable elements are
//! reported through `tracing` and skipped; value coercion failures
//! surface as the widget's format-error property pair.

pub mod data;
pub mod definition;
pub mod descriptor;
pub mod microtask;
pub mod registry;
pub mod widget;
pub mod worker;
pub mod workers;

pub use data::{PropDelta, PropertyStore};
pub use definition::{DefinitionsTable, MemoryDefinition, ObjectDefinition};
pub use descriptor::{
    DescriptorBuilder, ErrorDisplay, SetterMap, SubWidgetDef, UiBlocking, WidgetClass,
    WidgetDescriptor,
};
pub use microtask::Microtasks;
pub use registry::ClassRegistry;
pub use widget::{ROOT_ELEMENT, VALIDATION_ENVELOPE_ID, ValidationEnvelope, WidgetInstance};
pub use worker::{
    ElementTarget, EventHandler, LayoutContext, TriggerMapping, UiContext, ValueUpdater, Worker,
};
