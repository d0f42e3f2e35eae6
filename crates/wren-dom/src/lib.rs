//! Element tree substrate for the wren widget framework.
//!
//! Widgets built by the binding engine manipulate a live element tree:
//! they create elements, toggle attributes and css classes, assign typed
//! element properties, and locate parts of themselves back by css
//! selector. This crate provides that tree.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow
//! checker issues. Element state mirrors the surface the binding workers
//! drive on a real DOM element: string attributes vs. typed IDL-style
//! properties, a class list, an inline style map, and the
//! `hidden`/`slot`/`title` fields that slotted content management needs.

mod element;
mod event;
mod selector;
mod tree;

pub use element::ElementData;
pub use event::{DomEvent, events};
pub use selector::{Selector, SelectorError};
pub use tree::{Descendants, DomTree, Node, NodeId, NodeType};
