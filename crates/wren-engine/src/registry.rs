//! The widget class registry.
//!
//! An explicit name-to-class map. Widget catalogs register their classes
//! through a registration function at startup; nested-widget workers
//! resolve classes by name through the same map, failing soft (warn,
//! skip) when a name is absent.

use std::collections::BTreeMap;
use std::rc::Rc;

use wren_common::logging::warn_once;

use crate::descriptor::WidgetClass;

/// Name-to-class registry.
#[derive(Default)]
pub struct ClassRegistry {
    classes: BTreeMap<String, Rc<WidgetClass>>,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class under its own name. Re-registration replaces.
    pub fn add(&mut self, class: Rc<WidgetClass>) {
        let _ = self.classes.insert(class.name.clone(), class);
    }

    /// Look up a class by name.
    ///
    /// A miss is reported once per name; callers are expected to skip
    /// the dependent work rather than fail.
    pub fn get(&self, name: &str) -> Option<Rc<WidgetClass>> {
        let found = self.classes.get(name).cloned();
        if found.is_none() {
            warn_once(
                "ClassRegistry.get",
                &format!("Widget class with name '{name}' is not registered"),
            );
        }
        found
    }

    /// Whether a class name is registered (no miss reporting).
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// The registered class names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }
}
