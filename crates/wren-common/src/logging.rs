//! Warning and error reporting.
//!
//! The engine never fails hard on bad host input; it reports what it
//! ignored and why, in a fixed `scope: message - consequence.` shape, and
//! carries on. Reports go through `tracing` so hosts can subscribe,
//! filter, or discard them.

use std::collections::HashSet;
use std::sync::Mutex;

/// Report a condition that caused an operation to be ignored.
pub fn warn_ignored(scope: &str, message: &str, consequence: &str) {
    tracing::warn!(target: "wren", "{scope}: {message} - {consequence}.");
}

/// Report a condition that caused an operation to be skipped entirely.
pub fn error_skipped(scope: &str, message: &str, consequence: &str) {
    tracing::error!(target: "wren", "{scope}: {message} - {consequence}.");
}

/// Global set of warnings already emitted (to deduplicate).
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a condition at most once per unique message.
///
/// Used where the same misconfiguration would otherwise be reported on
/// every layout pass (e.g. a widget class name missing from the registry).
///
/// # Panics
///
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(scope: &str, message: &str) {
    let key = format!("{scope}: {message}");
    let first = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);
    if first {
        tracing::warn!(target: "wren", "{scope}: {message}");
    }
}

/// Clear all recorded one-shot warnings (e.g. between test cases).
///
/// # Panics
///
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_once_deduplicates() {
        clear_warnings();
        warn_once("test", "same message");
        warn_once("test", "same message");
        let guard = WARNED.lock().unwrap();
        let set = guard.as_ref().expect("set initialized");
        assert!(set.contains("test: same message"));
        assert_eq!(
            set.iter().filter(|k| k.contains("same message")).count(),
            1
        );
    }
}
