//! Post-update reconciliation queue.
//!
//! Some wrapped components asynchronously normalize their own state after
//! a value assignment (e.g. auto-selecting a default option when the
//! assigned value matches none). The engine overrides that normalization
//! on the next microtask boundary by scheduling a task that reasserts the
//! intended state. On a real page this is `queueMicrotask`; here it is an
//! explicit FIFO drained by the host after each update cycle.
//!
//! Tasks are fire-and-forget with no cancellation. Because the queue is
//! FIFO, a rapid sequence of overrides converges to the last scheduled
//! value. Tasks should check the target element still exists before
//! touching it.

use std::collections::VecDeque;

use wren_dom::DomTree;

/// A deferred, single-shot reconciliation step.
pub type Microtask = Box<dyn FnOnce(&mut DomTree)>;

/// FIFO queue of deferred reconciliation tasks.
#[derive(Default)]
pub struct Microtasks {
    queue: VecDeque<Microtask>,
}

impl Microtasks {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task to run on the next drain.
    pub fn schedule(&mut self, task: impl FnOnce(&mut DomTree) + 'static) {
        self.queue.push_back(Box::new(task));
    }

    /// Whether any tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Run all pending tasks in FIFO order. Returns how many ran.
    pub fn run(&mut self, dom: &mut DomTree) -> usize {
        let mut ran = 0;
        while let Some(task) = self.queue.pop_front() {
            task(dom);
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_is_last_write_wins() {
        let mut dom = DomTree::new();
        let element = dom.create_element("fluent-select");
        let mut tasks = Microtasks::new();
        for value in ["first", "second", "last"] {
            tasks.schedule(move |dom| {
                if let Some(data) = dom.as_element_mut(element) {
                    data.set_attr("current-value", value);
                }
            });
        }
        assert_eq!(tasks.run(&mut dom), 3);
        assert!(tasks.is_empty());
        assert_eq!(dom.as_element(element).unwrap().attr("current-value"), Some("last"));
    }

    #[test]
    fn tasks_scheduled_during_drain_still_run() {
        let mut dom = DomTree::new();
        let mut tasks = Microtasks::new();
        // A task cannot re-schedule into the same queue it runs from (it
        // only sees the tree), so chaining is exercised via two drains.
        tasks.schedule(|_| {});
        assert_eq!(tasks.run(&mut dom), 1);
        tasks.schedule(|_| {});
        tasks.schedule(|_| {});
        assert_eq!(tasks.run(&mut dom), 2);
    }
}
