//! Cooperative next-tick scheduler.
//!
//! Tasks are single-shot and cannot be cancelled. A tick runs the tasks that
//! were queued before it started; tasks queued while it runs wait for the
//! next tick.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::cell::RefCell;
use core::fmt;

type Task = Box<dyn FnOnce()>;

/// Queue of callbacks to run after the current pass.
#[derive(Default)]
pub struct TickQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl fmt::Debug for TickQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

impl TickQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` for the next tick.
    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    /// Number of tasks waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Runs the tasks queued so far and returns how many ran.
    pub fn run_tick(&self) -> usize {
        let batch = core::mem::take(&mut *self.tasks.borrow_mut());
        let count = batch.len();
        for task in batch {
            task();
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use super::*;

    #[test]
    fn tasks_queued_during_a_tick_wait_for_the_next() {
        let queue = Rc::new(TickQueue::new());
        let hits = Rc::new(Cell::new(0));

        let (inner_queue, inner_hits) = (Rc::clone(&queue), Rc::clone(&hits));
        queue.defer(move || {
            inner_hits.set(inner_hits.get() + 1);
            let hits = Rc::clone(&inner_hits);
            inner_queue.defer(move || hits.set(hits.get() + 10));
        });

        assert_eq!(queue.run_tick(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_tick(), 1);
        assert_eq!(hits.get(), 11);
        assert_eq!(queue.run_tick(), 0);
    }
}
