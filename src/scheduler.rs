//! Turn-based deferral of work.
//!
//! The runtime calls [`TurnScheduler::advance`] once per scheduling turn.
//! Work scheduled during a notification therefore runs after the runtime has
//! finished applying whatever caused the notification.

use standvault_core::SimTick;
use std::collections::VecDeque;

/// FIFO of tasks keyed by the turn they become due.
#[derive(Debug)]
pub struct TurnScheduler<T> {
    now: SimTick,
    queue: VecDeque<(SimTick, T)>,
}

impl<T> TurnScheduler<T> {
    /// Scheduler at [`SimTick::ZERO`].
    pub fn new() -> Self {
        Self {
            now: SimTick::ZERO,
            queue: VecDeque::new(),
        }
    }

    /// Current turn.
    pub fn now(&self) -> SimTick {
        self.now
    }

    /// Run `task` `delay` turns from now. A zero delay still waits for the
    /// next [`advance`](Self::advance).
    pub fn schedule(&mut self, delay: u64, task: T) {
        let due = self.now.advance(delay.max(1));
        // Keep the queue ordered by due turn, FIFO among equals.
        let position = self
            .queue
            .iter()
            .position(|(at, _)| *at > due)
            .unwrap_or(self.queue.len());
        self.queue.insert(position, (due, task));
    }

    /// Move to the next turn and return the tasks that became due, in order.
    pub fn advance(&mut self) -> Vec<T> {
        self.now = self.now.advance(1);
        let mut due = Vec::new();
        while self.queue.front().is_some_and(|(at, _)| *at <= self.now) {
            if let Some((_, task)) = self.queue.pop_front() {
                due.push(task);
            }
        }
        due
    }

    /// Drop queued tasks that fail the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.queue.retain(|(_, task)| keep(task));
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop every queued task.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for TurnScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_wait_for_next_turn() {
        let mut scheduler = TurnScheduler::new();
        scheduler.schedule(0, "a");
        scheduler.schedule(1, "b");
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.advance(), vec!["a", "b"]);
        assert!(scheduler.advance().is_empty());
    }

    #[test]
    fn delayed_tasks_run_in_due_order() {
        let mut scheduler = TurnScheduler::new();
        scheduler.schedule(3, "late");
        scheduler.schedule(1, "early");
        scheduler.schedule(3, "late2");

        assert_eq!(scheduler.advance(), vec!["early"]);
        assert!(scheduler.advance().is_empty());
        assert_eq!(scheduler.advance(), vec!["late", "late2"]);
        assert_eq!(scheduler.now(), SimTick(3));
    }

    #[test]
    fn retain_drops_matching_tasks() {
        let mut scheduler = TurnScheduler::new();
        scheduler.schedule(1, 1);
        scheduler.schedule(1, 2);
        scheduler.retain(|task| *task != 1);
        assert_eq!(scheduler.advance(), vec![2]);
    }
}
