//! Manual Scheduler
//!
//! Virtual-time scheduler. The host advances the clock one tick at a time
//! and pops due tasks one by one, so a task cancelled by an earlier task in
//! the same tick never runs.

use std::collections::BTreeMap;

use crate::game::collaborators::{Scheduler, Task, TaskHandle};

#[derive(Clone, Debug)]
struct Scheduled {
    task: Task,
    due: u64,
    period: Option<u64>,
}

/// Tick-driven scheduler with no real clock.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now: u64,
    next_handle: u64,
    tasks: BTreeMap<TaskHandle, Scheduled>,
}

impl ManualScheduler {
    /// Create a scheduler at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock forward one tick.
    pub fn advance_clock(&mut self) {
        self.now += 1;
    }

    /// Remove and return the next due task, earliest first (ties by handle).
    ///
    /// Repeating tasks are re-armed before being returned, so cancelling
    /// them from inside their own run works.
    pub fn pop_due(&mut self) -> Option<(TaskHandle, Task)> {
        let handle = self
            .tasks
            .iter()
            .filter(|(_, scheduled)| scheduled.due <= self.now)
            .min_by_key(|(handle, scheduled)| (scheduled.due, **handle))
            .map(|(handle, _)| *handle)?;

        let scheduled = self.tasks.remove(&handle)?;
        let task = scheduled.task.clone();

        if let Some(period) = scheduled.period {
            self.tasks.insert(
                handle,
                Scheduled {
                    due: self.now + period,
                    ..scheduled
                },
            );
        }

        Some((handle, task))
    }

    /// Is `handle` still scheduled?
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.contains_key(&handle)
    }

    /// Number of scheduled tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of scheduled tasks matching `predicate`.
    pub fn count_where(&self, predicate: impl Fn(&Task) -> bool) -> usize {
        self.tasks.values().filter(|scheduled| predicate(&scheduled.task)).count()
    }

    fn insert(&mut self, task: Task, delay_ticks: u32, period: Option<u64>) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;

        // Zero delay still waits for the next tick
        let due = self.now + (delay_ticks as u64).max(1);
        self.tasks.insert(handle, Scheduled { task, due, period });
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(
        &mut self,
        task: Task,
        delay_ticks: u32,
        period_ticks: u32,
    ) -> TaskHandle {
        self.insert(task, delay_ticks, Some((period_ticks as u64).max(1)))
    }

    fn schedule_once(&mut self, task: Task, delay_ticks: u32) -> TaskHandle {
        self.insert(task, delay_ticks, None)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.tasks.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut ManualScheduler) -> Vec<(TaskHandle, Task)> {
        std::iter::from_fn(|| scheduler.pop_due()).collect()
    }

    #[test]
    fn test_zero_delay_runs_next_tick() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_once(Task::RoundTick, 0);

        assert!(drain(&mut scheduler).is_empty());

        scheduler.advance_clock();
        assert_eq!(drain(&mut scheduler), vec![(handle, Task::RoundTick)]);
        assert!(!scheduler.is_pending(handle));
    }

    #[test]
    fn test_repeating_task() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_repeating(Task::BreakTick, 0, 3);

        let mut fired_at = Vec::new();
        for _ in 0..10 {
            scheduler.advance_clock();
            if !drain(&mut scheduler).is_empty() {
                fired_at.push(scheduler.now());
            }
        }

        assert_eq!(fired_at, vec![1, 4, 7, 10]);
        assert!(scheduler.is_pending(handle));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_repeating(Task::RoundTick, 0, 1);

        scheduler.cancel(handle);
        scheduler.cancel(handle);
        scheduler.cancel(TaskHandle(999));

        scheduler.advance_clock();
        assert!(drain(&mut scheduler).is_empty());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_cancel_from_inside_run() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_repeating(Task::RoundTick, 0, 1);

        scheduler.advance_clock();
        let (popped, _) = scheduler.pop_due().unwrap();
        assert_eq!(popped, handle);

        // Re-armed, then cancelled by its own run
        assert!(scheduler.is_pending(handle));
        scheduler.cancel(handle);
        assert!(!scheduler.is_pending(handle));
    }

    #[test]
    fn test_due_order() {
        let mut scheduler = ManualScheduler::new();
        let late = scheduler.schedule_once(Task::BreakTick, 2);
        let early = scheduler.schedule_once(Task::RoundTick, 1);

        scheduler.advance_clock();
        scheduler.advance_clock();

        let order: Vec<_> = drain(&mut scheduler).into_iter().map(|(h, _)| h).collect();
        assert_eq!(order, vec![early, late]);
    }
}
