//! Move-only unit-of-work hand-off for worker threads.
//!
//! Pipeline stages queue deferred work as [`Task`] values: each task
//! owns an argument-less callable together with everything it captured,
//! so buffers and handles travel through the queue by move rather than
//! by copy. A task can instead carry the stop sentinel, which is how a
//! producer tells a worker to shut down through the same queue that
//! carries its work, after everything queued before it has run.
//!
//! The whole shutdown handshake is the `bool` returned by
//! [`Task::invoke`]: `false` means "work done, keep looping", `true`
//! means "stop now". Workers need no side channel and no downcasts.

use alloc::boxed::Box;
use core::fmt;

enum Payload {
    /// An owned callable, run at most once.
    Work(Box<dyn FnOnce() + Send>),
    /// Tells the consuming worker to leave its loop.
    Stop,
}

/// A single queued unit of work, or the stop sentinel for a worker.
///
/// Tasks are move-only and invoked at most once; [`invoke`] consumes
/// the task, so running the same work twice is not expressible. A task
/// can also be empty, either freshly [`default`]-constructed or left
/// behind by [`take`]; invoking an empty task is a caller bug and
/// panics.
///
/// The typical consumer is a worker loop:
///
/// ```
/// use std::sync::mpsc;
/// use std::thread;
///
/// use geopipe_core::Task;
///
/// let (queue, incoming) = mpsc::channel::<Task>();
/// let worker = thread::spawn(move || {
///     let mut done = 0;
///     while let Ok(task) = incoming.recv() {
///         if task.invoke() {
///             break;
///         }
///         done += 1;
///     }
///     done
/// });
///
/// let buffer = vec![1u64, 2, 3];
/// queue.send(Task::new(move || drop(buffer))).unwrap();
/// queue.send(Task::stop()).unwrap();
/// assert_eq!(worker.join().unwrap(), 1);
/// ```
///
/// [`invoke`]: Task::invoke
/// [`default`]: Task::default
/// [`take`]: Task::take
pub struct Task {
    payload: Option<Payload>,
}

impl Task {
    /// Wraps a callable as a unit of work.
    ///
    /// The callable and its captures are owned by the task from here
    /// on; `Send` is required because tasks exist to cross thread
    /// boundaries.
    #[must_use]
    pub fn new<F>(work: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Task {
            payload: Some(Payload::Work(Box::new(work))),
        }
    }

    /// Creates the stop sentinel.
    #[must_use]
    pub fn stop() -> Self {
        Task {
            payload: Some(Payload::Stop),
        }
    }

    /// Runs the task and reports whether the worker should stop.
    ///
    /// Work tasks run their callable exactly once and return `false`.
    /// The stop sentinel does nothing and returns `true`. Any panic out
    /// of the callable propagates to the caller.
    ///
    /// # Panics
    ///
    /// Panics if the task is empty.
    #[track_caller]
    pub fn invoke(self) -> bool {
        match self.payload {
            Some(Payload::Work(work)) => {
                work();
                false
            }
            Some(Payload::Stop) => true,
            None => panic!("invoked an empty task"),
        }
    }

    /// Returns `true` if the task holds work or the stop sentinel.
    #[must_use]
    pub fn is_some(&self) -> bool {
        self.payload.is_some()
    }

    /// Returns `true` if the task is empty.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.payload.is_none()
    }

    /// Moves the payload out, leaving this task empty.
    pub fn take(&mut self) -> Task {
        Task {
            payload: self.payload.take(),
        }
    }
}

impl Default for Task {
    /// Creates an empty task, useful as a placeholder slot.
    fn default() -> Self {
        Task { payload: None }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(Payload::Work(_)) => f.write_str("Task(work)"),
            Some(Payload::Stop) => f.write_str("Task(stop)"),
            None => f.write_str("Task(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::panic::{self, AssertUnwindSafe};

    use super::*;

    #[test]
    fn work_runs_once_and_keeps_the_worker_going() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let task = Task::new(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        assert!(!task.invoke());
        assert_eq!(runs.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn stop_signals_without_side_effects() {
        assert!(Task::stop().invoke());
    }

    #[test]
    fn owns_move_only_payloads() {
        struct Buffer(Vec<u64>);

        let buffer = Buffer(vec![1, 2, 3]);
        let consumed = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&consumed);
        let task = Task::new(move || {
            sink.store(buffer.0.len(), Ordering::Relaxed);
        });

        assert!(!task.invoke());
        assert_eq!(consumed.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn reports_its_shape() {
        let mut task = Task::new(|| {});
        assert!(task.is_some());
        assert!(Task::stop().is_some());
        assert!(Task::default().is_none());

        let moved = task.take();
        assert!(task.is_none());
        assert!(moved.is_some());
        assert!(!moved.invoke());
    }

    #[test]
    #[should_panic(expected = "invoked an empty task")]
    fn invoking_an_empty_task_panics() {
        Task::default().invoke();
    }

    #[test]
    fn panics_from_work_reach_the_invoker() {
        let task = Task::new(|| panic!("tile decode failed"));
        let result = panic::catch_unwind(AssertUnwindSafe(|| task.invoke()));
        assert!(result.is_err());
    }

    #[test]
    fn tasks_cross_thread_boundaries() {
        fn assert_send<T: Send>() {}
        assert_send::<Task>();
    }
}
