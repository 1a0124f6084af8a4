//! # Task Management System
//!
//! A small worker-thread pool for executing batched generation work off the
//! main thread. Each isolated generator context (terrain, geometry) gets
//! its own `TaskManager`; tasks flow to workers over mpsc channels and
//! results flow back the same way, so the two sides never share mutable
//! memory — buffers change hands by moving through the channel.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to worker channels round-robin
//! 3. Workers process one batch fully and send back the result
//! 4. The main loop collects results with `drain_completed()` and applies
//!    them; results may spawn follow-up tasks
//! 5. `process_queued_tasks()` flushes work that was queued while all
//!    workers were busy

pub mod task;

use log::{debug, info};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use task::{Task, TaskResult};

/// A communication channel between the main thread and a worker thread.
///
/// Each channel is backed by an OS thread that lives as long as the
/// manager; dropping the manager closes the task sender, which ends the
/// worker's receive loop.
struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Maximum number of tasks in flight per worker channel.
///
/// Held at 1 so a generator context always processes one batch fully
/// before starting the next, which keeps results arriving in request
/// order.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// Manages a pool of worker threads and coordinates task execution.
///
/// Tasks that cannot be dispatched immediately (all workers at their
/// in-flight limit) wait in a FIFO queue until `process_queued_tasks()`
/// finds a free channel.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

impl TaskManager {
    /// Creates a new `TaskManager` with the given number of worker
    /// threads.
    pub fn new(num_workers: usize) -> Self {
        info!(
            "spawning {} worker(s); available parallelism: {:?}",
            num_workers,
            thread::available_parallelism()
        );

        let mut channels = Vec::with_capacity(num_workers);
        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    if result_tx.send(task.process()).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel, returning the
    /// task on failure so it can be requeued.
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds a channel below its in-flight limit, round-robin from the
    /// last channel used.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }
        let start = self.current_channel;
        let mut current = start;
        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start {
                return None;
            }
        }
    }

    /// Publishes a task for execution.
    ///
    /// Returns `true` if the task was handed to a worker immediately,
    /// `false` if it was queued because every worker is at its in-flight
    /// limit. Fire-and-forget either way: results arrive later through
    /// `drain_completed()`.
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                debug!("all workers busy, queueing task");
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Dispatches queued tasks to any workers that have freed up. Call
    /// once per tick after draining results.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                return;
            };
            let task = self.queued_tasks.pop_front().unwrap();
            if let Err(task) = self.try_send_task(task, channel_idx) {
                // Channel is disconnected; put the task back and stop.
                self.queued_tasks.push_front(task);
                return;
            }
        }
    }

    /// Collects every completed result currently waiting on the channels.
    ///
    /// Non-blocking. The caller applies the results on the main thread and
    /// publishes whatever follow-up tasks they spawn.
    pub fn drain_completed(&mut self) -> Vec<Box<dyn TaskResult + Send>> {
        let mut results = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                results.push(result);
            }
        }
        results
    }

    /// Whether any task is currently queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty()
            && self
                .channels
                .iter()
                .all(|channel| channel.num_tasks_in_flight == 0)
    }
}
