//! Background organizer runs for the terminal UI.
//!
//! The organizer blocks on filesystem calls, so the UI hands each run to a
//! dedicated thread and drains its events between redraws. At most one run is
//! active at a time.

use crate::file_organizer::{FileOrganizer, OrganizeError};
use crate::progress::{ProgressEvent, RunSummary};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

/// Messages sent from the worker thread to the UI thread.
#[derive(Debug)]
pub enum WorkerMessage {
    Event(ProgressEvent),
    Finished(Result<RunSummary, OrganizeError>),
    /// The worker thread went away without reporting a result.
    Aborted,
}

/// Whether an organizer run is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

impl RunState {
    /// Idle → Running. Returns `false`, changing nothing, if already running.
    pub fn start(&mut self) -> bool {
        if *self == RunState::Running {
            return false;
        }
        *self = RunState::Running;
        true
    }

    /// Running → Idle.
    pub fn complete(&mut self) {
        *self = RunState::Idle;
    }

    pub fn is_running(&self) -> bool {
        *self == RunState::Running
    }
}

/// Owns the run state and the channel to the current worker thread.
#[derive(Debug, Default)]
pub struct Worker {
    state: RunState,
    receiver: Option<Receiver<WorkerMessage>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Starts organizing `root` on a background thread.
    ///
    /// Returns `Ok(false)` without doing anything if a run is already active.
    ///
    /// # Errors
    ///
    /// Returns the error if the thread cannot be spawned; the state stays Idle.
    pub fn start(&mut self, organizer: FileOrganizer, root: PathBuf) -> io::Result<bool> {
        if !self.state.start() {
            return Ok(false);
        }

        let (sender, receiver) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("organizer".to_string())
            .spawn(move || {
                let events = sender.clone();
                let result = organizer.organize(&root, &mut |event: ProgressEvent| {
                    // The UI may already be gone; nothing left to report to
                    let _ = events.send(WorkerMessage::Event(event));
                });
                let _ = sender.send(WorkerMessage::Finished(result));
            });

        match spawned {
            Ok(handle) => {
                self.receiver = Some(receiver);
                self.handle = Some(handle);
                Ok(true)
            }
            Err(e) => {
                self.state.complete();
                Err(e)
            }
        }
    }

    /// Drains every message waiting on the channel without blocking.
    ///
    /// Once the run's result has been received the worker returns to Idle.
    pub fn poll(&mut self) -> Vec<WorkerMessage> {
        let mut messages = Vec::new();
        let Some(receiver) = &self.receiver else {
            return messages;
        };

        let mut done = false;
        loop {
            match receiver.try_recv() {
                Ok(message) => {
                    done = matches!(message, WorkerMessage::Finished(_));
                    messages.push(message);
                    if done {
                        break;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    messages.push(WorkerMessage::Aborted);
                    done = true;
                    break;
                }
            }
        }

        if done {
            self.finish();
        }
        messages
    }

    fn finish(&mut self) {
        self.receiver = None;
        if let Some(handle) = self.handle.take() {
            // The result is already in hand; a join error only means the thread
            // panicked after sending it
            let _ = handle.join();
        }
        self.state.complete();
    }
}
