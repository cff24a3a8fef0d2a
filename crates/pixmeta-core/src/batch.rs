use crate::inspector::{FileOutcome, Inspector};
use crate::session::BatchSession;
use crate::source::FileInput;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_CHUNK_SIZE: usize = 50;
pub const DEFAULT_CHUNK_PAUSE: Duration = Duration::from_millis(30);

/// Progress tracking for batch operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchProgress {
    pub generation: u64,
    pub completed: usize,
    pub total: usize,
    pub current_file: Option<String>,
    pub failed: Vec<(String, String)>, // (file name, error message)
    pub duplicates: usize,
}

impl BatchProgress {
    pub fn new(generation: u64, total: usize) -> Self {
        Self {
            generation,
            total,
            ..Self::default()
        }
    }

    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f32 / self.total as f32) * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Chunking of a batch
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Files inspected back to back before yielding
    pub chunk_size: usize,
    /// Pause between chunks so consumers can render
    pub chunk_pause: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_pause: DEFAULT_CHUNK_PAUSE,
        }
    }
}

/// Events emitted by a running batch, tagged with its generation
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started { generation: u64, total: usize },
    Outcome { generation: u64, outcome: FileOutcome },
    Progress(BatchProgress),
    Finished(BatchProgress),
}

/// Chunked batch runner with cancellation.
///
/// Only one batch is active at a time. Starting a new batch or cancelling
/// bumps the generation, aborts the old worker and resets the shared
/// session; anything the old worker still produces is discarded.
pub struct BatchScheduler {
    inspector: Arc<Inspector>,
    options: BatchOptions,
    session: Arc<Mutex<BatchSession>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BatchScheduler {
    pub fn new(inspector: Arc<Inspector>, options: BatchOptions) -> Self {
        let options = if options.chunk_size == 0 {
            BatchOptions {
                chunk_size: DEFAULT_CHUNK_SIZE,
                ..options
            }
        } else {
            options
        };

        tracing::info!(
            "BatchScheduler initialized with chunk_size={} pause={:?}",
            options.chunk_size,
            options.chunk_pause
        );

        Self {
            inspector,
            options,
            session: Arc::new(Mutex::new(BatchSession::default())),
            worker: Mutex::new(None),
        }
    }

    /// Replace the active batch and return its generation.
    ///
    /// Must be called from within a tokio runtime. Events go to `events`
    /// until the batch finishes or is superseded.
    pub fn start(&self, files: Vec<FileInput>, events: mpsc::UnboundedSender<BatchEvent>) -> u64 {
        let mut worker_slot = self.worker.lock();
        let generation = self.supersede(&mut worker_slot, files.len());
        tracing::info!("Starting batch {}: {} files", generation, files.len());

        let worker = BatchWorker {
            generation,
            inspector: Arc::clone(&self.inspector),
            options: self.options,
            session: Arc::clone(&self.session),
        };
        *worker_slot = Some(tokio::spawn(worker.run(files.into(), events)));

        generation
    }

    /// Abandon the active batch, if any, and clear all batch state
    pub fn cancel(&self) {
        let generation = self.supersede(&mut self.worker.lock(), 0);
        tracing::info!("Batch cancelled; now at generation {}", generation);
    }

    /// Current generation's progress
    pub fn progress(&self) -> BatchProgress {
        self.session.lock().progress().clone()
    }

    /// Convenience method: run a batch and collect its outcomes in order
    pub async fn run(&self, files: Vec<FileInput>) -> Vec<FileOutcome> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let generation = self.start(files, tx);

        let mut outcomes = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                BatchEvent::Outcome { generation: g, outcome } if g == generation => {
                    outcomes.push(outcome)
                }
                BatchEvent::Progress(progress) => tracing::debug!(
                    "Progress: {}/{} ({:.1}%)",
                    progress.completed,
                    progress.total,
                    progress.percentage()
                ),
                BatchEvent::Finished(_) => break,
                _ => {}
            }
        }

        outcomes
    }

    /// Abort the running worker and reset the session for a new generation.
    ///
    /// The caller holds the worker slot, so supersessions are serialized. The
    /// generation is allocated under the session lock; the last reset always
    /// carries the highest generation.
    fn supersede(&self, worker_slot: &mut Option<JoinHandle<()>>, total: usize) -> u64 {
        if let Some(handle) = worker_slot.take() {
            handle.abort();
        }

        let mut session = self.session.lock();
        let generation = session.generation() + 1;
        session.reset(generation, total);

        generation
    }
}

impl Drop for BatchScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.worker.get_mut().take() {
            handle.abort();
        }
    }
}

struct BatchWorker {
    generation: u64,
    inspector: Arc<Inspector>,
    options: BatchOptions,
    session: Arc<Mutex<BatchSession>>,
}

impl BatchWorker {
    async fn run(self, mut queue: VecDeque<FileInput>, events: mpsc::UnboundedSender<BatchEvent>) {
        let generation = self.generation;
        let _ = events.send(BatchEvent::Started {
            generation,
            total: queue.len(),
        });

        while !queue.is_empty() {
            let take = self.options.chunk_size.min(queue.len());

            for input in queue.drain(..take).collect::<Vec<_>>() {
                let key = input.key();

                // the session lock is never held across an await
                let Some(first_seen) = self.session.lock().admit(generation, &key) else {
                    return;
                };

                let outcome = if first_seen {
                    self.inspector.inspect(&input).await
                } else {
                    tracing::debug!("Skipping duplicate {} ({} bytes)", key.name, key.size);
                    FileOutcome::duplicate(key)
                };

                let Some(progress) = self.session.lock().record(generation, &outcome) else {
                    tracing::debug!("Dropping result of superseded batch {}", generation);
                    return;
                };

                let _ = events.send(BatchEvent::Outcome { generation, outcome });
                let _ = events.send(BatchEvent::Progress(progress));
            }

            if !queue.is_empty() {
                tokio::task::yield_now().await;
                if !self.options.chunk_pause.is_zero() {
                    tokio::time::sleep(self.options.chunk_pause).await;
                }
            }
        }

        let progress = {
            let session = self.session.lock();
            if !session.is_current(generation) {
                return;
            }
            session.progress().clone()
        };

        tracing::info!(
            "Batch {} complete: {}/{} inspected, {} failed, {} duplicates",
            generation,
            progress.completed - progress.failed.len() - progress.duplicates,
            progress.total,
            progress.failed.len(),
            progress.duplicates
        );
        let _ = events.send(BatchEvent::Finished(progress));
    }
}
