use pixmeta_core::{BatchEvent, BatchProgress, BatchScheduler, FileInput, FileOutcome};
use std::future::Future;
use tokio::sync::mpsc;

/// What a scan produced, up to completion or cancellation
#[derive(Debug)]
pub struct BatchRun {
    pub outcomes: Vec<FileOutcome>,
    pub progress: BatchProgress,
    pub cancelled: bool,
}

impl BatchRun {
    /// Fold one event in; `true` once the batch has finished
    fn apply(&mut self, event: BatchEvent) -> bool {
        match event {
            BatchEvent::Outcome { outcome, .. } => self.outcomes.push(outcome),
            BatchEvent::Progress(progress) => self.progress = progress,
            BatchEvent::Finished(progress) => {
                self.progress = progress;
                return true;
            }
            BatchEvent::Started { .. } => {}
        }
        false
    }
}

/// Run a batch to completion unless `cancel` resolves first.
///
/// `cancel` is polled for the whole run, so a signal raised between two
/// events still stops the batch. `on_event` sees every event of this
/// batch's generation before it is folded in.
pub async fn drive_batch<C, F>(
    scheduler: &BatchScheduler,
    files: Vec<FileInput>,
    cancel: C,
    mut on_event: F,
) -> BatchRun
where
    C: Future,
    F: FnMut(&BatchEvent),
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let total = files.len();
    let generation = scheduler.start(files, tx);

    let mut run = BatchRun {
        outcomes: Vec::with_capacity(total),
        progress: BatchProgress::new(generation, total),
        cancelled: false,
    };

    tokio::pin!(cancel);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(BatchEvent::Outcome { generation: g, .. }) if g != generation => {}
                Some(event) => {
                    on_event(&event);
                    if run.apply(event) {
                        break;
                    }
                }
                None => break,
            },
            _ = &mut cancel => {
                scheduler.cancel();
                run.cancelled = true;
                break;
            }
        }
    }

    run
}
