use crate::batch::BatchProgress;
use crate::inspector::{FileOutcome, OutcomeStatus};
use crate::source::FileKey;
use std::collections::HashSet;

/// Mutable state of the active batch.
///
/// Every mutation names the generation it belongs to. Writes from a
/// superseded generation are refused, so an in-flight load from a cancelled
/// batch can never leak into the one that replaced it.
#[derive(Debug, Default)]
pub struct BatchSession {
    generation: u64,
    seen: HashSet<FileKey>,
    progress: BatchProgress,
}

impl BatchSession {
    /// Start over for a new generation
    pub fn reset(&mut self, generation: u64, total: usize) {
        self.generation = generation;
        self.seen.clear();
        self.progress = BatchProgress::new(generation, total);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Register a file about to be inspected.
    ///
    /// `Some(true)` for a first sighting, `Some(false)` for a duplicate and
    /// `None` once the generation has been superseded.
    pub fn admit(&mut self, generation: u64, key: &FileKey) -> Option<bool> {
        if !self.is_current(generation) {
            return None;
        }

        self.progress.current_file = Some(key.name.clone());
        Some(self.seen.insert(key.clone()))
    }

    /// Record a finished file and return the updated progress
    pub fn record(&mut self, generation: u64, outcome: &FileOutcome) -> Option<BatchProgress> {
        if !self.is_current(generation) {
            return None;
        }

        let progress = &mut self.progress;
        progress.completed += 1;
        progress.current_file = None;

        match &outcome.status {
            OutcomeStatus::Inspected(_) => {}
            OutcomeStatus::Failed(e) => progress.failed.push((outcome.key.name.clone(), e.to_string())),
            OutcomeStatus::Duplicate => progress.duplicates += 1,
        }

        Some(progress.clone())
    }

    pub fn progress(&self) -> &BatchProgress {
        &self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmeta_common::DecodeError;

    fn key(name: &str, size: u64) -> FileKey {
        FileKey {
            name: name.to_string(),
            size,
        }
    }

    #[test]
    fn test_duplicate_detection() {
        let mut session = BatchSession::default();
        session.reset(1, 3);

        assert_eq!(session.admit(1, &key("a.png", 10)), Some(true));
        assert_eq!(session.admit(1, &key("a.png", 10)), Some(false));
        // same name, different size: a different file
        assert_eq!(session.admit(1, &key("a.png", 11)), Some(true));
    }

    #[test]
    fn test_record_counts() {
        let mut session = BatchSession::default();
        session.reset(1, 3);

        session.record(1, &FileOutcome::duplicate(key("a.png", 1)));
        let progress = session
            .record(
                1,
                &FileOutcome {
                    key: key("b.xyz", 2),
                    status: OutcomeStatus::Failed(DecodeError::UnsupportedVariant("xyz".into())),
                },
            )
            .unwrap();

        assert_eq!(progress.completed, 2);
        assert_eq!(progress.duplicates, 1);
        assert_eq!(progress.failed.len(), 1);
        assert_eq!(progress.failed[0].0, "b.xyz");
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_stale_generation_is_refused() {
        let mut session = BatchSession::default();
        session.reset(1, 2);
        session.admit(1, &key("a.png", 1));

        session.reset(2, 1);

        assert_eq!(session.admit(1, &key("b.png", 1)), None);
        assert_eq!(session.record(1, &FileOutcome::duplicate(key("a.png", 1))), None);
        assert_eq!(session.progress().completed, 0);
        assert_eq!(session.progress().total, 1);

        // the reset forgot everything the old generation saw
        assert_eq!(session.admit(2, &key("a.png", 1)), Some(true));
    }
}
