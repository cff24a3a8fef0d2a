pub mod batch;
pub mod inspector;
pub mod session;
pub mod source;

pub use batch::{BatchEvent, BatchOptions, BatchProgress, BatchScheduler};
pub use inspector::{FileOutcome, Inspection, Inspector, OutcomeStatus};
pub use session::BatchSession;
pub use source::{FileInput, FileKey};
