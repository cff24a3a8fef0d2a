use pixmeta_core::{BatchProgress, FileOutcome, OutcomeStatus};
use pixmeta_formats::ImageMetadata;
use pixmeta_metrics::CompressionReport;
use serde::Serialize;

/// JSON shape of one file's outcome
#[derive(Debug, Serialize)]
pub struct OutcomeRecord<'a> {
    pub name: &'a str,
    pub size_bytes: u64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a ImageMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpi: Option<(u32, u32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a CompressionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&'a FileOutcome> for OutcomeRecord<'a> {
    fn from(outcome: &'a FileOutcome) -> Self {
        let mut record = Self {
            name: &outcome.key.name,
            size_bytes: outcome.key.size,
            status: "inspected",
            metadata: None,
            dpi: None,
            report: None,
            error: None,
        };

        match &outcome.status {
            OutcomeStatus::Inspected(inspection) => {
                let resolution = inspection.metadata.effective_resolution();
                record.metadata = Some(&inspection.metadata);
                record.dpi = Some((resolution.horizontal(), resolution.vertical()));
                record.report = Some(&inspection.report);
            }
            OutcomeStatus::Failed(e) => {
                record.status = "failed";
                record.error = Some(e.to_string());
            }
            OutcomeStatus::Duplicate => record.status = "duplicate",
        }

        record
    }
}

/// JSON document printed by `scan --json`
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub generation: u64,
    pub total: usize,
    pub inspected: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub cancelled: bool,
    pub files: Vec<OutcomeRecord<'a>>,
}

impl<'a> ScanReport<'a> {
    pub fn new(outcomes: &'a [FileOutcome], progress: &BatchProgress, cancelled: bool) -> Self {
        Self {
            generation: progress.generation,
            total: progress.total,
            inspected: outcomes.iter().filter(|o| o.is_success()).count(),
            failed: progress.failed.len(),
            duplicates: progress.duplicates,
            cancelled,
            files: outcomes.iter().map(OutcomeRecord::from).collect(),
        }
    }
}
