pub mod report;

pub use report::{Classification, CompressionMetrics, CompressionReport, MetricsCalculator};
