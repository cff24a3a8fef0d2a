use console::style;
use pixmeta_common::MediaFormat;
use pixmeta_core::{FileKey, FileOutcome, Inspection, OutcomeStatus};
use pixmeta_formats::ImageMetadata;
use pixmeta_metrics::{Classification, CompressionReport};

/// Output formatter with colored messages
pub struct OutputFormatter {
    colored: bool,
}

impl OutputFormatter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("{} {}", style("✓").green().bold(), message);
        } else {
            println!("[OK] {}", message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", style("✗").red().bold(), message);
        } else {
            eprintln!("[ERROR] {}", message);
        }
    }

    /// Print warning message
    pub fn warn(&self, message: &str) {
        if self.colored {
            println!("{} {}", style("⚠").yellow().bold(), message);
        } else {
            println!("[WARN] {}", message);
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("{} {}", style("ℹ").cyan(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    pub fn format_name(&self, name: &str) -> String {
        if self.colored {
            style(name).cyan().to_string()
        } else {
            name.to_string()
        }
    }

    /// Format file size
    pub fn format_size(&self, bytes: u64) -> String {
        let size_str = if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else if bytes < 1024 * 1024 * 1024 {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        } else {
            format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
        };

        if self.colored {
            style(size_str).yellow().to_string()
        } else {
            size_str
        }
    }

    /// Format compression ratio
    pub fn format_ratio(&self, ratio: f64, classification: Classification) -> String {
        let ratio_str = format!("{:.2}×", ratio);

        if !self.colored {
            return ratio_str;
        }

        match classification {
            Classification::Compressed if ratio > 10.0 => style(ratio_str).green().bold().to_string(),
            Classification::Compressed => style(ratio_str).green().to_string(),
            Classification::Unchanged => style(ratio_str).yellow().to_string(),
            Classification::Expanded => style(ratio_str).red().to_string(),
        }
    }

    /// Format media format
    pub fn format_format(&self, format: MediaFormat) -> String {
        if self.colored {
            style(format.to_string()).magenta().to_string()
        } else {
            format.to_string()
        }
    }

    pub fn format_dimensions(&self, metadata: &ImageMetadata) -> String {
        if metadata.dimensions_unknown {
            "?×?".to_string()
        } else {
            format!("{}×{}", metadata.width, metadata.height)
        }
    }

    pub fn format_depth(&self, metadata: &ImageMetadata) -> String {
        if metadata.depth_is_approximate {
            format!("~{} bpp", metadata.bits_per_pixel)
        } else {
            format!("{} bpp", metadata.bits_per_pixel)
        }
    }

    /// Stored vs raw size summary for one report
    pub fn format_report(&self, report: &CompressionReport) -> String {
        match report.metrics() {
            Some(m) => format!(
                "{} → {} raw, {} {} ({:+.1}%)",
                self.format_size(m.stored_size_bytes),
                self.format_size(m.raw_size_bytes),
                self.format_ratio(m.ratio, m.classification),
                classification_label(m.classification),
                m.savings_percent
            ),
            None => "no size data".to_string(),
        }
    }

    /// Print one table row for a batch outcome
    pub fn print_outcome(&self, outcome: &FileOutcome) {
        let name = self.format_name(&outcome.key.name);

        match &outcome.status {
            OutcomeStatus::Inspected(Inspection { metadata, report }) => self.success(&format!(
                "{} {} {} {} {} {} | {}",
                name,
                self.format_format(metadata.format),
                self.format_dimensions(metadata),
                metadata.effective_resolution(),
                self.format_depth(metadata),
                metadata.compression,
                self.format_report(report)
            )),
            OutcomeStatus::Failed(e) => self.error(&format!("{}: {}", name, e)),
            OutcomeStatus::Duplicate => self.warn(&format!("{}: duplicate, skipped", name)),
        }
    }

    /// Print the detailed block for a single file
    pub fn print_inspection(&self, key: &FileKey, inspection: &Inspection) {
        let metadata = &inspection.metadata;

        println!("{}", self.format_name(&key.name));
        println!("  Format:      {}", self.format_format(metadata.format));
        println!("  Dimensions:  {}", self.format_dimensions(metadata));
        match metadata.resolution {
            Some(resolution) => println!("  Resolution:  {}", resolution),
            None => println!("  Resolution:  {} (default)", metadata.effective_resolution()),
        }
        println!("  Depth:       {}", self.format_depth(metadata));
        if let Some(colors) = metadata.palette_colors {
            println!("  Palette:     {} colors", colors);
        }
        println!("  Compression: {}", metadata.compression);
        println!("  Stored size: {}", self.format_size(key.size));

        match inspection.report.metrics() {
            Some(m) => {
                println!("  Raw size:    {}", self.format_size(m.raw_size_bytes));
                println!(
                    "  Ratio:       {} ({})",
                    self.format_ratio(m.ratio, m.classification),
                    classification_label(m.classification)
                );
                println!("  Savings:     {:.1}%", m.savings_percent);
            }
            None => println!("  Raw size:    unknown"),
        }
    }

    /// Print batch summary
    pub fn print_batch_summary(&self, total: usize, inspected: usize, failed: usize, duplicates: usize) {
        println!();
        if self.colored {
            println!(
                "{} Total: {}, {} Inspected: {}, {} Failed: {}, {} Duplicates: {}",
                style("Summary:").bold(),
                total,
                style("✓").green(),
                inspected,
                style("✗").red(),
                failed,
                style("⚠").yellow(),
                duplicates
            );
        } else {
            println!(
                "Summary: Total: {}, Inspected: {}, Failed: {}, Duplicates: {}",
                total, inspected, failed, duplicates
            );
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

fn classification_label(classification: Classification) -> &'static str {
    match classification {
        Classification::Compressed => "compressed",
        Classification::Unchanged => "unchanged",
        Classification::Expanded => "expanded",
    }
}
