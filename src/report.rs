/*!
 * Reporting functionality for repo-flattener
 *
 * Renders run summaries and dry-run previews as console tables using the
 * tabled library.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::stats::{estimate_tokens, format_file_size, format_number, FileStatistics, NO_EXTENSION};
use crate::types::FlattenReport;

/// Extensions shown individually in the breakdown before grouping into "Other"
const TOP_EXTENSIONS: usize = 10;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

impl SummaryRow {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// Everything shown after a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Output directory
    pub output_dir: PathBuf,
    /// Result of the flatten step
    pub report: FlattenReport,
    /// Wall time of the run
    pub duration: Duration,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Summary of a finished run
    pub fn run_report(&self, summary: &RunSummary) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.console_run_report(summary),
        }
    }

    /// Preview of what a run would process
    pub fn dry_run_report(&self, output_dir: &Path, stats: &FileStatistics) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.console_dry_run_report(output_dir, stats),
        }
    }

    fn style(table: &mut Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn console_run_report(&self, summary: &RunSummary) -> String {
        let report = &summary.report;
        let mut rows = vec![
            SummaryRow::new("📁 Output Directory", summary.output_dir.display().to_string()),
            SummaryRow::new("📄 Manifest", report.manifest_path.display().to_string()),
            SummaryRow::new("✅ Files Processed", format_number(report.success_count as u64)),
        ];
        if report.failure_count > 0 {
            rows.push(SummaryRow::new(
                "⚠️ Files Skipped",
                format_number(report.failure_count as u64),
            ));
        }
        rows.push(SummaryRow::new("📊 Total Size", format_file_size(report.bytes_processed)));
        rows.push(SummaryRow::new(
            "📦 LLM Tokens",
            format!(
                "~{} tokens (estimated)",
                format_number(estimate_tokens(report.bytes_processed))
            ),
        ));
        rows.push(SummaryRow::new(
            "⏱️ Process Time",
            format!("{:.4?}", summary.duration),
        ));

        let mut out = format!(
            "✅  FLATTENING COMPLETE\n{}",
            Self::style(&mut Table::new(rows))
        );

        if !report.failures.is_empty() {
            #[derive(Tabled)]
            struct FailureRow {
                #[tabled(rename = "File Path")]
                path: String,

                #[tabled(rename = "Error")]
                reason: String,
            }

            let rows = report.failures.iter().map(|f| FailureRow {
                path: f.path.to_string(),
                reason: f.reason.clone(),
            });
            out.push_str(&format!(
                "\n\n⚠️  SKIPPED FILES\n{}",
                Self::style(&mut Table::new(rows))
            ));
        }

        out
    }

    fn console_dry_run_report(&self, output_dir: &Path, stats: &FileStatistics) -> String {
        let rows = vec![
            SummaryRow::new("📂 Repository Files", format_number(stats.total_files as u64)),
            SummaryRow::new("📁 Output Directory", output_dir.display().to_string()),
            SummaryRow::new("📊 Total Size", format_file_size(stats.total_size)),
            SummaryRow::new(
                "📦 LLM Tokens",
                format!("~{} tokens (estimated)", format_number(estimate_tokens(stats.total_size))),
            ),
        ];

        format!(
            "🔍  DRY RUN - No files will be modified\n{}\n\n📋  FILE TYPE BREAKDOWN\n{}\n\nTo proceed with processing, run without --dry-run",
            Self::style(&mut Table::new(rows)),
            self.extension_table(stats)
        )
    }

    fn extension_table(&self, stats: &FileStatistics) -> String {
        #[derive(Tabled)]
        struct ExtensionRow {
            #[tabled(rename = "Type")]
            ext: String,

            #[tabled(rename = "Files")]
            count: String,

            #[tabled(rename = "Share")]
            share: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        let share = |count: usize| {
            if stats.total_files == 0 {
                0.0
            } else {
                count as f64 / stats.total_files as f64 * 100.0
            }
        };

        let exts = stats.extensions_by_count();
        let mut rows: Vec<ExtensionRow> = exts
            .iter()
            .take(TOP_EXTENSIONS)
            .map(|(ext, ext_stats)| ExtensionRow {
                ext: if *ext == NO_EXTENSION {
                    "No extension".to_string()
                } else {
                    ext.to_string()
                },
                count: ext_stats.count.to_string(),
                share: format!("{:.1}%", share(ext_stats.count)),
                size: format_file_size(ext_stats.size),
            })
            .collect();

        if exts.len() > TOP_EXTENSIONS {
            let (count, size) = exts[TOP_EXTENSIONS..]
                .iter()
                .fold((0, 0), |(c, s), (_, e)| (c + e.count, s + e.size));
            rows.push(ExtensionRow {
                ext: "Other".to_string(),
                count: count.to_string(),
                share: format!("{:.1}%", share(count)),
                size: format_file_size(size),
            });
        }

        Self::style(&mut Table::new(rows))
    }
}
