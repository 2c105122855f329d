use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::tabulate::SummaryTable;
use crate::types::{OfficerRankingRow, SubcategoryExportRow, SummaryStats};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table};
use tracing::{error, info};

const VALUE_HEADERS: [&str; 4] = ["Open", "Resolved", "Grand Total", "% Closure"];

/// Write a summary table with its group key as the leading column(s).
pub fn write_summary_csv<W: Write>(writer: W, table: &SummaryTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header: Vec<&str> = table.index_header();
    header.extend(VALUE_HEADERS);
    wtr.write_record(&header)?;
    for row in table.rows() {
        let mut record = row.key.clone();
        record.push(row.open.to_string());
        record.push(row.resolved.to_string());
        record.push(row.grand_total.to_string());
        record.push(row.closure_pct.to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write serializable rows, header taken from the field names.
pub fn write_rows_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_summary(path: &Path, table: &SummaryTable) -> Result<()> {
    write_summary_csv(File::create(path)?, table)?;
    info!(path = %path.display(), rows = table.groups.len() + 1, "exported summary");
    Ok(())
}

pub fn export_subcategories(path: &Path, rows: &[SubcategoryExportRow]) -> Result<()> {
    write_rows_csv(File::create(path)?, rows)?;
    info!(path = %path.display(), rows = rows.len(), "exported subcategory breakdown");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    info!(path = %path.display(), "wrote summary json");
    Ok(())
}

/// Files written and files that failed, in export order.
#[derive(Debug, Default)]
pub struct ExportOutcome {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, DashboardError)>,
}

impl ExportOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, path: PathBuf, result: Result<()>) {
        match result {
            Ok(()) => self.written.push(path),
            Err(e) => {
                error!(path = %path.display(), "export failed: {}", e);
                self.failed.push((path, e));
            }
        }
    }
}

/// Write both CSV exports and the JSON summary. Each file is attempted
/// even when an earlier one fails.
pub fn export_reports(
    config: &DashboardConfig,
    summary: &SummaryTable,
    subcategories: &[SubcategoryExportRow],
    stats: &SummaryStats,
) -> ExportOutcome {
    let mut outcome = ExportOutcome::default();
    let path = config.summary_csv_path();
    outcome.record(path.clone(), export_summary(&path, summary));
    let path = config.subcategories_csv_path();
    outcome.record(path.clone(), export_subcategories(&path, subcategories));
    let path = config.summary_json_path();
    outcome.record(path.clone(), write_json(&path, stats));
    outcome
}

/// Markdown rendering of a summary table, truncated to `max_rows` group
/// rows. The total row is always shown.
pub fn render_summary(table: &SummaryTable, max_rows: usize) -> String {
    let mut builder = Builder::default();
    let mut header: Vec<String> = table.index_header().iter().map(|h| h.to_string()).collect();
    header.extend(VALUE_HEADERS.iter().map(|h| h.to_string()));
    builder.push_record(header);
    for row in table.groups.iter().take(max_rows).chain(std::iter::once(&table.total)) {
        let mut record = row.key.clone();
        record.push(row.open.to_string());
        record.push(row.resolved.to_string());
        record.push(row.grand_total.to_string());
        record.push(format!("{}%", row.closure_pct));
        builder.push_record(record);
    }
    builder.build().with(Style::markdown()).to_string()
}

pub fn render_officers(rows: &[OfficerRankingRow], max_rows: usize) -> String {
    let slice: Vec<OfficerRankingRow> = rows.iter().take(max_rows).cloned().collect();
    Table::new(slice).with(Style::markdown()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabulate::{tabulate, Dimension, GroupBy, RecordFilter};
    use crate::types::{ClosurePct, MainCategory};

    fn summary() -> SummaryTable {
        let records = crate::classify::derive_table(&[
            crate::types::Record {
                subcategory: Some("Pothole".to_string()),
                status: Some("Open".to_string()),
                assignee: None,
                zone: None,
                extra: vec![],
            },
            crate::types::Record {
                subcategory: Some("Pothole".to_string()),
                status: Some("Resolved".to_string()),
                assignee: None,
                zone: None,
                extra: vec![],
            },
        ]);
        let by_category = GroupBy::One(Dimension::MainCategory);
        tabulate(&records, by_category, &RecordFilter::all(), "TOTAL").unwrap()
    }

    #[test]
    fn summary_csv_has_index_column_first() {
        let mut buf = Vec::new();
        write_summary_csv(&mut buf, &summary()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "MainCategory,Open,Resolved,Grand Total,% Closure\n\
             Engineering,1,1,2,50.0\n\
             TOTAL,1,1,2,50.0\n"
        );
    }

    #[test]
    fn rows_csv_header_comes_from_field_names() {
        let rows = vec![SubcategoryExportRow {
            subcategory: "Pothole".to_string(),
            open: 2,
            resolved: 1,
            grand_total: 3,
            closure_pct: ClosurePct::from_counts(1, 3),
            main_category: MainCategory::Engineering,
        }];
        let mut buf = Vec::new();
        write_rows_csv(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Subcategory,Open,Resolved,Grand Total,% Closure,MainCategory")
        );
        assert_eq!(lines.next(), Some("Pothole,2,1,3,33.3,Engineering"));
    }

    #[test]
    fn export_reports_writes_all_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::default().with_export_dir(dir.path());
        let table = summary();
        let stats = crate::reports::generate_summary(&[], Some(&table));
        let outcome = export_reports(&config, &table, &[], &stats);
        assert!(outcome.is_complete());
        assert_eq!(outcome.written.len(), 3);
        assert!(config.summary_csv_path().exists());
        assert!(config.subcategories_csv_path().exists());
        assert!(config.summary_json_path().exists());
    }

    #[test]
    fn export_reports_names_files_that_failed() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::default().with_export_dir(dir.path().join("missing"));
        let table = summary();
        let stats = crate::reports::generate_summary(&[], Some(&table));
        let outcome = export_reports(&config, &table, &[], &stats);
        assert!(!outcome.is_complete());
        assert!(outcome.written.is_empty());
        let failed: Vec<PathBuf> = outcome.failed.into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            failed,
            vec![
                config.summary_csv_path(),
                config.subcategories_csv_path(),
                config.summary_json_path()
            ]
        );
    }

    #[test]
    fn markdown_preview_keeps_total_row() {
        let out = render_summary(&summary(), 0);
        assert!(out.contains("TOTAL"));
        assert!(!out.contains("Engineering"));
        assert!(out.contains("50.0%"));
    }

    #[test]
    fn officer_preview_uses_ranking_headers() {
        let rows = vec![OfficerRankingRow {
            rank: 1,
            officer_name: "LMC-A".to_string(),
            open: 4,
            resolved: 1,
            total: 5,
            closure_pct: ClosurePct::from_counts(1, 5),
        }];
        let out = render_officers(&rows, 10);
        assert!(out.contains("Officer Name"));
        assert!(out.contains("Total"));
        assert!(out.contains("20.0"));
    }
}
