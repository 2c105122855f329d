use crate::tabulate::{rank_officers, tabulate, Dimension, GroupBy, RecordFilter, SummaryTable};
use crate::types::{
    ClosurePct, Department, DerivedRecord, GroupCount, MainCategory, OfficerRankingRow,
    SubcategoryExportRow, SummaryStats,
};
use std::collections::{BTreeMap, BTreeSet};

pub const TOTAL_LABEL: &str = "TOTAL";

/// Status counts per main category over the whole table.
pub fn generate_status_summary(data: &[DerivedRecord]) -> Option<SummaryTable> {
    tabulate(
        data,
        GroupBy::One(Dimension::MainCategory),
        &RecordFilter::all(),
        TOTAL_LABEL,
    )
}

pub fn generate_subcategory_summary(
    data: &[DerivedRecord],
    category: MainCategory,
) -> Option<SummaryTable> {
    tabulate(
        data,
        GroupBy::One(Dimension::Subcategory),
        &RecordFilter::all().category(category),
        &format!("{} Total", category),
    )
}

pub fn generate_zone_subcategory_summary(
    data: &[DerivedRecord],
    category: MainCategory,
    zone: &str,
) -> Option<SummaryTable> {
    tabulate(
        data,
        GroupBy::One(Dimension::Subcategory),
        &RecordFilter::all().category(category).zone(zone),
        &format!("{} - {} Total", category, zone),
    )
}

pub fn generate_department_summary(
    data: &[DerivedRecord],
    department: Department,
) -> Option<SummaryTable> {
    tabulate(
        data,
        GroupBy::One(Dimension::MainCategory),
        &RecordFilter::all().department(department),
        &format!("{} Total", department),
    )
}

/// LMC officers ranked by open tickets, optionally narrowed to a category
/// and/or zone.
pub fn generate_officer_performance(
    data: &[DerivedRecord],
    category: Option<MainCategory>,
    zone: Option<&str>,
) -> Option<OfficerRanking> {
    let mut filter = RecordFilter::all().department(Department::Lmc);
    filter.main_category = category;
    filter.zone = zone.map(str::to_string);
    rank_officers(data, &filter).map(|rows| OfficerRanking { rows })
}

pub fn generate_officer_performance_by_category(
    data: &[DerivedRecord],
    category: MainCategory,
) -> Option<OfficerRanking> {
    generate_officer_performance(data, Some(category), None)
}

pub fn generate_officer_performance_by_zone(
    data: &[DerivedRecord],
    zone: &str,
) -> Option<OfficerRanking> {
    generate_officer_performance(data, None, Some(zone))
}

pub fn generate_officer_performance_category_zone(
    data: &[DerivedRecord],
    category: MainCategory,
    zone: &str,
) -> Option<OfficerRanking> {
    generate_officer_performance(data, Some(category), Some(zone))
}

/// Ranked officer rows plus the roll-ups shown next to them.
#[derive(Debug, Clone, PartialEq)]
pub struct OfficerRanking {
    pub rows: Vec<OfficerRankingRow>,
}

impl OfficerRanking {
    pub fn total_open(&self) -> usize {
        self.rows.iter().map(|r| r.open).sum()
    }

    pub fn total_resolved(&self) -> usize {
        self.rows.iter().map(|r| r.resolved).sum()
    }

    pub fn active_officers(&self) -> usize {
        self.rows.len()
    }

    pub fn closure_pct(&self) -> ClosurePct {
        let total = self.rows.iter().map(|r| r.total).sum();
        ClosurePct::from_counts(self.total_resolved(), total)
    }
}

/// Every category's subcategory drill-down stacked into one flat table,
/// each block keeping its own total row.
pub fn generate_all_subcategory_summaries(
    data: &[DerivedRecord],
    categories: &[MainCategory],
) -> Vec<SubcategoryExportRow> {
    let mut out = Vec::new();
    for &category in categories {
        if let Some(table) = generate_subcategory_summary(data, category) {
            out.extend(export_rows(&table, category));
        }
    }
    out
}

/// One subcategory drill-down block, total row included, tagged with its
/// category.
pub fn export_rows(table: &SummaryTable, category: MainCategory) -> Vec<SubcategoryExportRow> {
    table
        .rows()
        .map(|row| SubcategoryExportRow {
            subcategory: row.label(),
            open: row.open,
            resolved: row.resolved,
            grand_total: row.grand_total,
            closure_pct: row.closure_pct,
            main_category: category,
        })
        .collect()
}

/// Main categories present in the table, ascending.
pub fn main_categories(data: &[DerivedRecord]) -> Vec<MainCategory> {
    let set: BTreeSet<MainCategory> = data.iter().map(|r| r.main_category).collect();
    set.into_iter().collect()
}

/// Record count per present main category, ascending; used for tab labels.
pub fn category_counts(data: &[DerivedRecord]) -> Vec<(MainCategory, usize)> {
    let mut counts: BTreeMap<MainCategory, usize> = BTreeMap::new();
    for r in data {
        *counts.entry(r.main_category).or_default() += 1;
    }
    counts.into_iter().collect()
}

pub fn departments(data: &[DerivedRecord]) -> Vec<Department> {
    let set: BTreeSet<Department> = data.iter().map(|r| r.department).collect();
    set.into_iter().collect()
}

/// Distinct non-empty zones, ascending.
pub fn zones(data: &[DerivedRecord]) -> Vec<String> {
    zones_where(data, |_| true)
}

/// Zones that have at least one LMC record.
pub fn lmc_zones(data: &[DerivedRecord]) -> Vec<String> {
    zones_where(data, |r| r.department == Department::Lmc)
}

fn zones_where<F>(data: &[DerivedRecord], pred: F) -> Vec<String>
where
    F: Fn(&DerivedRecord) -> bool,
{
    let set: BTreeSet<&str> = data
        .iter()
        .filter(|r| pred(r))
        .filter_map(|r| r.record.zone.as_deref())
        .collect();
    set.into_iter().map(str::to_string).collect()
}

pub fn generate_summary(
    data: &[DerivedRecord],
    status_summary: Option<&SummaryTable>,
) -> SummaryStats {
    let (open, resolved, grand_total, closure_pct) = match status_summary {
        Some(t) => (t.total.open, t.total.resolved, t.total.grand_total, t.total.closure_pct),
        None => (0, 0, 0, ClosurePct::default()),
    };
    let categories = category_counts(data)
        .into_iter()
        .map(|(c, n)| GroupCount {
            name: c.to_string(),
            records: n,
        })
        .collect();
    let mut by_dept: BTreeMap<Department, usize> = BTreeMap::new();
    for r in data {
        *by_dept.entry(r.department).or_default() += 1;
    }
    let departments = by_dept
        .into_iter()
        .map(|(d, n)| GroupCount {
            name: d.to_string(),
            records: n,
        })
        .collect();

    SummaryStats {
        generated_at: chrono::Utc::now(),
        total_records: data.len(),
        open,
        resolved,
        grand_total,
        closure_pct,
        categories,
        departments,
    }
}
