//! Group-by-count over the derived table.
//!
//! Every dashboard view is the same computation: restrict the records with a
//! [`RecordFilter`], partition them by one or two [`Dimension`]s, count Open
//! and Resolved per group and append a total row built from the column sums.

use crate::types::{
    Department, DerivedRecord, MainCategory, OfficerRankingRow, StatusBinary, SummaryRow,
};
use std::collections::BTreeMap;

/// Label used for a group whose key column is empty.
pub const MISSING_LABEL: &str = "(blank)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    MainCategory,
    Subcategory,
    Zone,
    Officer,
}

impl Dimension {
    /// Header used when a table keyed by this dimension is exported.
    pub fn column_name(&self) -> &'static str {
        match self {
            Dimension::MainCategory => "MainCategory",
            Dimension::Subcategory => "Subcategory",
            Dimension::Zone => "Zone Name",
            Dimension::Officer => "Officer Name",
        }
    }

    fn key(&self, r: &DerivedRecord) -> String {
        let raw = match self {
            Dimension::MainCategory => return r.main_category.to_string(),
            Dimension::Subcategory => r.record.subcategory.as_deref(),
            Dimension::Zone => r.record.zone.as_deref(),
            Dimension::Officer => r.record.assignee.as_deref(),
        };
        raw.unwrap_or(MISSING_LABEL).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupBy {
    One(Dimension),
    Two(Dimension, Dimension),
}

impl GroupBy {
    pub fn dimensions(&self) -> Vec<Dimension> {
        match *self {
            GroupBy::One(d) => vec![d],
            GroupBy::Two(a, b) => vec![a, b],
        }
    }

    fn key(&self, r: &DerivedRecord) -> Vec<String> {
        match self {
            GroupBy::One(d) => vec![d.key(r)],
            GroupBy::Two(a, b) => vec![a.key(r), b.key(r)],
        }
    }
}

/// Conjunction of optional equality tests. The default filter matches
/// every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RecordFilter {
    pub main_category: Option<MainCategory>,
    pub zone: Option<String>,
    pub department: Option<Department>,
    /// Drop records with no assignee.
    pub require_assignee: bool,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: MainCategory) -> Self {
        self.main_category = Some(category);
        self
    }

    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn department(mut self, department: Department) -> Self {
        self.department = Some(department);
        self
    }

    pub fn with_assignee(mut self) -> Self {
        self.require_assignee = true;
        self
    }

    pub fn matches(&self, r: &DerivedRecord) -> bool {
        if let Some(c) = self.main_category {
            if r.main_category != c {
                return false;
            }
        }
        if let Some(z) = &self.zone {
            // A record without a zone never equals a selected zone.
            if r.record.zone.as_deref() != Some(z.as_str()) {
                return false;
            }
        }
        if let Some(d) = self.department {
            if r.department != d {
                return false;
            }
        }
        !(self.require_assignee && r.record.assignee.is_none())
    }
}

/// Grouped status counts plus the synthetic total row.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub group_by: GroupBy,
    pub groups: Vec<SummaryRow>,
    pub total: SummaryRow,
}

impl SummaryTable {
    /// Group rows followed by the total row.
    pub fn rows(&self) -> impl Iterator<Item = &SummaryRow> {
        self.groups.iter().chain(std::iter::once(&self.total))
    }

    pub fn group(&self, label: &str) -> Option<&SummaryRow> {
        self.groups.iter().find(|row| row.label() == label)
    }

    pub fn index_header(&self) -> Vec<&'static str> {
        self.group_by
            .dimensions()
            .iter()
            .map(|d| d.column_name())
            .collect()
    }
}

/// Ordered per-group `(open, resolved)` counts of the matching records.
fn count_groups<F>(
    records: &[DerivedRecord],
    group_by: GroupBy,
    filter: F,
) -> BTreeMap<Vec<String>, (usize, usize)>
where
    F: Fn(&DerivedRecord) -> bool,
{
    let mut groups: BTreeMap<Vec<String>, (usize, usize)> = BTreeMap::new();
    for r in records.iter().filter(|r| filter(r)) {
        let e = groups.entry(group_by.key(r)).or_default();
        match r.status {
            StatusBinary::Open => e.0 += 1,
            StatusBinary::Resolved => e.1 += 1,
        }
    }
    groups
}

/// Summarize the records matching `filter`, grouped by `group_by`.
///
/// Returns `None` when nothing matches. Groups come out in ascending key
/// order and the total row, labelled `total_label`, is computed from the
/// summed counts rather than from per-group percentages.
pub fn tabulate(
    records: &[DerivedRecord],
    group_by: GroupBy,
    filter: &RecordFilter,
    total_label: &str,
) -> Option<SummaryTable> {
    let counts = count_groups(records, group_by, |r| filter.matches(r));
    if counts.is_empty() {
        return None;
    }

    let groups: Vec<SummaryRow> = counts
        .into_iter()
        .map(|(key, (open, resolved))| SummaryRow::new(key, open, resolved))
        .collect();
    let open = groups.iter().map(|g| g.open).sum();
    let resolved = groups.iter().map(|g| g.resolved).sum();

    let mut total_key = vec![total_label.to_string()];
    if let GroupBy::Two(..) = group_by {
        total_key.push(String::new());
    }

    Some(SummaryTable {
        group_by,
        groups,
        total: SummaryRow::new(total_key, open, resolved),
    })
}

/// Officer rows for the records matching `filter`, most Open tickets first.
///
/// Ties keep their ascending-name order. Records without an assignee are
/// never ranked. Returns `None` when nothing matches.
pub fn rank_officers(
    records: &[DerivedRecord],
    filter: &RecordFilter,
) -> Option<Vec<OfficerRankingRow>> {
    let filter = filter.clone().with_assignee();
    let counts = count_groups(records, GroupBy::One(Dimension::Officer), |r| filter.matches(r));
    if counts.is_empty() {
        return None;
    }

    let mut rows: Vec<SummaryRow> = counts
        .into_iter()
        .map(|(key, (open, resolved))| SummaryRow::new(key, open, resolved))
        .collect();
    // `sort_by` is stable.
    rows.sort_by(|a, b| b.open.cmp(&a.open));

    Some(
        rows.into_iter()
            .enumerate()
            .map(|(idx, row)| OfficerRankingRow {
                rank: idx + 1,
                officer_name: row.label(),
                open: row.open,
                resolved: row.resolved,
                total: row.grand_total,
                closure_pct: row.closure_pct,
            })
            .collect(),
    )
}
