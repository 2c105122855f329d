use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// One complaint row as read from the uploaded file.
///
/// The four named columns are the ones the dashboard reasons about; every
/// other column is carried along untouched in `extra`, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub subcategory: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub zone: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl Record {
    /// Look up a passthrough column by header name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MainCategory {
    Engineering,
    Malba,
    Others,
    Sanitation,
}

impl MainCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MainCategory::Engineering => "Engineering",
            MainCategory::Malba => "Malba",
            MainCategory::Others => "Others",
            MainCategory::Sanitation => "Sanitation",
        }
    }
}

impl fmt::Display for MainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBinary {
    Open,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    Lda,
    Lmc,
    Pwd,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Lda => "LDA",
            Department::Lmc => "LMC",
            Department::Pwd => "PWD",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record plus the three columns derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedRecord {
    pub record: Record,
    pub main_category: MainCategory,
    pub status: StatusBinary,
    pub department: Department,
}

/// Closure percentage, already rounded to one decimal place.
///
/// Serializes as a bare number and displays with exactly one decimal
/// (`50.0`, `33.3`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClosurePct(pub f64);

impl ClosurePct {
    /// `resolved / total * 100`, rounded half up to one decimal.
    /// A zero total yields 0.
    pub fn from_counts(resolved: usize, total: usize) -> Self {
        if total == 0 {
            return ClosurePct(0.0);
        }
        // Round in integer tenths so exact ties always go up.
        let tenths = (resolved * 2000 + total) / (2 * total);
        ClosurePct(tenths as f64 / 10.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for ClosurePct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// One row of a summary table: a group key with its status counts.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub key: Vec<String>,
    pub open: usize,
    pub resolved: usize,
    pub grand_total: usize,
    pub closure_pct: ClosurePct,
}

impl SummaryRow {
    pub fn new(key: Vec<String>, open: usize, resolved: usize) -> Self {
        let grand_total = open + resolved;
        SummaryRow {
            key,
            open,
            resolved,
            grand_total,
            closure_pct: ClosurePct::from_counts(resolved, grand_total),
        }
    }

    pub fn label(&self) -> String {
        self.key.join(" / ")
    }
}

#[derive(Debug, Serialize, Deserialize, Tabled, Clone, PartialEq)]
pub struct OfficerRankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Officer Name")]
    #[tabled(rename = "Officer Name")]
    pub officer_name: String,
    #[serde(rename = "Open")]
    #[tabled(rename = "Open")]
    pub open: usize,
    #[serde(rename = "Resolved")]
    #[tabled(rename = "Resolved")]
    pub resolved: usize,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: usize,
    #[serde(rename = "% Closure")]
    #[tabled(rename = "% Closure")]
    pub closure_pct: ClosurePct,
}

/// One line of the bulk subcategory export.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubcategoryExportRow {
    #[serde(rename = "Subcategory")]
    pub subcategory: String,
    #[serde(rename = "Open")]
    pub open: usize,
    #[serde(rename = "Resolved")]
    pub resolved: usize,
    #[serde(rename = "Grand Total")]
    pub grand_total: usize,
    #[serde(rename = "% Closure")]
    pub closure_pct: ClosurePct,
    #[serde(rename = "MainCategory")]
    pub main_category: MainCategory,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GroupCount {
    pub name: String,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub total_records: usize,
    pub open: usize,
    pub resolved: usize,
    pub grand_total: usize,
    pub closure_pct: ClosurePct,
    pub categories: Vec<GroupCount>,
    pub departments: Vec<GroupCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_pct_rounds_to_one_decimal() {
        assert_eq!(ClosurePct::from_counts(1, 3).value(), 33.3);
        assert_eq!(ClosurePct::from_counts(2, 3).value(), 66.7);
        assert_eq!(ClosurePct::from_counts(1, 2).to_string(), "50.0");
    }

    #[test]
    fn closure_pct_ties_round_up() {
        assert_eq!(ClosurePct::from_counts(1, 16).value(), 6.3);
        assert_eq!(ClosurePct::from_counts(23, 80).value(), 28.8);
        assert_eq!(ClosurePct::from_counts(41, 80).value(), 51.3);
        assert_eq!(ClosurePct::from_counts(51, 80).value(), 63.8);
        assert_eq!(ClosurePct::from_counts(46, 160).value(), 28.8);
        assert_eq!(ClosurePct::from_counts(1, 8).value(), 12.5);
    }

    #[test]
    fn closure_pct_is_nearest_tenth_with_ties_up() {
        for total in 1..=2000usize {
            for resolved in 0..=total {
                let pct = ClosurePct::from_counts(resolved, total);
                let tenths = (pct.value() * 10.0).round() as usize;
                assert_eq!(tenths as f64 / 10.0, pct.value());
                // 1000 * r / t lies in [tenths - 1/2, tenths + 1/2).
                let scaled = 2000 * resolved;
                assert!(scaled + total >= 2 * tenths * total, "{}/{}", resolved, total);
                assert!(scaled + total < (2 * tenths + 2) * total, "{}/{}", resolved, total);
            }
        }
    }

    #[test]
    fn closure_pct_zero_total_is_zero() {
        assert_eq!(ClosurePct::from_counts(0, 0).value(), 0.0);
    }

    #[test]
    fn summary_row_derives_totals() {
        let row = SummaryRow::new(vec!["Malba".to_string()], 3, 1);
        assert_eq!(row.grand_total, 4);
        assert_eq!(row.closure_pct.value(), 25.0);
        assert_eq!(row.label(), "Malba");
    }

    #[test]
    fn passthrough_field_lookup() {
        let record = Record {
            subcategory: None,
            status: None,
            assignee: None,
            zone: None,
            extra: vec![("Complaint Id".to_string(), "C-17".to_string())],
        };
        assert_eq!(record.field("Complaint Id"), Some("C-17"));
        assert_eq!(record.field("Ward"), None);
    }
}
