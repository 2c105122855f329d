// Derived columns: main category, binary status and department.
//
// Each function here is total. Anything that does not match a known value
// falls back to a fixed default instead of failing.
use crate::types::{Department, DerivedRecord, MainCategory, Record, StatusBinary};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Exact subcategory text to main category. Lookups are case-sensitive and
/// whole-string; near-duplicate phrasings are separate entries.
pub static MAIN_CATEGORY_MAPPING: Lazy<HashMap<&'static str, MainCategory>> = Lazy::new(|| {
    use MainCategory::*;
    HashMap::from([
        ("Garbage dumped on public land", Sanitation),
        ("Overflowing Dustbin", Sanitation),
        (
            "Mud/silt sticking on structures on the roadsides/footpaths/Dividers",
            Sanitation,
        ),
        ("Burning of Garbage, Plastic, Leaves, Branches etc.", Sanitation),
        ("Road Dust/Sand Piled on Roadside", Sanitation),
        ("Road Dust", Sanitation),
        ("Garbage Burning at roadside", Sanitation),
        ("Malba, Bricks, Bori, etc on Dumping Land", Malba),
        (
            "Construction material lying unattended/encroaching public spaces",
            Malba,
        ),
        ("Construction and Demolition Activity Without Safeguards", Malba),
        ("C&D Waste Pick up request", Malba),
        ("Pothole", Engineering),
        ("Unpaved road", Engineering),
        ("Broken Footpath/ Divider", Engineering),
        ("End to end pavement required", Engineering),
    ])
});

pub fn categorize(subcategory: Option<&str>) -> MainCategory {
    subcategory
        .and_then(|s| MAIN_CATEGORY_MAPPING.get(s).copied())
        .unwrap_or(MainCategory::Others)
}

/// `Resolved` iff the raw status contains the substring "Resolved".
/// A missing status never does.
pub fn normalize_status(raw_status: Option<&str>) -> StatusBinary {
    match raw_status {
        Some(s) if s.contains("Resolved") => StatusBinary::Resolved,
        _ => StatusBinary::Open,
    }
}

pub fn classify_department(assignee: Option<&str>) -> Department {
    let Some(assignee) = assignee else {
        return Department::Lmc;
    };
    let trimmed = assignee.trim();
    if trimmed.starts_with("PWD") {
        Department::Pwd
    } else if trimmed.starts_with("LDA") {
        Department::Lda
    } else {
        Department::Lmc
    }
}

pub fn derive_record(record: Record) -> DerivedRecord {
    let main_category = categorize(record.subcategory.as_deref());
    let status = normalize_status(record.status.as_deref());
    let department = classify_department(record.assignee.as_deref());
    DerivedRecord {
        record,
        main_category,
        status,
        department,
    }
}

/// Build the derived table from raw records. The input is left untouched;
/// the result is a fresh table.
pub fn derive_table(records: &[Record]) -> Vec<DerivedRecord> {
    records.iter().cloned().map(derive_record).collect()
}
