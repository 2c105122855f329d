use crate::error::{DashboardError, Result};
use crate::types::Record;
use crate::util::non_empty;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

pub const SUBCATEGORY_COLUMN: &str = "Subcategory";
pub const STATUS_COLUMN: &str = "Status Name";
pub const ASSIGNEE_COLUMN: &str = "Assigned User Name";
pub const ZONE_COLUMN: &str = "Zone Name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub unassigned: usize,
    pub missing_zone: usize,
    pub extra_columns: usize,
}

struct Columns {
    subcategory: usize,
    status: usize,
    assignee: usize,
    zone: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
        };
        Ok(Columns {
            subcategory: find(SUBCATEGORY_COLUMN)?,
            status: find(STATUS_COLUMN)?,
            assignee: find(ASSIGNEE_COLUMN)?,
            zone: find(ZONE_COLUMN)?,
        })
    }

    fn is_named(&self, idx: usize) -> bool {
        idx == self.subcategory || idx == self.status || idx == self.assignee || idx == self.zone
    }
}

/// Load the complaint file at `path`. Any failure aborts the whole load.
pub fn load_complaints(path: impl AsRef<Path>) -> Result<(Vec<Record>, LoadReport)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let (records, report) = read_complaints(file, &path.display().to_string())?;
    info!(
        path = %path.display(),
        rows = report.total_rows,
        unassigned = report.unassigned,
        "loaded complaint records"
    );
    Ok((records, report))
}

/// Parse complaint rows from any reader. `source` names the input in errors.
pub fn read_complaints<R: Read>(reader: R, source: &str) -> Result<(Vec<Record>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let cols = Columns::locate(&headers)?;

    let mut records = Vec::new();
    let mut unassigned = 0usize;
    let mut missing_zone = 0usize;

    for result in rdr.records() {
        let row = result?;
        let cell = |idx: usize| non_empty(row.get(idx));

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !cols.is_named(*idx))
            .map(|(idx, name)| (name.to_string(), row.get(idx).unwrap_or("").to_string()))
            .collect();

        let record = Record {
            subcategory: cell(cols.subcategory),
            status: cell(cols.status),
            assignee: cell(cols.assignee),
            zone: cell(cols.zone),
            extra,
        };
        if record.assignee.is_none() {
            unassigned += 1;
        }
        if record.zone.is_none() {
            missing_zone += 1;
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(DashboardError::EmptyDataset(source.to_string()));
    }

    let report = LoadReport {
        total_rows: records.len(),
        unassigned,
        missing_zone,
        extra_columns: headers.len() - 4,
    };
    Ok((records, report))
}
