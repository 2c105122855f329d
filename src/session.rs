// One loaded upload: the derived table plus memoized reports over it.
//
// Reports are pure functions of (table, arguments), so each distinct query
// is computed once per session. Loading a new file builds a new session.
use crate::classify::derive_table;
use crate::reports::{self, OfficerRanking};
use crate::tabulate::SummaryTable;
use crate::types::{Department, DerivedRecord, MainCategory, Record, SubcategoryExportRow};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SummaryQuery {
    MainCategories,
    Subcategories(MainCategory),
    ZoneSubcategories(MainCategory, String),
    Department(Department),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OfficerQuery {
    pub category: Option<MainCategory>,
    pub zone: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

pub struct Session {
    table: Vec<DerivedRecord>,
    summaries: HashMap<SummaryQuery, Option<SummaryTable>>,
    officers: HashMap<OfficerQuery, Option<OfficerRanking>>,
    stats: CacheStats,
}

impl Session {
    pub fn new(records: &[Record]) -> Self {
        Session {
            table: derive_table(records),
            summaries: HashMap::new(),
            officers: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn table(&self) -> &[DerivedRecord] {
        &self.table
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.stats
    }

    pub fn summary(&mut self, query: SummaryQuery) -> Option<&SummaryTable> {
        if self.summaries.contains_key(&query) {
            self.stats.hits += 1;
            debug!(?query, "summary cache hit");
        } else {
            self.stats.misses += 1;
            debug!(?query, "summary cache miss");
        }
        let table = &self.table;
        self.summaries
            .entry(query)
            .or_insert_with_key(|q| match q {
                SummaryQuery::MainCategories => reports::generate_status_summary(table),
                SummaryQuery::Subcategories(c) => reports::generate_subcategory_summary(table, *c),
                SummaryQuery::ZoneSubcategories(c, z) => {
                    reports::generate_zone_subcategory_summary(table, *c, z)
                }
                SummaryQuery::Department(d) => reports::generate_department_summary(table, *d),
            })
            .as_ref()
    }

    pub fn officers(&mut self, query: OfficerQuery) -> Option<&OfficerRanking> {
        if self.officers.contains_key(&query) {
            self.stats.hits += 1;
            debug!(?query, "officer cache hit");
        } else {
            self.stats.misses += 1;
            debug!(?query, "officer cache miss");
        }
        let table = &self.table;
        self.officers
            .entry(query)
            .or_insert_with_key(|q| {
                reports::generate_officer_performance(table, q.category, q.zone.as_deref())
            })
            .as_ref()
    }

    /// Bulk subcategory export over every category present.
    pub fn all_subcategories(&mut self) -> Vec<SubcategoryExportRow> {
        let mut out = Vec::new();
        for category in reports::main_categories(&self.table) {
            if let Some(table) = self.summary(SummaryQuery::Subcategories(category)) {
                out.extend(reports::export_rows(table, category));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sub: &str, status: &str, assignee: &str, zone: &str) -> Record {
        Record {
            subcategory: Some(sub.to_string()),
            status: Some(status.to_string()),
            assignee: Some(assignee.to_string()),
            zone: Some(zone.to_string()),
            extra: vec![],
        }
    }

    fn session() -> Session {
        Session::new(&[
            record("Pothole", "Open", "LMC-A", "Z1"),
            record("Overflowing Dustbin", "Resolved", "LMC-B", "Z1"),
            record("Pothole", "Open", "PWD-1", "Z2"),
        ])
    }

    #[test]
    fn repeated_query_hits_cache_with_same_result() {
        let mut s = session();
        let first = s.summary(SummaryQuery::Subcategories(MainCategory::Engineering)).cloned();
        let _ = s.summary(SummaryQuery::MainCategories);
        let again = s.summary(SummaryQuery::Subcategories(MainCategory::Engineering)).cloned();
        assert_eq!(first, again);
        assert_eq!(s.cache_stats(), CacheStats { hits: 1, misses: 2 });
    }

    #[test]
    fn cached_output_matches_direct_computation() {
        let mut s = session();
        let direct =
            reports::generate_zone_subcategory_summary(s.table(), MainCategory::Engineering, "Z2");
        let cached = s
            .summary(SummaryQuery::ZoneSubcategories(MainCategory::Engineering, "Z2".to_string()))
            .cloned();
        assert_eq!(direct, cached);
    }

    #[test]
    fn empty_results_are_cached_too() {
        let mut s = session();
        assert!(s.summary(SummaryQuery::Department(Department::Lda)).is_none());
        assert!(s.summary(SummaryQuery::Department(Department::Lda)).is_none());
        assert_eq!(s.cache_stats().hits, 1);
    }

    #[test]
    fn officer_queries_are_memoized() {
        let mut s = session();
        let q = OfficerQuery {
            category: None,
            zone: Some("Z1".to_string()),
        };
        assert_eq!(s.officers(q.clone()).map(|r| r.active_officers()), Some(2));
        assert_eq!(s.officers(q).map(|r| r.active_officers()), Some(2));
        assert_eq!(s.cache_stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn bulk_export_matches_uncached_builder() {
        let mut s = session();
        let categories = reports::main_categories(s.table());
        let direct = reports::generate_all_subcategory_summaries(s.table(), &categories);
        assert_eq!(s.all_subcategories(), direct);
    }
}
