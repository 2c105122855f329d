use std::path::{Path, PathBuf};
use tracing::Level;

/// Compiled-in settings for the terminal dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub default_input: PathBuf,
    pub export_dir: PathBuf,
    pub summary_csv: String,
    pub subcategories_csv: String,
    pub summary_json: String,
    /// Rows shown in terminal previews; exports are never truncated.
    pub preview_rows: usize,
    pub log_level: Level,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            default_input: PathBuf::from("complaints.csv"),
            export_dir: PathBuf::from("."),
            summary_csv: "batch1_main_category_summary.csv".to_string(),
            subcategories_csv: "batch2_all_subcategories.csv".to_string(),
            summary_json: "summary.json".to_string(),
            preview_rows: 25,
            log_level: Level::INFO,
        }
    }
}

impl DashboardConfig {
    pub fn with_export_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.export_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn summary_csv_path(&self) -> PathBuf {
        self.export_dir.join(&self.summary_csv)
    }

    pub fn subcategories_csv_path(&self) -> PathBuf {
        self.export_dir.join(&self.subcategories_csv)
    }

    pub fn summary_json_path(&self) -> PathBuf {
        self.export_dir.join(&self.summary_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_paths_live_under_export_dir() {
        let cfg = DashboardConfig::default().with_export_dir("/tmp/out");
        assert_eq!(
            cfg.summary_csv_path(),
            PathBuf::from("/tmp/out/batch1_main_category_summary.csv")
        );
        assert_eq!(
            cfg.subcategories_csv_path(),
            PathBuf::from("/tmp/out/batch2_all_subcategories.csv")
        );
        assert_eq!(cfg.summary_json_path(), PathBuf::from("/tmp/out/summary.json"));
    }
}
