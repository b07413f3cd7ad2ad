use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::session::report::FullReport;

const REPORT_PREFIX: &str = "reporte_";
const REPORT_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("report file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("report file {path} is not a valid report: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory that receives `reporte_<player>_<unix seconds>.json` files.
pub struct ReportStore {
    base_dir: PathBuf,
}

impl ReportStore {
    /// Store rooted at `base_dir`, created if missing.
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir).map_err(|source| StoreError::Io {
            path: base_dir.clone(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn report_file_name(player_name: &str, unix_secs: i64) -> String {
        let safe: String = player_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{REPORT_PREFIX}{safe}_{unix_secs}.{REPORT_EXTENSION}")
    }

    /// Write the report, returning where it landed. Any failure is logged and
    /// reported as `None`; the caller keeps the in-memory report either way.
    pub fn save_report(&self, report: &FullReport) -> Option<PathBuf> {
        self.save_report_for(&report.player_name, report)
    }

    /// Like `save_report`, but the file is named after `player_name`.
    pub fn save_report_for(&self, player_name: &str, report: &FullReport) -> Option<PathBuf> {
        let name = Self::report_file_name(player_name, Utc::now().timestamp());
        match self.write_report(&name, report) {
            Ok(path) => {
                log::info!("saved report to {}", path.display());
                Some(path)
            }
            Err(e) => {
                log::error!("failed to save report: {e:#}");
                None
            }
        }
    }

    fn write_report(&self, name: &str, report: &FullReport) -> anyhow::Result<PathBuf> {
        let path = self.base_dir.join(name);
        let tmp_path = path.with_extension("tmp");

        // serde_json pretty output is 2-space indented and keeps non-ASCII as-is.
        let json = serde_json::to_string_pretty(report)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(path)
    }

    pub fn load_report(path: &Path) -> Result<FullReport, StoreError> {
        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Saved report files, newest first by the timestamp in their names.
    pub fn list_reports(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.base_dir) else {
            return Vec::new();
        };
        let mut reports: Vec<(i64, PathBuf)> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?;
                if !stem.starts_with(REPORT_PREFIX)
                    || path.extension().and_then(|x| x.to_str()) != Some(REPORT_EXTENSION)
                {
                    return None;
                }
                let (_, ts) = stem.rsplit_once('_')?;
                Some((ts.parse().ok()?, path))
            })
            .collect();
        reports.sort_by(|a, b| b.0.cmp(&a.0));
        reports.into_iter().map(|(_, path)| path).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::Level;
    use crate::session::answer::Answer;
    use crate::session::tracker::SessionTracker;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, ReportStore) {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn make_report(name: &str) -> FullReport {
        let mut tracker = SessionTracker::new();
        tracker.set_player_info(name, "6");
        tracker.start_trial(Level::Estimation, 1, Answer::Count(20));
        tracker.record_answer(Answer::Count(21));
        tracker.get_full_report()
    }

    #[test]
    fn test_save_report_writes_named_file() {
        let (_dir, store) = make_test_store();
        let path = store.save_report(&make_report("Sofía")).unwrap();

        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("reporte_Sofía_"));
        assert!(file_name.ends_with(".json"));
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_saved_report_is_pretty_and_keeps_accents() {
        let (_dir, store) = make_test_store();
        let path = store.save_report(&make_report("José")).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(content.contains("\n  \"player_name\": \"José\""));
        assert!(content.contains("OBSERVACIÓN"));
        assert!(content.contains("\"4\": {"));
        assert!(!content.contains("\\u00"));
    }

    #[test]
    fn test_saved_report_loads_back() {
        let (_dir, store) = make_test_store();
        let report = make_report("Luis");
        let path = store.save_report(&report).unwrap();
        let loaded = ReportStore::load_report(&path).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn test_save_failure_returns_none() {
        let dir = TempDir::new().unwrap();
        // Points at a directory that does not exist, so the write must fail.
        let bad_store = ReportStore {
            base_dir: dir.path().join("missing").join("deeper"),
        };
        assert!(bad_store.save_report(&make_report("Ana")).is_none());
        assert!(bad_store.list_reports().is_empty());
    }

    #[test]
    fn test_player_name_cannot_escape_directory() {
        assert_eq!(
            ReportStore::report_file_name("../x\\y", 42),
            "reporte_.._x_y_42.json"
        );
    }

    #[test]
    fn test_load_report_rejects_garbage() {
        let (dir, _store) = make_test_store();
        let path = dir.path().join("reporte_x_1.json");
        fs::write(&path, "not json").unwrap();
        let err = ReportStore::load_report(&path).unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
        assert!(ReportStore::load_report(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_list_reports_newest_first() {
        let (dir, store) = make_test_store();
        fs::write(dir.path().join("reporte_Ana_100.json"), "{}").unwrap();
        fs::write(dir.path().join("reporte_Ana_300.json"), "{}").unwrap();
        fs::write(dir.path().join("reporte_Luis Gil_200.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.json"), "{}").unwrap();
        fs::write(dir.path().join("reporte_Ana_400.tmp"), "{}").unwrap();

        let names: Vec<String> = store
            .list_reports()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "reporte_Ana_300.json",
                "reporte_Luis Gil_200.json",
                "reporte_Ana_100.json",
            ]
        );
    }
}
