use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::models::ProductRecord;
use crate::utils::error::{AppError, Result};

/// Dated result files under one directory, one file per calendar day.
#[derive(Debug, Clone)]
pub struct ResultStore {
    results_dir: PathBuf,
}

impl ResultStore {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// `<results_dir>/<YYMMDD>_result.json`
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.results_dir
            .join(format!("{}_result.json", date.format("%y%m%d")))
    }

    pub fn exists(&self, date: NaiveDate) -> bool {
        self.path_for(date).exists()
    }

    /// Writes the day's records as pretty JSON, going through a temporary
    /// file so an interrupted write never leaves a truncated result behind.
    pub fn save(&self, date: NaiveDate, records: &[ProductRecord]) -> Result<PathBuf> {
        fs::create_dir_all(&self.results_dir)
            .map_err(|e| AppError::persistence(&self.results_dir, e))?;

        let path = self.path_for(date);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(records)?;

        fs::write(&tmp_path, json).map_err(|e| AppError::persistence(&tmp_path, e))?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            AppError::persistence(&path, e)
        })?;

        Ok(path)
    }

    pub fn load(&self, date: NaiveDate) -> Result<Vec<ProductRecord>> {
        let path = self.path_for(date);
        let raw = fs::read_to_string(&path).map_err(|e| AppError::persistence(&path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }
}
