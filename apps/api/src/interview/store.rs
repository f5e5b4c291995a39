//! Writes finished runs to timestamped text files. Write-only: nothing reads them back.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::info;
use uuid::Uuid;

use super::report::rule;

#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `interview_result_<YYYYmmdd_HHMMSS>_<first 8 of run id>.txt`
    pub fn file_name(run_id: Uuid, at: DateTime<Local>) -> String {
        let run = run_id.simple().to_string();
        format!(
            "interview_result_{}_{}.txt",
            at.format("%Y%m%d_%H%M%S"),
            &run[..8]
        )
    }

    /// Saves `report` and returns the file name. Creates the directory if needed.
    pub async fn save(&self, run_id: Uuid, report: &str, at: DateTime<Local>) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create results directory {}", self.dir.display()))?;

        let file_name = Self::file_name(run_id, at);
        let path = self.dir.join(&file_name);
        let contents = format!(
            "Interview Automation Result\nGenerated on: {}\n{}\n\n{}",
            at.format("%Y-%m-%d %H:%M:%S"),
            rule(),
            report
        );

        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Saved interview result to {}", path.display());
        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 2, 14, 30, 5).unwrap()
    }

    #[test]
    fn test_file_name_format() {
        let run_id = Uuid::parse_str("0f8fad5b-d9cb-469f-a165-70867728950e").unwrap();
        assert_eq!(
            ResultStore::file_name(run_id, fixed_time()),
            "interview_result_20240502_143005_0f8fad5b.txt"
        );
    }

    #[tokio::test]
    async fn test_save_writes_header_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("results"));
        let run_id = Uuid::new_v4();

        let file_name = store
            .save(run_id, "REPORT BODY", fixed_time())
            .await
            .unwrap();

        let contents =
            std::fs::read_to_string(dir.path().join("results").join(&file_name)).unwrap();
        assert_eq!(
            contents,
            format!(
                "Interview Automation Result\nGenerated on: 2024-05-02 14:30:05\n{}\n\nREPORT BODY",
                "=".repeat(50)
            )
        );
    }

    #[tokio::test]
    async fn test_save_fails_when_directory_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("results");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = ResultStore::new(&blocker);
        assert!(store
            .save(Uuid::new_v4(), "x", fixed_time())
            .await
            .is_err());
    }
}
