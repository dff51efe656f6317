use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::report::{Record, ScoreUpdate};

pub struct ReportStore {
    path: PathBuf,
    record: Mutex<Record>,
}

#[derive(Debug)]
pub enum UpdateError {
    /// The record in memory already carries the update; only the file is stale.
    Persist { record: Record, source: anyhow::Error },
}

impl ReportStore {
    /// Loads the record from `path`. Any failure here is fatal to the caller:
    /// there is nothing sensible to serve without it.
    pub async fn load(path: &Path) -> anyhow::Result<ReportStore> {
        let text = tokio::fs::read_to_string(path).await.with_context(|| {
            format!("failed to read report data from {}", path.to_string_lossy())
        })?;
        let record: Record = serde_json::from_str(&text)
            .with_context(|| format!("report data in {} is invalid", path.to_string_lossy()))?;

        if !record.feedback_is_current() {
            warn!(
                overall = %record.overall_score,
                title = %record.feedback.title,
                "stored feedback does not match overall score; next update recomputes it"
            );
        }
        info!(
            path = %path.to_string_lossy(),
            student = %record.student.name,
            overall = %record.overall_score,
            "report loaded"
        );

        Ok(ReportStore {
            path: path.to_path_buf(),
            record: Mutex::new(record),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> Record {
        self.record.lock().await.clone()
    }

    /// Applies `update`, reclassifies and rewrites the backing file. The lock
    /// is held until the write finishes so file contents follow request order.
    pub async fn update(&self, update: &ScoreUpdate) -> Result<Record, UpdateError> {
        let mut guard = self.record.lock().await;
        guard.apply(update);
        let record = guard.clone();

        if let Err(source) = persist(&self.path, &record).await {
            return Err(UpdateError::Persist { record, source });
        }

        info!(
            fields = ?update.fields(),
            overall = %record.overall_score,
            band = %record.feedback.title,
            "scores updated"
        );
        Ok(record)
    }
}

pub async fn persist(path: &Path, record: &Record) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let text = serde_json::to_string_pretty(record).context("failed to serialize report")?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, text.as_bytes())
        .await
        .with_context(|| format!("failed to write {}", tmp.to_string_lossy()))?;
    tokio::fs::rename(&tmp, path).await.with_context(|| {
        format!(
            "failed to move {} to {}",
            tmp.to_string_lossy(),
            path.to_string_lossy()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{classify, Feedback, Score, Skills, Student};
    use chrono::NaiveDate;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    fn seed(overall: i64, feedback: Feedback) -> Record {
        Record {
            student: Student {
                name: "Alex Johnson".into(),
                test_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("date"),
                test_type: "Speaking Assessment".into(),
            },
            overall_score: Score::from(overall),
            skills: Skills {
                pronunciation: Score::from(7),
                fluency: Score::from(6),
                vocabulary: Score::from(8),
                grammar: Score::from(6),
            },
            feedback,
        }
    }

    #[tokio::test]
    async fn load_missing_file_fails_with_path_in_message() {
        let dir = temp_dir("bandreport-store-missing");
        let path = dir.join("nope.json");
        let err = match ReportStore::load(&path).await {
            Ok(_) => panic!("load should fail"),
            Err(e) => e,
        };
        assert!(format!("{err:#}").contains("nope.json"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn update_persists_pretty_json_and_snapshot_matches() {
        let dir = temp_dir("bandreport-store-update");
        let path = dir.join("report.json");
        persist(&path, &seed(7, classify(&Score::from(7)))).await.expect("seed");

        let store = ReportStore::load(&path).await.expect("load");
        let updated = store
            .update(&ScoreUpdate {
                overall: Some(Score::from(8)),
                ..Default::default()
            })
            .await
            .expect("update");
        assert_eq!(updated.feedback.title, "Excellent Performance");
        assert_eq!(store.snapshot().await, updated);

        let text = std::fs::read_to_string(&path).expect("read back");
        assert!(text.contains("\n  \"overallScore\": 8"));
        let on_disk: Record = serde_json::from_str(&text).expect("parse back");
        assert_eq!(on_disk, updated);
        assert!(!dir.join("report.json.tmp").exists());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn loaded_record_is_served_verbatim_until_updated() {
        let dir = temp_dir("bandreport-store-stale");
        let path = dir.join("report.json");
        let stale = seed(3, classify(&Score::from(9)));
        persist(&path, &stale).await.expect("seed");

        let store = ReportStore::load(&path).await.expect("load");
        assert_eq!(store.snapshot().await, stale);

        let updated = store.update(&ScoreUpdate::default()).await.expect("update");
        assert_eq!(updated.feedback, classify(&Score::from(3)));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn persist_failure_keeps_in_memory_change() {
        let dir = temp_dir("bandreport-store-persist-fail");
        let path = dir.join("report.json");
        persist(&path, &seed(7, classify(&Score::from(7)))).await.expect("seed");
        let store = ReportStore::load(&path).await.expect("load");

        // A directory squatting on the temp file name makes the write fail.
        std::fs::create_dir_all(dir.join("report.json.tmp")).expect("block tmp");

        let res = store
            .update(&ScoreUpdate {
                overall: Some(Score::from(4)),
                ..Default::default()
            })
            .await;
        match res {
            Err(UpdateError::Persist { record, .. }) => {
                assert_eq!(record.overall_score, 4)
            }
            Ok(_) => panic!("update should fail to persist"),
        }
        assert_eq!(store.snapshot().await.overall_score, 4);

        let on_disk: Record =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("parse");
        assert_eq!(on_disk.overall_score, 7);
        let _ = std::fs::remove_dir_all(dir);
    }
}
