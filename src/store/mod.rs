//! Durable, append-only submission storage.
//!
//! The store holds a single ordered list of submissions serialized as one
//! JSON document. Every append reads the whole list, pushes the new record
//! and rewrites the whole document. There is no update or delete.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::Submission;
use crate::utilities::errors::StoreError;

/// Default location of the submissions document.
pub const DEFAULT_DATA_FILE: &str = "data/submissions.json";

/// Interface every submission store implements.
///
/// `list_all` on a store that was never written returns an empty list, not
/// an error. A failed `append` leaves previously stored records untouched.
#[async_trait]
pub trait SubmissionStore: Send + Sync + fmt::Debug {
    /// Add `submission` to the end of the list.
    async fn append(&self, submission: &Submission) -> Result<(), StoreError>;

    /// Every stored submission in insertion order.
    async fn list_all(&self) -> Result<Vec<Submission>, StoreError>;
}

/// File-backed store writing one pretty-printed JSON array.
///
/// Writers are serialized by an internal lock around read-append-write.
/// Each write goes to a sibling temp file that is then renamed over the
/// document, so readers see either the old list or the new one.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "submissions.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_document(&self) -> Result<Vec<Submission>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_document(&self, submissions: &[Submission]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_vec_pretty(submissions)?;
        let tmp = self.temp_path();

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&body).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for JsonFileStore {
    async fn append(&self, submission: &Submission) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut submissions = self.read_document().await?;
        submissions.push(submission.clone());
        self.write_document(&submissions).await?;

        log::debug!(
            "JsonFileStore::append: id={}, total={}, path={}",
            submission.id,
            submissions.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Submission>, StoreError> {
        self.read_document().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::scoring::{DimensionScore, DimensionScores};
    use crate::types::{Answer, UserInfo};

    fn submission(id: &str) -> Submission {
        let scores: DimensionScores = [(
            "Visibility".to_string(),
            DimensionScore {
                score: 3.0,
                count: 2,
            },
        )]
        .into_iter()
        .collect();
        Submission {
            id: id.to_string(),
            user_info: UserInfo {
                name: "Ada".to_string(),
                role: "COO".to_string(),
                company: "Acme".to_string(),
                email: "ada@acme.io".to_string(),
            },
            answers: vec![Answer::new(1, 4), Answer::new(2, 2)],
            category_scores: scores,
            timestamp: "2024-05-01T10:00:00.000Z".to_string(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("data").join("submissions.json"))
    }

    #[tokio::test]
    async fn test_list_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_to_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let sub = submission("1");
        store.append(&sub).await.unwrap();
        assert_eq!(store.list_all().await.unwrap(), vec![sub]);
    }

    #[tokio::test]
    async fn test_appends_keep_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&submission("first")).await.unwrap();
        store.append(&submission("second")).await.unwrap();
        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_document_is_camel_case_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&submission("1")).await.unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["userInfo"]["email"], "ada@acme.io");
        assert_eq!(json[0]["answers"][0]["statementId"], 1);
        assert_eq!(json[0]["categoryScores"]["Visibility"]["score"], 3.0);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_empty_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "").unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let first = submission("kept");
        store.append(&first).await.unwrap();

        // A directory squatting on the temp path makes the write fail.
        std::fs::create_dir_all(store.temp_path()).unwrap();
        let err = store.append(&submission("lost")).await;
        assert!(matches!(err, Err(StoreError::Io(_))));

        assert_eq!(store.list_all().await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(
            store.append(&submission("x")).await,
            Err(StoreError::Serialization(_))
        ));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{not json");
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(&submission(&i.to_string())).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut ids: Vec<u32> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id.parse().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..16).collect::<Vec<_>>());
    }
}
