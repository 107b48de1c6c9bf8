//! Embedded on-disk vector store.
//!
//! Each collection lives in `<root>/<name>.json`. The whole store is loaded at open
//! and rewritten atomically after every mutation. Queries are exact scans.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{VectorStore, cosine};
use crate::error::{WordsError, WordsResult};
use crate::models::{CollectionInfo, ScoredPoint, VectorParams, VectorPoint};

const COLLECTION_FILE_EXT: &str = "json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocalCollection {
    params: VectorParams,
    points: Vec<VectorPoint>,
}

pub struct LocalStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, LocalCollection>>,
}

impl LocalStore {
    /// Opens (or creates) a store rooted at `root`, loading every collection file found there.
    pub fn open(root: impl AsRef<Path>) -> WordsResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let mut collections = HashMap::new();
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(COLLECTION_FILE_EXT) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let file = File::open(&path)?;
            let collection: LocalCollection = serde_json::from_reader(BufReader::new(file))
                .map_err(|e| {
                    WordsError::Store(format!("Corrupt collection file {:?}: {}", path, e))
                })?;
            debug!(collection = name, points = collection.points.len(), "Loaded collection");
            collections.insert(name.to_string(), collection);
        }

        info!(path = ?root, collections = collections.len(), "Opened local vector store");

        Ok(Self {
            root,
            collections: RwLock::new(collections),
        })
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, COLLECTION_FILE_EXT))
    }

    /// Writes the collection file on the blocking pool.
    async fn persist(&self, name: &str, collection: LocalCollection) -> WordsResult<()> {
        let path = self.collection_path(name);
        tokio::task::spawn_blocking(move || write_collection_file(&path, &collection))
            .await
            .map_err(|e| WordsError::Internal(format!("Persist task failed: {}", e)))??;

        debug!(collection = name, "Persisted collection");
        Ok(())
    }
}

/// Writes to a temporary file, syncs it, then renames over the previous version.
/// The previous file is untouched unless every byte reached disk.
fn write_collection_file(path: &Path, collection: &LocalCollection) -> WordsResult<()> {
    let tmp_path = path.with_extension("json.tmp");

    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    serde_json::to_writer_pretty(&mut writer, collection)?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| WordsError::Store(format!("I/O error: {}", e.error())))?
        .sync_all()?;

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn validate_name(name: &str) -> WordsResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(WordsError::Validation(format!(
            "Invalid collection name: {:?}",
            name
        )))
    }
}

#[async_trait]
impl VectorStore for LocalStore {
    async fn list_collections(&self) -> WordsResult<Vec<String>> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn create_collection(&self, name: &str, params: VectorParams) -> WordsResult<()> {
        validate_name(name)?;

        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Err(WordsError::Store(format!(
                "Collection already exists: {}",
                name
            )));
        }

        let collection = LocalCollection {
            params,
            points: Vec::new(),
        };
        self.persist(name, collection.clone()).await?;
        collections.insert(name.to_string(), collection);
        Ok(())
    }

    async fn collection_info(&self, name: &str) -> WordsResult<CollectionInfo> {
        let collections = self.collections.read().await;
        let collection = collections
            .get(name)
            .ok_or_else(|| WordsError::CollectionNotFound(name.to_string()))?;

        let points_count = collection.points.len() as u64;
        Ok(CollectionInfo {
            name: name.to_string(),
            points_count,
            // One unnamed vector per point
            vectors_count: Some(points_count),
            vector_size: Some(collection.params.size),
        })
    }

    async fn upsert(&self, name: &str, points: Vec<VectorPoint>) -> WordsResult<()> {
        let mut collections = self.collections.write().await;
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| WordsError::CollectionNotFound(name.to_string()))?;

        if let Some(bad) = points
            .iter()
            .find(|p| p.vector.len() != collection.params.size)
        {
            return Err(WordsError::DimensionMismatch {
                expected: collection.params.size,
                actual: bad.vector.len(),
            });
        }

        let mut updated = collection.clone();
        for point in points {
            match updated.points.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => updated.points.push(point),
            }
        }

        self.persist(name, updated.clone()).await?;
        *collection = updated;
        Ok(())
    }

    async fn query(
        &self,
        name: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> WordsResult<Vec<ScoredPoint>> {
        let collections = self.collections.read().await;
        let collection = collections
            .get(name)
            .ok_or_else(|| WordsError::CollectionNotFound(name.to_string()))?;

        if vector.len() != collection.params.size {
            return Err(WordsError::DimensionMismatch {
                expected: collection.params.size,
                actual: vector.len(),
            });
        }

        let mut scored: Vec<ScoredPoint> = collection
            .points
            .iter()
            .map(|p| ScoredPoint {
                id: p.id,
                score: cosine(&vector, &p.vector),
                payload: Some(p.payload.clone()),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
        scored.truncate(limit);

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_create_and_list_collections() {
        let (_dir, store) = store();

        assert!(store.list_collections().await.unwrap().is_empty());

        store
            .create_collection("words_collection", VectorParams::cosine(3))
            .await
            .unwrap();

        assert_eq!(
            store.list_collections().await.unwrap(),
            vec!["words_collection".to_string()]
        );

        let info = store.collection_info("words_collection").await.unwrap();
        assert_eq!(info.points_count, 0);
        assert_eq!(info.vector_size, Some(3));
    }

    #[tokio::test]
    async fn test_create_duplicate_collection_fails() {
        let (_dir, store) = store();
        store
            .create_collection("words", VectorParams::cosine(3))
            .await
            .unwrap();

        let result = store.create_collection("words", VectorParams::cosine(3)).await;
        assert!(matches!(result, Err(WordsError::Store(_))));
    }

    #[tokio::test]
    async fn test_rejects_path_like_names() {
        let (_dir, store) = store();
        let result = store
            .create_collection("../escape", VectorParams::cosine(3))
            .await;
        assert!(matches!(result, Err(WordsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_collection_info_missing() {
        let (_dir, store) = store();
        let result = store.collection_info("missing").await;
        assert!(matches!(result, Err(WordsError::CollectionNotFound(name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let (_dir, store) = store();
        store
            .create_collection("words", VectorParams::cosine(2))
            .await
            .unwrap();

        store
            .upsert(
                "words",
                vec![
                    VectorPoint::new(0, vec![1.0, 0.0], "sun"),
                    VectorPoint::new(1, vec![0.0, 1.0], "rain"),
                ],
            )
            .await
            .unwrap();
        store
            .upsert("words", vec![VectorPoint::new(1, vec![0.5, 0.5], "snow")])
            .await
            .unwrap();

        let info = store.collection_info("words").await.unwrap();
        assert_eq!(info.points_count, 2);
        assert_eq!(info.vectors_count, Some(2));
    }

    #[tokio::test]
    async fn test_upsert_rejects_wrong_dimension() {
        let (_dir, store) = store();
        store
            .create_collection("words", VectorParams::cosine(3))
            .await
            .unwrap();

        let result = store
            .upsert("words", vec![VectorPoint::new(0, vec![1.0, 0.0], "sun")])
            .await;

        assert!(matches!(
            result,
            Err(WordsError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert_eq!(store.collection_info("words").await.unwrap().points_count, 0);
    }

    #[tokio::test]
    async fn test_query_ranks_by_cosine_similarity() {
        let (_dir, store) = store();
        store
            .create_collection("words", VectorParams::cosine(2))
            .await
            .unwrap();
        store
            .upsert(
                "words",
                vec![
                    VectorPoint::new(0, vec![0.0, 1.0], "rain"),
                    VectorPoint::new(1, vec![1.0, 0.0], "sun"),
                    VectorPoint::new(2, vec![1.0, 1.0], "sky"),
                ],
            )
            .await
            .unwrap();

        let results = store.query("words", vec![1.0, 0.1], 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 1);
        assert_eq!(results[1].id, 2);
        assert!(results[0].score >= results[1].score);
        assert_eq!(
            results[0].payload.as_ref().map(|p| p.word.as_str()),
            Some("sun")
        );
    }

    #[tokio::test]
    async fn test_query_ties_break_by_id() {
        let (_dir, store) = store();
        store
            .create_collection("words", VectorParams::cosine(2))
            .await
            .unwrap();
        store
            .upsert(
                "words",
                vec![
                    VectorPoint::new(7, vec![1.0, 0.0], "fire"),
                    VectorPoint::new(3, vec![2.0, 0.0], "sun"),
                ],
            )
            .await
            .unwrap();

        let results = store.query("words", vec![1.0, 0.0], 5).await.unwrap();
        let ids: Vec<u64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 7]);
    }

    #[tokio::test]
    async fn test_reopen_restores_points() {
        let dir = TempDir::new().unwrap();
        {
            let store = LocalStore::open(dir.path()).unwrap();
            store
                .create_collection("words", VectorParams::cosine(2))
                .await
                .unwrap();
            store
                .upsert("words", vec![VectorPoint::new(0, vec![1.0, 0.0], "sun")])
                .await
                .unwrap();
        }

        let reopened = LocalStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.list_collections().await.unwrap(),
            vec!["words".to_string()]
        );
        let results = reopened.query("words", vec![1.0, 0.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].payload.as_ref().unwrap().word, "sun");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        store
            .create_collection("words", VectorParams::cosine(2))
            .await
            .unwrap();
        store
            .upsert("words", vec![VectorPoint::new(0, vec![1.0, 0.0], "sun")])
            .await
            .unwrap();

        // A directory in the way of the temporary file makes the write fail
        fs::create_dir(dir.path().join("words.json.tmp")).unwrap();

        let result = store
            .upsert("words", vec![VectorPoint::new(1, vec![0.0, 1.0], "rain")])
            .await;

        assert!(matches!(result, Err(WordsError::Store(_))));
        assert_eq!(store.collection_info("words").await.unwrap().points_count, 1);

        fs::remove_dir(dir.path().join("words.json.tmp")).unwrap();
        let reopened = LocalStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.collection_info("words").await.unwrap().points_count,
            1
        );
    }

    #[test]
    fn test_write_collection_file_reports_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent").join("words.json");
        let collection = LocalCollection {
            params: VectorParams::cosine(2),
            points: vec![VectorPoint::new(0, vec![1.0, 0.0], "sun")],
        };

        let result = write_collection_file(&path, &collection);

        assert!(matches!(result, Err(WordsError::Store(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_collection_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        let collection = LocalCollection {
            params: VectorParams::cosine(2),
            points: vec![VectorPoint::new(0, vec![1.0, 0.0], "sun")],
        };

        write_collection_file(&path, &collection).unwrap();

        let loaded: LocalCollection =
            serde_json::from_reader(BufReader::new(File::open(&path).unwrap())).unwrap();
        assert_eq!(loaded.points.len(), 1);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
