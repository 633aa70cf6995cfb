//! File-backed credential store.
//!
//! The whole store is a JSON document on disk, loaded into memory at open
//! and rewritten atomically (temp file + rename) on every mutation. Reads
//! on the serving path never touch the filesystem. The handle is cheaply
//! cloneable; all clones share the same state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::credential::Credential;

/// Errors produced by the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be read or written.
    #[error("failed to access credential store file: {0}")]
    Io(#[from] std::io::Error),

    /// The store file exists but does not parse as a credential list.
    #[error("credential store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Shared handle to the credential store.
#[derive(Clone)]
pub struct CredentialStore {
    path: Arc<PathBuf>,
    inner: Arc<RwLock<HashMap<Uuid, Credential>>>,
}

impl CredentialStore {
    /// Open the store at `path`, creating an empty one if the file does not
    /// exist yet. The file itself is only written on the first mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read and
    /// [`StoreError::Corrupt`] if it cannot be parsed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let records = if path.exists() {
            let bytes = std::fs::read(path)?;
            let list: Vec<Credential> = serde_json::from_slice(&bytes)?;
            list.into_iter().map(|c| (c.id, c)).collect()
        } else {
            HashMap::new()
        };
        Ok(Self {
            path: Arc::new(path.to_owned()),
            inner: Arc::new(RwLock::new(records)),
        })
    }

    /// Number of credentials currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Look up a credential by id.
    pub async fn get(&self, id: &Uuid) -> Option<Credential> {
        self.inner.read().await.get(id).cloned()
    }

    /// All credentials, ordered by id for stable output.
    pub async fn list(&self) -> Vec<Credential> {
        let mut records: Vec<Credential> = self.inner.read().await.values().cloned().collect();
        records.sort_by_key(|c| c.id);
        records
    }

    /// Insert (or replace) a credential and persist the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the store file cannot be rewritten; the
    /// in-memory state is rolled back so memory and disk stay consistent.
    pub async fn insert(&self, credential: Credential) -> Result<(), StoreError> {
        let id = credential.id;
        let mut records = self.inner.write().await;
        let previous = records.insert(id, credential);
        if let Err(err) = self.persist(&records).await {
            match previous {
                Some(old) => records.insert(id, old),
                None => records.remove(&id),
            };
            return Err(err);
        }
        Ok(())
    }

    /// Remove a credential by id, persisting on change.
    ///
    /// Returns `true` if a credential was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the store file cannot be rewritten; the
    /// removed record is restored on failure.
    pub async fn remove(&self, id: &Uuid) -> Result<bool, StoreError> {
        let mut records = self.inner.write().await;
        let Some(removed) = records.remove(id) else {
            return Ok(false);
        };
        if let Err(err) = self.persist(&records).await {
            records.insert(removed.id, removed);
            return Err(err);
        }
        Ok(true)
    }

    /// Rewrite the store file: serialise to a temp file, then rename over
    /// the real path so readers never observe a half-written store.
    async fn persist(&self, records: &HashMap<Uuid, Credential>) -> Result<(), StoreError> {
        let mut list: Vec<&Credential> = records.values().collect();
        list.sort_by_key(|c| c.id);
        let bytes = serde_json::to_vec_pretty(&list)?;

        let temp = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, self.path.as_ref()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir().join(format!("credseal-store-{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn opens_empty_when_the_file_is_missing() {
        let path = temp_store_path();
        let store = CredentialStore::open(&path).unwrap();
        assert_eq!(store.len().await, 0);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn insert_get_remove() {
        let path = temp_store_path();
        let store = CredentialStore::open(&path).unwrap();

        let credential = Credential::new("alice", "hunter2");
        let id = credential.id;
        store.insert(credential).await.unwrap();

        assert_eq!(store.len().await, 1);
        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.user, "alice");

        assert!(store.remove(&id).await.unwrap());
        assert!(!store.remove(&id).await.unwrap());
        assert_eq!(store.len().await, 0);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let path = temp_store_path();
        {
            let store = CredentialStore::open(&path).unwrap();
            store.insert(Credential::new("alice", "hunter2")).await.unwrap();
            store.insert(Credential::new("bob", "swordfish")).await.unwrap();
        }

        let reopened = CredentialStore::open(&path).unwrap();
        assert_eq!(reopened.len().await, 2);
        let users: Vec<String> = reopened.list().await.into_iter().map(|c| c.user.clone()).collect();
        assert!(users.contains(&"alice".to_owned()));
        assert!(users.contains(&"bob".to_owned()));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn corrupt_store_file_is_rejected() {
        let path = temp_store_path();
        std::fs::write(&path, b"definitely not json").unwrap();
        assert!(matches!(
            CredentialStore::open(&path),
            Err(StoreError::Corrupt(_))
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let path = temp_store_path();
        let store = CredentialStore::open(&path).unwrap();
        for i in 0..5 {
            store
                .insert(Credential::new(&format!("user-{i}"), "pw"))
                .await
                .unwrap();
        }
        let listed = store.list().await;
        assert_eq!(listed.len(), 5);
        let ids: Vec<Uuid> = listed.iter().map(|c| c.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        let _ = std::fs::remove_file(&path);
    }
}
