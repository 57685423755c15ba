//! In-memory implementation of [`DocumentStore`] for tests and dry runs.
//!
//! Files live in a map guarded by a mutex; each write bumps a per-file
//! sequence number that doubles as the version fingerprint, so conditional
//! writes behave exactly like the gist-backed store: a stale token is
//! rejected with a conflict.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use prs_domain::error::{Error, Result};

use crate::store::{DocVersion, DocumentStore, FetchedDoc};

#[derive(Debug, Default)]
struct MemoryFile {
    content: String,
    sequence: u64,
}

/// A versioned in-memory document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<String, MemoryFile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a file directly, bypassing version checks. Test setup only.
    pub fn seed(&self, name: &str, content: &str) {
        let mut files = self.files.lock();
        let sequence = files.get(name).map(|f| f.sequence + 1).unwrap_or(1);
        files.insert(
            name.to_owned(),
            MemoryFile {
                content: content.to_owned(),
                sequence,
            },
        );
    }

    /// Current content of a file, if any.
    pub fn content_of(&self, name: &str) -> Option<String> {
        self.files.lock().get(name).map(|f| f.content.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<FetchedDoc> {
        let files = self.files.lock();
        match files.get(name) {
            Some(file) => Ok(FetchedDoc {
                content: Some(file.content.clone()),
                version: DocVersion {
                    etag: None,
                    fingerprint: Some(file.sequence.to_string()),
                },
            }),
            None => Ok(FetchedDoc {
                content: None,
                version: DocVersion {
                    etag: None,
                    fingerprint: None,
                },
            }),
        }
    }

    async fn put(&self, name: &str, content: &str, expected: &DocVersion) -> Result<()> {
        let mut files = self.files.lock();
        let current = files.get(name).map(|f| f.sequence.to_string());

        if current != expected.fingerprint {
            return Err(Error::VersionConflict {
                file: name.to_owned(),
            });
        }

        let sequence = files.get(name).map(|f| f.sequence + 1).unwrap_or(1);
        files.insert(
            name.to_owned(),
            MemoryFile {
                content: content.to_owned(),
                sequence,
            },
        );
        Ok(())
    }
}
