use prs_domain::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Version token + fetch result
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Version token captured by [`DocumentStore::get`] and consumed by
/// [`DocumentStore::put`].
///
/// `etag` identifies the backing document as a whole (shared by every file
/// in it); `fingerprint` identifies the named file's content at fetch time,
/// with `None` meaning the file did not exist. Conflict detection for a
/// tenant is decided on the fingerprint alone, so tenants sharing the
/// document never conflict with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocVersion {
    pub etag: Option<String>,
    pub fingerprint: Option<String>,
}

/// Result of fetching one named file from the shared document.
///
/// Absence is data, not an error: `content` is `None` when the file does
/// not exist yet. Synthesizing a default record for a new tenant is the
/// ledger's job, never the store's.
#[derive(Debug, Clone)]
pub struct FetchedDoc {
    pub content: Option<String>,
    pub version: DocVersion,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Abstraction over the shared usage document.
///
/// Implementations may talk to the real gist REST API or hold the files in
/// memory for tests and dry runs. All methods return
/// `prs_domain::error::Result`.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one named file and its version token.
    ///
    /// Fails with [`Error::StoreUnavailable`] when the backend cannot be
    /// read; a missing file is a successful fetch with `content: None`.
    ///
    /// [`Error::StoreUnavailable`]: prs_domain::error::Error::StoreUnavailable
    async fn get(&self, name: &str) -> Result<FetchedDoc>;

    /// Replace the named file's content, conditional on `expected`.
    ///
    /// Fails with [`Error::VersionConflict`] when the file's content has
    /// changed since the `get` that produced `expected`; the caller must
    /// re-read and retry. Other failures surface as
    /// [`Error::StoreUnavailable`].
    ///
    /// [`Error::VersionConflict`]: prs_domain::error::Error::VersionConflict
    /// [`Error::StoreUnavailable`]: prs_domain::error::Error::StoreUnavailable
    async fn put(&self, name: &str, content: &str, expected: &DocVersion) -> Result<()>;
}
