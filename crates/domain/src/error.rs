/// Shared error type used across all PRSense crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// The shared usage document could not be read or written: network
    /// failure, non-success status, timeout, or exhausted conditional-write
    /// retries. Always a hard failure for the operation that needed it.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A conditional write was rejected because the named file changed
    /// since it was last read. Callers re-read and retry.
    #[error("version conflict on {file}")]
    VersionConflict { file: String },

    /// Stored file content does not parse as a usage record. Treated as
    /// corrupt state; the invocation fails rather than resetting the
    /// tenant's history.
    #[error("malformed usage record in {file}: {message}")]
    MalformedRecord { file: String, message: String },

    #[error("github: {0}")]
    Github(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),
}

pub type Result<T> = std::result::Result<T, Error>;
