//! Versioned access to the shared usage document.
//!
//! The document is one hosted gist containing one file per tenant. The
//! [`DocumentStore`] trait is a dumb key/value accessor with a twist: every
//! read returns a version token, and every write is conditional on it. That
//! token is what turns the naive read-modify-write pattern into one that is
//! safe under concurrent invocations: a stale write is rejected instead of
//! silently clobbering someone else's increment.

pub mod gist;
pub mod memory;
pub mod store;

// Re-exports for convenience.
pub use gist::GistStore;
pub use memory::MemoryStore;
pub use store::{DocumentStore, DocVersion, FetchedDoc};
