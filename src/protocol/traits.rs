//! Core trait defining the remote store listing interface
//!
//! The remote walker depends only on this trait. The Kubo RPC adapter is one
//! implementation; tests use an in-memory one.

use async_trait::async_trait;

use super::error::RemoteError;
use super::types::ListEntry;

/// Result type for remote store operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// A mutable, path-addressed view of a content-addressed store
#[async_trait]
pub trait RemoteStore: Send + Sync {
	/// Human readable endpoint, used in status lines
	fn endpoint(&self) -> String;

	/// List the direct children of `path`
	///
	/// Returns `RemoteError::NotFound` when `path` does not exist.
	async fn list(&self, path: &str) -> RemoteResult<Vec<ListEntry>>;
}

// vim: ts=4
