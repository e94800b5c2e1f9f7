//! Snapshot walkers
//!
//! A [`Walker`] captures one side of the mirror as a [`Directory`] tree. The
//! remote walker tolerates listing failures; the local walker does not.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::types::{Directory, Side};

pub mod local;
pub mod remote;

pub use local::LocalWalker;
pub use remote::RemoteWalker;

/// Something that can capture a fresh tree for one side
#[async_trait]
pub trait Walker: Send + Sync {
	/// Side the captured tree describes
	fn side(&self) -> Side;

	/// Where the tree is captured from, for status lines
	fn origin(&self) -> String;

	/// `path` of the root directory a capture produces
	fn root_path(&self) -> String;

	/// Walk the whole tree
	async fn capture(&self) -> Result<Directory, SyncError>;
}

// vim: ts=4
