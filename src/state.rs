//! Snapshot persistence
//!
//! A snapshot file holds one JSON document and is always rewritten whole.
//! Loading is best effort: a missing or unreadable document means the walker
//! runs again. Writing is not: a snapshot that cannot be saved aborts the run.

use std::path::{Path, PathBuf};

use crate::error::{SnapshotError, SyncError};
use crate::logging::*;
use crate::scan::Walker;
use crate::types::Snapshot;

/// How a snapshot was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
	/// Read back from the snapshot file
	Loaded,
	/// Freshly walked and written to the snapshot file
	Captured,
}

/// Persistent snapshot file for one side of the mirror
pub struct SnapshotStore {
	path: PathBuf,
}

impl SnapshotStore {
	pub fn new(path: &Path) -> Self {
		SnapshotStore { path: path.to_path_buf() }
	}

	/// Get snapshot file path
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Load the persisted snapshot if it exists
	pub async fn load(&self) -> Result<Option<Snapshot>, SnapshotError> {
		let contents = match tokio::fs::read_to_string(&self.path).await {
			Ok(contents) => contents,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(SnapshotError::LoadFailed { path: self.path.clone(), source: e }),
		};

		serde_json::from_str(&contents).map(Some).map_err(|e| SnapshotError::Corrupted {
			path: self.path.clone(),
			message: format!("Failed to parse snapshot JSON: {}", e),
		})
	}

	/// Overwrite the snapshot file
	pub async fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			if !parent.exists() {
				tokio::fs::create_dir_all(parent)
					.await
					.map_err(|e| SnapshotError::SaveFailed { path: self.path.clone(), source: e })?;
			}
		}

		let json = serde_json::to_string(snapshot)
			.map_err(|e| SnapshotError::EncodeFailed { message: e.to_string() })?;

		tokio::fs::write(&self.path, json)
			.await
			.map_err(|e| SnapshotError::SaveFailed { path: self.path.clone(), source: e })
	}

	/// Reuse the persisted snapshot, or capture and persist a new one
	///
	/// The walker runs when `refresh` is set, when the file is missing, when
	/// it cannot be read or parsed, when it was captured from the other side,
	/// or when its root is not the walker's root.
	/// Only a failed walk or a failed write is returned as an error.
	pub async fn load_or_capture(
		&self,
		refresh: bool,
		walker: &dyn Walker,
	) -> Result<(Snapshot, SnapshotOrigin), SyncError> {
		if refresh {
			debug!("Refresh requested, ignoring {}", self.path.display());
		} else {
			match self.load().await {
				Ok(Some(snapshot)) if snapshot.source != walker.side() => warn!(
					"{} holds a {} snapshot, expected {}; rebuilding",
					self.path.display(),
					snapshot.source,
					walker.side()
				),
				Ok(Some(snapshot)) if snapshot.root.path != walker.root_path() => warn!(
					"{} was captured from {}, not {}; rebuilding",
					self.path.display(),
					snapshot.root.path,
					walker.root_path()
				),
				Ok(Some(snapshot)) => {
					info!("Loaded {} snapshot from {}", snapshot.source, self.path.display());
					return Ok((snapshot, SnapshotOrigin::Loaded));
				}
				Ok(None) => info!("No snapshot at {}, doing full refresh", self.path.display()),
				Err(e) => warn!("{}; rebuilding", e),
			}
		}

		let root = walker.capture().await?;
		let snapshot = Snapshot::capture(walker.side(), root);
		self.save(&snapshot).await?;
		info!("Saved {} snapshot to {}", snapshot.source, self.path.display());
		Ok((snapshot, SnapshotOrigin::Captured))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{Directory, Entry, Side};
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use tempfile::TempDir;

	struct CountingWalker {
		side: Side,
		root: &'static str,
		calls: AtomicUsize,
	}

	impl CountingWalker {
		fn new(side: Side) -> Self {
			Self::at(side, "/lib")
		}

		fn at(side: Side, root: &'static str) -> Self {
			CountingWalker { side, root, calls: AtomicUsize::new(0) }
		}
	}

	#[async_trait]
	impl Walker for CountingWalker {
		fn side(&self) -> Side {
			self.side
		}

		fn origin(&self) -> String {
			"counting".to_string()
		}

		fn root_path(&self) -> String {
			self.root.to_string()
		}

		async fn capture(&self) -> Result<Directory, SyncError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			let mut root = Directory::empty(self.root);
			root.files.push(Entry::remote("a", 10, Some("QmA".to_string()), format!("{}/a", self.root)));
			root.dirs.push(Directory::empty(&format!("{}/sub", self.root)));
			Ok(root)
		}
	}

	#[tokio::test]
	async fn test_missing_file_captures_and_saves() {
		let tmp = TempDir::new().unwrap();
		let store = SnapshotStore::new(&tmp.path().join("remote.json"));
		let walker = CountingWalker::new(Side::Remote);

		let (snapshot, origin) = store.load_or_capture(false, &walker).await.unwrap();
		assert_eq!(origin, SnapshotOrigin::Captured);
		assert_eq!(walker.calls.load(Ordering::SeqCst), 1);
		assert!(store.path().exists());
		assert_eq!(snapshot.root.files.len(), 1);
	}

	#[tokio::test]
	async fn test_second_run_loads_without_walking() {
		let tmp = TempDir::new().unwrap();
		let store = SnapshotStore::new(&tmp.path().join("remote.json"));
		let walker = CountingWalker::new(Side::Remote);

		let (first, _) = store.load_or_capture(false, &walker).await.unwrap();
		let (second, origin) = store.load_or_capture(false, &walker).await.unwrap();
		assert_eq!(origin, SnapshotOrigin::Loaded);
		assert_eq!(walker.calls.load(Ordering::SeqCst), 1);
		assert_eq!(first, second);
	}

	#[tokio::test]
	async fn test_refresh_always_walks() {
		let tmp = TempDir::new().unwrap();
		let store = SnapshotStore::new(&tmp.path().join("remote.json"));
		let walker = CountingWalker::new(Side::Remote);

		store.load_or_capture(false, &walker).await.unwrap();
		let (_, origin) = store.load_or_capture(true, &walker).await.unwrap();
		assert_eq!(origin, SnapshotOrigin::Captured);
		assert_eq!(walker.calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn test_corrupted_file_is_rebuilt() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("remote.json");
		std::fs::write(&path, b"{ invalid json").unwrap();
		let store = SnapshotStore::new(&path);

		assert!(matches!(store.load().await, Err(SnapshotError::Corrupted { .. })));

		let walker = CountingWalker::new(Side::Remote);
		let (_, origin) = store.load_or_capture(false, &walker).await.unwrap();
		assert_eq!(origin, SnapshotOrigin::Captured);
		assert!(store.load().await.unwrap().is_some());
	}

	#[tokio::test]
	async fn test_wrong_side_is_rebuilt() {
		let tmp = TempDir::new().unwrap();
		let store = SnapshotStore::new(&tmp.path().join("snap.json"));
		store.load_or_capture(false, &CountingWalker::new(Side::Remote)).await.unwrap();

		let local = CountingWalker::new(Side::Local);
		let (snapshot, origin) = store.load_or_capture(false, &local).await.unwrap();
		assert_eq!(origin, SnapshotOrigin::Captured);
		assert_eq!(snapshot.source, Side::Local);
	}

	#[tokio::test]
	async fn test_moved_root_is_rebuilt() {
		let tmp = TempDir::new().unwrap();
		let store = SnapshotStore::new(&tmp.path().join("remote.json"));
		store.load_or_capture(false, &CountingWalker::at(Side::Remote, "/lib")).await.unwrap();

		let moved = CountingWalker::at(Side::Remote, "/library");
		let (snapshot, origin) = store.load_or_capture(false, &moved).await.unwrap();
		assert_eq!(origin, SnapshotOrigin::Captured);
		assert_eq!(moved.calls.load(Ordering::SeqCst), 1);
		assert_eq!(snapshot.root.path, "/library");
		assert_eq!(store.load().await.unwrap().unwrap().root.path, "/library");
	}

	#[tokio::test]
	async fn test_local_snapshot_survives_reload() {
		let tmp = TempDir::new().unwrap();
		let store = SnapshotStore::new(&tmp.path().join("local.json"));

		let mut books = Directory::empty("/srv/lib/books");
		books.files.push(Entry::local(
			"b.epub",
			5,
			"/srv/lib/books/b.epub".to_string(),
			"/src/lib/books/b.epub".to_string(),
			"/The Library/books/b.epub".to_string(),
		));
		let mut root = Directory::empty("/srv/lib");
		root.files.push(Entry::local(
			"a.txt",
			10,
			"/srv/lib/a.txt".to_string(),
			"/src/lib/a.txt".to_string(),
			"/The Library/a.txt".to_string(),
		));
		root.dirs.push(books);
		root.dirs.push(Directory::empty("/srv/lib/empty"));
		let snapshot = Snapshot::capture(Side::Local, root);

		store.save(&snapshot).await.unwrap();
		let loaded = store.load().await.unwrap().expect("snapshot should exist");
		assert_eq!(loaded, snapshot);

		let b = loaded.root.dir("books").unwrap().file("b.epub").unwrap();
		assert_eq!(b.source_path.as_deref(), Some("/src/lib/books/b.epub"));
		assert_eq!(b.mirror_path.as_deref(), Some("/The Library/books/b.epub"));
		assert_eq!(b.fingerprint, None);
	}

	#[tokio::test]
	async fn test_save_into_unwritable_location_fails() {
		let tmp = TempDir::new().unwrap();
		// A regular file where the parent directory should be
		let blocker = tmp.path().join("blocker");
		std::fs::write(&blocker, b"").unwrap();
		let store = SnapshotStore::new(&blocker.join("snap.json"));

		let err = store.load_or_capture(true, &CountingWalker::new(Side::Remote)).await.unwrap_err();
		assert!(matches!(err, SyncError::Snapshot(SnapshotError::SaveFailed { .. })));
	}
}

// vim: ts=4
