//! Remote snapshot walker
//!
//! Lists the mount depth-first through a [`RemoteStore`]. A missing path is an
//! empty directory. Any other listing failure is logged and that subtree is
//! left out so the rest of the mount is still captured.
//!
//! At most `concurrency` listings are in flight across the whole walk.

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::Walker;
use crate::config::Settings;
use crate::error::SyncError;
use crate::logging::*;
use crate::protocol::{ListKind, RemoteStore};
use crate::types::{Directory, Entry, Side};
use crate::validation::join_remote;

/// Walks a remote mount through a [`RemoteStore`]
pub struct RemoteWalker {
	store: Arc<dyn RemoteStore>,
	root: String,
	/// Sibling subdirectories listed concurrently (1 = strictly sequential)
	concurrency: usize,
	/// One permit per listing call, shared by every level of the walk
	permits: Semaphore,
	skipped: AtomicUsize,
}

impl RemoteWalker {
	pub fn new(store: Arc<dyn RemoteStore>, root: &str, concurrency: usize) -> Self {
		let concurrency = concurrency.max(1);
		RemoteWalker {
			store,
			root: root.to_string(),
			concurrency,
			permits: Semaphore::new(concurrency),
			skipped: AtomicUsize::new(0),
		}
	}

	/// Walker for the configured mount root
	pub fn from_settings(store: Arc<dyn RemoteStore>, settings: &Settings) -> Self {
		Self::new(store, &settings.mount_root, settings.remote_concurrency)
	}

	/// Number of subtrees left out because their listing failed
	pub fn skipped(&self) -> usize {
		self.skipped.load(Ordering::Relaxed)
	}

	/// Capture the tree below `path`
	///
	/// Returns `None` when the listing failed with anything but "not found".
	/// Children are listed through an ordered buffer, so the resulting tree
	/// has the same shape whatever the concurrency.
	fn walk_dir(&self, path: String) -> BoxFuture<'_, Option<Directory>> {
		Box::pin(async move {
			let mut dir = Directory::empty(&path);

			// The permit is released before recursing, so parents never hold
			// one while their children wait.
			let result = match self.permits.acquire().await {
				Ok(_permit) => self.store.list(&path).await,
				Err(e) => {
					warn!("Cannot list {}: {}", path, e);
					self.skipped.fetch_add(1, Ordering::Relaxed);
					return None;
				}
			};

			let listing = match result {
				Ok(listing) => listing,
				Err(e) if e.is_not_found() => {
					debug!("{} does not exist yet, treating as empty", path);
					return Some(dir);
				}
				Err(e) => {
					warn!("Skipping remote subtree {}: {}", path, e);
					self.skipped.fetch_add(1, Ordering::Relaxed);
					return None;
				}
			};

			let mut subdirs = Vec::new();
			for item in listing {
				match item.kind {
					ListKind::File => {
						let file_path = join_remote(&path, &item.name);
						dir.files.push(Entry::remote(&item.name, item.size, item.hash, file_path));
					}
					ListKind::Directory => subdirs.push(join_remote(&path, &item.name)),
					ListKind::Unknown(code) => {
						warn!("Ignoring {} in {}: unknown entry type {}", item.name, path, code);
					}
				}
			}

			let children: Vec<Option<Directory>> = stream::iter(subdirs)
				.map(|sub| self.walk_dir(sub))
				.buffered(self.concurrency)
				.collect()
				.await;
			dir.dirs.extend(children.into_iter().flatten());

			Some(dir)
		})
	}
}

#[async_trait]
impl Walker for RemoteWalker {
	fn side(&self) -> Side {
		Side::Remote
	}

	fn origin(&self) -> String {
		format!("{} ({})", self.store.endpoint(), self.root)
	}

	fn root_path(&self) -> String {
		self.root.clone()
	}

	async fn capture(&self) -> Result<Directory, SyncError> {
		self.skipped.store(0, Ordering::Relaxed);
		let root = match self.walk_dir(self.root.clone()).await {
			Some(root) => root,
			None => {
				warn!("Root listing of {} failed, remote snapshot is empty", self.root);
				Directory::empty(&self.root)
			}
		};
		info!(
			"Remote snapshot: {} files in {} directories ({} subtrees skipped)",
			root.file_count(),
			root.dir_count(),
			self.skipped()
		);
		Ok(root)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::protocol::{ListEntry, RemoteError, RemoteResult};
	use std::collections::HashMap;

	/// Fake store: path -> listing; absent paths are "not found", paths in
	/// `broken` fail with a transport error
	#[derive(Default)]
	struct FakeStore {
		listings: HashMap<String, Vec<ListEntry>>,
		broken: Vec<String>,
	}

	#[async_trait]
	impl RemoteStore for FakeStore {
		fn endpoint(&self) -> String {
			"fake".to_string()
		}

		async fn list(&self, path: &str) -> RemoteResult<Vec<ListEntry>> {
			if self.broken.iter().any(|b| b == path) {
				return Err(RemoteError::Transport("connection reset".to_string()));
			}
			self.listings
				.get(path)
				.cloned()
				.ok_or_else(|| RemoteError::NotFound { path: path.to_string() })
		}
	}

	fn library() -> FakeStore {
		let mut store = FakeStore::default();
		store.listings.insert(
			"/lib".to_string(),
			vec![
				ListEntry::file("a.txt", 10, "QmA"),
				ListEntry::directory("books"),
				ListEntry::directory("music"),
			],
		);
		store.listings.insert("/lib/books".to_string(), vec![ListEntry::file("b.epub", 5, "QmB")]);
		store.listings.insert("/lib/music".to_string(), vec![]);
		store
	}

	#[tokio::test]
	async fn test_capture_builds_tree() {
		let walker = RemoteWalker::new(Arc::new(library()), "/lib", 1);
		let root = walker.capture().await.unwrap();

		assert_eq!(root.name, "lib");
		assert_eq!(root.files.len(), 1);
		assert_eq!(root.files[0].path, "/lib/a.txt");
		assert_eq!(root.files[0].fingerprint.as_deref(), Some("QmA"));
		assert_eq!(root.dirs.len(), 2);
		let books = root.dir("books").unwrap();
		assert_eq!(books.path, "/lib/books");
		assert_eq!(books.files[0].path, "/lib/books/b.epub");
		assert!(root.dir("music").unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_missing_root_is_empty() {
		let walker = RemoteWalker::new(Arc::new(FakeStore::default()), "/missing", 1);
		let root = walker.capture().await.unwrap();
		assert!(root.is_empty());
		assert_eq!(root.path, "/missing");
		assert_eq!(walker.skipped(), 0);
	}

	#[tokio::test]
	async fn test_failed_subtree_is_omitted() {
		let mut store = library();
		store.broken.push("/lib/books".to_string());
		let walker = RemoteWalker::new(Arc::new(store), "/lib", 1);
		let root = walker.capture().await.unwrap();

		assert!(root.dir("books").is_none());
		assert!(root.dir("music").is_some());
		assert_eq!(root.files.len(), 1);
		assert_eq!(walker.skipped(), 1);
	}

	#[tokio::test]
	async fn test_unknown_kind_is_ignored() {
		let mut store = FakeStore::default();
		store.listings.insert(
			"/lib".to_string(),
			vec![
				ListEntry { name: "weird".to_string(), kind: ListKind::Unknown(2), size: 0, hash: None },
				ListEntry::file("a", 1, "Qm"),
			],
		);
		let walker = RemoteWalker::new(Arc::new(store), "/lib", 1);
		let root = walker.capture().await.unwrap();
		assert_eq!(root.files.len(), 1);
		assert!(root.dirs.is_empty());
	}

	#[tokio::test]
	async fn test_concurrent_walk_has_same_shape() {
		let sequential = RemoteWalker::new(Arc::new(library()), "/lib", 1).capture().await.unwrap();
		let concurrent = RemoteWalker::new(Arc::new(library()), "/lib", 8).capture().await.unwrap();
		assert_eq!(sequential, concurrent);
	}

	/// Every directory above `depth` has `fanout` subdirectories; each
	/// listing sleeps briefly and records how many calls overlap
	struct SlowTree {
		fanout: usize,
		depth: usize,
		in_flight: AtomicUsize,
		peak: AtomicUsize,
	}

	#[async_trait]
	impl RemoteStore for SlowTree {
		fn endpoint(&self) -> String {
			"slow".to_string()
		}

		async fn list(&self, path: &str) -> RemoteResult<Vec<ListEntry>> {
			let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
			self.peak.fetch_max(now, Ordering::SeqCst);
			tokio::time::sleep(std::time::Duration::from_millis(10)).await;
			self.in_flight.fetch_sub(1, Ordering::SeqCst);

			let level = path.matches('/').count() - 1;
			if level >= self.depth {
				return Ok(vec![]);
			}
			Ok((0..self.fanout).map(|i| ListEntry::directory(&format!("d{}", i))).collect())
		}
	}

	#[tokio::test]
	async fn test_listings_in_flight_are_bounded_across_levels() {
		let store = Arc::new(SlowTree {
			fanout: 4,
			depth: 3,
			in_flight: AtomicUsize::new(0),
			peak: AtomicUsize::new(0),
		});
		let walker = RemoteWalker::new(store.clone(), "/r", 4);
		let root = walker.capture().await.unwrap();

		assert_eq!(root.dir_count(), 4 + 16 + 64);
		let peak = store.peak.load(Ordering::SeqCst);
		assert!(peak <= 4, "{} listings in flight with a limit of 4", peak);
		assert!(peak > 1, "walk never listed concurrently");
	}

	#[tokio::test]
	async fn test_skipped_count_is_per_capture() {
		let mut store = library();
		store.broken.push("/lib/books".to_string());
		let walker = RemoteWalker::new(Arc::new(store), "/lib", 1);

		walker.capture().await.unwrap();
		walker.capture().await.unwrap();
		assert_eq!(walker.skipped(), 1);
	}
}

// vim: ts=4
