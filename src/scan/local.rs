//! Local snapshot walker
//!
//! Walks the source tree with `std::fs`. Hidden entries are skipped, children
//! are ordered by name, and every file gets its source and mirror paths by
//! swapping the local root prefix. Any read failure aborts the walk.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

use super::Walker;
use crate::config::Settings;
use crate::error::SyncError;
use crate::logging::*;
use crate::types::{Directory, Entry, Side};
use crate::validation::{is_hidden_name, project_path};

/// Walks the local source tree
#[derive(Debug, Clone)]
pub struct LocalWalker {
	root: PathBuf,
	source_root: String,
	mirror_root: String,
}

impl LocalWalker {
	pub fn new(root: &Path, source_root: &str, mirror_root: &str) -> Self {
		LocalWalker {
			root: root.to_path_buf(),
			source_root: source_root.to_string(),
			mirror_root: mirror_root.to_string(),
		}
	}

	/// Walker for the configured local root and projections
	pub fn from_settings(settings: &Settings) -> Self {
		Self::new(&settings.local_root, &settings.source_root, settings.mirror_root())
	}

	/// Synchronously capture the whole local tree
	pub fn walk(&self) -> Result<Directory, SyncError> {
		self.walk_dir(&self.root)
	}

	fn project(&self, path: &Path, new_root: &str) -> Result<String, SyncError> {
		project_path(path, &self.root, new_root)
			.map_err(|_| SyncError::Projection { path: path.to_path_buf(), root: self.root.clone() })
	}

	fn walk_dir(&self, path: &Path) -> Result<Directory, SyncError> {
		let io_err = |p: &Path| {
			let p = p.to_path_buf();
			move |source| SyncError::LocalIo { path: p, source }
		};

		let mut dir = Directory {
			name: path
				.file_name()
				.map(|n| n.to_string_lossy().into_owned())
				.unwrap_or_else(|| path.to_string_lossy().into_owned()),
			path: path.to_string_lossy().into_owned(),
			..Default::default()
		};

		let mut entries = fs::read_dir(path)
			.map_err(io_err(path))?
			.collect::<Result<Vec<_>, _>>()
			.map_err(io_err(path))?;
		entries.sort_by_key(|e| e.file_name());

		for entry in entries {
			let name = entry.file_name().to_string_lossy().into_owned();
			if is_hidden_name(&name) {
				continue;
			}

			let entry_path = entry.path();
			let file_type = entry.file_type().map_err(io_err(&entry_path))?;

			if file_type.is_dir() {
				dir.dirs.push(self.walk_dir(&entry_path)?);
			} else if file_type.is_file() {
				let metadata = entry.metadata().map_err(io_err(&entry_path))?;
				let source_path = self.project(&entry_path, &self.source_root)?;
				let mirror_path = self.project(&entry_path, &self.mirror_root)?;
				dir.files.push(Entry::local(
					&name,
					metadata.len(),
					entry_path.to_string_lossy().into_owned(),
					source_path,
					mirror_path,
				));
			} else {
				debug!("Skipping {}: not a regular file or directory", entry_path.display());
			}
		}

		Ok(dir)
	}
}

#[async_trait]
impl Walker for LocalWalker {
	fn side(&self) -> Side {
		Side::Local
	}

	fn origin(&self) -> String {
		self.root.display().to_string()
	}

	fn root_path(&self) -> String {
		self.root.to_string_lossy().into_owned()
	}

	async fn capture(&self) -> Result<Directory, SyncError> {
		let walker = self.clone();
		let root = tokio::task::spawn_blocking(move || walker.walk())
			.await
			.map_err(|e| SyncError::Aborted { message: format!("local walk failed: {}", e) })??;
		info!(
			"Local snapshot: {} files in {} directories ({} bytes)",
			root.file_count(),
			root.dir_count(),
			root.total_size()
		);
		Ok(root)
	}
}


// vim: ts=4
