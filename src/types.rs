//! Snapshot data model shared by both walkers, the snapshot store and the diff engine

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of a captured entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
	File,
	Dir,
}

/// A single file inside a [`Directory`]
///
/// Remote entries carry a fingerprint (the store's content identifier).
/// Local entries carry the two projected paths instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: EntryKind,
	pub size: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fingerprint: Option<String>,
	pub path: String,
	/// Path the file is addressed by once hosted remotely
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_path: Option<String>,
	/// Path the file occupies inside the remote mount
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub mirror_path: Option<String>,
}

impl Entry {
	/// File entry as reported by the remote store
	pub fn remote(name: &str, size: u64, fingerprint: Option<String>, path: String) -> Self {
		Entry {
			name: name.to_string(),
			kind: EntryKind::File,
			size,
			fingerprint,
			path,
			source_path: None,
			mirror_path: None,
		}
	}

	/// File entry found on the local filesystem, with both projections
	pub fn local(
		name: &str,
		size: u64,
		path: String,
		source_path: String,
		mirror_path: String,
	) -> Self {
		Entry {
			name: name.to_string(),
			kind: EntryKind::File,
			size,
			fingerprint: None,
			path,
			source_path: Some(source_path),
			mirror_path: Some(mirror_path),
		}
	}
}

/// A directory node owning its child directories and files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
	pub name: String,
	/// Filesystem or remote path this directory was captured from
	pub path: String,
	#[serde(default)]
	pub dirs: Vec<Directory>,
	#[serde(default)]
	pub files: Vec<Entry>,
}

impl Directory {
	/// Empty directory named after the last component of `path`
	pub fn empty(path: &str) -> Self {
		Directory { name: last_component(path).to_string(), path: path.to_string(), ..Default::default() }
	}

	pub fn is_empty(&self) -> bool {
		self.dirs.is_empty() && self.files.is_empty()
	}

	/// Child directory by exact name
	pub fn dir(&self, name: &str) -> Option<&Directory> {
		self.dirs.iter().find(|d| d.name == name)
	}

	/// Child file by exact name
	pub fn file(&self, name: &str) -> Option<&Entry> {
		self.files.iter().find(|f| f.name == name)
	}

	/// Number of files in this subtree
	pub fn file_count(&self) -> usize {
		self.files.len() + self.dirs.iter().map(Directory::file_count).sum::<usize>()
	}

	/// Number of directories below this one
	pub fn dir_count(&self) -> usize {
		self.dirs.len() + self.dirs.iter().map(Directory::dir_count).sum::<usize>()
	}

	/// Total bytes of all files in this subtree
	pub fn total_size(&self) -> u64 {
		self.files.iter().map(|f| f.size).sum::<u64>()
			+ self.dirs.iter().map(Directory::total_size).sum::<u64>()
	}
}

/// Last non-empty `/`-separated component, or the whole string for roots
pub fn last_component(path: &str) -> &str {
	path.trim_end_matches('/').rsplit('/').next().filter(|s| !s.is_empty()).unwrap_or(path)
}

/// Which side of the mirror a snapshot describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
	Remote,
	Local,
}

impl std::fmt::Display for Side {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Side::Remote => write!(f, "remote"),
			Side::Local => write!(f, "local"),
		}
	}
}

/// A captured tree plus when and from where it was taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
	pub source: Side,
	/// Unix seconds
	pub captured_at: u64,
	pub root: Directory,
}

impl Snapshot {
	/// Wrap a freshly walked tree, stamping it with the current time
	pub fn capture(source: Side, root: Directory) -> Self {
		let captured_at =
			SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
		Snapshot { source, captured_at, root }
	}
}


// vim: ts=4
