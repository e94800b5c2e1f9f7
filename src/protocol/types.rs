//! Store-agnostic listing types
//!
//! Adapters translate their own listing format into these so that the remote
//! walker never sees wire-level type codes.

/// Classification of a listing entry, decided by the store adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
	File,
	Directory,
	/// A code the adapter does not recognise; kept for diagnostics
	Unknown(i64),
}

/// One child reported by a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
	pub name: String,
	pub kind: ListKind,
	pub size: u64,
	/// Content identifier, if the store reports one
	pub hash: Option<String>,
}

impl ListEntry {
	pub fn file(name: &str, size: u64, hash: &str) -> Self {
		ListEntry {
			name: name.to_string(),
			kind: ListKind::File,
			size,
			hash: if hash.is_empty() { None } else { Some(hash.to_string()) },
		}
	}

	pub fn directory(name: &str) -> Self {
		ListEntry { name: name.to_string(), kind: ListKind::Directory, size: 0, hash: None }
	}
}

// vim: ts=4
