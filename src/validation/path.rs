//! Path helpers
//!
//! Remote paths are plain `/`-separated strings. Local paths are `Path`s and
//! get projected onto remote prefixes by swapping the local root.

use std::path::{Component, Path};

use super::ValidationError;

/// Names starting with this marker are never captured from the local tree
pub const HIDDEN_MARKER: char = '.';

/// Check if a local entry name is hidden
pub fn is_hidden_name(name: &str) -> bool {
	name.starts_with(HIDDEN_MARKER)
}

/// Strip trailing slashes from a remote root, keeping a bare `/` intact
pub fn normalize_remote_root(root: &str) -> String {
	let trimmed = root.trim_end_matches('/');
	if trimmed.is_empty() && root.starts_with('/') {
		"/".to_string()
	} else {
		trimmed.to_string()
	}
}

/// Join a name onto a remote directory path
pub fn join_remote(base: &str, name: &str) -> String {
	if base.ends_with('/') {
		format!("{}{}", base, name)
	} else {
		format!("{}/{}", base, name)
	}
}

/// Replace the `local_root` prefix of `path` with the remote prefix `new_root`
///
/// # Returns
/// The projected remote path, or `Err(ValidationError)` if `path` is not
/// below `local_root`
pub fn project_path(path: &Path, local_root: &Path, new_root: &str) -> Result<String, ValidationError> {
	let rel = path.strip_prefix(local_root).map_err(|_| {
		ValidationError::PathError(format!(
			"Path {:?} is outside root directory {:?}",
			path, local_root
		))
	})?;

	let mut projected = new_root.to_string();
	for component in rel.components() {
		match component {
			Component::Normal(part) => projected = join_remote(&projected, &part.to_string_lossy()),
			Component::CurDir => {}
			_ => {
				return Err(ValidationError::PathError(format!(
					"Path {:?} contains an unsupported component",
					path
				)))
			}
		}
	}
	Ok(projected)
}
