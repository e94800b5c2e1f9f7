//! Error types for mfsync operations
//!
//! Remote listing failures never reach this level: the remote walker contains
//! them and degrades to a partial snapshot. Everything here aborts the run.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::validation::ValidationError;

/// Main error type for a mirror run
#[derive(Debug)]
pub enum SyncError {
	/// Settings could not be loaded or are invalid
	Config(ConfigError),

	/// A local directory or its entry metadata could not be read
	LocalIo { path: PathBuf, source: io::Error },

	/// A local path does not start with the configured local root
	Projection { path: PathBuf, root: PathBuf },

	/// Snapshot persistence failed
	Snapshot(SnapshotError),

	/// Actions could not be written to the output
	Output(io::Error),

	/// A walker task could not be joined
	Aborted { message: String },
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::Config(e) => write!(f, "Configuration error: {}", e),
			SyncError::LocalIo { path, source } => {
				write!(f, "Cannot read {}: {}", path.display(), source)
			}
			SyncError::Projection { path, root } => write!(
				f,
				"Path {} is not below the local root {} (check localRoot)",
				path.display(),
				root.display()
			),
			SyncError::Snapshot(e) => write!(f, "Snapshot error: {}", e),
			SyncError::Output(e) => write!(f, "Failed to write report: {}", e),
			SyncError::Aborted { message } => write!(f, "Aborted: {}", message),
		}
	}
}

impl Error for SyncError {}

impl From<ConfigError> for SyncError {
	fn from(e: ConfigError) -> Self {
		SyncError::Config(e)
	}
}

impl From<SnapshotError> for SyncError {
	fn from(e: SnapshotError) -> Self {
		SyncError::Snapshot(e)
	}
}

impl From<ValidationError> for SyncError {
	fn from(e: ValidationError) -> Self {
		SyncError::Config(ConfigError::Invalid(e))
	}
}

/// Settings loading errors
#[derive(Debug)]
pub enum ConfigError {
	/// Settings file could not be read
	Read { path: PathBuf, source: io::Error },

	/// Settings file is not valid (commented) JSON for the settings schema
	Parse { path: PathBuf, message: String },

	/// Settings parsed but failed validation
	Invalid(ValidationError),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Read { path, source } => {
				write!(f, "Cannot read settings file {}: {}", path.display(), source)
			}
			ConfigError::Parse { path, message } => {
				write!(f, "Cannot parse settings file {}: {}", path.display(), message)
			}
			ConfigError::Invalid(e) => write!(f, "{}", e),
		}
	}
}

impl Error for ConfigError {}

impl From<ValidationError> for ConfigError {
	fn from(e: ValidationError) -> Self {
		ConfigError::Invalid(e)
	}
}

/// Snapshot file errors
///
/// `Corrupted` is recoverable (the store rebuilds), the others are fatal.
#[derive(Debug)]
pub enum SnapshotError {
	/// Snapshot file exists but could not be read
	LoadFailed { path: PathBuf, source: io::Error },

	/// Snapshot file contents do not deserialize
	Corrupted { path: PathBuf, message: String },

	/// Snapshot could not be serialized
	EncodeFailed { message: String },

	/// Snapshot could not be written
	SaveFailed { path: PathBuf, source: io::Error },
}

impl fmt::Display for SnapshotError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SnapshotError::LoadFailed { path, source } => {
				write!(f, "Failed to read snapshot {}: {}", path.display(), source)
			}
			SnapshotError::Corrupted { path, message } => {
				write!(f, "Snapshot {} is corrupted: {}", path.display(), message)
			}
			SnapshotError::EncodeFailed { message } => {
				write!(f, "Failed to encode snapshot: {}", message)
			}
			SnapshotError::SaveFailed { path, source } => {
				write!(f, "Failed to write snapshot {}: {}", path.display(), source)
			}
		}
	}
}

impl Error for SnapshotError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_local_io_display_names_path() {
		let err = SyncError::LocalIo {
			path: PathBuf::from("/mnt/library/locked"),
			source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
		};
		let msg = err.to_string();
		assert!(msg.contains("/mnt/library/locked"));
		assert!(msg.contains("denied"));
	}

	#[test]
	fn test_validation_error_becomes_config_error() {
		let err: SyncError = ValidationError::ConfigError("mountRoot is empty".to_string()).into();
		assert!(matches!(err, SyncError::Config(ConfigError::Invalid(_))));
		assert!(err.to_string().contains("mountRoot is empty"));
	}
}

// vim: ts=4
