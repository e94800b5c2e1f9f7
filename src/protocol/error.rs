//! Remote store error types
//!
//! `NotFound` is an expected outcome (the path has not been created yet).
//! Every other variant means the listing could not be obtained.

use std::fmt;

/// Remote listing error type
#[derive(Debug)]
pub enum RemoteError {
	/// The listed path does not exist in the mount
	NotFound { path: String },
	/// Request could not be sent or the response could not be read
	Transport(String),
	/// Store answered with a non-success status
	Status { code: u16, message: String },
	/// Response body did not match the expected listing format
	Decode(String),
	/// Listing did not complete within the per-call deadline
	Timeout { path: String, secs: u64 },
}

impl RemoteError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, RemoteError::NotFound { .. })
	}
}

impl fmt::Display for RemoteError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RemoteError::NotFound { path } => write!(f, "{}: no such file or directory", path),
			RemoteError::Transport(msg) => write!(f, "Transport error: {}", msg),
			RemoteError::Status { code, message } => {
				write!(f, "Store returned status {}: {}", code, message)
			}
			RemoteError::Decode(msg) => write!(f, "Malformed listing: {}", msg),
			RemoteError::Timeout { path, secs } => {
				write!(f, "Listing {} timed out after {}s", path, secs)
			}
		}
	}
}

impl std::error::Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_decode() {
			RemoteError::Decode(e.to_string())
		} else {
			RemoteError::Transport(e.to_string())
		}
	}
}

impl From<serde_json::Error> for RemoteError {
	fn from(e: serde_json::Error) -> Self {
		RemoteError::Decode(e.to_string())
	}
}

// vim: ts=4
