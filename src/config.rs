//! Settings for a mirror run
//!
//! Settings come from a comment-tolerant JSON file (parsed with json5) in the
//! working directory. The priority chain is:
//! 1. Built-in defaults (`Settings::default()`)
//! 2. Settings file (`settings.json` unless `--config` says otherwise)
//! 3. CLI flags (`--refresh`, `--format`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::validation::{self, ValidationError, Validator};

/// Settings file read when no `--config` is given
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

// ============================================================================
// MAIN SETTINGS STRUCT
// ============================================================================

/// Immutable settings passed explicitly into every walker and the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
	// ========================================================================
	// REMOTE STORE
	// ========================================================================
	/// Host of the Kubo RPC interface
	pub rpc_host: String,

	/// Port of the Kubo RPC interface
	pub rpc_port: u16,

	/// Root of the remote MFS tree to snapshot (no trailing slash)
	pub mount_root: String,

	/// Deadline for a single listing call
	pub request_timeout_secs: u32,

	/// Sibling listings allowed in flight (1 = sequential)
	pub remote_concurrency: usize,

	// ========================================================================
	// LOCAL TREE & PROJECTIONS
	// ========================================================================
	/// Root of the local tree to snapshot
	pub local_root: PathBuf,

	/// Prefix replacing `local_root` for in-mount paths (defaults to `mount_root`)
	pub mirror_root: Option<String>,

	/// Prefix replacing `local_root` for externally addressable paths
	pub source_root: String,

	// ========================================================================
	// SNAPSHOTS
	// ========================================================================
	/// Reserved for hash verification, which is not implemented
	pub verify: bool,

	/// Rebuild snapshots instead of loading the persisted ones
	pub refresh: bool,

	/// Persisted remote snapshot
	pub remote_snapshot_file: PathBuf,

	/// Persisted local snapshot
	pub local_snapshot_file: PathBuf,

	// ========================================================================
	// OUTPUT
	// ========================================================================
	/// How actions are rendered
	pub output_format: OutputFormat,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			rpc_host: "127.0.0.1".to_string(),
			rpc_port: 5001,
			mount_root: String::new(),
			request_timeout_secs: 30,
			remote_concurrency: 1,

			local_root: PathBuf::new(),
			mirror_root: None,
			source_root: String::new(),

			verify: false,
			refresh: false,
			remote_snapshot_file: PathBuf::from("remote-snapshot.json"),
			local_snapshot_file: PathBuf::from("local-snapshot.json"),

			output_format: OutputFormat::Text,
		}
	}
}

impl Settings {
	/// Parse settings from json5 text, normalize and validate them
	pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
		let settings: Settings = json5::from_str(text)
			.map_err(|e| ConfigError::Parse { path: origin.to_path_buf(), message: e.to_string() })?;
		let settings = settings.normalized();
		settings.validate()?;
		Ok(settings)
	}

	/// Read and parse a settings file
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path)
			.map_err(|e| ConfigError::Read { path: path.to_path_buf(), source: e })?;
		Self::parse(&text, path)
	}

	/// Strip trailing slashes from remote roots and fill in `mirror_root`
	pub fn normalized(mut self) -> Self {
		self.mount_root = validation::normalize_remote_root(&self.mount_root);
		self.source_root = validation::normalize_remote_root(&self.source_root);
		let mirror = self.mirror_root.take().unwrap_or_else(|| self.mount_root.clone());
		self.mirror_root = Some(validation::normalize_remote_root(&mirror));
		self
	}

	/// Prefix for in-mount paths of local files
	pub fn mirror_root(&self) -> &str {
		self.mirror_root.as_deref().unwrap_or(&self.mount_root)
	}

	/// Base URL of the RPC interface
	pub fn rpc_url(&self) -> String {
		format!("http://{}:{}", self.rpc_host, self.rpc_port)
	}

	pub fn request_timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.request_timeout_secs as u64)
	}
}

impl Validator for Settings {
	fn validate(&self) -> Result<(), ValidationError> {
		validation::validate_required("rpcHost", &self.rpc_host)?;
		validation::validate_port(self.rpc_port)?;
		validation::validate_remote_root("mountRoot", &self.mount_root)?;
		validation::validate_remote_root("mirrorRoot", self.mirror_root())?;
		validation::validate_required("sourceRoot", &self.source_root)?;
		validation::validate_required("localRoot", &self.local_root.to_string_lossy())?;
		validation::validate_timeout_secs(self.request_timeout_secs)?;
		validation::validate_concurrency(self.remote_concurrency)?;
		Ok(())
	}
}

// ============================================================================
// ENUMERATIONS
// ============================================================================

/// Action rendering format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
	/// One human readable line per action
	#[default]
	Text,
	/// One JSON object per line
	Json,
}

impl std::str::FromStr for OutputFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"text" => Ok(OutputFormat::Text),
			"json" => Ok(OutputFormat::Json),
			other => Err(format!("unknown output format '{}' (expected text or json)", other)),
		}
	}
}


// vim: ts=4
