//! Tree diff engine
//!
//! Compares a remote directory with the local directory at the same logical
//! position and lists what has to change remotely. Children are matched by
//! name only (exact, case-sensitive); sizes decide whether a matched file
//! changed. Directories on one side only produce a single action for the
//! whole subtree.
//!
//! Emission order per level: remote files (remove/update), local-only files
//! (add), remote subdirectories (recurse or remove dir), local-only
//! subdirectories (add dir).

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::types::{Directory, Entry};
use crate::validation::join_remote;

/// What has to happen to bring one remote item in line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
	Add,
	Update,
	Remove,
	AddDir,
	RemoveDir,
}

impl fmt::Display for ActionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ActionKind::Add => write!(f, "add"),
			ActionKind::Update => write!(f, "update"),
			ActionKind::Remove => write!(f, "remove"),
			ActionKind::AddDir => write!(f, "add dir"),
			ActionKind::RemoveDir => write!(f, "remove dir"),
		}
	}
}

/// One step of the reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
	pub kind: ActionKind,
	pub name: String,
	/// Logical path of the directory holding the item, rooted at the remote root
	pub location: String,
	/// Path inside the mount that the action touches
	pub target: String,
	/// Where new content comes from (adds and updates)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
}

impl Action {
	/// Logical path of the item itself
	pub fn logical_path(&self) -> String {
		join_remote(&self.location, &self.name)
	}

	fn remove(location: &str, remote: &Entry) -> Self {
		Action {
			kind: ActionKind::Remove,
			name: remote.name.clone(),
			location: location.to_string(),
			target: remote.path.clone(),
			source: None,
		}
	}

	fn update(location: &str, remote: &Entry, local: &Entry) -> Self {
		Action {
			kind: ActionKind::Update,
			name: remote.name.clone(),
			location: location.to_string(),
			target: remote.path.clone(),
			source: Some(local.source_path.clone().unwrap_or_else(|| local.path.clone())),
		}
	}

	fn add(location: &str, local: &Entry) -> Self {
		Action {
			kind: ActionKind::Add,
			name: local.name.clone(),
			location: location.to_string(),
			target: local.mirror_path.clone().unwrap_or_else(|| join_remote(location, &local.name)),
			source: Some(local.source_path.clone().unwrap_or_else(|| local.path.clone())),
		}
	}

	fn remove_dir(location: &str, remote: &Directory) -> Self {
		Action {
			kind: ActionKind::RemoveDir,
			name: remote.name.clone(),
			location: location.to_string(),
			target: remote.path.clone(),
			source: None,
		}
	}

	fn add_dir(location: &str, local: &Directory) -> Self {
		Action {
			kind: ActionKind::AddDir,
			name: local.name.clone(),
			location: location.to_string(),
			target: join_remote(location, &local.name),
			source: Some(local.path.clone()),
		}
	}
}

/// Diff two trees whose roots sit at the same logical position
///
/// The roots themselves are always compared, whatever their names; the
/// logical location of the root level is the remote root's path.
pub fn diff_directories(remote: &Directory, local: &Directory) -> Vec<Action> {
	let mut actions = Vec::new();
	diff_level(remote, local, &remote.path, &mut actions);
	actions
}

fn diff_level(remote: &Directory, local: &Directory, location: &str, actions: &mut Vec<Action>) {
	let local_files: HashMap<&str, &Entry> =
		local.files.iter().map(|f| (f.name.as_str(), f)).collect();
	let remote_files: HashMap<&str, &Entry> =
		remote.files.iter().map(|f| (f.name.as_str(), f)).collect();

	for r in &remote.files {
		match local_files.get(r.name.as_str()) {
			None => actions.push(Action::remove(location, r)),
			Some(l) if l.size != r.size => actions.push(Action::update(location, r, l)),
			Some(_) => {}
		}
	}

	for l in &local.files {
		if !remote_files.contains_key(l.name.as_str()) {
			actions.push(Action::add(location, l));
		}
	}

	let local_dirs: HashMap<&str, &Directory> =
		local.dirs.iter().map(|d| (d.name.as_str(), d)).collect();
	let remote_dirs: HashMap<&str, &Directory> =
		remote.dirs.iter().map(|d| (d.name.as_str(), d)).collect();

	for r in &remote.dirs {
		match local_dirs.get(r.name.as_str()) {
			Some(l) => diff_level(r, l, &join_remote(location, &r.name), actions),
			None => actions.push(Action::remove_dir(location, r)),
		}
	}

	for l in &local.dirs {
		if !remote_dirs.contains_key(l.name.as_str()) {
			actions.push(Action::add_dir(location, l));
		}
	}
}

/// Per-kind action counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
	pub add: usize,
	pub update: usize,
	pub remove: usize,
	pub add_dir: usize,
	pub remove_dir: usize,
}

impl DiffSummary {
	pub fn from_actions(actions: &[Action]) -> Self {
		let mut summary = DiffSummary::default();
		for action in actions {
			summary.record(action.kind);
		}
		summary
	}

	pub fn record(&mut self, kind: ActionKind) {
		match kind {
			ActionKind::Add => self.add += 1,
			ActionKind::Update => self.update += 1,
			ActionKind::Remove => self.remove += 1,
			ActionKind::AddDir => self.add_dir += 1,
			ActionKind::RemoveDir => self.remove_dir += 1,
		}
	}

	pub fn total(&self) -> usize {
		self.add + self.update + self.remove + self.add_dir + self.remove_dir
	}

	pub fn is_empty(&self) -> bool {
		self.total() == 0
	}
}

impl fmt::Display for DiffSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} to add, {} to update, {} to remove, {} directories to add, {} directories to remove",
			self.add, self.update, self.remove, self.add_dir, self.remove_dir
		)
	}
}


// vim: ts=4
