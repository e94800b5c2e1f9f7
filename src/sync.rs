//! Mirror run orchestration
//!
//! Phases: remote snapshot, local snapshot, diff, report. Status lines go to
//! the `status` writer, actions to the sink.

use std::io::Write;
use std::sync::Arc;

use crate::config::Settings;
use crate::diff::{diff_directories, Action, DiffSummary};
use crate::error::SyncError;
use crate::logging::*;
use crate::protocol::RemoteStore;
use crate::report::{report_actions, ActionSink};
use crate::scan::{LocalWalker, RemoteWalker, Walker};
use crate::state::{SnapshotOrigin, SnapshotStore};

/// Outcome of one mirror run
#[derive(Debug)]
pub struct SyncReport {
	pub remote_origin: SnapshotOrigin,
	pub local_origin: SnapshotOrigin,
	/// Remote subtrees left out of a fresh remote snapshot
	pub skipped_remote_subtrees: usize,
	pub actions: Vec<Action>,
	pub summary: DiffSummary,
}

fn status(out: &mut dyn Write, line: &str) -> Result<(), SyncError> {
	writeln!(out, "{}", line).and_then(|_| out.flush()).map_err(SyncError::Output)
}

/// Capture or load both snapshots, diff them and report every action
pub async fn run(
	settings: &Settings,
	store: Arc<dyn RemoteStore>,
	sink: &mut dyn ActionSink,
	out: &mut dyn Write,
) -> Result<SyncReport, SyncError> {
	if settings.verify {
		warn!("verify is set, but hash verification is not supported; comparing sizes only");
	}

	let remote_walker = RemoteWalker::from_settings(store, settings);
	status(out, &format!("Loading remote snapshot from {}.", remote_walker.origin()))?;
	let (remote, remote_origin) = SnapshotStore::new(&settings.remote_snapshot_file)
		.load_or_capture(settings.refresh, &remote_walker)
		.await?;
	status(out, "Done loading remote snapshot.")?;

	let local_walker = LocalWalker::from_settings(settings);
	status(out, &format!("Loading local snapshot from {}.", local_walker.origin()))?;
	let (local, local_origin) = SnapshotStore::new(&settings.local_snapshot_file)
		.load_or_capture(settings.refresh, &local_walker)
		.await?;
	status(out, "Done loading local snapshot.")?;

	status(out, &format!("Comparing {} with {}.", remote.root.path, local.root.path))?;
	let actions = diff_directories(&remote.root, &local.root);
	debug!("Diff produced {} actions", actions.len());
	let summary = report_actions(&actions, sink).map_err(SyncError::Output)?;

	Ok(SyncReport {
		remote_origin,
		local_origin,
		skipped_remote_subtrees: remote_walker.skipped(),
		actions,
		summary,
	})
}

// vim: ts=4
