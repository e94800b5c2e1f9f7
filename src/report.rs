//! Action reporting
//!
//! [`ActionSink`] is the seam between the diff engine and whatever consumes
//! its output. The reporters here only render actions; an executor that
//! mutates the mount would implement the same trait.

use std::io::{self, Write};

use crate::config::OutputFormat;
use crate::diff::{Action, DiffSummary};

/// Consumer of the ordered action sequence
pub trait ActionSink {
	/// Called once per action, in diff order
	fn record(&mut self, action: &Action) -> io::Result<()>;

	/// Called after the last action
	fn finish(&mut self, _summary: &DiffSummary) -> io::Result<()> {
		Ok(())
	}
}

/// Feed every action to `sink` and return the per-kind counts
pub fn report_actions(actions: &[Action], sink: &mut dyn ActionSink) -> io::Result<DiffSummary> {
	let mut summary = DiffSummary::default();
	for action in actions {
		sink.record(action)?;
		summary.record(action.kind);
	}
	sink.finish(&summary)?;
	Ok(summary)
}

/// Human readable lines: `update: /The Library/a.txt`
pub struct TextReporter<W: Write> {
	out: W,
}

impl<W: Write> TextReporter<W> {
	pub fn new(out: W) -> Self {
		TextReporter { out }
	}

	pub fn into_inner(self) -> W {
		self.out
	}
}

impl<W: Write> ActionSink for TextReporter<W> {
	fn record(&mut self, action: &Action) -> io::Result<()> {
		writeln!(self.out, "{}: {}", action.kind, action.logical_path())
	}

	fn finish(&mut self, summary: &DiffSummary) -> io::Result<()> {
		if summary.is_empty() {
			writeln!(self.out, "Nothing to do, remote is in sync.")?;
		} else {
			writeln!(self.out, "Summary: {}", summary)?;
		}
		self.out.flush()
	}
}

/// One JSON object per action, then one for the summary
pub struct JsonReporter<W: Write> {
	out: W,
}

impl<W: Write> JsonReporter<W> {
	pub fn new(out: W) -> Self {
		JsonReporter { out }
	}

	pub fn into_inner(self) -> W {
		self.out
	}
}

impl<W: Write> ActionSink for JsonReporter<W> {
	fn record(&mut self, action: &Action) -> io::Result<()> {
		serde_json::to_writer(&mut self.out, action)?;
		writeln!(self.out)
	}

	fn finish(&mut self, summary: &DiffSummary) -> io::Result<()> {
		serde_json::to_writer(&mut self.out, &serde_json::json!({ "summary": summary }))?;
		writeln!(self.out)?;
		self.out.flush()
	}
}

/// Keeps actions in memory, e.g. for handing them to an executor later
#[derive(Debug, Default)]
pub struct CollectingSink {
	pub actions: Vec<Action>,
}

impl ActionSink for CollectingSink {
	fn record(&mut self, action: &Action) -> io::Result<()> {
		self.actions.push(action.clone());
		Ok(())
	}
}

/// Reporter for the configured format, writing to `out`
pub fn reporter_for<'a, W: Write + 'a>(format: OutputFormat, out: W) -> Box<dyn ActionSink + 'a> {
	match format {
		OutputFormat::Text => Box::new(TextReporter::new(out)),
		OutputFormat::Json => Box::new(JsonReporter::new(out)),
	}
}


// vim: ts=4
