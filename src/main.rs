use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, process};

use mfsync::config::{OutputFormat, Settings, DEFAULT_SETTINGS_FILE};
use mfsync::error::SyncError;
use mfsync::logging::{self, debug, warn};
use mfsync::protocol::KuboClient;
use mfsync::report::reporter_for;
use mfsync::sync;

fn command() -> Command {
	Command::new("mfsync")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Diff a local directory tree against an IPFS MFS mount")
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_name("FILE")
				.default_value(DEFAULT_SETTINGS_FILE)
				.help("Settings file (JSON, comments allowed)"),
		)
		.arg(
			Arg::new("refresh")
				.long("refresh")
				.action(ArgAction::SetTrue)
				.help("Rebuild both snapshots even if snapshot files exist"),
		)
		.arg(
			Arg::new("format")
				.long("format")
				.value_name("FORMAT")
				.value_parser(["text", "json"])
				.help("How to print actions (overrides outputFormat)"),
		)
}

async fn run() -> Result<(), SyncError> {
	let matches = command().get_matches();
	let config_path = matches
		.get_one::<String>("config")
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

	println!("Loading settings from {}.", config_path.display());
	let mut settings = Settings::load(&config_path)?;
	if matches.get_flag("refresh") {
		settings.refresh = true;
	}
	if let Some(format) = matches.get_one::<String>("format") {
		settings.output_format = format.parse::<OutputFormat>().unwrap_or_default();
	}
	println!("Settings loaded.");
	debug!("{:?}", settings);

	let store = Arc::new(KuboClient::new(&settings.rpc_url(), settings.request_timeout()));
	let mut sink = reporter_for(settings.output_format, io::stdout());
	let report = sync::run(&settings, store, sink.as_mut(), &mut io::stdout()).await?;

	if report.skipped_remote_subtrees > 0 {
		warn!(
			"{} remote subtrees could not be listed; their contents are missing from this diff",
			report.skipped_remote_subtrees
		);
	}
	Ok(())
}

#[tokio::main]
async fn main() {
	logging::init_tracing();

	if let Err(e) = run().await {
		eprintln!("Error: {}", e);
		process::exit(1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_cli_definition() {
		command().debug_assert();
	}

	#[test]
	fn test_no_arguments_uses_default_settings_file() {
		let matches = command().try_get_matches_from(["mfsync"]).unwrap();
		assert_eq!(matches.get_one::<String>("config").map(String::as_str), Some(DEFAULT_SETTINGS_FILE));
		assert!(!matches.get_flag("refresh"));
	}
}

// vim: ts=4
