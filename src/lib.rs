//! # mfsync - Mirror a local tree into an IPFS MFS mount
//!
//! mfsync captures two snapshots, one of a remote MFS mount (listed through a
//! Kubo node's RPC interface) and one of a local source tree, and diffs them
//! into the add/update/remove actions that would bring the mount in line with
//! the local tree. Snapshots are persisted between runs so either side can be
//! re-used without walking it again.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mfsync::{config::Settings, protocol::KuboClient, report::TextReporter, sync};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load("settings.json".as_ref())?;
//!     let store = Arc::new(KuboClient::new(&settings.rpc_url(), settings.request_timeout()));
//!     let mut reporter = TextReporter::new(std::io::stdout());
//!     let report = sync::run(&settings, store, &mut reporter, &mut std::io::stdout()).await?;
//!     println!("{} actions", report.summary.total());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod report;
pub mod scan;
pub mod state;
pub mod sync;
pub mod types;
pub mod validation;

// Re-export commonly used types and functions
pub use config::Settings;
pub use diff::{diff_directories, Action, ActionKind, DiffSummary};
pub use error::{ConfigError, SnapshotError, SyncError};
pub use types::{Directory, Entry, EntryKind, Side, Snapshot};

// vim: ts=4
