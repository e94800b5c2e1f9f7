//! Remote store abstraction layer
//!
//! The remote walker depends only on the [`RemoteStore`] trait, keeping it
//! separate from the RPC transport.
//!
//! # Example Usage
//!
//! ```ignore
//! use mfsync::protocol::{KuboClient, RemoteStore};
//!
//! let store = KuboClient::new("http://127.0.0.1:5001", Duration::from_secs(30));
//! for entry in store.list("/The Library").await? {
//!     // Classified listing entry
//! }
//! ```

pub mod error;
pub mod kubo;
pub mod traits;
pub mod types;

pub use error::RemoteError;
pub use kubo::KuboClient;
pub use traits::{RemoteResult, RemoteStore};
pub use types::{ListEntry, ListKind};

// vim: ts=4
