//! Kubo RPC adapter
//!
//! Lists MFS directories through `POST /api/v0/files/ls?arg=<path>&long=true`.
//! Kubo reports files as type 0 and directories as type 1; this module is the
//! only place those codes are interpreted.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::error::RemoteError;
use super::traits::{RemoteResult, RemoteStore};
use super::types::{ListEntry, ListKind};
use crate::logging::*;

const FILES_LS: &str = "/api/v0/files/ls";

/// Messages Kubo uses for a missing MFS path
const NOT_FOUND_MARKERS: [&str; 2] = ["file does not exist", "no such file or directory"];

#[derive(Debug, Deserialize)]
struct LsResponse {
	#[serde(rename = "Entries", default)]
	entries: Option<Vec<LsEntry>>,
}

#[derive(Debug, Deserialize)]
struct LsEntry {
	#[serde(rename = "Name")]
	name: String,
	#[serde(rename = "Type", default)]
	kind: i64,
	#[serde(rename = "Size", default)]
	size: u64,
	#[serde(rename = "Hash", default)]
	hash: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
	#[serde(rename = "Message", default)]
	message: String,
}

fn classify(code: i64) -> ListKind {
	match code {
		0 => ListKind::File,
		1 => ListKind::Directory,
		other => ListKind::Unknown(other),
	}
}

/// Turn a `files/ls` HTTP response into listing entries
pub fn parse_listing(status: u16, body: &str, path: &str) -> RemoteResult<Vec<ListEntry>> {
	if !(200..300).contains(&status) {
		let message = serde_json::from_str::<ErrorResponse>(body)
			.map(|e| e.message)
			.unwrap_or_else(|_| body.trim().to_string());
		if NOT_FOUND_MARKERS.iter().any(|m| message.contains(m)) {
			return Err(RemoteError::NotFound { path: path.to_string() });
		}
		return Err(RemoteError::Status { code: status, message });
	}

	let response: LsResponse = serde_json::from_str(body)?;
	Ok(response
		.entries
		.unwrap_or_default()
		.into_iter()
		.map(|e| ListEntry {
			name: e.name,
			kind: classify(e.kind),
			size: e.size,
			hash: if e.hash.is_empty() { None } else { Some(e.hash) },
		})
		.collect())
}

/// HTTP client for a Kubo node's RPC interface
#[derive(Debug, Clone)]
pub struct KuboClient {
	client: reqwest::Client,
	base_url: String,
	timeout: Duration,
}

impl KuboClient {
	/// Create a client for `base_url` (e.g. `http://127.0.0.1:5001`)
	pub fn new(base_url: &str, timeout: Duration) -> Self {
		KuboClient {
			client: reqwest::Client::new(),
			base_url: base_url.trim_end_matches('/').to_string(),
			timeout,
		}
	}

	async fn fetch(&self, path: &str) -> RemoteResult<Vec<ListEntry>> {
		let url = format!("{}{}", self.base_url, FILES_LS);
		let response =
			self.client.post(&url).query(&[("arg", path), ("long", "true")]).send().await?;
		let status = response.status().as_u16();
		let body = response.text().await?;
		parse_listing(status, &body, path)
	}
}

#[async_trait]
impl RemoteStore for KuboClient {
	fn endpoint(&self) -> String {
		self.base_url.clone()
	}

	async fn list(&self, path: &str) -> RemoteResult<Vec<ListEntry>> {
		debug!("files/ls {}", path);
		match tokio::time::timeout(self.timeout, self.fetch(path)).await {
			Ok(result) => result,
			Err(_) => {
				Err(RemoteError::Timeout { path: path.to_string(), secs: self.timeout.as_secs() })
			}
		}
	}
}


// vim: ts=4
