// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Multi-document manifest decoding.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{ProbeError, ProbeResult};

/// A parsed, not-yet-submitted representation of one resource to create.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
	pub kind: String,
	pub name: String,
	/// The full document, passed through to the cluster verbatim.
	pub document: Value,
}

/// Decode a multi-document YAML stream into resource descriptors.
///
/// Empty documents are skipped silently. A document without a `kind` or a
/// `metadata.name` is logged and skipped; it never aborts the run. A syntax
/// error anywhere in the stream is fatal, and because every document is
/// decoded before the first descriptor is returned, a late syntax error
/// aborts before anything has been submitted to the cluster.
pub fn decode_manifest(input: &str) -> ProbeResult<Vec<ResourceDescriptor>> {
	let mut descriptors = Vec::new();
	for document in serde_yaml::Deserializer::from_str(input) {
		let value = Value::deserialize(document).map_err(|e| ProbeError::Manifest {
			message: e.to_string(),
		})?;
		if value.is_null() {
			continue;
		}

		let kind = value.get("kind").and_then(Value::as_str).map(str::to_owned);
		let name = value
			.pointer("/metadata/name")
			.and_then(Value::as_str)
			.map(str::to_owned);
		match (kind, name) {
			(Some(kind), Some(name)) => descriptors.push(ResourceDescriptor {
				kind,
				name,
				document: value,
			}),
			_ => warn!("Skipping manifest document without kind or metadata.name"),
		}
	}
	Ok(descriptors)
}
