// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Probe run configuration.

/// Configuration for a probe run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
	/// Kubernetes namespace the probe operates in
	pub namespace: String,
	/// Seconds to keep the deployed resources up after the rollout check
	pub hold_secs: u64,
	/// Timeout waiting for the workload rollout in seconds
	pub ready_timeout_secs: u64,
}

impl Default for ProbeConfig {
	fn default() -> Self {
		Self {
			namespace: "default".to_string(),
			hold_secs: 60,
			ready_timeout_secs: 600, // 10 minutes
		}
	}
}
