// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Probe run reporting types.

use serde::{Deserialize, Serialize};
use tack_k8s::ObjectIdentity;

/// How the rollout wait phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutOutcome {
	/// The workload satisfied the readiness predicate
	Ready,
	/// No workload kind was tracked, nothing to wait on
	NoWorkload,
	/// The watch window elapsed before the workload became ready
	TimedOut,
	/// The watch subscription failed; treated like a timeout
	StreamFailed,
}

/// Per-outcome counters for the teardown phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupSummary {
	/// Objects deleted by this run
	pub deleted: u32,
	/// Objects already gone when deletion was attempted
	pub missing: u32,
	/// Objects whose deletion failed and that were left behind
	pub failed: u32,
	/// Objects of kinds with no registered delete handler
	pub skipped: u32,
}

/// Final report for one probe run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
	/// Objects tracked by the create phase, in creation order
	pub tracked: Vec<ObjectIdentity>,
	/// Outcome of the rollout wait phase
	pub rollout: RolloutOutcome,
	/// Outcome counters from the teardown phase
	pub cleanup: CleanupSummary,
}
