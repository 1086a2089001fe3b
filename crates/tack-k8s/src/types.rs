// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::K8sResult;

pub use k8s_openapi::api::core::v1::Namespace;

/// Identity of an object that exists in the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectIdentity {
	pub kind: String,
	pub name: String,
}

/// Outcome of submitting one manifest document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
	/// A single object was created.
	Created(ObjectIdentity),
	/// A `List` document was expanded; its items were created in order.
	CreatedMany(Vec<ObjectIdentity>),
}

/// Rollout state of a workload, taken from a single watch event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolloutSnapshot {
	pub desired_replicas: Option<i32>,
	pub ready_replicas: Option<i32>,
	pub generation: Option<i64>,
	pub observed_generation: Option<i64>,
}

impl RolloutSnapshot {
	/// Whether the workload is fully rolled out.
	///
	/// The observed ready count must be present and equal to the desired
	/// count, and the controller must have observed the latest generation.
	/// A snapshot with no reported ready count is never ready.
	pub fn is_ready(&self) -> bool {
		self.ready_replicas.is_some()
			&& self.ready_replicas == self.desired_replicas
			&& self.generation == self.observed_generation
	}
}

/// The kind of change a watch event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadEventKind {
	/// Object added or modified.
	Applied,
	/// Object deleted.
	Deleted,
}

/// A change notification for a watched workload.
#[derive(Debug, Clone)]
pub struct WorkloadEvent {
	pub kind: WorkloadEventKind,
	pub snapshot: RolloutSnapshot,
}

/// A pinned stream of workload change events.
///
/// The stream is finite: it ends when the watch window configured at
/// subscription time elapses. Dropping it closes the subscription.
pub type WatchStream = Pin<Box<dyn Stream<Item = K8sResult<WorkloadEvent>> + Send>>;
