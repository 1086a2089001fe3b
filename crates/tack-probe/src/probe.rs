// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core probe implementation for the deploy, watch, hold, teardown lifecycle.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tack_k8s::{ClusterClient, CreateOutcome, K8sError, ObjectIdentity, WorkloadEventKind};

use crate::config::ProbeConfig;
use crate::error::{ProbeError, ProbeResult};
use crate::ledger::Ledger;
use crate::manifest::{self, ResourceDescriptor};
use crate::report::{CleanupSummary, ProbeReport, RolloutOutcome};

const WORKLOAD_KIND: &str = "Deployment";

/// Drives one deploy, rollout wait, hold, teardown cycle.
pub struct Probe {
	client: Arc<dyn ClusterClient>,
	config: ProbeConfig,
}

impl Probe {
	/// Create a new probe with the given cluster client and configuration.
	pub fn new(client: Arc<dyn ClusterClient>, config: ProbeConfig) -> Self {
		Self { client, config }
	}

	/// Validate that the configured namespace exists in the cluster.
	///
	/// Called before anything is created so a misconfigured namespace
	/// fails fast instead of as a confusing per-resource create error.
	pub async fn validate_namespace(&self) -> ProbeResult<()> {
		match self.client.get_namespace(&self.config.namespace).await {
			Ok(_) => {
				tracing::info!(namespace = %self.config.namespace, "Validated namespace exists");
				Ok(())
			}
			Err(K8sError::NamespaceNotFound { .. }) => Err(ProbeError::NamespaceNotFound {
				name: self.config.namespace.clone(),
			}),
			Err(e) => Err(e.into()),
		}
	}

	/// Run the full probe cycle against the given manifest text.
	///
	/// The rollout wait and the teardown absorb their own failures; only
	/// manifest decoding, the namespace preflight and unexpected create
	/// errors abort the run. On the create-error path nothing is deleted,
	/// so partially created resources are left for the operator.
	pub async fn run(&self, manifest: &str) -> ProbeResult<ProbeReport> {
		tracing::info!(namespace = %self.config.namespace, "Starting probe run");

		let descriptors = manifest::decode_manifest(manifest)?;
		tracing::info!(documents = descriptors.len(), "Decoded manifest");

		self.validate_namespace().await?;

		let mut ledger = Ledger::new();
		self.create_resources(&descriptors, &mut ledger).await?;

		let rollout = self.wait_for_rollout(&ledger).await;
		self.hold().await;
		let cleanup = self.delete_resources(&ledger).await;

		Ok(ProbeReport {
			tracked: ledger.entries().to_vec(),
			rollout,
			cleanup,
		})
	}

	/// Submit every descriptor, tracking each object that now exists.
	///
	/// An object that already exists is tracked as if this run created it,
	/// so a re-run still tears it down. Any other create failure aborts
	/// immediately, leaving the ledger populated as far as it got.
	pub async fn create_resources(
		&self,
		descriptors: &[ResourceDescriptor],
		ledger: &mut Ledger,
	) -> ProbeResult<()> {
		for descriptor in descriptors {
			tracing::info!(kind = %descriptor.kind, name = %descriptor.name, "Creating resource");
			match self
				.client
				.create_object(&self.config.namespace, descriptor.document.clone())
				.await
			{
				Ok(CreateOutcome::Created(identity)) => {
					tracing::info!(kind = %identity.kind, name = %identity.name, "Created resource");
					ledger.track(identity);
				}
				Ok(CreateOutcome::CreatedMany(identities)) => {
					for identity in identities {
						tracing::info!(kind = %identity.kind, name = %identity.name, "Created resource");
						ledger.track(identity);
					}
				}
				Err(K8sError::AlreadyExists { kind, name }) => {
					tracing::info!(kind = %kind, name = %name, "Resource already exists, tracking for teardown");
					ledger.track(ObjectIdentity { kind, name });
				}
				Err(e) => return Err(e.into()),
			}
		}
		Ok(())
	}

	/// Wait until the first tracked workload satisfies the rollout predicate.
	///
	/// Timeouts and watch failures are soft outcomes: the probe exists to
	/// observe the rollout, not to guarantee it, so the run proceeds to
	/// teardown either way.
	pub async fn wait_for_rollout(&self, ledger: &Ledger) -> RolloutOutcome {
		let workload = match ledger.first_of_kind(WORKLOAD_KIND) {
			Some(workload) => workload,
			None => {
				tracing::info!("No workload tracked, skipping rollout wait");
				return RolloutOutcome::NoWorkload;
			}
		};

		tracing::info!(
			name = %workload.name,
			timeout_secs = self.config.ready_timeout_secs,
			"Waiting for workload rollout"
		);

		let timeout = Duration::from_secs(self.config.ready_timeout_secs);
		let mut events = match self
			.client
			.watch_workload(&self.config.namespace, &workload.name, timeout)
			.await
		{
			Ok(events) => events,
			Err(e) => {
				tracing::warn!(name = %workload.name, error = %e, "Rollout watch failed to start");
				return RolloutOutcome::StreamFailed;
			}
		};

		while let Some(event) = events.next().await {
			match event {
				Ok(event) => {
					if event.kind != WorkloadEventKind::Applied {
						tracing::debug!(name = %workload.name, "Ignoring non-apply watch event");
						continue;
					}
					let snapshot = event.snapshot;
					if snapshot.is_ready() {
						tracing::info!(
							name = %workload.name,
							ready = snapshot.ready_replicas.unwrap_or(0),
							desired = snapshot.desired_replicas.unwrap_or(0),
							"Workload rollout complete"
						);
						return RolloutOutcome::Ready;
					}
					tracing::info!(
						name = %workload.name,
						ready = snapshot.ready_replicas.unwrap_or(0),
						desired = snapshot.desired_replicas.unwrap_or(0),
						"Workload not yet ready"
					);
				}
				Err(e) => {
					tracing::warn!(name = %workload.name, error = %e, "Rollout watch failed");
					return RolloutOutcome::StreamFailed;
				}
			}
		}

		tracing::warn!(
			name = %workload.name,
			timeout_secs = self.config.ready_timeout_secs,
			"Rollout wait timed out"
		);
		RolloutOutcome::TimedOut
	}

	/// Keep the deployed resources up for the configured dwell period.
	pub async fn hold(&self) {
		tracing::info!(hold_secs = self.config.hold_secs, "Holding before teardown");
		tokio::time::sleep(Duration::from_secs(self.config.hold_secs)).await;
		tracing::info!("Hold complete");
	}

	/// Delete every tracked object in reverse creation order.
	///
	/// Best-effort: a failed deletion is logged and counted but never
	/// aborts the remaining teardown.
	pub async fn delete_resources(&self, ledger: &Ledger) -> CleanupSummary {
		let mut summary = CleanupSummary::default();
		for identity in ledger.reverse_entries() {
			match self
				.client
				.delete_object(&self.config.namespace, &identity.kind, &identity.name)
				.await
			{
				Ok(()) => {
					tracing::info!(kind = %identity.kind, name = %identity.name, "Deleted resource");
					summary.deleted += 1;
				}
				Err(K8sError::NotFound { .. }) => {
					tracing::info!(kind = %identity.kind, name = %identity.name, "Resource already deleted");
					summary.missing += 1;
				}
				Err(K8sError::UnsupportedKind { .. }) => {
					tracing::warn!(
						kind = %identity.kind,
						name = %identity.name,
						"No delete handler for kind, leaving resource behind"
					);
					summary.skipped += 1;
				}
				Err(e) => {
					tracing::error!(
						kind = %identity.kind,
						name = %identity.name,
						error = %e,
						"Failed to delete resource"
					);
					summary.failed += 1;
				}
			}
		}
		summary
	}
}


#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;
	use tack_k8s::MockClusterClient;

	proptest! {
		#[test]
		fn teardown_is_always_reverse_of_creation(
			names in prop::collection::hash_set("[a-z][a-z0-9-]{2,12}", 1..8)
		) {
			let names: Vec<String> = names.into_iter().collect();

			let (summary, deleted) = tokio_test::block_on(async {
				let mock = MockClusterClient::new();
				let probe = Probe::new(
					Arc::new(mock.clone()),
					ProbeConfig {
						namespace: "default".to_string(),
						hold_secs: 0,
						ready_timeout_secs: 1,
					},
				);

				let mut ledger = Ledger::new();
				for name in &names {
					ledger.track(ObjectIdentity {
						kind: "Service".to_string(),
						name: name.clone(),
					});
				}

				let summary = probe.delete_resources(&ledger).await;
				(summary, mock.deleted())
			});

			let expected: Vec<String> = names.iter().rev().cloned().collect();
			let actual: Vec<String> = deleted.iter().map(|e| e.name.clone()).collect();
			prop_assert_eq!(actual, expected);
			prop_assert_eq!(summary.deleted as usize, names.len());
		}
	}
}
