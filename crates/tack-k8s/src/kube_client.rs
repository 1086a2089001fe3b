// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Service};
use kube::{
	api::{
		Api, ApiResource, DeleteParams, DynamicObject, GroupVersionKind, PostParams,
		PropagationPolicy,
	},
	runtime::watcher,
	Client,
};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::ClusterClient;
use crate::error::{K8sError, K8sResult};
use crate::types::{
	CreateOutcome, ObjectIdentity, RolloutSnapshot, WatchStream, WorkloadEvent, WorkloadEventKind,
};

const DELETE_GRACE_PERIOD_SECONDS: u32 = 5;
// API servers cap a single watch request at around five minutes; the watcher
// re-issues requests until the caller's window elapses.
const WATCH_REQUEST_TIMEOUT_SECS: u32 = 290;

/// Production K8s client implementation using the kube crate.
pub struct KubeClient {
	client: Client,
}

impl KubeClient {
	/// Create a new KubeClient that auto-discovers cluster configuration.
	///
	/// This will attempt to load config from:
	/// 1. In-cluster service account (when running in K8s)
	/// 2. KUBECONFIG environment variable
	/// 3. ~/.kube/config
	pub async fn new() -> Result<Self, K8sError> {
		let client = Client::try_default().await?;
		debug!("K8s client initialized");
		Ok(Self { client })
	}

	async fn create_one(&self, namespace: &str, document: Value) -> K8sResult<ObjectIdentity> {
		let kind = document_kind(&document)?;
		let name = document_name(&document)?;
		let api_version = document_api_version(&document)?;

		let gvk = parse_gvk(&api_version, &kind);
		let resource = ApiResource::from_gvk(&gvk);
		let object: DynamicObject =
			serde_json::from_value(document).map_err(|e| K8sError::InvalidDocument {
				message: e.to_string(),
			})?;

		let api: Api<DynamicObject> =
			Api::namespaced_with(self.client.clone(), namespace, &resource);
		match api.create(&PostParams::default(), &object).await {
			Ok(created) => {
				let kind = created
					.types
					.as_ref()
					.map(|t| t.kind.clone())
					.unwrap_or(kind);
				let name = created.metadata.name.clone().unwrap_or(name);
				debug!(kind = %kind, name = %name, "Created object");
				Ok(ObjectIdentity { kind, name })
			}
			Err(kube::Error::Api(err)) if err.code == 409 => {
				Err(K8sError::AlreadyExists { kind, name })
			}
			Err(e) => Err(e.into()),
		}
	}
}

#[async_trait]
impl ClusterClient for KubeClient {
	async fn create_object(
		&self,
		namespace: &str,
		document: Value,
	) -> Result<CreateOutcome, K8sError> {
		if document_kind(&document)? == "List" {
			let items = document
				.get("items")
				.and_then(Value::as_array)
				.cloned()
				.unwrap_or_default();
			let mut created = Vec::with_capacity(items.len());
			for item in items {
				created.push(self.create_one(namespace, item).await?);
			}
			Ok(CreateOutcome::CreatedMany(created))
		} else {
			let identity = self.create_one(namespace, document).await?;
			Ok(CreateOutcome::Created(identity))
		}
	}

	#[instrument(skip(self))]
	async fn watch_workload(
		&self,
		namespace: &str,
		name: &str,
		timeout: Duration,
	) -> Result<WatchStream, K8sError> {
		let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
		let config = watcher::Config::default()
			.fields(&format!("metadata.name={name}"))
			.timeout(WATCH_REQUEST_TIMEOUT_SECS);
		let deadline = tokio::time::sleep(timeout);

		let events = watcher(deployments, config)
			.filter_map(|event| async move {
				match event {
					Ok(watcher::Event::Apply(workload))
					| Ok(watcher::Event::InitApply(workload)) => Some(Ok(WorkloadEvent {
						kind: WorkloadEventKind::Applied,
						snapshot: snapshot_of(&workload),
					})),
					Ok(watcher::Event::Delete(workload)) => Some(Ok(WorkloadEvent {
						kind: WorkloadEventKind::Deleted,
						snapshot: snapshot_of(&workload),
					})),
					Ok(watcher::Event::Init) | Ok(watcher::Event::InitDone) => None,
					Err(e) => Some(Err(K8sError::StreamError {
						message: e.to_string(),
					})),
				}
			})
			.take_until(deadline);

		Ok(Box::pin(events))
	}

	async fn delete_object(
		&self,
		namespace: &str,
		kind: &str,
		name: &str,
	) -> Result<(), K8sError> {
		let dp = DeleteParams {
			grace_period_seconds: Some(DELETE_GRACE_PERIOD_SECONDS),
			propagation_policy: Some(PropagationPolicy::Foreground),
			..Default::default()
		};
		match kind {
			"Deployment" => {
				let deployments: Api<Deployment> =
					Api::namespaced(self.client.clone(), namespace);
				match deployments.delete(name, &dp).await {
					Ok(_) => Ok(()),
					Err(kube::Error::Api(err)) if err.code == 404 => Err(K8sError::NotFound {
						kind: kind.into(),
						name: name.into(),
					}),
					Err(e) => Err(e.into()),
				}
			}
			"Service" => {
				let services: Api<Service> = Api::namespaced(self.client.clone(), namespace);
				match services.delete(name, &dp).await {
					Ok(_) => Ok(()),
					Err(kube::Error::Api(err)) if err.code == 404 => Err(K8sError::NotFound {
						kind: kind.into(),
						name: name.into(),
					}),
					Err(e) => Err(e.into()),
				}
			}
			_ => Err(K8sError::UnsupportedKind { kind: kind.into() }),
		}
	}

	async fn get_namespace(&self, name: &str) -> Result<Namespace, K8sError> {
		let namespaces: Api<Namespace> = Api::all(self.client.clone());
		match namespaces.get(name).await {
			Ok(ns) => Ok(ns),
			Err(kube::Error::Api(err)) if err.code == 404 => {
				Err(K8sError::NamespaceNotFound { name: name.into() })
			}
			Err(e) => Err(e.into()),
		}
	}
}

/// Extract the rollout-relevant fields from a Deployment.
fn snapshot_of(workload: &Deployment) -> RolloutSnapshot {
	let status = workload.status.as_ref();
	RolloutSnapshot {
		desired_replicas: workload.spec.as_ref().and_then(|s| s.replicas),
		ready_replicas: status.and_then(|s| s.ready_replicas),
		generation: workload.metadata.generation,
		observed_generation: status.and_then(|s| s.observed_generation),
	}
}

fn document_kind(document: &Value) -> K8sResult<String> {
	document
		.get("kind")
		.and_then(Value::as_str)
		.map(str::to_owned)
		.ok_or_else(|| K8sError::InvalidDocument {
			message: "missing kind".to_string(),
		})
}

fn document_name(document: &Value) -> K8sResult<String> {
	document
		.pointer("/metadata/name")
		.and_then(Value::as_str)
		.map(str::to_owned)
		.ok_or_else(|| K8sError::InvalidDocument {
			message: "missing metadata.name".to_string(),
		})
}

fn document_api_version(document: &Value) -> K8sResult<String> {
	document
		.get("apiVersion")
		.and_then(Value::as_str)
		.map(str::to_owned)
		.ok_or_else(|| K8sError::InvalidDocument {
			message: "missing apiVersion".to_string(),
		})
}

/// Split an `apiVersion` value into its group/version pair.
fn parse_gvk(api_version: &str, kind: &str) -> GroupVersionKind {
	match api_version.split_once('/') {
		Some((group, version)) => GroupVersionKind::gvk(group, version, kind),
		None => GroupVersionKind::gvk("", api_version, kind),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use k8s_openapi::api::apps::v1::{DeploymentSpec, DeploymentStatus};
	use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
	use serde_json::json;

	#[test]
	fn parse_gvk_with_group() {
		let gvk = parse_gvk("apps/v1", "Deployment");
		assert_eq!(gvk.group, "apps");
		assert_eq!(gvk.version, "v1");
		assert_eq!(gvk.kind, "Deployment");
	}

	#[test]
	fn parse_gvk_core_group() {
		let gvk = parse_gvk("v1", "Service");
		assert_eq!(gvk.group, "");
		assert_eq!(gvk.version, "v1");
		assert_eq!(gvk.kind, "Service");
	}

	#[test]
	fn document_fields_extracted() {
		let document = json!({
			"apiVersion": "apps/v1",
			"kind": "Deployment",
			"metadata": { "name": "hello-whale" },
		});
		assert_eq!(document_kind(&document).unwrap(), "Deployment");
		assert_eq!(document_name(&document).unwrap(), "hello-whale");
		assert_eq!(document_api_version(&document).unwrap(), "apps/v1");
	}

	#[test]
	fn document_missing_kind_is_invalid() {
		let document = json!({ "metadata": { "name": "x" } });
		assert!(matches!(
			document_kind(&document),
			Err(K8sError::InvalidDocument { .. })
		));
	}

	#[test]
	fn document_missing_name_is_invalid() {
		let document = json!({ "kind": "Service", "metadata": {} });
		assert!(matches!(
			document_name(&document),
			Err(K8sError::InvalidDocument { .. })
		));
	}

	#[test]
	fn snapshot_of_reads_spec_and_status() {
		let workload = Deployment {
			metadata: ObjectMeta {
				generation: Some(4),
				..Default::default()
			},
			spec: Some(DeploymentSpec {
				replicas: Some(3),
				..Default::default()
			}),
			status: Some(DeploymentStatus {
				ready_replicas: Some(2),
				observed_generation: Some(4),
				..Default::default()
			}),
		};

		let snapshot = snapshot_of(&workload);
		assert_eq!(snapshot.desired_replicas, Some(3));
		assert_eq!(snapshot.ready_replicas, Some(2));
		assert_eq!(snapshot.generation, Some(4));
		assert_eq!(snapshot.observed_generation, Some(4));
		assert!(!snapshot.is_ready());
	}

	#[test]
	fn snapshot_of_handles_missing_status() {
		let workload = Deployment {
			metadata: ObjectMeta::default(),
			spec: Some(DeploymentSpec {
				replicas: Some(1),
				..Default::default()
			}),
			status: None,
		};

		let snapshot = snapshot_of(&workload);
		assert_eq!(snapshot.ready_replicas, None);
		assert!(!snapshot.is_ready());
	}
}
