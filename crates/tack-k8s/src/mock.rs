// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mock cluster client for exercising probe logic without a cluster.
//!
//! This mock allows configuring predetermined responses per operation and
//! records every call it receives, so consumers can assert on call order as
//! well as outcomes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::client::ClusterClient;
use crate::error::{K8sError, K8sResult};
use crate::types::{CreateOutcome, Namespace, ObjectIdentity, WatchStream, WorkloadEvent};

/// A mock cluster client with scripted responses.
///
/// Responses are consumed in FIFO order. When a queue is empty the mock
/// falls back to a success default (creates echo the document's identity,
/// deletes succeed, the namespace exists), so tests only script the calls
/// they care about.
#[derive(Debug, Clone, Default)]
pub struct MockClusterClient {
	create_responses: Arc<Mutex<Vec<K8sResult<CreateOutcome>>>>,
	watch_events: Arc<Mutex<Vec<K8sResult<WorkloadEvent>>>>,
	delete_responses: Arc<Mutex<Vec<K8sResult<()>>>>,
	namespace_responses: Arc<Mutex<Vec<K8sResult<Namespace>>>>,
	created: Arc<Mutex<Vec<serde_json::Value>>>,
	watched: Arc<Mutex<Vec<String>>>,
	deleted: Arc<Mutex<Vec<ObjectIdentity>>>,
}

impl MockClusterClient {
	/// Create a new mock cluster client.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue a response for the next call to `create_object`.
	pub fn add_create_response(&self, response: K8sResult<CreateOutcome>) {
		self.create_responses.lock().unwrap().push(response);
	}

	/// Queue an item for the event stream returned by `watch_workload`.
	/// The stream yields every queued item in order, then ends.
	pub fn add_watch_event(&self, event: K8sResult<WorkloadEvent>) {
		self.watch_events.lock().unwrap().push(event);
	}

	/// Queue a response for the next call to `delete_object`.
	pub fn add_delete_response(&self, response: K8sResult<()>) {
		self.delete_responses.lock().unwrap().push(response);
	}

	/// Queue a response for the next call to `get_namespace`.
	pub fn add_namespace_response(&self, response: K8sResult<Namespace>) {
		self.namespace_responses.lock().unwrap().push(response);
	}

	/// Documents submitted through `create_object`, in call order.
	pub fn created(&self) -> Vec<serde_json::Value> {
		self.created.lock().unwrap().clone()
	}

	/// Workload names subscribed to through `watch_workload`.
	pub fn watched(&self) -> Vec<String> {
		self.watched.lock().unwrap().clone()
	}

	/// Identities passed to `delete_object`, in call order.
	pub fn deleted(&self) -> Vec<ObjectIdentity> {
		self.deleted.lock().unwrap().clone()
	}
}

#[async_trait]
impl ClusterClient for MockClusterClient {
	async fn create_object(
		&self,
		_namespace: &str,
		document: serde_json::Value,
	) -> Result<CreateOutcome, K8sError> {
		self.created.lock().unwrap().push(document.clone());
		let mut responses = self.create_responses.lock().unwrap();
		if responses.is_empty() {
			Ok(CreateOutcome::Created(ObjectIdentity {
				kind: document
					.get("kind")
					.and_then(|v| v.as_str())
					.unwrap_or_default()
					.to_string(),
				name: document
					.pointer("/metadata/name")
					.and_then(|v| v.as_str())
					.unwrap_or_default()
					.to_string(),
			}))
		} else {
			responses.remove(0)
		}
	}

	async fn watch_workload(
		&self,
		_namespace: &str,
		name: &str,
		_timeout: Duration,
	) -> Result<WatchStream, K8sError> {
		self.watched.lock().unwrap().push(name.to_string());
		let events: Vec<K8sResult<WorkloadEvent>> =
			self.watch_events.lock().unwrap().drain(..).collect();
		Ok(Box::pin(futures::stream::iter(events)))
	}

	async fn delete_object(
		&self,
		_namespace: &str,
		kind: &str,
		name: &str,
	) -> Result<(), K8sError> {
		self.deleted.lock().unwrap().push(ObjectIdentity {
			kind: kind.to_string(),
			name: name.to_string(),
		});
		let mut responses = self.delete_responses.lock().unwrap();
		if responses.is_empty() {
			Ok(())
		} else {
			responses.remove(0)
		}
	}

	async fn get_namespace(&self, _name: &str) -> Result<Namespace, K8sError> {
		let mut responses = self.namespace_responses.lock().unwrap();
		if responses.is_empty() {
			Ok(Namespace::default())
		} else {
			responses.remove(0)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::StreamExt;
	use serde_json::json;

	use crate::types::{RolloutSnapshot, WorkloadEventKind};

	#[tokio::test]
	async fn default_create_echoes_document_identity() {
		let mock = MockClusterClient::new();
		let document = json!({
			"apiVersion": "v1",
			"kind": "Service",
			"metadata": { "name": "app-svc" },
		});

		let outcome = mock.create_object("default", document).await.unwrap();
		assert_eq!(
			outcome,
			CreateOutcome::Created(ObjectIdentity {
				kind: "Service".to_string(),
				name: "app-svc".to_string(),
			})
		);
		assert_eq!(mock.created().len(), 1);
	}

	#[tokio::test]
	async fn create_responses_are_fifo() {
		let mock = MockClusterClient::new();
		mock.add_create_response(Err(K8sError::AlreadyExists {
			kind: "Deployment".to_string(),
			name: "app".to_string(),
		}));
		mock.add_create_response(Ok(CreateOutcome::Created(ObjectIdentity {
			kind: "Service".to_string(),
			name: "app-svc".to_string(),
		})));

		let first = mock.create_object("default", json!({})).await;
		assert!(matches!(first, Err(K8sError::AlreadyExists { .. })));

		let second = mock.create_object("default", json!({})).await;
		assert!(second.is_ok());
	}

	#[tokio::test]
	async fn watch_stream_yields_queued_events_then_ends() {
		let mock = MockClusterClient::new();
		mock.add_watch_event(Ok(WorkloadEvent {
			kind: WorkloadEventKind::Applied,
			snapshot: RolloutSnapshot::default(),
		}));

		let mut stream = mock
			.watch_workload("default", "app", Duration::from_secs(1))
			.await
			.unwrap();
		assert!(stream.next().await.is_some());
		assert!(stream.next().await.is_none());
		assert_eq!(mock.watched(), vec!["app".to_string()]);
	}

	#[tokio::test]
	async fn delete_records_call_order() {
		let mock = MockClusterClient::new();
		mock.delete_object("default", "Service", "app-svc")
			.await
			.unwrap();
		mock.delete_object("default", "Deployment", "app")
			.await
			.unwrap();

		let deleted = mock.deleted();
		assert_eq!(deleted.len(), 2);
		assert_eq!(deleted[0].kind, "Service");
		assert_eq!(deleted[1].kind, "Deployment");
	}
}
