// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use async_trait::async_trait;

use crate::error::K8sError;
use crate::types::{CreateOutcome, Namespace, WatchStream};

/// Trait for K8s client operations.
///
/// This abstraction allows for easy mocking in tests while providing
/// a clean interface for the operations the deployment probe needs.
#[async_trait]
pub trait ClusterClient: Send + Sync {
	/// Submit one manifest document to the cluster.
	///
	/// A document whose kind is `List` is expanded: each of its items is
	/// created in order and the outcome reports every resulting identity.
	/// An existing object surfaces as [`K8sError::AlreadyExists`] carrying
	/// the identity of the colliding object.
	async fn create_object(
		&self,
		namespace: &str,
		document: serde_json::Value,
	) -> Result<CreateOutcome, K8sError>;

	/// Subscribe to change events for a single workload by name.
	///
	/// The returned stream is bounded by `timeout`; once the window
	/// elapses the stream ends rather than erroring.
	async fn watch_workload(
		&self,
		namespace: &str,
		name: &str,
		timeout: Duration,
	) -> Result<WatchStream, K8sError>;

	/// Delete an object by kind and name.
	///
	/// Fails with [`K8sError::UnsupportedKind`] when no delete handler is
	/// registered for the kind.
	async fn delete_object(&self, namespace: &str, kind: &str, name: &str)
		-> Result<(), K8sError>;

	/// Get a namespace by name.
	async fn get_namespace(&self, name: &str) -> Result<Namespace, K8sError>;
}
