// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! K8s client abstraction for the tack deployment probe.
//!
//! This crate provides:
//! - A trait-based K8s client abstraction for testability
//! - Production implementation using the kube crate
//! - Common types for dynamic object creation and rollout watching

mod client;
mod error;
mod kube_client;
mod mock;
mod types;

pub use client::ClusterClient;
pub use error::{K8sError, K8sResult};
pub use kube_client::KubeClient;
pub use mock::MockClusterClient;
pub use types::{
	CreateOutcome, Namespace, ObjectIdentity, RolloutSnapshot, WatchStream, WorkloadEvent,
	WorkloadEventKind,
};
