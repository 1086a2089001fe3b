// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Probe error types.

/// Result type alias for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that abort a probe run.
///
/// Soft conditions (rollout timeout, watch stream failures, individual
/// deletion failures) are not errors; they are reported through
/// [`crate::ProbeReport`] and the run carries on.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
	/// Manifest stream could not be decoded
	#[error("Manifest error: {message}")]
	Manifest { message: String },

	/// Target namespace does not exist
	#[error("Namespace not found: {name}")]
	NamespaceNotFound { name: String },

	/// Kubernetes error
	#[error(transparent)]
	K8sError(#[from] tack_k8s::K8sError),
}
