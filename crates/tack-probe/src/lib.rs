// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Deployment probe business logic for tack.
//!
//! This crate implements the probe lifecycle around the Kubernetes client
//! (tack-k8s):
//!
//! - Multi-document manifest decoding
//! - Idempotent resource creation with a teardown ledger
//! - Rollout observation with soft timeouts
//! - Best-effort reverse-order teardown

pub mod config;
pub mod error;
pub mod ledger;
pub mod manifest;
pub mod probe;
pub mod report;

pub use config::ProbeConfig;
pub use error::{ProbeError, ProbeResult};
pub use ledger::Ledger;
pub use manifest::{decode_manifest, ResourceDescriptor};
pub use probe::Probe;
pub use report::{CleanupSummary, ProbeReport, RolloutOutcome};
