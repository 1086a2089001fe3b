// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Self-cleaning Kubernetes deployment probe binary.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tack_k8s::KubeClient;
use tack_probe::{Probe, ProbeConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// tack - deploy a manifest, watch it become ready, then tear it down.
#[derive(Parser, Debug)]
#[command(
	name = "tack",
	about = "Self-cleaning Kubernetes deployment probe",
	version
)]
struct Args {
	/// Path to the multi-document manifest to deploy
	#[arg(long, env = "TACK_MANIFEST", default_value = "hellowhale.yml")]
	manifest: String,

	/// Namespace to deploy into
	#[arg(long, env = "TACK_NAMESPACE", default_value = "default")]
	namespace: String,

	/// Seconds to keep the resources up once deployed
	#[arg(long, env = "TACK_HOLD_SECS", default_value_t = 60)]
	hold_secs: u64,

	/// Seconds to wait for the workload rollout before giving up
	#[arg(long, env = "TACK_READY_TIMEOUT_SECS", default_value_t = 600)]
	ready_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		manifest = %args.manifest,
		namespace = %args.namespace,
		"starting tack"
	);

	let manifest = std::fs::read_to_string(&args.manifest)
		.with_context(|| format!("Failed to read manifest {}", args.manifest))?;

	let client = KubeClient::new()
		.await
		.context("Failed to connect to the cluster")?;

	let probe = Probe::new(
		Arc::new(client),
		ProbeConfig {
			namespace: args.namespace,
			hold_secs: args.hold_secs,
			ready_timeout_secs: args.ready_timeout_secs,
		},
	);

	let report = probe.run(&manifest).await?;

	tracing::info!(
		tracked = report.tracked.len(),
		rollout = ?report.rollout,
		deleted = report.cleanup.deleted,
		missing = report.cleanup.missing,
		failed = report.cleanup.failed,
		skipped = report.cleanup.skipped,
		"Probe run complete"
	);

	Ok(())
}
