// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use tack_k8s::ObjectIdentity;

/// Ordered record of the objects a probe run is responsible for deleting.
///
/// Entries are appended while resources are created (insertion order is
/// creation order) and consumed in reverse by the teardown phase. The
/// ledger is never mutated after the create phase completes.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
	entries: Vec<ObjectIdentity>,
}

impl Ledger {
	/// Create an empty ledger.
	pub fn new() -> Self {
		Self::default()
	}

	/// Record an object as owned by this run.
	///
	/// An identity that is already tracked is ignored, so re-submitting a
	/// descriptor cannot double-track the object.
	pub fn track(&mut self, identity: ObjectIdentity) {
		if !self.entries.contains(&identity) {
			self.entries.push(identity);
		}
	}

	/// First tracked object of the given kind, in creation order.
	pub fn first_of_kind(&self, kind: &str) -> Option<&ObjectIdentity> {
		self.entries.iter().find(|entry| entry.kind == kind)
	}

	/// Entries in reverse creation order, the order they are deleted in.
	pub fn reverse_entries(&self) -> impl Iterator<Item = &ObjectIdentity> + '_ {
		self.entries.iter().rev()
	}

	/// Entries in creation order.
	pub fn entries(&self) -> &[ObjectIdentity] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn identity(kind: &str, name: &str) -> ObjectIdentity {
		ObjectIdentity {
			kind: kind.to_string(),
			name: name.to_string(),
		}
	}

	#[test]
	fn track_preserves_insertion_order() {
		let mut ledger = Ledger::new();
		ledger.track(identity("Deployment", "app"));
		ledger.track(identity("Service", "app-svc"));

		let kinds: Vec<&str> = ledger.entries().iter().map(|e| e.kind.as_str()).collect();
		assert_eq!(kinds, vec!["Deployment", "Service"]);
	}

	#[test]
	fn track_ignores_duplicate_identity() {
		let mut ledger = Ledger::new();
		ledger.track(identity("Deployment", "app"));
		ledger.track(identity("Deployment", "app"));

		assert_eq!(ledger.len(), 1);
	}

	#[test]
	fn same_name_different_kind_are_distinct() {
		let mut ledger = Ledger::new();
		ledger.track(identity("Deployment", "app"));
		ledger.track(identity("Service", "app"));

		assert_eq!(ledger.len(), 2);
	}

	#[test]
	fn reverse_entries_inverts_creation_order() {
		let mut ledger = Ledger::new();
		ledger.track(identity("Deployment", "a"));
		ledger.track(identity("Service", "b"));
		ledger.track(identity("ConfigMap", "c"));

		let names: Vec<&str> = ledger.reverse_entries().map(|e| e.name.as_str()).collect();
		assert_eq!(names, vec!["c", "b", "a"]);
	}

	#[test]
	fn first_of_kind_returns_earliest_match() {
		let mut ledger = Ledger::new();
		ledger.track(identity("Service", "svc"));
		ledger.track(identity("Deployment", "first"));
		ledger.track(identity("Deployment", "second"));

		assert_eq!(ledger.first_of_kind("Deployment").unwrap().name, "first");
		assert!(ledger.first_of_kind("Ingress").is_none());
	}
}
