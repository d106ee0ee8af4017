//! Field-candidate discovery.
//!
//! The resolver never inspects a class body itself; it asks a
//! [`CandidateSource`] for the names the body declares or assigns.

use indexmap::IndexSet;

use crate::spec::ClassSpec;
use crate::value::Name;

/// Candidate field names reported for a class body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
	/// Names the body declares as fields. Explicit declaration overrides private-field protection.
	pub explicit: IndexSet<Name>,
	/// Names assigned on instances, discovered from the body.
	pub assigned: IndexSet<Name>,
}

impl Candidates {
	/// Explicit names followed by assigned names, deduplicated by first occurrence.
	pub fn ordered(&self) -> impl Iterator<Item = &Name> {
		self.explicit.iter().chain(self.assigned.iter().filter(|n| !self.explicit.contains(*n)))
	}
}

/// Source of candidate field names. Must be deterministic and order-preserving.
pub trait CandidateSource: Send + Sync {
	fn candidates(&self, spec: &ClassSpec) -> Candidates;
}

/// Reports the fields and assignments recorded on the [`ClassSpec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredCandidates;

impl CandidateSource for DeclaredCandidates {
	fn candidates(&self, spec: &ClassSpec) -> Candidates {
		Candidates {
			explicit: spec.declared_fields().clone(),
			assigned: spec.assigned_attrs().clone(),
		}
	}
}
