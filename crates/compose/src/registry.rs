//! Name → class table for committed classes.
//!
//! # Concurrency
//!
//! - **Reads:** Wait-free (atomic load of the current snapshot).
//! - **Writes:** Lock-free with linearizability (CAS retry loop on registration).
//!
//! # Invariants
//!
//! - Only committed classes are ever published; a rejected composition never
//!   reaches [`ClassRegistry::register`].
//! - Concurrent registrations are never lost: each retry rebuilds from the
//!   snapshot it swaps against.

use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap as HashMap;
use tracing::debug;

use crate::class::ClassRef;
use crate::config::DuplicateNames;
use crate::value::Name;

type Snapshot = HashMap<Name, ClassRef>;

/// Outcome of publishing a class under its name.
#[derive(Debug, Clone)]
pub enum Registration {
	/// The name was free.
	Inserted,
	/// The class replaced an earlier one with the same name.
	Replaced(ClassRef),
	/// An earlier class keeps the name; the new class was not published.
	Rejected(ClassRef),
}

/// Concurrent, snapshot-published table of committed classes.
pub struct ClassRegistry {
	snap: ArcSwap<Snapshot>,
	policy: DuplicateNames,
}

impl ClassRegistry {
	/// Creates an empty registry.
	pub fn new(policy: DuplicateNames) -> Self {
		Self {
			snap: ArcSwap::from_pointee(Snapshot::default()),
			policy,
		}
	}

	/// Looks up a class by name.
	#[inline]
	pub fn get(&self, name: &str) -> Option<ClassRef> {
		self.snap.load().get(name).cloned()
	}

	/// Registered names, sorted.
	pub fn names(&self) -> Vec<Name> {
		let mut names: Vec<Name> = self.snap.load().keys().cloned().collect();
		names.sort_unstable();
		names
	}

	/// Number of registered classes.
	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	/// Returns true if no class is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Publishes `class` under its name according to the duplicate policy.
	pub fn register(&self, class: &ClassRef) -> Registration {
		loop {
			let old = self.snap.load_full();
			let existing = old.get(class.name()).cloned();

			if let Some(existing) = &existing {
				if Arc::ptr_eq(existing, class) {
					return Registration::Inserted;
				}
				if self.policy == DuplicateNames::Reject {
					debug!(class = %class.name(), "class name already registered; keeping existing");
					return Registration::Rejected(existing.clone());
				}
			}

			let mut next = (*old).clone();
			next.insert(class.name().clone(), class.clone());
			let prev = self.snap.compare_and_swap(&old, Arc::new(next));

			if Arc::ptr_eq(&prev, &old) {
				return match existing {
					Some(existing) => {
						debug!(class = %class.name(), "class name re-registered; replacing");
						Registration::Replaced(existing)
					}
					None => Registration::Inserted,
				};
			}
			// CAS failed, retry with updated snapshot
		}
	}
}

impl Default for ClassRegistry {
	fn default() -> Self {
		Self::new(DuplicateNames::default())
	}
}

impl std::fmt::Debug for ClassRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ClassRegistry")
			.field("policy", &self.policy)
			.field("names", &self.names())
			.finish()
	}
}

#[cfg(test)]
mod tests;
