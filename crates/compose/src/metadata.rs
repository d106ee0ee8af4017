use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::value::Name;

/// Immutable composition result attached to a committed class.
///
/// Published exactly once, at commit, and read by every later composition
/// that lists the class as a base and by the instantiation guard.
///
/// # Invariants
///
/// - `is_abstract == !abstract_attrs.is_empty()`.
/// - `is_abstract` implies `is_mixin`.
/// - `fields` holds the class's own fields followed by the inherited ones, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassMetadata {
	/// Storage fields: own first, then inherited from the concrete base lineage.
	pub fields: Arc<[Name]>,
	/// Candidate names served by data bindings instead of storage.
	pub data_bound_attrs: BTreeSet<Name>,
	/// Unsatisfied requirement names.
	pub abstract_attrs: BTreeSet<Name>,
	/// Whether the class refuses instantiation.
	pub is_mixin: bool,
	/// Whether any requirement remains unsatisfied.
	pub is_abstract: bool,
}

impl ClassMetadata {
	/// Returns true if `name` is a storage field of the class.
	pub fn has_field(&self, name: &str) -> bool {
		self.fields.iter().any(|f| &**f == name)
	}

	/// Contribution of this class when listed as a base: `Some` marks a mixin.
	pub(crate) fn mixin_requirements(&self) -> Option<&BTreeSet<Name>> {
		(self.is_mixin || !self.abstract_attrs.is_empty()).then_some(&self.abstract_attrs)
	}
}
