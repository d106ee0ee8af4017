use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::BaseResolution;
use crate::config::ComposeConfig;
use crate::error::CompositionError;
use crate::member::Member;
use crate::value::Name;

/// Requirement state of a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractResolution {
	pub abstract_attrs: BTreeSet<Name>,
	pub is_mixin: bool,
	pub is_abstract: bool,
}

/// Merges inherited requirements with the body's declarations.
///
/// A requirement marker adds its name; any other binding removes it.
///
/// # Errors
///
/// Returns [`CompositionError::ArityMismatch`] when a method implements a
/// pinned requirement with a different arity (and `check_arity` is set), or
/// [`CompositionError::AbstractMixinConflict`] when `mixin_override` forces
/// a non-mixin while requirements remain.
pub fn resolve_abstract(
	class: &Name,
	resolution: &BaseResolution,
	namespace: &IndexMap<Name, Member>,
	mixin_override: Option<bool>,
	config: &ComposeConfig,
) -> Result<AbstractResolution, CompositionError> {
	let mut abstract_attrs = resolution.abstract_attrs.clone();

	for (name, member) in namespace {
		if let Member::Requirement(_) = member {
			trace!(class = %class, name = %name, "requirement declared");
			abstract_attrs.insert(name.clone());
			continue;
		}
		if config.check_arity
			&& let Member::Method(method) = member
			&& let Some(&expected) = resolution.signatures.get(name)
			&& method.arity() != expected
		{
			return Err(CompositionError::ArityMismatch {
				class: class.clone(),
				name: name.clone(),
				expected,
				found: method.arity(),
			});
		}
		if abstract_attrs.remove(name) {
			trace!(class = %class, name = %name, kind = member.kind(), "requirement satisfied");
		}
	}

	let is_abstract = !abstract_attrs.is_empty();
	let is_mixin = match (is_abstract, mixin_override) {
		(true, Some(false)) => {
			return Err(CompositionError::AbstractMixinConflict {
				class: class.clone(),
				missing: abstract_attrs.into_iter().collect(),
			});
		}
		(true, _) => true,
		(false, Some(true)) => {
			debug!(class = %class, "mixin declared with no requirements");
			true
		}
		(false, _) => false,
	};

	Ok(AbstractResolution {
		abstract_attrs,
		is_mixin,
		is_abstract,
	})
}
