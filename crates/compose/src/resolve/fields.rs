use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use super::BaseResolution;
use crate::candidates::Candidates;
use crate::config::ComposeConfig;
use crate::error::CompositionError;
use crate::member::Member;
use crate::value::Name;

/// Storage layout decided for a class body.
#[derive(Debug, Clone, Default)]
pub struct FieldLayout {
	/// Fields the class allocates itself, in candidate order.
	pub fields: IndexSet<Name>,
	/// Candidates served by data bindings instead of storage.
	pub data_bound: BTreeSet<Name>,
	/// Candidates that are also class-level values, with the member to install for each.
	///
	/// Plain values (including values read through an inherited wrapper) are
	/// stored as [`Member::Value`]; non-data bindings are kept as-is.
	pub classvars: IndexMap<Name, Member>,
}

/// Conventionally private: one leading underscore, no trailing one.
fn is_private(name: &str) -> bool {
	name.starts_with('_') && !name.ends_with('_')
}

/// Finds `name` bound in the body or on any non-protocol base.
fn find_classvar(name: &str, namespace: &IndexMap<Name, Member>, resolution: &BaseResolution) -> Option<Member> {
	namespace
		.get(name)
		.cloned()
		.or_else(|| resolution.all_bases.iter().find_map(|b| b.lookup(name)))
}

/// Decides which candidate fields the class allocates.
///
/// Candidates are the mixins' fields, then the explicit declarations, then
/// the assigned names, deduplicated by first occurrence.
///
/// # Errors
///
/// Returns [`CompositionError::PrivateAttributeAccess`] when a candidate
/// reaches a private field of the concrete lineage without being declared
/// explicitly.
pub fn resolve_fields(
	class: &Name,
	resolution: &BaseResolution,
	candidates: &Candidates,
	namespace: &IndexMap<Name, Member>,
	config: &ComposeConfig,
) -> Result<FieldLayout, CompositionError> {
	let reserved = config.reserved();
	let inherited = resolution.concrete_base.transitive_fields();
	let ordered: IndexSet<&Name> = resolution.mixin_fields.iter().chain(candidates.ordered()).collect();

	let mut layout = FieldLayout::default();
	for candidate in ordered {
		if reserved.contains(&**candidate) {
			trace!(class = %class, candidate = %candidate, "reserved; skipped");
			continue;
		}

		if inherited.contains(candidate) {
			if config.protect_private && is_private(candidate) && !candidates.explicit.contains(candidate) {
				let owner = resolution.concrete_base.field_owner(candidate).unwrap_or(resolution.concrete_base.name());
				return Err(CompositionError::PrivateAttributeAccess {
					class: class.clone(),
					field: candidate.clone(),
					owner: owner.clone(),
				});
			}
			trace!(class = %class, candidate = %candidate, "inherited; not reallocated");
			continue;
		}

		match find_classvar(candidate, namespace, resolution) {
			Some(member) if member.is_data_binding() => {
				trace!(class = %class, candidate = %candidate, "data binding; no storage");
				layout.data_bound.insert(candidate.clone());
				continue;
			}
			Some(member @ Member::Binding(_)) => {
				let member = match member.class_value() {
					Some(value) => Member::Value(value),
					None => member,
				};
				trace!(class = %class, candidate = %candidate, kind = member.kind(), "class variable shadows field");
				layout.classvars.insert(candidate.clone(), member);
			}
			Some(member @ Member::Value(_)) => {
				trace!(class = %class, candidate = %candidate, "class variable shadows field");
				layout.classvars.insert(candidate.clone(), member);
			}
			Some(Member::Method(_) | Member::Requirement(_)) | None => {}
		}

		trace!(class = %class, candidate = %candidate, "field allocated");
		layout.fields.insert(candidate.clone());
	}

	Ok(layout)
}
