use std::collections::BTreeSet;

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::class::{Class, ClassId, ClassKind, ClassRef};
use crate::error::CompositionError;
use crate::member::{Member, Requirement};
use crate::value::Name;

/// Partition of a class's declared bases.
#[derive(Debug, Clone)]
pub struct BaseResolution {
	/// The single base supplying an instantiable storage lineage.
	pub concrete_base: ClassRef,
	/// Bases contributing requirements and/or fields, in declaration order.
	pub mixins: Vec<ClassRef>,
	/// Declared bases minus capability-only ones, in declaration order.
	pub all_bases: Vec<ClassRef>,
	/// Requirement names inherited from mixins and protocols.
	pub abstract_attrs: BTreeSet<Name>,
	/// Fields inherited transitively through mixins, deduplicated by first occurrence.
	pub mixin_fields: IndexSet<Name>,
	/// Pinned method arities for inherited requirements.
	pub signatures: FxHashMap<Name, usize>,
}

enum Role<'a> {
	Protocol(Vec<&'a Name>),
	Mixin(Vec<&'a Name>),
	Concrete,
}

fn role(base: &Class) -> Role<'_> {
	match base.kind() {
		ClassKind::Protocol(p) => Role::Protocol(p.requirements.keys().collect()),
		ClassKind::Composed(meta) => match meta.mixin_requirements() {
			Some(reqs) => Role::Mixin(reqs.iter().collect()),
			None => Role::Concrete,
		},
		ClassKind::Native(layout) if !layout.abstract_methods.is_empty() => Role::Mixin(layout.abstract_methods.iter().collect()),
		ClassKind::Native(_) | ClassKind::Root => Role::Concrete,
	}
}

/// Classifies `bases` in declaration order.
///
/// # Errors
///
/// Returns [`CompositionError::DuplicateBase`] if a base is listed twice, or
/// [`CompositionError::MultipleConcreteBases`] on the second concrete base.
pub fn classify(class: &Name, bases: &[ClassRef]) -> Result<BaseResolution, CompositionError> {
	let mut concrete: Option<ClassRef> = None;
	let mut mixins = Vec::new();
	let mut all_bases = Vec::with_capacity(bases.len());
	let mut abstract_attrs = BTreeSet::new();
	let mut mixin_fields = IndexSet::new();
	let mut signatures = FxHashMap::default();

	for (i, base) in bases.iter().enumerate() {
		if bases[..i].iter().any(|b| b.id() == base.id()) {
			return Err(CompositionError::DuplicateBase {
				class: class.clone(),
				base: base.name().clone(),
			});
		}

		match role(base) {
			Role::Protocol(reqs) => {
				trace!(class = %class, base = %base.name(), requirements = reqs.len(), "capability-only base");
				record_requirements(base, reqs, &mut abstract_attrs, &mut signatures);
			}
			Role::Mixin(reqs) => {
				trace!(class = %class, base = %base.name(), requirements = reqs.len(), "mixin base");
				record_requirements(base, reqs, &mut abstract_attrs, &mut signatures);
				mixin_fields.extend(base.transitive_fields());
				mixins.push(base.clone());
				all_bases.push(base.clone());
			}
			Role::Concrete if base.id() == ClassId::ROOT => all_bases.push(base.clone()),
			Role::Concrete => {
				if let Some(first) = &concrete {
					return Err(CompositionError::MultipleConcreteBases {
						class: class.clone(),
						first: first.name().clone(),
						second: base.name().clone(),
					});
				}
				trace!(class = %class, base = %base.name(), "concrete base");
				concrete = Some(base.clone());
				all_bases.push(base.clone());
			}
		}
	}

	Ok(BaseResolution {
		concrete_base: concrete.unwrap_or_else(Class::root),
		mixins,
		all_bases,
		abstract_attrs,
		mixin_fields,
		signatures,
	})
}

fn record_requirements(base: &Class, reqs: Vec<&Name>, names: &mut BTreeSet<Name>, signatures: &mut FxHashMap<Name, usize>) {
	for name in reqs {
		if let Some(Member::Requirement(Requirement { arity: Some(n) })) = base.lookup(name) {
			signatures.insert(name.clone(), n);
		}
		names.insert(name.clone());
	}
}
