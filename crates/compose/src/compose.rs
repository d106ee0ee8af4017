//! Composition validator and class builder.
//!
//! # Role
//!
//! Drives a [`ClassSpec`] through the resolution stages and commits the
//! result as an immutable [`Class`].
//!
//! # Mental Model
//!
//! Each stage is a distinct type consumed by value, so a class cannot skip a
//! stage or be observed half-built:
//!
//! ```text
//! Unresolved --classify--> Classified --resolve--> Resolved --validate--> Validated --commit--> ClassRef
//! ```
//!
//! An explicit storage layout in the body is rejected during `classify`,
//! before any field is resolved. Any failing transition drops the partial state and returns a
//! [`CompositionError`]; the registry is only touched after `commit`.
//!
//! # Invariants
//!
//! - Metadata is attached exactly once, when the class is constructed.
//! - A mixin allocates no storage of its own.
//! - Every binding the class installs has its `bind` hook called once, after
//!   the class exists.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::binding::ClassVar;
use crate::candidates::{CandidateSource, DeclaredCandidates};
use crate::class::{Class, ClassRef, Storage};
use crate::config::{ComposeConfig, DYNAMIC_FIELDS, LAYOUT_ATTR};
use crate::error::CompositionError;
use crate::member::Member;
use crate::metadata::ClassMetadata;
use crate::mro;
use crate::registry::{ClassRegistry, Registration};
use crate::resolve::{AbstractResolution, BaseResolution, FieldLayout, classify, resolve_abstract, resolve_fields};
use crate::spec::ClassSpec;
use crate::value::Name;

/// Composes classes and publishes them in a [`ClassRegistry`].
pub struct Composer {
	config: ComposeConfig,
	candidates: Box<dyn CandidateSource>,
	registry: ClassRegistry,
}

impl Composer {
	/// Creates a composer reading candidates from [`ClassSpec`] declarations.
	pub fn new(config: ComposeConfig) -> Self {
		let registry = ClassRegistry::new(config.duplicate_names);
		Self {
			config,
			candidates: Box::new(DeclaredCandidates),
			registry,
		}
	}

	/// Replaces the field-candidate source.
	pub fn with_candidates(mut self, source: impl CandidateSource + 'static) -> Self {
		self.candidates = Box::new(source);
		self
	}

	pub fn config(&self) -> &ComposeConfig {
		&self.config
	}

	/// Classes committed by this composer.
	pub fn registry(&self) -> &ClassRegistry {
		&self.registry
	}

	/// Composes, commits, and registers a class.
	///
	/// # Errors
	///
	/// Returns the first [`CompositionError`] raised by any stage. A failed
	/// composition leaves no trace in the registry.
	pub fn compose(&self, spec: ClassSpec) -> Result<ClassRef, CompositionError> {
		let result = Unresolved { spec }
			.classify()
			.and_then(|c| c.resolve(&self.config, self.candidates.as_ref()))
			.map(Resolved::validate)
			.map(|v| v.commit(&self.config));

		match result {
			Ok(class) => {
				if let Registration::Rejected(existing) = self.registry.register(&class) {
					debug!(class = %class.name(), existing = ?existing.id(), "committed class not registered");
				}
				Ok(class)
			}
			Err(err) => {
				debug!(class = %err.class(), error = %err, "composition rejected");
				Err(err)
			}
		}
	}
}

impl Default for Composer {
	fn default() -> Self {
		Self::new(ComposeConfig::default())
	}
}

impl std::fmt::Debug for Composer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Composer")
			.field("config", &self.config)
			.field("registry", &self.registry)
			.finish_non_exhaustive()
	}
}

struct Unresolved {
	spec: ClassSpec,
}

struct Classified {
	spec: ClassSpec,
	ancestors: Vec<ClassRef>,
	bases: BaseResolution,
}

struct Resolved {
	spec: ClassSpec,
	ancestors: Vec<ClassRef>,
	bases: BaseResolution,
	layout: FieldLayout,
	abstracts: AbstractResolution,
}

struct Validated {
	spec: ClassSpec,
	ancestors: Vec<ClassRef>,
	bases: BaseResolution,
	layout: FieldLayout,
	metadata: ClassMetadata,
}

impl Unresolved {
	fn classify(self) -> Result<Classified, CompositionError> {
		let spec = self.spec;
		let bases = classify(&spec.name, &spec.bases)?;
		if spec.namespace.contains_key(LAYOUT_ATTR) {
			return Err(CompositionError::ExplicitLayout { class: spec.name });
		}
		let ancestors = mro::linearize(&spec.bases).ok_or_else(|| CompositionError::InconsistentHierarchy {
			class: spec.name.clone(),
			bases: spec.bases.iter().map(|b| b.name().clone()).collect(),
		})?;
		debug!(
			class = %spec.name,
			concrete = %bases.concrete_base.name(),
			mixins = bases.mixins.len(),
			requirements = bases.abstract_attrs.len(),
			"bases classified"
		);
		Ok(Classified { spec, ancestors, bases })
	}
}

impl Classified {
	fn resolve(self, config: &ComposeConfig, source: &dyn CandidateSource) -> Result<Resolved, CompositionError> {
		let Self { spec, ancestors, bases } = self;
		let candidates = source.candidates(&spec);
		let layout = resolve_fields(&spec.name, &bases, &candidates, &spec.namespace, config)?;
		let abstracts = resolve_abstract(&spec.name, &bases, &spec.namespace, spec.mixin, config)?;
		debug!(
			class = %spec.name,
			fields = layout.fields.len(),
			data_bound = layout.data_bound.len(),
			classvars = layout.classvars.len(),
			abstract_attrs = abstracts.abstract_attrs.len(),
			is_mixin = abstracts.is_mixin,
			"layout and requirements resolved"
		);
		Ok(Resolved {
			spec,
			ancestors,
			bases,
			layout,
			abstracts,
		})
	}
}

impl Resolved {
	fn validate(self) -> Validated {
		let mut fields: IndexSet<Name> = self.layout.fields.clone();
		fields.extend(self.bases.concrete_base.transitive_fields());
		let metadata = ClassMetadata {
			fields: fields.into_iter().collect(),
			data_bound_attrs: self.layout.data_bound.clone(),
			abstract_attrs: self.abstracts.abstract_attrs,
			is_mixin: self.abstracts.is_mixin,
			is_abstract: self.abstracts.is_abstract,
		};
		Validated {
			spec: self.spec,
			ancestors: self.ancestors,
			bases: self.bases,
			layout: self.layout,
			metadata,
		}
	}
}

impl Validated {
	fn commit(self, config: &ComposeConfig) -> ClassRef {
		let Self {
			spec,
			ancestors,
			bases,
			layout,
			metadata,
		} = self;

		let storage = if metadata.is_mixin {
			Storage::default()
		} else {
			// A dynamic lineage may arrive through a mixin rather than the concrete base.
			let dynamic =
				bases.concrete_base.lineage_dynamic() || DYNAMIC_FIELDS.iter().any(|f| metadata.has_field(f));
			Storage::new(metadata.fields.iter(), dynamic)
		};

		let mut attrs: IndexMap<Name, Member> = spec.namespace;
		for (name, member) in layout.classvars {
			let member = match member {
				Member::Value(value) => Member::binding(ClassVar::new(value)),
				other => other,
			};
			attrs.insert(name, member);
		}

		let name = spec.name;
		let own_fields = layout.fields.into_iter().collect();
		debug!(
			class = %name,
			fields = ?metadata.fields,
			slots = storage.fields.len(),
			is_mixin = metadata.is_mixin,
			is_abstract = metadata.is_abstract,
			"class committed"
		);
		let class = ClassRef::new(Class::committed(
			name,
			spec.bases,
			ancestors,
			metadata,
			own_fields,
			attrs,
			storage,
			config.guard_instantiation,
		));

		let bindings: Vec<(Name, Member)> = class
			.own_attr_names()
			.into_iter()
			.filter_map(|n| class.own_attr(&n).filter(|m| m.as_binding().is_some()).map(|m| (n, m)))
			.collect();
		for (name, member) in bindings {
			if let Member::Binding(binding) = member {
				let previous = class.lookup_inherited(&name);
				binding.bind(&class, &name, previous.as_ref());
			}
		}

		class
	}
}
