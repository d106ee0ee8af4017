//! Class descriptors.
//!
//! A [`Class`] is immutable once constructed except for its class-level
//! attribute table, which is mutated only through
//! [`Class::set_class_attr`] so that class-variable wrappers observe every
//! class-level assignment.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, LazyLock};

use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::binding::ClassAssign;
use crate::config::DYNAMIC_FIELDS;
use crate::error::{AttributeError, CompositionError, InstantiationError};
use crate::instance::Instance;
use crate::member::{Member, Requirement};
use crate::metadata::ClassMetadata;
use crate::mro;
use crate::value::{Name, Value};

/// Shared handle to a class.
pub type ClassRef = Arc<Class>;

/// Process-unique class identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u32);

impl ClassId {
	/// Identity of the universal root.
	pub const ROOT: ClassId = ClassId(0);

	fn next() -> Self {
		static NEXT: AtomicU32 = AtomicU32::new(1);
		ClassId(NEXT.fetch_add(1, Ordering::Relaxed))
	}

	/// Raw numeric value.
	pub fn as_u32(self) -> u32 {
		self.0
	}
}

/// Layout of a host-provided type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeLayout {
	/// Storage fields declared directly on the type.
	pub fields: Vec<Name>,
	/// Abstract method names; a non-empty set makes the type a mixin when used as a base.
	pub abstract_methods: BTreeSet<Name>,
	/// Instances carry an open attribute map.
	pub dynamic: bool,
}

/// Capability-only interface: requirement names and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Protocol {
	/// Required members, in declaration order.
	pub requirements: IndexMap<Name, Requirement>,
}

/// What sort of type a class is, as far as composition is concerned.
#[derive(Debug, Clone)]
pub enum ClassKind {
	/// The universal root.
	Root,
	/// Host-provided type with a fixed layout.
	Native(NativeLayout),
	/// Capability-only interface.
	Protocol(Protocol),
	/// Produced by [`Composer::compose`](crate::Composer::compose).
	Composed(ClassMetadata),
}

/// Instance storage table, computed once per class.
#[derive(Debug, Clone, Default)]
pub(crate) struct Storage {
	pub(crate) fields: Arc<[Name]>,
	pub(crate) index: FxHashMap<Name, usize>,
	pub(crate) dynamic: bool,
}

impl Storage {
	pub(crate) fn new<'a>(fields: impl IntoIterator<Item = &'a Name>, dynamic: bool) -> Self {
		let fields: Arc<[Name]> = fields.into_iter().filter(|f| !DYNAMIC_FIELDS.contains(&&***f)).cloned().collect();
		let index = fields.iter().enumerate().map(|(i, f)| (f.clone(), i)).collect();
		Self { fields, index, dynamic }
	}
}

/// A class: name, bases, attribute table, and composition kind.
pub struct Class {
	id: ClassId,
	name: Name,
	bases: Vec<ClassRef>,
	ancestors: Vec<ClassRef>,
	kind: ClassKind,
	own_fields: Box<[Name]>,
	attrs: RwLock<IndexMap<Name, Member>>,
	storage: Storage,
	guarded: bool,
}

static ROOT: LazyLock<ClassRef> = LazyLock::new(|| {
	Arc::new(Class {
		id: ClassId::ROOT,
		name: Name::from("object"),
		bases: Vec::new(),
		ancestors: Vec::new(),
		kind: ClassKind::Root,
		own_fields: Box::default(),
		attrs: RwLock::new(IndexMap::new()),
		storage: Storage::default(),
		guarded: false,
	})
});

/// Builder for a host-provided type.
#[derive(Debug, Clone)]
pub struct NativeSpec {
	name: Name,
	bases: Vec<ClassRef>,
	layout: NativeLayout,
	attrs: IndexMap<Name, Member>,
}

impl NativeSpec {
	/// Starts a native type with no bases, no fields, and a closed layout.
	pub fn new(name: impl Into<Name>) -> Self {
		Self {
			name: name.into(),
			bases: Vec::new(),
			layout: NativeLayout {
				fields: Vec::new(),
				abstract_methods: BTreeSet::new(),
				dynamic: false,
			},
			attrs: IndexMap::new(),
		}
	}

	/// Adds a base type.
	pub fn base(mut self, base: &ClassRef) -> Self {
		self.bases.push(base.clone());
		self
	}

	/// Declares storage fields.
	pub fn fields<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Name>,
	{
		self.layout.fields.extend(names.into_iter().map(Into::into));
		self
	}

	/// Declares abstract methods.
	pub fn abstract_methods<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Name>,
	{
		for name in names {
			let name = name.into();
			self.attrs.insert(name.clone(), Member::Requirement(Requirement::any()));
			self.layout.abstract_methods.insert(name);
		}
		self
	}

	/// Gives instances an open attribute map.
	pub fn dynamic(mut self) -> Self {
		self.layout.dynamic = true;
		self
	}

	/// Adds a class attribute.
	pub fn attr(mut self, name: impl Into<Name>, member: impl Into<Member>) -> Self {
		self.attrs.insert(name.into(), member.into());
		self
	}

	/// Finalizes the type.
	///
	/// # Errors
	///
	/// Returns [`CompositionError::InconsistentHierarchy`] if the bases cannot be linearized.
	pub fn build(self) -> Result<ClassRef, CompositionError> {
		let ancestors = mro::linearize(&self.bases).ok_or_else(|| CompositionError::InconsistentHierarchy {
			class: self.name.clone(),
			bases: self.bases.iter().map(|b| b.name.clone()).collect(),
		})?;
		let mut own: IndexSet<Name> = self.layout.fields.iter().cloned().collect();
		if self.layout.dynamic {
			own.extend(DYNAMIC_FIELDS.iter().map(|f| Name::from(*f)));
		}
		let own_fields: Box<[Name]> = own.into_iter().collect();

		let mut class = Class {
			id: ClassId::next(),
			name: self.name,
			bases: self.bases,
			ancestors,
			kind: ClassKind::Native(self.layout),
			own_fields,
			attrs: RwLock::new(self.attrs),
			storage: Storage::default(),
			guarded: true,
		};
		let fields = class.transitive_fields();
		let dynamic = class.lineage_dynamic();
		class.storage = Storage::new(fields.iter(), dynamic);
		Ok(Arc::new(class))
	}
}

impl Class {
	/// The universal root class.
	pub fn root() -> ClassRef {
		ROOT.clone()
	}

	/// Declares a capability-only interface.
	pub fn protocol<I, S>(name: impl Into<Name>, requirements: I) -> ClassRef
	where
		I: IntoIterator<Item = (S, Requirement)>,
		S: Into<Name>,
	{
		let protocol = Protocol {
			requirements: requirements.into_iter().map(|(n, r)| (n.into(), r)).collect(),
		};
		let attrs = protocol.requirements.iter().map(|(n, r)| (n.clone(), Member::Requirement(*r))).collect();
		Arc::new(Class {
			id: ClassId::next(),
			name: name.into(),
			bases: Vec::new(),
			ancestors: vec![Class::root()],
			kind: ClassKind::Protocol(protocol),
			own_fields: Box::default(),
			attrs: RwLock::new(attrs),
			storage: Storage::default(),
			guarded: true,
		})
	}

	#[allow(clippy::too_many_arguments, reason = "commit assembles every part of a class")]
	pub(crate) fn committed(
		name: Name,
		bases: Vec<ClassRef>,
		ancestors: Vec<ClassRef>,
		metadata: ClassMetadata,
		own_fields: Box<[Name]>,
		attrs: IndexMap<Name, Member>,
		storage: Storage,
		guarded: bool,
	) -> Self {
		Self {
			id: ClassId::next(),
			name,
			bases,
			ancestors,
			kind: ClassKind::Composed(metadata),
			own_fields,
			attrs: RwLock::new(attrs),
			storage,
			guarded,
		}
	}

	/// Process-unique identity.
	pub fn id(&self) -> ClassId {
		self.id
	}

	/// Class name.
	pub fn name(&self) -> &Name {
		&self.name
	}

	/// Declared bases, in declaration order.
	pub fn bases(&self) -> &[ClassRef] {
		&self.bases
	}

	/// Linearized ancestors, nearest first, excluding the class itself.
	pub fn ancestors(&self) -> &[ClassRef] {
		&self.ancestors
	}

	/// Composition kind.
	pub fn kind(&self) -> &ClassKind {
		&self.kind
	}

	/// Composition metadata, for classes produced by the composer.
	pub fn metadata(&self) -> Option<&ClassMetadata> {
		match &self.kind {
			ClassKind::Composed(m) => Some(m),
			_ => None,
		}
	}

	/// Returns true for capability-only interfaces.
	pub fn is_protocol(&self) -> bool {
		matches!(self.kind, ClassKind::Protocol(_))
	}

	/// Returns true if `other` is this class or one of its ancestors.
	pub fn is_subclass_of(&self, other: &Class) -> bool {
		self.id == other.id || self.ancestors.iter().any(|a| a.id == other.id)
	}

	/// Storage fields declared by this class itself.
	pub fn own_fields(&self) -> &[Name] {
		&self.own_fields
	}

	/// Every storage field name this class carries, own first, deduplicated.
	pub fn transitive_fields(&self) -> IndexSet<Name> {
		if let ClassKind::Composed(meta) = &self.kind {
			return meta.fields.iter().cloned().collect();
		}
		let mut out: IndexSet<Name> = self.own_fields.iter().cloned().collect();
		for ancestor in &self.ancestors {
			out.extend(ancestor.transitive_fields());
		}
		out
	}

	/// The nearest class in this lineage that declares `field` itself.
	pub fn field_owner(&self, field: &str) -> Option<&Name> {
		std::iter::once(self)
			.chain(self.ancestors.iter().map(|a| &**a))
			.find(|c| c.own_fields.iter().any(|f| &**f == field))
			.map(|c| &c.name)
	}

	/// Whether instances of this lineage carry an open attribute map.
	pub(crate) fn lineage_dynamic(&self) -> bool {
		match &self.kind {
			ClassKind::Composed(_) => self.storage.dynamic,
			ClassKind::Native(layout) => layout.dynamic || self.ancestors.iter().any(|a| a.lineage_dynamic()),
			ClassKind::Root | ClassKind::Protocol(_) => false,
		}
	}

	pub(crate) fn storage(&self) -> &Storage {
		&self.storage
	}

	/// The attribute bound directly on this class, ignoring bases.
	pub fn own_attr(&self, name: &str) -> Option<Member> {
		self.attrs.read().get(name).cloned()
	}

	/// Names bound directly on this class.
	pub fn own_attr_names(&self) -> Vec<Name> {
		self.attrs.read().keys().cloned().collect()
	}

	/// Resolves `name` through this class and its ancestors.
	pub fn lookup(&self, name: &str) -> Option<Member> {
		self.own_attr(name).or_else(|| self.lookup_inherited(name))
	}

	/// Resolves `name` through the ancestors only.
	pub fn lookup_inherited(&self, name: &str) -> Option<Member> {
		self.ancestors.iter().find_map(|a| a.own_attr(name))
	}

	/// Reads a class-level value.
	///
	/// # Errors
	///
	/// Returns [`AttributeError`] if the name is missing, is a method or
	/// requirement, or is a binding without a class-level value.
	pub fn class_attr(&self, name: &str) -> Result<Value, AttributeError> {
		let member = self.lookup(name).ok_or_else(|| AttributeError::Missing {
			class: self.name.clone(),
			name: name.into(),
		})?;
		match member {
			Member::Requirement(_) => Err(AttributeError::Unimplemented { name: name.into() }),
			other => other.class_value().ok_or_else(|| AttributeError::NotAValue { name: name.into() }),
		}
	}

	/// Assigns a class-level value.
	///
	/// A class-variable wrapper bound directly on this class absorbs the
	/// assignment; anything else is overwritten.
	pub fn set_class_attr(&self, name: impl Into<Name>, value: impl Into<Value>) {
		let name = name.into();
		let value = value.into();
		let current = self.attrs.read().get(&name).cloned();
		let value = match current {
			Some(Member::Binding(b)) => match b.class_set(value) {
				ClassAssign::Absorbed => {
					tracing::trace!(class = %self.name, name = %name, "class assignment routed through binding");
					return;
				}
				ClassAssign::Overwrite(v) => v,
			},
			_ => value,
		};
		self.attrs.write().insert(name, Member::Value(value));
	}

	/// Returns true if the instantiation guard lets this class build instances.
	pub fn is_instantiable(&self) -> bool {
		if !self.guarded {
			return true;
		}
		match &self.kind {
			ClassKind::Root => true,
			ClassKind::Native(layout) => layout.abstract_methods.is_empty(),
			ClassKind::Protocol(_) => false,
			ClassKind::Composed(meta) => !meta.is_mixin,
		}
	}

	/// Creates an instance with every storage field unset.
	///
	/// # Errors
	///
	/// Returns [`InstantiationError::Mixin`] when the guard refuses a mixin,
	/// or [`InstantiationError::Abstract`] for protocols and abstract native types.
	pub fn instantiate(self: &Arc<Self>) -> Result<Instance, InstantiationError> {
		if !self.is_instantiable() {
			return Err(match &self.kind {
				ClassKind::Composed(_) => InstantiationError::Mixin { class: self.name.clone() },
				_ => InstantiationError::Abstract { class: self.name.clone() },
			});
		}
		Ok(Instance::new(self.clone()))
	}
}

impl fmt::Debug for Class {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Class")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("bases", &self.bases.iter().map(|b| &b.name).collect::<Vec<_>>())
			.field("kind", &self.kind)
			.finish_non_exhaustive()
	}
}

impl fmt::Display for Class {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}
