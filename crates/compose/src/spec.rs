use indexmap::{IndexMap, IndexSet};

use crate::binding::Binding;
use crate::class::ClassRef;
use crate::member::{Member, Method, Requirement};
use crate::value::{Name, Value};

/// Declaration of a class to compose: name, bases, and body.
///
/// Built with ordinary method chaining and consumed by
/// [`Composer::compose`](crate::Composer::compose).
#[derive(Debug, Clone)]
pub struct ClassSpec {
	pub(crate) name: Name,
	pub(crate) bases: Vec<ClassRef>,
	pub(crate) namespace: IndexMap<Name, Member>,
	pub(crate) declared: IndexSet<Name>,
	pub(crate) assigned: IndexSet<Name>,
	pub(crate) mixin: Option<bool>,
}

impl ClassSpec {
	/// Starts an empty declaration named `name`.
	pub fn new(name: impl Into<Name>) -> Self {
		Self {
			name: name.into(),
			bases: Vec::new(),
			namespace: IndexMap::new(),
			declared: IndexSet::new(),
			assigned: IndexSet::new(),
			mixin: None,
		}
	}

	/// The class name.
	pub fn name(&self) -> &Name {
		&self.name
	}

	/// Declared bases, in order.
	pub fn bases_list(&self) -> &[ClassRef] {
		&self.bases
	}

	/// Body bindings, in declaration order.
	pub fn namespace(&self) -> &IndexMap<Name, Member> {
		&self.namespace
	}

	/// Explicitly declared field names, in declaration order.
	pub fn declared_fields(&self) -> &IndexSet<Name> {
		&self.declared
	}

	/// Names the body assigns on instances, in first-assignment order.
	pub fn assigned_attrs(&self) -> &IndexSet<Name> {
		&self.assigned
	}

	/// The explicit mixin flag, if one was given.
	pub fn mixin_override(&self) -> Option<bool> {
		self.mixin
	}

	/// Appends a base.
	pub fn base(mut self, base: &ClassRef) -> Self {
		self.bases.push(base.clone());
		self
	}

	/// Appends several bases.
	pub fn bases<'a>(mut self, bases: impl IntoIterator<Item = &'a ClassRef>) -> Self {
		self.bases.extend(bases.into_iter().cloned());
		self
	}

	/// Binds a member in the body. A later binding of the same name replaces the earlier one in place.
	pub fn member(mut self, name: impl Into<Name>, member: impl Into<Member>) -> Self {
		self.namespace.insert(name.into(), member.into());
		self
	}

	/// Binds a plain class value.
	pub fn value(self, name: impl Into<Name>, value: impl Into<Value>) -> Self {
		self.member(name, value.into())
	}

	/// Binds a method.
	pub fn method(self, name: impl Into<Name>, method: Method) -> Self {
		self.member(name, method)
	}

	/// Marks `name` as an unimplemented requirement.
	pub fn requirement(self, name: impl Into<Name>, requirement: Requirement) -> Self {
		self.member(name, requirement)
	}

	/// Binds a computed attribute.
	pub fn binding<B: Binding + 'static>(self, name: impl Into<Name>, binding: B) -> Self {
		self.member(name, Member::binding(binding))
	}

	/// Declares a storage field explicitly.
	pub fn field(mut self, name: impl Into<Name>) -> Self {
		self.declared.insert(name.into());
		self
	}

	/// Declares several storage fields explicitly.
	pub fn fields<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Name>,
	{
		self.declared.extend(names.into_iter().map(Into::into));
		self
	}

	/// Records names the body assigns on instances.
	pub fn assigns<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Name>,
	{
		self.assigned.extend(names.into_iter().map(Into::into));
		self
	}

	/// Forces the mixin flag instead of inferring it.
	pub fn mixin(mut self, is_mixin: bool) -> Self {
		self.mixin = Some(is_mixin);
		self
	}
}
