//! Namespace members: what a class body binds to a name.
//!
//! The same [`Member`] type describes both the input namespace of a
//! [`ClassSpec`](crate::ClassSpec) and the committed attribute table of a
//! [`Class`](crate::Class). The builder only ever inspects the variant; it
//! never calls into a method body or a binding's evaluator while composing.

use std::fmt;
use std::sync::Arc;

use crate::binding::Binding;
use crate::error::AttributeError;
use crate::instance::Instance;
use crate::value::Value;

/// Callable body of a [`Method`].
pub type MethodFn = dyn Fn(&mut Instance, &[Value]) -> Result<Value, AttributeError> + Send + Sync;

/// A concrete method implementation with a fixed arity.
#[derive(Clone)]
pub struct Method {
	arity: usize,
	body: Arc<MethodFn>,
}

impl Method {
	/// Creates a method taking `arity` positional arguments (the receiver excluded).
	pub fn new<F>(arity: usize, body: F) -> Self
	where
		F: Fn(&mut Instance, &[Value]) -> Result<Value, AttributeError> + Send + Sync + 'static,
	{
		Self {
			arity,
			body: Arc::new(body),
		}
	}

	/// Number of positional arguments the method accepts.
	pub fn arity(&self) -> usize {
		self.arity
	}

	pub(crate) fn invoke(&self, instance: &mut Instance, args: &[Value]) -> Result<Value, AttributeError> {
		(self.body)(instance, args)
	}
}

impl fmt::Debug for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Method").field("arity", &self.arity).finish_non_exhaustive()
	}
}

/// Marker for a member a class promises but does not implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Requirement {
	/// Expected method arity, when the declaring interface pins one.
	pub arity: Option<usize>,
}

impl Requirement {
	/// A requirement with no signature constraint.
	pub const fn any() -> Self {
		Self { arity: None }
	}

	/// A requirement that must be satisfied by a method of exactly `arity` arguments.
	pub const fn with_arity(arity: usize) -> Self {
		Self { arity: Some(arity) }
	}
}

/// A value bound to a name in a class namespace.
#[derive(Clone)]
pub enum Member {
	/// Plain class-level value.
	Value(Value),
	/// Concrete method implementation.
	Method(Method),
	/// Unimplemented requirement.
	Requirement(Requirement),
	/// Computed-attribute binding.
	Binding(Arc<dyn Binding>),
}

impl Member {
	/// Wraps a binding.
	pub fn binding<B: Binding + 'static>(binding: B) -> Self {
		Member::Binding(Arc::new(binding))
	}

	/// Returns true if this member marks an unimplemented requirement.
	pub fn is_requirement(&self) -> bool {
		matches!(self, Member::Requirement(_))
	}

	/// Returns the binding if this member is one.
	pub fn as_binding(&self) -> Option<&Arc<dyn Binding>> {
		match self {
			Member::Binding(b) => Some(b),
			_ => None,
		}
	}

	/// Returns true if this member is a storage-replacing ("data") binding.
	///
	/// Class-variable wrappers report `false` here: they carry a class-level
	/// value and are re-wrapped rather than treated as storage replacements.
	pub fn is_data_binding(&self) -> bool {
		match self {
			Member::Binding(b) => b.is_data() && b.class_get().is_none(),
			_ => false,
		}
	}

	/// Returns the class-level value this member exposes, if any.
	///
	/// Reads through class-variable wrappers.
	pub fn class_value(&self) -> Option<Value> {
		match self {
			Member::Value(v) => Some(v.clone()),
			Member::Binding(b) => b.class_get(),
			Member::Method(_) | Member::Requirement(_) => None,
		}
	}

	/// Short kind label used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Member::Value(_) => "value",
			Member::Method(_) => "method",
			Member::Requirement(_) => "requirement",
			Member::Binding(b) if b.is_data() => "data binding",
			Member::Binding(_) => "binding",
		}
	}
}

impl fmt::Debug for Member {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Member::Value(v) => f.debug_tuple("Value").field(v).finish(),
			Member::Method(m) => f.debug_tuple("Method").field(m).finish(),
			Member::Requirement(r) => f.debug_tuple("Requirement").field(r).finish(),
			Member::Binding(b) => f.debug_tuple("Binding").field(b).finish(),
		}
	}
}

impl From<Value> for Member {
	fn from(v: Value) -> Self {
		Member::Value(v)
	}
}

impl From<Method> for Member {
	fn from(m: Method) -> Self {
		Member::Method(m)
	}
}

impl From<Requirement> for Member {
	fn from(r: Requirement) -> Self {
		Member::Requirement(r)
	}
}
