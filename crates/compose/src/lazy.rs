//! Lazily computed, per-instance cached attributes.
//!
//! Each instance holds at most one [`Cell`] per lazy attribute:
//!
//! | State | Cell | Read | Set | Delete |
//! |-------|------|------|-----|--------|
//! | Computed | absent | evaluate, become Cached | Overridden | no-op |
//! | Cached | `Cached(v)` | `v` | Overridden | Computed |
//! | Overridden | `Overridden(v)` | `v` | Overridden | Computed |
//!
//! Deleting never fails: the evaluator can always recompute the value.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::binding::Binding;
use crate::class::Class;
use crate::error::AttributeError;
use crate::instance::Instance;
use crate::member::Member;
use crate::value::{Name, Value};

/// Per-instance state of a lazy attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
	/// Value produced by the evaluator.
	Cached(Value),
	/// Value assigned explicitly.
	Overridden(Value),
}

impl Cell {
	/// The held value regardless of origin.
	pub fn value(&self) -> &Value {
		match self {
			Cell::Cached(v) | Cell::Overridden(v) => v,
		}
	}
}

/// Evaluator of a [`Lazy`] attribute.
pub type Evaluator = dyn Fn(&mut Instance) -> Result<Value, AttributeError> + Send + Sync;

/// Data binding that computes its value on first read and caches it per instance.
pub struct Lazy {
	evaluator: Arc<Evaluator>,
	owner: OnceLock<Name>,
}

impl Lazy {
	/// Creates a lazy attribute backed by `evaluator`.
	pub fn new<F>(evaluator: F) -> Self
	where
		F: Fn(&mut Instance) -> Result<Value, AttributeError> + Send + Sync + 'static,
	{
		Self {
			evaluator: Arc::new(evaluator),
			owner: OnceLock::new(),
		}
	}

	/// Name of the class that installed this attribute, once bound.
	pub fn owner(&self) -> Option<&Name> {
		self.owner.get()
	}
}

impl fmt::Debug for Lazy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Lazy").field("owner", &self.owner.get()).finish_non_exhaustive()
	}
}

impl Binding for Lazy {
	fn get(&self, instance: &mut Instance, name: &str) -> Result<Value, AttributeError> {
		if let Some(cell) = instance.cell(name) {
			return Ok(cell.value().clone());
		}
		let value = (self.evaluator)(instance)?;
		tracing::trace!(name, value = %value, "lazy attribute computed");
		instance.set_cell(name, Cell::Cached(value.clone()));
		Ok(value)
	}

	fn set(&self, instance: &mut Instance, name: &str, value: Value) -> Result<(), AttributeError> {
		instance.set_cell(name, Cell::Overridden(value));
		Ok(())
	}

	fn delete(&self, instance: &mut Instance, name: &str) -> Result<(), AttributeError> {
		instance.take_cell(name);
		Ok(())
	}

	fn is_data(&self) -> bool {
		true
	}

	fn bind(&self, owner: &Class, _name: &Name, _previous: Option<&Member>) {
		let _ = self.owner.set(owner.name().clone());
	}
}
