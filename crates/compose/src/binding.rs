//! Computed-attribute binding protocol.
//!
//! A [`Binding`] intercepts instance-level get/set/delete for one attribute
//! name. "Data" bindings win over instance storage; non-data bindings only
//! answer reads when no stored value exists.
//!
//! [`ClassVar`] is the wrapper the builder installs when a plain class-level
//! value collides with a storage field: instances read their own slot when it
//! is set and fall back to the class-level value otherwise, while class-level
//! assignment is routed through [`Binding::class_set`].

use std::fmt;
use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::class::Class;
use crate::error::AttributeError;
use crate::instance::Instance;
use crate::member::Member;
use crate::value::{Name, Value};

/// Outcome of a class-level assignment offered to a binding.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassAssign {
	/// The binding consumed the value.
	Absorbed,
	/// The binding declined; the class attribute is overwritten with the value.
	Overwrite(Value),
}

/// Get/set/delete interception for a single attribute name.
pub trait Binding: Send + Sync + fmt::Debug {
	/// Reads the attribute for `instance`.
	fn get(&self, instance: &mut Instance, name: &str) -> Result<Value, AttributeError>;

	/// Writes the attribute for `instance`.
	fn set(&self, instance: &mut Instance, name: &str, value: Value) -> Result<(), AttributeError> {
		let _ = (instance, value);
		Err(AttributeError::ReadOnly { name: name.into() })
	}

	/// Deletes the attribute for `instance`.
	fn delete(&self, instance: &mut Instance, name: &str) -> Result<(), AttributeError> {
		let _ = instance;
		Err(AttributeError::ReadOnly { name: name.into() })
	}

	/// Returns true if this binding replaces instance storage.
	fn is_data(&self) -> bool;

	/// Commit-time hook, invoked once when `owner` installs this binding under `name`.
	///
	/// `previous` is the attribute the binding supersedes, if the name already
	/// resolved to something through the owner's bases.
	fn bind(&self, owner: &Class, name: &Name, previous: Option<&Member>) {
		let _ = (owner, name, previous);
	}

	/// Class-level read. `None` means the binding has no class-level value.
	fn class_get(&self) -> Option<Value> {
		None
	}

	/// Class-level assignment hook.
	fn class_set(&self, value: Value) -> ClassAssign {
		ClassAssign::Overwrite(value)
	}
}

#[derive(Debug)]
struct Bound {
	owner: Name,
	previous: Option<Member>,
}

/// Class-variable wrapper for a name that is both a storage field and a class-level value.
pub struct ClassVar {
	value: RwLock<Value>,
	bound: OnceLock<Bound>,
}

impl ClassVar {
	/// Wraps a class-level value.
	pub fn new(value: Value) -> Self {
		Self {
			value: RwLock::new(value),
			bound: OnceLock::new(),
		}
	}

	/// Current class-level value.
	pub fn value(&self) -> Value {
		self.value.read().clone()
	}

	/// Name of the class that installed this wrapper, once bound.
	pub fn owner(&self) -> Option<&Name> {
		self.bound.get().map(|b| &b.owner)
	}

	/// The inherited attribute this wrapper superseded at commit time.
	pub fn superseded(&self) -> Option<&Member> {
		self.bound.get().and_then(|b| b.previous.as_ref())
	}
}

impl fmt::Debug for ClassVar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClassVar")
			.field("value", &*self.value.read())
			.field("owner", &self.owner())
			.finish()
	}
}

impl Binding for ClassVar {
	fn get(&self, instance: &mut Instance, name: &str) -> Result<Value, AttributeError> {
		match instance.stored(name) {
			Some(v) => Ok(v.clone()),
			None => Ok(self.value()),
		}
	}

	fn set(&self, instance: &mut Instance, name: &str, value: Value) -> Result<(), AttributeError> {
		instance.store(name, value)
	}

	fn delete(&self, instance: &mut Instance, name: &str) -> Result<(), AttributeError> {
		instance.unstore(name).map(drop)
	}

	fn is_data(&self) -> bool {
		true
	}

	fn bind(&self, owner: &Class, name: &Name, previous: Option<&Member>) {
		let bound = Bound {
			owner: owner.name().clone(),
			previous: previous.cloned(),
		};
		if self.bound.set(bound).is_err() {
			tracing::warn!(class = %owner.name(), name = %name, "class variable wrapper bound twice; keeping first owner");
		}
	}

	fn class_get(&self) -> Option<Value> {
		Some(self.value())
	}

	fn class_set(&self, value: Value) -> ClassAssign {
		*self.value.write() = value;
		ClassAssign::Absorbed
	}
}

#[cfg(test)]
mod tests;
