//! Instances: a fixed slot arena addressed through the class's field index.
//!
//! # Attribute resolution
//!
//! Reads: data binding → storage field → open map → non-data binding → class value.
//! Writes and deletes: data binding → storage field → open map.

use rustc_hash::FxHashMap;

use crate::class::ClassRef;
use crate::error::AttributeError;
use crate::lazy::Cell;
use crate::member::Member;
use crate::value::{Name, Value};

/// An instance of a committed, instantiable class.
#[derive(Debug)]
pub struct Instance {
	class: ClassRef,
	slots: Box<[Option<Value>]>,
	cells: FxHashMap<Name, Cell>,
	open: Option<FxHashMap<Name, Value>>,
}

impl Instance {
	pub(crate) fn new(class: ClassRef) -> Self {
		let storage = class.storage();
		let slots = vec![None; storage.fields.len()].into_boxed_slice();
		let open_layout = storage.dynamic || class.metadata().is_some_and(|m| m.is_mixin);
		Self {
			slots,
			cells: FxHashMap::default(),
			open: open_layout.then(FxHashMap::default),
			class,
		}
	}

	/// The instance's class.
	pub fn class(&self) -> &ClassRef {
		&self.class
	}

	/// Number of storage fields allocated for this instance.
	pub fn slot_count(&self) -> usize {
		self.slots.len()
	}

	fn missing(&self, name: &str) -> AttributeError {
		AttributeError::Missing {
			class: self.class.name().clone(),
			name: name.into(),
		}
	}

	/// Reads an attribute.
	///
	/// # Errors
	///
	/// Returns [`AttributeError`] if the name cannot be resolved to a value.
	pub fn get(&mut self, name: &str) -> Result<Value, AttributeError> {
		let attr = self.class.lookup(name);
		if let Some(Member::Binding(b)) = &attr
			&& b.is_data()
		{
			return b.get(self, name);
		}
		if let Some(v) = self.stored(name) {
			return Ok(v.clone());
		}
		match attr {
			Some(Member::Binding(b)) => b.get(self, name),
			Some(Member::Value(v)) => Ok(v),
			Some(Member::Method(_)) => Err(AttributeError::NotAValue { name: name.into() }),
			Some(Member::Requirement(_)) => Err(AttributeError::Unimplemented { name: name.into() }),
			None if self.class.storage().index.contains_key(name) => Err(AttributeError::Unset { name: name.into() }),
			None => Err(self.missing(name)),
		}
	}

	/// Writes an attribute.
	///
	/// # Errors
	///
	/// Returns [`AttributeError`] if neither a data binding nor storage accepts the name.
	pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), AttributeError> {
		let value = value.into();
		if let Some(Member::Binding(b)) = self.class.lookup(name)
			&& b.is_data()
		{
			return b.set(self, name, value);
		}
		self.store(name, value)
	}

	/// Deletes an attribute.
	///
	/// # Errors
	///
	/// Returns [`AttributeError`] if the name has no data binding and no stored value.
	pub fn delete(&mut self, name: &str) -> Result<(), AttributeError> {
		if let Some(Member::Binding(b)) = self.class.lookup(name)
			&& b.is_data()
		{
			return b.delete(self, name);
		}
		self.unstore(name).map(drop)
	}

	/// Calls a method with positional arguments.
	///
	/// # Errors
	///
	/// Returns [`AttributeError`] if the name is not a method, the arity does
	/// not match, or the body fails.
	pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, AttributeError> {
		match self.class.lookup(name) {
			Some(Member::Method(m)) => {
				if m.arity() != args.len() {
					return Err(AttributeError::Arity {
						name: name.into(),
						expected: m.arity(),
						found: args.len(),
					});
				}
				m.invoke(self, args)
			}
			Some(Member::Requirement(_)) => Err(AttributeError::Unimplemented { name: name.into() }),
			Some(_) => Err(AttributeError::NotAValue { name: name.into() }),
			None => Err(self.missing(name)),
		}
	}

	/// Raw stored value for `name`, bypassing bindings.
	pub fn stored(&self, name: &str) -> Option<&Value> {
		match self.class.storage().index.get(name) {
			Some(&i) => self.slots[i].as_ref(),
			None => self.open.as_ref()?.get(name),
		}
	}

	/// Stores a value for `name`, bypassing bindings.
	///
	/// # Errors
	///
	/// Returns [`AttributeError::Missing`] if the layout has no field named `name`
	/// and no open attribute map.
	pub fn store(&mut self, name: &str, value: Value) -> Result<(), AttributeError> {
		if let Some(&i) = self.class.storage().index.get(name) {
			self.slots[i] = Some(value);
			return Ok(());
		}
		let missing = self.missing(name);
		let open = self.open.as_mut().ok_or(missing)?;
		open.insert(name.into(), value);
		Ok(())
	}

	/// Removes the stored value for `name`, bypassing bindings.
	///
	/// # Errors
	///
	/// Returns [`AttributeError::Unset`] if the field holds no value, or
	/// [`AttributeError::Missing`] if there is no such field.
	pub fn unstore(&mut self, name: &str) -> Result<Value, AttributeError> {
		if let Some(&i) = self.class.storage().index.get(name) {
			return self.slots[i].take().ok_or_else(|| AttributeError::Unset { name: name.into() });
		}
		let missing = self.missing(name);
		self.open.as_mut().and_then(|o| o.remove(name)).ok_or(missing)
	}

	/// Binding cell for `name`, if one is populated.
	pub fn cell(&self, name: &str) -> Option<&Cell> {
		self.cells.get(name)
	}

	/// Populates the binding cell for `name`.
	pub fn set_cell(&mut self, name: &str, cell: Cell) {
		self.cells.insert(name.into(), cell);
	}

	/// Clears and returns the binding cell for `name`.
	pub fn take_cell(&mut self, name: &str) -> Option<Cell> {
		self.cells.remove(name)
	}
}

#[cfg(test)]
mod tests;
