use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Interned-by-refcount attribute or class name.
pub type Name = Arc<str>;

/// A plain value held by a class variable or an instance field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
	/// The absent value.
	Unit,
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating point value.
	Float(f64),
	/// String value.
	Str(Arc<str>),
}

impl Value {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value if this is a `Float` variant.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Unit => "unit",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::Str(_) => "string",
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Unit => f.write_str("()"),
			Value::Bool(v) => write!(f, "{v}"),
			Value::Int(v) => write!(f, "{v}"),
			Value::Float(v) => write!(f, "{v}"),
			Value::Str(v) => write!(f, "{v:?}"),
		}
	}
}

impl From<()> for Value {
	fn from(_: ()) -> Self {
		Value::Unit
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(i64::from(v))
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Str(Arc::from(v))
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Str(Arc::from(v))
	}
}
