use thiserror::Error;

use crate::value::Name;

/// Structural failure that rejects a class composition.
///
/// A rejected class is never registered and never observable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
	/// Two bases both carry an instantiable storage lineage.
	#[error("class {class}: can only inherit from one concrete, non-mixin class; {first} and {second} are both concrete")]
	MultipleConcreteBases { class: Name, first: Name, second: Name },
	/// The namespace hand-specifies a storage layout.
	#[error("class {class}: storage layout is derived and must not be declared explicitly")]
	ExplicitLayout { class: Name },
	/// A candidate field shadows a base's private field without redeclaring it.
	#[error("class {class}: private field '{field}' belongs to base {owner}; declare the field explicitly to access it")]
	PrivateAttributeAccess { class: Name, field: Name, owner: Name },
	/// The composer forced a non-mixin class while requirements remain unmet.
	#[error("class {class}: abstract classes must also be mixins; unimplemented: {}", missing.join(", "))]
	AbstractMixinConflict { class: Name, missing: Vec<Name> },
	/// The same base appears twice in the declared base list.
	#[error("class {class}: duplicate base {base}")]
	DuplicateBase { class: Name, base: Name },
	/// The declared bases admit no consistent linearization.
	#[error("class {class}: cannot create a consistent method resolution order for bases {}", bases.join(", "))]
	InconsistentHierarchy { class: Name, bases: Vec<Name> },
	/// A required member is implemented with a method of the wrong arity.
	#[error("class {class}: '{name}' takes {found} argument(s), interface requires {expected}")]
	ArityMismatch { class: Name, name: Name, expected: usize, found: usize },
}

impl CompositionError {
	/// Name of the class whose composition failed.
	pub fn class(&self) -> &Name {
		match self {
			Self::MultipleConcreteBases { class, .. }
			| Self::ExplicitLayout { class }
			| Self::PrivateAttributeAccess { class, .. }
			| Self::AbstractMixinConflict { class, .. }
			| Self::DuplicateBase { class, .. }
			| Self::InconsistentHierarchy { class, .. }
			| Self::ArityMismatch { class, .. } => class,
		}
	}
}

/// Failure to construct an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstantiationError {
	/// The class is a mixin and never instantiable.
	#[error("mixin class {class} cannot have instances")]
	Mixin { class: Name },
	/// The class is an interface or an abstract host type.
	#[error("cannot instantiate abstract class {class}")]
	Abstract { class: Name },
}

/// Failure of an attribute access on an instance or class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
	/// No storage, binding, or class value exists for the name.
	#[error("'{class}' object has no attribute '{name}'")]
	Missing { class: Name, name: Name },
	/// The storage field exists but holds no value.
	#[error("attribute '{name}' is not set")]
	Unset { name: Name },
	/// The attribute cannot be written or deleted through this path.
	#[error("attribute '{name}' is read-only")]
	ReadOnly { name: Name },
	/// The name is an unimplemented requirement.
	#[error("attribute '{name}' is an unimplemented requirement")]
	Unimplemented { name: Name },
	/// The name resolves to a method, not a value.
	#[error("attribute '{name}' is a method; call it instead")]
	NotAValue { name: Name },
	/// A method was called with the wrong number of arguments.
	#[error("'{name}' takes {expected} argument(s) but {found} were given")]
	Arity { name: Name, expected: usize, found: usize },
	/// An evaluator or method body failed.
	#[error("evaluating '{name}' failed: {reason}")]
	Evaluation { name: Name, reason: String },
}

/// Failure to load composer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config: {0}")]
	Read(#[from] std::io::Error),
	#[error("failed to parse config: {0}")]
	Parse(#[from] toml::de::Error),
}
