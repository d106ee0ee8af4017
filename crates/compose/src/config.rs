//! Composer configuration.
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! extra_reserved = ["__orig_bases__"]
//! protect_private = true
//! guard_instantiation = true
//! check_arity = true
//! duplicate_names = "replace"
//! ```

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::error::ConfigError;

/// Name under which a namespace would pre-declare its storage layout.
pub const LAYOUT_ATTR: &str = "__slots__";

/// Identity and lifecycle members the runtime always provides. Never allocated as storage.
pub const RESERVED: &[&str] = &[
	"__class_metadata__",
	"__classcell__",
	"__abstractmethods__",
	"__class__",
	"__delattr__",
	"__dir__",
	"__doc__",
	"__eq__",
	"__format__",
	"__ge__",
	"__getattribute__",
	"__getstate__",
	"__gt__",
	"__hash__",
	"__init__",
	"__init_subclass__",
	"__le__",
	"__lt__",
	"__module__",
	"__ne__",
	"__new__",
	"__reduce__",
	"__reduce_ex__",
	"__repr__",
	"__setattr__",
	"__sizeof__",
	"__slots__",
	"__str__",
	"__subclasshook__",
];

/// Field names implied by an open (dictionary-backed) instance layout.
pub const DYNAMIC_FIELDS: &[&str] = &["__dict__", "__weakref__"];

/// Registry behavior when a class name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNames {
	/// The newer class replaces the older one.
	#[default]
	Replace,
	/// The newer class is committed but not registered; the older one stays.
	Reject,
}

/// Configuration for a [`Composer`](crate::Composer).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
	/// Names added to [`RESERVED`].
	pub extra_reserved: Vec<String>,
	/// Reject candidates that reach a base's private field without redeclaring it.
	pub protect_private: bool,
	/// Refuse to instantiate mixin classes.
	pub guard_instantiation: bool,
	/// Check method arity against interface requirements.
	pub check_arity: bool,
	/// Registry policy for duplicate class names.
	pub duplicate_names: DuplicateNames,
}

impl Default for ComposeConfig {
	fn default() -> Self {
		Self {
			extra_reserved: Vec::new(),
			protect_private: true,
			guard_instantiation: true,
			check_arity: true,
			duplicate_names: DuplicateNames::default(),
		}
	}
}

impl ComposeConfig {
	/// Parses configuration from a TOML document.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(src)?)
	}

	/// Reads and parses a TOML configuration file.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Read`] if the file cannot be read, or
	/// [`ConfigError::Parse`] if it is not valid configuration.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let src = std::fs::read_to_string(path)?;
		Self::from_toml_str(&src)
	}

	/// The full reserved-name set: built-ins plus [`Self::extra_reserved`].
	pub fn reserved(&self) -> FxHashSet<&str> {
		RESERVED.iter().copied().chain(self.extra_reserved.iter().map(String::as_str)).collect()
	}
}
