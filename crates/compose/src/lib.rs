//! Class composition with derived storage layouts.
//!
//! A class is declared as a [`ClassSpec`] (name, bases, body) and handed to a
//! [`Composer`], which decides once, at composition time, what the class
//! stores, which requirements it leaves unmet, and whether it can be
//! instantiated. The answer is published as immutable [`ClassMetadata`] on
//! the committed [`Class`].
//!
//! # Mental Model
//!
//! 1. **Bases:** exactly one base supplies storage (the concrete base, default
//!    [`Class::root`]); the rest are mixins or capability-only protocols.
//! 2. **Layout:** candidate fields from mixins and the body are deduplicated
//!    against the concrete lineage. Names served by data bindings get no
//!    storage; names that are also class-level values get a [`ClassVar`]
//!    wrapper alongside their storage field.
//! 3. **Requirements:** inherited requirement names minus the body's
//!    implementations. A class with unmet requirements is a mixin.
//! 4. **Commit:** the class is built with its metadata attached, bindings are
//!    bound, and the class is published in the composer's [`ClassRegistry`].
//!
//! # Example
//!
//! ```
//! use slate_compose::{ClassSpec, Composer, Requirement};
//!
//! let composer = Composer::default();
//! let shape = composer
//! 	.compose(ClassSpec::new("Shape").requirement("area", Requirement::any()).field("name"))
//! 	.unwrap();
//! assert!(shape.metadata().unwrap().is_mixin);
//!
//! let square = composer.compose(ClassSpec::new("Square").base(&shape).field("side").value("area", 0)).unwrap();
//! let mut sq = square.instantiate().unwrap();
//! sq.set("side", 3).unwrap();
//! assert_eq!(sq.get("side").unwrap().as_int(), Some(3));
//! ```

mod binding;
mod candidates;
mod class;
mod compose;
mod config;
mod error;
mod instance;
mod lazy;
mod member;
mod metadata;
mod mro;
mod registry;
pub mod resolve;
mod spec;
mod value;

pub use binding::{Binding, ClassAssign, ClassVar};
pub use candidates::{CandidateSource, Candidates, DeclaredCandidates};
pub use class::{Class, ClassId, ClassKind, ClassRef, NativeLayout, NativeSpec, Protocol};
pub use compose::Composer;
pub use config::{ComposeConfig, DYNAMIC_FIELDS, DuplicateNames, LAYOUT_ATTR, RESERVED};
pub use error::{AttributeError, CompositionError, ConfigError, InstantiationError};
pub use instance::Instance;
pub use lazy::{Cell, Evaluator, Lazy};
pub use member::{Member, Method, MethodFn, Requirement};
pub use metadata::ClassMetadata;
pub use registry::{ClassRegistry, Registration};
pub use spec::ClassSpec;
pub use value::{Name, Value};
