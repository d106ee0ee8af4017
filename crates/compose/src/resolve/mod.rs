//! Composition-time resolution stages.
//!
//! # Role
//!
//! Turns a class's declared bases and body into the three answers the
//! builder commits: which base supplies storage, which fields the class
//! allocates, and which requirements remain unmet.
//!
//! # Mental Model
//!
//! 1. **Classify:** [`classify`] partitions the bases into one concrete
//!    base, any number of mixins, and capability-only protocols.
//! 2. **Layout:** [`resolve_fields`] deduplicates candidate field names
//!    against the concrete lineage and sorts out bindings and class variables.
//! 3. **Requirements:** [`resolve_abstract`] merges inherited requirements
//!    with the body's overrides and derives the mixin flag.
//!
//! Steps 2 and 3 read the same [`BaseResolution`] and do not depend on each other.
//!
//! # Invariants
//!
//! - At most one concrete base.
//!   - Enforced in: [`classify`].
//!   - Failure symptom: two storage layouts would need to be merged.
//!
//! - A base's private field is never reached without an explicit redeclaration.
//!   - Enforced in: [`resolve_fields`] (when `protect_private` is set).
//!   - Failure symptom: a subclass silently aliases a base's private storage.
//!
//! - `is_abstract` implies `is_mixin`.
//!   - Enforced in: [`resolve_abstract`].
//!   - Failure symptom: an instantiable class with unimplemented members.
//!
//! - No stage mutates a base or its metadata.

mod abstracts;
mod bases;
mod fields;

pub use abstracts::{AbstractResolution, resolve_abstract};
pub use bases::{BaseResolution, classify};
pub use fields::{FieldLayout, resolve_fields};

#[cfg(test)]
mod tests;
