use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use pretty_assertions::assert_eq;

use super::*;
use crate::{Candidates, Class, ClassRef, ClassSpec, ComposeConfig, CompositionError, Composer, Lazy, Member, Method, Name, NativeSpec, Requirement, Value};

fn names<'a>(it: impl IntoIterator<Item = &'a Name>) -> Vec<&'a str> {
	it.into_iter().map(|n| &**n).collect()
}

fn set(items: &[&str]) -> BTreeSet<Name> {
	items.iter().map(|s| Name::from(*s)).collect()
}

fn explicit(items: &[&str]) -> Candidates {
	Candidates {
		explicit: items.iter().map(|s| Name::from(*s)).collect(),
		assigned: IndexSet::new(),
	}
}

fn mixin(composer: &Composer, name: &str, fields: &[&str], reqs: &[&str]) -> ClassRef {
	let mut spec = ClassSpec::new(name).fields(fields.iter().copied());
	for r in reqs {
		spec = spec.requirement(*r, Requirement::any());
	}
	composer.compose(spec.mixin(true)).unwrap()
}

#[test]
fn classify_defaults_to_root() {
	let res = classify(&"A".into(), &[]).unwrap();
	assert_eq!(res.concrete_base.id(), Class::root().id());
	assert!(res.mixins.is_empty() && res.all_bases.is_empty());
}

#[test]
fn classify_partitions_bases() {
	let composer = Composer::default();
	let concrete = NativeSpec::new("Base").fields(["a"]).build().unwrap();
	let m1 = mixin(&composer, "M1", &["x", "y"], &["run"]);
	let m2 = mixin(&composer, "M2", &["y", "z"], &[]);
	let proto = Class::protocol("P", [("read", Requirement::with_arity(2))]);

	let res = classify(&"C".into(), &[m1.clone(), proto, concrete.clone(), m2.clone()]).unwrap();
	assert_eq!(&**res.concrete_base.name(), "Base");
	assert_eq!(names(res.mixins.iter().map(|m| m.name())), vec!["M1", "M2"]);
	assert_eq!(names(res.all_bases.iter().map(|m| m.name())), vec!["M1", "Base", "M2"]);
	assert_eq!(res.abstract_attrs, set(&["read", "run"]));
	assert_eq!(names(&res.mixin_fields), vec!["x", "y", "z"]);
	assert_eq!(res.signatures.get("read"), Some(&2));
	assert_eq!(res.signatures.get("run"), None);
}

#[test]
fn classify_rejects_second_concrete_base() {
	let a = NativeSpec::new("A").build().unwrap();
	let b = NativeSpec::new("B").build().unwrap();
	let err = classify(&"C".into(), &[a, b]).unwrap_err();
	assert_eq!(
		err,
		CompositionError::MultipleConcreteBases {
			class: "C".into(),
			first: "A".into(),
			second: "B".into()
		}
	);
}

#[test]
fn classify_tolerates_explicit_root() {
	let a = NativeSpec::new("A").build().unwrap();
	let res = classify(&"C".into(), &[Class::root(), a]).unwrap();
	assert_eq!(&**res.concrete_base.name(), "A");
	assert_eq!(res.all_bases.len(), 2);
}

#[test]
fn classify_rejects_duplicate_base() {
	let a = NativeSpec::new("A").build().unwrap();
	let err = classify(&"C".into(), &[a.clone(), a]).unwrap_err();
	assert_eq!(err, CompositionError::DuplicateBase { class: "C".into(), base: "A".into() });
}

#[test]
fn abstract_native_is_mixin_contributing_fields() {
	let abc = NativeSpec::new("Iterable").fields(["cursor"]).abstract_methods(["iter"]).build().unwrap();
	let res = classify(&"C".into(), &[abc]).unwrap();
	assert_eq!(res.mixins.len(), 1);
	assert_eq!(names(&res.mixin_fields), vec!["cursor"]);
	assert_eq!(res.abstract_attrs, set(&["iter"]));
}

#[test]
fn fields_skip_reserved_inherited_and_data_bound() {
	let base = NativeSpec::new("Base").fields(["a"]).build().unwrap();
	let res = classify(&"C".into(), &[base]).unwrap();
	let mut ns = IndexMap::new();
	ns.insert(Name::from("cached"), Member::binding(Lazy::new(|_| Ok(Value::Int(1)))));
	let candidates = Candidates {
		explicit: ["b", "__init__"].into_iter().map(Name::from).collect(),
		assigned: ["a", "cached", "c", "b"].into_iter().map(Name::from).collect(),
	};

	let layout = resolve_fields(&"C".into(), &res, &candidates, &ns, &ComposeConfig::default()).unwrap();
	assert_eq!(names(&layout.fields), vec!["b", "c"]);
	assert_eq!(layout.data_bound, set(&["cached"]));
	assert!(layout.classvars.is_empty());
}

#[test]
fn private_base_field_requires_explicit_redeclaration() {
	let base = NativeSpec::new("Base").fields(["_secret", "_dunder_", "public"]).build().unwrap();
	let res = classify(&"C".into(), &[base]).unwrap();
	let ns = IndexMap::new();
	let config = ComposeConfig::default();

	let assigned = Candidates {
		explicit: IndexSet::new(),
		assigned: ["public", "_dunder_", "_secret"].into_iter().map(Name::from).collect(),
	};
	let err = resolve_fields(&"C".into(), &res, &assigned, &ns, &config).unwrap_err();
	assert_eq!(
		err,
		CompositionError::PrivateAttributeAccess {
			class: "C".into(),
			field: "_secret".into(),
			owner: "Base".into()
		}
	);

	let layout = resolve_fields(&"C".into(), &res, &explicit(&["_secret"]), &ns, &config).unwrap();
	assert!(layout.fields.is_empty());

	let lax = ComposeConfig {
		protect_private: false,
		..ComposeConfig::default()
	};
	assert!(resolve_fields(&"C".into(), &res, &assigned, &ns, &lax).is_ok());
}

#[test]
fn class_values_become_classvars_with_storage() {
	let composer = Composer::default();
	let holder = composer.compose(ClassSpec::new("Holder").value("size", 3).mixin(true)).unwrap();
	let res = classify(&"C".into(), &[holder]).unwrap();
	let mut ns = IndexMap::new();
	ns.insert(Name::from("label"), Member::from(Value::from("x")));
	ns.insert(Name::from("go"), Member::from(Method::new(0, |_, _| Ok(Value::Unit))));

	let layout = resolve_fields(&"C".into(), &res, &explicit(&["label", "size", "go"]), &ns, &ComposeConfig::default()).unwrap();
	assert_eq!(names(&layout.fields), vec!["label", "size", "go"]);
	assert_eq!(names(layout.classvars.keys()), vec!["label", "size"]);
	assert_eq!(layout.classvars["size"].class_value(), Some(Value::Int(3)));
}

#[test]
fn requirements_merge_with_overrides() {
	let composer = Composer::default();
	let m = mixin(&composer, "M", &[], &["a", "b"]);
	let res = classify(&"C".into(), &[m]).unwrap();
	let mut ns = IndexMap::new();
	ns.insert(Name::from("a"), Member::from(Value::Int(1)));
	ns.insert(Name::from("c"), Member::from(Requirement::any()));

	let abs = resolve_abstract(&"C".into(), &res, &ns, None, &ComposeConfig::default()).unwrap();
	assert_eq!(abs.abstract_attrs, set(&["b", "c"]));
	assert!(abs.is_abstract && abs.is_mixin);

	let err = resolve_abstract(&"C".into(), &res, &ns, Some(false), &ComposeConfig::default()).unwrap_err();
	assert_eq!(
		err,
		CompositionError::AbstractMixinConflict {
			class: "C".into(),
			missing: vec!["b".into(), "c".into()]
		}
	);
}

#[test]
fn concrete_by_default_and_mixin_on_request() {
	let res = classify(&"C".into(), &[]).unwrap();
	let ns = IndexMap::new();
	let config = ComposeConfig::default();

	let plain = resolve_abstract(&"C".into(), &res, &ns, None, &config).unwrap();
	assert!(!plain.is_mixin && !plain.is_abstract);

	let flagged = resolve_abstract(&"C".into(), &res, &ns, Some(true), &config).unwrap();
	assert!(flagged.is_mixin && !flagged.is_abstract);
}

#[test]
fn arity_checked_against_protocol() {
	let proto = Class::protocol("Sized", [("len", Requirement::with_arity(0))]);
	let res = classify(&"C".into(), &[proto]).unwrap();
	let mut ns = IndexMap::new();
	ns.insert(Name::from("len"), Member::from(Method::new(1, |_, _| Ok(Value::Int(0)))));

	let err = resolve_abstract(&"C".into(), &res, &ns, None, &ComposeConfig::default()).unwrap_err();
	assert_eq!(
		err,
		CompositionError::ArityMismatch {
			class: "C".into(),
			name: "len".into(),
			expected: 0,
			found: 1
		}
	);

	let lax = ComposeConfig {
		check_arity: false,
		..ComposeConfig::default()
	};
	let abs = resolve_abstract(&"C".into(), &res, &ns, None, &lax).unwrap();
	assert!(abs.abstract_attrs.is_empty());
}
