use pretty_assertions::assert_eq;

use super::*;
use crate::{ClassSpec, ComposeConfig, Composer, Method, NativeSpec, Requirement};

fn missing(class: &str, name: &str) -> AttributeError {
	AttributeError::Missing {
		class: class.into(),
		name: name.into(),
	}
}

#[test]
fn slots_start_unset() {
	let composer = Composer::default();
	let class = composer.compose(ClassSpec::new("P").fields(["x", "y"])).unwrap();
	let mut p = class.instantiate().unwrap();

	assert_eq!(p.slot_count(), 2);
	assert_eq!(p.get("x"), Err(AttributeError::Unset { name: "x".into() }));
	p.set("x", 1).unwrap();
	assert_eq!(p.get("x").unwrap(), Value::Int(1));
	assert_eq!(p.stored("y"), None);
}

#[test]
fn closed_layout_rejects_unknown_names() {
	let composer = Composer::default();
	let class = composer.compose(ClassSpec::new("P").field("x")).unwrap();
	let mut p = class.instantiate().unwrap();

	assert_eq!(p.set("z", 1), Err(missing("P", "z")));
	assert_eq!(p.get("z"), Err(missing("P", "z")));
	assert_eq!(p.delete("z"), Err(missing("P", "z")));
}

#[test]
fn dynamic_lineage_gets_open_map() {
	let composer = Composer::default();
	let open = NativeSpec::new("Open").dynamic().build().unwrap();
	let class = composer.compose(ClassSpec::new("Child").base(&open).field("x")).unwrap();
	let mut c = class.instantiate().unwrap();

	assert_eq!(c.slot_count(), 1);
	c.set("extra", "hello").unwrap();
	assert_eq!(c.get("extra").unwrap(), Value::from("hello"));
	c.delete("extra").unwrap();
	assert_eq!(c.get("extra"), Err(missing("Child", "extra")));
}

#[test]
fn stored_value_shadows_plain_class_value() {
	let composer = Composer::default();
	let base = composer.compose(ClassSpec::new("Base").value("color", "red").mixin(true)).unwrap();
	let open = NativeSpec::new("Open").dynamic().build().unwrap();
	let class = composer.compose(ClassSpec::new("Leaf").base(&open).base(&base)).unwrap();
	let mut leaf = class.instantiate().unwrap();

	assert_eq!(leaf.get("color").unwrap(), Value::from("red"));
	leaf.set("color", "blue").unwrap();
	assert_eq!(leaf.get("color").unwrap(), Value::from("blue"));
}

#[test]
fn call_checks_arity_and_runs_body() {
	let composer = Composer::default();
	let class = composer
		.compose(
			ClassSpec::new("Acc")
				.field("total")
				.method(
					"add",
					Method::new(1, |this, args| {
						let current = this.stored("total").and_then(Value::as_int).unwrap_or(0);
						let delta = args[0].as_int().unwrap_or(0);
						this.store("total", Value::Int(current + delta))?;
						this.get("total")
					}),
				),
		)
		.unwrap();
	let mut acc = class.instantiate().unwrap();

	assert_eq!(acc.call("add", &[Value::Int(2)]).unwrap(), Value::Int(2));
	assert_eq!(acc.call("add", &[Value::Int(3)]).unwrap(), Value::Int(5));
	assert_eq!(
		acc.call("add", &[]),
		Err(AttributeError::Arity {
			name: "add".into(),
			expected: 1,
			found: 0
		})
	);
	assert_eq!(acc.get("add"), Err(AttributeError::NotAValue { name: "add".into() }));
	assert_eq!(acc.call("nope", &[]), Err(missing("Acc", "nope")));
}

#[test]
fn unguarded_mixin_reports_unimplemented_requirements() {
	let config = ComposeConfig {
		guard_instantiation: false,
		..ComposeConfig::default()
	};
	let composer = Composer::new(config);
	let class = composer.compose(ClassSpec::new("Half").requirement("run", Requirement::any()).field("x")).unwrap();
	let mut half = class.instantiate().unwrap();

	assert_eq!(half.slot_count(), 0);
	assert_eq!(half.call("run", &[]), Err(AttributeError::Unimplemented { name: "run".into() }));
	assert_eq!(half.get("run"), Err(AttributeError::Unimplemented { name: "run".into() }));
	half.set("x", 4).unwrap();
	assert_eq!(half.get("x").unwrap(), Value::Int(4));
}

#[test]
fn cells_are_independent_of_storage() {
	let composer = Composer::default();
	let class = composer.compose(ClassSpec::new("C").field("x")).unwrap();
	let mut c = class.instantiate().unwrap();

	c.set_cell("x", Cell::Cached(Value::Int(1)));
	assert_eq!(c.cell("x"), Some(&Cell::Cached(Value::Int(1))));
	assert_eq!(c.stored("x"), None);
	assert_eq!(c.take_cell("x"), Some(Cell::Cached(Value::Int(1))));
	assert_eq!(c.cell("x"), None);
}
