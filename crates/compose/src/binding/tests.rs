use pretty_assertions::assert_eq;

use super::*;
use crate::{ClassSpec, Composer, Value};

#[derive(Debug)]
struct Constant(i64);

impl Binding for Constant {
	fn get(&self, _instance: &mut Instance, _name: &str) -> Result<Value, AttributeError> {
		Ok(Value::Int(self.0))
	}

	fn is_data(&self) -> bool {
		true
	}
}

fn wrapped_class(composer: &Composer) -> crate::ClassRef {
	composer
		.compose(ClassSpec::new("Counter").value("count", 0).assigns(["count"]))
		.unwrap()
}

#[test]
fn classvar_instance_read_falls_back_to_class_value() {
	let composer = Composer::default();
	let class = wrapped_class(&composer);
	assert!(class.metadata().unwrap().has_field("count"));

	let mut inst = class.instantiate().unwrap();
	assert_eq!(inst.get("count").unwrap(), Value::Int(0));

	inst.set("count", 5).unwrap();
	assert_eq!(inst.get("count").unwrap(), Value::Int(5));
	assert_eq!(class.class_attr("count").unwrap(), Value::Int(0));
}

#[test]
fn class_assignment_is_absorbed_by_wrapper() {
	let composer = Composer::default();
	let class = wrapped_class(&composer);
	let mut inst = class.instantiate().unwrap();

	class.set_class_attr("count", 7);

	assert!(class.own_attr("count").unwrap().as_binding().is_some());
	assert_eq!(class.class_attr("count").unwrap(), Value::Int(7));
	assert_eq!(inst.get("count").unwrap(), Value::Int(7));
}

#[test]
fn classvar_delete_clears_slot() {
	let composer = Composer::default();
	let class = wrapped_class(&composer);
	let mut inst = class.instantiate().unwrap();

	inst.set("count", 3).unwrap();
	inst.delete("count").unwrap();
	assert_eq!(inst.get("count").unwrap(), Value::Int(0));
	assert_eq!(inst.delete("count"), Err(AttributeError::Unset { name: "count".into() }));
}

#[test]
fn wrapper_records_owner_and_superseded_value() {
	let composer = Composer::default();
	let base = composer
		.compose(ClassSpec::new("Base").value("limit", 10).mixin(true))
		.unwrap();
	let derived = composer
		.compose(ClassSpec::new("Derived").base(&base).value("limit", 20).assigns(["limit"]))
		.unwrap();

	let Some(Member::Binding(binding)) = derived.own_attr("limit") else {
		panic!("limit should be wrapped");
	};
	assert_eq!(binding.class_get(), Some(Value::Int(20)));
	assert!(format!("{binding:?}").contains("Derived"));
}

#[test]
fn wrapper_methods_report_binding_state() {
	let wrapper = ClassVar::new(Value::Int(1));
	assert_eq!(wrapper.owner(), None);
	assert!(wrapper.superseded().is_none());
	assert_eq!(wrapper.class_set(Value::Int(2)), ClassAssign::Absorbed);
	assert_eq!(wrapper.value(), Value::Int(2));
}

#[test]
fn default_data_binding_is_read_only() {
	let composer = Composer::default();
	let class = composer
		.compose(ClassSpec::new("Fixed").binding("answer", Constant(42)).assigns(["answer"]))
		.unwrap();
	assert!(class.metadata().unwrap().data_bound_attrs.contains("answer"));

	let mut inst = class.instantiate().unwrap();
	assert_eq!(inst.get("answer").unwrap(), Value::Int(42));
	assert_eq!(inst.set("answer", 1), Err(AttributeError::ReadOnly { name: "answer".into() }));
	assert_eq!(inst.delete("answer"), Err(AttributeError::ReadOnly { name: "answer".into() }));
}

#[test]
fn class_set_on_plain_value_overwrites() {
	let composer = Composer::default();
	let class = composer.compose(ClassSpec::new("Plain").value("tag", "a")).unwrap();
	class.set_class_attr("tag", "b");
	class.set_class_attr("fresh", true);
	assert_eq!(class.class_attr("tag").unwrap(), Value::from("b"));
	assert_eq!(class.class_attr("fresh").unwrap(), Value::Bool(true));
}
