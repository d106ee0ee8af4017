use std::thread;

use super::*;
use crate::NativeSpec;

fn class(name: &str) -> ClassRef {
	NativeSpec::new(name).build().unwrap()
}

#[test]
fn register_and_lookup() {
	let registry = ClassRegistry::default();
	let a = class("A");
	assert!(matches!(registry.register(&a), Registration::Inserted));
	assert!(Arc::ptr_eq(&registry.get("A").unwrap(), &a));
	assert!(registry.get("B").is_none());
	assert_eq!(registry.len(), 1);
}

#[test]
fn replace_policy_swaps_entry() {
	let registry = ClassRegistry::new(DuplicateNames::Replace);
	let first = class("A");
	let second = class("A");
	registry.register(&first);

	let Registration::Replaced(old) = registry.register(&second) else {
		panic!("second registration should replace");
	};
	assert!(Arc::ptr_eq(&old, &first));
	assert!(Arc::ptr_eq(&registry.get("A").unwrap(), &second));
}

#[test]
fn reject_policy_keeps_first() {
	let registry = ClassRegistry::new(DuplicateNames::Reject);
	let first = class("A");
	let second = class("A");
	registry.register(&first);

	assert!(matches!(registry.register(&second), Registration::Rejected(ref kept) if Arc::ptr_eq(kept, &first)));
	assert!(Arc::ptr_eq(&registry.get("A").unwrap(), &first));
}

#[test]
fn reregistering_same_class_is_noop() {
	let registry = ClassRegistry::new(DuplicateNames::Reject);
	let a = class("A");
	registry.register(&a);
	assert!(matches!(registry.register(&a), Registration::Inserted));
	assert_eq!(registry.len(), 1);
}

/// Concurrent registrations of distinct names must all survive the CAS loop.
#[test]
fn no_lost_updates() {
	let registry = Arc::new(ClassRegistry::default());
	let handles: Vec<_> = (0..8)
		.map(|t| {
			let registry = registry.clone();
			thread::spawn(move || {
				for i in 0..25 {
					registry.register(&class(&format!("C{t}_{i}")));
				}
			})
		})
		.collect();
	for h in handles {
		h.join().unwrap();
	}

	assert_eq!(registry.len(), 200);
	let names = registry.names();
	assert!(names.windows(2).all(|w| w[0] < w[1]));
}
