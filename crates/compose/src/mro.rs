//! C3 linearization of declared bases.

use crate::class::{Class, ClassRef};

/// Computes the ancestor order of a class with the given declared bases.
///
/// The class itself is not included. Returns `None` when the bases admit no
/// consistent linearization.
pub(crate) fn linearize(bases: &[ClassRef]) -> Option<Vec<ClassRef>> {
	if bases.is_empty() {
		return Some(vec![Class::root()]);
	}

	let mut seqs: Vec<Vec<ClassRef>> = bases
		.iter()
		.map(|b| std::iter::once(b.clone()).chain(b.ancestors().iter().cloned()).collect())
		.collect();
	seqs.push(bases.to_vec());

	let mut out = Vec::new();
	loop {
		seqs.retain(|s| !s.is_empty());
		if seqs.is_empty() {
			return Some(out);
		}

		// First head that does not appear in the tail of any sequence.
		let head = seqs.iter().map(|s| &s[0]).find(|cand| {
			seqs.iter().all(|s| s[1..].iter().all(|c| c.id() != cand.id()))
		})?;
		let head = head.clone();

		for s in &mut seqs {
			if s[0].id() == head.id() {
				s.remove(0);
			}
		}
		out.push(head);
	}
}
