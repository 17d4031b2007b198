// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

use quarry_type::Result;

use crate::value::Value;

pub type ValueIter<'a> = Box<dyn Iterator<Item = Result<Value>> + 'a>;

/// Produces the elements of a lazy sequence. Every call to `iter` starts a
/// fresh pass, so a sequence may be consumed more than once.
pub trait SequenceSource: Send + Sync {
	fn iter(&self) -> ValueIter<'_>;
}

#[derive(Clone)]
pub struct Sequence(Arc<dyn SequenceSource>);

impl Sequence {
	pub fn new(source: impl SequenceSource + 'static) -> Self {
		Self(Arc::new(source))
	}

	pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
		Self::new(Materialized(values.into_iter().collect()))
	}

	pub fn iter(&self) -> ValueIter<'_> {
		self.0.iter()
	}

	pub fn collect(&self) -> Result<Vec<Value>> {
		self.iter().collect()
	}

	pub fn ptr_eq(&self, other: &Sequence) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Debug for Sequence {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("Sequence(..)")
	}
}

struct Materialized(Vec<Value>);

impl SequenceSource for Materialized {
	fn iter(&self) -> ValueIter<'_> {
		Box::new(self.0.iter().cloned().map(Ok))
	}
}

/// Iterates the elements of an array, list or sequence. Returns `None`
/// for values that are not sequence-like.
pub fn elements(value: &Value) -> Option<ValueIter<'_>> {
	match value {
		Value::Array(vector) => Some(Box::new((0..vector.len()).map(move |row| Ok(vector.get_any(row))))),
		Value::List(values) => Some(Box::new(values.iter().cloned().map(Ok))),
		Value::Sequence(sequence) => Some(sequence.iter()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_sequence_is_reiterable() {
		let sequence = Sequence::from_values([Value::Int(1), Value::Int(2)]);
		assert_eq!(sequence.collect().unwrap(), vec![Value::Int(1), Value::Int(2)]);
		assert_eq!(sequence.collect().unwrap().len(), 2);
	}

	#[test]
	fn test_elements_of_scalar_is_none() {
		assert!(elements(&Value::Int(1)).is_none());
		assert!(elements(&Value::Null).is_none());
	}

	#[test]
	fn test_elements_of_list() {
		let list = Value::list([Value::from("a"), Value::Null]);
		let items: Vec<_> = elements(&list).unwrap().collect::<Result<_>>().unwrap();
		assert_eq!(items, vec![Value::from("a"), Value::Null]);
	}
}
