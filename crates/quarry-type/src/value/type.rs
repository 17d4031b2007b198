// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// All value types understood by the query core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
	/// Type is unknown until runtime
	Any,
	Boolean,
	/// A 4-byte signed integer
	Int,
	/// An 8-byte signed integer
	Long,
	/// A 4-byte floating point
	Float,
	/// An 8-byte floating point
	Double,
	/// An arbitrary-precision decimal
	Decimal,
	String,
	/// A date and time without offset
	DateTime,
	/// A date and time with a fixed UTC offset
	DateTimeOffset,
	/// A nested row set
	Table,
	/// A typed array of values
	Array,
	/// A string keyed map of values
	Object,
}

impl Type {
	pub const ALL: [Type; 13] = [
		Type::Any,
		Type::Boolean,
		Type::Int,
		Type::Long,
		Type::Float,
		Type::Double,
		Type::Decimal,
		Type::String,
		Type::DateTime,
		Type::DateTimeOffset,
		Type::Table,
		Type::Array,
		Type::Object,
	];

	pub fn is_number(&self) -> bool {
		matches!(self, Type::Int | Type::Long | Type::Float | Type::Double | Type::Decimal)
	}

	pub fn is_temporal(&self) -> bool {
		matches!(self, Type::DateTime | Type::DateTimeOffset)
	}

	pub fn is_complex(&self) -> bool {
		matches!(self, Type::Table | Type::Array | Type::Object | Type::Any)
	}

	/// Position in the arithmetic promotion lattice `Int < Long < Float < Double`.
	/// Decimal ranks above Double so that it wins `max` comparisons and is then narrowed.
	pub fn numeric_rank(&self) -> Option<u8> {
		match self {
			Type::Int => Some(0),
			Type::Long => Some(1),
			Type::Float => Some(2),
			Type::Double => Some(3),
			Type::Decimal => Some(4),
			_ => None,
		}
	}

	/// Result type of an arithmetic operation. A Decimal operand narrows the result to Double.
	pub fn promote(left: Type, right: Type) -> Type {
		match (left.numeric_rank(), right.numeric_rank()) {
			(Some(l), Some(r)) => match l.max(r) {
				0 => Type::Int,
				1 => Type::Long,
				2 => Type::Float,
				_ => Type::Double,
			},
			_ if left == Type::String || right == Type::String => Type::String,
			_ => Type::Any,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Type::Any => "Any",
			Type::Boolean => "Boolean",
			Type::Int => "Int",
			Type::Long => "Long",
			Type::Float => "Float",
			Type::Double => "Double",
			Type::Decimal => "Decimal",
			Type::String => "String",
			Type::DateTime => "DateTime",
			Type::DateTimeOffset => "DateTimeOffset",
			Type::Table => "Table",
			Type::Array => "Array",
			Type::Object => "Object",
		};
		f.write_str(name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_promote_follows_lattice() {
		assert_eq!(Type::promote(Type::Int, Type::Int), Type::Int);
		assert_eq!(Type::promote(Type::Int, Type::Long), Type::Long);
		assert_eq!(Type::promote(Type::Float, Type::Long), Type::Float);
		assert_eq!(Type::promote(Type::Float, Type::Double), Type::Double);
	}

	#[test]
	fn test_promote_decimal_narrows_to_double() {
		assert_eq!(Type::promote(Type::Decimal, Type::Int), Type::Double);
		assert_eq!(Type::promote(Type::Decimal, Type::Decimal), Type::Double);
		assert_eq!(Type::promote(Type::Float, Type::Decimal), Type::Double);
	}

	#[test]
	fn test_promote_non_numeric() {
		assert_eq!(Type::promote(Type::String, Type::Int), Type::String);
		assert_eq!(Type::promote(Type::Boolean, Type::Int), Type::Any);
	}
}
