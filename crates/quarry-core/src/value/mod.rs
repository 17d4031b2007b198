// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::BTreeMap,
	fmt::{self, Display, Formatter},
	sync::Arc,
};

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use quarry_type::{Decimal, Type};

use crate::vector::{TupleVectorRef, ValueVectorRef};

pub mod convert;
pub mod hash;
pub mod math;
mod sequence;

pub use sequence::{Sequence, SequenceSource, ValueIter, elements};

pub type ObjectValue = BTreeMap<String, Value>;

/// A single runtime value produced by expression evaluation or read from a vector.
#[derive(Clone, Debug)]
pub enum Value {
	Null,
	Boolean(bool),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	Decimal(Decimal),
	String(Arc<str>),
	DateTime(NaiveDateTime),
	DateTimeOffset(DateTime<FixedOffset>),
	/// A nested tuple vector, e.g. a populated join column.
	Table(TupleVectorRef),
	Array(ValueVectorRef),
	/// A materialized collection of values.
	List(Arc<[Value]>),
	/// A lazily evaluated, re-iterable series of values.
	Sequence(Sequence),
	Object(Arc<ObjectValue>),
}

impl Value {
	pub fn string(value: impl AsRef<str>) -> Self {
		Value::String(Arc::from(value.as_ref()))
	}

	pub fn list(values: impl IntoIterator<Item = Value>) -> Self {
		Value::List(values.into_iter().collect())
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn is_number(&self) -> bool {
		matches!(
			self,
			Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_) | Value::Decimal(_)
		)
	}

	/// True for values that iterate as a series of elements.
	pub fn is_sequence_like(&self) -> bool {
		matches!(self, Value::Array(_) | Value::List(_) | Value::Sequence(_))
	}

	pub fn ty(&self) -> Type {
		match self {
			Value::Null => Type::Any,
			Value::Boolean(_) => Type::Boolean,
			Value::Int(_) => Type::Int,
			Value::Long(_) => Type::Long,
			Value::Float(_) => Type::Float,
			Value::Double(_) => Type::Double,
			Value::Decimal(_) => Type::Decimal,
			Value::String(_) => Type::String,
			Value::DateTime(_) => Type::DateTime,
			Value::DateTimeOffset(_) => Type::DateTimeOffset,
			Value::Table(_) => Type::Table,
			Value::Array(_) | Value::List(_) | Value::Sequence(_) => Type::Array,
			Value::Object(_) => Type::Object,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	/// Renders the value for diagnostics; strings are quoted so that
	/// an empty string stays visible.
	pub fn describe(&self) -> String {
		match self {
			Value::String(s) => format!("'{}'", s),
			other => other.to_string(),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Boolean(l), Value::Boolean(r)) => l == r,
			(Value::Int(l), Value::Int(r)) => l == r,
			(Value::Long(l), Value::Long(r)) => l == r,
			(Value::Float(l), Value::Float(r)) => l.to_bits() == r.to_bits() || l == r,
			(Value::Double(l), Value::Double(r)) => l.to_bits() == r.to_bits() || l == r,
			(Value::Decimal(l), Value::Decimal(r)) => l == r,
			(Value::String(l), Value::String(r)) => l == r,
			(Value::DateTime(l), Value::DateTime(r)) => l == r,
			(Value::DateTimeOffset(l), Value::DateTimeOffset(r)) => l == r,
			(Value::Table(l), Value::Table(r)) => Arc::ptr_eq(l, r),
			(Value::Array(l), Value::Array(r)) => Arc::ptr_eq(l, r),
			(Value::List(l), Value::List(r)) => l == r,
			(Value::Sequence(l), Value::Sequence(r)) => l.ptr_eq(r),
			(Value::Object(l), Value::Object(r)) => l == r,
			_ => false,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("null"),
			Value::Boolean(b) => Display::fmt(b, f),
			Value::Int(v) => Display::fmt(v, f),
			Value::Long(v) => Display::fmt(v, f),
			Value::Float(v) => Display::fmt(v, f),
			Value::Double(v) => Display::fmt(v, f),
			Value::Decimal(v) => Display::fmt(v, f),
			Value::String(v) => f.write_str(v),
			Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
			Value::DateTimeOffset(v) => write!(f, "{}", v.to_rfc3339()),
			Value::Table(v) => write!(f, "<table {} rows>", v.row_count()),
			Value::Array(v) => {
				f.write_str("[")?;
				for row in 0..v.len() {
					if row > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", v.get_any(row))?;
				}
				f.write_str("]")
			}
			Value::List(values) => {
				f.write_str("[")?;
				for (i, value) in values.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", value)?;
				}
				f.write_str("]")
			}
			Value::Sequence(_) => f.write_str("<sequence>"),
			Value::Object(fields) => {
				f.write_str("{")?;
				for (i, (name, value)) in fields.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}: {}", name, value.describe())?;
				}
				f.write_str("}")
			}
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Boolean(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Long(value)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Value::Float(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Double(value)
	}
}

impl From<Decimal> for Value {
	fn from(value: Decimal) -> Self {
		Value::Decimal(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::string(value)
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(Arc::from(value))
	}
}

impl From<NaiveDateTime> for Value {
	fn from(value: NaiveDateTime) -> Self {
		Value::DateTime(value)
	}
}

impl From<DateTime<FixedOffset>> for Value {
	fn from(value: DateTime<FixedOffset>) -> Self {
		Value::DateTimeOffset(value)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Value::Null)
	}
}
