// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use quarry_type::{BitVec, Decimal, Result, Type};

use crate::{
	error::VectorError,
	schema::{ResolvedType, Schema},
	value::{ObjectValue, Value, convert},
	vector::{TupleVectorRef, ValueVector, ValueVectorRef, check_row, empty},
};

/// Stand-in stored at undefined positions.
pub trait Placeholder {
	fn placeholder() -> Self;
}

macro_rules! impl_placeholder {
	($($t:ty => $e:expr),* $(,)?) => {
		$(impl Placeholder for $t {
			fn placeholder() -> Self {
				$e
			}
		})*
	};
}

impl_placeholder! {
	bool => false,
	i32 => 0,
	i64 => 0,
	f32 => 0.0,
	f64 => 0.0,
	Decimal => Decimal::from(0),
	Arc<str> => Arc::from(""),
	NaiveDateTime => NaiveDateTime::default(),
	DateTime<FixedOffset> => DateTime::<FixedOffset>::default(),
	TupleVectorRef => empty(),
	ValueVectorRef => Arc::new(ColumnData::undefined(0)),
	Arc<ObjectValue> => Arc::default(),
	Value => Value::Null,
}

/// Values plus a defined-mask; undefined positions are null.
#[derive(Debug, Clone)]
pub struct Container<T> {
	data: Vec<T>,
	bitvec: BitVec,
}

impl<T: Clone + Placeholder> Container<T> {
	pub fn new(data: Vec<T>) -> Self {
		let bitvec = BitVec::repeat(data.len(), true);
		Self {
			data,
			bitvec,
		}
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			data: Vec::with_capacity(capacity),
			bitvec: BitVec::with_capacity(capacity),
		}
	}

	pub fn from_options(values: impl IntoIterator<Item = Option<T>>) -> Self {
		let mut result = Self::with_capacity(0);
		for value in values {
			match value {
				Some(value) => result.push(value),
				None => result.push_undefined(),
			}
		}
		result
	}

	pub fn push(&mut self, value: T) {
		self.data.push(value);
		self.bitvec.push(true);
	}

	pub fn push_undefined(&mut self) {
		self.data.push(T::placeholder());
		self.bitvec.push(false);
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn is_defined(&self, idx: usize) -> bool {
		idx < self.len() && self.bitvec.get(idx)
	}

	pub fn get(&self, idx: usize) -> Option<&T> {
		if self.is_defined(idx) {
			self.data.get(idx)
		} else {
			None
		}
	}

	pub fn bitvec(&self) -> &BitVec {
		&self.bitvec
	}
}

#[derive(Debug, Clone)]
pub enum ColumnValues {
	Boolean(Container<bool>),
	Int(Container<i32>),
	Long(Container<i64>),
	Float(Container<f32>),
	Double(Container<f64>),
	Decimal(Container<Decimal>),
	String(Container<Arc<str>>),
	DateTime(Container<NaiveDateTime>),
	DateTimeOffset(Container<DateTime<FixedOffset>>),
	Table(Container<TupleVectorRef>),
	Array(Container<ValueVectorRef>),
	Object(Container<Arc<ObjectValue>>),
	/// Mixed or untyped values.
	Any(Container<Value>),
	/// All rows null.
	Undefined(usize),
}

macro_rules! dispatch {
	($values:expr, $c:ident => $body:expr, $len:ident => $undefined:expr) => {
		match $values {
			ColumnValues::Boolean($c) => $body,
			ColumnValues::Int($c) => $body,
			ColumnValues::Long($c) => $body,
			ColumnValues::Float($c) => $body,
			ColumnValues::Double($c) => $body,
			ColumnValues::Decimal($c) => $body,
			ColumnValues::String($c) => $body,
			ColumnValues::DateTime($c) => $body,
			ColumnValues::DateTimeOffset($c) => $body,
			ColumnValues::Table($c) => $body,
			ColumnValues::Array($c) => $body,
			ColumnValues::Object($c) => $body,
			ColumnValues::Any($c) => $body,
			ColumnValues::Undefined($len) => $undefined,
		}
	};
}

impl ColumnValues {
	pub fn len(&self) -> usize {
		dispatch!(self, c => c.len(), len => *len)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn is_defined(&self, idx: usize) -> bool {
		dispatch!(self, c => c.is_defined(idx), _len => false)
	}

	pub fn get_value(&self, idx: usize) -> Value {
		fn wrap<T: Clone + Placeholder>(c: &Container<T>, idx: usize, f: impl FnOnce(T) -> Value) -> Value {
			c.get(idx).cloned().map(f).unwrap_or(Value::Null)
		}
		match self {
			ColumnValues::Boolean(c) => wrap(c, idx, Value::Boolean),
			ColumnValues::Int(c) => wrap(c, idx, Value::Int),
			ColumnValues::Long(c) => wrap(c, idx, Value::Long),
			ColumnValues::Float(c) => wrap(c, idx, Value::Float),
			ColumnValues::Double(c) => wrap(c, idx, Value::Double),
			ColumnValues::Decimal(c) => wrap(c, idx, Value::Decimal),
			ColumnValues::String(c) => wrap(c, idx, Value::String),
			ColumnValues::DateTime(c) => wrap(c, idx, Value::DateTime),
			ColumnValues::DateTimeOffset(c) => wrap(c, idx, Value::DateTimeOffset),
			ColumnValues::Table(c) => wrap(c, idx, Value::Table),
			ColumnValues::Array(c) => wrap(c, idx, Value::Array),
			ColumnValues::Object(c) => wrap(c, idx, Value::Object),
			ColumnValues::Any(c) => wrap(c, idx, |v| v),
			ColumnValues::Undefined(_) => Value::Null,
		}
	}
}

/// A literal value buffer.
#[derive(Debug, Clone)]
pub struct ColumnData {
	ty: ResolvedType,
	values: ColumnValues,
}

macro_rules! constructors {
	($($name:ident, $optional:ident, $variant:ident, $t:ty;)*) => {
		$(
			pub fn $name(values: impl IntoIterator<Item = $t>) -> Self {
				Self::new(
					ResolvedType::of(Type::$variant),
					ColumnValues::$variant(Container::new(values.into_iter().collect())),
				)
			}

			pub fn $optional(values: impl IntoIterator<Item = Option<$t>>) -> Self {
				Self::new(ResolvedType::of(Type::$variant), ColumnValues::$variant(Container::from_options(values)))
			}
		)*
	};
}

impl ColumnData {
	pub fn new(ty: ResolvedType, values: ColumnValues) -> Self {
		Self {
			ty,
			values,
		}
	}

	constructors! {
		boolean, boolean_optional, Boolean, bool;
		int, int_optional, Int, i32;
		long, long_optional, Long, i64;
		float, float_optional, Float, f32;
		double, double_optional, Double, f64;
		decimal, decimal_optional, Decimal, Decimal;
		datetime, datetime_optional, DateTime, NaiveDateTime;
		datetime_offset, datetime_offset_optional, DateTimeOffset, DateTime<FixedOffset>;
		object, object_optional, Object, Arc<ObjectValue>;
	}

	pub fn string<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Self {
		Self::new(
			ResolvedType::of(Type::String),
			ColumnValues::String(Container::new(values.into_iter().map(|s| Arc::from(s.as_ref())).collect())),
		)
	}

	pub fn string_optional<S: AsRef<str>>(values: impl IntoIterator<Item = Option<S>>) -> Self {
		Self::new(
			ResolvedType::of(Type::String),
			ColumnValues::String(Container::from_options(
				values.into_iter().map(|s| s.map(|s| Arc::from(s.as_ref()))),
			)),
		)
	}

	pub fn table(schema: Schema, values: impl IntoIterator<Item = Option<TupleVectorRef>>) -> Self {
		Self::new(ResolvedType::table(schema), ColumnValues::Table(Container::from_options(values)))
	}

	pub fn array(sub_type: ResolvedType, values: impl IntoIterator<Item = Option<ValueVectorRef>>) -> Self {
		Self::new(ResolvedType::array(sub_type), ColumnValues::Array(Container::from_options(values)))
	}

	/// Untyped values; nulls are undefined positions.
	pub fn any(values: impl IntoIterator<Item = Value>) -> Self {
		let values = values.into_iter().map(|v| (!v.is_null()).then_some(v));
		Self::new(ResolvedType::of(Type::Any), ColumnValues::Any(Container::from_options(values)))
	}

	pub fn undefined(len: usize) -> Self {
		Self::new(ResolvedType::of(Type::Any), ColumnValues::Undefined(len))
	}

	pub fn values(&self) -> &ColumnValues {
		&self.values
	}

	fn check(&self, row: usize) -> Result<()> {
		check_row(row, self.values.len())?;
		if !self.values.is_defined(row) {
			return Err(VectorError::NullValue {
				row,
			}
			.into());
		}
		Ok(())
	}
}

macro_rules! accessor {
	($name:ident, $t:ty, $variant:ident, $convert:path) => {
		fn $name(&self, row: usize) -> Result<$t> {
			self.check(row)?;
			if let ColumnValues::$variant(c) = &self.values {
				if let Some(value) = c.get(row) {
					return Ok(value.clone());
				}
			}
			$convert(&self.values.get_value(row))
		}
	};
}

impl ValueVector for ColumnData {
	fn ty(&self) -> &ResolvedType {
		&self.ty
	}

	fn len(&self) -> usize {
		self.values.len()
	}

	fn is_null(&self, row: usize) -> bool {
		!self.values.is_defined(row)
	}

	fn get_any(&self, row: usize) -> Value {
		self.values.get_value(row)
	}

	accessor!(get_boolean, bool, Boolean, convert::to_boolean);
	accessor!(get_int, i32, Int, convert::to_int);
	accessor!(get_long, i64, Long, convert::to_long);
	accessor!(get_float, f32, Float, convert::to_float);
	accessor!(get_double, f64, Double, convert::to_double);
	accessor!(get_decimal, Decimal, Decimal, convert::to_decimal);
	accessor!(get_string, Arc<str>, String, convert::to_string);
	accessor!(get_datetime, NaiveDateTime, DateTime, convert::to_datetime);
	accessor!(get_datetime_offset, DateTime<FixedOffset>, DateTimeOffset, convert::to_datetime_offset);
	accessor!(get_table, TupleVectorRef, Table, convert::to_table);
	accessor!(get_array, ValueVectorRef, Array, convert::to_array);
	accessor!(get_object, Arc<ObjectValue>, Object, convert::to_object);
}
