// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_type::{Result, Type};

use crate::{
	schema::ResolvedType,
	value::{Value, convert},
	vector::data::{ColumnData, ColumnValues, Container},
};

/// Accumulates values into a [`ColumnData`] of a fixed type, converting
/// each pushed value to that type.
#[derive(Debug)]
pub struct ColumnDataBuilder {
	ty: ResolvedType,
	values: ColumnValues,
}

impl ColumnDataBuilder {
	pub fn new(ty: impl Into<ResolvedType>, capacity: usize) -> Self {
		let ty = ty.into();
		let values = match ty.ty() {
			Type::Any => ColumnValues::Any(Container::with_capacity(capacity)),
			Type::Boolean => ColumnValues::Boolean(Container::with_capacity(capacity)),
			Type::Int => ColumnValues::Int(Container::with_capacity(capacity)),
			Type::Long => ColumnValues::Long(Container::with_capacity(capacity)),
			Type::Float => ColumnValues::Float(Container::with_capacity(capacity)),
			Type::Double => ColumnValues::Double(Container::with_capacity(capacity)),
			Type::Decimal => ColumnValues::Decimal(Container::with_capacity(capacity)),
			Type::String => ColumnValues::String(Container::with_capacity(capacity)),
			Type::DateTime => ColumnValues::DateTime(Container::with_capacity(capacity)),
			Type::DateTimeOffset => ColumnValues::DateTimeOffset(Container::with_capacity(capacity)),
			Type::Table => ColumnValues::Table(Container::with_capacity(capacity)),
			Type::Array => ColumnValues::Array(Container::with_capacity(capacity)),
			Type::Object => ColumnValues::Object(Container::with_capacity(capacity)),
		};
		Self {
			ty,
			values,
		}
	}

	pub fn push(&mut self, value: Value) -> Result<()> {
		if value.is_null() {
			self.push_null();
			return Ok(());
		}
		match &mut self.values {
			ColumnValues::Any(c) => c.push(identity(&value)?),
			ColumnValues::Boolean(c) => c.push(convert::to_boolean(&value)?),
			ColumnValues::Int(c) => c.push(convert::to_int(&value)?),
			ColumnValues::Long(c) => c.push(convert::to_long(&value)?),
			ColumnValues::Float(c) => c.push(convert::to_float(&value)?),
			ColumnValues::Double(c) => c.push(convert::to_double(&value)?),
			ColumnValues::Decimal(c) => c.push(convert::to_decimal(&value)?),
			ColumnValues::String(c) => c.push(convert::to_string(&value)?),
			ColumnValues::DateTime(c) => c.push(convert::to_datetime(&value)?),
			ColumnValues::DateTimeOffset(c) => c.push(convert::to_datetime_offset(&value)?),
			ColumnValues::Table(c) => c.push(convert::to_table(&value)?),
			ColumnValues::Array(c) => c.push(convert::to_array(&value)?),
			ColumnValues::Object(c) => c.push(convert::to_object(&value)?),
			ColumnValues::Undefined(len) => *len += 1,
		}
		Ok(())
	}

	pub fn push_null(&mut self) {
		match &mut self.values {
			ColumnValues::Any(c) => c.push_undefined(),
			ColumnValues::Boolean(c) => c.push_undefined(),
			ColumnValues::Int(c) => c.push_undefined(),
			ColumnValues::Long(c) => c.push_undefined(),
			ColumnValues::Float(c) => c.push_undefined(),
			ColumnValues::Double(c) => c.push_undefined(),
			ColumnValues::Decimal(c) => c.push_undefined(),
			ColumnValues::String(c) => c.push_undefined(),
			ColumnValues::DateTime(c) => c.push_undefined(),
			ColumnValues::DateTimeOffset(c) => c.push_undefined(),
			ColumnValues::Table(c) => c.push_undefined(),
			ColumnValues::Array(c) => c.push_undefined(),
			ColumnValues::Object(c) => c.push_undefined(),
			ColumnValues::Undefined(len) => *len += 1,
		}
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn build(self) -> ColumnData {
		ColumnData::new(self.ty, self.values)
	}
}

fn identity(value: &Value) -> Result<Value> {
	Ok(value.clone())
}

impl ColumnData {
	/// Builds a buffer typed by the values: the common type of all non-null
	/// values, `Any` when they differ, all-null when there are none.
	pub fn from_values(values: Vec<Value>) -> Self {
		let mut common: Option<Type> = None;
		for value in values.iter().filter(|v| !v.is_null()) {
			let ty = match value {
				// lists and sequences stay as values
				Value::List(_) | Value::Sequence(_) => Type::Any,
				other => other.ty(),
			};
			common = match common {
				None => Some(ty),
				Some(existing) if existing == ty => Some(existing),
				Some(_) => Some(Type::Any),
			};
		}
		let ty = match common {
			None => return ColumnData::undefined(values.len()),
			Some(Type::Table) | Some(Type::Array) => Type::Any,
			Some(ty) => ty,
		};
		let mut builder = ColumnDataBuilder::new(ty, values.len());
		for value in values {
			if builder.push(value).is_err() {
				// unreachable for a common type; keep the row as null
				builder.push_null();
			}
		}
		builder.build()
	}
}
