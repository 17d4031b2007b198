// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use quarry_type::{Decimal, Result};

use crate::{
	error::VectorError,
	schema::ResolvedType,
	value::{ObjectValue, Value, convert},
	vector::{TupleVectorRef, ValueVector, ValueVectorRef, check_row},
};

/// The same value repeated `len` times.
#[derive(Debug, Clone)]
pub struct ConstantVector {
	ty: ResolvedType,
	value: Value,
	len: usize,
}

impl ConstantVector {
	pub fn new(value: Value, len: usize) -> Self {
		let ty = match &value {
			Value::Table(table) => ResolvedType::table(table.schema().clone()),
			other => ResolvedType::of(other.ty()),
		};
		Self {
			ty,
			value,
			len,
		}
	}

	pub fn null(len: usize) -> Self {
		Self::new(Value::Null, len)
	}

	pub fn value(&self) -> &Value {
		&self.value
	}

	fn get(&self, row: usize) -> Result<&Value> {
		check_row(row, self.len)?;
		if self.value.is_null() {
			return Err(VectorError::NullValue {
				row,
			}
			.into());
		}
		Ok(&self.value)
	}
}

impl ValueVector for ConstantVector {
	fn ty(&self) -> &ResolvedType {
		&self.ty
	}

	fn len(&self) -> usize {
		self.len
	}

	fn is_null(&self, row: usize) -> bool {
		row >= self.len || self.value.is_null()
	}

	fn get_any(&self, row: usize) -> Value {
		if row < self.len {
			self.value.clone()
		} else {
			Value::Null
		}
	}

	fn get_boolean(&self, row: usize) -> Result<bool> {
		convert::to_boolean(self.get(row)?)
	}

	fn get_int(&self, row: usize) -> Result<i32> {
		convert::to_int(self.get(row)?)
	}

	fn get_long(&self, row: usize) -> Result<i64> {
		convert::to_long(self.get(row)?)
	}

	fn get_float(&self, row: usize) -> Result<f32> {
		convert::to_float(self.get(row)?)
	}

	fn get_double(&self, row: usize) -> Result<f64> {
		convert::to_double(self.get(row)?)
	}

	fn get_decimal(&self, row: usize) -> Result<Decimal> {
		convert::to_decimal(self.get(row)?)
	}

	fn get_string(&self, row: usize) -> Result<Arc<str>> {
		convert::to_string(self.get(row)?)
	}

	fn get_datetime(&self, row: usize) -> Result<NaiveDateTime> {
		convert::to_datetime(self.get(row)?)
	}

	fn get_datetime_offset(&self, row: usize) -> Result<DateTime<FixedOffset>> {
		convert::to_datetime_offset(self.get(row)?)
	}

	fn get_table(&self, row: usize) -> Result<TupleVectorRef> {
		convert::to_table(self.get(row)?)
	}

	fn get_array(&self, row: usize) -> Result<ValueVectorRef> {
		convert::to_array(self.get(row)?)
	}

	fn get_object(&self, row: usize) -> Result<Arc<ObjectValue>> {
		convert::to_object(self.get(row)?)
	}
}
