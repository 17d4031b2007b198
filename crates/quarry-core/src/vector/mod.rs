// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Columnar batches.
//!
//! A [`TupleVector`] is a schema plus one [`ValueVector`] per column, all of
//! the same row count. Value vectors are literal buffers ([`ColumnData`]),
//! constants, zero-copy selection views or chained views over several
//! tuple vectors.

use std::{fmt::Debug, sync::Arc};

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use once_cell::sync::Lazy;
use quarry_type::{Decimal, Result, Type};

use crate::{
	error::VectorError,
	schema::{ResolvedType, Schema},
	value::{ObjectValue, Value},
};

pub mod builder;
mod chained;
mod columns;
mod constant;
pub mod data;
mod selection;

pub use builder::ColumnDataBuilder;
pub use chained::{ChainedTupleVector, ChainedValueVector, chain};
pub use columns::Columns;
pub use constant::ConstantVector;
pub use data::{ColumnData, ColumnValues};
pub use selection::{SelectedTupleVector, SelectedValueVector, SelectionVector};

pub type ValueVectorRef = Arc<dyn ValueVector>;
pub type TupleVectorRef = Arc<dyn TupleVector>;

/// One column of values with a null mask.
///
/// Every implementation provides every typed accessor. Reading a null row
/// through a typed accessor fails; reading a row of a different type
/// converts where a lossless or conventional conversion exists.
pub trait ValueVector: Debug + Send + Sync {
	fn ty(&self) -> &ResolvedType;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Out-of-bounds rows read as null.
	fn is_null(&self, row: usize) -> bool;

	/// Out-of-bounds rows read as [`Value::Null`].
	fn get_any(&self, row: usize) -> Value;

	fn get_boolean(&self, row: usize) -> Result<bool>;

	fn get_int(&self, row: usize) -> Result<i32>;

	fn get_long(&self, row: usize) -> Result<i64>;

	fn get_float(&self, row: usize) -> Result<f32>;

	fn get_double(&self, row: usize) -> Result<f64>;

	fn get_decimal(&self, row: usize) -> Result<Decimal>;

	fn get_string(&self, row: usize) -> Result<Arc<str>>;

	fn get_datetime(&self, row: usize) -> Result<NaiveDateTime>;

	fn get_datetime_offset(&self, row: usize) -> Result<DateTime<FixedOffset>>;

	fn get_table(&self, row: usize) -> Result<TupleVectorRef>;

	fn get_array(&self, row: usize) -> Result<ValueVectorRef>;

	fn get_object(&self, row: usize) -> Result<Arc<ObjectValue>>;
}

pub trait TupleVector: Debug + Send + Sync {
	fn schema(&self) -> &Schema;

	fn row_count(&self) -> usize;

	fn column(&self, index: usize) -> Option<ValueVectorRef>;

	fn column_by_name(&self, name: &str) -> Option<ValueVectorRef> {
		self.schema().index_of(name).and_then(|index| self.column(index))
	}
}

/// Reads `row` through the typed accessor matching the vector's static type.
pub fn read_value(vector: &dyn ValueVector, row: usize) -> Result<Value> {
	if row >= vector.len() {
		return Err(VectorError::RowOutOfBounds {
			row,
			len: vector.len(),
		}
		.into());
	}
	if vector.is_null(row) {
		return Ok(Value::Null);
	}
	Ok(match vector.ty().ty() {
		Type::Any => vector.get_any(row),
		Type::Boolean => Value::Boolean(vector.get_boolean(row)?),
		Type::Int => Value::Int(vector.get_int(row)?),
		Type::Long => Value::Long(vector.get_long(row)?),
		Type::Float => Value::Float(vector.get_float(row)?),
		Type::Double => Value::Double(vector.get_double(row)?),
		Type::Decimal => Value::Decimal(vector.get_decimal(row)?),
		Type::String => Value::String(vector.get_string(row)?),
		Type::DateTime => Value::DateTime(vector.get_datetime(row)?),
		Type::DateTimeOffset => Value::DateTimeOffset(vector.get_datetime_offset(row)?),
		Type::Table => Value::Table(vector.get_table(row)?),
		Type::Array => Value::Array(vector.get_array(row)?),
		Type::Object => Value::Object(vector.get_object(row)?),
	})
}

static EMPTY: Lazy<TupleVectorRef> = Lazy::new(|| Arc::new(Columns::empty()));

/// The canonical tuple vector with no rows and no columns.
pub fn empty() -> TupleVectorRef {
	EMPTY.clone()
}

pub(crate) fn check_row(row: usize, len: usize) -> Result<()> {
	if row >= len {
		return Err(VectorError::RowOutOfBounds {
			row,
			len,
		}
		.into());
	}
	Ok(())
}
