// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use quarry_type::{Decimal, Result};
use tracing::instrument;

use crate::{
	error::VectorError,
	schema::{ResolvedType, Schema},
	value::{ObjectValue, Value},
	vector::{TupleVector, TupleVectorRef, ValueVector, ValueVectorRef, empty},
};

/// Concatenates tuple vectors into one logical vector.
///
/// Zero inputs give the canonical empty vector and a single input is
/// returned as is. Two or more inputs without any columns fail. Otherwise
/// the widest input's schema becomes the result schema, and every other
/// input must match it by position, name (case-insensitively) and type on
/// its own columns. Columns an input
/// lacks read as null for that input's rows.
#[instrument(name = "core::vector::chain", level = "trace", skip_all, fields(inputs = vectors.len()))]
pub fn chain(mut vectors: Vec<TupleVectorRef>) -> Result<TupleVectorRef> {
	match vectors.len() {
		0 => return Ok(empty()),
		1 => return Ok(vectors.remove(0)),
		_ => {}
	}
	Ok(Arc::new(ChainedTupleVector::new(vectors)?))
}

#[derive(Debug, Clone)]
pub struct ChainedTupleVector {
	schema: Schema,
	offsets: Arc<[usize]>,
	columns: Vec<ValueVectorRef>,
}

impl ChainedTupleVector {
	pub fn new(vectors: Vec<TupleVectorRef>) -> Result<Self> {
		let widest = vectors
			.iter()
			.max_by_key(|v| v.schema().len())
			.map(|v| v.schema().clone())
			.unwrap_or_else(Schema::empty);
		if widest.is_empty() {
			return Err(VectorError::SchemaIncompatible {
				reason: "none of the chained vectors has columns".to_string(),
			}
			.into());
		}

		for vector in &vectors {
			check_compatible(&widest, vector.schema())?;
		}

		let mut offsets = Vec::with_capacity(vectors.len() + 1);
		let mut total = 0;
		offsets.push(0);
		for vector in &vectors {
			total += vector.row_count();
			offsets.push(total);
		}
		let offsets: Arc<[usize]> = offsets.into();

		let columns = widest
			.iter()
			.enumerate()
			.map(|(index, column)| {
				Arc::new(ChainedValueVector {
					ty: column.ty().clone(),
					parts: vectors.iter().map(|v| v.column(index)).collect(),
					offsets: offsets.clone(),
				}) as ValueVectorRef
			})
			.collect();

		Ok(Self {
			schema: widest,
			offsets,
			columns,
		})
	}
}

fn check_compatible(widest: &Schema, schema: &Schema) -> Result<()> {
	if schema.ptr_eq(widest) {
		return Ok(());
	}
	if schema.is_empty() {
		return Err(VectorError::SchemaIncompatible {
			reason: "a vector without columns cannot be chained with one that has columns".to_string(),
		}
		.into());
	}
	for (index, (expected, actual)) in widest.iter().zip(schema.iter()).enumerate() {
		if !expected.name().eq_ignore_ascii_case(actual.name()) || expected.ty() != actual.ty() {
			return Err(VectorError::SchemaIncompatible {
				reason: format!(
					"column {} is '{}: {}' but expected '{}: {}'",
					index,
					actual.name(),
					actual.ty(),
					expected.name(),
					expected.ty()
				),
			}
			.into());
		}
	}
	Ok(())
}

impl TupleVector for ChainedTupleVector {
	fn schema(&self) -> &Schema {
		&self.schema
	}

	fn row_count(&self) -> usize {
		self.offsets.last().copied().unwrap_or(0)
	}

	fn column(&self, index: usize) -> Option<ValueVectorRef> {
		self.columns.get(index).cloned()
	}
}

/// One column of a [`ChainedTupleVector`].
#[derive(Debug, Clone)]
pub struct ChainedValueVector {
	ty: ResolvedType,
	parts: Vec<Option<ValueVectorRef>>,
	offsets: Arc<[usize]>,
}

impl ChainedValueVector {
	/// Resolves a logical row to a part and a local row in O(log parts).
	fn locate(&self, row: usize) -> Option<(Option<&ValueVectorRef>, usize)> {
		if row >= self.len() {
			return None;
		}
		let part = self.offsets.partition_point(|&offset| offset <= row) - 1;
		Some((self.parts[part].as_ref(), row - self.offsets[part]))
	}

	fn part(&self, row: usize) -> Result<(&ValueVectorRef, usize)> {
		match self.locate(row) {
			None => Err(VectorError::RowOutOfBounds {
				row,
				len: self.len(),
			}
			.into()),
			Some((None, _)) => Err(VectorError::NullValue {
				row,
			}
			.into()),
			Some((Some(vector), local)) => Ok((vector, local)),
		}
	}
}

macro_rules! delegate {
	($($name:ident -> $t:ty;)*) => {
		$(fn $name(&self, row: usize) -> Result<$t> {
			let (vector, local) = self.part(row)?;
			vector.$name(local)
		})*
	};
}

impl ValueVector for ChainedValueVector {
	fn ty(&self) -> &ResolvedType {
		&self.ty
	}

	fn len(&self) -> usize {
		self.offsets.last().copied().unwrap_or(0)
	}

	fn is_null(&self, row: usize) -> bool {
		match self.locate(row) {
			Some((Some(vector), local)) => vector.is_null(local),
			_ => true,
		}
	}

	fn get_any(&self, row: usize) -> Value {
		match self.locate(row) {
			Some((Some(vector), local)) => vector.get_any(local),
			_ => Value::Null,
		}
	}

	delegate! {
		get_boolean -> bool;
		get_int -> i32;
		get_long -> i64;
		get_float -> f32;
		get_double -> f64;
		get_decimal -> Decimal;
		get_string -> Arc<str>;
		get_datetime -> NaiveDateTime;
		get_datetime_offset -> DateTime<FixedOffset>;
		get_table -> TupleVectorRef;
		get_array -> ValueVectorRef;
		get_object -> Arc<ObjectValue>;
	}
}

#[cfg(test)]
mod tests {
	use quarry_type::Type;

	use super::*;
	use crate::vector::{ColumnData, Columns};

	fn ints(name: &'static str, values: &[i32]) -> TupleVectorRef {
		Columns::new(Schema::of([(name, Type::Int)]), vec![Arc::new(ColumnData::int(values.iter().copied()))])
			.unwrap()
			.into_ref()
	}

	#[test]
	fn test_chain_nothing_is_empty() {
		let result = chain(vec![]).unwrap();
		assert!(Arc::ptr_eq(&result, &empty()));
		assert_eq!(result.row_count(), 0);
	}

	#[test]
	fn test_chain_one_is_identity() {
		let vector = ints("a", &[1, 2]);
		assert!(Arc::ptr_eq(&chain(vec![vector.clone()]).unwrap(), &vector));
	}

	#[test]
	fn test_chain_shares_identical_schema() {
		let schema = Schema::of([("a", Type::Int)]);
		let make = |values: Vec<i32>| {
			Columns::new(schema.clone(), vec![Arc::new(ColumnData::int(values))]).unwrap().into_ref()
		};
		let result = chain(vec![make(vec![1]), make(vec![2, 3])]).unwrap();
		assert!(result.schema().ptr_eq(&schema));
		assert_eq!(result.row_count(), 3);
		assert_eq!(result.column(0).unwrap().get_int(2).unwrap(), 3);
	}

	#[test]
	fn test_chain_incompatible_fails() {
		let err = chain(vec![ints("a", &[1]), ints("b", &[2])]).unwrap_err();
		assert!(err.message().contains("common sub set of columns"));
	}

	#[test]
	fn test_chain_with_empty_schema_fails() {
		let err = chain(vec![ints("a", &[1]), Columns::with_row_count(2).into_ref()]).unwrap_err();
		assert!(err.message().contains("common sub set of columns"));
	}

	#[test]
	fn test_chain_skips_empty_parts() {
		let result = chain(vec![ints("a", &[]), ints("a", &[5]), ints("a", &[])]).unwrap();
		assert_eq!(result.row_count(), 1);
		assert_eq!(result.column(0).unwrap().get_int(0).unwrap(), 5);
	}
}
