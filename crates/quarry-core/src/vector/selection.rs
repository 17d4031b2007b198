// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Range, sync::Arc};

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use quarry_type::{Decimal, Result};

use crate::{
	error::VectorError,
	schema::{ResolvedType, Schema},
	value::{ObjectValue, Value},
	vector::{TupleVector, TupleVectorRef, ValueVector, ValueVectorRef},
};

/// Maps a logical row to a physical row of a backing vector. Cloning is
/// cheap and shares the indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionVector {
	indices: Arc<[usize]>,
}

impl Default for SelectionVector {
	fn default() -> Self {
		Self::empty()
	}
}

impl SelectionVector {
	pub fn new(indices: Vec<usize>) -> Self {
		Self {
			indices: indices.into(),
		}
	}

	pub fn empty() -> Self {
		Self::new(Vec::new())
	}

	pub fn with_range(range: Range<usize>) -> Self {
		range.collect()
	}

	pub fn get(&self, idx: usize) -> Option<usize> {
		self.indices.get(idx).copied()
	}

	pub fn len(&self) -> usize {
		self.indices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
		self.indices.iter().copied()
	}

	pub fn max_location(&self) -> Option<usize> {
		self.indices.iter().copied().max()
	}

	/// OUT[IDX] = SELF[SELECTION[IDX]]; locations past the end are dropped.
	pub fn select(&self, selection: &SelectionVector) -> Self {
		selection.iter().filter_map(|loc| self.get(loc)).collect()
	}
}

impl FromIterator<usize> for SelectionVector {
	fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

fn validate(selection: &SelectionVector, len: usize) -> Result<()> {
	match selection.max_location() {
		Some(max) if max >= len => Err(VectorError::RowOutOfBounds {
			row: max,
			len,
		}
		.into()),
		_ => Ok(()),
	}
}

/// A zero-copy view of selected rows of a backing value vector.
#[derive(Debug, Clone)]
pub struct SelectedValueVector {
	source: ValueVectorRef,
	selection: SelectionVector,
}

impl SelectedValueVector {
	pub fn new(source: ValueVectorRef, selection: SelectionVector) -> Result<Self> {
		validate(&selection, source.len())?;
		Ok(Self {
			source,
			selection,
		})
	}

	pub fn source(&self) -> &ValueVectorRef {
		&self.source
	}

	pub fn selection(&self) -> &SelectionVector {
		&self.selection
	}

	fn physical(&self, row: usize) -> Result<usize> {
		self.selection.get(row).ok_or_else(|| {
			VectorError::RowOutOfBounds {
				row,
				len: self.selection.len(),
			}
			.into()
		})
	}
}

macro_rules! forward {
	($($name:ident -> $t:ty;)*) => {
		$(fn $name(&self, row: usize) -> Result<$t> {
			self.source.$name(self.physical(row)?)
		})*
	};
}

impl ValueVector for SelectedValueVector {
	fn ty(&self) -> &ResolvedType {
		self.source.ty()
	}

	fn len(&self) -> usize {
		self.selection.len()
	}

	fn is_null(&self, row: usize) -> bool {
		self.selection.get(row).is_none_or(|physical| self.source.is_null(physical))
	}

	fn get_any(&self, row: usize) -> Value {
		self.selection.get(row).map(|physical| self.source.get_any(physical)).unwrap_or(Value::Null)
	}

	forward! {
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

/// A zero-copy view of selected rows of a backing tuple vector.
#[derive(Debug, Clone)]
pub struct SelectedTupleVector {
	source: TupleVectorRef,
	selection: SelectionVector,
	columns: Vec<ValueVectorRef>,
}

impl SelectedTupleVector {
	pub fn new(source: TupleVectorRef, selection: SelectionVector) -> Result<Self> {
		validate(&selection, source.row_count())?;
		let columns = (0..source.schema().len())
			.filter_map(|index| source.column(index))
			.map(|column| {
				Arc::new(SelectedValueVector {
					source: column,
					selection: selection.clone(),
				}) as ValueVectorRef
			})
			.collect();
		Ok(Self {
			source,
			selection,
			columns,
		})
	}

	pub fn source(&self) -> &TupleVectorRef {
		&self.source
	}

	pub fn selection(&self) -> &SelectionVector {
		&self.selection
	}
}

impl TupleVector for SelectedTupleVector {
	fn schema(&self) -> &Schema {
		self.source.schema()
	}

	fn row_count(&self) -> usize {
		self.selection.len()
	}

	fn column(&self, index: usize) -> Option<ValueVectorRef> {
		self.columns.get(index).cloned()
	}
}
