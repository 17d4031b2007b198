// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use quarry_type::Result;

use crate::{
	error::VectorError,
	schema::Schema,
	vector::{TupleVector, TupleVectorRef, ValueVectorRef},
};

/// A tuple vector of independent value vectors, one per schema column.
#[derive(Debug, Clone)]
pub struct Columns {
	schema: Schema,
	columns: Vec<ValueVectorRef>,
	row_count: usize,
}

impl Columns {
	/// Fails when the vector count differs from the schema or the vectors
	/// disagree on row count.
	pub fn new(schema: Schema, columns: Vec<ValueVectorRef>) -> Result<Self> {
		if schema.len() != columns.len() {
			return Err(VectorError::ColumnCountMismatch {
				schema: schema.len(),
				vectors: columns.len(),
			}
			.into());
		}
		let row_count = columns.first().map(|c| c.len()).unwrap_or(0);
		for (column, vector) in schema.iter().zip(columns.iter()) {
			if vector.len() != row_count {
				return Err(VectorError::RowCountMismatch {
					column: column.name().to_string(),
					expected: row_count,
					actual: vector.len(),
				}
				.into());
			}
		}
		Ok(Self {
			schema,
			columns,
			row_count,
		})
	}

	/// A schema-less vector that only carries a row count.
	pub fn with_row_count(row_count: usize) -> Self {
		Self {
			schema: Schema::empty(),
			columns: Vec::new(),
			row_count,
		}
	}

	pub fn empty() -> Self {
		Self::with_row_count(0)
	}

	pub fn into_ref(self) -> TupleVectorRef {
		Arc::new(self)
	}
}

impl TupleVector for Columns {
	fn schema(&self) -> &Schema {
		&self.schema
	}

	fn row_count(&self) -> usize {
		self.row_count
	}

	fn column(&self, index: usize) -> Option<ValueVectorRef> {
		self.columns.get(index).cloned()
	}
}
