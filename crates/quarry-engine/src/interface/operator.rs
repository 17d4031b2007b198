// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::VecDeque;

use quarry_core::{Column, Schema, TupleVectorRef, ValueVectorRef, vector::Columns};
use quarry_type::Result;
use tracing::{debug, instrument};

use crate::{
	error::EvalError,
	evaluate::{Evaluator, ExecutionContext},
	interface::output::{OutputWriter, emit_rows, visible_columns},
};

/// A pull-based source of tuple batches. A consumer stops an operator by no
/// longer pulling from it.
pub trait Operator: Send {
	fn schema(&self) -> Schema;

	/// The next batch, or `None` once the operator is exhausted.
	fn next_batch(&mut self, ctx: &ExecutionContext) -> Result<Option<TupleVectorRef>>;
}

/// Yields prepared batches in order.
#[derive(Debug)]
pub struct VectorOperator {
	schema: Schema,
	batches: VecDeque<TupleVectorRef>,
}

impl VectorOperator {
	pub fn new(schema: Schema, batches: impl IntoIterator<Item = TupleVectorRef>) -> Self {
		Self {
			schema,
			batches: batches.into_iter().collect(),
		}
	}
}

impl Operator for VectorOperator {
	fn schema(&self) -> Schema {
		self.schema.clone()
	}

	fn next_batch(&mut self, _ctx: &ExecutionContext) -> Result<Option<TupleVectorRef>> {
		Ok(self.batches.pop_front())
	}
}

/// Keeps the rows of each input batch for which the predicate is true.
/// Batches without matching rows are skipped.
pub struct FilterOperator {
	input: Box<dyn Operator>,
	predicate: Evaluator,
}

impl FilterOperator {
	pub fn new(input: Box<dyn Operator>, predicate: Evaluator) -> Self {
		Self {
			input,
			predicate,
		}
	}
}

impl Operator for FilterOperator {
	fn schema(&self) -> Schema {
		self.input.schema()
	}

	fn next_batch(&mut self, ctx: &ExecutionContext) -> Result<Option<TupleVectorRef>> {
		while let Some(batch) = self.input.next_batch(ctx)? {
			let filtered = self.predicate.filter(ctx, &batch)?;
			if filtered.row_count() > 0 {
				return Ok(Some(filtered));
			}
		}
		Ok(None)
	}
}

/// Evaluates one expression per output column over each input batch.
pub struct ProjectOperator {
	input: Box<dyn Operator>,
	schema: Schema,
	projections: Vec<Evaluator>,
}

impl ProjectOperator {
	pub fn new(input: Box<dyn Operator>, projections: Vec<(Column, Evaluator)>) -> Self {
		let (columns, projections): (Vec<_>, Vec<_>) = projections.into_iter().unzip();
		Self {
			input,
			schema: Schema::new(columns),
			projections,
		}
	}
}

impl Operator for ProjectOperator {
	fn schema(&self) -> Schema {
		self.schema.clone()
	}

	fn next_batch(&mut self, ctx: &ExecutionContext) -> Result<Option<TupleVectorRef>> {
		let Some(batch) = self.input.next_batch(ctx)? else {
			return Ok(None);
		};
		let vectors = self
			.projections
			.iter()
			.map(|projection| projection.eval_vector(ctx, &batch))
			.collect::<Result<Vec<ValueVectorRef>>>()?;
		Ok(Some(Columns::new(self.schema.clone(), vectors)?.into_ref()))
	}
}

/// Pulls every batch of `operator` into `writer`, polling the session abort
/// flag before each pull. Returns the number of rows written.
#[instrument(name = "engine::operator::drain", level = "debug", skip_all)]
pub fn drain(operator: &mut dyn Operator, ctx: &ExecutionContext, writer: &mut dyn OutputWriter) -> Result<usize> {
	let schema = operator.schema();
	writer.init_result(&visible_columns(&schema))?;
	let mut rows = 0;
	let mut batches = 0;
	loop {
		if ctx.is_aborted() {
			debug!(rows, batches, "aborted");
			return Err(EvalError::Aborted.into());
		}
		let Some(batch) = operator.next_batch(ctx)? else {
			break;
		};
		rows += emit_rows(writer, batch.as_ref())?;
		batches += 1;
	}
	writer.end_result()?;
	debug!(rows, batches, "drained");
	Ok(rows)
}
