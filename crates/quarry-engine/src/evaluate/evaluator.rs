// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use quarry_core::{
	TupleVectorRef, Value, ValueVectorRef,
	value::{hash::hash_values, math},
	vector::{ColumnData, SelectedTupleVector, SelectionVector},
};
use quarry_type::Result;
use tracing::{debug, instrument};

use crate::{
	config::EngineConfig,
	error::{CompileError, EvalError},
	evaluate::{
		ExecutionContext,
		compiled::{CompiledExpression, compile_expression},
		interpret::evaluate,
	},
	expression::Expression,
};

/// One expression, evaluated either by walking the tree or by a compiled
/// closure. Both strategies produce the same results.
#[derive(Debug, Clone)]
pub enum Evaluator {
	Interpreted(Arc<Expression>),
	Compiled(Arc<CompiledExpression>),
}

impl Evaluator {
	/// Validates `expression` and compiles it unless compilation is disabled.
	/// Expressions the compiler does not support are interpreted.
	#[instrument(name = "engine::evaluate::build", level = "debug", skip_all, fields(expression = %expression))]
	pub fn build(expression: &Expression, config: &EngineConfig) -> Result<Self> {
		expression.validate()?;
		if !config.compile_expressions {
			return Ok(Self::interpreted(expression.clone()));
		}
		match compile_expression(expression) {
			Ok(compiled) => Ok(Evaluator::Compiled(Arc::new(compiled))),
			Err(CompileError::NotImplemented {
				feature,
			}) => {
				debug!(%feature, "compiled evaluation unavailable, interpreting");
				Ok(Self::interpreted(expression.clone()))
			}
			Err(CompileError::Failed(err)) => Err(err),
		}
	}

	pub fn interpreted(expression: Expression) -> Self {
		Evaluator::Interpreted(Arc::new(expression))
	}

	pub fn is_compiled(&self) -> bool {
		matches!(self, Evaluator::Compiled(_))
	}

	pub fn eval(&self, ctx: &ExecutionContext) -> Result<Value> {
		match self {
			Evaluator::Interpreted(expression) => evaluate(expression, ctx),
			Evaluator::Compiled(compiled) => compiled.execute(ctx),
		}
	}

	fn eval_rows(&self, ctx: &ExecutionContext, tuple: &TupleVectorRef) -> Result<Vec<Value>> {
		let mut row_ctx = ctx.clone().with_tuple(tuple.clone());
		let mut values = Vec::with_capacity(tuple.row_count());
		for row in 0..tuple.row_count() {
			row_ctx.set_row(row);
			values.push(self.eval(&row_ctx)?);
		}
		Ok(values)
	}

	/// Evaluates every row of `tuple` into one vector.
	pub fn eval_vector(&self, ctx: &ExecutionContext, tuple: &TupleVectorRef) -> Result<ValueVectorRef> {
		Ok(Arc::new(ColumnData::from_values(self.eval_rows(ctx, tuple)?)))
	}

	/// Rows of `tuple` for which the predicate is true. Null counts as not
	/// true; any other non-boolean result fails.
	pub fn eval_predicate(&self, ctx: &ExecutionContext, tuple: &TupleVectorRef) -> Result<SelectionVector> {
		let mut selected = Vec::new();
		for (row, value) in self.eval_rows(ctx, tuple)?.into_iter().enumerate() {
			match value {
				Value::Boolean(true) => selected.push(row),
				Value::Boolean(false) | Value::Null => {}
				other => {
					return Err(EvalError::NonBooleanPredicate {
						value: other.describe(),
					}
					.into());
				}
			}
		}
		Ok(SelectionVector::new(selected))
	}

	/// A zero-copy view of the rows of `tuple` matching the predicate.
	pub fn filter(&self, ctx: &ExecutionContext, tuple: &TupleVectorRef) -> Result<TupleVectorRef> {
		let selection = self.eval_predicate(ctx, tuple)?;
		Ok(Arc::new(SelectedTupleVector::new(tuple.clone(), selection)?) as TupleVectorRef)
	}
}

/// A grouping or join key: the key values and their numeric-aware hash.
#[derive(Debug, Clone)]
pub struct Key {
	pub values: Vec<Value>,
	pub hash: u64,
}

impl Key {
	pub fn new(values: Vec<Value>) -> Self {
		let hash = hash_values(&values);
		Self {
			values,
			hash,
		}
	}

	/// Keys match when every pair of values is numerically equal or both
	/// are null.
	pub fn matches(&self, other: &Key) -> Result<bool> {
		if self.hash != other.hash || self.values.len() != other.values.len() {
			return Ok(false);
		}
		for (left, right) in self.values.iter().zip(other.values.iter()) {
			let equal = match (left.is_null(), right.is_null()) {
				(true, true) => true,
				(false, false) => math::eq(left, right)?,
				_ => false,
			};
			if !equal {
				return Ok(false);
			}
		}
		Ok(true)
	}
}

/// Evaluates the key expressions of a grouping or join.
#[derive(Debug, Clone)]
pub struct KeyExtractor {
	evaluators: Vec<Evaluator>,
}

impl KeyExtractor {
	#[instrument(name = "engine::evaluate::key_extractor", level = "debug", skip_all, fields(keys = expressions.len()))]
	pub fn build(expressions: &[Expression], config: &EngineConfig) -> Result<Self> {
		let evaluators = expressions.iter().map(|expression| Evaluator::build(expression, config)).collect::<Result<_>>()?;
		Ok(Self {
			evaluators,
		})
	}

	pub fn from_evaluators(evaluators: Vec<Evaluator>) -> Self {
		Self {
			evaluators,
		}
	}

	pub fn len(&self) -> usize {
		self.evaluators.len()
	}

	pub fn is_empty(&self) -> bool {
		self.evaluators.is_empty()
	}

	pub fn extract(&self, ctx: &ExecutionContext) -> Result<Key> {
		let values = self.evaluators.iter().map(|evaluator| evaluator.eval(ctx)).collect::<Result<_>>()?;
		Ok(Key::new(values))
	}

	/// One key per row of `tuple`.
	pub fn extract_all(&self, ctx: &ExecutionContext, tuple: &TupleVectorRef) -> Result<Vec<Key>> {
		let mut row_ctx = ctx.clone().with_tuple(tuple.clone());
		(0..tuple.row_count())
			.map(|row| {
				row_ctx.set_row(row);
				self.extract(&row_ctx)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use quarry_core::{Schema, Type, vector::Columns};

	use super::*;

	fn numbers() -> TupleVectorRef {
		Columns::new(
			Schema::of([("n", Type::Int)]),
			vec![Arc::new(ColumnData::int_optional([Some(1), Some(5), None, Some(7)])) as ValueVectorRef],
		)
		.unwrap()
		.into_ref()
	}

	#[test]
	fn test_build_compiles_by_default() {
		let expression = Expression::greater_than(Expression::column("n"), Expression::literal(2));
		assert!(Evaluator::build(&expression, &EngineConfig::default()).unwrap().is_compiled());

		let config = EngineConfig {
			compile_expressions: false,
			..Default::default()
		};
		assert!(!Evaluator::build(&expression, &config).unwrap().is_compiled());
	}

	#[test]
	fn test_eval_predicate_skips_nulls() {
		let expression = Expression::greater_than(Expression::column("n"), Expression::literal(2));
		let evaluator = Evaluator::build(&expression, &EngineConfig::default()).unwrap();
		let selection = evaluator.eval_predicate(&ExecutionContext::new(), &numbers()).unwrap();
		assert_eq!(selection.iter().collect::<Vec<_>>(), vec![1, 3]);

		let filtered = evaluator.filter(&ExecutionContext::new(), &numbers()).unwrap();
		assert_eq!(filtered.row_count(), 2);
		assert_eq!(filtered.column(0).unwrap().get_int(1).unwrap(), 7);
	}

	#[test]
	fn test_non_boolean_predicate_fails() {
		let evaluator = Evaluator::build(&Expression::column("n"), &EngineConfig::default()).unwrap();
		let err = evaluator.eval_predicate(&ExecutionContext::new(), &numbers()).unwrap_err();
		assert_eq!(err.code(), "EVAL_001");
	}

	#[test]
	fn test_eval_vector() {
		let expression = Expression::multiply(Expression::column("n"), Expression::literal(2i64));
		let evaluator = Evaluator::build(&expression, &EngineConfig::default()).unwrap();
		let vector = evaluator.eval_vector(&ExecutionContext::new(), &numbers()).unwrap();
		assert_eq!(vector.ty().ty(), Type::Long);
		assert_eq!(vector.get_long(1).unwrap(), 10);
		assert!(vector.is_null(2));
	}

	#[test]
	fn test_keys_are_numeric_aware() {
		let one = Key::new(vec![Value::Int(1), Value::Null]);
		let one_long = Key::new(vec![Value::Long(1), Value::Null]);
		let two = Key::new(vec![Value::Int(2), Value::Null]);
		assert_eq!(one.hash, one_long.hash);
		assert!(one.matches(&one_long).unwrap());
		assert!(!one.matches(&two).unwrap());
	}

	#[test]
	fn test_extract_all() {
		let extractor = KeyExtractor::build(&[Expression::column("n")], &EngineConfig::default()).unwrap();
		let keys = extractor.extract_all(&ExecutionContext::new(), &numbers()).unwrap();
		assert_eq!(keys.len(), 4);
		assert_eq!(keys[3].values, vec![Value::Int(7)]);
	}
}
