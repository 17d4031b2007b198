// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Tree-walking evaluation against a per-row context.

use std::sync::Arc;

use quarry_core::{
	Value,
	value::math::{self, arithmetic, compare, in_value, negate, truth},
};
use quarry_type::{Result, error::LogicalOp};

use crate::{
	error::EvalError,
	evaluate::{
		ExecutionContext,
		lambda::{self, LambdaBody},
	},
	expression::{Builtin, ColumnExpression, Expression},
};

pub fn evaluate(expression: &Expression, ctx: &ExecutionContext) -> Result<Value> {
	match expression {
		Expression::Literal(value) => Ok(value.clone()),
		Expression::Column(column) => column_value(column, ctx),
		Expression::Arithmetic {
			operator,
			left,
			right,
		} => arithmetic(*operator, &evaluate(left, ctx)?, &evaluate(right, ctx)?),
		Expression::Negate(expression) => negate(&evaluate(expression, ctx)?),
		Expression::Comparison {
			operator,
			left,
			right,
		} => compare(*operator, &evaluate(left, ctx)?, &evaluate(right, ctx)?),
		Expression::And(left, right) => and(&evaluate(left, ctx)?, || evaluate(right, ctx)),
		Expression::Or(left, right) => or(&evaluate(left, ctx)?, || evaluate(right, ctx)),
		Expression::Not(expression) => math::not(&evaluate(expression, ctx)?),
		Expression::IsNull {
			expression,
			negated,
		} => Ok(Value::Boolean(evaluate(expression, ctx)?.is_null() != *negated)),
		Expression::In {
			expression,
			list,
			negated,
		} => in_list(&evaluate(expression, ctx)?, list.iter().map(|item| evaluate(item, ctx)), *negated),
		Expression::Builtin {
			function: Builtin::Concat,
			arguments,
		} => Ok(lambda::concat(arguments.iter().map(|argument| evaluate(argument, ctx)).collect::<Result<_>>()?)),
		Expression::Builtin {
			function,
			arguments,
		} => {
			let [input, Expression::Lambda { parameter, body }] = arguments.as_slice() else {
				return Err(EvalError::ExpectedLambda {
					function: function.to_string(),
					position: 2,
				}
				.into());
			};
			let input = evaluate(input, ctx)?;
			let body = Arc::new(InterpretedLambda {
				parameter: parameter.clone(),
				body: body.clone(),
			});
			lambda::apply(*function, ctx, input, body)
		}
		Expression::Lambda {
			parameter,
			..
		} => Err(EvalError::UnboundLambda {
			parameter: parameter.to_string(),
		}
		.into()),
		Expression::Call {
			function,
			arguments,
		} => {
			let arguments = arguments.iter().map(|argument| evaluate(argument, ctx)).collect::<Result<Vec<_>>>()?;
			function.invoke(ctx, &arguments)
		}
	}
}

/// Bare identifiers resolve to a lambda parameter in scope before a column.
fn column_value(column: &ColumnExpression, ctx: &ExecutionContext) -> Result<Value> {
	if column.ordinal.is_none() {
		if let Some(value) = ctx.lookup(&column.name) {
			return Ok(value.clone());
		}
	}
	ctx.column_value(column.ordinal, &column.name, column.index)
}

struct InterpretedLambda {
	parameter: Arc<str>,
	body: Arc<Expression>,
}

impl LambdaBody for InterpretedLambda {
	fn invoke(&self, ctx: &ExecutionContext, argument: Value) -> Result<Value> {
		evaluate(&self.body, &ctx.bind(self.parameter.clone(), argument))
	}
}

/// Three-valued AND. The right operand is only evaluated when the left one
/// is not false.
pub(crate) fn and(left: &Value, right: impl FnOnce() -> Result<Value>) -> Result<Value> {
	let left = truth(LogicalOp::And, left)?;
	if left == Some(false) {
		return Ok(Value::Boolean(false));
	}
	let right = truth(LogicalOp::And, &right()?)?;
	Ok(match (left, right) {
		(_, Some(false)) => Value::Boolean(false),
		(Some(true), Some(true)) => Value::Boolean(true),
		_ => Value::Null,
	})
}

/// Three-valued OR. The right operand is only evaluated when the left one
/// is not true.
pub(crate) fn or(left: &Value, right: impl FnOnce() -> Result<Value>) -> Result<Value> {
	let left = truth(LogicalOp::Or, left)?;
	if left == Some(true) {
		return Ok(Value::Boolean(true));
	}
	let right = truth(LogicalOp::Or, &right()?)?;
	Ok(match (left, right) {
		(_, Some(true)) => Value::Boolean(true),
		(Some(false), Some(false)) => Value::Boolean(false),
		_ => Value::Null,
	})
}

/// A null candidate yields null. List items are evaluated until one matches.
pub(crate) fn in_list(
	candidate: &Value,
	items: impl Iterator<Item = Result<Value>>,
	negated: bool,
) -> Result<Value> {
	if candidate.is_null() {
		return Ok(Value::Null);
	}
	for item in items {
		if in_value(candidate, &item?)? {
			return Ok(Value::Boolean(!negated));
		}
	}
	Ok(Value::Boolean(negated))
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use quarry_core::{
		Schema, Type, ValueVectorRef,
		vector::{ColumnData, Columns},
	};

	use super::*;

	fn people() -> ExecutionContext {
		let tuple = Columns::new(
			Schema::of([("name", Type::String), ("age", Type::Int)]),
			vec![
				Arc::new(ColumnData::string(["ann", "bob"])) as ValueVectorRef,
				Arc::new(ColumnData::int_optional([Some(31), None])),
			],
		)
		.unwrap()
		.into_ref();
		ExecutionContext::new().with_tuple(tuple)
	}

	#[test]
	fn test_column_and_arithmetic() {
		let ctx = people();
		let expression = Expression::add(Expression::column("age"), Expression::literal(1));
		assert_eq!(evaluate(&expression, &ctx).unwrap(), Value::Int(32));
		assert_eq!(evaluate(&expression, &ctx.at_row(1)).unwrap(), Value::Null);
	}

	#[test]
	fn test_three_valued_logic() {
		let null = Expression::null();
		let t = Expression::literal(true);
		let f = Expression::literal(false);
		let ctx = ExecutionContext::new();
		let eval = |e: Expression| evaluate(&e, &ctx).unwrap();

		assert_eq!(eval(Expression::and(null.clone(), f.clone())), Value::Boolean(false));
		assert_eq!(eval(Expression::and(null.clone(), t.clone())), Value::Null);
		assert_eq!(eval(Expression::or(null.clone(), t.clone())), Value::Boolean(true));
		assert_eq!(eval(Expression::or(null.clone(), f.clone())), Value::Null);
		assert_eq!(eval(Expression::not(null)), Value::Null);
	}

	#[test]
	fn test_and_short_circuits() {
		let failing = Expression::add(Expression::literal(true), Expression::literal(1));
		let expression = Expression::and(Expression::literal(false), failing.clone());
		assert_eq!(evaluate(&expression, &ExecutionContext::new()).unwrap(), Value::Boolean(false));

		let expression = Expression::and(Expression::literal(true), failing);
		let err = evaluate(&expression, &ExecutionContext::new()).unwrap_err();
		assert_eq!(err.message(), "Cannot add true and 1");
	}

	#[test]
	fn test_logical_operand_must_be_boolean() {
		let expression = Expression::or(Expression::literal(1), Expression::literal(true));
		assert!(evaluate(&expression, &ExecutionContext::new()).is_err());
	}

	#[test]
	fn test_in_list() {
		let ctx = ExecutionContext::new();
		let list = vec![Expression::literal(1i64), Expression::literal(2.0)];
		let expression = Expression::in_list(Expression::literal(2), list.clone());
		assert_eq!(evaluate(&expression, &ctx).unwrap(), Value::Boolean(true));

		let expression = Expression::in_list(Expression::literal(3), list.clone());
		assert_eq!(evaluate(&expression, &ctx).unwrap(), Value::Boolean(false));

		let expression = Expression::in_list(Expression::null(), list);
		assert_eq!(evaluate(&expression, &ctx).unwrap(), Value::Null);
	}

	#[test]
	fn test_lambda_parameter_shadows_column() {
		let ctx = people();
		let expression = Expression::builtin(
			Builtin::Map,
			vec![
				Expression::literal(Value::list([Value::from("x"), Value::from("y")])),
				Expression::lambda("name", Expression::add(Expression::column("name"), Expression::column("age"))),
			],
		);
		let Value::Sequence(sequence) = evaluate(&expression, &ctx).unwrap() else {
			panic!("expected a sequence");
		};
		assert_eq!(sequence.collect().unwrap(), vec![Value::from("x31"), Value::from("y31")]);
	}

	#[test]
	fn test_nested_lambdas() {
		// flatmap([1, 2], x -> map([10, 20], y -> x * y))
		let expression = Expression::builtin(
			Builtin::FlatMap,
			vec![
				Expression::literal(Value::list([Value::Int(1), Value::Int(2)])),
				Expression::lambda(
					"x",
					Expression::builtin(
						Builtin::Map,
						vec![
							Expression::literal(Value::list([Value::Int(10), Value::Int(20)])),
							Expression::lambda("y", Expression::multiply(Expression::column("x"), Expression::column("y"))),
						],
					),
				),
			],
		);
		let Value::Sequence(sequence) = evaluate(&expression, &ExecutionContext::new()).unwrap() else {
			panic!("expected a sequence");
		};
		assert_eq!(
			sequence.collect().unwrap(),
			vec![Value::Int(10), Value::Int(20), Value::Int(20), Value::Int(40)]
		);
	}
}
