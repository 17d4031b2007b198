// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use quarry_core::{
	Schema, TupleVectorRef, Type, Value, ValueVectorRef,
	value::math::ComparisonOp,
	vector::{ColumnData, Columns},
};
use quarry_engine::{
	Builtin, EngineConfig, Evaluator, ExecutionContext, Expression, Result, ScalarFunction, TupleRow,
	error::CompileError,
	expression::CompiledFunction,
};
use quarry_type::{Decimal, error::BinaryOp};

fn fixture() -> TupleVectorRef {
	Columns::new(
		Schema::of([("i", Type::Int), ("l", Type::Long), ("d", Type::Double), ("s", Type::String), ("tags", Type::Any)]),
		vec![
			Arc::new(ColumnData::int_optional([Some(1), Some(-4), None, Some(7)])) as ValueVectorRef,
			Arc::new(ColumnData::long_optional([Some(10), None, Some(30), Some(-2)])),
			Arc::new(ColumnData::double_optional([Some(0.5), Some(2.0), Some(-1.25), None])),
			Arc::new(ColumnData::string_optional([Some("a"), Some("bb"), None, Some("a")])),
			Arc::new(ColumnData::any([
				Value::list([Value::Int(1), Value::Int(2)]),
				Value::list([]),
				Value::Null,
				Value::list([Value::Int(7), Value::Null, Value::Int(9)]),
			])),
		],
	)
	.unwrap()
	.into_ref()
}

fn col(name: &str) -> Expression {
	Expression::column(name)
}

fn lit(value: impl Into<Value>) -> Expression {
	Expression::literal(value)
}

fn lambda(parameter: &str, body: Expression) -> Expression {
	Expression::lambda(parameter, body)
}

/// Sequences are compared by their elements.
fn materialize(result: Result<Value>) -> std::result::Result<Vec<Value>, String> {
	match result {
		Ok(Value::Sequence(sequence)) => sequence.collect().map_err(|err| err.code().to_string()),
		Ok(value) => Ok(vec![value]),
		Err(err) => Err(err.code().to_string()),
	}
}

fn assert_agree(expression: Expression) {
	let interpreted = Evaluator::build(
		&expression,
		&EngineConfig {
			compile_expressions: false,
			..Default::default()
		},
	)
	.unwrap();
	let compiled = Evaluator::build(&expression, &EngineConfig::default()).unwrap();
	assert!(compiled.is_compiled(), "{} did not compile", expression);

	let tuple = fixture();
	let ctx = ExecutionContext::new().with_tuple(tuple.clone());
	for row in 0..tuple.row_count() {
		let ctx = ctx.at_row(row);
		assert_eq!(
			materialize(interpreted.eval(&ctx)),
			materialize(compiled.eval(&ctx)),
			"{} disagrees at row {}",
			expression,
			row
		);
	}
}

#[test]
fn test_literals_and_columns() {
	assert_agree(lit(1));
	assert_agree(lit(Value::Decimal(Decimal::parse("1.10").unwrap())));
	assert_agree(Expression::null());
	assert_agree(col("s"));
	assert_agree(col("missing"));
}

#[test]
fn test_arithmetic() {
	for operator in [BinaryOp::Add, BinaryOp::Subtract, BinaryOp::Multiply, BinaryOp::Divide, BinaryOp::Modulo] {
		assert_agree(Expression::arithmetic(operator, col("i"), col("l")));
		assert_agree(Expression::arithmetic(operator, col("d"), col("i")));
		assert_agree(Expression::arithmetic(operator, col("i"), lit(0)));
	}
	assert_agree(Expression::add(col("s"), col("i")));
	assert_agree(Expression::add(lit(true), col("i")));
	assert_agree(Expression::Negate(Box::new(col("l"))));
	assert_agree(Expression::Negate(Box::new(lit(i32::MIN))));
}

#[test]
fn test_comparisons() {
	for operator in [
		ComparisonOp::Equal,
		ComparisonOp::NotEqual,
		ComparisonOp::LessThan,
		ComparisonOp::LessThanOrEqual,
		ComparisonOp::GreaterThan,
		ComparisonOp::GreaterThanOrEqual,
	] {
		assert_agree(Expression::comparison(operator, col("i"), col("d")));
		assert_agree(Expression::comparison(operator, col("s"), lit("a")));
	}
	assert_agree(Expression::equal(col("d"), col("s")));
}

#[test]
fn test_logic() {
	let positive = Expression::greater_than(col("i"), lit(0));
	let small = Expression::comparison(ComparisonOp::LessThan, col("l"), lit(20i64));
	assert_agree(Expression::and(positive.clone(), small.clone()));
	assert_agree(Expression::or(positive.clone(), small.clone()));
	assert_agree(Expression::not(positive));
	assert_agree(Expression::and(lit(false), Expression::add(lit(true), lit(1))));
	assert_agree(Expression::or(col("i"), lit(true)));
}

#[test]
fn test_is_null_and_in() {
	assert_agree(Expression::is_null(col("i")));
	assert_agree(Expression::IsNull {
		expression: Box::new(col("s")),
		negated: true,
	});
	assert_agree(Expression::in_list(col("i"), vec![lit(1i64), lit(7.0), Expression::null()]));
	assert_agree(Expression::In {
		expression: Box::new(col("i")),
		list: vec![col("tags")],
		negated: true,
	});
}

#[test]
fn test_higher_order_functions() {
	let above_one = || lambda("x", Expression::greater_than(col("x"), lit(1)));
	for function in [Builtin::Filter, Builtin::Any, Builtin::All, Builtin::None] {
		assert_agree(Expression::builtin(function, vec![col("tags"), above_one()]));
	}
	assert_agree(Expression::builtin(
		Builtin::Map,
		vec![col("tags"), lambda("x", Expression::add(col("x"), col("i")))],
	));
	assert_agree(Expression::builtin(
		Builtin::FlatMap,
		vec![
			col("tags"),
			lambda(
				"x",
				Expression::builtin(
					Builtin::Map,
					vec![col("tags"), lambda("y", Expression::multiply(col("x"), col("y")))],
				),
			),
		],
	));
	// map(filter(tags, x -> x > 1), x -> x * 10)
	assert_agree(Expression::builtin(
		Builtin::Map,
		vec![
			Expression::builtin(Builtin::Filter, vec![col("tags"), above_one()]),
			lambda("x", Expression::multiply(col("x"), lit(10))),
		],
	));
	assert_agree(Expression::builtin(Builtin::Any, vec![col("s"), lambda("x", Expression::equal(col("x"), lit("a")))]));
	assert_agree(Expression::builtin(Builtin::Any, vec![col("tags"), lambda("x", col("x"))]));
}

#[test]
fn test_concat() {
	assert_agree(Expression::builtin(Builtin::Concat, vec![col("s"), lit("-"), col("i")]));
	assert_agree(Expression::builtin(Builtin::Concat, vec![col("tags"), col("i"), col("tags")]));
	assert_agree(Expression::builtin(Builtin::Concat, vec![Expression::null()]));
}

#[derive(Debug)]
struct Twice;

impl ScalarFunction for Twice {
	fn name(&self) -> &str {
		"twice"
	}

	fn invoke(&self, _ctx: &ExecutionContext, arguments: &[Value]) -> Result<Value> {
		quarry_core::value::math::multiply(&arguments[0], &Value::Int(2))
	}

	fn compile(&self) -> std::result::Result<CompiledFunction, CompileError> {
		Ok(Arc::new(|_ctx: &ExecutionContext, arguments: &[Value]| {
			quarry_core::value::math::multiply(&arguments[0], &Value::Int(2))
		}))
	}
}

#[test]
fn test_compilable_scalar_function() {
	assert_agree(Expression::call(Arc::new(Twice), vec![col("l")]));
}

#[test]
fn test_ordinal_addressing() {
	let left = fixture();
	let right = Columns::new(
		Schema::of([("i", Type::Int)]),
		vec![Arc::new(ColumnData::int([100, 200])) as ValueVectorRef],
	)
	.unwrap()
	.into_ref();
	let mut tuple_row = TupleRow::new(3);
	tuple_row.set(1, left, 3);
	tuple_row.set(2, right, 1);
	let ctx = ExecutionContext::new().with_tuple_row(tuple_row);

	let expression = Expression::add(Expression::column_at(1, "i"), Expression::column_at(2, "i"));
	for config in [EngineConfig::default(), EngineConfig { compile_expressions: false, ..Default::default() }] {
		let evaluator = Evaluator::build(&expression, &config).unwrap();
		assert_eq!(evaluator.eval(&ctx).unwrap(), Value::Int(207));
	}

	let unbound = Evaluator::build(&Expression::column_at(0, "i"), &EngineConfig::default()).unwrap();
	assert_eq!(unbound.eval(&ctx).unwrap_err().code(), "EVAL_002");
}
