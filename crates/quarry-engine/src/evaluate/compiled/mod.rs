// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Expressions compiled ahead of execution into closure trees.

use std::sync::Arc;

use quarry_core::{
	Value,
	value::math::{arithmetic, compare, negate, not},
};
use quarry_type::{Error, Result, internal_error};
use tracing::instrument;

use crate::{
	error::{CompileError, EvalError},
	evaluate::{
		ExecutionContext,
		interpret::{and, in_list, or},
		lambda::{self, LambdaBody},
	},
	expression::{Builtin, CompiledFunction, Expression},
};

pub mod context;
pub mod expr;

pub use context::{Captures, GenerationContext};
pub use expr::{CompiledExpression, CompiledFn};

/// Compiles `expression` with a fresh generation context.
#[instrument(name = "engine::compiled::compile_expression", level = "trace", skip_all)]
pub fn compile_expression(expression: &Expression) -> std::result::Result<CompiledExpression, CompileError> {
	let mut generation = GenerationContext::new();
	let root = compile(expression, &mut generation)?;
	Ok(CompiledExpression::new(root, generation.into_captures(), Arc::from(expression.to_string())))
}

fn closure(f: impl Fn(&Captures, &ExecutionContext) -> Result<Value> + Send + Sync + 'static) -> CompiledFn {
	Arc::new(f)
}

fn compile_all(
	expressions: &[Expression],
	generation: &mut GenerationContext,
) -> std::result::Result<Arc<[CompiledFn]>, CompileError> {
	expressions.iter().map(|expression| compile(expression, generation)).collect()
}

fn evaluate_all(functions: &[CompiledFn], captures: &Captures, ctx: &ExecutionContext) -> Result<Vec<Value>> {
	functions.iter().map(|function| function(captures, ctx)).collect()
}

pub fn compile(
	expression: &Expression,
	generation: &mut GenerationContext,
) -> std::result::Result<CompiledFn, CompileError> {
	Ok(match expression {
		Expression::Literal(value) => {
			let index = generation.capture("literal", value.clone());
			closure(move |captures, _| Ok(captures.get::<Value>(index)?.clone()))
		}
		Expression::Column(column) => match column.ordinal {
			None => match generation.resolve_lambda(&column.name) {
				Some(distance) => closure(move |_, ctx| {
					ctx.binding_at(distance).cloned().ok_or_else(|| {
						Error::new(internal_error!("no lambda binding {} levels out", distance))
					})
				}),
				None => {
					let column = column.clone();
					closure(move |_, ctx| ctx.column_value(None, &column.name, column.index))
				}
			},
			Some(ordinal) => {
				let column = column.clone();
				closure(move |_, ctx| ctx.column_value(Some(ordinal), &column.name, column.index))
			}
		},
		Expression::Arithmetic {
			operator,
			left,
			right,
		} => {
			let operator = *operator;
			let left = compile(left, generation)?;
			let right = compile(right, generation)?;
			closure(move |captures, ctx| arithmetic(operator, &left(captures, ctx)?, &right(captures, ctx)?))
		}
		Expression::Negate(expression) => {
			let inner = compile(expression, generation)?;
			closure(move |captures, ctx| negate(&inner(captures, ctx)?))
		}
		Expression::Comparison {
			operator,
			left,
			right,
		} => {
			let operator = *operator;
			let left = compile(left, generation)?;
			let right = compile(right, generation)?;
			closure(move |captures, ctx| compare(operator, &left(captures, ctx)?, &right(captures, ctx)?))
		}
		Expression::And(left, right) => {
			let left = compile(left, generation)?;
			let right = compile(right, generation)?;
			closure(move |captures, ctx| and(&left(captures, ctx)?, || right(captures, ctx)))
		}
		Expression::Or(left, right) => {
			let left = compile(left, generation)?;
			let right = compile(right, generation)?;
			closure(move |captures, ctx| or(&left(captures, ctx)?, || right(captures, ctx)))
		}
		Expression::Not(expression) => {
			let inner = compile(expression, generation)?;
			closure(move |captures, ctx| not(&inner(captures, ctx)?))
		}
		Expression::IsNull {
			expression,
			negated,
		} => {
			let negated = *negated;
			let inner = compile(expression, generation)?;
			closure(move |captures, ctx| Ok(Value::Boolean(inner(captures, ctx)?.is_null() != negated)))
		}
		Expression::In {
			expression,
			list,
			negated,
		} => {
			let negated = *negated;
			let candidate = compile(expression, generation)?;
			let list = compile_all(list, generation)?;
			closure(move |captures, ctx| {
				in_list(&candidate(captures, ctx)?, list.iter().map(|item| item(captures, ctx)), negated)
			})
		}
		Expression::Builtin {
			function: Builtin::Concat,
			arguments,
		} => {
			let arguments = compile_all(arguments, generation)?;
			closure(move |captures, ctx| Ok(lambda::concat(evaluate_all(&arguments, captures, ctx)?)))
		}
		Expression::Builtin {
			function,
			arguments,
		} => {
			let function = *function;
			let [input, Expression::Lambda { parameter, body }] = arguments.as_slice() else {
				return Err(EvalError::ExpectedLambda {
					function: function.to_string(),
					position: 2,
				}
				.into());
			};
			let input = compile(input, generation)?;
			let parameter = parameter.clone();
			generation.push_lambda(parameter.clone());
			let body = compile(body, generation);
			generation.pop_lambda();
			let body = body?;
			closure(move |captures, ctx| {
				let input = input(captures, ctx)?;
				let lambda = Arc::new(CompiledLambda {
					parameter: parameter.clone(),
					body: body.clone(),
					captures: captures.clone(),
				});
				lambda::apply(function, ctx, input, lambda)
			})
		}
		Expression::Lambda {
			parameter,
			..
		} => {
			return Err(EvalError::UnboundLambda {
				parameter: parameter.to_string(),
			}
			.into());
		}
		Expression::Call {
			function,
			arguments,
		} => {
			let compiled = function.compile()?;
			let index = generation.capture("function", compiled);
			let arguments = compile_all(arguments, generation)?;
			closure(move |captures, ctx| {
				let values = evaluate_all(&arguments, captures, ctx)?;
				let function = captures.get::<CompiledFunction>(index)?;
				function(ctx, &values)
			})
		}
	})
}

struct CompiledLambda {
	parameter: Arc<str>,
	body: CompiledFn,
	captures: Captures,
}

impl LambdaBody for CompiledLambda {
	fn invoke(&self, ctx: &ExecutionContext, argument: Value) -> Result<Value> {
		(self.body)(&self.captures, &ctx.bind(self.parameter.clone(), argument))
	}
}
