// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Higher-order builtins shared by both evaluation strategies. Only the
//! lambda body differs: interpreted bodies walk the expression, compiled
//! bodies call a closure.

use std::{iter, sync::Arc};

use quarry_core::{
	Sequence, SequenceSource, Value,
	value::{ValueIter, elements},
};
use quarry_type::Result;

use crate::{error::EvalError, evaluate::ExecutionContext, expression::Builtin};

pub trait LambdaBody: Send + Sync {
	/// Evaluates the body with the parameter bound in a child of `ctx`.
	fn invoke(&self, ctx: &ExecutionContext, argument: Value) -> Result<Value>;
}

/// Elements of `input`; a value that is not sequence-like is its own
/// single element.
fn items(input: &Value) -> ValueIter<'_> {
	match elements(input) {
		Some(items) => items,
		None => Box::new(iter::once(Ok(input.clone()))),
	}
}

struct Apply {
	function: Builtin,
	input: Value,
	lambda: Arc<dyn LambdaBody>,
	ctx: ExecutionContext,
}

impl SequenceSource for Apply {
	fn iter(&self) -> ValueIter<'_> {
		let lambda = &self.lambda;
		let ctx = &self.ctx;
		match self.function {
			Builtin::Filter => Box::new(items(&self.input).filter_map(move |item| {
				let item = match item {
					Ok(item) => item,
					Err(err) => return Some(Err(err)),
				};
				match lambda.invoke(ctx, item.clone()) {
					Ok(Value::Boolean(true)) => Some(Ok(item)),
					Ok(Value::Boolean(false)) | Ok(Value::Null) => None,
					Ok(other) => Some(Err(EvalError::NonBooleanLambdaResult {
						function: Builtin::Filter.to_string(),
						value: other.describe(),
					}
					.into())),
					Err(err) => Some(Err(err)),
				}
			})),
			Builtin::FlatMap => Box::new(items(&self.input).flat_map(move |item| -> ValueIter<'static> {
				let result = item.and_then(|item| lambda.invoke(ctx, item));
				match result {
					Err(err) => Box::new(iter::once(Err(err))),
					Ok(Value::Null) => Box::new(iter::empty()),
					Ok(value) => {
						let inner: Option<Vec<_>> = elements(&value).map(Iterator::collect);
						match inner {
							Some(inner) => Box::new(inner.into_iter()),
							None => Box::new(iter::once(Ok(value))),
						}
					}
				}
			})),
			_ => Box::new(items(&self.input).map(move |item| item.and_then(|item| lambda.invoke(ctx, item)))),
		}
	}
}

fn quantify(function: Builtin, input: &Value, lambda: &dyn LambdaBody, ctx: &ExecutionContext) -> Result<bool> {
	// (result on match, result when exhausted)
	let (on_match, exhausted, wanted) = match function {
		Builtin::Any => (true, false, true),
		Builtin::All => (false, true, false),
		_ => (false, true, true),
	};
	for item in items(input) {
		match lambda.invoke(ctx, item?)? {
			Value::Boolean(b) if b == wanted => return Ok(on_match),
			Value::Boolean(_) => {}
			other => {
				return Err(EvalError::NonBooleanLambdaResult {
					function: function.to_string(),
					value: other.describe(),
				}
				.into());
			}
		}
	}
	Ok(exhausted)
}

/// Applies a lambda-taking builtin. A null input yields null; filter, map
/// and flatmap yield lazy sequences.
pub fn apply(function: Builtin, ctx: &ExecutionContext, input: Value, lambda: Arc<dyn LambdaBody>) -> Result<Value> {
	if input.is_null() {
		return Ok(Value::Null);
	}
	match function {
		Builtin::Filter | Builtin::Map | Builtin::FlatMap => Ok(Value::Sequence(Sequence::new(Apply {
			function,
			input,
			lambda,
			ctx: ctx.clone(),
		}))),
		Builtin::Any | Builtin::All | Builtin::None => {
			Ok(Value::Boolean(quantify(function, &input, lambda.as_ref(), ctx)?))
		}
		Builtin::Concat => Ok(concat(vec![input])),
	}
}

struct Concatenation(Vec<Value>);

impl SequenceSource for Concatenation {
	fn iter(&self) -> ValueIter<'_> {
		Box::new(self.0.iter().filter(|value| !value.is_null()).flat_map(items))
	}
}

/// Concatenates lazily when any argument is sequence-like, otherwise as
/// strings with null arguments treated as empty. All-null arguments give null.
pub fn concat(arguments: Vec<Value>) -> Value {
	if arguments.iter().all(Value::is_null) {
		return Value::Null;
	}
	if arguments.iter().any(Value::is_sequence_like) {
		return Value::Sequence(Sequence::new(Concatenation(arguments)));
	}
	let mut result = String::new();
	for argument in arguments.iter().filter(|value| !value.is_null()) {
		result.push_str(&argument.to_string());
	}
	Value::from(result)
}
