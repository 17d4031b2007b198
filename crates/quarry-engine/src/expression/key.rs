// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Structural encoding of an expression used as the expression cache key.
//! Unlike the display text it quotes identifiers and strings, tags every
//! literal with its type, and identifies user-defined functions by instance.

use std::sync::Arc;

use quarry_core::Value;

use super::Expression;

impl Expression {
	/// `None` when a literal has no faithful encoding (tables, arrays and
	/// sequences), which keeps the expression out of the cache.
	pub fn cache_key(&self) -> Option<String> {
		let mut out = String::new();
		encode(self, &mut out)?;
		Some(out)
	}
}

fn encode(expression: &Expression, out: &mut String) -> Option<()> {
	match expression {
		Expression::Literal(value) => {
			out.push_str("lit:");
			encode_value(value, out)?;
		}
		Expression::Column(column) => {
			out.push_str("col(");
			push_index(column.ordinal, out);
			out.push(',');
			push_index(column.index, out);
			out.push_str(&format!(",{:?})", column.name));
		}
		Expression::Arithmetic {
			operator,
			left,
			right,
		} => node(&format!("arith[{}]", operator), &[&**left, &**right], out)?,
		Expression::Negate(expression) => node("neg", &[&**expression], out)?,
		Expression::Comparison {
			operator,
			left,
			right,
		} => node(&format!("cmp[{}]", operator.symbol()), &[&**left, &**right], out)?,
		Expression::And(left, right) => node("and", &[&**left, &**right], out)?,
		Expression::Or(left, right) => node("or", &[&**left, &**right], out)?,
		Expression::Not(expression) => node("not", &[&**expression], out)?,
		Expression::IsNull {
			expression,
			negated,
		} => node(if *negated { "notnull" } else { "isnull" }, &[&**expression], out)?,
		Expression::In {
			expression,
			list,
			negated,
		} => {
			let operands: Vec<_> = std::iter::once(&**expression).chain(list.iter()).collect();
			node(if *negated { "notin" } else { "in" }, &operands, out)?
		}
		Expression::Builtin {
			function,
			arguments,
		} => node(&format!("fn[{}]", function), &arguments.iter().collect::<Vec<_>>(), out)?,
		Expression::Lambda {
			parameter,
			body,
		} => node(&format!("lambda[{:?}]", parameter), &[&**body], out)?,
		Expression::Call {
			function,
			arguments,
		} => {
			let identity = Arc::as_ptr(function) as *const () as usize;
			let tag = format!("call[{:?}@{:x}]", function.name(), identity);
			node(&tag, &arguments.iter().collect::<Vec<_>>(), out)?
		}
	}
	Some(())
}

fn node(tag: &str, operands: &[&Expression], out: &mut String) -> Option<()> {
	out.push_str(tag);
	out.push('(');
	for (i, operand) in operands.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}
		encode(operand, out)?;
	}
	out.push(')');
	Some(())
}

fn push_index(index: Option<usize>, out: &mut String) {
	match index {
		Some(index) => out.push_str(&index.to_string()),
		None => out.push('_'),
	}
}

fn encode_value(value: &Value, out: &mut String) -> Option<()> {
	match value {
		Value::Null => out.push_str("null"),
		Value::Boolean(v) => out.push_str(&format!("b:{}", v)),
		Value::Int(v) => out.push_str(&format!("i:{}", v)),
		Value::Long(v) => out.push_str(&format!("l:{}", v)),
		Value::Float(v) => out.push_str(&format!("f:{:?}", v)),
		Value::Double(v) => out.push_str(&format!("d:{:?}", v)),
		Value::Decimal(v) => out.push_str(&format!("m:{}", v)),
		Value::String(v) => out.push_str(&format!("s:{:?}", v)),
		Value::DateTime(v) => out.push_str(&format!("t:{:?}", v)),
		Value::DateTimeOffset(v) => out.push_str(&format!("tz:{:?}", v)),
		Value::List(items) => {
			out.push_str("list[");
			for (i, item) in items.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				encode_value(item, out)?;
			}
			out.push(']');
		}
		Value::Object(fields) => {
			out.push_str("obj{");
			for (i, (name, field)) in fields.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				out.push_str(&format!("{:?}:", name));
				encode_value(field, out)?;
			}
			out.push('}');
		}
		Value::Table(_) | Value::Array(_) | Value::Sequence(_) => return None,
	}
	Some(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expression::Builtin;

	#[test]
	fn test_literals_are_type_tagged() {
		let key = |value: Value| Expression::literal(value).cache_key().unwrap();
		assert_ne!(key(Value::list([Value::from("1")])), key(Value::list([Value::Int(1)])));
		assert_ne!(key(Value::list([Value::Int(1)])), key(Value::list([Value::Long(1)])));
		assert_ne!(key(Value::Float(1.0)), key(Value::Double(1.0)));
		assert_eq!(key(Value::list([Value::from("a,b")])), "lit:list[s:\"a,b\"]");
	}

	#[test]
	fn test_columns_are_quoted() {
		assert_ne!(Expression::column("null").cache_key(), Expression::null().cache_key());
		assert_ne!(Expression::column("a").cache_key(), Expression::column_at(0, "a").cache_key());
	}

	#[test]
	fn test_lambdas_and_builtins() {
		let filter = |parameter: &str| {
			Expression::builtin(
				Builtin::Filter,
				vec![
					Expression::column("col"),
					Expression::lambda(parameter, Expression::is_null(Expression::column(parameter))),
				],
			)
		};
		assert_eq!(filter("x").cache_key(), filter("x").cache_key());
		assert_ne!(filter("x").cache_key(), filter("y").cache_key());
	}

	#[test]
	fn test_unencodable_literals() {
		assert_eq!(Expression::literal(Value::Table(quarry_core::vector::empty())).cache_key(), None);
		let nested = Expression::add(Expression::column("a"), Expression::literal(Value::Table(quarry_core::vector::empty())));
		assert_eq!(nested.cache_key(), None);
	}
}
