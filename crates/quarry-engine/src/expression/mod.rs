// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Display, Formatter},
	sync::Arc,
};

use quarry_core::{Value, value::math::ComparisonOp};
use quarry_type::{Result, error::BinaryOp};

use crate::error::EvalError;

mod function;
mod key;

pub use function::{Builtin, CompiledFunction, ScalarFunction};

/// A column read. `ordinal` addresses a table alias slot of the tuple row;
/// `index` is the column position when planning resolved it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnExpression {
	pub name: Arc<str>,
	pub ordinal: Option<usize>,
	pub index: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum Expression {
	Literal(Value),
	Column(ColumnExpression),
	Arithmetic {
		operator: BinaryOp,
		left: Box<Expression>,
		right: Box<Expression>,
	},
	Negate(Box<Expression>),
	Comparison {
		operator: ComparisonOp,
		left: Box<Expression>,
		right: Box<Expression>,
	},
	And(Box<Expression>, Box<Expression>),
	Or(Box<Expression>, Box<Expression>),
	Not(Box<Expression>),
	IsNull {
		expression: Box<Expression>,
		negated: bool,
	},
	In {
		expression: Box<Expression>,
		list: Vec<Expression>,
		negated: bool,
	},
	Builtin {
		function: Builtin,
		arguments: Vec<Expression>,
	},
	/// Only valid as the lambda argument of a higher-order builtin.
	Lambda {
		parameter: Arc<str>,
		body: Arc<Expression>,
	},
	Call {
		function: Arc<dyn ScalarFunction>,
		arguments: Vec<Expression>,
	},
}

impl Expression {
	pub fn literal(value: impl Into<Value>) -> Self {
		Expression::Literal(value.into())
	}

	pub fn null() -> Self {
		Expression::Literal(Value::Null)
	}

	pub fn column(name: &str) -> Self {
		Expression::Column(ColumnExpression {
			name: Arc::from(name),
			ordinal: None,
			index: None,
		})
	}

	pub fn column_at(ordinal: usize, name: &str) -> Self {
		Expression::Column(ColumnExpression {
			name: Arc::from(name),
			ordinal: Some(ordinal),
			index: None,
		})
	}

	pub fn arithmetic(operator: BinaryOp, left: Expression, right: Expression) -> Self {
		Expression::Arithmetic {
			operator,
			left: Box::new(left),
			right: Box::new(right),
		}
	}

	pub fn add(left: Expression, right: Expression) -> Self {
		Self::arithmetic(BinaryOp::Add, left, right)
	}

	pub fn multiply(left: Expression, right: Expression) -> Self {
		Self::arithmetic(BinaryOp::Multiply, left, right)
	}

	pub fn comparison(operator: ComparisonOp, left: Expression, right: Expression) -> Self {
		Expression::Comparison {
			operator,
			left: Box::new(left),
			right: Box::new(right),
		}
	}

	pub fn equal(left: Expression, right: Expression) -> Self {
		Self::comparison(ComparisonOp::Equal, left, right)
	}

	pub fn greater_than(left: Expression, right: Expression) -> Self {
		Self::comparison(ComparisonOp::GreaterThan, left, right)
	}

	pub fn and(left: Expression, right: Expression) -> Self {
		Expression::And(Box::new(left), Box::new(right))
	}

	pub fn or(left: Expression, right: Expression) -> Self {
		Expression::Or(Box::new(left), Box::new(right))
	}

	#[allow(clippy::should_implement_trait)]
	pub fn not(expression: Expression) -> Self {
		Expression::Not(Box::new(expression))
	}

	pub fn is_null(expression: Expression) -> Self {
		Expression::IsNull {
			expression: Box::new(expression),
			negated: false,
		}
	}

	pub fn in_list(expression: Expression, list: Vec<Expression>) -> Self {
		Expression::In {
			expression: Box::new(expression),
			list,
			negated: false,
		}
	}

	pub fn builtin(function: Builtin, arguments: Vec<Expression>) -> Self {
		Expression::Builtin {
			function,
			arguments,
		}
	}

	pub fn lambda(parameter: &str, body: Expression) -> Self {
		Expression::Lambda {
			parameter: Arc::from(parameter),
			body: Arc::new(body),
		}
	}

	pub fn call(function: Arc<dyn ScalarFunction>, arguments: Vec<Expression>) -> Self {
		Expression::Call {
			function,
			arguments,
		}
	}

	/// Direct sub-expressions.
	pub fn children(&self) -> Vec<&Expression> {
		match self {
			Expression::Literal(_) | Expression::Column(_) => vec![],
			Expression::Arithmetic {
				left,
				right,
				..
			}
			| Expression::Comparison {
				left,
				right,
				..
			}
			| Expression::And(left, right)
			| Expression::Or(left, right) => vec![&**left, &**right],
			Expression::Negate(expression)
			| Expression::Not(expression)
			| Expression::IsNull {
				expression,
				..
			} => vec![&**expression],
			Expression::In {
				expression,
				list,
				..
			} => std::iter::once(&**expression).chain(list.iter()).collect(),
			Expression::Builtin {
				arguments,
				..
			}
			| Expression::Call {
				arguments,
				..
			} => arguments.iter().collect(),
			Expression::Lambda {
				body,
				..
			} => vec![&**body],
		}
	}

	/// Checks builtin arities and that lambdas only appear as builtin
	/// lambda arguments.
	pub fn validate(&self) -> Result<()> {
		match self {
			Expression::Lambda {
				parameter,
				..
			} => Err(EvalError::UnboundLambda {
				parameter: parameter.to_string(),
			}
			.into()),
			Expression::Builtin {
				function,
				arguments,
			} if function.takes_lambda() => {
				if arguments.len() != 2 {
					return Err(EvalError::Arity {
						function: function.to_string(),
						expected: "2".to_string(),
						actual: arguments.len(),
					}
					.into());
				}
				arguments[0].validate()?;
				match &arguments[1] {
					Expression::Lambda {
						body,
						..
					} => body.validate(),
					_ => Err(EvalError::ExpectedLambda {
						function: function.to_string(),
						position: 2,
					}
					.into()),
				}
			}
			other => other.children().into_iter().try_for_each(Expression::validate),
		}
	}
}

fn write_list(f: &mut Formatter<'_>, expressions: &[Expression]) -> fmt::Result {
	for (i, expression) in expressions.iter().enumerate() {
		if i > 0 {
			f.write_str(", ")?;
		}
		write!(f, "{}", expression)?;
	}
	Ok(())
}

/// Numeric literals other than ints carry a type suffix.
fn write_literal(f: &mut Formatter<'_>, value: &Value) -> fmt::Result {
	match value {
		Value::Long(v) => write!(f, "{}L", v),
		Value::Float(v) => write!(f, "{}F", v),
		Value::Double(v) => write!(f, "{}D", v),
		Value::Decimal(v) => write!(f, "{}M", v),
		other => f.write_str(&other.describe()),
	}
}

/// Readable text, used in diagnostics and logs.
impl Display for Expression {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Expression::Literal(value) => write_literal(f, value),
			Expression::Column(column) => match column.ordinal {
				Some(ordinal) => write!(f, "#{}.{}", ordinal, column.name),
				None => f.write_str(&column.name),
			},
			Expression::Arithmetic {
				operator,
				left,
				right,
			} => write!(f, "({} {} {})", left, operator, right),
			Expression::Negate(expression) => write!(f, "-({})", expression),
			Expression::Comparison {
				operator,
				left,
				right,
			} => write!(f, "({} {} {})", left, operator.symbol(), right),
			Expression::And(left, right) => write!(f, "({} AND {})", left, right),
			Expression::Or(left, right) => write!(f, "({} OR {})", left, right),
			Expression::Not(expression) => write!(f, "NOT ({})", expression),
			Expression::IsNull {
				expression,
				negated,
			} => write!(f, "{} IS {}NULL", expression, if *negated { "NOT " } else { "" }),
			Expression::In {
				expression,
				list,
				negated,
			} => {
				write!(f, "{} {}IN (", expression, if *negated { "NOT " } else { "" })?;
				write_list(f, list)?;
				f.write_str(")")
			}
			Expression::Builtin {
				function,
				arguments,
			} => {
				write!(f, "{}(", function)?;
				write_list(f, arguments)?;
				f.write_str(")")
			}
			Expression::Lambda {
				parameter,
				body,
			} => write!(f, "{} -> {}", parameter, body),
			Expression::Call {
				function,
				arguments,
			} => {
				write!(f, "{}(", function.name())?;
				write_list(f, arguments)?;
				f.write_str(")")
			}
		}
	}
}
