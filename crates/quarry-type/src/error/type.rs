// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use super::{Diagnostic, IntoDiagnostic};
use crate::value::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
	Add,
	Subtract,
	Multiply,
	Divide,
	Modulo,
}

impl BinaryOp {
	pub fn symbol(&self) -> &'static str {
		match self {
			BinaryOp::Add => "+",
			BinaryOp::Subtract => "-",
			BinaryOp::Multiply => "*",
			BinaryOp::Divide => "/",
			BinaryOp::Modulo => "%",
		}
	}

	fn verb(&self) -> &'static str {
		match self {
			BinaryOp::Add => "add",
			BinaryOp::Subtract => "subtract",
			BinaryOp::Multiply => "multiply",
			BinaryOp::Divide => "divide",
			BinaryOp::Modulo => "modulo",
		}
	}
}

impl Display for BinaryOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
	And,
	Or,
	Not,
}

impl Display for LogicalOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			LogicalOp::And => f.write_str("AND"),
			LogicalOp::Or => f.write_str("OR"),
			LogicalOp::Not => f.write_str("NOT"),
		}
	}
}

/// Failures of the scalar value semantics. Operands are carried pre-rendered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
	#[error("Cannot {} {left} and {right}", .operator.verb())]
	ArithmeticType {
		operator: BinaryOp,
		left: String,
		right: String,
	},

	#[error("Arithmetic overflow evaluating {left} {operator} {right}")]
	ArithmeticOverflow {
		operator: BinaryOp,
		left: String,
		right: String,
	},

	#[error("Division by zero evaluating {left} {operator} 0")]
	DivisionByZero {
		operator: BinaryOp,
		left: String,
	},

	#[error("Cannot negate {value}")]
	Negation {
		value: String,
	},

	#[error("Cannot compare {left} and {right}")]
	NotComparable {
		left: String,
		right: String,
	},

	#[error("Cannot apply {operator} to {value}")]
	LogicalOperand {
		operator: LogicalOp,
		value: String,
	},

	#[error("Cannot cast {value} to {target}")]
	InvalidCast {
		value: String,
		target: Type,
	},

	#[error("Cannot parse '{text}' as a decimal")]
	InvalidDecimal {
		text: String,
	},
}

impl IntoDiagnostic for TypeError {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			TypeError::ArithmeticType {
				operator,
				..
			} => Diagnostic::new("ARITHMETIC_001", message)
				.with_label(format!("unsupported operand types for '{}'", operator))
				.with_help("Arithmetic is defined for Int, Long, Float, Double and Decimal operands")
				.with_note("'+' also concatenates when either operand is a String"),
			TypeError::ArithmeticOverflow {
				..
			} => Diagnostic::new("ARITHMETIC_002", message)
				.with_label("result does not fit the promoted type")
				.with_help("Cast an operand to a wider type such as Long or Double"),
			TypeError::DivisionByZero {
				..
			} => Diagnostic::new("ARITHMETIC_003", message)
				.with_note("Integer division and modulo by zero are undefined"),
			TypeError::Negation {
				..
			} => Diagnostic::new("ARITHMETIC_004", message).with_help("Only numeric values can be negated"),
			TypeError::NotComparable {
				..
			} => Diagnostic::new("COMPARE_001", message)
				.with_label("operands are not comparable")
				.with_note("Numbers compare with numbers, strings with strings, booleans with booleans, date-times with date-times"),
			TypeError::LogicalOperand {
				operator,
				..
			} => Diagnostic::new("OPERATOR_001", message)
				.with_help(format!("The {} operator can only be applied to boolean values", operator)),
			TypeError::InvalidCast {
				..
			} => Diagnostic::new("CAST_001", message),
			TypeError::InvalidDecimal {
				..
			} => Diagnostic::new("CAST_002", message),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_arithmetic_type_message() {
		let err = TypeError::ArithmeticType {
			operator: BinaryOp::Add,
			left: "true".to_string(),
			right: "1".to_string(),
		};
		assert_eq!(err.to_string(), "Cannot add true and 1");
		assert_eq!(err.into_diagnostic().code, "ARITHMETIC_001");
	}

	#[test]
	fn test_not_comparable_message() {
		let err = TypeError::NotComparable {
			left: "1.0".to_string(),
			right: "''".to_string(),
		};
		assert_eq!(err.to_string(), "Cannot compare 1.0 and ''");
	}
}
