// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Arithmetic, comparison and membership over [`Value`]s.
//!
//! Numeric operands promote along Int < Long < Float < Double. A Decimal
//! operand is computed exactly where possible and the result narrows to
//! Double. A null operand yields null for every arithmetic operator.

use std::cmp::Ordering;

use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use quarry_type::{
	Result,
	error::{BinaryOp, LogicalOp, TypeError},
};

use crate::value::{Value, elements};

pub fn add(left: &Value, right: &Value) -> Result<Value> {
	arithmetic(BinaryOp::Add, left, right)
}

pub fn subtract(left: &Value, right: &Value) -> Result<Value> {
	arithmetic(BinaryOp::Subtract, left, right)
}

pub fn multiply(left: &Value, right: &Value) -> Result<Value> {
	arithmetic(BinaryOp::Multiply, left, right)
}

pub fn divide(left: &Value, right: &Value) -> Result<Value> {
	arithmetic(BinaryOp::Divide, left, right)
}

pub fn modulo(left: &Value, right: &Value) -> Result<Value> {
	arithmetic(BinaryOp::Modulo, left, right)
}

#[derive(Debug, Clone, Copy)]
enum Operand<'a> {
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	Decimal(&'a quarry_type::Decimal),
}

impl<'a> Operand<'a> {
	fn of(value: &'a Value) -> Option<Self> {
		match value {
			Value::Int(v) => Some(Operand::Int(*v)),
			Value::Long(v) => Some(Operand::Long(*v)),
			Value::Float(v) => Some(Operand::Float(*v)),
			Value::Double(v) => Some(Operand::Double(*v)),
			Value::Decimal(v) => Some(Operand::Decimal(v)),
			_ => None,
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Operand::Int(_) => 0,
			Operand::Long(_) => 1,
			Operand::Float(_) => 2,
			Operand::Double(_) | Operand::Decimal(_) => 3,
		}
	}

	fn is_exact(&self) -> bool {
		matches!(self, Operand::Int(_) | Operand::Long(_) | Operand::Decimal(_))
	}

	fn is_decimal(&self) -> bool {
		matches!(self, Operand::Decimal(_))
	}

	fn to_i64(self) -> i64 {
		match self {
			Operand::Int(v) => v as i64,
			Operand::Long(v) => v,
			Operand::Float(v) => v as i64,
			Operand::Double(v) => v as i64,
			Operand::Decimal(v) => v.to_i64().unwrap_or_default(),
		}
	}

	fn to_f32(self) -> f32 {
		match self {
			Operand::Int(v) => v as f32,
			Operand::Long(v) => v as f32,
			Operand::Float(v) => v,
			Operand::Double(v) => v as f32,
			Operand::Decimal(v) => v.to_f64() as f32,
		}
	}

	fn to_f64(self) -> f64 {
		match self {
			Operand::Int(v) => v as f64,
			Operand::Long(v) => v as f64,
			Operand::Float(v) => v as f64,
			Operand::Double(v) => v,
			Operand::Decimal(v) => v.to_f64(),
		}
	}

	fn to_big_decimal(self) -> BigDecimal {
		match self {
			Operand::Int(v) => BigDecimal::from(v),
			Operand::Long(v) => BigDecimal::from(v),
			Operand::Decimal(v) => v.inner().clone(),
			other => BigDecimal::from_f64(other.to_f64()).unwrap_or_default(),
		}
	}
}

macro_rules! checked_integer {
	($op:expr, $l:expr, $r:expr, $left:expr, $right:expr) => {{
		let (l, r) = ($l, $r);
		let result = match $op {
			BinaryOp::Add => l.checked_add(r),
			BinaryOp::Subtract => l.checked_sub(r),
			BinaryOp::Multiply => l.checked_mul(r),
			BinaryOp::Divide | BinaryOp::Modulo if r == 0 => {
				return Err(TypeError::DivisionByZero {
					operator: $op,
					left: $left.describe(),
				}
				.into());
			}
			BinaryOp::Divide => l.checked_div(r),
			BinaryOp::Modulo => Some(l.wrapping_rem(r)),
		};
		result.ok_or_else(|| TypeError::ArithmeticOverflow {
			operator: $op,
			left: $left.describe(),
			right: $right.describe(),
		})?
	}};
}

macro_rules! ieee {
	($op:expr, $l:expr, $r:expr) => {{
		let (l, r) = ($l, $r);
		match $op {
			BinaryOp::Add => l + r,
			BinaryOp::Subtract => l - r,
			BinaryOp::Multiply => l * r,
			BinaryOp::Divide => l / r,
			BinaryOp::Modulo => l % r,
		}
	}};
}

pub fn arithmetic(operator: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
	if left.is_null() || right.is_null() {
		return Ok(Value::Null);
	}

	if operator == BinaryOp::Add && (matches!(left, Value::String(_)) || matches!(right, Value::String(_))) {
		return Ok(Value::from(format!("{}{}", left, right)));
	}

	let (l, r) = match (Operand::of(left), Operand::of(right)) {
		(Some(l), Some(r)) => (l, r),
		_ => {
			return Err(TypeError::ArithmeticType {
				operator,
				left: left.describe(),
				right: right.describe(),
			}
			.into());
		}
	};

	if (l.is_decimal() || r.is_decimal()) && l.is_exact() && r.is_exact() {
		return Ok(Value::Double(decimal(operator, l, r)));
	}

	let value = match l.rank().max(r.rank()) {
		0 => match (l, r) {
			(Operand::Int(a), Operand::Int(b)) => Value::Int(checked_integer!(operator, a, b, left, right)),
			_ => Value::Long(checked_integer!(operator, l.to_i64(), r.to_i64(), left, right)),
		},
		1 => Value::Long(checked_integer!(operator, l.to_i64(), r.to_i64(), left, right)),
		2 => Value::Float(ieee!(operator, l.to_f32(), r.to_f32())),
		_ => Value::Double(ieee!(operator, l.to_f64(), r.to_f64())),
	};
	Ok(value)
}

fn decimal(operator: BinaryOp, l: Operand<'_>, r: Operand<'_>) -> f64 {
	let (a, b) = (l.to_big_decimal(), r.to_big_decimal());
	let result = match operator {
		BinaryOp::Add => a + b,
		BinaryOp::Subtract => a - b,
		BinaryOp::Multiply => a * b,
		BinaryOp::Divide | BinaryOp::Modulo if b == BigDecimal::from(0) => {
			return ieee!(operator, l.to_f64(), 0.0f64);
		}
		BinaryOp::Divide => a / b,
		BinaryOp::Modulo => a % b,
	};
	result.to_f64().unwrap_or(f64::NAN)
}

pub fn negate(value: &Value) -> Result<Value> {
	let overflow = || TypeError::ArithmeticOverflow {
		operator: BinaryOp::Subtract,
		left: "0".to_string(),
		right: value.describe(),
	};
	Ok(match value {
		Value::Null => Value::Null,
		Value::Int(v) => Value::Int(v.checked_neg().ok_or_else(overflow)?),
		Value::Long(v) => Value::Long(v.checked_neg().ok_or_else(overflow)?),
		Value::Float(v) => Value::Float(-v),
		Value::Double(v) => Value::Double(-v),
		Value::Decimal(v) => Value::Decimal(quarry_type::Decimal::new(-v.inner().clone())),
		other => {
			return Err(TypeError::Negation {
				value: other.describe(),
			}
			.into());
		}
	})
}

/// Total comparison used by ordering and predicates. Null sorts before
/// every other value; incompatible operands fail.
pub fn cmp(left: &Value, right: &Value) -> Result<Ordering> {
	let ordering = match (left, right) {
		(Value::Null, Value::Null) => Ordering::Equal,
		(Value::Null, _) => Ordering::Less,
		(_, Value::Null) => Ordering::Greater,
		(Value::String(l), Value::String(r)) => l.cmp(r),
		(Value::Boolean(l), Value::Boolean(r)) => l.cmp(r),
		(Value::DateTime(l), Value::DateTime(r)) => l.cmp(r),
		(Value::DateTimeOffset(l), Value::DateTimeOffset(r)) => l.cmp(r),
		(Value::DateTime(l), Value::DateTimeOffset(r)) => l.cmp(&r.naive_utc()),
		(Value::DateTimeOffset(l), Value::DateTime(r)) => l.naive_utc().cmp(r),
		_ => match (Operand::of(left), Operand::of(right)) {
			(Some(l), Some(r)) => cmp_numbers(l, r),
			_ => {
				return Err(TypeError::NotComparable {
					left: left.describe(),
					right: right.describe(),
				}
				.into());
			}
		},
	};
	Ok(ordering)
}

fn cmp_numbers(l: Operand<'_>, r: Operand<'_>) -> Ordering {
	match (l, r) {
		(Operand::Int(_) | Operand::Long(_), Operand::Int(_) | Operand::Long(_)) => l.to_i64().cmp(&r.to_i64()),
		(Operand::Decimal(a), Operand::Decimal(b)) => a.cmp(b),
		_ if l.is_exact() && r.is_exact() => l.to_big_decimal().cmp(&r.to_big_decimal()),
		_ => {
			let (a, b) = (l.to_f64(), r.to_f64());
			a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
		}
	}
}

/// Numeric-aware equality. A null operand never equals anything.
pub fn eq(left: &Value, right: &Value) -> Result<bool> {
	if left.is_null() || right.is_null() {
		return Ok(false);
	}
	Ok(cmp(left, right)? == Ordering::Equal)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
	Equal,
	NotEqual,
	LessThan,
	LessThanOrEqual,
	GreaterThan,
	GreaterThanOrEqual,
}

impl ComparisonOp {
	pub fn symbol(&self) -> &'static str {
		match self {
			ComparisonOp::Equal => "=",
			ComparisonOp::NotEqual => "!=",
			ComparisonOp::LessThan => "<",
			ComparisonOp::LessThanOrEqual => "<=",
			ComparisonOp::GreaterThan => ">",
			ComparisonOp::GreaterThanOrEqual => ">=",
		}
	}

	pub fn matches(&self, ordering: Ordering) -> bool {
		match self {
			ComparisonOp::Equal => ordering == Ordering::Equal,
			ComparisonOp::NotEqual => ordering != Ordering::Equal,
			ComparisonOp::LessThan => ordering == Ordering::Less,
			ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
			ComparisonOp::GreaterThan => ordering == Ordering::Greater,
			ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
		}
	}
}

/// Three-valued comparison: a null operand yields null.
pub fn compare(operator: ComparisonOp, left: &Value, right: &Value) -> Result<Value> {
	if left.is_null() || right.is_null() {
		return Ok(Value::Null);
	}
	Ok(Value::Boolean(operator.matches(cmp(left, right)?)))
}

/// Membership test. Either side may be a scalar or a sequence-like value;
/// when both are sequences any shared element is a match. Null elements
/// never match.
pub fn in_value(candidate: &Value, other: &Value) -> Result<bool> {
	match (elements(candidate), elements(other)) {
		(None, None) => eq(candidate, other),
		(None, Some(items)) => contains(items, candidate),
		(Some(items), None) => contains(items, other),
		(Some(candidates), Some(items)) => {
			let items = items.collect::<Result<Vec<_>>>()?;
			for candidate in candidates {
				let candidate = candidate?;
				for item in &items {
					if eq(&candidate, item)? {
						return Ok(true);
					}
				}
			}
			Ok(false)
		}
	}
}

fn contains(items: impl Iterator<Item = Result<Value>>, needle: &Value) -> Result<bool> {
	for item in items {
		if eq(&item?, needle)? {
			return Ok(true);
		}
	}
	Ok(false)
}

/// Reads a boolean operand of a logical operator; null maps to `None`.
pub fn truth(operator: LogicalOp, value: &Value) -> Result<Option<bool>> {
	match value {
		Value::Null => Ok(None),
		Value::Boolean(b) => Ok(Some(*b)),
		other => Err(TypeError::LogicalOperand {
			operator,
			value: other.describe(),
		}
		.into()),
	}
}

pub fn not(value: &Value) -> Result<Value> {
	Ok(truth(LogicalOp::Not, value)?.map(|b| Value::Boolean(!b)).unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
	use quarry_type::Decimal;

	use super::*;

	fn decimal(text: &str) -> Value {
		Value::Decimal(Decimal::parse(text).unwrap())
	}

	#[test]
	fn test_add_promotes() {
		assert_eq!(add(&Value::Int(1), &Value::Int(2)).unwrap(), Value::Int(3));
		assert_eq!(add(&Value::Int(1), &Value::Long(2)).unwrap(), Value::Long(3));
		assert_eq!(add(&Value::Int(1), &Value::Float(2.0)).unwrap(), Value::Float(3.0));
		assert_eq!(add(&Value::Long(1), &Value::Double(1.1)).unwrap(), Value::Double(2.1));
	}

	#[test]
	fn test_add_decimal_narrows_to_double() {
		assert_eq!(add(&decimal("1.10"), &Value::Int(1)).unwrap(), Value::Double(2.1));
		assert_eq!(multiply(&decimal("1.5"), &decimal("2")).unwrap(), Value::Double(3.0));
		assert_eq!(add(&decimal("0.1"), &decimal("0.2")).unwrap(), Value::Double(0.3));
	}

	#[test]
	fn test_add_string_concatenates() {
		assert_eq!(add(&Value::from("a"), &Value::Int(1)).unwrap(), Value::from("a1"));
		assert_eq!(add(&Value::Double(1.5), &Value::from("x")).unwrap(), Value::from("1.5x"));
	}

	#[test]
	fn test_null_operand_yields_null() {
		for op in [add, subtract, multiply, divide, modulo] {
			assert_eq!(op(&Value::Null, &Value::Int(1)).unwrap(), Value::Null);
			assert_eq!(op(&Value::Int(1), &Value::Null).unwrap(), Value::Null);
		}
		assert_eq!(add(&Value::Null, &Value::from("a")).unwrap(), Value::Null);
	}

	#[test]
	fn test_non_numeric_operand_fails() {
		let err = add(&Value::Boolean(true), &Value::Int(1)).unwrap_err();
		assert_eq!(err.message(), "Cannot add true and 1");
		assert_eq!(err.code(), "ARITHMETIC_001");
	}

	#[test]
	fn test_integer_overflow_fails() {
		let err = add(&Value::Int(i32::MAX), &Value::Int(1)).unwrap_err();
		assert_eq!(err.code(), "ARITHMETIC_002");
		assert!(multiply(&Value::Long(i64::MAX), &Value::Int(2)).is_err());
		assert_eq!(add(&Value::Int(i32::MAX), &Value::Long(1)).unwrap(), Value::Long(i32::MAX as i64 + 1));
	}

	#[test]
	fn test_division_by_zero() {
		assert_eq!(divide(&Value::Int(1), &Value::Int(0)).unwrap_err().code(), "ARITHMETIC_003");
		assert_eq!(modulo(&Value::Long(1), &Value::Int(0)).unwrap_err().code(), "ARITHMETIC_003");
		assert_eq!(divide(&Value::Double(1.0), &Value::Int(0)).unwrap(), Value::Double(f64::INFINITY));
		assert_eq!(divide(&decimal("1"), &Value::Int(0)).unwrap(), Value::Double(f64::INFINITY));
	}

	#[test]
	fn test_integer_division_truncates() {
		assert_eq!(divide(&Value::Int(7), &Value::Int(2)).unwrap(), Value::Int(3));
		assert_eq!(divide(&Value::Int(-7), &Value::Int(2)).unwrap(), Value::Int(-3));
		assert_eq!(modulo(&Value::Int(-7), &Value::Int(2)).unwrap(), Value::Int(-1));
		assert_eq!(modulo(&Value::Int(i32::MIN), &Value::Int(-1)).unwrap(), Value::Int(0));
	}

	#[test]
	fn test_negate() {
		assert_eq!(negate(&Value::Int(1)).unwrap(), Value::Int(-1));
		assert_eq!(negate(&Value::Null).unwrap(), Value::Null);
		assert!(negate(&Value::Int(i32::MIN)).is_err());
		assert_eq!(negate(&Value::from("a")).unwrap_err().code(), "ARITHMETIC_004");
	}

	#[test]
	fn test_cmp_numbers_across_types() {
		assert_eq!(cmp(&Value::Int(1), &decimal("1.00")).unwrap(), Ordering::Equal);
		assert_eq!(cmp(&Value::Long(2), &Value::Double(1.5)).unwrap(), Ordering::Greater);
		assert_eq!(cmp(&Value::Float(1.5), &Value::Int(2)).unwrap(), Ordering::Less);
		assert_eq!(cmp(&Value::Long(i64::MAX), &Value::Long(i64::MAX - 1)).unwrap(), Ordering::Greater);
	}

	#[test]
	fn test_cmp_strings_and_booleans() {
		assert_eq!(cmp(&Value::from("a"), &Value::from("b")).unwrap(), Ordering::Less);
		assert_eq!(cmp(&Value::Boolean(false), &Value::Boolean(true)).unwrap(), Ordering::Less);
	}

	#[test]
	fn test_cmp_incompatible_fails() {
		let err = cmp(&Value::Double(1.0), &Value::from("")).unwrap_err();
		assert_eq!(err.message(), "Cannot compare 1 and ''");
		assert!(cmp(&Value::Boolean(true), &Value::Int(1)).is_err());
	}

	#[test]
	fn test_cmp_nulls_first() {
		assert_eq!(cmp(&Value::Null, &Value::Int(1)).unwrap(), Ordering::Less);
		assert_eq!(cmp(&Value::Null, &Value::Null).unwrap(), Ordering::Equal);
	}

	#[test]
	fn test_compare_is_three_valued() {
		assert_eq!(compare(ComparisonOp::Equal, &Value::Null, &Value::Int(1)).unwrap(), Value::Null);
		assert_eq!(compare(ComparisonOp::LessThan, &Value::Int(1), &Value::Long(2)).unwrap(), Value::Boolean(true));
		assert_eq!(
			compare(ComparisonOp::GreaterThanOrEqual, &Value::Int(1), &Value::Int(1)).unwrap(),
			Value::Boolean(true)
		);
	}

	#[test]
	fn test_in_value() {
		let list = Value::list([Value::Int(1), Value::Null, Value::Long(3)]);
		assert!(in_value(&Value::Long(1), &list).unwrap());
		assert!(in_value(&list, &Value::Int(3)).unwrap());
		assert!(!in_value(&Value::Null, &list).unwrap());
		assert!(!in_value(&Value::Int(2), &list).unwrap());
		assert!(in_value(&Value::Int(2), &Value::Double(2.0)).unwrap());
		assert!(in_value(&Value::list([Value::Int(9), Value::Int(3)]), &list).unwrap());
		assert!(!in_value(&Value::list([Value::Null]), &list).unwrap());
	}

	#[test]
	fn test_in_value_propagates_comparison_errors() {
		let list = Value::list([Value::from("a")]);
		assert!(in_value(&Value::Int(1), &list).is_err());
	}

	#[test]
	fn test_truth() {
		assert_eq!(truth(LogicalOp::And, &Value::Null).unwrap(), None);
		assert_eq!(truth(LogicalOp::And, &Value::Boolean(true)).unwrap(), Some(true));
		assert_eq!(truth(LogicalOp::Or, &Value::Int(1)).unwrap_err().code(), "OPERATOR_001");
		assert_eq!(not(&Value::Boolean(true)).unwrap(), Value::Boolean(false));
		assert_eq!(not(&Value::Null).unwrap(), Value::Null);
	}
}
