// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Conversions backing the typed vector accessors when the stored value is
//! not already of the requested type.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use quarry_type::{Decimal, Result, Type, error::TypeError};

use crate::{
	value::{ObjectValue, Value, elements},
	vector::{TupleVectorRef, ValueVectorRef, data::ColumnData},
};

fn invalid(value: &Value, target: Type) -> quarry_type::Error {
	TypeError::InvalidCast {
		value: value.describe(),
		target,
	}
	.into()
}

pub fn to_boolean(value: &Value) -> Result<bool> {
	match value {
		Value::Boolean(b) => Ok(*b),
		Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
		Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
		other => Err(invalid(other, Type::Boolean)),
	}
}

pub fn to_int(value: &Value) -> Result<i32> {
	let result = match value {
		Value::Int(v) => Some(*v),
		Value::Long(v) => i32::try_from(*v).ok(),
		Value::Float(v) => truncate(*v as f64).and_then(|v| i32::try_from(v).ok()),
		Value::Double(v) => truncate(*v).and_then(|v| i32::try_from(v).ok()),
		Value::Decimal(v) => v.to_i64().and_then(|v| i32::try_from(v).ok()),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	};
	result.ok_or_else(|| invalid(value, Type::Int))
}

/// Drops the fraction; values outside the i64 range (and NaN) have no
/// integral form.
fn truncate(value: f64) -> Option<i64> {
	let truncated = value.trunc();
	(truncated >= -(2f64.powi(63)) && truncated < 2f64.powi(63)).then_some(truncated as i64)
}

pub fn to_long(value: &Value) -> Result<i64> {
	let result = match value {
		Value::Int(v) => Some(*v as i64),
		Value::Long(v) => Some(*v),
		Value::Float(v) => truncate(*v as f64),
		Value::Double(v) => truncate(*v),
		Value::Decimal(v) => v.to_i64(),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	};
	result.ok_or_else(|| invalid(value, Type::Long))
}

pub fn to_float(value: &Value) -> Result<f32> {
	let result = match value {
		Value::Int(v) => Some(*v as f32),
		Value::Long(v) => Some(*v as f32),
		Value::Float(v) => Some(*v),
		Value::Double(v) => Some(*v as f32),
		Value::Decimal(v) => Some(v.to_f64() as f32),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	};
	result.ok_or_else(|| invalid(value, Type::Float))
}

pub fn to_double(value: &Value) -> Result<f64> {
	let result = match value {
		Value::Int(v) => Some(*v as f64),
		Value::Long(v) => Some(*v as f64),
		Value::Float(v) => Some(*v as f64),
		Value::Double(v) => Some(*v),
		Value::Decimal(v) => Some(v.to_f64()),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	};
	result.ok_or_else(|| invalid(value, Type::Double))
}

pub fn to_decimal(value: &Value) -> Result<Decimal> {
	match value {
		Value::Int(v) => Ok(Decimal::from(*v)),
		Value::Long(v) => Ok(Decimal::from(*v)),
		Value::Float(v) => Decimal::try_from(*v as f64),
		Value::Double(v) => Decimal::try_from(*v),
		Value::Decimal(v) => Ok(v.clone()),
		Value::String(s) => Decimal::parse(s.trim()),
		other => Err(invalid(other, Type::Decimal)),
	}
}

pub fn to_string(value: &Value) -> Result<Arc<str>> {
	match value {
		Value::String(s) => Ok(s.clone()),
		Value::Null => Err(invalid(value, Type::String)),
		other => Ok(Arc::from(other.to_string())),
	}
}

fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
	DateTime::parse_from_rfc3339(text).ok()
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
	NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
		.or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
		.ok()
}

pub fn to_datetime(value: &Value) -> Result<NaiveDateTime> {
	let result = match value {
		Value::DateTime(v) => Some(*v),
		Value::DateTimeOffset(v) => Some(v.naive_utc()),
		Value::String(s) => parse_naive(s.trim()).or_else(|| parse_datetime(s.trim()).map(|v| v.naive_utc())),
		_ => None,
	};
	result.ok_or_else(|| invalid(value, Type::DateTime))
}

pub fn to_datetime_offset(value: &Value) -> Result<DateTime<FixedOffset>> {
	let result = match value {
		Value::DateTimeOffset(v) => Some(*v),
		Value::DateTime(v) => Some(v.and_utc().fixed_offset()),
		Value::String(s) => parse_datetime(s.trim())
			.or_else(|| parse_naive(s.trim()).map(|v| DateTime::<Utc>::from_naive_utc_and_offset(v, Utc).fixed_offset())),
		_ => None,
	};
	result.ok_or_else(|| invalid(value, Type::DateTimeOffset))
}

pub fn to_table(value: &Value) -> Result<TupleVectorRef> {
	match value {
		Value::Table(table) => Ok(table.clone()),
		other => Err(invalid(other, Type::Table)),
	}
}

/// Arrays pass through; lists and sequences are materialized into a vector.
pub fn to_array(value: &Value) -> Result<ValueVectorRef> {
	match value {
		Value::Array(array) => Ok(array.clone()),
		other => match elements(other) {
			Some(items) => {
				let values = items.collect::<Result<Vec<_>>>()?;
				Ok(Arc::new(ColumnData::from_values(values)))
			}
			None => Err(invalid(other, Type::Array)),
		},
	}
}

pub fn to_object(value: &Value) -> Result<Arc<ObjectValue>> {
	match value {
		Value::Object(object) => Ok(object.clone()),
		other => Err(invalid(other, Type::Object)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_widening() {
		assert_eq!(to_long(&Value::Int(3)).unwrap(), 3);
		assert_eq!(to_double(&Value::Float(1.5)).unwrap(), 1.5);
		assert_eq!(to_decimal(&Value::Int(2)).unwrap(), Decimal::from(2));
	}

	#[test]
	fn test_narrowing_overflow_fails() {
		let err = to_int(&Value::Long(i64::MAX)).unwrap_err();
		assert_eq!(err.code(), "CAST_001");
	}

	#[test]
	fn test_fractional_out_of_range_fails() {
		assert_eq!(to_long(&Value::Double(1e20)).unwrap_err().code(), "CAST_001");
		assert_eq!(to_long(&Value::Double(-1e20)).unwrap_err().code(), "CAST_001");
		assert_eq!(to_long(&Value::Double(9.223372036854775807e18)).unwrap_err().code(), "CAST_001");
		assert_eq!(to_int(&Value::Double(3e9)).unwrap_err().code(), "CAST_001");
		assert_eq!(to_int(&Value::Float(f32::NAN)).unwrap_err().code(), "CAST_001");
		assert_eq!(to_long(&Value::Double(f64::INFINITY)).unwrap_err().code(), "CAST_001");

		assert_eq!(to_long(&Value::Double(-9.223372036854775808e18)).unwrap(), i64::MIN);
		assert_eq!(to_long(&Value::Double(-2.7)).unwrap(), -2);
		assert_eq!(to_int(&Value::Float(2.9)).unwrap(), 2);
	}

	#[test]
	fn test_string_parsing() {
		assert_eq!(to_int(&Value::from(" 42 ")).unwrap(), 42);
		assert!(to_boolean(&Value::from("TRUE")).unwrap());
		assert!(to_boolean(&Value::from("yes")).is_err());
		let dt = to_datetime(&Value::from("2020-01-02T03:04:05")).unwrap();
		assert_eq!(dt.to_string(), "2020-01-02 03:04:05");
		let offset = to_datetime_offset(&Value::from("2020-01-02T03:04:05+02:00")).unwrap();
		assert_eq!(offset.naive_utc().to_string(), "2020-01-02 01:04:05");
	}

	#[test]
	fn test_to_string_of_scalars() {
		assert_eq!(&*to_string(&Value::Int(1)).unwrap(), "1");
		assert!(to_string(&Value::Null).is_err());
	}

	#[test]
	fn test_list_to_array() {
		let array = to_array(&Value::list([Value::Int(1), Value::Int(2)])).unwrap();
		assert_eq!(array.len(), 2);
		assert_eq!(array.get_int(1).unwrap(), 2);
	}
}
