// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Hashing consistent with [`math::eq`](super::math::eq): values that compare
//! equal across numeric representations hash identically. Every number is
//! hashed through the same double projection mixed comparisons use, so
//! longs beyond 2^53 may share a hash bucket with their neighbours.

use std::sync::Arc;

use xxhash_rust::xxh3::Xxh3;

use crate::value::{Value, elements};

const TAG_NULL: u8 = 0;
const TAG_INTEGRAL: u8 = 1;
const TAG_FRACTIONAL: u8 = 2;
const TAG_STRING: u8 = 3;
const TAG_BOOLEAN: u8 = 4;
const TAG_TEMPORAL: u8 = 5;
const TAG_TABLE: u8 = 6;
const TAG_SEQUENCE: u8 = 7;
const TAG_OBJECT: u8 = 8;

pub fn hash_value(value: &Value) -> u64 {
	let mut hasher = Xxh3::new();
	update(&mut hasher, value);
	hasher.digest()
}

/// Hashes a composite key such as a grouping or join key.
pub fn hash_values(values: &[Value]) -> u64 {
	let mut hasher = Xxh3::new();
	for value in values {
		update(&mut hasher, value);
	}
	hasher.digest()
}

fn update(hasher: &mut Xxh3, value: &Value) {
	match value {
		Value::Null => hasher.update(&[TAG_NULL]),
		Value::Boolean(b) => hasher.update(&[TAG_BOOLEAN, *b as u8]),
		Value::Int(v) => float(hasher, *v as f64),
		Value::Long(v) => float(hasher, *v as f64),
		Value::Float(v) => float(hasher, *v as f64),
		Value::Double(v) => float(hasher, *v),
		Value::Decimal(v) => float(hasher, v.to_f64()),
		Value::String(s) => {
			hasher.update(&[TAG_STRING]);
			hasher.update(&(s.len() as u64).to_le_bytes());
			hasher.update(s.as_bytes());
		}
		Value::DateTime(v) => temporal(hasher, v.and_utc().timestamp(), v.and_utc().timestamp_subsec_nanos()),
		Value::DateTimeOffset(v) => temporal(hasher, v.timestamp(), v.timestamp_subsec_nanos()),
		Value::Table(table) => {
			hasher.update(&[TAG_TABLE]);
			hasher.update(&(Arc::as_ptr(table) as *const () as usize).to_le_bytes());
		}
		Value::Array(_) | Value::List(_) | Value::Sequence(_) => {
			hasher.update(&[TAG_SEQUENCE]);
			if let Some(items) = elements(value) {
				// a failing element hashes as null
				for item in items {
					update(hasher, &item.unwrap_or(Value::Null));
				}
			}
		}
		Value::Object(fields) => {
			hasher.update(&[TAG_OBJECT]);
			for (name, value) in fields.iter() {
				hasher.update(name.as_bytes());
				update(hasher, value);
			}
		}
	}
}

fn integral(hasher: &mut Xxh3, value: i64) {
	hasher.update(&[TAG_INTEGRAL]);
	hasher.update(&value.to_le_bytes());
}

fn float(hasher: &mut Xxh3, value: f64) {
	if value.is_finite() && value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
		integral(hasher, value as i64);
	} else {
		hasher.update(&[TAG_FRACTIONAL]);
		// -0.0 and 0.0 are integral above; all NaNs collapse to one bit pattern
		let bits = if value.is_nan() {
			f64::NAN.to_bits()
		} else {
			value.to_bits()
		};
		hasher.update(&bits.to_le_bytes());
	}
}

fn temporal(hasher: &mut Xxh3, seconds: i64, nanos: u32) {
	hasher.update(&[TAG_TEMPORAL]);
	hasher.update(&seconds.to_le_bytes());
	hasher.update(&nanos.to_le_bytes());
}
