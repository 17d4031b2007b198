// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, NaiveDate};
use quarry_core::{
	Column, Decimal, ResolvedType, Schema, Type, Value, ValueVector, ValueVectorRef,
	vector::{
		ColumnData, ColumnDataBuilder, Columns, ConstantVector, SelectedValueVector, SelectionVector, chain,
		read_value,
	},
};

fn sample(ty: Type) -> Value {
	match ty {
		Type::Any => Value::Int(1),
		Type::Boolean => Value::Boolean(true),
		Type::Int => Value::Int(1),
		Type::Long => Value::Long(2),
		Type::Float => Value::Float(1.5),
		Type::Double => Value::Double(2.5),
		Type::Decimal => Value::Decimal(Decimal::parse("1.25").unwrap()),
		Type::String => Value::from("s"),
		Type::DateTime => Value::DateTime(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(10, 0, 0).unwrap()),
		Type::DateTimeOffset => Value::DateTimeOffset(DateTime::parse_from_rfc3339("2020-01-01T10:00:00+02:00").unwrap()),
		Type::Table => Value::Table(
			Columns::new(Schema::of([("x", Type::Int)]), vec![Arc::new(ColumnData::int([1]))]).unwrap().into_ref(),
		),
		Type::Array => Value::Array(Arc::new(ColumnData::int([1, 2]))),
		Type::Object => Value::Object(Arc::new(BTreeMap::from([("k".to_string(), Value::Int(1))]))),
	}
}

/// A literal vector of `ty` holding the sample value followed by a null.
fn literal(ty: Type) -> ValueVectorRef {
	let mut builder = ColumnDataBuilder::new(ty, 2);
	builder.push(sample(ty)).unwrap();
	builder.push(Value::Null).unwrap();
	Arc::new(builder.build())
}

fn implementations(ty: Type) -> Vec<(&'static str, ValueVectorRef)> {
	let selected = SelectedValueVector::new(literal(ty), SelectionVector::new(vec![0, 1])).unwrap();

	let schema = Schema::new(vec![Column::new("c", ResolvedType::of(ty))]);
	let first = Columns::new(schema.clone(), vec![literal(ty)]).unwrap().into_ref();
	let second = Columns::new(schema, vec![literal(ty)]).unwrap().into_ref();
	let chained = chain(vec![first, second]).unwrap().column(0).unwrap();

	vec![
		("literal", literal(ty)),
		("selected", Arc::new(selected) as ValueVectorRef),
		("chained", chained),
		("constant", Arc::new(ConstantVector::new(sample(ty), 2)) as ValueVectorRef),
	]
}

#[test]
fn test_every_type_has_a_working_accessor() {
	for ty in Type::ALL {
		for (name, vector) in implementations(ty) {
			let value = read_value(&*vector, 0).unwrap_or_else(|err| panic!("{} {}: {}", name, ty, err));
			assert_eq!(value, sample(ty), "{} vector of {}", name, ty);
			assert_eq!(vector.get_any(0), sample(ty), "{} vector of {}", name, ty);
		}
	}
}

#[test]
fn test_null_rows_read_as_null() {
	for ty in Type::ALL {
		for (name, vector) in implementations(ty) {
			if name == "constant" {
				continue;
			}
			assert!(vector.is_null(1), "{} vector of {}", name, ty);
			assert_eq!(read_value(&*vector, 1).unwrap(), Value::Null);
		}
	}
}

#[test]
fn test_typed_access_to_null_row_fails() {
	let vector = literal(Type::Int);
	assert!(vector.get_int(1).is_err());
	assert!(vector.get_long(1).is_err());
	assert!(vector.get_string(1).is_err());
}

#[test]
fn test_read_past_end_fails() {
	for ty in Type::ALL {
		for (name, vector) in implementations(ty) {
			assert!(read_value(&*vector, vector.len()).is_err(), "{} vector of {}", name, ty);
		}
	}
}
