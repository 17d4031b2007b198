// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use quarry_core::{
	Schema, TupleVector, TupleVectorRef, Type, Value, ValueVector,
	vector::{ColumnData, Columns, chain},
};

fn tv1() -> TupleVectorRef {
	Columns::new(
		Schema::of([("col1", Type::Int), ("col2", Type::Boolean)]),
		vec![
			Arc::new(ColumnData::int([1, 2, 3])),
			Arc::new(ColumnData::boolean_optional([None, Some(true), Some(false)])),
		],
	)
	.unwrap()
	.into_ref()
}

fn tv2() -> TupleVectorRef {
	Columns::new(
		Schema::of([("col1", Type::Int)]),
		vec![Arc::new(ColumnData::int_optional([Some(10), None, Some(30)]))],
	)
	.unwrap()
	.into_ref()
}

fn tv3() -> TupleVectorRef {
	Columns::new(
		Schema::of([("col1", Type::Int), ("col2", Type::Boolean), ("col3", Type::String)]),
		vec![
			Arc::new(ColumnData::int_optional([Some(100), None])),
			Arc::new(ColumnData::boolean([true, false])),
			Arc::new(ColumnData::string(["hello", "world"])),
		],
	)
	.unwrap()
	.into_ref()
}

fn values(vector: &dyn ValueVector) -> Vec<Value> {
	(0..vector.len()).map(|row| vector.get_any(row)).collect()
}

#[test]
fn test_chain_three_vectors() {
	let chained = chain(vec![tv1(), tv2(), tv3()]).unwrap();
	assert_eq!(chained.row_count(), 8);
	assert_eq!(chained.schema().len(), 3);

	let col1 = chained.column_by_name("col1").unwrap();
	assert_eq!(
		values(&*col1),
		vec![
			Value::Int(1),
			Value::Int(2),
			Value::Int(3),
			Value::Int(10),
			Value::Null,
			Value::Int(30),
			Value::Int(100),
			Value::Null,
		]
	);

	let col2 = chained.column(1).unwrap();
	assert!(col2.is_null(0));
	assert!(col2.get_boolean(1).unwrap());
	assert!(col2.is_null(3));
	assert!(col2.is_null(5));
	assert!(col2.get_boolean(6).unwrap());

	let col3 = chained.column(2).unwrap();
	for row in 0..6 {
		assert!(col3.is_null(row), "row {} should be null", row);
	}
	assert_eq!(&*col3.get_string(6).unwrap(), "hello");
	assert_eq!(&*col3.get_string(7).unwrap(), "world");
}

#[test]
fn test_chain_random_access() {
	let chained = chain(vec![tv1(), tv2(), tv3()]).unwrap();
	assert_eq!(chained.column(0).unwrap().get_int(0).unwrap(), 1);
	assert_eq!(&*chained.column(2).unwrap().get_string(7).unwrap(), "world");
	assert_eq!(chained.column(0).unwrap().get_int(5).unwrap(), 30);
	assert!(chained.column(2).unwrap().get_string(3).is_err());
}

#[test]
fn test_chain_uses_widest_schema_instance() {
	let widest = tv3();
	let chained = chain(vec![tv1(), widest.clone()]).unwrap();
	assert!(chained.schema().ptr_eq(widest.schema()));
}

#[test]
fn test_chain_rejects_reordered_columns() {
	let reordered = Columns::new(
		Schema::of([("col2", Type::Boolean), ("col1", Type::Int)]),
		vec![Arc::new(ColumnData::boolean([true])), Arc::new(ColumnData::int([1]))],
	)
	.unwrap()
	.into_ref();
	let err = chain(vec![tv1(), reordered]).unwrap_err();
	assert!(err.message().contains("common sub set of columns"));
	assert_eq!(err.code(), "VECTOR_001");
}

#[test]
fn test_chain_rejects_type_mismatch() {
	let longs = Columns::new(Schema::of([("col1", Type::Long)]), vec![Arc::new(ColumnData::long([1]))])
		.unwrap()
		.into_ref();
	assert!(chain(vec![tv1(), longs]).is_err());
}

#[test]
fn test_chain_matches_names_case_insensitively() {
	let upper = Columns::new(Schema::of([("COL1", Type::Int)]), vec![Arc::new(ColumnData::int([7]))])
		.unwrap()
		.into_ref();
	let chained = chain(vec![tv1(), upper]).unwrap();
	assert_eq!(chained.row_count(), 4);
	assert_eq!(chained.column(0).unwrap().get_int(3).unwrap(), 7);
}

#[test]
fn test_chain_rejects_vectors_without_columns() {
	let err = chain(vec![Columns::with_row_count(2).into_ref(), Columns::with_row_count(3).into_ref()]).unwrap_err();
	assert_eq!(err.code(), "VECTOR_001");
	assert!(err.message().contains("common sub set of columns"));

	let shared = Columns::with_row_count(1).into_ref();
	assert!(chain(vec![shared.clone(), shared]).is_err());
}
