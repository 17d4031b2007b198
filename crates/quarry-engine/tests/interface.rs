// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use quarry_core::{
	Column, Schema, TableAliasTree, TupleVectorRef, Type, Value, ValueVectorRef,
	vector::{ColumnData, Columns},
};
use quarry_engine::{
	CompiledQuery, EngineBuilder, Evaluator, ExecutionContext, Expression,
	interface::{
		Catalog, DefaultSession, FilterOperator, Index, JsonOutputWriter, MemoryCatalog, Operator, ProjectOperator,
		ScanRequest, SeekPredicate, SortItem, VectorOperator, drain,
	},
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

fn orders_schema() -> Schema {
	Schema::of([("id", Type::Int), ("customer", Type::String), ("amount", Type::Double)])
}

fn batch(ids: &[i32], customers: &[&str], amounts: &[Option<f64>]) -> TupleVectorRef {
	Columns::new(
		orders_schema(),
		vec![
			Arc::new(ColumnData::int(ids.iter().copied())) as ValueVectorRef,
			Arc::new(ColumnData::string(customers.iter().copied())),
			Arc::new(ColumnData::double_optional(amounts.iter().copied())),
		],
	)
	.unwrap()
	.into_ref()
}

fn catalog(batch_size: usize) -> MemoryCatalog {
	let mut catalog = MemoryCatalog::with_config("mem", EngineBuilder::new().batch_size(batch_size).build());
	catalog.register(
		"orders",
		orders_schema(),
		vec![
			batch(&[1, 2, 3], &["ann", "bob", "ann"], &[Some(10.0), Some(99.5), None]),
			batch(&[4, 5], &["cid", "bob"], &[Some(42.0), Some(7.25)]),
		],
	);
	assert!(catalog.add_index("orders", Index::new(["customer"])));
	catalog
}

fn query() -> (CompiledQuery, ScanRequest) {
	let mut builder = TableAliasTree::builder();
	let root = builder.root();
	let orders = builder.table(root, "orders", "o").unwrap();
	let query = CompiledQuery::new(EngineBuilder::new().build(), builder.build());
	let request = ScanRequest::for_alias(query.alias(orders).unwrap()).unwrap();
	(query, request)
}

fn collect(operator: &mut dyn Operator, ctx: &ExecutionContext) -> serde_json::Value {
	let mut writer = JsonOutputWriter::new();
	drain(operator, ctx, &mut writer).unwrap();
	writer.into_json()
}

#[test]
fn test_scan_with_pushed_down_predicate_and_sort() {
	init_tracing();
	let (query, request) = query();
	let request = request
		.with_predicate(Expression::greater_than(Expression::column("amount"), Expression::literal(8.0)))
		.with_sort_item(SortItem::descending(Expression::column("amount")));
	let ctx = query.context(None, None);

	let mut operator = catalog(100).scan(&ctx, &request).unwrap();
	assert_eq!(
		collect(operator.as_mut(), &ctx),
		json!([
			{"id": 2, "customer": "bob", "amount": 99.5},
			{"id": 4, "customer": "cid", "amount": 42.0},
			{"id": 1, "customer": "ann", "amount": 10.0},
		])
	);
}

#[test]
fn test_scan_respects_batch_size() {
	let (query, request) = query();
	let ctx = query.context(None, None);
	let mut operator = catalog(2).scan(&ctx, &request).unwrap();
	let mut sizes = Vec::new();
	while let Some(batch) = operator.next_batch(&ctx).unwrap() {
		sizes.push(batch.row_count());
	}
	assert_eq!(sizes, vec![2, 2, 1]);
}

#[test]
fn test_sort_nulls_last() {
	let (query, request) = query();
	let mut item = SortItem::ascending(Expression::column("amount"));
	item.nulls_last = true;
	let ctx = query.context(None, None);
	let mut operator = catalog(100).scan(&ctx, &request.with_sort_item(item)).unwrap();
	let rows = collect(operator.as_mut(), &ctx);
	let ids: Vec<_> = rows.as_array().unwrap().iter().map(|row| row["id"].clone()).collect();
	assert_eq!(ids, vec![json!(5), json!(1), json!(4), json!(2), json!(3)]);
}

#[test]
fn test_seek_through_index() {
	let (query, request) = query();
	let catalog = catalog(100);
	assert_eq!(catalog.indices(request.name()), vec![Index::new(["customer"])]);

	let ctx = query.context(None, None);
	let seek = SeekPredicate {
		index: Index::new(["CUSTOMER"]),
		keys: vec![vec![Value::from("bob")], vec![Value::from("cid")]],
	};
	let mut operator = catalog.seek(&ctx, &request, &seek).unwrap();
	let rows = collect(operator.as_mut(), &ctx);
	let ids: Vec<_> = rows.as_array().unwrap().iter().map(|row| row["id"].clone()).collect();
	assert_eq!(ids, vec![json!(2), json!(4), json!(5)]);

	let unknown = SeekPredicate {
		index: Index::new(["amount"]),
		keys: vec![],
	};
	assert_eq!(catalog.seek(&ctx, &request, &unknown).err().unwrap().code(), "CATALOG_002");
}

#[test]
fn test_unknown_table() {
	let (query, _) = query();
	let ctx = query.context(None, None);
	let request = ScanRequest::new(
		quarry_core::TableSourceReference::builder(9, quarry_core::SourceType::Table)
			.name("nope")
			.alias("n")
			.build()
			.unwrap(),
	);
	assert_eq!(catalog(10).scan(&ctx, &request).err().unwrap().code(), "CATALOG_001");
}

#[test]
fn test_project_and_filter_operators() {
	let (query, _) = query();
	let ctx = query.context(None, None);
	let source = VectorOperator::new(orders_schema(), vec![batch(&[1, 2], &["ann", "bob"], &[Some(1.5), None])]);
	let filter = FilterOperator::new(
		Box::new(source),
		query.evaluator(&Expression::is_null(Expression::column("amount"))).unwrap(),
	);
	let mut project = ProjectOperator::new(
		Box::new(filter),
		vec![(
			Column::new("label", Type::Any),
			query
				.evaluator(&Expression::builtin(
					quarry_engine::Builtin::Concat,
					vec![Expression::column("customer"), Expression::literal("#"), Expression::column("id")],
				))
				.unwrap(),
		)],
	);
	assert_eq!(collect(&mut project, &ctx), json!([{"label": "bob#2"}]));
}

#[test]
fn test_drain_stops_on_abort() {
	let session = Arc::new(DefaultSession::new("mem"));
	let (query, request) = query();
	let ctx = query.context(Some(session.clone()), None);
	let mut operator = catalog(1).scan(&ctx, &request).unwrap();

	// one batch is pulled before the abort lands
	let first = operator.next_batch(&ctx).unwrap().unwrap();
	assert_eq!(first.row_count(), 1);
	session.abort();

	let mut writer = JsonOutputWriter::new();
	let err = drain(operator.as_mut(), &ctx, &mut writer).unwrap_err();
	assert_eq!(err.code(), "EVAL_003");
	assert!(writer.rows().is_empty());
}

#[test]
fn test_compiled_query_caches_evaluators() {
	let (query, _) = query();
	let expression = Expression::greater_than(Expression::column("id"), Expression::literal(1));
	let first = query.evaluator(&expression).unwrap();
	let second = query.evaluator(&expression).unwrap();
	assert!(first.is_compiled());
	assert!(matches!((&first, &second), (Evaluator::Compiled(a), Evaluator::Compiled(b)) if Arc::ptr_eq(a, b)));
	assert_eq!(query.expression_cache().hits(), 1);
	assert_eq!(query.context(None, None).tuple_row().width(), query.aliases().len());
}
