// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	collections::{BTreeMap, HashMap},
	sync::Arc,
};

use quarry_core::{
	Schema, TableAlias, TableSourceReference, TupleVector, TupleVectorRef, Value, ValueVectorRef,
	value::math,
	vector::{SelectedTupleVector, SelectionVector, chain},
};
use quarry_type::{QualifiedName, Result};
use tracing::{debug, instrument};

use crate::{
	config::EngineConfig,
	error::CatalogError,
	evaluate::{Evaluator, ExecutionContext},
	expression::Expression,
	interface::operator::{Operator, VectorOperator},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
	#[default]
	Ascending,
	Descending,
}

#[derive(Debug, Clone)]
pub struct SortItem {
	pub expression: Expression,
	pub order: SortOrder,
	pub nulls_last: bool,
}

impl SortItem {
	pub fn ascending(expression: Expression) -> Self {
		Self {
			expression,
			order: SortOrder::Ascending,
			nulls_last: false,
		}
	}

	pub fn descending(expression: Expression) -> Self {
		Self {
			expression,
			order: SortOrder::Descending,
			nulls_last: false,
		}
	}
}

/// A scan of one table source with the predicates, sort items and options
/// planning pushed down to the catalog.
#[derive(Debug, Clone)]
pub struct ScanRequest {
	pub table_source: Arc<TableSourceReference>,
	pub predicates: Vec<Expression>,
	pub sort_items: Vec<SortItem>,
	pub options: BTreeMap<String, Value>,
}

impl ScanRequest {
	pub fn new(table_source: Arc<TableSourceReference>) -> Self {
		Self {
			table_source,
			predicates: Vec::new(),
			sort_items: Vec::new(),
			options: BTreeMap::new(),
		}
	}

	/// A request for the table an alias node refers to. The root has none.
	pub fn for_alias(alias: TableAlias<'_>) -> Option<Self> {
		alias.table_source().map(Self::new)
	}

	pub fn with_predicate(mut self, predicate: Expression) -> Self {
		self.predicates.push(predicate);
		self
	}

	pub fn with_sort_item(mut self, item: SortItem) -> Self {
		self.sort_items.push(item);
		self
	}

	pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.options.insert(key.into(), value.into());
		self
	}

	pub fn name(&self) -> &QualifiedName {
		self.table_source.name()
	}
}

/// An index a catalog can seek on, identified by its column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
	columns: Vec<String>,
}

impl Index {
	pub fn new<S: AsRef<str>>(columns: impl IntoIterator<Item = S>) -> Self {
		Self {
			columns: columns.into_iter().map(|c| c.as_ref().to_string()).collect(),
		}
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	/// True when `columns` names the same set of columns, ignoring case and
	/// order.
	pub fn covers<S: AsRef<str>>(&self, columns: &[S]) -> bool {
		columns.len() == self.columns.len()
			&& columns.iter().all(|c| self.columns.iter().any(|own| own.eq_ignore_ascii_case(c.as_ref())))
	}
}

/// Outer key values to look up through an index, one value per index column.
#[derive(Debug, Clone)]
pub struct SeekPredicate {
	pub index: Index,
	pub keys: Vec<Vec<Value>>,
}

pub trait Catalog: Send + Sync {
	fn alias(&self) -> &str;

	fn schema(&self, name: &QualifiedName) -> Result<Schema>;

	fn scan(&self, ctx: &ExecutionContext, request: &ScanRequest) -> Result<Box<dyn Operator>>;

	fn indices(&self, _name: &QualifiedName) -> Vec<Index> {
		Vec::new()
	}

	fn seek(&self, _ctx: &ExecutionContext, request: &ScanRequest, seek: &SeekPredicate) -> Result<Box<dyn Operator>> {
		Err(CatalogError::UnknownIndex {
			catalog: self.alias().to_string(),
			name: request.name().to_string(),
			columns: seek.index.columns().join(", "),
		}
		.into())
	}
}

#[derive(Debug)]
struct MemoryTable {
	schema: Schema,
	batches: Vec<TupleVectorRef>,
	indices: Vec<Index>,
}

/// A catalog over in-memory tuple vectors. Predicates and sort items are
/// applied by the catalog itself; results are returned in batches of the
/// configured size.
#[derive(Debug)]
pub struct MemoryCatalog {
	alias: String,
	config: EngineConfig,
	tables: HashMap<String, MemoryTable>,
}

impl MemoryCatalog {
	pub fn new(alias: impl Into<String>) -> Self {
		Self::with_config(alias, EngineConfig::default())
	}

	pub fn with_config(alias: impl Into<String>, config: EngineConfig) -> Self {
		Self {
			alias: alias.into(),
			config,
			tables: HashMap::new(),
		}
	}

	pub fn register(&mut self, name: &str, schema: Schema, batches: Vec<TupleVectorRef>) {
		self.tables.insert(
			name.to_lowercase(),
			MemoryTable {
				schema,
				batches,
				indices: Vec::new(),
			},
		);
	}

	/// Declares an index; returns false for an unknown table.
	pub fn add_index(&mut self, name: &str, index: Index) -> bool {
		match self.tables.get_mut(&name.to_lowercase()) {
			Some(table) => {
				table.indices.push(index);
				true
			}
			None => false,
		}
	}

	fn table(&self, name: &QualifiedName) -> Result<&MemoryTable> {
		self.tables.get(&name.to_string().to_lowercase()).ok_or_else(|| {
			CatalogError::UnknownTable {
				catalog: self.alias.clone(),
				name: name.to_string(),
			}
			.into()
		})
	}

	fn open(
		&self,
		ctx: &ExecutionContext,
		request: &ScanRequest,
		seek: Option<&SeekPredicate>,
	) -> Result<Box<dyn Operator>> {
		let table = self.table(request.name())?;
		let mut tuple = chain(table.batches.clone())?;
		if let Some(seek) = seek {
			let selection = seek_rows(tuple.as_ref(), seek)?;
			tuple = Arc::new(SelectedTupleVector::new(tuple, selection)?) as TupleVectorRef;
		}
		for predicate in &request.predicates {
			tuple = Evaluator::build(predicate, &self.config)?.filter(ctx, &tuple)?;
		}
		if !request.sort_items.is_empty() {
			tuple = self.sort(ctx, tuple, &request.sort_items)?;
		}

		let batch_size = self.config.batch_size.max(1);
		let rows = tuple.row_count();
		let batches = if rows <= batch_size {
			vec![tuple]
		} else {
			(0..rows)
				.step_by(batch_size)
				.map(|start| {
					let selection = SelectionVector::with_range(start..(start + batch_size).min(rows));
					Ok(Arc::new(SelectedTupleVector::new(tuple.clone(), selection)?) as TupleVectorRef)
				})
				.collect::<Result<Vec<_>>>()?
		};
		debug!(table = %request.name(), rows, batches = batches.len(), "opened memory table");
		Ok(Box::new(VectorOperator::new(table.schema.clone(), batches)))
	}

	fn sort(&self, ctx: &ExecutionContext, tuple: TupleVectorRef, items: &[SortItem]) -> Result<TupleVectorRef> {
		let keys = items
			.iter()
			.map(|item| Evaluator::build(&item.expression, &self.config)?.eval_vector(ctx, &tuple))
			.collect::<Result<Vec<ValueVectorRef>>>()?;

		let mut failure = None;
		let mut indices: Vec<usize> = (0..tuple.row_count()).collect();
		indices.sort_by(|&a, &b| {
			for (item, key) in items.iter().zip(keys.iter()) {
				let (left, right) = (key.get_any(a), key.get_any(b));
				let ordering = match (left.is_null(), right.is_null(), item.nulls_last) {
					(true, false, true) | (false, true, false) => Ordering::Greater,
					(true, false, false) | (false, true, true) => Ordering::Less,
					(true, true, _) => Ordering::Equal,
					_ => match math::cmp(&left, &right) {
						Ok(ordering) if item.order == SortOrder::Descending => ordering.reverse(),
						Ok(ordering) => ordering,
						Err(err) => {
							failure.get_or_insert(err);
							Ordering::Equal
						}
					},
				};
				if ordering != Ordering::Equal {
					return ordering;
				}
			}
			Ordering::Equal
		});
		if let Some(err) = failure {
			return Err(err);
		}
		Ok(Arc::new(SelectedTupleVector::new(tuple, SelectionVector::new(indices))?) as TupleVectorRef)
	}
}

fn seek_rows(tuple: &dyn TupleVector, seek: &SeekPredicate) -> Result<SelectionVector> {
	let columns: Vec<Option<ValueVectorRef>> = seek.index.columns().iter().map(|name| tuple.column_by_name(name)).collect();
	for key in &seek.keys {
		if key.len() != columns.len() {
			return Err(CatalogError::SeekKeyArity {
				expected: columns.len(),
				actual: key.len(),
			}
			.into());
		}
	}

	let mut rows = Vec::new();
	for row in 0..tuple.row_count() {
		let values: Vec<Value> = columns
			.iter()
			.map(|column| column.as_ref().map(|c| c.get_any(row)).unwrap_or(Value::Null))
			.collect();
		for key in &seek.keys {
			let mut matched = true;
			for (value, wanted) in values.iter().zip(key.iter()) {
				if !math::eq(value, wanted)? {
					matched = false;
					break;
				}
			}
			if matched {
				rows.push(row);
				break;
			}
		}
	}
	Ok(SelectionVector::new(rows))
}

impl Catalog for MemoryCatalog {
	fn alias(&self) -> &str {
		&self.alias
	}

	fn schema(&self, name: &QualifiedName) -> Result<Schema> {
		Ok(self.table(name)?.schema.clone())
	}

	#[instrument(name = "engine::catalog::scan", level = "debug", skip_all, fields(table = %request.name()))]
	fn scan(&self, ctx: &ExecutionContext, request: &ScanRequest) -> Result<Box<dyn Operator>> {
		self.open(ctx, request, None)
	}

	fn indices(&self, name: &QualifiedName) -> Vec<Index> {
		self.table(name).map(|table| table.indices.clone()).unwrap_or_default()
	}

	#[instrument(name = "engine::catalog::seek", level = "debug", skip_all, fields(table = %request.name()))]
	fn seek(&self, ctx: &ExecutionContext, request: &ScanRequest, seek: &SeekPredicate) -> Result<Box<dyn Operator>> {
		let table = self.table(request.name())?;
		if !table.indices.iter().any(|index| index.covers(seek.index.columns())) {
			return Err(CatalogError::UnknownIndex {
				catalog: self.alias.clone(),
				name: request.name().to_string(),
				columns: seek.index.columns().join(", "),
			}
			.into());
		}
		self.open(ctx, request, Some(seek))
	}
}
