// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

use quarry_core::{TupleVectorRef, Value};
use quarry_type::Result;

use crate::{
	error::EvalError,
	interface::{CacheProvider, Session},
};

/// The flattened composite row: one slot per table alias ordinal, each
/// holding a tuple vector and the row within it.
#[derive(Clone, Default)]
pub struct TupleRow {
	slots: Vec<Option<(TupleVectorRef, usize)>>,
}

impl TupleRow {
	pub fn new(width: usize) -> Self {
		Self {
			slots: vec![None; width],
		}
	}

	pub fn set(&mut self, ordinal: usize, tuple: TupleVectorRef, row: usize) {
		if ordinal >= self.slots.len() {
			self.slots.resize(ordinal + 1, None);
		}
		self.slots[ordinal] = Some((tuple, row));
	}

	pub fn clear(&mut self, ordinal: usize) {
		if let Some(slot) = self.slots.get_mut(ordinal) {
			*slot = None;
		}
	}

	pub fn get(&self, ordinal: usize) -> Option<(&TupleVectorRef, usize)> {
		self.slots.get(ordinal).and_then(|slot| slot.as_ref()).map(|(tuple, row)| (tuple, *row))
	}

	pub fn width(&self) -> usize {
		self.slots.len()
	}
}

impl Debug for TupleRow {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list()
			.entries(self.slots.iter().map(|slot| slot.as_ref().map(|(tuple, row)| (tuple.row_count(), *row))))
			.finish()
	}
}

#[derive(Debug)]
struct Binding {
	name: Arc<str>,
	value: Value,
	parent: Option<Arc<Binding>>,
}

/// Per-row evaluation state. Cloning is cheap; lambda invocations bind their
/// argument into a child context without touching the parent.
#[derive(Clone, Default)]
pub struct ExecutionContext {
	tuple: Option<TupleVectorRef>,
	row: usize,
	tuple_row: Arc<TupleRow>,
	bindings: Option<Arc<Binding>>,
	depth: usize,
	session: Option<Arc<dyn Session>>,
	cache: Option<Arc<dyn CacheProvider>>,
}

impl ExecutionContext {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_session(mut self, session: Arc<dyn Session>) -> Self {
		self.session = Some(session);
		self
	}

	pub fn with_cache(mut self, cache: Arc<dyn CacheProvider>) -> Self {
		self.cache = Some(cache);
		self
	}

	/// Binds `tuple` as the current input, positioned at row 0.
	pub fn with_tuple(mut self, tuple: TupleVectorRef) -> Self {
		self.tuple = Some(tuple);
		self.row = 0;
		self
	}

	pub fn with_tuple_row(mut self, tuple_row: TupleRow) -> Self {
		self.tuple_row = Arc::new(tuple_row);
		self
	}

	pub fn set_row(&mut self, row: usize) {
		self.row = row;
	}

	pub fn at_row(&self, row: usize) -> Self {
		let mut ctx = self.clone();
		ctx.row = row;
		ctx
	}

	pub fn tuple(&self) -> Option<&TupleVectorRef> {
		self.tuple.as_ref()
	}

	pub fn row(&self) -> usize {
		self.row
	}

	pub fn tuple_row(&self) -> &TupleRow {
		&self.tuple_row
	}

	pub fn session(&self) -> Option<&Arc<dyn Session>> {
		self.session.as_ref()
	}

	pub fn cache(&self) -> Option<&Arc<dyn CacheProvider>> {
		self.cache.as_ref()
	}

	pub fn is_aborted(&self) -> bool {
		self.session.as_ref().is_some_and(|session| session.abort_requested())
	}

	/// A child context with `name` bound to `value`.
	pub fn bind(&self, name: Arc<str>, value: Value) -> Self {
		let mut ctx = self.clone();
		ctx.bindings = Some(Arc::new(Binding {
			name,
			value,
			parent: self.bindings.clone(),
		}));
		ctx.depth += 1;
		ctx
	}

	/// Number of lambda bindings in scope.
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Innermost binding named `name`, matched case-insensitively.
	pub fn lookup(&self, name: &str) -> Option<&Value> {
		let mut current = self.bindings.as_deref();
		while let Some(binding) = current {
			if binding.name.eq_ignore_ascii_case(name) {
				return Some(&binding.value);
			}
			current = binding.parent.as_deref();
		}
		None
	}

	/// The binding `distance` levels out from the innermost one.
	pub fn binding_at(&self, distance: usize) -> Option<&Value> {
		let mut current = self.bindings.as_deref();
		for _ in 0..distance {
			current = current?.parent.as_deref();
		}
		current.map(|binding| &binding.value)
	}

	/// Reads a column of the current row. Columns the tuple does not have
	/// read as null, as do rows of schema-less sources without that column.
	pub fn column_value(&self, ordinal: Option<usize>, name: &str, index: Option<usize>) -> Result<Value> {
		let (tuple, row) = match ordinal {
			Some(ordinal) => match self.tuple_row.get(ordinal) {
				Some(slot) => slot,
				None => {
					return Err(EvalError::UnboundOrdinal {
						ordinal,
					}
					.into());
				}
			},
			None => match &self.tuple {
				Some(tuple) => (tuple, self.row),
				None => return Ok(Value::Null),
			},
		};
		let schema = tuple.schema();
		let index = index
			.filter(|&i| schema.get(i).is_some_and(|column| column.name().eq_ignore_ascii_case(name)))
			.or_else(|| schema.index_of(name));
		Ok(index.and_then(|i| tuple.column(i)).map(|vector| vector.get_any(row)).unwrap_or(Value::Null))
	}
}

impl Debug for ExecutionContext {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ExecutionContext")
			.field("row", &self.row)
			.field("tuple_row", &self.tuple_row)
			.field("depth", &self.depth)
			.finish()
	}
}
