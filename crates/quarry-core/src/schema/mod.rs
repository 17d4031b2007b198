// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Display, Formatter},
	sync::Arc,
};

use once_cell::sync::Lazy;
use quarry_type::Type;

mod column;
mod reference;

pub use column::{Column, ColumnBuilder, ColumnMetadata, ColumnType};
pub use reference::{
	ColumnReference, ColumnReferenceBuilder, SourceType, TableSourceReference, TableSourceReferenceBuilder,
};

/// A type together with the nested structure of complex types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
	ty: Type,
	schema: Option<Schema>,
	sub_type: Option<Box<ResolvedType>>,
}

impl ResolvedType {
	pub fn of(ty: Type) -> Self {
		Self {
			ty,
			schema: None,
			sub_type: None,
		}
	}

	pub fn table(schema: Schema) -> Self {
		Self {
			ty: Type::Table,
			schema: Some(schema),
			sub_type: None,
		}
	}

	pub fn array(sub_type: ResolvedType) -> Self {
		Self {
			ty: Type::Array,
			schema: None,
			sub_type: Some(Box::new(sub_type)),
		}
	}

	pub fn ty(&self) -> Type {
		self.ty
	}

	pub fn schema(&self) -> Option<&Schema> {
		self.schema.as_ref()
	}

	pub fn sub_type(&self) -> Option<&ResolvedType> {
		self.sub_type.as_deref()
	}
}

impl From<Type> for ResolvedType {
	fn from(ty: Type) -> Self {
		ResolvedType::of(ty)
	}
}

impl Display for ResolvedType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match (&self.schema, &self.sub_type) {
			(Some(schema), _) => write!(f, "{}{}", self.ty, schema),
			(_, Some(sub_type)) => write!(f, "{}<{}>", self.ty, sub_type),
			_ => write!(f, "{}", self.ty),
		}
	}
}

static EMPTY: Lazy<Schema> = Lazy::new(|| Schema(Arc::new(Vec::new())));

/// Ordered, immutable list of columns. Cloning shares the column list.
#[derive(Debug, Clone, Eq)]
pub struct Schema(Arc<Vec<Column>>);

impl Schema {
	pub fn new(columns: Vec<Column>) -> Self {
		Self(Arc::new(columns))
	}

	pub fn empty() -> Self {
		EMPTY.clone()
	}

	pub fn of(columns: impl IntoIterator<Item = (&'static str, Type)>) -> Self {
		Self::new(columns.into_iter().map(|(name, ty)| Column::new(name, ty)).collect())
	}

	pub fn columns(&self) -> &[Column] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&Column> {
		self.0.get(index)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Column> {
		self.0.iter()
	}

	/// Case-insensitive lookup by schema name.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.0.iter().position(|column| column.name().eq_ignore_ascii_case(name))
	}

	/// True when both schemas are the same shared instance.
	pub fn ptr_eq(&self, other: &Schema) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	/// The one table source every column is read from, if there is one.
	pub fn table_source(&self) -> Option<Arc<TableSourceReference>> {
		let mut found: Option<&Arc<TableSourceReference>> = None;
		for column in self.0.iter() {
			let source = column.table_source()?;
			match found {
				Some(existing) if existing.id() != source.id() => return None,
				Some(_) => {}
				None => found = Some(source),
			}
		}
		found.cloned()
	}

	/// Whether the columns of this schema are only known at runtime.
	pub fn is_asterisk(&self) -> bool {
		if self.is_empty() {
			return true;
		}
		self.0.iter().any(|column| {
			if column.is_asterisk() {
				return true;
			}
			let nested = column.column_type() == ColumnType::Populated
				|| (column.is_internal() && column.ty().ty() == Type::Table);
			nested && column.ty().schema().is_some_and(Schema::is_asterisk)
		})
	}
}

impl PartialEq for Schema {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other) || self.0 == other.0
	}
}

impl Display for Schema {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("(")?;
		for (i, column) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}: {}", column.name(), column.ty())?;
		}
		f.write_str(")")
	}
}

impl FromIterator<Column> for Schema {
	fn from_iter<T: IntoIterator<Item = Column>>(iter: T) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

/// See [`Schema::table_source`].
pub fn get_table_source(schema: &Schema) -> Option<Arc<TableSourceReference>> {
	schema.table_source()
}

/// See [`Schema::is_asterisk`].
pub fn is_asterisk(schema: &Schema) -> bool {
	schema.is_asterisk()
}
