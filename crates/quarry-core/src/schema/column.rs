// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::schema::{
	ResolvedType,
	reference::{ColumnReference, TableSourceReference},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
	Regular,
	/// All columns of a schema-less source, discovered at runtime.
	Asterisk,
	/// A named column of a schema-less source, resolved by name at runtime.
	NamedAsterisk,
	/// A table-typed column holding the joined rows of a populating join.
	Populated,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnMetadata {
	pub nullable: bool,
	pub precision: Option<u32>,
	pub scale: Option<u32>,
}

impl Default for ColumnMetadata {
	fn default() -> Self {
		Self {
			nullable: true,
			precision: None,
			scale: None,
		}
	}
}

/// One column of a [`Schema`](crate::schema::Schema). Immutable; every change
/// goes through [`Column::to_builder`] and produces a new column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
	name: Arc<str>,
	ty: ResolvedType,
	metadata: ColumnMetadata,
	column_type: ColumnType,
	output_name: Option<Arc<str>>,
	internal: bool,
	reference: Option<ColumnReference>,
}

impl Column {
	pub fn new(name: impl AsRef<str>, ty: impl Into<ResolvedType>) -> Self {
		Self::builder(name, ty).build()
	}

	pub fn builder(name: impl AsRef<str>, ty: impl Into<ResolvedType>) -> ColumnBuilder {
		ColumnBuilder {
			column: Column {
				name: Arc::from(name.as_ref()),
				ty: ty.into(),
				metadata: ColumnMetadata::default(),
				column_type: ColumnType::Regular,
				output_name: None,
				internal: false,
				reference: None,
			},
		}
	}

	/// Placeholder meaning all columns of `source`, unknown until runtime.
	pub fn asterisk(
		alias: impl AsRef<str>,
		ty: impl Into<ResolvedType>,
		source: Option<Arc<TableSourceReference>>,
	) -> Self {
		let alias = alias.as_ref();
		let mut builder = Self::builder(alias, ty).column_type(ColumnType::Asterisk);
		if let Some(source) = source {
			builder = builder.reference(ColumnReference::new(alias, source));
		}
		builder.build()
	}

	/// A column of a schema-less source referenced by `name` during planning.
	pub fn named_asterisk(name: impl AsRef<str>, source: Arc<TableSourceReference>) -> Self {
		let name = name.as_ref();
		Self::builder(name, quarry_type::Type::Any)
			.column_type(ColumnType::NamedAsterisk)
			.reference(ColumnReference::new(name, source))
			.build()
	}

	pub fn to_builder(&self) -> ColumnBuilder {
		ColumnBuilder {
			column: self.clone(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Display name; defaults to the schema name.
	pub fn output_name(&self) -> &str {
		self.output_name.as_deref().unwrap_or(&self.name)
	}

	pub fn ty(&self) -> &ResolvedType {
		&self.ty
	}

	pub fn metadata(&self) -> &ColumnMetadata {
		&self.metadata
	}

	pub fn column_type(&self) -> ColumnType {
		self.column_type
	}

	pub fn is_internal(&self) -> bool {
		self.internal
	}

	pub fn is_asterisk(&self) -> bool {
		matches!(self.column_type, ColumnType::Asterisk | ColumnType::NamedAsterisk)
	}

	pub fn reference(&self) -> Option<&ColumnReference> {
		self.reference.as_ref()
	}

	pub fn table_source(&self) -> Option<&Arc<TableSourceReference>> {
		self.reference.as_ref().map(ColumnReference::table_source)
	}

	/// Re-points this column at `source`. Existing provenance becomes the
	/// lineage of `source`, so repeated rewrites accumulate without cycles.
	pub fn change_table_source(&self, source: &Arc<TableSourceReference>) -> Column {
		let reference = match &self.reference {
			None => ColumnReference::new(&*self.name, source.clone()),
			Some(existing) if existing.table_source().id() == source.id() => existing.clone(),
			Some(existing) => existing.with_table_source(source.with_parent(existing.table_source())),
		};
		self.to_builder().reference(reference).build()
	}
}

/// Copy-on-write builder for [`Column`].
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
	column: Column,
}

impl ColumnBuilder {
	pub fn name(mut self, name: impl AsRef<str>) -> Self {
		self.column.name = Arc::from(name.as_ref());
		self
	}

	pub fn ty(mut self, ty: impl Into<ResolvedType>) -> Self {
		self.column.ty = ty.into();
		self
	}

	pub fn metadata(mut self, metadata: ColumnMetadata) -> Self {
		self.column.metadata = metadata;
		self
	}

	pub fn column_type(mut self, column_type: ColumnType) -> Self {
		self.column.column_type = column_type;
		self
	}

	pub fn output_name(mut self, output_name: impl AsRef<str>) -> Self {
		self.column.output_name = Some(Arc::from(output_name.as_ref()));
		self
	}

	pub fn internal(mut self, internal: bool) -> Self {
		self.column.internal = internal;
		self
	}

	pub fn reference(mut self, reference: ColumnReference) -> Self {
		self.column.reference = Some(reference);
		self
	}

	pub fn build(self) -> Column {
		self.column
	}
}
