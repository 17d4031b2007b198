// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Display, Formatter},
	sync::Arc,
};

use quarry_type::QualifiedName;
use serde::{Deserialize, Serialize};

use crate::{
	error::ConstructionError,
	schema::column::ColumnMetadata,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
	Table,
	Function,
	Expression,
	Subquery,
}

/// Identity of one table source in a query. `id` is stable across planning
/// rewrites; `parent` links to the source this one was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSourceReference {
	id: usize,
	ty: SourceType,
	catalog_alias: Arc<str>,
	name: QualifiedName,
	alias: Arc<str>,
	parent: Option<Arc<TableSourceReference>>,
}

impl TableSourceReference {
	pub fn builder(id: usize, ty: SourceType) -> TableSourceReferenceBuilder {
		TableSourceReferenceBuilder {
			id,
			ty,
			catalog_alias: None,
			name: None,
			alias: None,
			parent: None,
		}
	}

	pub fn id(&self) -> usize {
		self.id
	}

	pub fn ty(&self) -> SourceType {
		self.ty
	}

	pub fn catalog_alias(&self) -> &str {
		&self.catalog_alias
	}

	pub fn name(&self) -> &QualifiedName {
		&self.name
	}

	pub fn alias(&self) -> &str {
		&self.alias
	}

	pub fn parent(&self) -> Option<&Arc<TableSourceReference>> {
		self.parent.as_ref()
	}

	/// The source at the end of the lineage chain.
	pub fn root(self: &Arc<Self>) -> Arc<TableSourceReference> {
		let mut current = self.clone();
		while let Some(parent) = current.parent.clone() {
			current = parent;
		}
		current
	}

	fn has_ancestor(&self, id: usize) -> bool {
		let mut current = self.parent.as_deref();
		while let Some(reference) = current {
			if reference.id == id {
				return true;
			}
			current = reference.parent.as_deref();
		}
		false
	}

	/// Links this reference to `parent`. Linking a reference to itself, or to a
	/// lineage that already contains it, returns this reference unchanged.
	pub fn with_parent(self: &Arc<Self>, parent: &Arc<TableSourceReference>) -> Arc<TableSourceReference> {
		if self.id == parent.id || parent.has_ancestor(self.id) {
			return self.clone();
		}
		if self.parent.as_ref().is_some_and(|p| p == parent) {
			return self.clone();
		}
		Arc::new(TableSourceReference {
			parent: Some(parent.clone()),
			..(**self).clone()
		})
	}
}

impl Display for TableSourceReference {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if !self.catalog_alias.is_empty() {
			write!(f, "{}#", self.catalog_alias)?;
		}
		write!(f, "{}", self.name)?;
		if !self.alias.is_empty() {
			write!(f, " {}", self.alias)?;
		}
		Ok(())
	}
}

#[derive(Debug, Clone)]
pub struct TableSourceReferenceBuilder {
	id: usize,
	ty: SourceType,
	catalog_alias: Option<Arc<str>>,
	name: Option<QualifiedName>,
	alias: Option<Arc<str>>,
	parent: Option<Arc<TableSourceReference>>,
}

impl TableSourceReferenceBuilder {
	pub fn catalog_alias(mut self, catalog_alias: impl AsRef<str>) -> Self {
		self.catalog_alias = Some(Arc::from(catalog_alias.as_ref()));
		self
	}

	pub fn name(mut self, name: impl Into<QualifiedName>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn alias(mut self, alias: impl AsRef<str>) -> Self {
		self.alias = Some(Arc::from(alias.as_ref()));
		self
	}

	pub fn parent(mut self, parent: Arc<TableSourceReference>) -> Self {
		self.parent = Some(parent);
		self
	}

	pub fn build(self) -> Result<Arc<TableSourceReference>, ConstructionError> {
		let name = self.name.ok_or(ConstructionError::MissingField {
			object: "TableSourceReference",
			field: "name",
		})?;
		let alias = self.alias.ok_or(ConstructionError::MissingField {
			object: "TableSourceReference",
			field: "alias",
		})?;
		Ok(Arc::new(TableSourceReference {
			id: self.id,
			ty: self.ty,
			catalog_alias: self.catalog_alias.unwrap_or_else(|| Arc::from("")),
			name,
			alias,
			parent: self.parent,
		}))
	}
}

/// Links a column back to the table source it is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReference {
	column_name: Arc<str>,
	table_source: Arc<TableSourceReference>,
	metadata: ColumnMetadata,
}

impl ColumnReference {
	pub fn new(column_name: impl AsRef<str>, table_source: Arc<TableSourceReference>) -> Self {
		Self {
			column_name: Arc::from(column_name.as_ref()),
			table_source,
			metadata: ColumnMetadata::default(),
		}
	}

	pub fn builder() -> ColumnReferenceBuilder {
		ColumnReferenceBuilder::default()
	}

	pub fn column_name(&self) -> &str {
		&self.column_name
	}

	pub fn table_source(&self) -> &Arc<TableSourceReference> {
		&self.table_source
	}

	pub fn metadata(&self) -> &ColumnMetadata {
		&self.metadata
	}

	pub fn with_table_source(&self, table_source: Arc<TableSourceReference>) -> Self {
		Self {
			table_source,
			..self.clone()
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct ColumnReferenceBuilder {
	column_name: Option<Arc<str>>,
	table_source: Option<Arc<TableSourceReference>>,
	metadata: ColumnMetadata,
}

impl ColumnReferenceBuilder {
	pub fn column_name(mut self, column_name: impl AsRef<str>) -> Self {
		self.column_name = Some(Arc::from(column_name.as_ref()));
		self
	}

	pub fn table_source(mut self, table_source: Arc<TableSourceReference>) -> Self {
		self.table_source = Some(table_source);
		self
	}

	pub fn metadata(mut self, metadata: ColumnMetadata) -> Self {
		self.metadata = metadata;
		self
	}

	pub fn build(self) -> Result<ColumnReference, ConstructionError> {
		let column_name = self.column_name.ok_or(ConstructionError::MissingField {
			object: "ColumnReference",
			field: "column name",
		})?;
		let table_source = self.table_source.ok_or(ConstructionError::MissingField {
			object: "ColumnReference",
			field: "table source",
		})?;
		Ok(ColumnReference {
			column_name,
			table_source,
			metadata: self.metadata,
		})
	}
}
