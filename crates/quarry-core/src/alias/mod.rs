// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The table-alias tree of a query.
//!
//! Nodes live in an arena indexed by ordinal. Ordinals come from one counter
//! shared by the whole query, nested subqueries included, so each node's
//! ordinal is also its slot in the flattened per-row tuple. A SUBQUERY node
//! wraps a synthetic ROOT that holds the subquery's own sources.

use std::{
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

use quarry_type::QualifiedName;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
	error::ConstructionError,
	schema::{Schema, SourceType, TableSourceReference},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableAliasType {
	Root,
	Table,
	Function,
	TemporaryTable,
	Subquery,
}

impl TableAliasType {
	pub fn source_type(&self) -> Option<SourceType> {
		match self {
			TableAliasType::Root => None,
			TableAliasType::Table | TableAliasType::TemporaryTable => Some(SourceType::Table),
			TableAliasType::Function => Some(SourceType::Function),
			TableAliasType::Subquery => Some(SourceType::Subquery),
		}
	}
}

#[derive(Debug, Clone)]
struct Node {
	parent: Option<usize>,
	children: Vec<usize>,
	ty: TableAliasType,
	alias: Arc<str>,
	name: QualifiedName,
	schema: Option<Schema>,
}

/// A frozen alias tree. Shareable read-only across executions.
#[derive(Clone)]
pub struct TableAliasTree {
	nodes: Arc<[Node]>,
}

impl TableAliasTree {
	pub fn builder() -> TableAliasBuilder {
		TableAliasBuilder::new()
	}

	pub fn root(&self) -> TableAlias<'_> {
		TableAlias {
			tree: self,
			ordinal: 0,
		}
	}

	pub fn get(&self, ordinal: usize) -> Option<TableAlias<'_>> {
		(ordinal < self.nodes.len()).then_some(TableAlias {
			tree: self,
			ordinal,
		})
	}

	/// Number of nodes; also the width of the flattened tuple.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = TableAlias<'_>> + '_ {
		(0..self.nodes.len()).map(move |ordinal| TableAlias {
			tree: self,
			ordinal,
		})
	}
}

impl Debug for TableAliasTree {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		fn print(f: &mut Formatter<'_>, alias: TableAlias<'_>, depth: usize) -> fmt::Result {
			writeln!(f, "{:indent$}{:?} {} #{}", "", alias.ty(), alias.alias(), alias.ordinal(), indent = depth * 2)?;
			for child in alias.children() {
				print(f, child, depth + 1)?;
			}
			Ok(())
		}
		print(f, self.root(), 0)
	}
}

/// A view of one node of a [`TableAliasTree`].
#[derive(Clone, Copy)]
pub struct TableAlias<'a> {
	tree: &'a TableAliasTree,
	ordinal: usize,
}

impl<'a> TableAlias<'a> {
	fn node(&self) -> &'a Node {
		&self.tree.nodes[self.ordinal]
	}

	pub fn ordinal(&self) -> usize {
		self.ordinal
	}

	pub fn ty(&self) -> TableAliasType {
		self.node().ty
	}

	pub fn alias(&self) -> &'a str {
		&self.node().alias
	}

	pub fn name(&self) -> &'a QualifiedName {
		&self.node().name
	}

	pub fn schema(&self) -> Option<&'a Schema> {
		self.node().schema.as_ref()
	}

	pub fn parent(&self) -> Option<TableAlias<'a>> {
		self.node().parent.map(|ordinal| TableAlias {
			tree: self.tree,
			ordinal,
		})
	}

	pub fn children(&self) -> impl Iterator<Item = TableAlias<'a>> + 'a {
		let tree = self.tree;
		self.node().children.iter().map(move |&ordinal| TableAlias {
			tree,
			ordinal,
		})
	}

	/// The node whose children are this level's sources. For a SUBQUERY
	/// that is its wrapped ROOT.
	fn level(&self) -> TableAlias<'a> {
		match self.ty() {
			TableAliasType::Subquery => self.children().next().unwrap_or(*self),
			_ => *self,
		}
	}

	/// Case-insensitive lookup among the sources of this level.
	pub fn child_alias(&self, alias: &str) -> Option<TableAlias<'a>> {
		self.level().children().find(|child| child.alias().eq_ignore_ascii_case(alias))
	}

	/// Rows this level occupies once subqueries are flattened into the
	/// parent composite row.
	pub fn tuple_count_on_level(&self) -> usize {
		self.level()
			.children()
			.map(|child| match child.ty() {
				TableAliasType::Subquery => child.tuple_count_on_level(),
				_ => 1,
			})
			.sum()
	}

	/// A provenance reference for this source; ROOT nodes have none.
	pub fn table_source(&self) -> Option<Arc<TableSourceReference>> {
		let ty = self.ty().source_type()?;
		TableSourceReference::builder(self.ordinal, ty).name(self.name().clone()).alias(self.alias()).build().ok()
	}
}

impl Debug for TableAlias<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableAlias")
			.field("ordinal", &self.ordinal)
			.field("ty", &self.ty())
			.field("alias", &self.alias())
			.field("name", self.name())
			.finish()
	}
}

impl PartialEq for TableAlias<'_> {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self.tree, other.tree) && self.ordinal == other.ordinal
	}
}

/// Builds a [`TableAliasTree`]. Node handles are ordinals.
#[derive(Debug)]
pub struct TableAliasBuilder {
	nodes: Vec<Node>,
}

impl Default for TableAliasBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TableAliasBuilder {
	pub fn new() -> Self {
		Self {
			nodes: vec![Node {
				parent: None,
				children: Vec::new(),
				ty: TableAliasType::Root,
				alias: Arc::from(""),
				name: QualifiedName::parse(""),
				schema: None,
			}],
		}
	}

	pub fn root(&self) -> usize {
		0
	}

	fn level(&self, parent: usize) -> Result<usize, ConstructionError> {
		let node = self.nodes.get(parent).ok_or(ConstructionError::UnknownAlias {
			ordinal: parent,
		})?;
		Ok(match node.ty {
			TableAliasType::Subquery => node.children.first().copied().unwrap_or(parent),
			_ => parent,
		})
	}

	fn push(&mut self, parent: usize, node: Node) -> usize {
		let ordinal = self.nodes.len();
		self.nodes.push(node);
		self.nodes[parent].children.push(ordinal);
		ordinal
	}

	/// Adds a source under `parent`; adding under a SUBQUERY adds to its
	/// wrapped ROOT. Returns the new node's ordinal.
	#[instrument(name = "core::alias::add", level = "trace", skip(self, name, schema))]
	pub fn add(
		&mut self,
		parent: usize,
		ty: TableAliasType,
		name: impl Into<QualifiedName>,
		alias: &str,
		schema: Option<Schema>,
	) -> Result<usize, ConstructionError> {
		let level = self.level(parent)?;
		if ty == TableAliasType::Root {
			return Err(ConstructionError::InvalidAliasType {
				alias: alias.to_string(),
				ty,
			});
		}
		let duplicate = self.nodes[level]
			.children
			.iter()
			.any(|&child| self.nodes[child].alias.eq_ignore_ascii_case(alias));
		if duplicate {
			return Err(ConstructionError::DuplicateAlias {
				alias: alias.to_string(),
			});
		}

		let ordinal = self.push(
			level,
			Node {
				parent: Some(level),
				children: Vec::new(),
				ty,
				alias: Arc::from(alias),
				name: name.into(),
				schema,
			},
		);
		if ty == TableAliasType::Subquery {
			self.push(
				ordinal,
				Node {
					parent: Some(ordinal),
					children: Vec::new(),
					ty: TableAliasType::Root,
					alias: Arc::from(""),
					name: QualifiedName::parse(""),
					schema: None,
				},
			);
		}
		Ok(ordinal)
	}

	pub fn table(&mut self, parent: usize, name: &str, alias: &str) -> Result<usize, ConstructionError> {
		self.add(parent, TableAliasType::Table, name, alias, None)
	}

	pub fn subquery(&mut self, parent: usize, alias: &str) -> Result<usize, ConstructionError> {
		self.add(parent, TableAliasType::Subquery, "", alias, None)
	}

	pub fn build(self) -> TableAliasTree {
		TableAliasTree {
			nodes: self.nodes.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ordinals_are_global() {
		let mut builder = TableAliasTree::builder();
		let root = builder.root();
		let a = builder.table(root, "tableA", "a").unwrap();
		let x = builder.subquery(root, "x").unwrap();
		let b = builder.table(x, "tableB", "b").unwrap();
		let c = builder.table(root, "tableC", "c").unwrap();
		let tree = builder.build();

		assert_eq!((a, x, b, c), (1, 2, 4, 5));
		let ordinals: Vec<_> = tree.iter().map(|alias| alias.ordinal()).collect();
		assert_eq!(ordinals, vec![0, 1, 2, 3, 4, 5]);
		assert_eq!(tree.get(3).unwrap().ty(), TableAliasType::Root);
		assert_eq!(tree.get(4).unwrap().parent().unwrap().ordinal(), 3);
	}

	#[test]
	fn test_duplicate_alias_fails() {
		let mut builder = TableAliasTree::builder();
		let root = builder.root();
		builder.table(root, "tableA", "a").unwrap();
		let err = builder.table(root, "tableB", "A").unwrap_err();
		assert_eq!(
			err,
			ConstructionError::DuplicateAlias {
				alias: "A".to_string()
			}
		);
	}

	#[test]
	fn test_root_type_is_rejected() {
		let mut builder = TableAliasTree::builder();
		let root = builder.root();
		let err = builder.add(root, TableAliasType::Root, "t", "t", None).unwrap_err();
		assert_eq!(
			err,
			ConstructionError::InvalidAliasType {
				alias: "t".to_string(),
				ty: TableAliasType::Root,
			}
		);
		assert_eq!(quarry_type::Error::from(err).code(), "ALIAS_003");
	}

	#[test]
	fn test_same_alias_in_different_scopes() {
		let mut builder = TableAliasTree::builder();
		let root = builder.root();
		builder.table(root, "tableA", "a").unwrap();
		let x = builder.subquery(root, "x").unwrap();
		assert!(builder.table(x, "tableA", "a").is_ok());
	}

	#[test]
	fn test_child_alias_through_subquery() {
		let mut builder = TableAliasTree::builder();
		let root = builder.root();
		let x = builder.subquery(root, "x").unwrap();
		let b = builder.table(x, "tableB", "b").unwrap();
		let tree = builder.build();

		let subquery = tree.root().child_alias("X").unwrap();
		assert_eq!(subquery.ty(), TableAliasType::Subquery);
		assert_eq!(subquery.child_alias("B").unwrap().ordinal(), b);
		assert!(subquery.child_alias("c").is_none());
	}

	#[test]
	fn test_tuple_count_on_level() {
		let mut builder = TableAliasTree::builder();
		let root = builder.root();
		builder.table(root, "tableA", "a").unwrap();
		let x = builder.subquery(root, "x").unwrap();
		builder.table(x, "tableB", "b").unwrap();
		let y = builder.subquery(x, "y").unwrap();
		builder.table(y, "tableC", "c").unwrap();
		builder.table(y, "tableD", "d").unwrap();
		let tree = builder.build();

		assert_eq!(tree.root().tuple_count_on_level(), 4);
		assert_eq!(tree.root().child_alias("x").unwrap().tuple_count_on_level(), 3);
	}

	#[test]
	fn test_table_source_from_alias() {
		let mut builder = TableAliasTree::builder();
		let root = builder.root();
		let a = builder.table(root, "db.tableA", "a").unwrap();
		let tree = builder.build();

		let source = tree.get(a).unwrap().table_source().unwrap();
		assert_eq!(source.id(), a);
		assert_eq!(source.ty(), SourceType::Table);
		assert_eq!(source.name().to_string(), "db.tableA");
		assert!(tree.root().table_source().is_none());
	}

	#[test]
	fn test_unknown_parent() {
		let mut builder = TableAliasTree::builder();
		assert_eq!(
			builder.table(7, "t", "t").unwrap_err(),
			ConstructionError::UnknownAlias {
				ordinal: 7
			}
		);
	}
}
