// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_type::{Diagnostic, Error, IntoDiagnostic};

use crate::alias::TableAliasType;

/// Planning-time failures while building schemas, references and alias trees.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstructionError {
	#[error("Alias '{alias}' already exists in scope")]
	DuplicateAlias {
		alias: String,
	},

	#[error("{object} requires a {field}")]
	MissingField {
		object: &'static str,
		field: &'static str,
	},

	#[error("Table alias with ordinal {ordinal} does not exist")]
	UnknownAlias {
		ordinal: usize,
	},

	#[error("Alias '{alias}' cannot be added with type {ty:?}")]
	InvalidAliasType {
		alias: String,
		ty: TableAliasType,
	},
}

impl IntoDiagnostic for ConstructionError {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			ConstructionError::DuplicateAlias {
				alias,
			} => Diagnostic::new("ALIAS_001", message)
				.with_label("duplicate alias in scope")
				.with_help(format!("Give one of the sources named '{}' a different alias", alias))
				.with_note("Aliases are compared case-insensitively within one FROM scope"),
			ConstructionError::MissingField {
				..
			} => Diagnostic::new("PLAN_001", message).with_label("missing required planning field"),
			ConstructionError::UnknownAlias {
				..
			} => Diagnostic::new("ALIAS_002", message),
			ConstructionError::InvalidAliasType {
				..
			} => Diagnostic::new("ALIAS_003", message)
				.with_help("ROOT nodes are created by the tree itself; add a TABLE or SUBQUERY instead"),
		}
	}
}

impl From<ConstructionError> for Error {
	fn from(err: ConstructionError) -> Self {
		Error::new(err.into_diagnostic())
	}
}

/// Failures of the columnar tuple/value vector model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VectorError {
	#[error("Chained tuple vectors must have a common sub set of columns: {reason}")]
	SchemaIncompatible {
		reason: String,
	},

	#[error("Column '{column}' has {actual} rows but the tuple vector has {expected}")]
	RowCountMismatch {
		column: String,
		expected: usize,
		actual: usize,
	},

	#[error("Schema has {schema} columns but {vectors} value vectors were supplied")]
	ColumnCountMismatch {
		schema: usize,
		vectors: usize,
	},

	#[error("Row {row} is out of bounds for a vector of {len} rows")]
	RowOutOfBounds {
		row: usize,
		len: usize,
	},

	#[error("Row {row} is null")]
	NullValue {
		row: usize,
	},
}

impl IntoDiagnostic for VectorError {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			VectorError::SchemaIncompatible {
				..
			} => Diagnostic::new("VECTOR_001", message)
				.with_label("schema incompatibility")
				.with_note("Every chained vector's columns must match the widest schema by position, name and type"),
			VectorError::RowCountMismatch {
				..
			} => Diagnostic::new("VECTOR_002", message),
			VectorError::ColumnCountMismatch {
				..
			} => Diagnostic::new("VECTOR_003", message),
			VectorError::RowOutOfBounds {
				..
			} => Diagnostic::new("VECTOR_004", message),
			VectorError::NullValue {
				..
			} => Diagnostic::new("VECTOR_005", message)
				.with_help("Check is_null before reading a row with a typed accessor"),
		}
	}
}

impl From<VectorError> for Error {
	fn from(err: VectorError) -> Self {
		Error::new(err.into_diagnostic())
	}
}
