// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod alias;
pub mod error;
pub mod schema;
pub mod value;
pub mod vector;

pub use alias::{TableAlias, TableAliasBuilder, TableAliasTree, TableAliasType};
pub use error::{ConstructionError, VectorError};
pub use quarry_type::{Decimal, Error, QualifiedName, Result, Type};
pub use schema::{
	Column, ColumnBuilder, ColumnMetadata, ColumnReference, ColumnType, ResolvedType, Schema, SourceType,
	TableSourceReference,
};
pub use value::{ObjectValue, Sequence, SequenceSource, Value};
pub use vector::{TupleVector, TupleVectorRef, ValueVector, ValueVectorRef};
