// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Contracts between the evaluator and its host: data sources, caches,
//! result sinks and the session a query runs in.

mod cache;
mod catalog;
mod operator;
mod output;
mod session;

pub use cache::{CacheProvider, CacheStats, InMemoryCacheProvider, get_or_compute};
pub use catalog::{Catalog, Index, MemoryCatalog, ScanRequest, SeekPredicate, SortItem, SortOrder};
pub use operator::{FilterOperator, Operator, ProjectOperator, VectorOperator, drain};
pub use output::{JsonOutputWriter, OutputWriter, emit, emit_rows, write_value};
pub use session::{DefaultSession, Session};
