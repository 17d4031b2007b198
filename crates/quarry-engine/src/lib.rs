// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod config;
pub mod error;
pub mod evaluate;
pub mod expression;
pub mod interface;
pub mod query;

pub use config::{EngineBuilder, EngineConfig};
pub use error::{CatalogError, CompileError, EvalError};
pub use evaluate::{Evaluator, ExecutionContext, ExpressionCache, Key, KeyExtractor, TupleRow};
pub use expression::{Builtin, Expression, ScalarFunction};
pub use query::CompiledQuery;
pub use quarry_type::{Error, Result};
