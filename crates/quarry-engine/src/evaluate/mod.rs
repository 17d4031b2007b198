// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod cache;
pub mod compiled;
mod context;
mod evaluator;
pub mod interpret;
pub mod lambda;

pub use cache::ExpressionCache;
pub use context::{ExecutionContext, TupleRow};
pub use evaluator::{Evaluator, Key, KeyExtractor};
