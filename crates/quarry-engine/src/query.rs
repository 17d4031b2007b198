// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use quarry_core::{TableAlias, TableAliasTree};
use quarry_type::Result;
use tracing::instrument;

use crate::{
	config::EngineConfig,
	evaluate::{Evaluator, ExecutionContext, ExpressionCache, KeyExtractor, TupleRow},
	expression::Expression,
	interface::{CacheProvider, Session},
};

/// The frozen artifacts of one planned query. Concurrent executions share
/// it read-only; each builds its own [`ExecutionContext`].
#[derive(Debug)]
pub struct CompiledQuery {
	config: EngineConfig,
	aliases: TableAliasTree,
	cache: ExpressionCache,
}

impl CompiledQuery {
	#[instrument(name = "engine::query::new", level = "debug", skip_all, fields(aliases = aliases.len()))]
	pub fn new(config: EngineConfig, aliases: TableAliasTree) -> Self {
		let cache = ExpressionCache::new(config.expression_cache_capacity);
		Self {
			config,
			aliases,
			cache,
		}
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn aliases(&self) -> &TableAliasTree {
		&self.aliases
	}

	pub fn alias(&self, ordinal: usize) -> Option<TableAlias<'_>> {
		self.aliases.get(ordinal)
	}

	pub fn expression_cache(&self) -> &ExpressionCache {
		&self.cache
	}

	/// The evaluator for `expression`, built once per distinct expression.
	pub fn evaluator(&self, expression: &Expression) -> Result<Evaluator> {
		self.cache.get_or_build(expression, &self.config)
	}

	pub fn key_extractor(&self, expressions: &[Expression]) -> Result<KeyExtractor> {
		let evaluators = expressions.iter().map(|expression| self.evaluator(expression)).collect::<Result<_>>()?;
		Ok(KeyExtractor::from_evaluators(evaluators))
	}

	/// A context for one execution, with one tuple slot per alias ordinal.
	pub fn context(&self, session: Option<Arc<dyn Session>>, cache: Option<Arc<dyn CacheProvider>>) -> ExecutionContext {
		let mut ctx = ExecutionContext::new().with_tuple_row(TupleRow::new(self.aliases.len()));
		if let Some(session) = session {
			ctx = ctx.with_session(session);
		}
		if let Some(cache) = cache {
			ctx = ctx.with_cache(cache);
		}
		ctx
	}
}
