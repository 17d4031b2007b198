// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	/// When false every expression is interpreted.
	pub compile_expressions: bool,
	/// Preferred number of rows per batch pulled from operators.
	pub batch_size: usize,
	/// Maximum number of compiled expressions kept per query.
	pub expression_cache_capacity: usize,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			compile_expressions: true,
			batch_size: 500,
			expression_cache_capacity: 256,
		}
	}
}

#[derive(Debug, Default)]
pub struct EngineBuilder {
	config: EngineConfig,
}

impl EngineBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn compile_expressions(mut self, enabled: bool) -> Self {
		self.config.compile_expressions = enabled;
		self
	}

	pub fn batch_size(mut self, size: usize) -> Self {
		self.config.batch_size = size.max(1);
		self
	}

	pub fn expression_cache_capacity(mut self, capacity: usize) -> Self {
		self.config.expression_cache_capacity = capacity;
		self
	}

	pub fn build(self) -> EngineConfig {
		self.config
	}
}
