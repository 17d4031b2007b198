// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

use quarry_core::Value;
use quarry_type::Result;

use super::context::Captures;
use crate::evaluate::ExecutionContext;

pub type CompiledFn = Arc<dyn Fn(&Captures, &ExecutionContext) -> Result<Value> + Send + Sync>;

/// A closure tree built once per expression together with the objects it
/// captured. Shared read-only across executions.
#[derive(Clone)]
pub struct CompiledExpression {
	root: CompiledFn,
	captures: Captures,
	text: Arc<str>,
}

impl CompiledExpression {
	pub(crate) fn new(root: CompiledFn, captures: Captures, text: Arc<str>) -> Self {
		Self {
			root,
			captures,
			text,
		}
	}

	pub fn execute(&self, ctx: &ExecutionContext) -> Result<Value> {
		(self.root)(&self.captures, ctx)
	}

	pub fn captures(&self) -> &Captures {
		&self.captures
	}

	pub fn text(&self) -> &str {
		&self.text
	}
}

impl Debug for CompiledExpression {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("CompiledExpression").field("text", &self.text).field("captures", &self.captures).finish()
	}
}
