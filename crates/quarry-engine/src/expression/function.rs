// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Debug, Display, Formatter},
	sync::Arc,
};

use quarry_core::Value;
use quarry_type::Result;
use serde::{Deserialize, Serialize};

use crate::{error::CompileError, evaluate::ExecutionContext};

/// Built-in higher-order and variadic functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
	Filter,
	Map,
	FlatMap,
	Any,
	All,
	None,
	Concat,
}

impl Builtin {
	pub const ALL: [Builtin; 7] =
		[Builtin::Filter, Builtin::Map, Builtin::FlatMap, Builtin::Any, Builtin::All, Builtin::None, Builtin::Concat];

	pub fn name(&self) -> &'static str {
		match self {
			Builtin::Filter => "filter",
			Builtin::Map => "map",
			Builtin::FlatMap => "flatmap",
			Builtin::Any => "any",
			Builtin::All => "all",
			Builtin::None => "none",
			Builtin::Concat => "concat",
		}
	}

	pub fn from_name(name: &str) -> Option<Builtin> {
		Self::ALL.into_iter().find(|builtin| builtin.name().eq_ignore_ascii_case(name))
	}

	/// True for functions taking `(input, lambda)`.
	pub fn takes_lambda(&self) -> bool {
		!matches!(self, Builtin::Concat)
	}
}

impl Display for Builtin {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

pub type CompiledFunction = Arc<dyn Fn(&ExecutionContext, &[Value]) -> Result<Value> + Send + Sync>;

/// A user-defined scalar function.
pub trait ScalarFunction: Debug + Send + Sync {
	fn name(&self) -> &str;

	fn invoke(&self, ctx: &ExecutionContext, arguments: &[Value]) -> Result<Value>;

	/// A specialized implementation for compiled evaluation. Functions
	/// without one are evaluated by the interpreter.
	fn compile(&self) -> std::result::Result<CompiledFunction, CompileError> {
		Err(CompileError::not_implemented(format!("function {}", self.name())))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_name() {
		assert_eq!(Builtin::from_name("FlatMap"), Some(Builtin::FlatMap));
		assert_eq!(Builtin::from_name("reduce"), None);
		assert!(!Builtin::Concat.takes_lambda());
		assert!(Builtin::None.takes_lambda());
	}
}
