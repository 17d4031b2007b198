// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_type::{Diagnostic, Error, IntoDiagnostic};

/// Failures while evaluating an expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
	#[error("Function {function} expects {expected} arguments but got {actual}")]
	Arity {
		function: String,
		expected: String,
		actual: usize,
	},

	#[error("Argument {position} of {function} must be a lambda")]
	ExpectedLambda {
		function: String,
		position: usize,
	},

	#[error("Lambda of {function} must return a boolean but returned {value}")]
	NonBooleanLambdaResult {
		function: String,
		value: String,
	},

	#[error("Lambda '{parameter}' can only be used as an argument of a higher-order function")]
	UnboundLambda {
		parameter: String,
	},

	#[error("Predicate must evaluate to a boolean but evaluated to {value}")]
	NonBooleanPredicate {
		value: String,
	},

	#[error("No tuple is bound to table alias ordinal {ordinal}")]
	UnboundOrdinal {
		ordinal: usize,
	},

	#[error("Query was aborted")]
	Aborted,
}

impl IntoDiagnostic for EvalError {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			EvalError::Arity {
				function,
				..
			} => Diagnostic::new("FUNCTION_001", message).with_label(format!("wrong number of arguments to {}", function)),
			EvalError::ExpectedLambda {
				..
			} => Diagnostic::new("FUNCTION_002", message).with_help("Pass a lambda such as x -> x > 0"),
			EvalError::NonBooleanLambdaResult {
				..
			} => Diagnostic::new("FUNCTION_003", message)
				.with_label("non-boolean lambda result")
				.with_note("any, all and none require every lambda result to be true or false"),
			EvalError::UnboundLambda {
				..
			} => Diagnostic::new("FUNCTION_004", message),
			EvalError::NonBooleanPredicate {
				..
			} => Diagnostic::new("EVAL_001", message),
			EvalError::UnboundOrdinal {
				..
			} => Diagnostic::new("EVAL_002", message),
			EvalError::Aborted => Diagnostic::new("EVAL_003", message),
		}
	}
}

impl From<EvalError> for Error {
	fn from(err: EvalError) -> Self {
		Error::new(err.into_diagnostic())
	}
}

/// Failures reported by catalogs and the operators they produce.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
	#[error("Table '{name}' does not exist in catalog '{catalog}'")]
	UnknownTable {
		catalog: String,
		name: String,
	},

	#[error("Catalog '{catalog}' has no index on ({columns}) of '{name}'")]
	UnknownIndex {
		catalog: String,
		name: String,
		columns: String,
	},

	#[error("Seek keys must have {expected} values but got {actual}")]
	SeekKeyArity {
		expected: usize,
		actual: usize,
	},
}

impl IntoDiagnostic for CatalogError {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			CatalogError::UnknownTable {
				..
			} => Diagnostic::new("CATALOG_001", message).with_label("unknown table"),
			CatalogError::UnknownIndex {
				..
			} => Diagnostic::new("CATALOG_002", message).with_help("Use Catalog::indices to list the available indices"),
			CatalogError::SeekKeyArity {
				..
			} => Diagnostic::new("CATALOG_003", message),
		}
	}
}

impl From<CatalogError> for Error {
	fn from(err: CatalogError) -> Self {
		Error::new(err.into_diagnostic())
	}
}

/// Outcome of compiling an expression. `NotImplemented` is recoverable: the
/// caller evaluates the expression with the interpreter instead.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
	#[error("compiled evaluation of {feature} is not implemented")]
	NotImplemented {
		feature: String,
	},

	#[error(transparent)]
	Failed(#[from] Error),
}

impl CompileError {
	pub fn not_implemented(feature: impl Into<String>) -> Self {
		CompileError::NotImplemented {
			feature: feature.into(),
		}
	}

	pub fn is_not_implemented(&self) -> bool {
		matches!(self, CompileError::NotImplemented { .. })
	}
}

impl From<EvalError> for CompileError {
	fn from(err: EvalError) -> Self {
		CompileError::Failed(err.into())
	}
}
