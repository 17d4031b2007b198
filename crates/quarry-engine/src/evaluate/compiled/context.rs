// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::Any,
	collections::HashMap,
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

use quarry_type::{Result, return_internal_error};

type Capture = (String, Arc<dyn Any + Send + Sync>);

/// Compile-time state for building one compiled expression.
///
/// Scratch names come from per-prefix counters, so two requests for the
/// same prefix never collide. The lambda scope stack tells the compiler
/// whether a bare identifier is a lambda parameter, and how many binding
/// levels out it lives at run time.
#[derive(Default)]
pub struct GenerationContext {
	counters: HashMap<String, usize>,
	lambdas: Vec<Arc<str>>,
	captures: Vec<Capture>,
}

impl GenerationContext {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn new_name(&mut self, prefix: &str) -> String {
		let counter = self.counters.entry(prefix.to_string()).or_insert(0);
		let name = format!("{}_{}", prefix, counter);
		*counter += 1;
		name
	}

	pub fn push_lambda(&mut self, parameter: Arc<str>) {
		self.lambdas.push(parameter);
	}

	pub fn pop_lambda(&mut self) -> Option<Arc<str>> {
		self.lambdas.pop()
	}

	/// Distance of the innermost lambda binding `name` from the top of the
	/// scope stack; 0 is the innermost lambda.
	pub fn resolve_lambda(&self, name: &str) -> Option<usize> {
		self.lambdas.iter().rev().position(|parameter| parameter.eq_ignore_ascii_case(name))
	}

	pub fn lambda_depth(&self) -> usize {
		self.lambdas.len()
	}

	/// Records an object the compiled closures read at call time and returns
	/// its index.
	pub fn capture<T: Any + Send + Sync>(&mut self, prefix: &str, value: T) -> usize {
		let name = self.new_name(prefix);
		self.captures.push((name, Arc::new(value)));
		self.captures.len() - 1
	}

	pub fn into_captures(self) -> Captures {
		Captures {
			entries: self.captures.into(),
		}
	}
}

/// The objects captured while compiling, addressed by index.
#[derive(Clone, Default)]
pub struct Captures {
	entries: Arc<[Capture]>,
}

impl Captures {
	pub fn get<T: Any>(&self, index: usize) -> Result<&T> {
		let Some((name, value)) = self.entries.get(index) else {
			return_internal_error!("capture {} out of range of {}", index, self.entries.len());
		};
		match value.downcast_ref::<T>() {
			Some(value) => Ok(value),
			None => return_internal_error!("capture {} is not a {}", name, std::any::type_name::<T>()),
		}
	}

	pub fn name(&self, index: usize) -> Option<&str> {
		self.entries.get(index).map(|(name, _)| name.as_str())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl Debug for Captures {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.entries.iter().map(|(name, _)| name)).finish()
	}
}
