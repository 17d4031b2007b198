// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::{HashMap, VecDeque},
	sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use quarry_type::Result;
use tracing::trace;

use crate::{config::EngineConfig, evaluate::Evaluator, expression::Expression};

#[derive(Debug)]
struct Cached {
	// keeps user-defined function instances alive, their addresses are part of the key
	_expression: Expression,
	evaluator: Evaluator,
}

#[derive(Debug, Default)]
struct Entries {
	evaluators: HashMap<String, Cached>,
	order: VecDeque<String>,
}

/// Built evaluators of one compiled query, keyed by
/// [`Expression::cache_key`]. Once full, the oldest entry is evicted.
#[derive(Debug)]
pub struct ExpressionCache {
	capacity: usize,
	entries: Mutex<Entries>,
	hits: AtomicU64,
	misses: AtomicU64,
}

impl ExpressionCache {
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			entries: Mutex::new(Entries::default()),
			hits: AtomicU64::new(0),
			misses: AtomicU64::new(0),
		}
	}

	pub fn get_or_build(&self, expression: &Expression, config: &EngineConfig) -> Result<Evaluator> {
		if self.capacity == 0 {
			return Evaluator::build(expression, config);
		}
		let Some(key) = expression.cache_key() else {
			return Evaluator::build(expression, config);
		};
		if let Some(cached) = self.entries.lock().evaluators.get(&key) {
			self.hits.fetch_add(1, Ordering::Relaxed);
			trace!(expression = %expression, "expression cache hit");
			return Ok(cached.evaluator.clone());
		}
		self.misses.fetch_add(1, Ordering::Relaxed);
		trace!(expression = %expression, "expression cache miss");

		let evaluator = Evaluator::build(expression, config)?;
		let mut entries = self.entries.lock();
		if !entries.evaluators.contains_key(&key) {
			while entries.order.len() >= self.capacity {
				let Some(oldest) = entries.order.pop_front() else {
					break;
				};
				entries.evaluators.remove(&oldest);
			}
			entries.order.push_back(key.clone());
			entries.evaluators.insert(
				key,
				Cached {
					_expression: expression.clone(),
					evaluator: evaluator.clone(),
				},
			);
		}
		Ok(evaluator)
	}

	pub fn len(&self) -> usize {
		self.entries.lock().evaluators.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn hits(&self) -> u64 {
		self.hits.load(Ordering::Relaxed)
	}

	pub fn misses(&self) -> u64 {
		self.misses.load(Ordering::Relaxed)
	}
}
