// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	time::{Duration, Instant},
};

use parking_lot::Mutex;
use quarry_core::{Value, value::hash::hash_values};
use quarry_type::{QualifiedName, Result};
use serde::Serialize;
use tracing::trace;

use crate::evaluate::ExecutionContext;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
	pub hits: u64,
	pub misses: u64,
	pub entries: usize,
}

/// Named caches shared by user-defined functions of a session.
pub trait CacheProvider: Send + Sync {
	/// The cached value for `key`, unless it is older than `ttl`.
	fn get(&self, name: &QualifiedName, key: &[Value], ttl: Option<Duration>) -> Option<Value>;

	fn put(&self, name: &QualifiedName, key: Vec<Value>, value: Value);

	/// Drops every entry of the named cache.
	fn flush(&self, name: &QualifiedName);

	fn remove(&self, name: &QualifiedName, key: &[Value]) -> bool;

	fn stats(&self, name: &QualifiedName) -> CacheStats;
}

#[derive(Debug)]
struct Entry {
	key: Vec<Value>,
	value: Value,
	inserted: Instant,
}

#[derive(Debug, Default)]
struct NamedCache {
	buckets: HashMap<u64, Vec<Entry>>,
	hits: u64,
	misses: u64,
}

impl NamedCache {
	fn len(&self) -> usize {
		self.buckets.values().map(Vec::len).sum()
	}
}

#[derive(Debug, Default)]
pub struct InMemoryCacheProvider {
	caches: Mutex<HashMap<String, NamedCache>>,
}

impl InMemoryCacheProvider {
	pub fn new() -> Self {
		Self::default()
	}
}

fn cache_name(name: &QualifiedName) -> String {
	name.to_string().to_lowercase()
}

impl CacheProvider for InMemoryCacheProvider {
	fn get(&self, name: &QualifiedName, key: &[Value], ttl: Option<Duration>) -> Option<Value> {
		let mut caches = self.caches.lock();
		let cache = caches.entry(cache_name(name)).or_default();
		let hash = hash_values(key);
		let mut found = None;
		let mut expired = false;
		if let Some(bucket) = cache.buckets.get_mut(&hash) {
			if let Some(position) = bucket.iter().position(|entry| entry.key.as_slice() == key) {
				if ttl.is_none_or(|ttl| bucket[position].inserted.elapsed() <= ttl) {
					found = Some(bucket[position].value.clone());
				} else {
					bucket.swap_remove(position);
					expired = true;
				}
			}
			if bucket.is_empty() {
				cache.buckets.remove(&hash);
			}
		}
		match found {
			Some(_) => cache.hits += 1,
			None => cache.misses += 1,
		}
		trace!(cache = %name, hit = found.is_some(), expired, "cache lookup");
		found
	}

	fn put(&self, name: &QualifiedName, key: Vec<Value>, value: Value) {
		let mut caches = self.caches.lock();
		let bucket = caches.entry(cache_name(name)).or_default().buckets.entry(hash_values(&key)).or_default();
		bucket.retain(|entry| entry.key != key);
		bucket.push(Entry {
			key,
			value,
			inserted: Instant::now(),
		});
	}

	fn flush(&self, name: &QualifiedName) {
		if let Some(cache) = self.caches.lock().get_mut(&cache_name(name)) {
			cache.buckets.clear();
		}
	}

	fn remove(&self, name: &QualifiedName, key: &[Value]) -> bool {
		let mut caches = self.caches.lock();
		let Some(bucket) = caches.get_mut(&cache_name(name)).and_then(|cache| cache.buckets.get_mut(&hash_values(key)))
		else {
			return false;
		};
		let before = bucket.len();
		bucket.retain(|entry| entry.key.as_slice() != key);
		before != bucket.len()
	}

	fn stats(&self, name: &QualifiedName) -> CacheStats {
		self.caches
			.lock()
			.get(&cache_name(name))
			.map(|cache| CacheStats {
				hits: cache.hits,
				misses: cache.misses,
				entries: cache.len(),
			})
			.unwrap_or_default()
	}
}

/// Looks `key` up in the session cache, computing and storing the value on a
/// miss. Without a cache provider the value is always computed.
pub fn get_or_compute<F>(
	ctx: &ExecutionContext,
	name: &QualifiedName,
	key: Vec<Value>,
	ttl: Option<Duration>,
	compute: F,
) -> Result<Value>
where
	F: FnOnce() -> Result<Value>,
{
	let Some(cache) = ctx.cache() else {
		return compute();
	};
	if let Some(value) = cache.get(name, &key, ttl) {
		return Ok(value);
	}
	let value = compute()?;
	cache.put(name, key, value.clone());
	Ok(value)
}
