// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;
use tracing::info;

pub trait Session: Send + Sync {
	/// A property configured for the catalog registered under `catalog_alias`.
	fn catalog_property(&self, catalog_alias: &str, key: &str) -> Option<String>;

	/// The catalog unqualified table names resolve against.
	fn default_catalog_alias(&self) -> &str;

	/// Polled between batches.
	fn abort_requested(&self) -> bool;

	fn print(&self, message: &str);
}

#[derive(Debug, Default)]
pub struct DefaultSession {
	default_catalog_alias: String,
	properties: HashMap<(String, String), String>,
	abort: AtomicBool,
	printed: Mutex<Vec<String>>,
}

impl DefaultSession {
	pub fn new(default_catalog_alias: impl Into<String>) -> Self {
		Self {
			default_catalog_alias: default_catalog_alias.into(),
			..Default::default()
		}
	}

	pub fn with_property(mut self, catalog_alias: &str, key: &str, value: impl Into<String>) -> Self {
		self.properties.insert((catalog_alias.to_lowercase(), key.to_lowercase()), value.into());
		self
	}

	pub fn abort(&self) {
		self.abort.store(true, Ordering::Release);
	}

	/// Messages written to the print sink so far.
	pub fn printed(&self) -> Vec<String> {
		self.printed.lock().clone()
	}
}

impl Session for DefaultSession {
	fn catalog_property(&self, catalog_alias: &str, key: &str) -> Option<String> {
		self.properties.get(&(catalog_alias.to_lowercase(), key.to_lowercase())).cloned()
	}

	fn default_catalog_alias(&self) -> &str {
		&self.default_catalog_alias
	}

	fn abort_requested(&self) -> bool {
		self.abort.load(Ordering::Acquire)
	}

	fn print(&self, message: &str) {
		info!(target: "quarry::session", "{}", message);
		self.printed.lock().push(message.to_string());
	}
}
