// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A dotted multi-part name such as `catalog.schema.table`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
	parts: Vec<String>,
}

impl QualifiedName {
	pub fn of<S: Into<String>>(parts: impl IntoIterator<Item = S>) -> Self {
		Self {
			parts: parts.into_iter().map(Into::into).collect(),
		}
	}

	/// Splits on `.`; an empty input yields an empty name.
	pub fn parse(text: &str) -> Self {
		if text.is_empty() {
			return Self {
				parts: vec![],
			};
		}
		Self::of(text.split('.'))
	}

	pub fn parts(&self) -> &[String] {
		&self.parts
	}

	pub fn first(&self) -> Option<&str> {
		self.parts.first().map(String::as_str)
	}

	pub fn last(&self) -> Option<&str> {
		self.parts.last().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.parts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.parts.is_empty()
	}

	pub fn eq_ignore_case(&self, other: &QualifiedName) -> bool {
		self.parts.len() == other.parts.len()
			&& self.parts.iter().zip(other.parts.iter()).all(|(l, r)| l.eq_ignore_ascii_case(r))
	}

	/// Drops the first part, e.g. a catalog alias prefix.
	pub fn extract(&self, from: usize) -> QualifiedName {
		Self {
			parts: self.parts.iter().skip(from).cloned().collect(),
		}
	}
}

impl Display for QualifiedName {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.parts.join("."))
	}
}

impl From<&str> for QualifiedName {
	fn from(value: &str) -> Self {
		QualifiedName::parse(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_and_display() {
		let name = QualifiedName::parse("sys.tables");
		assert_eq!(name.len(), 2);
		assert_eq!(name.first(), Some("sys"));
		assert_eq!(name.last(), Some("tables"));
		assert_eq!(name.to_string(), "sys.tables");
	}

	#[test]
	fn test_eq_ignore_case() {
		assert!(QualifiedName::parse("Sys.Tables").eq_ignore_case(&QualifiedName::parse("sys.tables")));
		assert!(!QualifiedName::parse("sys").eq_ignore_case(&QualifiedName::parse("sys.tables")));
	}

	#[test]
	fn test_extract() {
		assert_eq!(QualifiedName::parse("es.index.type").extract(1), QualifiedName::parse("index.type"));
	}
}
