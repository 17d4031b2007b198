// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Debug, Formatter};

use serde::{Deserialize, Serialize};

/// Growable packed bit set. Used as the defined/null mask of column containers.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitVec {
	bits: Vec<u8>,
	len: usize,
}

impl BitVec {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			bits: Vec::with_capacity(capacity.div_ceil(8)),
			len: 0,
		}
	}

	pub fn repeat(len: usize, value: bool) -> Self {
		let fill = if value {
			0xFF
		} else {
			0x00
		};
		let mut bits = vec![fill; len.div_ceil(8)];
		if value && len % 8 != 0 {
			if let Some(last) = bits.last_mut() {
				*last = (1u8 << (len % 8)) - 1;
			}
		}
		Self {
			bits,
			len,
		}
	}

	pub fn from_slice(values: &[bool]) -> Self {
		let mut result = Self::with_capacity(values.len());
		for value in values {
			result.push(*value);
		}
		result
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn push(&mut self, value: bool) {
		let byte = self.len / 8;
		if byte == self.bits.len() {
			self.bits.push(0);
		}
		if value {
			self.bits[byte] |= 1 << (self.len % 8);
		}
		self.len += 1;
	}

	/// Panics if `idx` is out of bounds.
	#[inline]
	pub fn get(&self, idx: usize) -> bool {
		assert!(idx < self.len, "bit index {} out of bounds for length {}", idx, self.len);
		(self.bits[idx / 8] >> (idx % 8)) & 1 == 1
	}

	/// Panics if `idx` is out of bounds.
	pub fn set(&mut self, idx: usize, value: bool) {
		assert!(idx < self.len, "bit index {} out of bounds for length {}", idx, self.len);
		if value {
			self.bits[idx / 8] |= 1 << (idx % 8);
		} else {
			self.bits[idx / 8] &= !(1 << (idx % 8));
		}
	}

	pub fn count_ones(&self) -> usize {
		self.bits.iter().map(|b| b.count_ones() as usize).sum()
	}

	pub fn all_ones(&self) -> bool {
		self.count_ones() == self.len
	}

	pub fn iter(&self) -> BitVecIter<'_> {
		BitVecIter {
			bitvec: self,
			pos: 0,
		}
	}
}

impl Debug for BitVec {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("BitVec[")?;
		for bit in self.iter() {
			f.write_str(if bit {
				"1"
			} else {
				"0"
			})?;
		}
		f.write_str("]")
	}
}

impl FromIterator<bool> for BitVec {
	fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
		let mut result = BitVec::new();
		for bit in iter {
			result.push(bit);
		}
		result
	}
}

impl From<Vec<bool>> for BitVec {
	fn from(value: Vec<bool>) -> Self {
		BitVec::from_slice(&value)
	}
}

pub struct BitVecIter<'a> {
	bitvec: &'a BitVec,
	pos: usize,
}

impl Iterator for BitVecIter<'_> {
	type Item = bool;

	fn next(&mut self) -> Option<Self::Item> {
		if self.pos >= self.bitvec.len {
			return None;
		}
		let bit = self.bitvec.get(self.pos);
		self.pos += 1;
		Some(bit)
	}
}
