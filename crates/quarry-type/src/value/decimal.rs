// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use bigdecimal::BigDecimal;
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::{Error, TypeError};

/// An arbitrary-precision decimal. Equality is numeric, so `1.10 == 1.1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Decimal(BigDecimal);

impl Decimal {
	pub fn new(inner: BigDecimal) -> Self {
		Self(inner)
	}

	pub fn parse(text: &str) -> Result<Self, Error> {
		BigDecimal::from_str(text.trim()).map(Decimal).map_err(|_| {
			TypeError::InvalidDecimal {
				text: text.to_string(),
			}
			.into()
		})
	}

	pub fn inner(&self) -> &BigDecimal {
		&self.0
	}

	/// Numerically equal decimals always give the same double, whatever
	/// their scale; integral values round exactly like an `i64` does.
	pub fn to_f64(&self) -> f64 {
		if self.0.is_integer() {
			if let Some(integral) = self.0.to_i64() {
				return integral as f64;
			}
		}
		self.0.normalized().to_f64().unwrap_or(f64::NAN)
	}

	pub fn to_i64(&self) -> Option<i64> {
		self.0.to_i64()
	}

	pub fn is_zero(&self) -> bool {
		self.0 == BigDecimal::from(0)
	}
}

impl FromStr for Decimal {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Decimal::parse(s)
	}
}

impl Display for Decimal {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl From<i32> for Decimal {
	fn from(v: i32) -> Self {
		Self(BigDecimal::from(v))
	}
}

impl From<i64> for Decimal {
	fn from(v: i64) -> Self {
		Self(BigDecimal::from(v))
	}
}

impl From<BigDecimal> for Decimal {
	fn from(v: BigDecimal) -> Self {
		Self(v)
	}
}

impl TryFrom<f64> for Decimal {
	type Error = Error;

	fn try_from(v: f64) -> Result<Self, Self::Error> {
		BigDecimal::from_f64(v).map(Decimal).ok_or_else(|| {
			TypeError::InvalidDecimal {
				text: v.to_string(),
			}
			.into()
		})
	}
}
