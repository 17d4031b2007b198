// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

pub mod error;
pub mod util;
pub mod value;

pub use error::{Diagnostic, Error, IntoDiagnostic, Result};
pub use util::BitVec;
pub use value::{Decimal, QualifiedName, Type};
