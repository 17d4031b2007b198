// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

mod decimal;
mod qualified_name;
mod r#type;

pub use decimal::Decimal;
pub use qualified_name::QualifiedName;
pub use r#type::Type;
