// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Columnar kernels. Every kernel takes equally long inputs and returns a
//! column of the same length.

pub use aggregate::Aggregate;
pub use arith::{ArithOp, arith, negate};
pub use compare::{CompareOp, comparable, compare};
pub use logic::{and, not, or};
pub use scalar::{
	abs, case_when, cast, coalesce, ends_with, if_else, is_in, is_null, length, lower, not_null, round,
	starts_with, upper,
};
pub use window::Cumulative;
use tidyq_type::{Type, Value};

use crate::ColumnData;

mod aggregate;
mod arith;
mod compare;
mod logic;
mod scalar;
mod window;

/// Collects cells into a column of a fixed type, so an all-undefined result
/// still carries the type the kernel promises.
pub(crate) fn build(ty: Type, values: impl IntoIterator<Item = Value>) -> crate::Result<ColumnData> {
	let mut result = ColumnData::with_type(ty);
	for value in values {
		result.push(value)?;
	}
	Ok(result)
}
