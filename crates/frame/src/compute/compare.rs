// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt::{Display, Formatter},
};

use tidyq_type::{Type, Value};

use crate::{ColumnData, FrameError, compute::build};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
	Eq,
	Ne,
	Lt,
	Le,
	Gt,
	Ge,
}

impl Display for CompareOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			CompareOp::Eq => "==",
			CompareOp::Ne => "!=",
			CompareOp::Lt => "<",
			CompareOp::Le => "<=",
			CompareOp::Gt => ">",
			CompareOp::Ge => ">=",
		})
	}
}

impl CompareOp {
	fn holds(&self, ord: Ordering) -> bool {
		match self {
			CompareOp::Eq => ord == Ordering::Equal,
			CompareOp::Ne => ord != Ordering::Equal,
			CompareOp::Lt => ord == Ordering::Less,
			CompareOp::Le => ord != Ordering::Greater,
			CompareOp::Gt => ord == Ordering::Greater,
			CompareOp::Ge => ord != Ordering::Less,
		}
	}
}

/// Whether values of the two types can be compared with each other.
pub fn comparable(left: Type, right: Type) -> bool {
	left == Type::Undefined || right == Type::Undefined || left == right || (left.is_number() && right.is_number())
}

/// Elementwise comparison; a comparison with undefined is undefined.
pub fn compare(op: CompareOp, left: &ColumnData, right: &ColumnData) -> crate::Result<ColumnData> {
	if !comparable(left.get_type(), right.get_type()) {
		return Err(FrameError::TypeMismatch {
			op: op.to_string(),
			left: left.get_type(),
			right: right.get_type(),
		});
	}

	let values = (0..left.len()).map(|i| {
		let (l, r) = (left.get(i), right.get(i));
		match l.partial_cmp(&r) {
			Some(ord) if !l.is_undefined() && !r.is_undefined() => Value::Boolean(op.holds(ord)),
			_ => Value::Undefined,
		}
	});
	build(Type::Boolean, values)
}
