// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use tidyq_type::{Type, Value};

use crate::{ColumnData, FrameError, compute::build};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
	Add,
	Sub,
	Mul,
	// always produces Float8
	Div,
	Rem,
}

impl Display for ArithOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			ArithOp::Add => "+",
			ArithOp::Sub => "-",
			ArithOp::Mul => "*",
			ArithOp::Div => "/",
			ArithOp::Rem => "%",
		})
	}
}

impl ArithOp {
	pub fn result_type(&self, left: Type, right: Type) -> Option<Type> {
		if !(left.is_number() || left == Type::Undefined) || !(right.is_number() || right == Type::Undefined) {
			return None;
		}
		match self {
			ArithOp::Div => Some(Type::Float8),
			_ => Type::promote(left, right),
		}
	}
}

/// Elementwise arithmetic. Undefined operands, division by zero and integer
/// overflow all produce undefined cells.
pub fn arith(op: ArithOp, left: &ColumnData, right: &ColumnData) -> crate::Result<ColumnData> {
	let ty = op.result_type(left.get_type(), right.get_type()).ok_or_else(|| FrameError::TypeMismatch {
		op: op.to_string(),
		left: left.get_type(),
		right: right.get_type(),
	})?;

	let len = left.len();
	let values = (0..len).map(|i| match (left.get(i), right.get(i)) {
		(Value::Int8(l), Value::Int8(r)) if ty == Type::Int8 => int_op(op, l, r),
		(l, r) => match (l.as_f64(), r.as_f64()) {
			(Some(l), Some(r)) => float_op(op, l, r),
			_ => Value::Undefined,
		},
	});
	build(ty, values)
}

fn int_op(op: ArithOp, l: i64, r: i64) -> Value {
	let result = match op {
		ArithOp::Add => l.checked_add(r),
		ArithOp::Sub => l.checked_sub(r),
		ArithOp::Mul => l.checked_mul(r),
		ArithOp::Rem => l.checked_rem(r),
		ArithOp::Div => return float_op(op, l as f64, r as f64),
	};
	result.map(Value::Int8).unwrap_or(Value::Undefined)
}

fn float_op(op: ArithOp, l: f64, r: f64) -> Value {
	match op {
		ArithOp::Add => Value::float8(l + r),
		ArithOp::Sub => Value::float8(l - r),
		ArithOp::Mul => Value::float8(l * r),
		ArithOp::Div | ArithOp::Rem if r == 0.0 => Value::Undefined,
		ArithOp::Div => Value::float8(l / r),
		ArithOp::Rem => Value::float8(l % r),
	}
}

pub fn negate(data: &ColumnData) -> crate::Result<ColumnData> {
	match data {
		ColumnData::Int8(v, b) => Ok(ColumnData::Int8(v.iter().map(|x| x.wrapping_neg()).collect(), b.clone())),
		ColumnData::Float8(v, b) => Ok(ColumnData::Float8(v.iter().map(|x| -x).collect(), b.clone())),
		ColumnData::Undefined(n) => Ok(ColumnData::Undefined(*n)),
		other => Err(FrameError::UnsupportedType {
			op: "-".to_string(),
			ty: other.get_type(),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_int_add() {
		let result = arith(ArithOp::Add, &ColumnData::int8([1, 2, 3]), &ColumnData::int8([9, 8, 7])).unwrap();
		assert_eq!(result, ColumnData::int8([10, 10, 10]));
	}

	#[test]
	fn test_int_division_is_float() {
		let result = arith(ArithOp::Div, &ColumnData::int8([7, 1]), &ColumnData::int8([2, 0])).unwrap();
		assert_eq!(result, ColumnData::Float8(vec![3.5, 0.0], vec![true, false]));
	}

	#[test]
	fn test_mixed_promotes() {
		let result = arith(ArithOp::Mul, &ColumnData::int8([2]), &ColumnData::float8([1.5])).unwrap();
		assert_eq!(result, ColumnData::float8([3.0]));
	}

	#[test]
	fn test_undefined_propagates() {
		let left = ColumnData::Int8(vec![1, 2], vec![true, false]);
		let result = arith(ArithOp::Sub, &left, &ColumnData::int8([1, 1])).unwrap();
		assert_eq!(result, ColumnData::Int8(vec![0, 0], vec![true, false]));
	}

	#[test]
	fn test_text_rejected() {
		let err = arith(ArithOp::Add, &ColumnData::utf8(["a"]), &ColumnData::int8([1])).unwrap_err();
		assert!(matches!(err, FrameError::TypeMismatch { .. }));
	}

	#[test]
	fn test_overflow_is_undefined() {
		let result = arith(ArithOp::Add, &ColumnData::int8([i64::MAX]), &ColumnData::int8([1])).unwrap();
		assert_eq!(result.get(0), Value::Undefined);
	}

	#[test]
	fn test_negate() {
		assert_eq!(negate(&ColumnData::int8([1, -2])).unwrap(), ColumnData::int8([-1, 2]));
		assert!(negate(&ColumnData::utf8(["a"])).is_err());
	}
}
