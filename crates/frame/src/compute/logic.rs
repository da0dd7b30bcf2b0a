// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_type::{Type, Value};

use crate::{ColumnData, FrameError, compute::build};

fn truth(data: &ColumnData, op: &str) -> crate::Result<Vec<Option<bool>>> {
	match data {
		ColumnData::Bool(v, b) => Ok(v.iter().zip(b).map(|(v, b)| b.then_some(*v)).collect()),
		ColumnData::Undefined(n) => Ok(vec![None; *n]),
		other => Err(FrameError::UnsupportedType {
			op: op.to_string(),
			ty: other.get_type(),
		}),
	}
}

/// Three-valued AND: false wins over undefined.
pub fn and(left: &ColumnData, right: &ColumnData) -> crate::Result<ColumnData> {
	let (l, r) = (truth(left, "&")?, truth(right, "&")?);
	let values = l.into_iter().zip(r).map(|pair| match pair {
		(Some(false), _) | (_, Some(false)) => Value::Boolean(false),
		(Some(true), Some(true)) => Value::Boolean(true),
		_ => Value::Undefined,
	});
	build(Type::Boolean, values)
}

/// Three-valued OR: true wins over undefined.
pub fn or(left: &ColumnData, right: &ColumnData) -> crate::Result<ColumnData> {
	let (l, r) = (truth(left, "|")?, truth(right, "|")?);
	let values = l.into_iter().zip(r).map(|pair| match pair {
		(Some(true), _) | (_, Some(true)) => Value::Boolean(true),
		(Some(false), Some(false)) => Value::Boolean(false),
		_ => Value::Undefined,
	});
	build(Type::Boolean, values)
}

pub fn not(data: &ColumnData) -> crate::Result<ColumnData> {
	let values = truth(data, "~")?.into_iter().map(|v| v.map_or(Value::Undefined, |v| Value::Boolean(!v)));
	build(Type::Boolean, values)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tri() -> ColumnData {
		ColumnData::Bool(vec![true, false, false], vec![true, true, false])
	}

	#[test]
	fn test_and() {
		let result = and(&tri(), &ColumnData::bool([true, true, false])).unwrap();
		assert_eq!(result.iter().collect::<Vec<_>>(), vec![Value::bool(true), Value::bool(false), Value::bool(false)]);
	}

	#[test]
	fn test_or() {
		let result = or(&tri(), &ColumnData::bool([false, false, false])).unwrap();
		assert_eq!(result.iter().collect::<Vec<_>>(), vec![Value::bool(true), Value::bool(false), Value::Undefined]);
	}

	#[test]
	fn test_not() {
		let result = not(&tri()).unwrap();
		assert_eq!(result.iter().collect::<Vec<_>>(), vec![Value::bool(false), Value::bool(true), Value::Undefined]);
	}

	#[test]
	fn test_not_requires_bool() {
		assert!(not(&ColumnData::int8([1])).is_err());
	}
}
