// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_type::{Type, Value};

use crate::{ColumnData, FrameError, compute::build};

fn unsupported(op: &str, data: &ColumnData) -> FrameError {
	FrameError::UnsupportedType {
		op: op.to_string(),
		ty: data.get_type(),
	}
}

pub fn abs(data: &ColumnData) -> crate::Result<ColumnData> {
	match data {
		ColumnData::Int8(v, b) => Ok(ColumnData::Int8(v.iter().map(|x| x.wrapping_abs()).collect(), b.clone())),
		ColumnData::Float8(v, b) => Ok(ColumnData::Float8(v.iter().map(|x| x.abs()).collect(), b.clone())),
		ColumnData::Undefined(n) => Ok(ColumnData::Undefined(*n)),
		other => Err(unsupported("abs", other)),
	}
}

/// Rounds half away from zero; always Float8.
pub fn round(data: &ColumnData, digits: i64) -> crate::Result<ColumnData> {
	if !(data.get_type().is_number() || data.get_type() == Type::Undefined) {
		return Err(unsupported("round", data));
	}
	let scale = 10f64.powi(digits as i32);
	let values = (0..data.len()).map(|i| match data.as_f64(i) {
		Some(x) => Value::float8((x * scale).round() / scale),
		None => Value::Undefined,
	});
	build(Type::Float8, values)
}

pub fn cast(data: &ColumnData, to: Type) -> crate::Result<ColumnData> {
	let values = data
		.iter()
		.map(|value| cast_value(value, to))
		.collect::<crate::Result<Vec<_>>>()?;
	build(to, values)
}

fn cast_value(value: Value, to: Type) -> crate::Result<Value> {
	let invalid = |value: &Value| FrameError::InvalidCast {
		value: value.to_string(),
		to,
	};
	Ok(match (value, to) {
		(Value::Undefined, _) => Value::Undefined,
		(v, Type::Undefined) => return Err(invalid(&v)),
		(Value::Boolean(b), Type::Boolean) => Value::Boolean(b),
		(Value::Boolean(b), Type::Int8) => Value::Int8(b as i64),
		(Value::Boolean(b), Type::Float8) => Value::float8(if b { 1.0 } else { 0.0 }),
		(Value::Int8(i), Type::Boolean) => Value::Boolean(i != 0),
		(Value::Int8(i), Type::Int8) => Value::Int8(i),
		(Value::Int8(i), Type::Float8) => Value::float8(i as f64),
		(Value::Float8(f), Type::Boolean) => Value::Boolean(f.value() != 0.0),
		(Value::Float8(f), Type::Int8) => Value::Int8(f.value().trunc() as i64),
		(Value::Float8(f), Type::Float8) => Value::Float8(f),
		(Value::Utf8(s), Type::Int8) => match s.trim().parse::<i64>() {
			Ok(i) => Value::Int8(i),
			Err(_) => return Err(invalid(&Value::Utf8(s))),
		},
		(Value::Utf8(s), Type::Float8) => match s.trim().parse::<f64>() {
			Ok(f) => Value::float8(f),
			Err(_) => return Err(invalid(&Value::Utf8(s))),
		},
		(Value::Utf8(s), Type::Boolean) => return Err(invalid(&Value::Utf8(s))),
		(v, Type::Utf8) => Value::Utf8(v.to_string()),
	})
}

pub fn is_null(data: &ColumnData) -> ColumnData {
	ColumnData::bool((0..data.len()).map(|i| !data.is_defined(i)))
}

pub fn not_null(data: &ColumnData) -> ColumnData {
	ColumnData::bool((0..data.len()).map(|i| data.is_defined(i)))
}

pub fn is_in(data: &ColumnData, candidates: &[Value]) -> crate::Result<ColumnData> {
	let values = data.iter().map(|v| {
		if v.is_undefined() {
			Value::Undefined
		} else {
			Value::Boolean(candidates.iter().any(|c| v.partial_cmp(c) == Some(std::cmp::Ordering::Equal)))
		}
	});
	build(Type::Boolean, values)
}

fn map_utf8(data: &ColumnData, op: &str, ty: Type, f: impl Fn(&str) -> Value) -> crate::Result<ColumnData> {
	match data {
		ColumnData::Utf8(v, b) => {
			build(ty, v.iter().zip(b).map(|(s, valid)| if *valid { f(s) } else { Value::Undefined }))
		}
		ColumnData::Undefined(n) => build(ty, (0..*n).map(|_| Value::Undefined)),
		other => Err(unsupported(op, other)),
	}
}

pub fn upper(data: &ColumnData) -> crate::Result<ColumnData> {
	map_utf8(data, "upper", Type::Utf8, |s| Value::utf8(s.to_uppercase()))
}

pub fn lower(data: &ColumnData) -> crate::Result<ColumnData> {
	map_utf8(data, "lower", Type::Utf8, |s| Value::utf8(s.to_lowercase()))
}

pub fn length(data: &ColumnData) -> crate::Result<ColumnData> {
	map_utf8(data, "len", Type::Int8, |s| Value::Int8(s.chars().count() as i64))
}

pub fn starts_with(data: &ColumnData, prefix: &str) -> crate::Result<ColumnData> {
	map_utf8(data, "startswith", Type::Boolean, |s| Value::Boolean(s.starts_with(prefix)))
}

pub fn ends_with(data: &ColumnData, suffix: &str) -> crate::Result<ColumnData> {
	map_utf8(data, "endswith", Type::Boolean, |s| Value::Boolean(s.ends_with(suffix)))
}

fn branch_type(branches: &[&ColumnData]) -> crate::Result<Type> {
	let mut ty = Type::Undefined;
	for branch in branches {
		ty = Type::promote(ty, branch.get_type()).ok_or_else(|| FrameError::TypeMismatch {
			op: "if_else".to_string(),
			left: ty,
			right: branch.get_type(),
		})?;
	}
	Ok(ty)
}

/// An undefined condition takes the `otherwise` branch.
pub fn if_else(condition: &ColumnData, then: &ColumnData, otherwise: &ColumnData) -> crate::Result<ColumnData> {
	case_when(&[(condition, then)], otherwise)
}

/// First matching branch wins; rows matching none take `default`.
pub fn case_when(cases: &[(&ColumnData, &ColumnData)], default: &ColumnData) -> crate::Result<ColumnData> {
	let mut branches: Vec<&ColumnData> = cases.iter().map(|(_, v)| *v).collect();
	branches.push(default);
	let ty = branch_type(&branches)?;

	let masks = cases.iter().map(|(c, _)| c.as_mask()).collect::<crate::Result<Vec<_>>>()?;
	let values = (0..default.len()).map(|row| {
		for (k, mask) in masks.iter().enumerate() {
			if mask[row] {
				return cases[k].1.get(row);
			}
		}
		default.get(row)
	});
	build(ty, values)
}

pub fn coalesce(columns: &[&ColumnData]) -> crate::Result<ColumnData> {
	let ty = branch_type(columns)?;
	let len = columns.first().map_or(0, |c| c.len());
	let values = (0..len).map(|row| {
		columns.iter().map(|c| c.get(row)).find(|v| !v.is_undefined()).unwrap_or(Value::Undefined)
	});
	build(ty, values)
}
