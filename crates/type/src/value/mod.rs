// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

mod ordered_f64;
mod r#type;

pub use ordered_f64::OrderedF64;
pub use r#type::Type;

/// A single cell value, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// An 8-byte signed integer
	Int8(i64),
	/// An 8-byte floating point
	Float8(OrderedF64),
	/// A UTF-8 encoded text.
	Utf8(String),
}

impl Value {
	pub fn undefined() -> Self {
		Value::Undefined
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	pub fn float8(v: impl Into<f64>) -> Self {
		OrderedF64::try_from(v.into()).map(Value::Float8).unwrap_or(Value::Undefined)
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn get_type(&self) -> Type {
		match self {
			Value::Undefined => Type::Undefined,
			Value::Boolean(_) => Type::Boolean,
			Value::Int8(_) => Type::Int8,
			Value::Float8(_) => Type::Float8,
			Value::Utf8(_) => Type::Utf8,
		}
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int8(v) => Some(*v as f64),
			Value::Float8(v) => Some(v.value()),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Boolean(v) => Some(*v),
			_ => None,
		}
	}

	/// Total order used for sorting and grouping: numbers compare across
	/// Int8/Float8, Undefined sorts after every defined value.
	pub fn cmp_undefined_last(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Value::Undefined, Value::Undefined) => Ordering::Equal,
			(Value::Undefined, _) => Ordering::Greater,
			(_, Value::Undefined) => Ordering::Less,
			(l, r) => l.partial_cmp(r).unwrap_or_else(|| l.rank().cmp(&r.rank())),
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Value::Boolean(_) => 0,
			Value::Int8(_) | Value::Float8(_) => 1,
			Value::Utf8(_) => 2,
			Value::Undefined => 3,
		}
	}
}

impl PartialOrd for Value {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		match (self, other) {
			(Value::Boolean(l), Value::Boolean(r)) => l.partial_cmp(r),
			(Value::Int8(l), Value::Int8(r)) => l.partial_cmp(r),
			(Value::Float8(l), Value::Float8(r)) => l.partial_cmp(r),
			(Value::Int8(l), Value::Float8(r)) => (*l as f64).partial_cmp(&r.value()),
			(Value::Float8(l), Value::Int8(r)) => l.value().partial_cmp(&(*r as f64)),
			(Value::Utf8(l), Value::Utf8(r)) => l.partial_cmp(r),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => f.write_str("undefined"),
			Value::Boolean(true) => f.write_str("true"),
			Value::Boolean(false) => f.write_str("false"),
			Value::Int8(v) => Display::fmt(v, f),
			Value::Float8(v) => Display::fmt(v, f),
			Value::Utf8(v) => Display::fmt(v, f),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int8(v as i64)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int8(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::float8(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map(Into::into).unwrap_or(Value::Undefined)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_float8_nan_is_undefined() {
		assert_eq!(Value::float8(f64::NAN), Value::Undefined);
	}

	#[test]
	fn test_mixed_numeric_comparison() {
		assert!(Value::int8(1) < Value::float8(1.5));
		assert_eq!(Value::float8(2.0).partial_cmp(&Value::int8(2)), Some(Ordering::Equal));
	}

	#[test]
	fn test_undefined_sorts_last() {
		let mut values = vec![Value::Undefined, Value::int8(2), Value::int8(1)];
		values.sort_by(|l, r| l.cmp_undefined_last(r));
		assert_eq!(values, vec![Value::int8(1), Value::int8(2), Value::Undefined]);
	}

	#[test]
	fn test_display() {
		assert_eq!(Value::utf8("a").to_string(), "a");
		assert_eq!(Value::float8(0.5).to_string(), "0.5");
		assert_eq!(Value::Undefined.to_string(), "undefined");
	}

	#[test]
	fn test_serde() {
		let json = serde_json::to_string(&Value::float8(1.5)).unwrap();
		let back: Value = serde_json::from_str(&json).unwrap();
		assert_eq!(back, Value::float8(1.5));
	}
}
