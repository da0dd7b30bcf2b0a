// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

/// All column types a pipeline can carry
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
	/// A boolean: true or false.
	Boolean,
	/// An 8-byte signed integer
	Int8,
	/// An 8-byte floating point
	Float8,
	/// A UTF-8 encoded text.
	Utf8,
	/// Value is not defined (think null in common programming languages)
	Undefined,
}

impl Type {
	pub fn is_number(&self) -> bool {
		matches!(self, Type::Int8 | Type::Float8)
	}

	pub fn is_bool(&self) -> bool {
		matches!(self, Type::Boolean)
	}

	pub fn is_utf8(&self) -> bool {
		matches!(self, Type::Utf8)
	}

	/// The common type of two operands of an arithmetic operator.
	pub fn promote(left: Type, right: Type) -> Option<Type> {
		match (left, right) {
			(Type::Undefined, other) | (other, Type::Undefined) => Some(other),
			(Type::Int8, Type::Int8) => Some(Type::Int8),
			(l, r) if l.is_number() && r.is_number() => Some(Type::Float8),
			(l, r) if l == r => Some(l),
			_ => None,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Boolean => f.write_str("BOOLEAN"),
			Type::Int8 => f.write_str("INT8"),
			Type::Float8 => f.write_str("FLOAT8"),
			Type::Utf8 => f.write_str("UTF8"),
			Type::Undefined => f.write_str("UNDEFINED"),
		}
	}
}

impl FromStr for Type {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"bool" | "boolean" => Ok(Type::Boolean),
			"int" | "int8" | "int64" | "integer" => Ok(Type::Int8),
			"float" | "float8" | "float64" | "double" | "real" => Ok(Type::Float8),
			"str" | "text" | "utf8" | "string" => Ok(Type::Utf8),
			"undefined" | "null" => Ok(Type::Undefined),
			other => Err(format!("unknown type '{other}'")),
		}
	}
}
