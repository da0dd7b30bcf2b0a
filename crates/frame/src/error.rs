// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_type::Type;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameError {
	#[error("column '{0}' not found")]
	ColumnNotFound(String),

	#[error("duplicate column '{0}'")]
	DuplicateColumn(String),

	#[error("column '{column}' has {got} rows, expected {expected}")]
	LengthMismatch {
		column: String,
		expected: usize,
		got: usize,
	},

	#[error("cannot apply '{op}' to {left} and {right}")]
	TypeMismatch {
		op: String,
		left: Type,
		right: Type,
	},

	#[error("'{op}' is not defined for {ty}")]
	UnsupportedType {
		op: String,
		ty: Type,
	},

	#[error("cannot cast '{value}' to {to}")]
	InvalidCast {
		value: String,
		to: Type,
	},

	#[error("column mixes {first} and {other}")]
	MixedTypes {
		first: Type,
		other: Type,
	},
}
