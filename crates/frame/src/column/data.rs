// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};
use tidyq_type::{Type, Value};

use crate::FrameError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
	// value, is_valid
	Bool(Vec<bool>, Vec<bool>),
	Int8(Vec<i64>, Vec<bool>),
	Float8(Vec<f64>, Vec<bool>),
	Utf8(Vec<String>, Vec<bool>),

	// special case: all undefined
	Undefined(usize),
}

impl ColumnData {
	pub fn bool(values: impl IntoIterator<Item = bool>) -> Self {
		let values: Vec<bool> = values.into_iter().collect();
		let valid = vec![true; values.len()];
		ColumnData::Bool(values, valid)
	}

	pub fn int8(values: impl IntoIterator<Item = i64>) -> Self {
		let values: Vec<i64> = values.into_iter().collect();
		let valid = vec![true; values.len()];
		ColumnData::Int8(values, valid)
	}

	pub fn float8(values: impl IntoIterator<Item = f64>) -> Self {
		let values: Vec<f64> = values.into_iter().collect();
		let valid = values.iter().map(|v| !v.is_nan()).collect();
		ColumnData::Float8(values, valid)
	}

	pub fn utf8<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
		let values: Vec<String> = values.into_iter().map(Into::into).collect();
		let valid = vec![true; values.len()];
		ColumnData::Utf8(values, valid)
	}

	pub fn undefined(len: usize) -> Self {
		ColumnData::Undefined(len)
	}

	/// An empty column of the given type.
	pub fn with_type(ty: Type) -> Self {
		match ty {
			Type::Boolean => ColumnData::Bool(vec![], vec![]),
			Type::Int8 => ColumnData::Int8(vec![], vec![]),
			Type::Float8 => ColumnData::Float8(vec![], vec![]),
			Type::Utf8 => ColumnData::Utf8(vec![], vec![]),
			Type::Undefined => ColumnData::Undefined(0),
		}
	}

	/// `len` copies of `value`.
	pub fn repeat(value: &Value, len: usize) -> Self {
		match value {
			Value::Undefined => ColumnData::Undefined(len),
			Value::Boolean(v) => ColumnData::Bool(vec![*v; len], vec![true; len]),
			Value::Int8(v) => ColumnData::Int8(vec![*v; len], vec![true; len]),
			Value::Float8(v) => ColumnData::Float8(vec![v.value(); len], vec![true; len]),
			Value::Utf8(v) => ColumnData::Utf8(vec![v.clone(); len], vec![true; len]),
		}
	}

	/// Builds a column from cells. Int8 and Float8 cells mix into Float8;
	/// any other mix is an error.
	pub fn from_values(values: impl IntoIterator<Item = Value>) -> Result<Self, FrameError> {
		let values: Vec<Value> = values.into_iter().collect();

		let mut ty = Type::Undefined;
		for value in &values {
			let other = value.get_type();
			ty = match (ty, other) {
				(t, Type::Undefined) => t,
				(Type::Undefined, o) => o,
				(t, o) if t == o => t,
				(Type::Int8, Type::Float8) | (Type::Float8, Type::Int8) => Type::Float8,
				(first, other) => {
					return Err(FrameError::MixedTypes {
						first,
						other,
					});
				}
			};
		}

		let mut result = ColumnData::with_type(ty);
		for value in values {
			result.push(value)?;
		}
		Ok(result)
	}

	pub fn len(&self) -> usize {
		match self {
			ColumnData::Bool(_, b) => b.len(),
			ColumnData::Int8(_, b) => b.len(),
			ColumnData::Float8(_, b) => b.len(),
			ColumnData::Utf8(_, b) => b.len(),
			ColumnData::Undefined(n) => *n,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn get_type(&self) -> Type {
		match self {
			ColumnData::Bool(_, _) => Type::Boolean,
			ColumnData::Int8(_, _) => Type::Int8,
			ColumnData::Float8(_, _) => Type::Float8,
			ColumnData::Utf8(_, _) => Type::Utf8,
			ColumnData::Undefined(_) => Type::Undefined,
		}
	}

	pub fn is_defined(&self, index: usize) -> bool {
		match self {
			ColumnData::Bool(_, b)
			| ColumnData::Int8(_, b)
			| ColumnData::Float8(_, b)
			| ColumnData::Utf8(_, b) => b[index],
			ColumnData::Undefined(_) => false,
		}
	}

	pub fn get(&self, index: usize) -> Value {
		if !self.is_defined(index) {
			return Value::Undefined;
		}
		match self {
			ColumnData::Bool(v, _) => Value::Boolean(v[index]),
			ColumnData::Int8(v, _) => Value::Int8(v[index]),
			ColumnData::Float8(v, _) => Value::float8(v[index]),
			ColumnData::Utf8(v, _) => Value::Utf8(v[index].clone()),
			ColumnData::Undefined(_) => Value::Undefined,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
		(0..self.len()).map(|i| self.get(i))
	}

	/// Appends a cell. An Undefined column adopts the type of the first
	/// defined value; Int8 cells are widened into Float8 columns.
	pub fn push(&mut self, value: Value) -> Result<(), FrameError> {
		if let ColumnData::Undefined(n) = self {
			if !value.is_undefined() {
				let count = *n;
				let mut promoted = ColumnData::with_type(value.get_type());
				for _ in 0..count {
					promoted.push(Value::Undefined)?;
				}
				promoted.push(value)?;
				*self = promoted;
				return Ok(());
			}
		}

		match (&mut *self, value) {
			(ColumnData::Bool(v, b), Value::Boolean(x)) => {
				v.push(x);
				b.push(true);
			}
			(ColumnData::Int8(v, b), Value::Int8(x)) => {
				v.push(x);
				b.push(true);
			}
			(ColumnData::Float8(v, b), Value::Float8(x)) => {
				v.push(x.value());
				b.push(true);
			}
			(ColumnData::Float8(v, b), Value::Int8(x)) => {
				v.push(x as f64);
				b.push(true);
			}
			(ColumnData::Utf8(v, b), Value::Utf8(x)) => {
				v.push(x);
				b.push(true);
			}
			(ColumnData::Bool(v, b), Value::Undefined) => {
				v.push(false);
				b.push(false);
			}
			(ColumnData::Int8(v, b), Value::Undefined) => {
				v.push(0);
				b.push(false);
			}
			(ColumnData::Float8(v, b), Value::Undefined) => {
				v.push(0.0);
				b.push(false);
			}
			(ColumnData::Utf8(v, b), Value::Undefined) => {
				v.push(String::new());
				b.push(false);
			}
			(ColumnData::Undefined(n), Value::Undefined) => {
				*n += 1;
			}
			(column, value) => {
				return Err(FrameError::MixedTypes {
					first: column.get_type(),
					other: value.get_type(),
				});
			}
		}
		Ok(())
	}

	/// Gathers the rows at `indices`, in that order.
	pub fn take(&self, indices: &[usize]) -> ColumnData {
		fn gather<T: Clone>(v: &[T], b: &[bool], indices: &[usize]) -> (Vec<T>, Vec<bool>) {
			(indices.iter().map(|&i| v[i].clone()).collect(), indices.iter().map(|&i| b[i]).collect())
		}

		match self {
			ColumnData::Bool(v, b) => {
				let (v, b) = gather(v, b, indices);
				ColumnData::Bool(v, b)
			}
			ColumnData::Int8(v, b) => {
				let (v, b) = gather(v, b, indices);
				ColumnData::Int8(v, b)
			}
			ColumnData::Float8(v, b) => {
				let (v, b) = gather(v, b, indices);
				ColumnData::Float8(v, b)
			}
			ColumnData::Utf8(v, b) => {
				let (v, b) = gather(v, b, indices);
				ColumnData::Utf8(v, b)
			}
			ColumnData::Undefined(_) => ColumnData::Undefined(indices.len()),
		}
	}

	/// Keeps rows where `mask` is true.
	pub fn filter(&self, mask: &[bool]) -> ColumnData {
		let indices: Vec<usize> = mask.iter().enumerate().filter(|(_, keep)| **keep).map(|(i, _)| i).collect();
		self.take(&indices)
	}

	/// Writes `values[k]` into row `positions[k]`.
	pub fn scatter(&mut self, positions: &[usize], values: &ColumnData) -> Result<(), FrameError> {
		let mut cells: Vec<Value> = self.iter().collect();
		for (k, &pos) in positions.iter().enumerate() {
			cells[pos] = values.get(k);
		}
		*self = ColumnData::from_values(cells)?;
		Ok(())
	}

	pub fn as_f64(&self, index: usize) -> Option<f64> {
		if !self.is_defined(index) {
			return None;
		}
		match self {
			ColumnData::Int8(v, _) => Some(v[index] as f64),
			ColumnData::Float8(v, _) => Some(v[index]),
			_ => None,
		}
	}

	/// Interprets a boolean column as a row mask; undefined rows are dropped.
	pub fn as_mask(&self) -> Result<Vec<bool>, FrameError> {
		match self {
			ColumnData::Bool(v, b) => Ok(v.iter().zip(b).map(|(v, b)| *v && *b).collect()),
			ColumnData::Undefined(n) => Ok(vec![false; *n]),
			other => Err(FrameError::UnsupportedType {
				op: "filter".to_string(),
				ty: other.get_type(),
			}),
		}
	}
}
