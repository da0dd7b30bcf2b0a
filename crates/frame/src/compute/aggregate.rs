// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashSet;

use tidyq_type::{Type, Value};

use crate::{ColumnData, FrameError};

/// Reductions over a set of row indices. Undefined cells are skipped; a
/// reduction over no defined cells is undefined, except the counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
	Sum,
	Mean,
	Min,
	Max,
	Count,
	// rows in the group, defined or not
	Size,
	Median,
	Std,
	Var,
	NUnique,
	First,
	Last,
}

impl Aggregate {
	pub fn from_name(name: &str) -> Option<Self> {
		Some(match name {
			"sum" => Aggregate::Sum,
			"mean" => Aggregate::Mean,
			"min" => Aggregate::Min,
			"max" => Aggregate::Max,
			"count" => Aggregate::Count,
			"n" => Aggregate::Size,
			"median" => Aggregate::Median,
			"std" => Aggregate::Std,
			"var" => Aggregate::Var,
			"nunique" => Aggregate::NUnique,
			"first" => Aggregate::First,
			"last" => Aggregate::Last,
			_ => return None,
		})
	}

	pub fn name(&self) -> &'static str {
		match self {
			Aggregate::Sum => "sum",
			Aggregate::Mean => "mean",
			Aggregate::Min => "min",
			Aggregate::Max => "max",
			Aggregate::Count => "count",
			Aggregate::Size => "n",
			Aggregate::Median => "median",
			Aggregate::Std => "std",
			Aggregate::Var => "var",
			Aggregate::NUnique => "nunique",
			Aggregate::First => "first",
			Aggregate::Last => "last",
		}
	}

	pub fn result_type(&self, input: Type) -> Type {
		match self {
			Aggregate::Count | Aggregate::Size | Aggregate::NUnique => Type::Int8,
			Aggregate::Mean | Aggregate::Median | Aggregate::Std | Aggregate::Var => Type::Float8,
			Aggregate::Sum if input == Type::Boolean => Type::Int8,
			Aggregate::Sum | Aggregate::Min | Aggregate::Max | Aggregate::First | Aggregate::Last => input,
		}
	}

	fn numeric(&self, data: &ColumnData, indices: &[usize]) -> crate::Result<Vec<f64>> {
		match data {
			ColumnData::Int8(_, _) | ColumnData::Float8(_, _) | ColumnData::Undefined(_) => {
				Ok(indices.iter().filter_map(|&i| data.as_f64(i)).collect())
			}
			ColumnData::Bool(v, b) => {
				Ok(indices.iter().filter(|&&i| b[i]).map(|&i| if v[i] { 1.0 } else { 0.0 }).collect())
			}
			other => Err(FrameError::UnsupportedType {
				op: self.name().to_string(),
				ty: other.get_type(),
			}),
		}
	}

	pub fn evaluate(&self, data: &ColumnData, indices: &[usize]) -> crate::Result<Value> {
		let defined = || indices.iter().copied().filter(|&i| data.is_defined(i));

		match self {
			Aggregate::Size => Ok(Value::Int8(indices.len() as i64)),
			Aggregate::Count => Ok(Value::Int8(defined().count() as i64)),
			Aggregate::NUnique => {
				let distinct: HashSet<Value> = defined().map(|i| data.get(i)).collect();
				Ok(Value::Int8(distinct.len() as i64))
			}
			Aggregate::First => Ok(indices.first().map_or(Value::Undefined, |&i| data.get(i))),
			Aggregate::Last => Ok(indices.last().map_or(Value::Undefined, |&i| data.get(i))),
			Aggregate::Min | Aggregate::Max => {
				let values = defined().map(|i| data.get(i));
				let best = values.reduce(|acc, v| {
					let ord = v.cmp_undefined_last(&acc);
					let replace = match self {
						Aggregate::Min => ord.is_lt(),
						_ => ord.is_gt(),
					};
					if replace { v } else { acc }
				});
				Ok(best.unwrap_or(Value::Undefined))
			}
			Aggregate::Sum => match data {
				ColumnData::Int8(v, b) => {
					let mut sum: i64 = 0;
					let mut any = false;
					for &i in indices.iter().filter(|&&i| b[i]) {
						any = true;
						sum = match sum.checked_add(v[i]) {
							Some(s) => s,
							None => return Ok(Value::Undefined),
						};
					}
					Ok(if any { Value::Int8(sum) } else { Value::Undefined })
				}
				ColumnData::Bool(_, _) => {
					let values = self.numeric(data, indices)?;
					Ok(if values.is_empty() {
						Value::Undefined
					} else {
						Value::Int8(values.iter().sum::<f64>() as i64)
					})
				}
				_ => {
					let values = self.numeric(data, indices)?;
					Ok(if values.is_empty() {
						Value::Undefined
					} else {
						Value::float8(values.iter().sum::<f64>())
					})
				}
			},
			Aggregate::Mean => {
				let values = self.numeric(data, indices)?;
				Ok(mean(&values).map_or(Value::Undefined, Value::float8))
			}
			Aggregate::Median => {
				let mut values = self.numeric(data, indices)?;
				if values.is_empty() {
					return Ok(Value::Undefined);
				}
				values.sort_by(|a, b| a.total_cmp(b));
				let mid = values.len() / 2;
				Ok(Value::float8(if values.len() % 2 == 0 {
					(values[mid - 1] + values[mid]) / 2.0
				} else {
					values[mid]
				}))
			}
			Aggregate::Var => {
				let values = self.numeric(data, indices)?;
				Ok(variance(&values).map_or(Value::Undefined, Value::float8))
			}
			Aggregate::Std => {
				let values = self.numeric(data, indices)?;
				Ok(variance(&values).map_or(Value::Undefined, |v| Value::float8(v.sqrt())))
			}
		}
	}
}

fn mean(values: &[f64]) -> Option<f64> {
	if values.is_empty() {
		None
	} else {
		Some(values.iter().sum::<f64>() / values.len() as f64)
	}
}

// sample variance
fn variance(values: &[f64]) -> Option<f64> {
	if values.len() < 2 {
		return None;
	}
	let m = mean(values)?;
	Some(values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64)
}
