// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cmp::Ordering;

use tidyq_type::{Type, Value};

use crate::{
	ColumnData, FrameError,
	compute::Aggregate,
	transform::{SortDirection, sort_indices},
};

/// Order dependent, row aligned transforms over one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cumulative {
	Sum,
	Mean,
	Min,
	Max,
	Count,
	RowNumber,
	Rank,
	DenseRank,
	PercentRank,
	Lag(usize),
	Lead(usize),
}

impl Cumulative {
	/// `offset` is only read by `lag` and `lead`.
	pub fn from_name(name: &str, offset: usize) -> Option<Self> {
		Some(match name {
			"cumsum" => Cumulative::Sum,
			"cummean" => Cumulative::Mean,
			"cummin" => Cumulative::Min,
			"cummax" => Cumulative::Max,
			"cumcount" => Cumulative::Count,
			"row_number" => Cumulative::RowNumber,
			"rank" | "min_rank" => Cumulative::Rank,
			"dense_rank" => Cumulative::DenseRank,
			"percent_rank" => Cumulative::PercentRank,
			"lag" => Cumulative::Lag(offset),
			"lead" => Cumulative::Lead(offset),
			_ => return None,
		})
	}

	/// Rank functions order by their argument rather than the row order.
	pub fn ranks_by_value(&self) -> bool {
		matches!(self, Cumulative::Rank | Cumulative::DenseRank | Cumulative::PercentRank)
	}

	pub fn result_type(&self, input: Type) -> Type {
		match self {
			Cumulative::Sum if input == Type::Boolean => Type::Int8,
			Cumulative::Sum | Cumulative::Min | Cumulative::Max | Cumulative::Lag(_) | Cumulative::Lead(_) => input,
			Cumulative::Mean | Cumulative::PercentRank => Type::Float8,
			Cumulative::Count | Cumulative::RowNumber | Cumulative::Rank | Cumulative::DenseRank => Type::Int8,
		}
	}

	/// Evaluates over `ordered` (row indices of one group, in row order) and
	/// returns one value per entry of `ordered`.
	pub fn evaluate(&self, data: &ColumnData, ordered: &[usize]) -> crate::Result<Vec<Value>> {
		match self {
			Cumulative::RowNumber => Ok((1..=ordered.len()).map(|i| Value::Int8(i as i64)).collect()),
			Cumulative::Lag(n) => Ok((0..ordered.len())
				.map(|k| k.checked_sub(*n).map_or(Value::Undefined, |j| data.get(ordered[j])))
				.collect()),
			Cumulative::Lead(n) => Ok((0..ordered.len())
				.map(|k| ordered.get(k + n).map_or(Value::Undefined, |&j| data.get(j)))
				.collect()),
			Cumulative::Rank | Cumulative::DenseRank | Cumulative::PercentRank => self.rank(data, ordered),
			Cumulative::Sum | Cumulative::Mean | Cumulative::Min | Cumulative::Max | Cumulative::Count => {
				let aggregate = match self {
					Cumulative::Sum => Aggregate::Sum,
					Cumulative::Mean => Aggregate::Mean,
					Cumulative::Min => Aggregate::Min,
					Cumulative::Max => Aggregate::Max,
					_ => Aggregate::Count,
				};
				if matches!(self, Cumulative::Sum | Cumulative::Mean) && data.get_type() == Type::Utf8 {
					return Err(FrameError::UnsupportedType {
						op: aggregate.name().to_string(),
						ty: Type::Utf8,
					});
				}
				// running frame: rows from the start of the group up to the current row
				(1..=ordered.len()).map(|end| aggregate.evaluate(data, &ordered[..end])).collect()
			}
		}
	}

	fn rank(&self, data: &ColumnData, ordered: &[usize]) -> crate::Result<Vec<Value>> {
		let mut by_value = ordered.to_vec();
		sort_indices(&[(data, SortDirection::Asc)], &mut by_value);

		let mut ranks = vec![0i64; data.len()];
		let mut rank = 0i64;
		let mut dense = 0i64;
		let mut previous: Option<Value> = None;
		for (position, &row) in by_value.iter().enumerate() {
			let value = data.get(row);
			let tie = previous.as_ref().is_some_and(|p| p.cmp_undefined_last(&value) == Ordering::Equal);
			if !tie {
				rank = position as i64 + 1;
				dense += 1;
			}
			ranks[row] = match self {
				Cumulative::DenseRank => dense,
				_ => rank,
			};
			previous = Some(value);
		}

		let count = ordered.len();
		Ok(ordered
			.iter()
			.map(|&row| match self {
				Cumulative::PercentRank if count <= 1 => Value::float8(0.0),
				Cumulative::PercentRank => Value::float8((ranks[row] - 1) as f64 / (count - 1) as f64),
				_ => Value::Int8(ranks[row]),
			})
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ints(values: &[Value]) -> Vec<Option<i64>> {
		values
			.iter()
			.map(|v| match v {
				Value::Int8(i) => Some(*i),
				_ => None,
			})
			.collect()
	}

	#[test]
	fn test_cumsum() {
		let data = ColumnData::int8([1, 2, 3, 4]);
		let result = Cumulative::Sum.evaluate(&data, &[0, 1]).unwrap();
		assert_eq!(ints(&result), vec![Some(1), Some(3)]);
		let result = Cumulative::Sum.evaluate(&data, &[2, 3]).unwrap();
		assert_eq!(ints(&result), vec![Some(3), Some(7)]);
	}

	#[test]
	fn test_cumsum_leading_undefined() {
		let data = ColumnData::Int8(vec![0, 2], vec![false, true]);
		let result = Cumulative::Sum.evaluate(&data, &[0, 1]).unwrap();
		assert_eq!(result, vec![Value::Undefined, Value::int8(2)]);
	}

	#[test]
	fn test_row_number_follows_order() {
		let data = ColumnData::undefined(3);
		let result = Cumulative::RowNumber.evaluate(&data, &[2, 0, 1]).unwrap();
		assert_eq!(ints(&result), vec![Some(1), Some(2), Some(3)]);
	}

	#[test]
	fn test_lag_lead() {
		let data = ColumnData::int8([10, 20, 30]);
		assert_eq!(
			Cumulative::Lag(1).evaluate(&data, &[0, 1, 2]).unwrap(),
			vec![Value::Undefined, Value::int8(10), Value::int8(20)]
		);
		assert_eq!(
			Cumulative::Lead(2).evaluate(&data, &[0, 1, 2]).unwrap(),
			vec![Value::int8(30), Value::Undefined, Value::Undefined]
		);
	}

	#[test]
	fn test_ranks_with_ties() {
		let data = ColumnData::int8([30, 10, 30, 20]);
		let rows = [0, 1, 2, 3];
		assert_eq!(ints(&Cumulative::Rank.evaluate(&data, &rows).unwrap()), vec![Some(3), Some(1), Some(3), Some(2)]);
		assert_eq!(
			ints(&Cumulative::DenseRank.evaluate(&data, &rows).unwrap()),
			vec![Some(3), Some(1), Some(3), Some(2)]
		);

		let data = ColumnData::int8([10, 10, 20]);
		assert_eq!(ints(&Cumulative::Rank.evaluate(&data, &[0, 1, 2]).unwrap()), vec![Some(1), Some(1), Some(3)]);
		assert_eq!(ints(&Cumulative::DenseRank.evaluate(&data, &[0, 1, 2]).unwrap()), vec![Some(1), Some(1), Some(2)]);
	}

	#[test]
	fn test_percent_rank() {
		let data = ColumnData::int8([10, 20, 30]);
		assert_eq!(
			Cumulative::PercentRank.evaluate(&data, &[0, 1, 2]).unwrap(),
			vec![Value::float8(0.0), Value::float8(0.5), Value::float8(1.0)]
		);
		assert_eq!(Cumulative::PercentRank.evaluate(&data, &[1]).unwrap(), vec![Value::float8(0.0)]);
	}

	#[test]
	fn test_cummax() {
		let data = ColumnData::int8([1, 3, 2]);
		assert_eq!(ints(&Cumulative::Max.evaluate(&data, &[0, 1, 2]).unwrap()), vec![Some(1), Some(3), Some(3)]);
	}
}
