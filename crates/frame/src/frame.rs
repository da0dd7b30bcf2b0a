// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tidyq_type::Value;

use crate::{Column, ColumnData, FrameError};

/// An ordered set of equally long, uniquely named columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
	pub columns: Vec<Column>,
}

impl Frame {
	pub fn new(columns: Vec<Column>) -> crate::Result<Self> {
		let mut seen = HashSet::new();
		let expected = columns.first().map_or(0, |c| c.len());
		for column in &columns {
			if !seen.insert(column.name.as_str()) {
				return Err(FrameError::DuplicateColumn(column.name.clone()));
			}
			if column.len() != expected {
				return Err(FrameError::LengthMismatch {
					column: column.name.clone(),
					expected,
					got: column.len(),
				});
			}
		}
		Ok(Self {
			columns,
		})
	}

	pub fn row_count(&self) -> usize {
		self.columns.first().map_or(0, |c| c.len())
	}

	pub fn column_count(&self) -> usize {
		self.columns.len()
	}

	pub fn column_names(&self) -> Vec<String> {
		self.columns.iter().map(|c| c.name.clone()).collect()
	}

	pub fn has_column(&self, name: &str) -> bool {
		self.columns.iter().any(|c| c.name == name)
	}

	pub fn column(&self, name: &str) -> Option<&Column> {
		self.columns.iter().find(|c| c.name == name)
	}

	pub fn try_column(&self, name: &str) -> crate::Result<&Column> {
		self.column(name).ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
	}

	pub fn row(&self, index: usize) -> Vec<Value> {
		self.columns.iter().map(|c| c.data.get(index)).collect()
	}

	/// Replaces the column of the same name in place, or appends it.
	pub fn with_column(mut self, column: Column) -> crate::Result<Self> {
		if !self.columns.is_empty() && column.len() != self.row_count() {
			let got = column.len();
			return Err(FrameError::LengthMismatch {
				column: column.name,
				expected: self.row_count(),
				got,
			});
		}
		match self.columns.iter_mut().find(|c| c.name == column.name) {
			Some(existing) => existing.data = column.data,
			None => self.columns.push(column),
		}
		Ok(self)
	}

	/// Projects `names`, in that order.
	pub fn select(&self, names: &[String]) -> crate::Result<Frame> {
		let columns = names.iter().map(|n| self.try_column(n).cloned()).collect::<crate::Result<Vec<_>>>()?;
		Frame::new(columns)
	}

	/// Renames by `(new, old)` pairs, all at once, so two columns can
	/// trade names.
	pub fn rename(mut self, pairs: &[(String, String)]) -> crate::Result<Frame> {
		if let Some((_, missing)) = pairs.iter().find(|(_, old)| !self.has_column(old)) {
			return Err(FrameError::ColumnNotFound(missing.clone()));
		}
		for column in &mut self.columns {
			if let Some((new, _)) = pairs.iter().find(|(_, old)| *old == column.name) {
				column.name = new.clone();
			}
		}
		Frame::new(self.columns)
	}

	pub fn take(&self, indices: &[usize]) -> Frame {
		Frame {
			columns: self.columns.iter().map(|c| Column::new(c.name.clone(), c.data.take(indices))).collect(),
		}
	}

	/// Like `take`, with `None` producing an undefined row.
	pub fn take_optional(&self, indices: &[Option<usize>]) -> crate::Result<Frame> {
		let columns = self
			.columns
			.iter()
			.map(|c| {
				let values = indices.iter().map(|i| i.map_or(Value::Undefined, |i| c.data.get(i)));
				let data = ColumnData::from_values(values)?;
				let data = match (data, c.data.get_type()) {
					(ColumnData::Undefined(n), ty) => {
						let mut typed = ColumnData::with_type(ty);
						for _ in 0..n {
							typed.push(Value::Undefined)?;
						}
						typed
					}
					(data, _) => data,
				};
				Ok(Column::new(c.name.clone(), data))
			})
			.collect::<crate::Result<Vec<_>>>()?;
		Ok(Frame {
			columns,
		})
	}

	pub fn filter(&self, mask: &[bool]) -> Frame {
		Frame {
			columns: self.columns.iter().map(|c| Column::new(c.name.clone(), c.data.filter(mask))).collect(),
		}
	}

	pub fn head(&self, n: usize) -> Frame {
		let indices: Vec<usize> = (0..self.row_count().min(n)).collect();
		self.take(&indices)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn frame() -> Frame {
		Frame::new(vec![Column::int8("a", [1, 2, 3]), Column::utf8("b", ["x", "y", "z"])]).unwrap()
	}

	#[test]
	fn test_new_rejects_length_mismatch() {
		let err = Frame::new(vec![Column::int8("a", [1, 2]), Column::int8("b", [1])]).unwrap_err();
		assert_eq!(
			err,
			FrameError::LengthMismatch {
				column: "b".to_string(),
				expected: 2,
				got: 1
			}
		);
	}

	#[test]
	fn test_new_rejects_duplicates() {
		let err = Frame::new(vec![Column::int8("a", [1]), Column::int8("a", [1])]).unwrap_err();
		assert_eq!(err, FrameError::DuplicateColumn("a".to_string()));
	}

	#[test]
	fn test_with_column_overwrites_in_place() {
		let frame = frame().with_column(Column::int8("a", [7, 8, 9])).unwrap();
		assert_eq!(frame.column_names(), vec!["a", "b"]);
		assert_eq!(frame.column("a").unwrap().data, ColumnData::int8([7, 8, 9]));
	}

	#[test]
	fn test_with_column_appends() {
		let frame = frame().with_column(Column::bool("c", [true, false, true])).unwrap();
		assert_eq!(frame.column_names(), vec!["a", "b", "c"]);
	}

	#[test]
	fn test_with_column_rejects_length_mismatch() {
		let err = frame().with_column(Column::int8("c", [1])).unwrap_err();
		assert_eq!(
			err,
			FrameError::LengthMismatch {
				column: "c".to_string(),
				expected: 3,
				got: 1
			}
		);
	}

	#[test]
	fn test_select_orders() {
		let frame = frame().select(&["b".to_string(), "a".to_string()]).unwrap();
		assert_eq!(frame.column_names(), vec!["b", "a"]);
	}

	#[test]
	fn test_select_missing() {
		let err = frame().select(&["zz".to_string()]).unwrap_err();
		assert_eq!(err, FrameError::ColumnNotFound("zz".to_string()));
	}

	#[test]
	fn test_rename() {
		let pairs = |items: &[(&str, &str)]| -> Vec<(String, String)> {
			items.iter().map(|(new, old)| (new.to_string(), old.to_string())).collect()
		};
		let renamed = frame().rename(&pairs(&[("z", "a")])).unwrap();
		assert_eq!(renamed.column_names(), vec!["z", "b"]);

		let swapped = frame().rename(&pairs(&[("b", "a"), ("a", "b")])).unwrap();
		assert_eq!(swapped.column_names(), vec!["b", "a"]);
		assert_eq!(swapped.column("b").unwrap().data, ColumnData::int8([1, 2, 3]));

		let err = frame().rename(&pairs(&[("b", "a")])).unwrap_err();
		assert_eq!(err, FrameError::DuplicateColumn("b".to_string()));
		let err = frame().rename(&pairs(&[("c", "nope")])).unwrap_err();
		assert_eq!(err, FrameError::ColumnNotFound("nope".to_string()));
	}

	#[test]
	fn test_take_optional_keeps_type() {
		let frame = frame().take_optional(&[Some(2), None]).unwrap();
		assert_eq!(frame.column("a").unwrap().data, ColumnData::Int8(vec![3, 0], vec![true, false]));

		let frame = Frame::new(vec![Column::int8("a", [1])]).unwrap().take_optional(&[None]).unwrap();
		assert_eq!(frame.column("a").unwrap().data, ColumnData::Int8(vec![0], vec![false]));
	}

	#[test]
	fn test_head() {
		assert_eq!(frame().head(2).row_count(), 2);
		assert_eq!(frame().head(10).row_count(), 3);
	}

	#[test]
	fn test_serde() {
		let json = serde_json::to_string(&frame()).unwrap();
		assert_eq!(serde_json::from_str::<Frame>(&json).unwrap(), frame());
	}
}
