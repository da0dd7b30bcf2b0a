// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{cmp::Ordering, ops::Deref};

use indexmap::IndexMap;
use tidyq_type::Value;

use crate::{ColumnData, Frame};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupByKey(pub Vec<Value>);

impl GroupByKey {
	pub fn cmp_undefined_last(&self, other: &Self) -> Ordering {
		for (l, r) in self.0.iter().zip(other.0.iter()) {
			let ord = l.cmp_undefined_last(r);
			if ord != Ordering::Equal {
				return ord;
			}
		}
		Ordering::Equal
	}
}

/// Row indices per group, groups in first-appearance order and rows in
/// frame order within each group.
#[derive(Debug, Clone, Default)]
pub struct GroupByView(pub IndexMap<GroupByKey, Vec<usize>>);

impl Deref for GroupByView {
	type Target = IndexMap<GroupByKey, Vec<usize>>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl GroupByView {
	/// One group holding every row; used when no grouping keys are set.
	pub fn single(row_count: usize) -> Self {
		let mut result = IndexMap::new();
		result.insert(GroupByKey(vec![]), (0..row_count).collect());
		Self(result)
	}

	/// Groups ordered by key, ascending with undefined last.
	pub fn sorted(&self) -> Vec<(&GroupByKey, &Vec<usize>)> {
		let mut groups: Vec<_> = self.0.iter().collect();
		groups.sort_by(|(l, _), (r, _)| l.cmp_undefined_last(r));
		groups
	}

	/// Builds the view from already evaluated key columns.
	pub fn from_keys(keys: &[&ColumnData], row_count: usize) -> Self {
		if keys.is_empty() {
			return Self::single(row_count);
		}
		let mut result: IndexMap<GroupByKey, Vec<usize>> = IndexMap::new();
		for row in 0..row_count {
			let key = GroupByKey(keys.iter().map(|k| k.get(row)).collect());
			result.entry(key).or_default().push(row);
		}
		Self(result)
	}
}

impl Frame {
	pub fn group_by_view(&self, keys: &[String]) -> crate::Result<GroupByView> {
		let key_columns =
			keys.iter().map(|k| self.try_column(k).map(|c| &c.data)).collect::<crate::Result<Vec<_>>>()?;
		Ok(GroupByView::from_keys(&key_columns, self.row_count()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Column;

	#[test]
	fn test_first_appearance_order() {
		let frame = Frame::new(vec![Column::int8("g", [2, 1, 2, 1]), Column::int8("x", [1, 2, 3, 4])]).unwrap();
		let view = frame.group_by_view(&["g".to_string()]).unwrap();
		let groups: Vec<_> = view.iter().map(|(k, v)| (k.0.clone(), v.clone())).collect();
		assert_eq!(groups, vec![(vec![Value::int8(2)], vec![0, 2]), (vec![Value::int8(1)], vec![1, 3])]);
	}

	#[test]
	fn test_sorted() {
		let frame = Frame::new(vec![Column::from_values("g", [Value::Undefined, Value::int8(2), Value::int8(1)]).unwrap()])
			.unwrap();
		let view = frame.group_by_view(&["g".to_string()]).unwrap();
		let keys: Vec<_> = view.sorted().into_iter().map(|(k, _)| k.0[0].clone()).collect();
		assert_eq!(keys, vec![Value::int8(1), Value::int8(2), Value::Undefined]);
	}

	#[test]
	fn test_no_keys_is_single_group() {
		let frame = Frame::new(vec![Column::int8("x", [1, 2, 3])]).unwrap();
		let view = frame.group_by_view(&[]).unwrap();
		assert_eq!(view.len(), 1);
		assert_eq!(view.values().next().unwrap(), &vec![0, 1, 2]);
	}

	#[test]
	fn test_missing_key() {
		let frame = Frame::new(vec![Column::int8("x", [1])]).unwrap();
		assert!(frame.group_by_view(&["g".to_string()]).is_err());
	}
}
