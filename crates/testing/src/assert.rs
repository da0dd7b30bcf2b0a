// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_frame::{ColumnData, Frame, SortDirection};
use tidyq_type::Value;

const TOLERANCE: f64 = 1e-9;

/// Same columns, in the same order, with the same rows in the same order.
/// Numbers compare with a small tolerance; an integer equals the float of
/// the same value.
pub fn assert_frame_equal(actual: &Frame, expected: &Frame) {
	if let Err(reason) = compare(actual, expected) {
		panic!("frames differ: {reason}\n\nactual:\n{actual}\nexpected:\n{expected}");
	}
}

/// Like [`assert_frame_equal`], with both frames sorted by every column
/// first, so row order does not matter.
pub fn assert_frame_sort_equal(actual: &Frame, expected: &Frame) {
	let (sorted_actual, sorted_expected) = (sorted(actual), sorted(expected));
	if let Err(reason) = compare(&sorted_actual, &sorted_expected) {
		panic!("frames differ: {reason}\n\nactual (sorted):\n{sorted_actual}\nexpected (sorted):\n{sorted_expected}");
	}
}

fn sorted(frame: &Frame) -> Frame {
	let keys: Vec<(&ColumnData, SortDirection)> =
		frame.columns.iter().map(|column| (&column.data, SortDirection::Asc)).collect();
	frame.take(&frame.sort_permutation(&keys))
}

fn compare(actual: &Frame, expected: &Frame) -> Result<(), String> {
	if actual.column_names() != expected.column_names() {
		return Err(format!("columns {:?} != {:?}", actual.column_names(), expected.column_names()));
	}
	if actual.row_count() != expected.row_count() {
		return Err(format!("{} rows != {} rows", actual.row_count(), expected.row_count()));
	}
	for (left, right) in actual.columns.iter().zip(&expected.columns) {
		for row in 0..actual.row_count() {
			let (l, r) = (left.data.get(row), right.data.get(row));
			if !same(&l, &r) {
				return Err(format!("column '{}' row {row}: {l} != {r}", left.name));
			}
		}
	}
	Ok(())
}

fn same(left: &Value, right: &Value) -> bool {
	match (number(left), number(right)) {
		(Some(l), Some(r)) => l == r || (l - r).abs() <= TOLERANCE * l.abs().max(r.abs()).max(1.0),
		_ => left == right,
	}
}

fn number(value: &Value) -> Option<f64> {
	match value {
		Value::Int8(i) => Some(*i as f64),
		Value::Float8(f) => Some(f.value()),
		_ => None,
	}
}
