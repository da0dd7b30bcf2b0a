// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq::Chain;
use tidyq::prelude::*;
use tidyq_testing::{assert_frame_equal, assert_frame_sort_equal, backends, frame, init_tracing};

fn left() -> Frame {
	frame! {
		"id" => ColumnData::int8([1, 2, 3, 4]),
		"v" => ColumnData::utf8(["a", "b", "c", "d"]),
	}
}

fn right() -> Frame {
	frame! {
		"id" => ColumnData::int8([2, 3, 3, 5]),
		"w" => ColumnData::utf8(["B", "C", "CC", "E"]),
	}
}

// the verb built from the right-hand pipeline, run on every backend
fn joined<C: Into<Chain>>(join: impl Fn(Pipeline) -> C) -> Vec<Frame> {
	init_tracing();
	backends()
		.into_iter()
		.map(|backend| {
			let mut sources = backend.sources(&[("l", &left()), ("r", &right())]);
			let right = sources.remove(1);
			let left = sources.remove(0);
			let chain: Chain = join(right).into();
			(left >> chain).collect().unwrap_or_else(|err| panic!("{backend}: {err}"))
		})
		.collect()
}

#[test]
fn test_inner_join() {
	for result in joined(|right| inner_join(right, [("id", "id")])) {
		assert_frame_sort_equal(
			&result,
			&frame! {
				"id" => ColumnData::int8([2, 3, 3]),
				"v" => ColumnData::utf8(["b", "c", "c"]),
				"w" => ColumnData::utf8(["B", "C", "CC"]),
			},
		);
	}
}

#[test]
fn test_left_join_fills_undefined() {
	for result in joined(|right| left_join(right, [("id", "id")])) {
		assert_frame_sort_equal(
			&result,
			&frame! {
				"id" => ColumnData::int8([1, 2, 3, 3, 4]),
				"v" => ColumnData::utf8(["a", "b", "c", "c", "d"]),
				"w" => ColumnData::from_values([
					Value::Undefined,
					Value::utf8("B"),
					Value::utf8("C"),
					Value::utf8("CC"),
					Value::Undefined,
				])
				.unwrap(),
			},
		);
	}
}

#[test]
fn test_right_join_keeps_right_keys() {
	for result in joined(|right| right_join(right, [("id", "id")]) >> select([col("id")])) {
		assert_frame_sort_equal(&result, &frame! { "id" => ColumnData::int8([2, 3, 3, 5]) });
	}
}

#[test]
fn test_full_join() {
	for result in joined(|right| full_join(right, [("id", "id")])) {
		assert_frame_sort_equal(
			&result,
			&frame! {
				"id" => ColumnData::int8([1, 2, 3, 3, 4, 5]),
				"v" => ColumnData::from_values([
					Value::utf8("a"),
					Value::utf8("b"),
					Value::utf8("c"),
					Value::utf8("c"),
					Value::utf8("d"),
					Value::Undefined,
				])
				.unwrap(),
				"w" => ColumnData::from_values([
					Value::Undefined,
					Value::utf8("B"),
					Value::utf8("C"),
					Value::utf8("CC"),
					Value::Undefined,
					Value::utf8("E"),
				])
				.unwrap(),
			},
		);
	}
}

#[test]
fn test_semi_and_anti_join() {
	for result in joined(|right| semi_join(right, [("id", "id")])) {
		assert_frame_sort_equal(
			&result,
			&frame! {
				"id" => ColumnData::int8([2, 3]),
				"v" => ColumnData::utf8(["b", "c"]),
			},
		);
	}
	for result in joined(|right| anti_join(right, [("id", "id")])) {
		assert_frame_sort_equal(
			&result,
			&frame! {
				"id" => ColumnData::int8([1, 4]),
				"v" => ColumnData::utf8(["a", "d"]),
			},
		);
	}
}

#[test]
fn test_semi_join_keeps_left_order() {
	init_tracing();
	for backend in backends() {
		let mut sources = backend.sources(&[("l", &left()), ("r", &right())]);
		let right = sources.remove(1);
		let left = sources.remove(0);
		let result = (left >> arrange([-col("id")]) >> semi_join(right, [("id", "id")])).collect().unwrap();
		assert_frame_equal(
			&result,
			&frame! {
				"id" => ColumnData::int8([3, 2]),
				"v" => ColumnData::utf8(["c", "b"]),
			},
		);
	}
}

#[test]
fn test_join_on_renamed_keys_with_suffixes() {
	let other = frame! {
		"key" => ColumnData::int8([1, 4]),
		"v" => ColumnData::utf8(["x", "y"]),
	};
	init_tracing();
	for backend in backends() {
		let mut sources = backend.sources(&[("l", &left()), ("o", &other)]);
		let other = sources.remove(1);
		let left = sources.remove(0);
		let result = (left >> inner_join(other, [("id", "key")])).collect().unwrap();
		assert_frame_sort_equal(
			&result,
			&frame! {
				"id" => ColumnData::int8([1, 4]),
				"v_x" => ColumnData::utf8(["a", "d"]),
				"v_y" => ColumnData::utf8(["x", "y"]),
			},
		);
	}
}

#[test]
fn test_join_then_summarize() {
	for result in joined(|right| {
		inner_join(right, [("id", "id")]) >> group_by([col("id")]) >> summarize([("k", n(PLACEHOLDER))])
	}) {
		assert_frame_equal(
			&result,
			&frame! {
				"id" => ColumnData::int8([2, 3]),
				"k" => ColumnData::int8([1, 2]),
			},
		);
	}
}
