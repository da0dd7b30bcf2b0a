// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![allow(dead_code)]

use tidyq::prelude::*;
use tidyq::{Chain, Error};
use tidyq_testing::{Backend, assert_frame_equal, assert_frame_sort_equal, backends, init_tracing};

/// g: [a, a, b, b, b], x: [1..5], s: [p, q, p, q, p]
pub fn data() -> Frame {
	tidyq_testing::frame! {
		"g" => ColumnData::utf8(["a", "a", "b", "b", "b"]),
		"x" => ColumnData::int8([1, 2, 3, 4, 5]),
		"s" => ColumnData::utf8(["p", "q", "p", "q", "p"]),
	}
}

pub fn run(backend: Backend, frame: &Frame, chain: &Chain) -> tidyq::Result<Frame> {
	init_tracing();
	(backend.source(frame) >> chain.clone()).collect()
}

fn collect_on(backend: Backend, frame: &Frame, chain: &Chain) -> Frame {
	run(backend, frame, chain).unwrap_or_else(|err| panic!("{backend}: {err}"))
}

/// Every backend gives `expected`, in any row order.
pub fn assert_rows(frame: &Frame, chain: impl Into<Chain>, expected: &Frame) {
	let chain = chain.into();
	for backend in backends() {
		assert_frame_sort_equal(&collect_on(backend, frame, &chain), expected);
	}
}

/// Every backend gives `expected`, row for row.
pub fn assert_ordered(frame: &Frame, chain: impl Into<Chain>, expected: &Frame) {
	let chain = chain.into();
	for backend in backends() {
		assert_frame_equal(&collect_on(backend, frame, &chain), expected);
	}
}

/// Every backend fails with `code`.
pub fn assert_fails(frame: &Frame, chain: impl Into<Chain>, code: &str) {
	let chain = chain.into();
	for backend in backends() {
		let err: Error = match run(backend, frame, &chain) {
			Ok(result) => panic!("{backend}: expected {code}, got\n{result}"),
			Err(err) => err,
		};
		assert_eq!(err.code, code, "{backend}: {err}");
	}
}
