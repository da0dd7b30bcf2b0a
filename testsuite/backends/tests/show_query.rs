// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod common;

use common::data;
use tidyq::prelude::*;
use tidyq_testing::Backend;

#[test]
fn test_sql_text() {
	let pipeline = Backend::Sqlite.source(&data()) >> group_by([col("g")]) >> summarize([("total", col("x").sum())]);
	assert_eq!(
		pipeline.show_query().unwrap(),
		r#"SELECT "g", SUM("x") AS "total" FROM "data" GROUP BY "g" ORDER BY "g" ASC NULLS LAST"#
	);
}

#[test]
fn test_eager_shows_pipeline() {
	let pipeline = Backend::Eager.source(&data()) >> filter([col("x").gt(1)]) >> head(2);
	assert_eq!(pipeline.show_query().unwrap(), "frame[g, x, s] >> filter(_.x > 1) >> head(2)");
}

#[test]
fn test_show_query_does_not_run() {
	let pipeline = Backend::Sqlite.source(&data()) >> mutate([("y", col("x") * 2)]) >> filter([col("y").gt(4)]);
	assert_eq!(
		pipeline.show_query().unwrap(),
		r#"SELECT "g", "x", "s", "x" * 2 AS "y" FROM "data" WHERE ("x" * 2) > 4"#
	);
}
