// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod common;

use common::{assert_fails, data, run};
use tidyq::{BackendKind, Chain, ErrorKind, SqliteConfig, VerbKind};
use tidyq::prelude::*;
use tidyq_testing::Backend;

#[test]
fn test_unknown_column() {
	assert_fails(&data(), mutate([("y", col("nope") + 1)]), "RESOLVE_001");
	assert_fails(&data(), filter([col("nope").gt(1)]), "RESOLVE_001");
	assert_fails(&data(), select([col("nope")]), "RESOLVE_001");
}

#[test]
fn test_unknown_column_lists_available() {
	let err = run(Backend::Eager, &data(), &mutate([("y", col("nope"))]).into()).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::ExpressionResolution);
	assert!(err.to_string().contains("nope"), "{err}");
}

#[test]
fn test_unknown_method() {
	assert_fails(&data(), mutate([("y", col("x").call("frobnicate", []))]), "RESOLVE_002");
}

#[test]
fn test_summarize_cannot_see_same_call_names() {
	assert_fails(&data(), summarize([("m", col("x").mean()), ("d", col("m") * 2)]), "RESOLVE_003");
}

#[test]
fn test_type_mismatch() {
	assert_fails(&data(), mutate([("y", col("g") + 1)]), "RESOLVE_005");
}

#[test]
fn test_summarize_needs_reductions() {
	assert_fails(&data(), group_by([col("g")]) >> summarize([("y", col("x") + 1)]), "RESOLVE_006");
	assert_fails(&data(), summarize([("c", col("x").cumsum())]), "RESOLVE_006");
}

#[test]
fn test_condition_must_be_boolean() {
	assert_fails(&data(), filter([col("x") + 1]), "RESOLVE_006");
}

#[test]
fn test_grouping_errors() {
	assert_fails(&data(), group_by([]), "GROUP_001");
	assert_fails(&data(), group_by([col("g")]) >> select([col("x")]), "GROUP_002");
	assert_fails(&data(), group_by([col("nope")]), "GROUP_003");
}

#[test]
fn test_count_name_clash() {
	assert_fails(&data(), count_with([col("s")], "s", false), "RESOLVE_006");
}

#[test]
fn test_median_missing_on_sqlite() {
	let chain = group_by([col("g")]) >> summarize([("m", col("x").median())]);
	let eager = run(Backend::Eager, &data(), &chain).unwrap();
	assert_eq!(eager.try_column("m").unwrap().data, ColumnData::float8([1.5, 4.0]));

	let err = run(Backend::Sqlite, &data(), &chain).unwrap_err();
	assert_eq!(err.code, "DISPATCH_002");
	assert_eq!(err.kind(), ErrorKind::UnsupportedVerbOnBackend);
}

#[test]
fn test_distinct_keep_all_eager_only() {
	let chain: Chain = distinct_keep_all([col("s")]).into();
	let eager = run(Backend::Eager, &data(), &chain).unwrap();
	assert_eq!(eager.column_names(), vec!["g", "x", "s"]);
	assert_eq!(eager.row_count(), 2);

	let err = run(Backend::Sqlite, &data(), &chain).unwrap_err();
	assert_eq!(err.code, "DISPATCH_001");
}

#[test]
fn test_grouped_mean_without_window_functions() {
	let connection = SqliteConnection::open(SqliteConfig::in_memory().window_functions(false)).unwrap();
	let table = SqlTable::create(connection, "data", &data()).unwrap();
	let pipeline = Pipeline::new(table) >> group_by([col("g")]) >> mutate([("m", col("x").mean())]);
	let err = pipeline.collect().unwrap_err();
	assert_eq!(err.code, "DISPATCH_002");
	assert_eq!(err.kind(), ErrorKind::UnsupportedVerbOnBackend);
	assert_eq!(err.verb, Some(VerbKind::Mutate));
	assert_eq!(err.backend, Some(BackendKind::Sql));
}
