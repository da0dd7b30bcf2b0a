// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::{Assignments, Verb};

use super::{Mode, SqlQuery};
use crate::{Dispatcher, check, context::Context};

pub(crate) fn mutate(_: &Dispatcher, input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Mutate, BackendKind::Sql);
	let Verb::Mutate(items) = verb else {
		return Err(ctx.unsupported_verb());
	};
	assign(&ctx, input, items)
}

pub(crate) fn transmute(_: &Dispatcher, input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Transmute, BackendKind::Sql);
	let Verb::Transmute(items) = verb else {
		return Err(ctx.unsupported_verb());
	};
	let mut result = assign(&ctx, input, items)?;
	let keep = check::with_groups(&result.grouping.groups, items.iter().map(|(name, _)| name));
	let mut columns = IndexMap::with_capacity(keep.len());
	for name in keep {
		let column = result
			.select
			.columns
			.get(&name)
			.cloned()
			.ok_or_else(|| ctx.grouping_column_not_found(name.clone(), result.select.column_names()))?;
		columns.insert(name, column);
	}
	result.select.columns = columns;
	Ok(result)
}

/// Adds one select-list entry per assignment; an existing name is
/// redefined in place. A reduced or limited query is wrapped first, and so
/// is every window that would otherwise nest another window.
pub(crate) fn assign(ctx: &Context, mut query: SqlQuery, items: &Assignments) -> crate::Result<SqlQuery> {
	if !items.is_empty() && (query.is_aggregated() || query.is_limited() || query.is_distinct()) {
		query.wrap();
	}
	for (name, expr) in items {
		let classification = ctx.classify(expr, &query.grouping.groups)?;
		check::warn_unordered(ctx, expr, &classification, &query.grouping);

		if query.needs_wrap(expr) {
			query.wrap();
		}
		let column = query.compiler(ctx, Mode::Window)?.compile(expr)?;
		query.select.columns.insert(name.clone(), column);
	}
	Ok(query)
}

#[cfg(test)]
mod tests {
	use tidyq_expr::{PLACEHOLDER, col, lit, row_number};
	use tidyq_frame::ColumnData;
	use tidyq_verb::{Grouping, transmute as transmute_verb};

	use super::*;
	use crate::sql::tests::query;

	fn items(pairs: &[(&str, tidyq_expr::Expr)]) -> Assignments {
		pairs.iter().map(|(n, e)| (n.to_string(), e.clone())).collect()
	}

	fn ctx() -> Context {
		Context::new(VerbKind::Mutate, BackendKind::Sql)
	}

	#[test]
	fn test_later_assignment_inlines_earlier() {
		let result = assign(&ctx(), query(), &items(&[("y", col("x") + 1), ("z", col("y") * 2)])).unwrap();
		assert_eq!(result.sql(), r#"SELECT "x", "g", "s", "x" + 1 AS "y", ("x" + 1) * 2 AS "z" FROM "t""#);
		assert_eq!(result.fetch().unwrap().try_column("z").unwrap().data, ColumnData::int8([4, 6, 8, 10]));
	}

	#[test]
	fn test_overwrite_in_place() {
		let result = assign(&ctx(), query(), &items(&[("x", col("x") + 1), ("x", col("x") + 1)])).unwrap();
		let frame = result.fetch().unwrap();
		assert_eq!(frame.column_names(), vec!["x", "g", "s"]);
		assert_eq!(frame.try_column("x").unwrap().data, ColumnData::int8([3, 4, 5, 6]));
	}

	#[test]
	fn test_literal_broadcasts() {
		let result = assign(&ctx(), query(), &items(&[("one", lit(1))])).unwrap();
		assert_eq!(result.fetch().unwrap().try_column("one").unwrap().data, ColumnData::int8([1, 1, 1, 1]));
	}

	#[test]
	fn test_grouped_window() {
		let mut grouped = query();
		grouped.grouping = Grouping {
			groups: vec!["g".to_string()],
			order: vec![],
		};
		grouped.select.order_by = vec![tidyq_sql::OrderBy::asc(tidyq_sql::SqlExpr::column("x"))];
		let result = assign(&ctx(), grouped, &items(&[("r", row_number(PLACEHOLDER)), ("m", col("x").max())])).unwrap();
		let frame = result.fetch().unwrap();
		assert_eq!(frame.try_column("r").unwrap().data, ColumnData::int8([1, 2, 1, 2]));
		assert_eq!(frame.try_column("m").unwrap().data, ColumnData::int8([2, 2, 4, 4]));
	}

	#[test]
	fn test_window_over_window_wraps() {
		let result = assign(&ctx(), query(), &items(&[("m", col("x").mean()), ("d", (col("x") - col("m")).max())]))
			.unwrap();
		assert!(result.sql().contains(r#"AS "_q1""#));
		let frame = result.fetch().unwrap();
		assert_eq!(frame.try_column("d").unwrap().data, ColumnData::float8([1.5, 1.5, 1.5, 1.5]));
	}

	#[test]
	fn test_after_limit_wraps() {
		let mut limited = query();
		limited.select.limit = Some(2);
		let result = assign(&ctx(), limited, &items(&[("y", col("x") * 10)])).unwrap();
		assert!(result.sql().starts_with(r#"SELECT "x", "g", "s", "x" * 10 AS "y" FROM (SELECT"#));
		assert_eq!(result.fetch().unwrap().row_count(), 2);
	}

	#[test]
	fn test_unknown_column() {
		let err = assign(&ctx(), query(), &items(&[("y", col("nope") + 1)])).unwrap_err();
		assert_eq!(err.code, "RESOLVE_001");
	}

	#[test]
	fn test_transmute_keeps_groups_and_new_columns() {
		let mut grouped = query();
		grouped.grouping.groups = vec!["g".to_string()];
		let result = transmute(&Dispatcher::empty(), grouped, &transmute_verb([("y", col("x") * 10)])).unwrap();
		assert_eq!(result.select.column_names(), vec!["g", "y"]);
	}
}
