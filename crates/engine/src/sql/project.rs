// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use tidyq_frame::FrameError;
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::{Verb, resolve_selection};

use super::{SqlQuery, mutate::assign};
use crate::{Dispatcher, check, context::Context};

pub(crate) fn select(_: &Dispatcher, mut input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Select, BackendKind::Sql);
	let Verb::Select(selectors) = verb else {
		return Err(ctx.unsupported_verb());
	};

	let names = input.select.column_names();
	let selection = resolve_selection(&names, selectors).map_err(|err| ctx.select_error(err, names.clone()))?;
	check::keeps_groups(&ctx, &selection, &input.grouping.groups)?;

	let mut columns = IndexMap::with_capacity(selection.len());
	for (output, source) in selection {
		let column =
			input.select.columns.get(&source).cloned().ok_or_else(|| ctx.column_not_found(&source, names.clone()))?;
		if columns.contains_key(&output) {
			return Err(ctx.frame_error(FrameError::DuplicateColumn(output), "select", names));
		}
		columns.insert(output, column);
	}
	input.select.columns = columns;
	Ok(input)
}

/// `(new, old)` pairs, applied all at once. Only output names change; every
/// definition stays as it was.
pub(crate) fn rename(_: &Dispatcher, mut input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Rename, BackendKind::Sql);
	let Verb::Rename(pairs) = verb else {
		return Err(ctx.unsupported_verb());
	};
	let names = input.select.column_names();
	if let Some((_, missing)) = pairs.iter().find(|(_, old)| !input.select.columns.contains_key(old)) {
		return Err(ctx.column_not_found(missing.clone(), names));
	}

	let mut columns = IndexMap::with_capacity(input.select.columns.len());
	for (name, column) in std::mem::take(&mut input.select.columns) {
		let name = pairs.iter().find(|(_, old)| *old == name).map_or(name, |(new, _)| new.clone());
		if columns.contains_key(&name) {
			return Err(ctx.frame_error(FrameError::DuplicateColumn(name), verb, names));
		}
		columns.insert(name, column);
	}
	input.select.columns = columns;
	Ok(input)
}

/// `SELECT DISTINCT` over the keys, grouping columns first. Which row of a
/// key `keep_all` would return has no `DISTINCT` counterpart, so that form
/// is left to the eager backend.
pub(crate) fn distinct(_: &Dispatcher, input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Distinct, BackendKind::Sql);
	let Verb::Distinct {
		keys,
		keep_all,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};
	if *keep_all && !keys.is_empty() {
		return Err(ctx.unsupported_verb());
	}

	let mut result = assign(&ctx, input, &check::computed_keys(keys))?;
	if result.is_limited() {
		result.wrap();
	}
	let names = if keys.is_empty() {
		result.select.column_names()
	} else {
		check::with_groups(&result.grouping.groups, keys.iter().map(|(name, _)| name))
	};

	let mut columns = IndexMap::with_capacity(names.len());
	for name in names {
		let column = result
			.select
			.columns
			.get(&name)
			.cloned()
			.ok_or_else(|| ctx.column_not_found(&name, result.select.column_names()))?;
		columns.insert(name, column);
	}
	result.select.columns = columns;
	// DISTINCT cannot sort on what it no longer projects
	let projected = &result.select.columns;
	result.select.order_by.retain(|order| projected.values().any(|c| c.expr == order.expr));
	result.select.distinct = true;
	Ok(result)
}

pub(crate) fn head(_: &Dispatcher, mut input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Head, BackendKind::Sql);
	let Verb::Head(n) = verb else {
		return Err(ctx.unsupported_verb());
	};
	input.select.limit = Some(input.select.limit.map_or(*n, |limit| limit.min(*n)));
	Ok(input)
}

#[cfg(test)]
mod tests {
	use tidyq_expr::col;
	use tidyq_frame::ColumnData;
	use tidyq_type::ErrorKind;
	use tidyq_verb::{
		distinct as distinct_verb, distinct_keep_all, head as head_verb, rename as rename_verb,
		select as select_verb, starts_with,
	};

	use super::*;
	use crate::sql::tests::query;

	fn dispatcher() -> Dispatcher {
		Dispatcher::empty()
	}

	#[test]
	fn test_select_rename_and_drop() {
		let result = select(&dispatcher(), query(), &select_verb([col("y").eq(col("x")), col("s")])).unwrap();
		assert_eq!(result.sql(), r#"SELECT "x" AS "y", "s" FROM "t""#);

		let result = select(&dispatcher(), query(), &select_verb([-col("s")])).unwrap();
		assert_eq!(result.select.column_names(), vec!["x", "g"]);

		let result = select(&dispatcher(), query(), &select_verb([starts_with("s")])).unwrap();
		assert_eq!(result.select.column_names(), vec!["s"]);
	}

	#[test]
	fn test_select_keeps_groups() {
		let mut grouped = query();
		grouped.grouping.groups = vec!["g".to_string()];
		let err = select(&dispatcher(), grouped, &select_verb([col("x")])).unwrap_err();
		assert_eq!(err.code, "GROUP_002");
	}

	#[test]
	fn test_select_missing_column() {
		let err = select(&dispatcher(), query(), &select_verb([col("nope")])).unwrap_err();
		assert_eq!(err.code, "RESOLVE_001");
	}

	#[test]
	fn test_rename() {
		let result = rename(&dispatcher(), query(), &rename_verb([("y", "x")])).unwrap();
		assert_eq!(result.sql(), r#"SELECT "x" AS "y", "g", "s" FROM "t""#);
		assert_eq!(result.fetch().unwrap().column_names(), vec!["y", "g", "s"]);

		let result = rename(&dispatcher(), query(), &rename_verb([("g", "x"), ("x", "g")])).unwrap();
		assert_eq!(result.sql(), r#"SELECT "x" AS "g", "g" AS "x", "s" FROM "t""#);
		assert_eq!(result.fetch().unwrap().try_column("g").unwrap().data, ColumnData::int8([1, 2, 3, 4]));

		let err = rename(&dispatcher(), query(), &rename_verb([("g", "x")])).unwrap_err();
		assert_eq!(err.code, "RESOLVE_006");
		let err = rename(&dispatcher(), query(), &rename_verb([("y", "nope")])).unwrap_err();
		assert_eq!(err.code, "RESOLVE_001");
	}

	#[test]
	fn test_distinct() {
		let result = distinct(&dispatcher(), query(), &distinct_verb([col("s")])).unwrap();
		assert_eq!(result.sql(), r#"SELECT DISTINCT "s" FROM "t""#);
		assert_eq!(result.fetch().unwrap().row_count(), 3);

		let result = distinct(&dispatcher(), query(), &distinct_verb([])).unwrap();
		assert_eq!(result.fetch().unwrap().row_count(), 4);
	}

	#[test]
	fn test_distinct_keep_all_unsupported() {
		let err = distinct(&dispatcher(), query(), &distinct_keep_all([col("s")])).unwrap_err();
		assert_eq!(err.code, "DISPATCH_001");
		assert_eq!(err.kind(), ErrorKind::UnsupportedVerbOnBackend);
	}

	#[test]
	fn test_head_keeps_smallest_limit() {
		let result = head(&dispatcher(), query(), &head_verb(3)).unwrap();
		let result = head(&dispatcher(), result, &head_verb(5)).unwrap();
		assert_eq!(result.select.limit, Some(3));
		assert_eq!(result.fetch().unwrap().try_column("x").unwrap().data, ColumnData::int8([1, 2, 3]));
	}
}
