// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_sql::{OrderBy, Select, SqlColumn, SqlExpr};
use tidyq_type::{BackendKind, Type, VerbKind};
use tidyq_verb::Verb;

use super::{SqlQuery, mutate::assign};
use crate::{Dispatcher, check, context::Context};

/// `COUNT(*)` per key, ordered by key or, when `sort` is set, by the count
/// with the keys breaking ties.
pub(crate) fn count(_: &Dispatcher, input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Count, BackendKind::Sql);
	let Verb::Count {
		keys,
		name,
		sort,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};

	let mut input = assign(&ctx, input, &check::computed_keys(keys))?;
	let names = check::with_groups(&input.grouping.groups, keys.iter().map(|(name, _)| name));
	if names.contains(name) {
		return Err(ctx.invalid_argument(name, format!("count column '{name}' clashes with a key")));
	}
	if input.is_windowed() || input.is_aggregated() || input.is_limited() || input.is_distinct() {
		input.wrap();
	}

	let mut select = Select::new(input.select.from.clone());
	select.where_clause = input.select.where_clause.clone();
	let mut group_by = Vec::with_capacity(names.len());
	for key in &names {
		let column = input
			.select
			.columns
			.get(key)
			.cloned()
			.ok_or_else(|| ctx.column_not_found(key, input.select.column_names()))?;
		group_by.push(column.expr.clone());
		select.columns.insert(key.clone(), column);
	}
	let total = SqlExpr::function("COUNT", vec![SqlExpr::Star]);
	select.columns.insert(name.clone(), SqlColumn::new(total.clone(), Type::Int8));

	if *sort {
		select.order_by.push(OrderBy::desc(total));
	}
	select.order_by.extend(group_by.iter().cloned().map(OrderBy::asc));
	select.group_by = group_by;
	input.select = select;
	Ok(input)
}
