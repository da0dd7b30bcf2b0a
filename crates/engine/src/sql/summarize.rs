// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_sql::{OrderBy, Select};
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::Verb;

use super::{Mode, SqlQuery};
use crate::{Dispatcher, check, context::Context};

/// `GROUP BY` the keys, which lead the output and order it. A query that is
/// already reduced, limited or windowed is wrapped first.
pub(crate) fn summarize(_: &Dispatcher, mut input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Summarize, BackendKind::Sql);
	let Verb::Summarize(items) = verb else {
		return Err(ctx.unsupported_verb());
	};
	check::no_same_call_reference(&ctx, items)?;

	if input.is_windowed() || input.is_aggregated() || input.is_limited() || input.is_distinct() {
		input.wrap();
	}

	let groups = input.grouping.groups.clone();
	let mut select = Select::new(input.select.from.clone());
	select.where_clause = input.select.where_clause.clone();
	let mut keys = Vec::with_capacity(groups.len());
	{
		let compiler = input.compiler(&ctx, Mode::Aggregate)?;
		for group in &groups {
			let column = input
				.select
				.columns
				.get(group)
				.cloned()
				.ok_or_else(|| ctx.grouping_column_not_found(group.clone(), input.select.column_names()))?;
			keys.push(column.expr.clone());
			select.columns.insert(group.clone(), column);
		}
		for (name, expr) in items {
			let classification = ctx.classify(expr, &groups)?;
			check::reduces(&ctx, expr, &classification, &groups)?;
			select.columns.insert(name.clone(), compiler.compile(expr)?);
		}
	}

	// without keys or aggregates every row would repeat the same values
	if groups.is_empty() && !select.columns.values().any(|c| c.expr.contains_aggregate()) {
		select.limit = Some(1);
	}
	select.order_by = keys.iter().cloned().map(OrderBy::asc).collect();
	select.group_by = keys;
	input.select = select;
	Ok(input)
}
