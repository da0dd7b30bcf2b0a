// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::Classifier;
use tidyq_sql::{SqlColumn, SqlExpr};
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::Verb;

use super::{Mode, SqlQuery};
use crate::{Dispatcher, check, context::Context};

/// `WHERE` over the current level, or `HAVING` over the groups of a
/// `GROUP BY` level. Any other query whose rows are already reduced,
/// limited or fed into windows is wrapped first, since `WHERE` runs before
/// all of those.
pub(crate) fn filter(_: &Dispatcher, mut input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Filter, BackendKind::Sql);
	let Verb::Filter(conditions) = verb else {
		return Err(ctx.unsupported_verb());
	};
	for condition in conditions {
		let classification = ctx.classify(condition, &input.grouping.groups)?;
		check::warn_unordered(&ctx, condition, &classification, &input.grouping);
	}

	let plain = !conditions.iter().any(Classifier::contains_window);
	if plain && !input.select.group_by.is_empty() && !input.is_windowed() && !input.is_limited() && !input.is_distinct() {
		let compiled = {
			let compiler = input.compiler(&ctx, Mode::Aggregate)?;
			conditions.iter().map(|condition| compiler.condition(condition)).collect::<crate::Result<Vec<SqlColumn>>>()?
		};
		for condition in compiled {
			input.select.and_having(condition.expr);
		}
		return Ok(input);
	}

	if input.is_windowed() || input.is_aggregated() || input.is_limited() || input.is_distinct() {
		input.wrap();
	}

	let compiled = {
		let compiler = input.compiler(&ctx, Mode::Window)?;
		conditions.iter().map(|condition| compiler.condition(condition)).collect::<crate::Result<Vec<SqlColumn>>>()?
	};

	if plain {
		for condition in compiled {
			input.select.and_where(condition.expr);
		}
		return Ok(input);
	}

	// windows are not allowed in WHERE: every condition becomes a hidden
	// column, filtered on one level up
	let hidden: Vec<String> = (0..compiled.len()).map(|i| format!("_filter{i}")).collect();
	for (name, condition) in hidden.iter().zip(compiled) {
		input.select.columns.insert(name.clone(), condition);
	}
	input.wrap();
	for name in &hidden {
		input.select.and_where(SqlExpr::column(name));
		input.select.columns.shift_remove(name);
	}
	Ok(input)
}
