// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::Verb;

use super::{SqlQuery, mutate::assign};
use crate::{Dispatcher, check, context::Context};

/// Records the keys. Nothing is grouped in SQL until a verb that reduces or
/// partitions reads them.
pub(crate) fn group_by(_: &Dispatcher, input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::GroupBy, BackendKind::Sql);
	let Verb::GroupBy {
		keys,
		add,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};
	if keys.is_empty() {
		return Err(ctx.empty_grouping());
	}

	let mut result = assign(&ctx, input, &check::computed_keys(keys))?;
	for (name, _) in keys {
		if !result.select.columns.contains_key(name) {
			return Err(ctx.grouping_column_not_found(name.clone(), result.select.column_names()));
		}
	}
	result.grouping.groups = result.grouping.keys_after(keys, *add);
	Ok(result)
}

pub(crate) fn ungroup(_: &Dispatcher, mut input: SqlQuery, _: &Verb) -> crate::Result<SqlQuery> {
	input.grouping.groups.clear();
	Ok(input)
}
