// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::Verb;

use super::{EagerFrame, mutate::assign};
use crate::{Dispatcher, check, context::Context};

/// Records the keys; the rows stay as they are. Keys given as expressions
/// are computed first.
pub(crate) fn group_by(_: &Dispatcher, input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::GroupBy, BackendKind::Eager);
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
		if !result.frame.has_column(name) {
			return Err(ctx.grouping_column_not_found(name.clone(), result.frame.column_names()));
		}
	}
	result.grouping.groups = result.grouping.keys_after(keys, *add);
	Ok(result)
}

pub(crate) fn ungroup(_: &Dispatcher, mut input: EagerFrame, _: &Verb) -> crate::Result<EagerFrame> {
	input.grouping.groups.clear();
	Ok(input)
}
