// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_frame::Frame;
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::{Verb, resolve_selection};

use super::{EagerFrame, mutate::assign};
use crate::{Dispatcher, check, context::Context};

pub(crate) fn select(_: &Dispatcher, mut input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Select, BackendKind::Eager);
	let Verb::Select(selectors) = verb else {
		return Err(ctx.unsupported_verb());
	};

	let names = input.frame.column_names();
	let selection = resolve_selection(&names, selectors).map_err(|err| ctx.select_error(err, names.clone()))?;
	check::keeps_groups(&ctx, &selection, &input.grouping.groups)?;

	let columns = selection
		.iter()
		.map(|(output, source)| {
			input.frame
				.try_column(source)
				.map(|column| column.clone().renamed(output.clone()))
				.map_err(|err| ctx.frame_error(err, source, names.clone()))
		})
		.collect::<crate::Result<Vec<_>>>()?;
	input.frame = Frame::new(columns).map_err(|err| ctx.frame_error(err, "select", names.clone()))?;
	Ok(input)
}

/// `(new, old)` pairs, applied in order.
pub(crate) fn rename(_: &Dispatcher, mut input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Rename, BackendKind::Eager);
	let Verb::Rename(pairs) = verb else {
		return Err(ctx.unsupported_verb());
	};
	let names = input.frame.column_names();
	input.frame = input.frame.rename(pairs).map_err(|err| ctx.frame_error(err, verb, names))?;
	Ok(input)
}

/// First row per distinct key, in order of appearance. Grouping columns are
/// always part of the key.
pub(crate) fn distinct(_: &Dispatcher, input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Distinct, BackendKind::Eager);
	let Verb::Distinct {
		keys,
		keep_all,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};

	let mut result = assign(&ctx, input, &check::computed_keys(keys))?;
	let names = if keys.is_empty() {
		result.frame.column_names()
	} else {
		check::with_groups(&result.grouping.groups, keys.iter().map(|(name, _)| name))
	};

	let view = result.frame.group_by_view(&names).map_err(|err| {
		ctx.frame_error(err, names.join(", "), result.frame.column_names())
	})?;
	let firsts: Vec<usize> = view.values().filter_map(|rows| rows.first().copied()).collect();
	result.frame = result.frame.take(&firsts);
	if !keep_all {
		result.frame = result.frame.select(&names).map_err(|err| ctx.frame_error(err, names.join(", "), vec![]))?;
	}
	Ok(result)
}

pub(crate) fn head(_: &Dispatcher, mut input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Head, BackendKind::Eager);
	let Verb::Head(n) = verb else {
		return Err(ctx.unsupported_verb());
	};
	input.frame = input.frame.head(*n);
	Ok(input)
}
