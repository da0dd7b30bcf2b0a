// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_frame::{Column, ColumnData, Frame, SortDirection};
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::Verb;

use super::{EagerFrame, mutate::assign};
use crate::{Dispatcher, check, context::Context};

/// Rows per distinct key in ascending key order, or by descending count
/// when `sort` is set. Ties keep key order.
pub(crate) fn count(_: &Dispatcher, input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Count, BackendKind::Eager);
	let Verb::Count {
		keys,
		name,
		sort,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};

	let input = assign(&ctx, input, &check::computed_keys(keys))?;
	let names = check::with_groups(&input.grouping.groups, keys.iter().map(|(name, _)| name));
	if names.contains(name) {
		return Err(ctx.invalid_argument(name, format!("count column '{name}' clashes with a key")));
	}

	let view = input.frame.group_by_view(&names).map_err(|err| {
		ctx.frame_error(err, names.join(", "), input.frame.column_names())
	})?;
	let sorted = view.sorted();
	let firsts: Vec<usize> = sorted.iter().filter_map(|(_, rows)| rows.first().copied()).collect();
	let sizes: Vec<i64> = sorted.iter().map(|(_, rows)| rows.len() as i64).collect();

	let mut columns = names
		.iter()
		.map(|key| {
			let column = input.frame.try_column(key).map_err(|err| ctx.frame_error(err, key, input.frame.column_names()))?;
			Ok(Column::new(key.clone(), column.data.take(&firsts)))
		})
		.collect::<crate::Result<Vec<_>>>()?;
	columns.push(Column::new(name.clone(), ColumnData::int8(sizes)));
	let mut frame = Frame::new(columns).map_err(|err| ctx.frame_error(err, name, names.clone()))?;

	if *sort {
		let counts = frame.try_column(name).map_err(|err| ctx.frame_error(err, name, vec![]))?.data.clone();
		let permutation = frame.sort_permutation(&[(&counts, SortDirection::Desc)]);
		frame = frame.take(&permutation);
	}
	Ok(EagerFrame::new(frame))
}
