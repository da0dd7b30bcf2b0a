// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use tidyq_frame::{Column, ColumnData, Frame, GroupByKey, compute::cast};
use tidyq_type::{BackendKind, Type, Value, VerbKind};
use tidyq_verb::{JoinHow, Pipeline, Verb};

use super::EagerFrame;
use crate::{Dispatcher, context::Context, join::JoinLayout};

pub(crate) fn join(dispatcher: &Dispatcher, mut input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Join, BackendKind::Eager);
	let Verb::Join {
		right,
		on,
		how,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};

	let right = materialize(dispatcher, right)?;
	let left = &input.frame;
	let layout = JoinLayout::new(&ctx, &schema(left), &schema(&right), on)?;
	let keys = Keys::new(&ctx, left, &right, on)?;
	let matches = keys.matches();

	let mut left_rows = Vec::new();
	let mut right_rows = Vec::new();
	let mut matched = vec![false; right.row_count()];
	for (row, found) in matches.iter().enumerate() {
		for &other in found {
			left_rows.push(Some(row));
			right_rows.push(Some(other));
			matched[other] = true;
		}
		if found.is_empty() && matches!(how, JoinHow::Left | JoinHow::Full) {
			left_rows.push(Some(row));
			right_rows.push(None);
		}
	}
	if matches!(how, JoinHow::Right | JoinHow::Full) {
		for (other, _) in matched.iter().enumerate().filter(|(_, hit)| !**hit) {
			left_rows.push(None);
			right_rows.push(Some(other));
		}
	}

	let coalesce_keys = matches!(how, JoinHow::Right | JoinHow::Full);
	let taken_left = left.take_optional(&left_rows).map_err(|err| ctx.frame_error(err, "join", left.column_names()))?;
	let taken_right =
		right.take_optional(&right_rows).map_err(|err| ctx.frame_error(err, "join", right.column_names()))?;

	let mut columns = Vec::with_capacity(layout.left.len() + layout.right.len());
	for column in &layout.left {
		let data = match (&column.key, coalesce_keys) {
			(Some(_), true) => keys.coalesced(&column.source, &left_rows, &right_rows).map_err(|err| {
				ctx.frame_error(err, &column.source, left.column_names())
			})?,
			_ => taken_left
				.try_column(&column.source)
				.map_err(|err| ctx.frame_error(err, &column.source, left.column_names()))?
				.data
				.clone(),
		};
		columns.push(Column::new(column.output.clone(), data));
	}
	for column in &layout.right {
		let taken = taken_right
			.try_column(&column.source)
			.map_err(|err| ctx.frame_error(err, &column.source, right.column_names()))?;
		columns.push(taken.clone().renamed(column.output.clone()));
	}

	input.frame = Frame::new(columns).map_err(|err| ctx.frame_error(err, "join", layout.output_names()))?;
	Ok(input)
}

pub(crate) fn semi_join(dispatcher: &Dispatcher, input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::SemiJoin, BackendKind::Eager);
	let Verb::SemiJoin {
		right,
		on,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};
	filter_join(&ctx, dispatcher, input, right, on, true)
}

pub(crate) fn anti_join(dispatcher: &Dispatcher, input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::AntiJoin, BackendKind::Eager);
	let Verb::AntiJoin {
		right,
		on,
	} = verb
	else {
		return Err(ctx.unsupported_verb());
	};
	filter_join(&ctx, dispatcher, input, right, on, false)
}

// keeps the left rows that have (or lack) a match; the columns are untouched
fn filter_join(
	ctx: &Context,
	dispatcher: &Dispatcher,
	mut input: EagerFrame,
	right: &Pipeline,
	on: &[(String, String)],
	keep_matched: bool,
) -> crate::Result<EagerFrame> {
	let right = materialize(dispatcher, right)?;
	JoinLayout::new(ctx, &schema(&input.frame), &schema(&right), on)?;
	let keys = Keys::new(ctx, &input.frame, &right, on)?;
	let mask: Vec<bool> = keys.matches().iter().map(|found| found.is_empty() != keep_matched).collect();
	input.frame = input.frame.filter(&mask);
	Ok(input)
}

// the right pipeline runs on its own backend and is then held in memory
fn materialize(dispatcher: &Dispatcher, right: &Pipeline) -> crate::Result<Frame> {
	dispatcher.run(right)?.materialize()
}

fn schema(frame: &Frame) -> Vec<(String, Type)> {
	frame.columns.iter().map(|c| (c.name.clone(), c.data.get_type())).collect()
}

/// Key columns of both sides, numeric keys of different types widened to
/// `Float8` so equal numbers hash alike.
struct Keys {
	names: Vec<String>,
	left: Vec<ColumnData>,
	right: Vec<ColumnData>,
}

impl Keys {
	fn new(ctx: &Context, left: &Frame, right: &Frame, on: &[(String, String)]) -> crate::Result<Self> {
		let mut result = Self {
			names: Vec::with_capacity(on.len()),
			left: Vec::with_capacity(on.len()),
			right: Vec::with_capacity(on.len()),
		};
		for (l, r) in on {
			let mut lk = left.try_column(l).map_err(|err| ctx.frame_error(err, l, left.column_names()))?.data.clone();
			let mut rk =
				right.try_column(r).map_err(|err| ctx.frame_error(err, r, right.column_names()))?.data.clone();
			let (lt, rt) = (lk.get_type(), rk.get_type());
			if lt != rt && lt.is_number() && rt.is_number() {
				let expression = format!("_.{l} == _.{r}");
				lk = cast(&lk, Type::Float8).map_err(|err| ctx.frame_error(err, &expression, vec![]))?;
				rk = cast(&rk, Type::Float8).map_err(|err| ctx.frame_error(err, &expression, vec![]))?;
			}
			result.names.push(l.clone());
			result.left.push(lk);
			result.right.push(rk);
		}
		Ok(result)
	}

	/// Matching right rows for every left row. An undefined key never
	/// matches, not even another undefined key.
	fn matches(&self) -> Vec<Vec<usize>> {
		let mut index: IndexMap<GroupByKey, Vec<usize>> = IndexMap::new();
		for row in 0..self.right.first().map_or(0, ColumnData::len) {
			if let Some(key) = key(&self.right, row) {
				index.entry(key).or_default().push(row);
			}
		}
		(0..self.left.first().map_or(0, ColumnData::len))
			.map(|row| key(&self.left, row).and_then(|key| index.get(&key).cloned()).unwrap_or_default())
			.collect()
	}

	/// The left key where the row came from the left input, else the
	/// right key it was matched on.
	fn coalesced(
		&self,
		name: &str,
		left_rows: &[Option<usize>],
		right_rows: &[Option<usize>],
	) -> tidyq_frame::Result<ColumnData> {
		let position = self
			.names
			.iter()
			.position(|n| n == name)
			.ok_or_else(|| tidyq_frame::FrameError::ColumnNotFound(name.to_string()))?;
		let (lk, rk) = (&self.left[position], &self.right[position]);
		let values = left_rows.iter().zip(right_rows).map(|(l, r)| match (l, r) {
			(Some(i), _) => lk.get(*i),
			(None, Some(j)) => rk.get(*j),
			(None, None) => Value::Undefined,
		});
		ColumnData::from_values(values)
	}
}

fn key(columns: &[ColumnData], row: usize) -> Option<GroupByKey> {
	let values: Vec<Value> = columns.iter().map(|c| c.get(row)).collect();
	if values.iter().any(Value::is_undefined) {
		return None;
	}
	Some(GroupByKey(values))
}
