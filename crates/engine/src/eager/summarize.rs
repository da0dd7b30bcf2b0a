// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::{Expr, col};
use tidyq_frame::{Column, Frame, GroupByView};
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::Verb;

use super::{EagerFrame, Evaluator};
use crate::{Dispatcher, check, context::Context};

/// One row per group, keys first and groups in ascending key order. An
/// ungrouped frame is one group, so it always yields exactly one row.
pub(crate) fn summarize(_: &Dispatcher, input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Summarize, BackendKind::Eager);
	let Verb::Summarize(items) = verb else {
		return Err(ctx.unsupported_verb());
	};
	check::no_same_call_reference(&ctx, items)?;

	let groups = &input.grouping.groups;
	let view = input.view(&ctx)?;
	let sorted = view.sorted();
	let rows: Vec<&Vec<usize>> = sorted.iter().map(|(_, rows)| *rows).collect();
	let firsts: Vec<usize> = rows.iter().filter_map(|rows| rows.first().copied()).collect();

	let keys = groups
		.iter()
		.map(|name| {
			let column = input.frame.try_column(name).map_err(|err| ctx.frame_error(err, name, input.frame.column_names()))?;
			Ok(Column::new(name.clone(), column.data.take(&firsts)))
		})
		.collect::<crate::Result<Vec<_>>>()?;
	let mut summary = Frame::new(keys).map_err(|err| ctx.frame_error(err, groups.join(", "), vec![]))?;

	let evaluator = Evaluator::new(&ctx, &input.frame, &view);
	for (name, expr) in items {
		let classification = ctx.classify(expr, groups)?;
		check::reduces(&ctx, expr, &classification, groups)?;

		// every aggregate becomes a hidden per-group column; the expression
		// around them is then evaluated over the group-level frame
		let mut scope = summary.clone();
		let mut rewritten = expr.clone();
		for (i, window) in classification.windows.iter().enumerate() {
			let hidden = format!("__window_{i}");
			let data = evaluator.reduce(window, &rows)?;
			scope = scope.with_column(Column::new(hidden.clone(), data)).map_err(|err| ctx.frame_error(err, expr, vec![]))?;
			rewritten = rewritten.transform(&mut |node: &Expr| (node == window).then(|| col(hidden.clone())));
		}

		let single = GroupByView::single(rows.len());
		let data = Evaluator::new(&ctx, &scope, &single)
			.with_rows(rows.len())
			.evaluate(&rewritten)
			.map_err(|mut err| {
				// report the expression as written, not its rewritten form
				err.expression = Some(expr.to_string());
				err
			})?;
		let available = summary.column_names();
		summary = summary.with_column(Column::new(name.clone(), data)).map_err(|err| ctx.frame_error(err, expr, available))?;
	}

	Ok(EagerFrame::new(summary))
}
