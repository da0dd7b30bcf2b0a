// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_frame::Column;
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::{Assignments, Verb};

use super::{EagerFrame, Evaluator};
use crate::{Dispatcher, check, context::Context};

pub(crate) fn mutate(_: &Dispatcher, input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Mutate, BackendKind::Eager);
	let Verb::Mutate(items) = verb else {
		return Err(ctx.unsupported_verb());
	};
	assign(&ctx, input, items)
}

pub(crate) fn transmute(_: &Dispatcher, input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Transmute, BackendKind::Eager);
	let Verb::Transmute(items) = verb else {
		return Err(ctx.unsupported_verb());
	};
	let mut result = assign(&ctx, input, items)?;
	let keep = check::with_groups(&result.grouping.groups, items.iter().map(|(name, _)| name));
	result.frame = result.frame.select(&keep).map_err(|err| ctx.frame_error(err, keep.join(", "), vec![]))?;
	Ok(result)
}

/// Applies the assignments left to right; each one sees the columns the
/// earlier ones wrote. Assigning an existing name replaces it in place.
pub(crate) fn assign(ctx: &Context, mut input: EagerFrame, items: &Assignments) -> crate::Result<EagerFrame> {
	for (name, expr) in items {
		let classification = ctx.classify(expr, &input.grouping.groups)?;
		check::warn_unordered(ctx, expr, &classification, &input.grouping);

		let view = input.view(ctx)?;
		let data = Evaluator::new(ctx, &input.frame, &view).evaluate(expr)?;
		let available = input.frame.column_names();
		input.frame = input
			.frame
			.with_column(Column::new(name.clone(), data))
			.map_err(|err| ctx.frame_error(err, expr, available))?;
	}
	Ok(input)
}

#[cfg(test)]
mod tests {
	use tidyq_expr::{PLACEHOLDER, col, lit, row_number};
	use tidyq_frame::{ColumnData, Frame};
	use tidyq_verb::{Grouping, transmute as transmute_verb};

	use super::*;

	fn input() -> EagerFrame {
		EagerFrame::new(Frame::new(vec![Column::int8("x", [1, 2, 3, 4]), Column::int8("g", [1, 1, 2, 2])]).unwrap())
	}

	fn items(pairs: &[(&str, tidyq_expr::Expr)]) -> Assignments {
		pairs.iter().map(|(n, e)| (n.to_string(), e.clone())).collect()
	}

	fn ctx() -> Context {
		Context::new(VerbKind::Mutate, BackendKind::Eager)
	}

	#[test]
	fn test_later_assignment_sees_earlier() {
		let result = assign(&ctx(), input(), &items(&[("y", col("x") + 1), ("z", col("y") + 1)])).unwrap();
		assert_eq!(result.frame.try_column("z").unwrap().data, ColumnData::int8([3, 4, 5, 6]));
	}

	#[test]
	fn test_overwrite_in_place() {
		let result = assign(&ctx(), input(), &items(&[("x", col("x") + 1), ("x", col("x") + 1)])).unwrap();
		assert_eq!(result.frame.column_names(), vec!["x", "g"]);
		assert_eq!(result.frame.try_column("x").unwrap().data, ColumnData::int8([3, 4, 5, 6]));
	}

	#[test]
	fn test_literal_broadcasts() {
		let result = assign(&ctx(), input(), &items(&[("one", lit(1))])).unwrap();
		assert_eq!(result.frame.try_column("one").unwrap().data, ColumnData::int8([1, 1, 1, 1]));
	}

	#[test]
	fn test_grouped_row_number() {
		let mut grouped = input();
		grouped.grouping = Grouping {
			groups: vec!["g".to_string()],
			order: vec![col("x")],
		};
		let result = assign(&ctx(), grouped, &items(&[("r", row_number(PLACEHOLDER))])).unwrap();
		assert_eq!(result.frame.try_column("r").unwrap().data, ColumnData::int8([1, 2, 1, 2]));
	}

	#[test]
	fn test_transmute_keeps_groups_and_new_columns() {
		let mut grouped = input();
		grouped.grouping.groups = vec!["g".to_string()];
		let result = transmute(&Dispatcher::empty(), grouped, &transmute_verb([("y", col("x") * 10)])).unwrap();
		assert_eq!(result.frame.column_names(), vec!["g", "y"]);
	}
}
