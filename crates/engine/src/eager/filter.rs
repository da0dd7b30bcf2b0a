// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::Verb;

use super::{EagerFrame, Evaluator};
use crate::{Dispatcher, check, context::Context};

/// Keeps the rows where every condition holds. Windows inside a condition
/// see the whole group, not just the rows an earlier condition kept.
pub(crate) fn filter(_: &Dispatcher, mut input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Filter, BackendKind::Eager);
	let Verb::Filter(conditions) = verb else {
		return Err(ctx.unsupported_verb());
	};

	let keep = {
		let view = input.view(&ctx)?;
		let evaluator = Evaluator::new(&ctx, &input.frame, &view);
		let mut keep = vec![true; input.frame.row_count()];
		for condition in conditions {
			let classification = ctx.classify(condition, &input.grouping.groups)?;
			check::warn_unordered(&ctx, condition, &classification, &input.grouping);
			let mask = evaluator.mask(condition)?;
			for (kept, holds) in keep.iter_mut().zip(mask) {
				*kept &= holds;
			}
		}
		keep
	};

	input.frame = input.frame.filter(&keep);
	Ok(input)
}

#[cfg(test)]
mod tests {
	use tidyq_expr::col;
	use tidyq_frame::{Column, ColumnData, Frame};
	use tidyq_verb::filter as filter_verb;

	use super::*;

	fn input() -> EagerFrame {
		EagerFrame::new(
			Frame::new(vec![
				Column::int8("x", [1, 2, 3, 4]),
				Column::int8("g", [1, 1, 2, 2]),
				Column::new("y", ColumnData::Int8(vec![1, 0, 3, 4], vec![true, false, true, true])),
			])
			.unwrap(),
		)
	}

	fn run(input: EagerFrame, verb: Verb) -> crate::Result<EagerFrame> {
		filter(&Dispatcher::empty(), input, &verb)
	}

	#[test]
	fn test_undefined_is_false() {
		let result = run(input(), filter_verb([col("y").gt(0)])).unwrap();
		assert_eq!(result.frame.try_column("x").unwrap().data, ColumnData::int8([1, 3, 4]));
	}

	#[test]
	fn test_conditions_and_together() {
		let result = run(input(), filter_verb([col("x").gt(1), col("x").lt(4)])).unwrap();
		assert_eq!(result.frame.try_column("x").unwrap().data, ColumnData::int8([2, 3]));
	}

	#[test]
	fn test_grouped_aggregate_condition() {
		let mut grouped = input();
		grouped.grouping.groups = vec!["g".to_string()];
		let result = run(grouped, filter_verb([col("x").gt(col("x").mean())])).unwrap();
		assert_eq!(result.frame.try_column("x").unwrap().data, ColumnData::int8([2, 4]));
	}

	#[test]
	fn test_non_boolean_condition() {
		let err = run(input(), filter_verb([col("x") + 1])).unwrap_err();
		assert_eq!(err.code, "RESOLVE_006");
	}
}
