// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_frame::{ColumnData, GroupByView, SortDirection};
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::Verb;

use super::{EagerFrame, Evaluator};
use crate::{Dispatcher, args::sort_key, context::Context};

/// Stable sort over the whole frame; grouping does not partition the sort.
pub(crate) fn arrange(_: &Dispatcher, mut input: EagerFrame, verb: &Verb) -> crate::Result<EagerFrame> {
	let ctx = Context::new(VerbKind::Arrange, BackendKind::Eager);
	let Verb::Arrange(exprs) = verb else {
		return Err(ctx.unsupported_verb());
	};

	let permutation = {
		let everything = GroupByView::single(input.frame.row_count());
		let evaluator = Evaluator::new(&ctx, &input.frame, &everything);
		let keys = exprs
			.iter()
			.map(|expr| {
				let (key, direction) = sort_key(expr);
				ctx.classify(key, &[])?;
				Ok((evaluator.evaluate(key)?, direction))
			})
			.collect::<crate::Result<Vec<_>>>()?;
		let refs: Vec<(&ColumnData, SortDirection)> = keys.iter().map(|(data, direction)| (data, *direction)).collect();
		input.frame.sort_permutation(&refs)
	};

	input.frame = input.frame.take(&permutation);
	Ok(input)
}
