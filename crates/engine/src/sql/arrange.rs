// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::Classifier;
use tidyq_type::{BackendKind, VerbKind};
use tidyq_verb::Verb;

use super::{Compiler, Mode, SqlQuery};
use crate::{Dispatcher, args::sort_key, context::Context};

/// The new keys lead the `ORDER BY`; the order the query had before breaks
/// ties, as a stable sort would. Grouping does not partition the sort, so
/// windows in a key see every row.
pub(crate) fn arrange(_: &Dispatcher, mut input: SqlQuery, verb: &Verb) -> crate::Result<SqlQuery> {
	let ctx = Context::new(VerbKind::Arrange, BackendKind::Sql);
	let Verb::Arrange(exprs) = verb else {
		return Err(ctx.unsupported_verb());
	};
	for expr in exprs {
		let (key, _) = sort_key(expr);
		ctx.classify(key, &[])?;
	}

	if input.is_limited() || input.is_distinct() || exprs.iter().any(Classifier::contains_window) {
		input.wrap();
	}

	let order = {
		let dialect = input.table().connection().dialect();
		let compiler = Compiler::new(&ctx, &input.select.columns, dialect, Mode::Window)
			.with_window(vec![], input.select.order_by.clone());
		exprs.iter().map(|expr| compiler.sort(expr)).collect::<crate::Result<Vec<_>>>()?
	};
	let previous = std::mem::replace(&mut input.select.order_by, order);
	for tiebreak in previous {
		if !input.select.order_by.iter().any(|o| o.expr == tiebreak.expr) {
			input.select.order_by.push(tiebreak);
		}
	}
	Ok(input)
}

#[cfg(test)]
mod tests {
	use tidyq_expr::{col, desc};
	use tidyq_frame::ColumnData;
	use tidyq_verb::arrange as arrange_verb;

	use super::*;
	use crate::sql::tests::query;

	fn order(input: SqlQuery, verb: Verb) -> ColumnData {
		let result = arrange(&Dispatcher::empty(), input, &verb).unwrap();
		result.fetch().unwrap().try_column("x").unwrap().data.clone()
	}

	#[test]
	fn test_descending() {
		assert_eq!(order(query(), arrange_verb([desc(col("x"))])), ColumnData::int8([4, 3, 2, 1]));
		assert_eq!(order(query(), arrange_verb([-col("x")])), ColumnData::int8([4, 3, 2, 1]));
	}

	#[test]
	fn test_previous_order_breaks_ties() {
		let first = arrange(&Dispatcher::empty(), query(), &arrange_verb([desc(col("x"))])).unwrap();
		let result = arrange(&Dispatcher::empty(), first, &arrange_verb([col("g")])).unwrap();
		assert_eq!(
			result.sql(),
			r#"SELECT "x", "g", "s" FROM "t" ORDER BY "g" ASC NULLS LAST, "x" DESC NULLS LAST"#
		);
		assert_eq!(result.fetch().unwrap().try_column("x").unwrap().data, ColumnData::int8([2, 1, 4, 3]));
	}

	#[test]
	fn test_computed_key() {
		assert_eq!(order(query(), arrange_verb([col("s").len(), -col("x")])), ColumnData::int8([3, 1, 2, 4]));
	}

	#[test]
	fn test_window_key_ignores_groups() {
		let mut grouped = query();
		grouped.grouping.groups = vec!["g".to_string()];
		let result = arrange(&Dispatcher::empty(), grouped, &arrange_verb([col("x").rank()])).unwrap();
		assert!(!result.sql().contains("PARTITION BY"));
	}
}
