// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::{Classifier, Expr, FunctionMode};
use tidyq_frame::{
	ColumnData, SortDirection,
	compute::{Aggregate, Cumulative},
	sort_indices,
};
use tidyq_type::Value;

use super::Evaluator;
use crate::args::{offset_argument, sort_key};

impl Evaluator<'_> {
	/// Row aligned result of an aggregate or cumulative call: aggregates are
	/// broadcast to every row of their group, cumulative results land on the
	/// row they were computed for.
	pub(super) fn window(&self, expr: &Expr) -> crate::Result<ColumnData> {
		let mut values = vec![Value::Undefined; self.rows];
		match self.window_kind(expr)? {
			WindowKind::Aggregate(aggregate, data) => {
				for rows in self.groups.values() {
					let value = self.kernel(expr, aggregate.evaluate(&data, rows))?;
					for &row in rows {
						values[row] = value.clone();
					}
				}
				self.typed(expr, aggregate.result_type(data.get_type()), values)
			}
			WindowKind::Cumulative(cumulative, data, order) => {
				for rows in self.groups.values() {
					let ordered = Self::ordered(rows, order.as_ref());
					let result = self.kernel(expr, cumulative.evaluate(&data, &ordered))?;
					for (&row, value) in ordered.iter().zip(result) {
						values[row] = value;
					}
				}
				self.typed(expr, cumulative.result_type(data.get_type()), values)
			}
		}
	}

	/// One value per group of `groups`, in the order given. Only aggregates
	/// reduce; anything else is rejected.
	pub(crate) fn reduce(&self, expr: &Expr, groups: &[&Vec<usize>]) -> crate::Result<ColumnData> {
		let WindowKind::Aggregate(aggregate, data) = self.window_kind(expr)? else {
			return Err(self.ctx.invalid_argument(expr, "summarize needs expressions that reduce each group to one value"));
		};
		let values = groups
			.iter()
			.map(|rows| self.kernel(expr, aggregate.evaluate(&data, rows)))
			.collect::<crate::Result<Vec<_>>>()?;
		self.typed(expr, aggregate.result_type(data.get_type()), values)
	}

	fn window_kind(&self, expr: &Expr) -> crate::Result<WindowKind> {
		let Expr::Call {
			name,
			args,
		} = expr
		else {
			return Err(self.ctx.invalid_argument(expr, "expected a function call"));
		};
		let unknown = || self.ctx.invalid_argument(expr, format!("'{name}' is not a window function"));

		match Classifier::mode_of(expr) {
			Some(FunctionMode::Aggregate) => {
				let aggregate = Aggregate::from_name(name).ok_or_else(unknown)?;
				Ok(WindowKind::Aggregate(aggregate, self.window_argument(expr, args)?))
			}
			Some(FunctionMode::Cumulative) => {
				let offset = match name.as_str() {
					"lag" | "lead" => offset_argument(self.ctx, expr, args)?,
					_ => 0,
				};
				let cumulative = Cumulative::from_name(name, offset).ok_or_else(unknown)?;
				// row_number(_.x) numbers rows by x instead of by position
				let order = match (cumulative, args.first()) {
					(Cumulative::RowNumber, Some(arg)) if !matches!(arg, Expr::Placeholder) => {
						let (key, direction) = sort_key(arg);
						Some((self.evaluate(key)?, direction))
					}
					_ => None,
				};
				let data = match order {
					Some(_) => ColumnData::undefined(self.rows),
					None => self.window_argument(expr, args)?,
				};
				Ok(WindowKind::Cumulative(cumulative, data, order))
			}
			_ => Err(unknown()),
		}
	}

	// `n(_)` and `row_number(_)` take the placeholder and read no column
	fn window_argument(&self, expr: &Expr, args: &[Expr]) -> crate::Result<ColumnData> {
		match self.argument(expr, args, 0)? {
			Expr::Placeholder => Ok(ColumnData::undefined(self.rows)),
			arg => self.evaluate(arg),
		}
	}

	fn ordered(rows: &[usize], order: Option<&(ColumnData, SortDirection)>) -> Vec<usize> {
		let mut ordered = rows.to_vec();
		if let Some((key, direction)) = order {
			sort_indices(&[(key, *direction)], &mut ordered);
		}
		ordered
	}
}

enum WindowKind {
	Aggregate(Aggregate, ColumnData),
	Cumulative(Cumulative, ColumnData, Option<(ColumnData, SortDirection)>),
}
