// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::{Classifier, Expr};
use tidyq_frame::{ColumnData, Frame, GroupByView};
use tidyq_type::Value;

use crate::context::Context;

mod call;
mod operator;
mod window;

/// Resolves expressions against a frame. Aggregate and cumulative calls are
/// computed once per group of `groups` and written back to the group's rows.
pub(crate) struct Evaluator<'a> {
	ctx: &'a Context,
	frame: &'a Frame,
	groups: &'a GroupByView,
	rows: usize,
}

impl<'a> Evaluator<'a> {
	pub(crate) fn new(ctx: &'a Context, frame: &'a Frame, groups: &'a GroupByView) -> Self {
		Self {
			ctx,
			frame,
			groups,
			rows: frame.row_count(),
		}
	}

	/// Overrides the row count literals broadcast to, for frames that carry
	/// no column to take it from.
	pub(crate) fn with_rows(mut self, rows: usize) -> Self {
		self.rows = rows;
		self
	}

	pub(crate) fn evaluate(&self, expr: &Expr) -> crate::Result<ColumnData> {
		if Classifier::is_window(expr) {
			return self.window(expr);
		}
		if let Some(name) = expr.column_name() {
			return self.column(name);
		}
		match expr {
			Expr::Literal(value) => Ok(ColumnData::repeat(value, self.rows)),
			Expr::Binary {
				op,
				left,
				right,
			} => self.binary(expr, *op, left, right),
			Expr::Unary {
				op,
				operand,
			} => self.unary(expr, *op, operand),
			Expr::Call {
				name,
				args,
			} => self.call(expr, name, args),
			Expr::Placeholder
			| Expr::Attr {
				..
			}
			| Expr::Index {
				..
			} => Err(self.ctx.invalid_argument(expr, "expected a column reference such as _.x")),
		}
	}

	/// Evaluates a condition into a row mask; undefined rows are dropped.
	pub(crate) fn mask(&self, expr: &Expr) -> crate::Result<Vec<bool>> {
		let data = self.evaluate(expr)?;
		self.kernel(expr, data.as_mask())
	}

	fn column(&self, name: &str) -> crate::Result<ColumnData> {
		self.frame
			.column(name)
			.map(|column| column.data.clone())
			.ok_or_else(|| self.ctx.column_not_found(name, self.frame.column_names()))
	}

	fn argument<'e>(&self, call: &'e Expr, args: &'e [Expr], index: usize) -> crate::Result<&'e Expr> {
		args.get(index).ok_or_else(|| self.ctx.invalid_argument(call, format!("missing argument {}", index + 1)))
	}

	pub(crate) fn kernel<T>(&self, expr: &Expr, result: tidyq_frame::Result<T>) -> crate::Result<T> {
		result.map_err(|err| self.ctx.frame_error(err, expr, self.frame.column_names()))
	}

	// collects cells into a column that keeps `ty` even when every cell is undefined
	fn typed(&self, expr: &Expr, ty: tidyq_type::Type, values: Vec<Value>) -> crate::Result<ColumnData> {
		let mut data = ColumnData::with_type(ty);
		for value in values {
			self.kernel(expr, data.push(value))?;
		}
		Ok(data)
	}
}
