// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tidyq_expr::{Classifier, Expr, FunctionMode};
use tidyq_frame::{
	SortDirection,
	compute::{Aggregate, Cumulative},
};
use tidyq_sql::{OrderBy, SqlColumn, SqlExpr, WindowFrame};
use tidyq_type::Type;

use super::{Compiler, Mode};
use crate::args::{offset_argument, sort_key};

impl Compiler<'_> {
	/// Aggregate and cumulative calls. In window mode both become
	/// `.. OVER (PARTITION BY <groups> ..)`; in aggregate mode only
	/// aggregates are allowed and stay plain.
	pub(super) fn window(&self, expr: &Expr) -> crate::Result<SqlColumn> {
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
				self.aggregate(expr, aggregate, args)
			}
			Some(FunctionMode::Cumulative) if self.mode == Mode::Aggregate => {
				Err(self.ctx.invalid_argument(expr, "summarize needs expressions that reduce each group to one value"))
			}
			Some(FunctionMode::Cumulative) => {
				let offset = match name.as_str() {
					"lag" | "lead" => offset_argument(self.ctx, expr, args)?,
					_ => 0,
				};
				let cumulative = Cumulative::from_name(name, offset).ok_or_else(unknown)?;
				self.cumulative(expr, cumulative, args)
			}
			_ => Err(unknown()),
		}
	}

	fn aggregate(&self, expr: &Expr, aggregate: Aggregate, args: &[Expr]) -> crate::Result<SqlColumn> {
		let argument = self.window_argument(expr, args)?;
		let input = argument.as_ref().map_or(Type::Undefined, |a| a.ty);
		if input == Type::Utf8
			&& matches!(
				aggregate,
				Aggregate::Sum | Aggregate::Mean | Aggregate::Median | Aggregate::Std | Aggregate::Var
			) {
			return Err(self.ctx.unsupported_type(expr, aggregate.name(), input));
		}
		let arg = || argument.clone().map_or(SqlExpr::Star, |a| a.expr);

		let function = match aggregate {
			Aggregate::Sum => SqlExpr::function("SUM", vec![arg()]),
			Aggregate::Mean => SqlExpr::function("AVG", vec![arg()]),
			Aggregate::Min => SqlExpr::function("MIN", vec![arg()]),
			Aggregate::Max => SqlExpr::function("MAX", vec![arg()]),
			Aggregate::Count => SqlExpr::function("COUNT", vec![arg()]),
			Aggregate::Size => SqlExpr::function("COUNT", vec![SqlExpr::Star]),
			Aggregate::NUnique => {
				if self.mode == Mode::Window && !self.dialect.supports_window_aggregate("COUNT_DISTINCT") {
					return Err(self
						.ctx
						.unsupported_capability(self.dialect.name(), "COUNT(DISTINCT ..) as a window function"));
				}
				SqlExpr::Function {
					name: "COUNT".to_string(),
					args: vec![arg()],
					distinct: true,
				}
			}
			Aggregate::Median => {
				self.require("MEDIAN", "median")?;
				SqlExpr::function("MEDIAN", vec![arg()])
			}
			Aggregate::Std => {
				self.require("STDDEV_SAMP", "standard deviation")?;
				SqlExpr::function("STDDEV_SAMP", vec![arg()])
			}
			Aggregate::Var => {
				self.require("VAR_SAMP", "variance")?;
				SqlExpr::function("VAR_SAMP", vec![arg()])
			}
			Aggregate::First => {
				self.require("FIRST", "first value of a group")?;
				SqlExpr::function("FIRST", vec![arg()])
			}
			Aggregate::Last => {
				self.require("LAST", "last value of a group")?;
				SqlExpr::function("LAST", vec![arg()])
			}
		};

		let ty = aggregate.result_type(input);
		match self.mode {
			Mode::Aggregate => Ok(SqlColumn::new(function, ty)),
			Mode::Window => Ok(SqlColumn::new(self.over(function, vec![], None)?, ty)),
		}
	}

	fn cumulative(&self, expr: &Expr, cumulative: Cumulative, args: &[Expr]) -> crate::Result<SqlColumn> {
		let running = |function: &str, argument: Option<SqlColumn>| -> crate::Result<SqlColumn> {
			let argument = argument.ok_or_else(|| self.ctx.invalid_argument(expr, "expected a column argument"))?;
			let ty = cumulative.result_type(argument.ty);
			if argument.ty == Type::Utf8 && matches!(cumulative, Cumulative::Sum | Cumulative::Mean) {
				return Err(self.ctx.unsupported_type(expr, function, argument.ty));
			}
			let function = SqlExpr::function(function, vec![argument.expr]);
			let window = self.over(function, self.order.clone(), Some(WindowFrame::RowsUnboundedPreceding))?;
			Ok(SqlColumn::new(window, ty))
		};

		match cumulative {
			Cumulative::Sum => running("SUM", self.window_argument(expr, args)?),
			Cumulative::Mean => running("AVG", self.window_argument(expr, args)?),
			Cumulative::Min => running("MIN", self.window_argument(expr, args)?),
			Cumulative::Max => running("MAX", self.window_argument(expr, args)?),
			Cumulative::Count => running("COUNT", self.window_argument(expr, args)?),
			Cumulative::RowNumber => {
				// row_number(_.x) numbers rows by x instead of by position
				let order = match args.first() {
					Some(arg) if !matches!(arg, Expr::Placeholder) => vec![self.sort(arg)?],
					_ => self.order.clone(),
				};
				let window = self.over(SqlExpr::function("ROW_NUMBER", vec![]), order, None)?;
				Ok(SqlColumn::new(window, Type::Int8))
			}
			Cumulative::Rank | Cumulative::DenseRank | Cumulative::PercentRank => {
				let argument = self.compile(self.argument(expr, args, 0)?)?;
				let function = match cumulative {
					Cumulative::Rank => "RANK",
					Cumulative::DenseRank => "DENSE_RANK",
					_ => "PERCENT_RANK",
				};
				let order = vec![OrderBy::asc(argument.expr)];
				let window = self.over(SqlExpr::function(function, vec![]), order, None)?;
				Ok(SqlColumn::new(window, cumulative.result_type(argument.ty)))
			}
			Cumulative::Lag(offset) | Cumulative::Lead(offset) => {
				let argument = self.compile(self.argument(expr, args, 0)?)?;
				let function = if matches!(cumulative, Cumulative::Lag(_)) { "LAG" } else { "LEAD" };
				let call = SqlExpr::function(function, vec![argument.expr, SqlExpr::literal(offset as i64)]);
				let window = self.over(call, self.order.clone(), None)?;
				Ok(SqlColumn::new(window, argument.ty))
			}
		}
	}

	fn over(&self, function: SqlExpr, order_by: Vec<OrderBy>, frame: Option<WindowFrame>) -> crate::Result<SqlExpr> {
		if !self.dialect.supports_window_functions() {
			return Err(self.ctx.unsupported_capability(self.dialect.name(), "window functions"));
		}
		Ok(SqlExpr::Window {
			function: Box::new(function),
			partition_by: self.partition.clone(),
			order_by,
			frame,
		})
	}

	/// An `arrange` key as an `ORDER BY` entry.
	pub(crate) fn sort(&self, key: &Expr) -> crate::Result<OrderBy> {
		let (key, direction) = sort_key(key);
		let compiled = self.compile(key)?.expr;
		Ok(match direction {
			SortDirection::Asc => OrderBy::asc(compiled),
			SortDirection::Desc => OrderBy::desc(compiled),
		})
	}

	// `None` for the placeholder of `n(_)`, which reads no column
	fn window_argument(&self, expr: &Expr, args: &[Expr]) -> crate::Result<Option<SqlColumn>> {
		match self.argument(expr, args, 0)? {
			Expr::Placeholder => Ok(None),
			arg => self.compile(arg).map(Some),
		}
	}
}
